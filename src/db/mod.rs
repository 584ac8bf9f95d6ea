//! Database module - local key/value storage for session history and theme

use std::cell::RefCell;
use std::collections::HashMap;

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::exercises::{BodyPart, Category, Exercise};
use crate::planner::WorkoutPlan;

pub const HISTORY_KEY: &str = "history";
pub const THEME_KEY: &str = "theme";

/// Durable string-to-string storage. Writes overwrite the whole value.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// SQLite-backed store
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        debug!(key, bytes = value.len(), "Stored value");
        Ok(())
    }
}

/// Non-durable store for tests and dry runs
#[derive(Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Owned copy of a catalog exercise, kept inside history records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseEntry {
    pub id: String,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub body_parts: Vec<BodyPart>,
    #[serde(rename = "reps", default, skip_serializing_if = "Option::is_none")]
    pub prescription: Option<String>,
    #[serde(default)]
    pub emoji: String,
}

impl From<&Exercise> for ExerciseEntry {
    fn from(ex: &Exercise) -> Self {
        Self {
            id: ex.id.to_string(),
            name: ex.name.to_string(),
            category: ex.category,
            body_parts: ex.body_parts.to_vec(),
            prescription: ex.prescription.map(str::to_string),
            emoji: ex.emoji.to_string(),
        }
    }
}

/// Archived outcome of one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    /// Copied from the plan
    pub id: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date: DateTime<Utc>,
    /// Planned minutes
    pub duration: u32,
    pub parts: Vec<BodyPart>,
    /// Percentage of exercises reached, 0-100
    pub completed_rate: u8,
    pub exercises: Vec<ExerciseEntry>,
}

/// round(100 * reached / total), clamped to 0-100
pub fn completion_rate(reached: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let reached = reached.min(total);
    (100.0 * reached as f64 / total as f64).round() as u8
}

impl HistoryRecord {
    /// Archive `plan` with `reached` exercises done
    pub fn from_plan(plan: &WorkoutPlan, reached: usize, date: DateTime<Utc>) -> Self {
        Self {
            id: plan.id.clone(),
            date,
            duration: plan.total_duration,
            parts: plan.selected_parts.clone(),
            completed_rate: completion_rate(reached, plan.len()),
            exercises: plan.exercises.iter().map(ExerciseEntry::from).collect(),
        }
    }
}

/// Completed sessions, most recent first
#[derive(Debug, Clone, Default)]
pub struct History {
    records: Vec<HistoryRecord>,
}

impl History {
    /// Read history once. An unreadable value is logged and treated as empty.
    pub fn load(store: &impl KeyValueStore) -> Result<Self> {
        let Some(raw) = store.get(HISTORY_KEY)? else {
            return Ok(Self::default());
        };

        let records = match serde_json::from_str::<Vec<HistoryRecord>>(&raw) {
            Ok(records) => records,
            Err(e) => {
                warn!("Discarding unreadable history: {}", e);
                Vec::new()
            }
        };
        Ok(Self { records })
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&HistoryRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Add the newest record and rewrite storage
    pub fn push_front(&mut self, record: HistoryRecord, store: &impl KeyValueStore) -> Result<()> {
        self.records.insert(0, record);
        self.persist(store)
    }

    /// Remove by id; returns false when nothing matched
    pub fn delete(&mut self, id: &str, store: &impl KeyValueStore) -> Result<bool> {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        if self.records.len() == before {
            return Ok(false);
        }
        self.persist(store)?;
        Ok(true)
    }

    fn persist(&self, store: &impl KeyValueStore) -> Result<()> {
        let json = serde_json::to_string(&self.records)?;
        store.set(HISTORY_KEY, &json)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(s: &str) -> Option<Theme> {
        match s.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn load(store: &impl KeyValueStore) -> Result<Theme> {
        Ok(store
            .get(THEME_KEY)?
            .and_then(|s| Theme::parse(&s))
            .unwrap_or_default())
    }

    pub fn save(&self, store: &impl KeyValueStore) -> Result<()> {
        store.set(THEME_KEY, self.as_str())
    }
}
