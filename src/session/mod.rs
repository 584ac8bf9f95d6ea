//! Session controller - owns the active plan, the focused exercise and its timer
//!
//! Every user intent is a method call; presentation code subscribes to
//! `SessionEvent`s instead of reading state behind the controller's back.

pub mod timer;

pub use timer::{LeadInTicket, SessionTimer, TimerConfig, TimerMode, TimerState, prescribed_seconds};

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Instant;

use anyhow::Result;
use chrono::{DateTime, Utc};
use rand::RngCore;
use thiserror::Error;
use tracing::{info, warn};

use crate::db::{History, HistoryRecord, KeyValueStore, Theme};
use crate::exercises::{BodyPart, CATALOG_VERSION, EXERCISE_DB, Exercise};
use crate::planner::{
    DEFAULT_MINUTES, MAX_MINUTES, MIN_MINUTES, MINUTES_STEP, PlanError, WorkoutPlan, generate_workout,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error("No workout plan is active.")]
    NoActivePlan,
    #[error("Exercise {index} is out of range (plan has {len}).")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Focus mode is not active.")]
    NotFocused,
    #[error("Not resting.")]
    NotResting,
}

/// Body part picks and duration chosen before generating
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSetup {
    parts: Vec<BodyPart>,
    minutes: u32,
}

impl SessionSetup {
    pub fn parts(&self) -> &[BodyPart] {
        &self.parts
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn is_selected(&self, part: BodyPart) -> bool {
        self.parts.contains(&part)
    }

    /// Select or deselect; selection order is kept
    pub fn toggle_part(&mut self, part: BodyPart) {
        if let Some(pos) = self.parts.iter().position(|p| *p == part) {
            self.parts.remove(pos);
        } else {
            self.parts.push(part);
        }
    }

    pub fn increase_minutes(&mut self) {
        self.minutes = (self.minutes + MINUTES_STEP).min(MAX_MINUTES);
    }

    pub fn decrease_minutes(&mut self) {
        self.minutes = self.minutes.saturating_sub(MINUTES_STEP).max(MIN_MINUTES);
    }

    /// Clamp to the allowed range and snap to the 5-minute grid
    pub fn set_minutes(&mut self, minutes: u32) {
        let clamped = minutes.clamp(MIN_MINUTES, MAX_MINUTES);
        let snapped = (clamped + MINUTES_STEP / 2) / MINUTES_STEP * MINUTES_STEP;
        self.minutes = snapped.clamp(MIN_MINUTES, MAX_MINUTES);
    }

    pub fn can_generate(&self) -> bool {
        !self.parts.is_empty()
    }

    fn clear_parts(&mut self) {
        self.parts.clear();
    }
}

impl Default for SessionSetup {
    fn default() -> Self {
        Self {
            parts: Vec::new(),
            minutes: DEFAULT_MINUTES,
        }
    }
}

/// What the focus view needs to draw one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusSnapshot {
    pub index: usize,
    pub total: usize,
    pub exercise: Exercise,
    pub focused: bool,
    pub timer: TimerState,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    PlanReady(WorkoutPlan),
    Focus(FocusSnapshot),
    SessionFinished(HistoryRecord),
    HistoryChanged { len: usize },
    ThemeChanged(Theme),
}

/// Proof that the user was asked before a history record is deleted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    id: String,
}

impl DeleteRequest {
    pub fn id(&self) -> &str {
        &self.id
    }
}

pub struct SessionController<S: KeyValueStore> {
    store: S,
    catalog: &'static [Exercise],
    rng: Box<dyn RngCore>,
    setup: SessionSetup,
    plan: Option<WorkoutPlan>,
    active_index: usize,
    /// Exercise the timer was last seeded for
    seeded_index: Option<usize>,
    focused: bool,
    /// Millisecond stamp of the newest plan id issued or loaded
    last_plan_millis: i64,
    timer: SessionTimer,
    history: History,
    theme: Theme,
    subscribers: Vec<Sender<SessionEvent>>,
}

impl<S: KeyValueStore> SessionController<S> {
    /// Load history and theme from `store` and start in the setup state
    pub fn new(store: S, rng: Box<dyn RngCore>) -> Result<Self> {
        let history = History::load(&store)?;
        let theme = Theme::load(&store)?;
        let last_plan_millis = history
            .records()
            .iter()
            .filter_map(|r| r.id.parse::<i64>().ok())
            .max()
            .unwrap_or(0);
        info!(
            records = history.len(),
            theme = theme.as_str(),
            catalog = CATALOG_VERSION,
            "Session controller ready"
        );

        Ok(Self {
            store,
            catalog: EXERCISE_DB,
            rng,
            setup: SessionSetup::default(),
            plan: None,
            active_index: 0,
            seeded_index: None,
            focused: false,
            last_plan_millis,
            timer: SessionTimer::default(),
            history,
            theme,
            subscribers: Vec::new(),
        })
    }

    pub fn with_catalog(mut self, catalog: &'static [Exercise]) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_timer_config(mut self, config: TimerConfig) -> Self {
        self.timer = SessionTimer::new(config);
        self
    }

    pub fn subscribe(&mut self) -> Receiver<SessionEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    fn emit(&mut self, event: SessionEvent) {
        // Dropped receivers unsubscribe themselves
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn setup(&self) -> &SessionSetup {
        &self.setup
    }

    pub fn setup_mut(&mut self) -> &mut SessionSetup {
        &mut self.setup
    }

    pub fn plan(&self) -> Option<&WorkoutPlan> {
        self.plan.as_ref()
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn current_exercise(&self) -> Option<&Exercise> {
        self.plan.as_ref()?.get(self.active_index)
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn timer_state(&self) -> TimerState {
        self.timer.state()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// (active index, plan length)
    pub fn progress(&self) -> Option<(usize, usize)> {
        self.plan.as_ref().map(|p| (self.active_index, p.len()))
    }

    pub fn snapshot(&self) -> Option<FocusSnapshot> {
        let plan = self.plan.as_ref()?;
        let exercise = *plan.get(self.active_index)?;
        Some(FocusSnapshot {
            index: self.active_index,
            total: plan.len(),
            exercise,
            focused: self.focused,
            timer: self.timer.state(),
        })
    }

    fn emit_snapshot(&mut self) -> Option<FocusSnapshot> {
        let snapshot = self.snapshot()?;
        self.emit(SessionEvent::Focus(snapshot));
        Some(snapshot)
    }

    /// Generate from the current setup
    pub fn generate(&mut self) -> Result<&WorkoutPlan, SessionError> {
        let parts = self.setup.parts.clone();
        let minutes = self.setup.minutes;
        self.create_session(&parts, minutes)
    }

    /// Plan ids are creation millis, so bump past the last one when the clock
    /// has not moved on
    fn next_plan_time(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let millis = now.timestamp_millis().max(self.last_plan_millis + 1);
        self.last_plan_millis = millis;
        DateTime::from_timestamp_millis(millis).unwrap_or(now)
    }

    /// Build a plan and make it the active session, starting at exercise 0
    pub fn create_session(&mut self, parts: &[BodyPart], minutes: u32) -> Result<&WorkoutPlan, SessionError> {
        let created_at = self.next_plan_time();
        let plan = generate_workout(self.catalog, parts, minutes, &mut *self.rng, created_at)?;
        info!(
            id = %plan.id,
            parts = ?plan.selected_parts,
            minutes,
            exercises = plan.len(),
            "Workout plan generated"
        );

        self.timer.suspend();
        self.focused = false;
        self.active_index = 0;
        self.seeded_index = None;
        self.emit(SessionEvent::PlanReady(plan.clone()));

        Ok(self.plan.insert(plan))
    }

    /// Enter focus mode, optionally jumping to `index`. The timer is reseeded
    /// only when the exercise differs from the one it was last seeded for.
    pub fn focus(&mut self, index: Option<usize>, now: Instant) -> Result<Option<LeadInTicket>, SessionError> {
        let plan = self.plan.as_ref().ok_or(SessionError::NoActivePlan)?;
        let target = index.unwrap_or(self.active_index);
        let Some(exercise) = plan.get(target) else {
            return Err(SessionError::IndexOutOfRange {
                index: target,
                len: plan.len(),
            });
        };
        let prescription = exercise.prescription;

        self.active_index = target;
        self.focused = true;

        let ticket = if self.seeded_index == Some(target) {
            None
        } else {
            self.seeded_index = Some(target);
            Some(self.timer.enter(prescription, now))
        };

        info!(index = target, reseeded = ticket.is_some(), "Focus entered");
        self.emit_snapshot();
        Ok(ticket)
    }

    /// Back to the plan view: timer stops, pending lead-in is dropped
    pub fn leave_focus(&mut self) {
        if !self.focused {
            return;
        }
        self.focused = false;
        self.timer.suspend();
        self.emit_snapshot();
    }

    pub fn toggle_timer(&mut self, now: Instant) -> Result<bool, SessionError> {
        if !self.focused {
            return Err(SessionError::NotFocused);
        }
        let changed = self.timer.toggle(now);
        self.emit_snapshot();
        Ok(changed)
    }

    pub fn start_rest(&mut self, now: Instant) -> Result<(), SessionError> {
        if !self.focused {
            return Err(SessionError::NotFocused);
        }
        self.timer.start_rest(now);
        info!(index = self.active_index, "Rest started");
        self.emit_snapshot();
        Ok(())
    }

    /// Finish resting and lead back into the current exercise
    pub fn end_rest(&mut self, now: Instant) -> Result<LeadInTicket, SessionError> {
        if !self.focused {
            return Err(SessionError::NotFocused);
        }
        if !self.timer.state().resting {
            return Err(SessionError::NotResting);
        }
        let prescription = self.current_exercise().and_then(|e| e.prescription);
        let ticket = self.timer.end_rest(prescription, now);
        self.seeded_index = Some(self.active_index);
        info!(index = self.active_index, "Rest ended");
        self.emit_snapshot();
        Ok(ticket)
    }

    /// Deliver a scheduled lead-in. Stale tickets do nothing.
    pub fn fire_lead_in(&mut self, ticket: LeadInTicket, now: Instant) -> bool {
        let fired = self.timer.fire(ticket, now);
        if fired {
            self.emit_snapshot();
        }
        fired
    }

    /// Advance the timer while focused; emits a snapshot every call
    pub fn tick(&mut self, now: Instant) -> Option<FocusSnapshot> {
        if !self.focused {
            return None;
        }
        self.timer.tick(now);
        self.emit_snapshot()
    }

    /// Mark the current exercise done. On the last exercise the session is
    /// archived and the record returned; otherwise focus moves on.
    pub fn complete_current(&mut self, now: Instant) -> Result<Option<HistoryRecord>, SessionError> {
        let plan = self.plan.as_ref().ok_or(SessionError::NoActivePlan)?;
        if self.active_index + 1 >= plan.len() {
            return self.finish().map(Some);
        }

        self.active_index += 1;
        let prescription = plan.get(self.active_index).and_then(|e| e.prescription);
        info!(index = self.active_index, total = plan.len(), "Exercise completed");

        if self.focused {
            self.seeded_index = Some(self.active_index);
            self.timer.enter(prescription, now);
        } else {
            self.timer.suspend();
            self.seeded_index = None;
        }
        self.emit_snapshot();
        Ok(None)
    }

    /// Archive the session with everything up to the current exercise
    /// counted as reached, then return to setup.
    pub fn finish(&mut self) -> Result<HistoryRecord, SessionError> {
        let plan = self.plan.take().ok_or(SessionError::NoActivePlan)?;
        let record = HistoryRecord::from_plan(&plan, self.active_index + 1, Utc::now());
        info!(id = %record.id, rate = record.completed_rate, "Session finished");

        self.timer.suspend();
        self.focused = false;
        self.active_index = 0;
        self.seeded_index = None;
        self.setup.clear_parts();

        if let Err(e) = self.history.push_front(record.clone(), &self.store) {
            warn!("Failed to persist history: {}", e);
        }
        self.emit(SessionEvent::SessionFinished(record.clone()));
        let len = self.history.len();
        self.emit(SessionEvent::HistoryChanged { len });
        Ok(record)
    }

    /// Ending early archives what was reached, same as `finish`
    pub fn abandon(&mut self) -> Result<HistoryRecord, SessionError> {
        self.finish()
    }

    /// First half of a delete: only ids that exist get a request
    pub fn request_history_delete(&self, id: &str) -> Option<DeleteRequest> {
        self.history.get(id).map(|r| DeleteRequest { id: r.id.clone() })
    }

    /// Second half of a delete, after the user confirmed. Irreversible.
    pub fn confirm_history_delete(&mut self, request: DeleteRequest) -> bool {
        let deleted = match self.history.delete(&request.id, &self.store) {
            Ok(deleted) => deleted,
            Err(e) => {
                warn!("Failed to persist history: {}", e);
                true
            }
        };
        if deleted {
            info!(id = %request.id, "History record deleted");
            let len = self.history.len();
            self.emit(SessionEvent::HistoryChanged { len });
        }
        deleted
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        if let Err(e) = self.theme.save(&self.store) {
            warn!("Failed to persist theme: {}", e);
        }
        let theme = self.theme;
        self.emit(SessionEvent::ThemeChanged(theme));
        theme
    }
}
