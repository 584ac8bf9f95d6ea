//! Focus-mode timer: settle delay, 3-2-1 lead-in, countdown/stopwatch, rest
//!
//! All transitions take the current `Instant` so the caller decides how
//! often to poll. Elapsed time is measured from wall-clock deltas, never
//! from the number of polls.

use std::time::{Duration, Instant};
use tracing::debug;

const ONE_SECOND: Duration = Duration::from_secs(1);

const SECOND_UNITS: &[&str] = &["秒", "seconds", "second", "secs", "sec"];
const MINUTE_UNITS: &[&str] = &["分鐘", "分钟", "分", "minutes", "minute", "mins", "min"];

/// Duration in seconds encoded in a prescription ("45 秒", "1 分鐘", "30 seconds").
/// Rep-style prescriptions ("10 下", "8-10 reps") return `None`.
pub fn prescribed_seconds(prescription: &str) -> Option<u32> {
    let mut rest = prescription;

    while let Some(start) = rest.find(|c: char| c.is_ascii_digit()) {
        let tail = &rest[start..];
        let end = tail.find(|c: char| !c.is_ascii_digit()).unwrap_or(tail.len());
        let after = &tail[end..];

        // Fractions ("0.5 分鐘") are not whole-second durations
        if let Some(fraction) = after.strip_prefix('.')
            && fraction.starts_with(|c: char| c.is_ascii_digit())
        {
            let skip = fraction.find(|c: char| !c.is_ascii_digit()).unwrap_or(fraction.len());
            rest = &fraction[skip..];
            continue;
        }

        if let Ok(n) = tail[..end].parse::<u32>()
            && let Some(multiplier) = unit_multiplier(after.trim_start())
        {
            return Some(n.saturating_mul(multiplier));
        }
        rest = after;
    }

    None
}

fn unit_multiplier(text: &str) -> Option<u32> {
    let lower = text.to_lowercase();
    for (units, multiplier) in [(SECOND_UNITS, 1), (MINUTE_UNITS, 60)] {
        for unit in units {
            let Some(after) = lower.strip_prefix(unit) else {
                continue;
            };
            // "min" must not match "minimal"
            if unit.is_ascii() && after.chars().next().is_some_and(char::is_alphabetic) {
                continue;
            }
            return Some(multiplier);
        }
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    Countdown,
    Stopwatch,
}

impl TimerMode {
    /// Mode and starting value for an exercise prescription
    pub fn seed_for(prescription: Option<&str>) -> (TimerMode, u32) {
        match prescription.and_then(prescribed_seconds) {
            Some(secs) => (TimerMode::Countdown, secs),
            None => (TimerMode::Stopwatch, 0),
        }
    }
}

/// Snapshot of the timer for the exercise in focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerState {
    /// Remaining seconds (countdown) or elapsed seconds (stopwatch)
    pub value: u32,
    pub initial: u32,
    pub mode: TimerMode,
    pub running: bool,
    pub resting: bool,
    /// 3, 2, 1 while the lead-in is showing
    pub lead_in: Option<u8>,
}

impl TimerState {
    fn seeded(prescription: Option<&str>) -> Self {
        let (mode, value) = TimerMode::seed_for(prescription);
        Self {
            value,
            initial: value,
            mode,
            running: false,
            resting: false,
            lead_in: None,
        }
    }

    /// Countdown finished and waiting for the user
    pub fn is_done(&self) -> bool {
        self.mode == TimerMode::Countdown && self.value == 0 && !self.resting
    }

    /// "mm:ss" rendering of the current value
    pub fn clock(&self) -> String {
        format!("{:02}:{:02}", self.value / 60, self.value % 60)
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::seeded(None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    pub lead_in_secs: u8,
    /// Delay before the lead-in when entering focus or moving to the next exercise
    pub entry_settle: Duration,
    /// Delay before the lead-in when a rest ends
    pub rest_settle: Duration,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            lead_in_secs: 3,
            entry_settle: Duration::from_millis(600),
            rest_settle: Duration::from_millis(400),
        }
    }
}

/// Handle for a scheduled lead-in start. Only the most recently issued
/// ticket can fire; reseeding, resting or leaving focus retires it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadInTicket {
    generation: u64,
    pub due: Instant,
}

#[derive(Debug)]
pub struct SessionTimer {
    config: TimerConfig,
    state: TimerState,
    generation: u64,
    pending: Option<LeadInTicket>,
    /// Time of the last lead-in step
    lead_in_anchor: Option<Instant>,
    /// Start of the not-yet-counted second while running
    tick_anchor: Option<Instant>,
}

impl SessionTimer {
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config,
            state: TimerState::default(),
            generation: 0,
            pending: None,
            lead_in_anchor: None,
            tick_anchor: None,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn pending(&self) -> Option<LeadInTicket> {
        self.pending
    }

    /// Reseed for a newly focused exercise and schedule its lead-in
    pub fn enter(&mut self, prescription: Option<&str>, now: Instant) -> LeadInTicket {
        self.reseed(prescription, now + self.config.entry_settle)
    }

    /// Leave rest: reseed from the exercise and schedule a lead-in after the shorter delay
    pub fn end_rest(&mut self, prescription: Option<&str>, now: Instant) -> LeadInTicket {
        self.reseed(prescription, now + self.config.rest_settle)
    }

    fn reseed(&mut self, prescription: Option<&str>, due: Instant) -> LeadInTicket {
        self.invalidate();
        self.state = TimerState::seeded(prescription);

        let ticket = LeadInTicket {
            generation: self.generation,
            due,
        };
        self.pending = Some(ticket);
        ticket
    }

    /// Retire any scheduled or in-progress lead-in
    fn invalidate(&mut self) {
        self.generation += 1;
        self.pending = None;
        self.lead_in_anchor = None;
        self.state.lead_in = None;
    }

    /// Start the lead-in for `ticket`. Stale or early tickets are ignored.
    pub fn fire(&mut self, ticket: LeadInTicket, now: Instant) -> bool {
        if ticket.generation != self.generation || self.pending != Some(ticket) {
            debug!(ticket = ticket.generation, current = self.generation, "Ignoring stale lead-in");
            return false;
        }
        if now < ticket.due {
            return false;
        }

        self.pending = None;
        if self.config.lead_in_secs == 0 {
            self.begin_counting(now);
        } else {
            self.state.lead_in = Some(self.config.lead_in_secs);
            self.lead_in_anchor = Some(now);
        }
        true
    }

    /// Advance by wall-clock time. Returns true when the state changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if let Some(ticket) = self.pending {
            return self.fire(ticket, now);
        }

        if let (Some(count), Some(anchor)) = (self.state.lead_in, self.lead_in_anchor) {
            // One step per check, however long the caller stalled
            if now.saturating_duration_since(anchor) < ONE_SECOND {
                return false;
            }
            let next = count.saturating_sub(1);
            if next == 0 {
                self.begin_counting(now);
            } else {
                self.state.lead_in = Some(next);
                self.lead_in_anchor = Some(now);
            }
            return true;
        }

        if !self.state.running {
            return false;
        }
        let Some(anchor) = self.tick_anchor else {
            self.tick_anchor = Some(now);
            return false;
        };

        let secs = now.saturating_duration_since(anchor).as_secs();
        if secs == 0 {
            return false;
        }
        self.tick_anchor = Some(anchor + Duration::from_secs(secs));
        let step = u32::try_from(secs).unwrap_or(u32::MAX);

        match self.state.mode {
            TimerMode::Countdown => {
                self.state.value = self.state.value.saturating_sub(step);
                if self.state.value == 0 {
                    self.state.running = false;
                    self.tick_anchor = None;
                }
            }
            TimerMode::Stopwatch => {
                self.state.value = self.state.value.saturating_add(step);
            }
        }
        true
    }

    fn begin_counting(&mut self, now: Instant) {
        self.state.lead_in = None;
        self.lead_in_anchor = None;
        self.state.running = true;
        self.tick_anchor = Some(now);
        if self.state.is_done() {
            self.state.running = false;
            self.tick_anchor = None;
        }
    }

    /// Start/pause. Ignored while a lead-in is scheduled or showing,
    /// and a finished countdown stays stopped.
    pub fn toggle(&mut self, now: Instant) -> bool {
        if self.pending.is_some() || self.state.lead_in.is_some() {
            return false;
        }
        if self.state.running {
            self.state.running = false;
            self.tick_anchor = None;
            return true;
        }
        if self.state.is_done() {
            return false;
        }
        self.state.running = true;
        self.tick_anchor = Some(now);
        true
    }

    /// Rest always counts up from zero and overrides the exercise timer
    pub fn start_rest(&mut self, now: Instant) {
        self.invalidate();
        self.state = TimerState {
            value: 0,
            initial: 0,
            mode: TimerMode::Stopwatch,
            running: true,
            resting: true,
            lead_in: None,
        };
        self.tick_anchor = Some(now);
    }

    /// Focus view closed: stop counting and drop any scheduled lead-in
    pub fn suspend(&mut self) {
        self.invalidate();
        self.state.running = false;
        self.tick_anchor = None;
    }
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self::new(TimerConfig::default())
    }
}
