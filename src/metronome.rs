//! Metronome beat scheduling
//!
//! Beats are scheduled a short window ahead of `now` so an audio or
//! display backend can place them precisely even when polled late.

use std::time::{Duration, Instant};

pub const MIN_BPM: u32 = 30;
pub const MAX_BPM: u32 = 120;
pub const BPM_STEP: u32 = 30;
pub const DEFAULT_BPM: u32 = 60;

/// How far past `now` beats are handed out
pub const SCHEDULE_AHEAD: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct Metronome {
    bpm: u32,
    muted: bool,
    next_beat: Option<Instant>,
}

impl Metronome {
    pub fn new() -> Self {
        Self {
            bpm: DEFAULT_BPM,
            muted: false,
            next_beat: None,
        }
    }

    pub fn bpm(&self) -> u32 {
        self.bpm
    }

    /// Beats per second, as shown next to the slider
    pub fn hz(&self) -> f32 {
        self.bpm as f32 / 60.0
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_playing(&self) -> bool {
        self.next_beat.is_some()
    }

    /// Clamp to 30-120 and snap to the 30 bpm grid
    pub fn set_bpm(&mut self, bpm: u32) {
        let clamped = bpm.clamp(MIN_BPM, MAX_BPM);
        self.bpm = ((clamped + BPM_STEP / 2) / BPM_STEP * BPM_STEP).clamp(MIN_BPM, MAX_BPM);
    }

    pub fn faster(&mut self) {
        self.set_bpm(self.bpm + BPM_STEP);
    }

    pub fn slower(&mut self) {
        self.set_bpm(self.bpm.saturating_sub(BPM_STEP));
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    fn interval(&self) -> Duration {
        Duration::from_secs(60) / self.bpm
    }

    /// First beat lands on `now`. No-op while already playing.
    pub fn start(&mut self, now: Instant) {
        if self.next_beat.is_none() {
            self.next_beat = Some(now);
        }
    }

    pub fn stop(&mut self) {
        self.next_beat = None;
    }

    /// Follow a running flag: start on rising edge, stop on falling edge
    pub fn follow(&mut self, playing: bool, now: Instant) {
        match (playing, self.is_playing()) {
            (true, false) => self.start(now),
            (false, true) => self.stop(),
            _ => {}
        }
    }

    /// Beats due up to `now + SCHEDULE_AHEAD`. Each beat is returned once.
    /// Muted metronomes keep time but report nothing.
    pub fn poll(&mut self, now: Instant) -> Vec<Instant> {
        let Some(mut next) = self.next_beat else {
            return Vec::new();
        };

        let horizon = now + SCHEDULE_AHEAD;
        let interval = self.interval();
        let mut beats = Vec::new();
        while next < horizon {
            beats.push(next);
            next += interval;
        }
        self.next_beat = Some(next);

        if self.muted { Vec::new() } else { beats }
    }
}

impl Default for Metronome {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bpm_bounds_and_steps() {
        let mut m = Metronome::new();
        assert_eq!(m.bpm(), 60);
        assert_eq!(m.hz(), 1.0);

        m.faster();
        m.faster();
        m.faster();
        assert_eq!(m.bpm(), 120);
        m.slower();
        m.slower();
        m.slower();
        m.slower();
        assert_eq!(m.bpm(), 30);

        m.set_bpm(80);
        assert_eq!(m.bpm(), 90);
        m.set_bpm(500);
        assert_eq!(m.bpm(), 120);
    }

    #[test]
    fn test_poll_schedules_ahead_once() {
        let mut m = Metronome::new();
        let t0 = Instant::now();
        assert!(m.poll(t0).is_empty());

        m.start(t0);
        assert_eq!(m.poll(t0), vec![t0]);
        assert!(m.poll(t0 + Duration::from_millis(500)).is_empty());

        // Inside the look-ahead window of the 1 s beat
        let beats = m.poll(t0 + Duration::from_millis(950));
        assert_eq!(beats, vec![t0 + Duration::from_secs(1)]);
    }

    #[test]
    fn test_poll_catches_up_after_stall() {
        let mut m = Metronome::new();
        m.set_bpm(120);
        let t0 = Instant::now();
        m.start(t0);

        let beats = m.poll(t0 + Duration::from_millis(1_950));
        // 0, 0.5, 1.0, 1.5, 2.0
        assert_eq!(beats.len(), 5);
    }

    #[test]
    fn test_muted_keeps_time_silently() {
        let mut m = Metronome::new();
        let t0 = Instant::now();
        m.toggle_mute();
        m.start(t0);
        assert!(m.poll(t0 + Duration::from_secs(3)).is_empty());

        m.toggle_mute();
        let beats = m.poll(t0 + Duration::from_secs(3));
        assert!(beats.is_empty());
        let beats = m.poll(t0 + Duration::from_millis(3_950));
        assert_eq!(beats, vec![t0 + Duration::from_secs(4)]);
    }

    #[test]
    fn test_follow_running_flag() {
        let mut m = Metronome::new();
        let t0 = Instant::now();
        m.follow(true, t0);
        assert!(m.is_playing());
        m.follow(true, t0 + Duration::from_secs(1));
        assert_eq!(m.poll(t0), vec![t0]);
        m.follow(false, t0);
        assert!(!m.is_playing());
    }
}
