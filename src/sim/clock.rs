//! Round countdown
//!
//! Time remaining is never decremented in place. It is always derived from
//! the start time, the current time and the total paused duration, so any
//! number of pause/resume cycles cannot make it drift.

use serde::{Deserialize, Serialize};

use crate::consts::COUNTDOWN_INTERVAL_MS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundClock {
    duration_secs: u32,
    started_at: u64,
    /// Sum of all completed pauses (ms)
    paused_total: u64,
    /// Set while paused
    paused_at: Option<u64>,
}

impl RoundClock {
    pub fn new(duration_secs: u32, now: u64) -> Self {
        Self {
            duration_secs,
            started_at: now,
            paused_total: 0,
            paused_at: None,
        }
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn paused_total(&self) -> u64 {
        self.paused_total
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Start a pause. Returns false if already paused.
    pub fn pause(&mut self, now: u64) -> bool {
        if self.paused_at.is_some() {
            return false;
        }
        self.paused_at = Some(now);
        true
    }

    /// End a pause, returning how long it lasted
    pub fn resume(&mut self, now: u64) -> Option<u64> {
        let paused_at = self.paused_at.take()?;
        let paused_for = now.saturating_sub(paused_at);
        self.paused_total += paused_for;
        Some(paused_for)
    }

    /// Unpaused time since the round started (ms)
    pub fn active_elapsed(&self, now: u64) -> u64 {
        let now = self.paused_at.unwrap_or(now);
        now.saturating_sub(self.started_at)
            .saturating_sub(self.paused_total)
    }

    /// Whole seconds left in the round
    pub fn remaining_secs(&self, now: u64) -> u32 {
        let elapsed_secs = self.active_elapsed(now) / COUNTDOWN_INTERVAL_MS;
        u64::from(self.duration_secs).saturating_sub(elapsed_secs) as u32
    }

    /// Wall-clock time of the next whole second of active time
    pub fn next_tick_at(&self, now: u64) -> u64 {
        let into_second = self.active_elapsed(now) % COUNTDOWN_INTERVAL_MS;
        now + (COUNTDOWN_INTERVAL_MS - into_second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_down_in_whole_seconds() {
        let clock = RoundClock::new(30, 5_000);
        assert_eq!(clock.remaining_secs(5_000), 30);
        assert_eq!(clock.remaining_secs(5_999), 30);
        assert_eq!(clock.remaining_secs(6_000), 29);
        assert_eq!(clock.remaining_secs(35_000), 0);
        assert_eq!(clock.remaining_secs(100_000), 0);
    }

    #[test]
    fn test_pause_excluded_from_elapsed() {
        let mut clock = RoundClock::new(30, 0);
        assert!(clock.pause(10_300));
        assert_eq!(clock.remaining_secs(10_300), 20);
        // Frozen while paused
        assert_eq!(clock.remaining_secs(60_000), 20);

        assert_eq!(clock.resume(60_000), Some(49_700));
        assert_eq!(clock.remaining_secs(60_000), 20);
        assert_eq!(clock.next_tick_at(60_000), 60_700);
        assert_eq!(clock.remaining_secs(60_700), 19);
    }

    #[test]
    fn test_repeated_pauses_accumulate_once_each() {
        let mut clock = RoundClock::new(30, 0);
        let mut now = 0;
        for _ in 0..5 {
            now += 1_000;
            clock.pause(now);
            assert!(!clock.pause(now + 10));
            now += 7_777;
            clock.resume(now);
        }
        assert_eq!(clock.paused_total(), 5 * 7_777);
        assert_eq!(clock.active_elapsed(now), 5_000);
        assert_eq!(clock.remaining_secs(now), 25);
        assert_eq!(clock.resume(now), None);
    }
}
