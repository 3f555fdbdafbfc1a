//! Combo bookkeeping
//!
//! A combo is a chain of pops each landing within the timeout of the previous
//! one. The chain is broken two ways: lazily, when the next pop arrives too
//! late, and eagerly, by a single idle-reset deadline that every pop cancels
//! and replaces. Each deadline carries a generation; only the newest one may
//! fire.

use serde::{Deserialize, Serialize};

/// Result of recording one pop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComboStep {
    /// Combo count including this pop (always >= 1)
    pub count: u32,
    /// True if this pop extended an existing chain
    pub continuation: bool,
}

/// The one pending idle reset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdleReset {
    /// Timestamp (ms) at which the combo lapses
    pub due: u64,
    pub generation: u64,
}

#[derive(Debug, Clone)]
pub struct ComboTracker {
    timeout_ms: u64,
    count: u32,
    last_pop: Option<u64>,
    generation: u64,
    pending: Option<IdleReset>,
}

impl ComboTracker {
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            count: 0,
            last_pop: None,
            generation: 0,
            pending: None,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn last_pop(&self) -> Option<u64> {
        self.last_pop
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Currently armed idle reset, if any
    pub fn pending_reset(&self) -> Option<IdleReset> {
        self.pending
    }

    /// Record a pop at `now` (ms) and re-arm the idle reset
    pub fn record_pop(&mut self, now: u64) -> ComboStep {
        let continuation = self
            .last_pop
            .is_some_and(|last| now.saturating_sub(last) < self.timeout_ms);
        self.count = if continuation { self.count + 1 } else { 1 };
        self.last_pop = Some(now);
        self.arm(now + self.timeout_ms);

        ComboStep {
            count: self.count,
            continuation,
        }
    }

    /// Fire an idle reset. Stale generations are ignored.
    /// Returns true if the combo was actually reset.
    pub fn fire_reset(&mut self, generation: u64) -> bool {
        match self.pending {
            Some(pending) if pending.generation == generation => {
                self.pending = None;
                self.count = 0;
                true
            }
            _ => false,
        }
    }

    /// Drop the pending reset without touching the count (pause/end)
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.pending = None;
    }

    /// Slide the chain forward by a paused interval and re-arm
    pub fn shift(&mut self, paused_ms: u64) {
        let Some(last) = self.last_pop else { return };
        let last = last + paused_ms;
        self.last_pop = Some(last);
        if self.count > 0 {
            self.arm(last + self.timeout_ms);
        }
    }

    /// Forget everything (new round)
    pub fn clear(&mut self) {
        self.cancel();
        self.count = 0;
        self.last_pop = None;
    }

    fn arm(&mut self, due: u64) {
        self.generation += 1;
        self.pending = Some(IdleReset {
            due,
            generation: self.generation,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TIMEOUT: u64 = 1500;

    #[test]
    fn test_first_pop_starts_chain() {
        let mut combo = ComboTracker::new(TIMEOUT);
        let step = combo.record_pop(0);
        assert_eq!(step, ComboStep { count: 1, continuation: false });
    }

    #[test]
    fn test_late_pop_restarts_at_one() {
        let mut combo = ComboTracker::new(TIMEOUT);
        combo.record_pop(1000);
        combo.record_pop(2000);
        assert_eq!(combo.count(), 2);

        // Exactly at the timeout is too late
        let step = combo.record_pop(3500);
        assert_eq!(step, ComboStep { count: 1, continuation: false });
    }

    #[test]
    fn test_idle_reset_fires_once() {
        let mut combo = ComboTracker::new(TIMEOUT);
        combo.record_pop(100);
        let pending = combo.pending_reset().unwrap();
        assert_eq!(pending.due, 1600);

        assert!(combo.fire_reset(pending.generation));
        assert_eq!(combo.count(), 0);
        assert!(combo.pending_reset().is_none());
        assert!(!combo.fire_reset(pending.generation));
    }

    #[test]
    fn test_stale_reset_is_ignored() {
        let mut combo = ComboTracker::new(TIMEOUT);
        combo.record_pop(100);
        let stale = combo.pending_reset().unwrap();
        combo.record_pop(900);
        let fresh = combo.pending_reset().unwrap();

        assert_ne!(stale.generation, fresh.generation);
        assert_eq!(fresh.due, 2400);
        assert!(!combo.fire_reset(stale.generation));
        assert_eq!(combo.count(), 2);
    }

    #[test]
    fn test_shift_preserves_window() {
        let mut combo = ComboTracker::new(TIMEOUT);
        combo.record_pop(1000);
        combo.cancel();
        assert!(combo.pending_reset().is_none());

        // Paused for 10s; 1s of active time later is still a continuation
        combo.shift(10_000);
        assert_eq!(combo.pending_reset().unwrap().due, 12_500);
        let step = combo.record_pop(12_000);
        assert!(step.continuation);
        assert_eq!(step.count, 2);
    }

    proptest! {
        #[test]
        fn fast_pops_count_up(gaps in prop::collection::vec(0u64..TIMEOUT, 0..64)) {
            let mut combo = ComboTracker::new(TIMEOUT);
            let mut now = 10_000;
            combo.record_pop(now);
            for gap in &gaps {
                now += gap;
                combo.record_pop(now);
            }
            prop_assert_eq!(combo.count() as usize, gaps.len() + 1);
        }

        #[test]
        fn slow_pop_resets_to_one(prefix in 1u32..30, gap in TIMEOUT..100_000) {
            let mut combo = ComboTracker::new(TIMEOUT);
            for i in 0..prefix {
                combo.record_pop(u64::from(i) * 10);
            }
            let last = combo.last_pop().unwrap();
            let step = combo.record_pop(last + gap);
            prop_assert_eq!(step.count, 1);
            prop_assert!(!step.continuation);
        }
    }
}
