//! Running call and cost counters for one run.

use serde::Serialize;
use std::sync::{Mutex, PoisonError};

/// Totals accumulated over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct UsageTotals {
    pub calls: u64,
    pub failed_calls: u64,
    pub chars_in: u64,
    pub chars_out: u64,
    pub cost: f64,
}

/// Shared accumulator. Cloned `Arc`s of it are held by every metered model
/// of a run, so concurrent branches update the same totals.
#[derive(Debug, Default)]
pub struct UsageTracker {
    totals: Mutex<UsageTotals>,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self, chars_in: usize, chars_out: usize, cost: f64) {
        let mut totals = self.totals.lock().unwrap_or_else(PoisonError::into_inner);
        totals.calls += 1;
        totals.chars_in += chars_in as u64;
        totals.chars_out += chars_out as u64;
        totals.cost += cost;
    }

    pub fn record_failure(&self, chars_in: usize) {
        let mut totals = self.totals.lock().unwrap_or_else(PoisonError::into_inner);
        totals.calls += 1;
        totals.failed_calls += 1;
        totals.chars_in += chars_in as u64;
    }

    pub fn totals(&self) -> UsageTotals {
        *self.totals.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates() {
        let tracker = UsageTracker::new();
        tracker.record_success(10, 5, 0.5);
        tracker.record_success(20, 5, 0.25);
        tracker.record_failure(7);

        let totals = tracker.totals();
        assert_eq!(totals.calls, 3);
        assert_eq!(totals.failed_calls, 1);
        assert_eq!(totals.chars_in, 37);
        assert_eq!(totals.chars_out, 10);
        assert!((totals.cost - 0.75).abs() < 1e-9);
    }
}
