//! Phase detector accumulator
//!
//! The sampling hardware emits early/late pulses that say which side of
//! the data eye the current sampling instant sits on. Individual pulses
//! are noisy; they are integrated over a configurable window and only
//! the latched window total drives delay adjustments.

use crate::types::{OverflowPolicy, PhaseSense};

/// Free-running integration window counter
///
/// Counts sample-clock cycles up to the configured period. The cycle in
/// which the count reaches the period is the window boundary: per-lane
/// accumulators latch and reset, and no pulse is accumulated in that
/// cycle.
#[derive(Clone, Copy, Debug)]
pub struct IntegrationWindow {
    period: u32,
    count: u32,
}

impl IntegrationWindow {
    /// Create a window of the given length in sample-clock cycles
    #[must_use]
    pub const fn new(period: u32) -> Self {
        Self { period, count: 0 }
    }

    /// Window length in cycles
    #[must_use]
    pub const fn period(&self) -> u32 {
        self.period
    }

    /// Change the window length
    ///
    /// Takes effect immediately; shortening the window below the current
    /// count forces a boundary on the next tick.
    pub fn set_period(&mut self, period: u32) {
        self.period = period;
    }

    /// Current cycle count within the window
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Advance one cycle; returns `true` on a window boundary
    pub fn tick(&mut self) -> bool {
        if self.count >= self.period {
            self.count = 0;
            true
        } else {
            self.count += 1;
            false
        }
    }

    /// Check for the adjustment-evaluation cycle (the tick right after
    /// a boundary, when every lane's snapshot is freshly latched)
    #[must_use]
    pub const fn at_evaluation(&self) -> bool {
        self.count == 1
    }

    /// Restart the window from zero
    pub fn reset(&mut self) {
        self.count = 0;
    }
}

/// Per-lane windowed phase-error integrator
#[derive(Clone, Copy, Debug, Default)]
pub struct PhaseAccumulator {
    accumulator: i32,
    snapshot: i32,
}

impl PhaseAccumulator {
    /// Create a zeroed integrator
    #[must_use]
    pub const fn new() -> Self {
        Self {
            accumulator: 0,
            snapshot: 0,
        }
    }

    /// Fold one phase pulse into the running accumulator
    pub fn record(&mut self, sense: PhaseSense, policy: OverflowPolicy) {
        self.accumulator = policy.accumulate(self.accumulator, sense.weight());
    }

    /// Latch the running value into the snapshot and reset the
    /// accumulator (window boundary)
    pub fn latch(&mut self) {
        self.snapshot = self.accumulator;
        self.accumulator = 0;
    }

    /// Running in-window value
    #[must_use]
    pub const fn accumulator(&self) -> i32 {
        self.accumulator
    }

    /// Value latched at the last window boundary
    ///
    /// Stable between boundaries; this is the only value the adjustment
    /// logic may read.
    #[must_use]
    pub const fn snapshot(&self) -> i32 {
        self.snapshot
    }

    /// Clear both the running value and the snapshot
    pub fn reset(&mut self) {
        self.accumulator = 0;
        self.snapshot = 0;
    }
}
