//! Clock-domain synchronization primitives
//!
//! The engine runs in two independently-clocked contexts: a slow control
//! domain (register accesses, alignment search) and the fast sample
//! domain derived from the recovered bit clock. These primitives are the
//! only legal traffic between them.
//!
//! Two disciplines are provided:
//!
//! - [`PulseSynchronizer`]: a single-slot, exactly-once pulse crossing.
//!   At most one pulse of a kind is in flight; a request made while one
//!   is pending is rejected at the source, never queued and never
//!   duplicated. This holds for any clock-ratio combination because the
//!   slot is freed only when the destination consumes it.
//! - [`SyncedWord`] + [`MultiReg`]: a multi-bit value crossing. The
//!   source publishes freely; the destination runs the value through a
//!   two-stage register pipeline and only accepts it once it has been
//!   stable for two destination-domain observations.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Single-slot pulse crossing between clock domains
///
/// `trigger` is called from the source domain, `take` from the
/// destination domain. Both sides operate through a shared reference.
#[derive(Debug, Default)]
pub struct PulseSynchronizer {
    pending: AtomicBool,
}

impl PulseSynchronizer {
    /// Create an idle synchronizer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
        }
    }

    /// Request a pulse from the source domain
    ///
    /// Returns `false` if a previous pulse has not yet been consumed;
    /// the request is dropped in that case (lost update by construction,
    /// requests are user-paced single pulses).
    pub fn trigger(&self) -> bool {
        self.pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Check for an unconsumed pulse
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Consume the pulse in the destination domain
    ///
    /// Returns `true` exactly once per accepted `trigger`.
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }
}

/// Source side of a multi-bit value crossing
///
/// A plain shared word the owning domain publishes into. Readers in the
/// other domain must filter it through a [`MultiReg`]; the raw value is
/// not settled.
#[derive(Debug)]
pub struct SyncedWord {
    raw: AtomicU32,
}

impl SyncedWord {
    /// Create a word with the given reset value
    #[must_use]
    pub const fn new(reset: u32) -> Self {
        Self {
            raw: AtomicU32::new(reset),
        }
    }

    /// Publish a new value from the owning domain
    pub fn publish(&self, value: u32) {
        self.raw.store(value, Ordering::Release);
    }

    /// Read the raw, unsettled value
    #[must_use]
    pub fn load_raw(&self) -> u32 {
        self.raw.load(Ordering::Acquire)
    }
}

/// Destination-side double-register synchronizer for a [`SyncedWord`]
///
/// Call [`MultiReg::capture`] once per destination-domain cycle. The
/// settled output changes only after the source value has been observed
/// identical for two consecutive captures.
#[derive(Clone, Copy, Debug)]
pub struct MultiReg {
    stages: [u32; 2],
    settled: u32,
}

impl MultiReg {
    /// Create a synchronizer with the given reset value in every stage
    #[must_use]
    pub const fn new(reset: u32) -> Self {
        Self {
            stages: [reset; 2],
            settled: reset,
        }
    }

    /// Shift the source value through the register stages
    ///
    /// Returns the settled value, which lags the source by at least two
    /// destination-domain cycles.
    pub fn capture(&mut self, source: &SyncedWord) -> u32 {
        self.stages[1] = self.stages[0];
        self.stages[0] = source.load_raw();
        if self.stages[0] == self.stages[1] {
            self.settled = self.stages[0];
        }
        self.settled
    }

    /// Last settled value without advancing the pipeline
    #[must_use]
    pub const fn settled(&self) -> u32 {
        self.settled
    }
}
