//! Per-lane synchronization state
//!
//! One [`Lane`] owns everything the engine tracks for a physical serial
//! input: the delay-tap position, the windowed phase integrator, the
//! framing rotation, and the most recent words. Lanes are created once
//! at engine initialization and only ever reset, never destroyed.

use crate::sync::bitslip::BitSlip;
use crate::sync::phase_detector::PhaseAccumulator;
use crate::types::{Direction, OverflowPolicy, PhaseSense, TapValue};

/// State of one physical serial input
#[derive(Clone, Copy, Debug)]
pub struct Lane {
    index: u8,
    tap: TapValue,
    phase: PhaseAccumulator,
    slip: BitSlip,
    raw_word: u16,
    output_word: u16,
}

impl Lane {
    /// Create a lane for an S-bit deserializer
    #[must_use]
    pub const fn new(index: u8, width: u8) -> Self {
        Self {
            index,
            tap: TapValue::MIN,
            phase: PhaseAccumulator::new(),
            slip: BitSlip::new(width),
            raw_word: 0,
            output_word: 0,
        }
    }

    /// Lane index within the engine
    #[must_use]
    pub const fn index(&self) -> u8 {
        self.index
    }

    /// Current delay-tap value
    #[must_use]
    pub const fn tap(&self) -> TapValue {
        self.tap
    }

    /// Phase-error value latched at the last window boundary
    #[must_use]
    pub const fn snapshot(&self) -> i32 {
        self.phase.snapshot()
    }

    /// Running in-window phase-error value
    #[must_use]
    pub const fn accumulator(&self) -> i32 {
        self.phase.accumulator()
    }

    /// Current framing rotation count
    #[must_use]
    pub const fn rotation(&self) -> u8 {
        self.slip.rotation()
    }

    /// Most recent raw deserialized word
    #[must_use]
    pub const fn raw_word(&self) -> u16 {
        self.raw_word
    }

    /// Most recent assembled output word (framed and bit-ordered)
    #[must_use]
    pub const fn word(&self) -> u16 {
        self.output_word
    }

    /// Store this cycle's raw deserializer output
    pub fn set_raw_word(&mut self, word: u16) {
        self.raw_word = word;
    }

    /// Store this cycle's assembled output word
    pub fn set_output_word(&mut self, word: u16) {
        self.output_word = word;
    }

    /// Fold one phase pulse into the running accumulator
    pub fn record_phase(&mut self, sense: PhaseSense, policy: OverflowPolicy) {
        self.phase.record(sense, policy);
    }

    /// Latch the accumulator into the snapshot (window boundary)
    pub fn latch_snapshot(&mut self) {
        self.phase.latch();
    }

    /// Apply one framing rotation
    pub fn bitslip(&mut self) {
        self.slip.slip();
    }

    /// Rotate the raw word into the current framing
    #[must_use]
    pub fn framed_word(&self) -> u16 {
        self.slip.apply(self.raw_word)
    }

    /// Move the delay tap one step, clamped at the bounds
    ///
    /// Returns `true` when the tap actually moved; a pulse at a bound is
    /// a no-op and must not be forwarded to the delay element.
    pub fn apply_adjustment(&mut self, direction: Direction) -> bool {
        let next = self.tap.adjusted(direction);
        let moved = next != self.tap;
        self.tap = next;
        moved
    }

    /// Return the delay tap to zero (delay-element reset)
    pub fn reset_tap(&mut self) {
        self.tap = TapValue::MIN;
    }

    /// Return every field to its power-on value (external reset)
    pub fn reset(&mut self) {
        self.tap = TapValue::MIN;
        self.phase.reset();
        self.slip.reset();
        self.raw_word = 0;
        self.output_word = 0;
    }
}
