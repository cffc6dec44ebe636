//! Telemetry / control register interface
//!
//! The only point of contact between the engine and the external
//! controller. [`EngineLink`] is the shared register block both domains
//! see; [`ControlPort`] is the controller's view, running every status
//! value through the double-register discipline from [`crate::crossing`].
//! The engine's view is the write half: it consumes request pulses and
//! publishes status through its [`TelemetryExporter`] capability.

use crate::config::{DEFAULT_INTEGRATION_PERIOD, MAX_LANES};
use crate::crossing::{MultiReg, PulseSynchronizer, SyncedWord};

/// Number of combined-sample registers (one per adjacent lane pair)
pub const LANE_PAIRS: usize = MAX_LANES / 2;

/// Shared register block between the control and sample domains
///
/// All fields are crossing primitives; neither domain ever touches the
/// other's state directly.
#[derive(Debug)]
pub struct EngineLink {
    // control -> sample request pulses
    pub(crate) bitslip: PulseSynchronizer,
    pub(crate) delay_inc: PulseSynchronizer,
    pub(crate) delay_dec: PulseSynchronizer,
    // control -> sample levels
    pub(crate) auto_enable: SyncedWord,
    pub(crate) manual_lane: SyncedWord,
    pub(crate) integration_period: SyncedWord,
    // sample -> control status
    pub(crate) ready: SyncedWord,
    pub(crate) indicator: SyncedWord,
    pub(crate) delay_taps: [SyncedWord; MAX_LANES],
    pub(crate) phase_snapshots: [SyncedWord; MAX_LANES],
    pub(crate) lane_words: [SyncedWord; MAX_LANES],
    pub(crate) combined_words: [SyncedWord; LANE_PAIRS],
}

impl EngineLink {
    /// Create a register block with power-on values
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bitslip: PulseSynchronizer::new(),
            delay_inc: PulseSynchronizer::new(),
            delay_dec: PulseSynchronizer::new(),
            auto_enable: SyncedWord::new(0),
            manual_lane: SyncedWord::new(0),
            integration_period: SyncedWord::new(DEFAULT_INTEGRATION_PERIOD),
            ready: SyncedWord::new(0),
            indicator: SyncedWord::new(0),
            delay_taps: [const { SyncedWord::new(0) }; MAX_LANES],
            phase_snapshots: [const { SyncedWord::new(0) }; MAX_LANES],
            lane_words: [const { SyncedWord::new(0) }; MAX_LANES],
            combined_words: [const { SyncedWord::new(0) }; LANE_PAIRS],
        }
    }
}

impl Default for EngineLink {
    fn default() -> Self {
        Self::new()
    }
}

/// One tick's worth of engine status, as published to the link
#[derive(Clone, Copy, Debug)]
pub struct EngineStatus {
    /// Startup timeline complete
    pub ready: bool,
    /// Debug indicator level
    pub indicator: bool,
    /// Number of valid entries in the per-lane arrays
    pub lane_count: usize,
    /// Per-lane delay-tap values
    pub delay_taps: [u8; MAX_LANES],
    /// Per-lane latched phase-error snapshots
    pub phase_snapshots: [i32; MAX_LANES],
    /// Per-lane assembled output words
    pub lane_words: [u16; MAX_LANES],
    /// Combined interleaved samples, one per adjacent lane pair
    pub combined_words: [u32; LANE_PAIRS],
}

impl EngineStatus {
    /// An all-zero status (engine not yet ticked)
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            ready: false,
            indicator: false,
            lane_count: 0,
            delay_taps: [0; MAX_LANES],
            phase_snapshots: [0; MAX_LANES],
            lane_words: [0; MAX_LANES],
            combined_words: [0; LANE_PAIRS],
        }
    }
}

/// Capability for publishing engine status out of the sample domain
pub trait TelemetryExporter {
    /// Publish one tick's status
    fn export(&mut self, status: &EngineStatus);
}

impl TelemetryExporter for &EngineLink {
    fn export(&mut self, status: &EngineStatus) {
        self.ready.publish(u32::from(status.ready));
        self.indicator.publish(u32::from(status.indicator));
        for (word, tap) in self.delay_taps.iter().zip(status.delay_taps.iter()) {
            word.publish(u32::from(*tap));
        }
        for (word, snapshot) in self
            .phase_snapshots
            .iter()
            .zip(status.phase_snapshots.iter())
        {
            word.publish(*snapshot as u32);
        }
        for (word, lane_word) in self.lane_words.iter().zip(status.lane_words.iter()) {
            word.publish(u32::from(*lane_word));
        }
        for (word, combined) in self.combined_words.iter().zip(status.combined_words.iter()) {
            word.publish(*combined);
        }
    }
}

/// Controller-side view of the register block
///
/// Reads are settled through double registers: call [`ControlPort::refresh`]
/// once per control-domain poll cycle, then read. A freshly published
/// engine value becomes visible after two refreshes.
#[derive(Debug)]
pub struct ControlPort<'a> {
    link: &'a EngineLink,
    ready: MultiReg,
    indicator: MultiReg,
    delay_taps: [MultiReg; MAX_LANES],
    phase_snapshots: [MultiReg; MAX_LANES],
    lane_words: [MultiReg; MAX_LANES],
    combined_words: [MultiReg; LANE_PAIRS],
}

impl<'a> ControlPort<'a> {
    /// Attach a port to a register block
    #[must_use]
    pub const fn new(link: &'a EngineLink) -> Self {
        Self {
            link,
            ready: MultiReg::new(0),
            indicator: MultiReg::new(0),
            delay_taps: [MultiReg::new(0); MAX_LANES],
            phase_snapshots: [MultiReg::new(0); MAX_LANES],
            lane_words: [MultiReg::new(0); MAX_LANES],
            combined_words: [MultiReg::new(0); LANE_PAIRS],
        }
    }

    /// One control-domain observation cycle: advance every status value
    /// through its double registers
    pub fn refresh(&mut self) {
        self.ready.capture(&self.link.ready);
        self.indicator.capture(&self.link.indicator);
        for (sync, word) in self.delay_taps.iter_mut().zip(self.link.delay_taps.iter()) {
            sync.capture(word);
        }
        for (sync, word) in self
            .phase_snapshots
            .iter_mut()
            .zip(self.link.phase_snapshots.iter())
        {
            sync.capture(word);
        }
        for (sync, word) in self.lane_words.iter_mut().zip(self.link.lane_words.iter()) {
            sync.capture(word);
        }
        for (sync, word) in self
            .combined_words
            .iter_mut()
            .zip(self.link.combined_words.iter())
        {
            sync.capture(word);
        }
    }

    /// Startup-done level; low forever indicates a missing or unstable
    /// bit clock (hardware-health condition, no retry exists)
    #[must_use]
    pub fn ready(&self) -> bool {
        self.ready.settled() != 0
    }

    /// Debug indicator level
    #[must_use]
    pub fn indicator(&self) -> bool {
        self.indicator.settled() != 0
    }

    /// Current delay-tap value for a lane
    #[must_use]
    pub fn delay_value(&self, lane: usize) -> Option<u8> {
        self.delay_taps.get(lane).map(|s| s.settled() as u8)
    }

    /// Latched phase-error snapshot for a lane
    #[must_use]
    pub fn phase_snapshot(&self, lane: usize) -> Option<i32> {
        self.phase_snapshots.get(lane).map(|s| s.settled() as i32)
    }

    /// Most recent assembled word for a lane
    #[must_use]
    pub fn data_peek(&self, lane: usize) -> Option<u16> {
        self.lane_words.get(lane).map(|s| s.settled() as u16)
    }

    /// Combined interleaved sample for an adjacent lane pair
    #[must_use]
    pub fn combined_peek(&self, pair: usize) -> Option<u32> {
        self.combined_words.get(pair).map(MultiReg::settled)
    }

    /// Request one framing rotation on every lane
    ///
    /// Returns `false` while a previous request is still in flight.
    pub fn trigger_bitslip(&self) -> bool {
        self.link.bitslip.trigger()
    }

    /// Request one manual delay increment on the selected lane
    pub fn request_delay_increment(&self) -> bool {
        self.link.delay_inc.trigger()
    }

    /// Request one manual delay decrement on the selected lane
    pub fn request_delay_decrement(&self) -> bool {
        self.link.delay_dec.trigger()
    }

    /// Select which lane manual adjustments target
    pub fn select_lane(&self, lane: u8) {
        self.link.manual_lane.publish(u32::from(lane));
    }

    /// Switch between automatic and manual delay adjustment
    pub fn set_auto_control(&self, enabled: bool) {
        self.link.auto_enable.publish(u32::from(enabled));
    }

    /// Set the phase-integration window length in sample-clock cycles
    pub fn set_integration_period(&self, period: u32) {
        self.link.integration_period.publish(period);
    }
}
