//! Engine assembly and the sample-domain update step
//!
//! [`SyncEngine`] owns every lane's state and runs the whole
//! sample-clock side once per tick: startup sequencing, phase
//! integration, bit-slip requests, delay adjustment, and word assembly.
//! It is assembled from three capabilities (the lane PHYs it drives,
//! a [`TelemetryExporter`] it publishes through, and a
//! [`DebugIndicator`] it keeps alive) instead of being specialized
//! per board.

use heapless::Vec;

use crate::config::{
    DEFAULT_INITIAL_BITSLIPS, DEFAULT_RECAL_INTERVAL, DEFAULT_SERDES_WIDTH, MAX_LANES,
    MAX_SERDES_WIDTH, MIN_SERDES_WIDTH, POWER_ON_INTEGRATION_PERIOD,
};
use crate::crossing::MultiReg;
use crate::indicator::DebugIndicator;
use crate::phy::{CalTarget, LanePhy};
use crate::sync::calibration::{CalAction, CalState, CalibrationSequencer};
use crate::sync::deserializer::{interleave_pair, WordAssembler};
use crate::sync::lane::Lane;
use crate::sync::phase_detector::IntegrationWindow;
use crate::telemetry::{EngineLink, EngineStatus, TelemetryExporter};
use crate::types::{AdjustPolicy, BitOrder, Direction, OverflowPolicy};

/// Engine configuration error
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// No lane PHYs were supplied
    NoLanes,
    /// More lane PHYs than the engine can track
    TooManyLanes,
    /// Serialization factor outside the supported range
    WidthOutOfRange,
    /// Recalibration interval must be at least one cycle
    ZeroRecalInterval,
}

/// Result alias for configuration-time checks
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Static configuration of one engine instance
#[derive(Clone, Copy, Debug)]
pub struct EngineConfig {
    /// Serialization factor S (bits per frame)
    pub serdes_width: u8,
    /// Bit order of the serial source
    pub bit_order: BitOrder,
    /// Trigger condition for automatic adjustment
    pub adjust_policy: AdjustPolicy,
    /// Accumulator behavior at its bit-width limit
    pub overflow_policy: OverflowPolicy,
    /// Pre-rotation bit-slips issued during startup
    pub initial_bitslips: u8,
    /// Slave recalibration period in sample-clock cycles
    pub recal_interval: u32,
    /// Integration period in effect until the controller writes one
    pub integration_period: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            serdes_width: DEFAULT_SERDES_WIDTH,
            bit_order: BitOrder::MsbFirst,
            adjust_policy: AdjustPolicy::AnyNonZero,
            overflow_policy: OverflowPolicy::Wrapping,
            initial_bitslips: DEFAULT_INITIAL_BITSLIPS,
            recal_interval: DEFAULT_RECAL_INTERVAL,
            integration_period: POWER_ON_INTEGRATION_PERIOD,
        }
    }
}

impl EngineConfig {
    /// Check the configuration for internal consistency
    pub fn validate(&self) -> ConfigResult<()> {
        if self.serdes_width < MIN_SERDES_WIDTH || self.serdes_width > MAX_SERDES_WIDTH {
            return Err(ConfigError::WidthOutOfRange);
        }
        if self.recal_interval == 0 {
            return Err(ConfigError::ZeroRecalInterval);
        }
        Ok(())
    }
}

/// Capability interface of an assembled engine
pub trait LaneSynchronizer {
    /// Run one sample-clock cycle
    fn tick(&mut self);

    /// Startup timeline complete
    fn ready(&self) -> bool;

    /// Return to the power-on state (external reset)
    fn reset(&mut self);
}

/// The lane synchronization engine
///
/// Generic over the lane PHY capability `P`, the telemetry exporter `E`,
/// and the debug indicator `I`. All per-lane state is owned here and
/// mutated only by [`SyncEngine::tick`]; the control domain reaches in
/// exclusively through the crossing primitives of the attached
/// [`EngineLink`].
pub struct SyncEngine<'a, P, E, I> {
    config: EngineConfig,
    lanes: Vec<Lane, MAX_LANES>,
    phys: Vec<P, MAX_LANES>,
    sequencer: CalibrationSequencer,
    window: IntegrationWindow,
    assembler: WordAssembler,
    requests: &'a EngineLink,
    auto_sync: MultiReg,
    lane_select_sync: MultiReg,
    period_sync: MultiReg,
    exporter: E,
    indicator: I,
}

impl<'a, P, E, I> SyncEngine<'a, P, E, I>
where
    P: LanePhy,
    E: TelemetryExporter,
    I: DebugIndicator,
{
    /// Assemble an engine
    ///
    /// One lane is created per supplied PHY. Fails if the configuration
    /// is inconsistent or the lane count is unusable.
    pub fn new(
        config: EngineConfig,
        phys: impl IntoIterator<Item = P>,
        link: &'a EngineLink,
        exporter: E,
        indicator: I,
    ) -> ConfigResult<Self> {
        config.validate()?;
        let mut phy_vec: Vec<P, MAX_LANES> = Vec::new();
        for phy in phys {
            phy_vec
                .push(phy)
                .map_err(|_| ConfigError::TooManyLanes)?;
        }
        if phy_vec.is_empty() {
            return Err(ConfigError::NoLanes);
        }
        let phys = phy_vec;
        let mut lanes = Vec::new();
        for index in 0..phys.len() {
            // capacity bounded by phys, which shares MAX_LANES
            let _ = lanes.push(Lane::new(index as u8, config.serdes_width));
        }
        Ok(Self {
            config,
            lanes,
            phys,
            sequencer: CalibrationSequencer::new(config.initial_bitslips, config.recal_interval),
            window: IntegrationWindow::new(config.integration_period),
            assembler: WordAssembler::new(config.bit_order, config.serdes_width),
            requests: link,
            auto_sync: MultiReg::new(0),
            lane_select_sync: MultiReg::new(0),
            period_sync: MultiReg::new(config.integration_period),
            exporter,
            indicator,
        })
    }

    /// Number of lanes tracked
    #[must_use]
    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    /// Inspect one lane's state
    #[must_use]
    pub fn lane(&self, index: usize) -> Option<&Lane> {
        self.lanes.get(index)
    }

    /// Inspect one lane's PHY capability
    #[must_use]
    pub fn phy(&self, index: usize) -> Option<&P> {
        self.phys.get(index)
    }

    /// Mutable access to one lane's PHY capability
    ///
    /// Bench harnesses use this to perturb a simulated lane while the
    /// engine runs.
    pub fn phy_mut(&mut self, index: usize) -> Option<&mut P> {
        self.phys.get_mut(index)
    }

    /// Current calibration state
    #[must_use]
    pub fn state(&self) -> CalState {
        self.sequencer.state()
    }

    /// Integration period currently in effect in the sample domain
    #[must_use]
    pub fn integration_period(&self) -> u32 {
        self.window.period()
    }

    fn apply_cal_action(&mut self, action: CalAction) {
        match action {
            CalAction::CalibrateAll => {
                for phy in &mut self.phys {
                    phy.calibrate(CalTarget::MasterAndSlave);
                }
            }
            CalAction::ResetDelays => {
                for (lane, phy) in self.lanes.iter_mut().zip(self.phys.iter_mut()) {
                    phy.reset_delay();
                    lane.reset_tap();
                }
            }
            CalAction::StartupDone => {
                // state change is tracked by the sequencer; the level
                // becomes visible through the exported status
            }
            CalAction::InitialBitslip => {
                for lane in &mut self.lanes {
                    lane.bitslip();
                }
            }
            CalAction::Recalibrate => {
                for phy in &mut self.phys {
                    phy.calibrate(CalTarget::SlaveOnly);
                }
            }
        }
    }

    fn adjust_lane(&mut self, index: usize, direction: Direction) {
        if let (Some(lane), Some(phy)) = (self.lanes.get_mut(index), self.phys.get_mut(index)) {
            if lane.apply_adjustment(direction) {
                phy.nudge_delay(direction);
            }
        }
    }

    fn evaluate_auto_adjustments(&mut self) {
        let period = self.window.period();
        for (lane, phy) in self.lanes.iter_mut().zip(self.phys.iter_mut()) {
            let snapshot = lane.snapshot();
            if !self.config.adjust_policy.triggers(snapshot, period) {
                continue;
            }
            let direction = if snapshot < 0 {
                Direction::Decrement
            } else {
                Direction::Increment
            };
            if lane.apply_adjustment(direction) {
                phy.nudge_delay(direction);
            }
        }
    }

    fn status_snapshot(&self) -> EngineStatus {
        let mut status = EngineStatus::empty();
        status.ready = self.sequencer.startup_done();
        status.indicator = self.indicator.is_on();
        status.lane_count = self.lanes.len();
        for (index, lane) in self.lanes.iter().enumerate() {
            status.delay_taps[index] = lane.tap().as_taps();
            status.phase_snapshots[index] = lane.snapshot();
            status.lane_words[index] = lane.word();
        }
        for pair in 0..self.lanes.len() / 2 {
            let even = status.lane_words[2 * pair];
            let odd = status.lane_words[2 * pair + 1];
            status.combined_words[pair] =
                interleave_pair(even, odd, self.config.serdes_width);
        }
        status
    }
}

impl<P, E, I> LaneSynchronizer for SyncEngine<'_, P, E, I>
where
    P: LanePhy,
    E: TelemetryExporter,
    I: DebugIndicator,
{
    fn tick(&mut self) {
        // Settle control-domain levels through their double registers.
        let auto = self.auto_sync.capture(&self.requests.auto_enable) != 0;
        let selected = self.lane_select_sync.capture(&self.requests.manual_lane) as usize;
        let period = self.period_sync.capture(&self.requests.integration_period);
        self.window.set_period(period);

        if let Some(action) = self.sequencer.tick() {
            self.apply_cal_action(action);
        }
        let running = self.sequencer.startup_done();

        // Integration window only advances once the delay elements are
        // calibrated; pulses arriving earlier are discarded.
        let boundary = running && self.window.tick();
        let overflow_policy = self.config.overflow_policy;
        for (lane, phy) in self.lanes.iter_mut().zip(self.phys.iter_mut()) {
            let sample = phy.sample();
            lane.set_raw_word(sample.word);
            if boundary {
                lane.latch_snapshot();
            } else if running {
                if let Some(sense) = sample.phase {
                    lane.record_phase(sense, overflow_policy);
                }
            }
        }

        // A bit-slip request rotates every lane by one position.
        if self.requests.bitslip.take() {
            for lane in &mut self.lanes {
                lane.bitslip();
            }
        }

        // Delay adjustment. Manual request pulses are consumed
        // unconditionally so a stale pulse can never fire later; while
        // auto control owns the delays they are dropped.
        let increment = self.requests.delay_inc.take();
        let decrement = self.requests.delay_dec.take();
        if auto {
            if running && self.window.at_evaluation() {
                self.evaluate_auto_adjustments();
            }
        } else if increment != decrement {
            let direction = if increment {
                Direction::Increment
            } else {
                Direction::Decrement
            };
            self.adjust_lane(selected, direction);
        }

        // Word assembly and status export.
        for lane in &mut self.lanes {
            let framed = lane.framed_word();
            let assembled = self.assembler.assemble(framed);
            lane.set_output_word(assembled);
        }
        self.indicator.tick();
        let status = self.status_snapshot();
        self.exporter.export(&status);
    }

    fn ready(&self) -> bool {
        self.sequencer.startup_done()
    }

    fn reset(&mut self) {
        self.sequencer.reset();
        self.window.reset();
        self.window.set_period(self.config.integration_period);
        self.period_sync = MultiReg::new(self.config.integration_period);
        self.auto_sync = MultiReg::new(0);
        self.lane_select_sync = MultiReg::new(0);
        for lane in &mut self.lanes {
            lane.reset();
        }
    }
}
