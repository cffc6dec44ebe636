//! Delay calibration controller
//!
//! Sequences the one-shot startup calibration of the delay elements and
//! the slow periodic recalibration that compensates temperature drift.
//! The startup sequence is a fixed timeline dispatched on a monotonic
//! tick counter; it does not react to external input. An engine that
//! never completes the timeline (missing or unstable bit clock) simply
//! never reports startup done; there is no retry path.

use crate::config::{
    CALIBRATE_ALL_TICK, DELAY_RESET_TICK, INITIAL_BITSLIP_FIRST_TICK, INITIAL_BITSLIP_SPACING,
    STARTUP_DONE_TICK,
};

/// Engine-wide calibration state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalState {
    /// Before the first tick; no lane output is trusted
    Uninitialized,
    /// Startup timeline in progress
    Calibrating,
    /// Startup complete; lane traffic is accepted
    Running,
}

#[cfg(feature = "defmt")]
impl defmt::Format for CalState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Uninitialized => defmt::write!(f, "UNINIT"),
            Self::Calibrating => defmt::write!(f, "CAL"),
            Self::Running => defmt::write!(f, "RUN"),
        }
    }
}

/// Action the engine must carry out this tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalAction {
    /// Fire master+slave calibration on every delay element
    CalibrateAll,
    /// Reset every delay element to tap zero
    ResetDelays,
    /// Startup timeline complete; begin accepting lane traffic
    StartupDone,
    /// Apply one pre-rotation bit-slip to every lane
    InitialBitslip,
    /// Fire slave-only calibration on every delay element (periodic
    /// drift compensation)
    Recalibrate,
}

/// Timed startup sequencer plus periodic recalibration timer
#[derive(Clone, Copy, Debug)]
pub struct CalibrationSequencer {
    state: CalState,
    tick_count: u32,
    timeline_end: u32,
    initial_bitslips: u8,
    recal_interval: u32,
    recal_count: u32,
}

impl CalibrationSequencer {
    /// Create a sequencer
    ///
    /// `initial_bitslips` pre-rotations are issued near the end of the
    /// startup timeline; `recal_interval` is the period, in sample-clock
    /// cycles, of the slave-only recalibration pulse.
    #[must_use]
    pub const fn new(initial_bitslips: u8, recal_interval: u32) -> Self {
        let timeline_end = if initial_bitslips == 0 {
            STARTUP_DONE_TICK
        } else {
            INITIAL_BITSLIP_FIRST_TICK
                + INITIAL_BITSLIP_SPACING * (initial_bitslips as u32 - 1)
        };
        Self {
            state: CalState::Uninitialized,
            tick_count: 0,
            timeline_end,
            initial_bitslips,
            recal_interval,
            recal_count: 0,
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> CalState {
        self.state
    }

    /// Check whether the startup timeline has completed
    #[must_use]
    pub fn startup_done(&self) -> bool {
        matches!(self.state, CalState::Running)
    }

    /// Ticks elapsed since reset, saturating at the timeline end
    #[must_use]
    pub const fn tick_count(&self) -> u32 {
        self.tick_count
    }

    /// Return to the uninitialized state (external reset)
    pub fn reset(&mut self) {
        self.state = CalState::Uninitialized;
        self.tick_count = 0;
        self.recal_count = 0;
    }

    /// Advance one sample-clock cycle
    pub fn tick(&mut self) -> Option<CalAction> {
        if matches!(self.state, CalState::Uninitialized) {
            self.state = CalState::Calibrating;
        }
        if self.tick_count < self.timeline_end {
            self.tick_count += 1;
            self.timeline_event(self.tick_count)
        } else {
            // Timeline exhausted; free-run the recalibration timer.
            self.recal_count += 1;
            if self.recal_count >= self.recal_interval {
                self.recal_count = 0;
                Some(CalAction::Recalibrate)
            } else {
                None
            }
        }
    }

    fn timeline_event(&mut self, tick: u32) -> Option<CalAction> {
        match tick {
            CALIBRATE_ALL_TICK => Some(CalAction::CalibrateAll),
            DELAY_RESET_TICK => Some(CalAction::ResetDelays),
            STARTUP_DONE_TICK => {
                self.state = CalState::Running;
                Some(CalAction::StartupDone)
            }
            t if self.is_initial_bitslip_tick(t) => Some(CalAction::InitialBitslip),
            _ => None,
        }
    }

    fn is_initial_bitslip_tick(&self, tick: u32) -> bool {
        if self.initial_bitslips == 0 || tick < INITIAL_BITSLIP_FIRST_TICK {
            return false;
        }
        let offset = tick - INITIAL_BITSLIP_FIRST_TICK;
        offset % INITIAL_BITSLIP_SPACING == 0
            && offset / INITIAL_BITSLIP_SPACING < u32::from(self.initial_bitslips)
    }
}
