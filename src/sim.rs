//! Deterministic software model of an LVDS lane
//!
//! Stands in for the deserializer and delay-line hardware during host
//! testing and bench experiments. The model keeps a fixed training word
//! observed at a configurable framing offset, and an "eye center" tap
//! position: while the tracked tap sits below the center the phase
//! detector reports early, above it late, and at the center it
//! alternates so a full window integrates to zero.

use crate::config::MAX_DELAY_TAP;
use crate::phy::{CalTarget, LanePhy, LaneSample};
use crate::sync::bitslip::rotate_left;
use crate::types::{Direction, PhaseSense};

/// Simulated deserializer + delay-line pair for one lane
#[derive(Clone, Copy, Debug)]
pub struct SimLane {
    width: u8,
    pattern: u16,
    offset: u8,
    eye_center: u8,
    tap: u8,
    master_calibrations: u32,
    slave_calibrations: u32,
    delay_resets: u32,
    parity: bool,
}

impl SimLane {
    /// Create a lane model
    ///
    /// `pattern` is the physical training word; the deserializer
    /// observes it rotated by `offset` bit positions until the engine's
    /// framing rotation compensates. `eye_center` is the tap position
    /// the phase detector steers toward.
    #[must_use]
    pub const fn new(width: u8, pattern: u16, offset: u8, eye_center: u8) -> Self {
        Self {
            width,
            pattern,
            offset,
            eye_center,
            tap: 0,
            master_calibrations: 0,
            slave_calibrations: 0,
            delay_resets: 0,
            parity: false,
        }
    }

    /// Tap position the model believes the hardware is at
    #[must_use]
    pub const fn tap(&self) -> u8 {
        self.tap
    }

    /// Master+slave calibration pulses received
    #[must_use]
    pub const fn master_calibrations(&self) -> u32 {
        self.master_calibrations
    }

    /// Slave-only calibration pulses received
    #[must_use]
    pub const fn slave_calibrations(&self) -> u32 {
        self.slave_calibrations
    }

    /// Delay-element reset pulses received
    #[must_use]
    pub const fn delay_resets(&self) -> u32 {
        self.delay_resets
    }

    /// Move the eye center, modeling drift while running
    pub fn drift_eye_to(&mut self, eye_center: u8) {
        self.eye_center = eye_center;
    }
}

impl LanePhy for SimLane {
    fn calibrate(&mut self, target: CalTarget) {
        match target {
            CalTarget::MasterAndSlave => self.master_calibrations += 1,
            CalTarget::SlaveOnly => self.slave_calibrations += 1,
        }
    }

    fn reset_delay(&mut self) {
        self.tap = 0;
        self.delay_resets += 1;
    }

    fn nudge_delay(&mut self, direction: Direction) {
        self.tap = match direction {
            Direction::Increment => (self.tap + 1).min(MAX_DELAY_TAP),
            Direction::Decrement => self.tap.saturating_sub(1),
        };
    }

    fn sample(&mut self) -> LaneSample {
        let word = rotate_left(self.pattern, self.offset, self.width);
        let phase = if self.tap < self.eye_center {
            Some(PhaseSense::Early)
        } else if self.tap > self.eye_center {
            Some(PhaseSense::Late)
        } else {
            // Centered: alternate so a window integrates to zero.
            self.parity = !self.parity;
            Some(if self.parity {
                PhaseSense::Early
            } else {
                PhaseSense::Late
            })
        };
        LaneSample { word, phase }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::bitslip::rotate_left;
    use crate::types::{Direction, PhaseSense};

    #[test]
    fn early_below_late_above_center() {
        let mut lane = SimLane::new(8, 0xF0, 0, 4);
        assert_eq!(lane.sample().phase, Some(PhaseSense::Early));
        for _ in 0..8 {
            lane.nudge_delay(Direction::Increment);
        }
        assert_eq!(lane.sample().phase, Some(PhaseSense::Late));
    }

    #[test]
    fn centered_lane_alternates() {
        let mut lane = SimLane::new(8, 0xF0, 0, 0);
        let first = lane.sample().phase.unwrap();
        let second = lane.sample().phase.unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn word_reflects_framing_offset() {
        let mut lane = SimLane::new(8, 0xF0, 3, 0);
        assert_eq!(lane.sample().word, rotate_left(0xF0, 3, 8));
    }
}
