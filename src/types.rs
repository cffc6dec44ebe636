//! Shared types used across the lane-synchronization engine
//!
//! This module defines domain-specific types that enforce invariants
//! at compile time and provide type safety throughout the codebase.

use core::fmt;

use crate::config::MAX_DELAY_TAP;

/// Variable-delay-line tap value with clamped bounds
///
/// Represents a valid tap position within `[0, MAX_DELAY_TAP]`.
/// Adjustments clamp at the bounds and never wrap.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct TapValue(u8);

impl TapValue {
    /// Lowest tap position
    pub const MIN: Self = Self(0);

    /// Highest tap position
    pub const MAX: Self = Self(MAX_DELAY_TAP);

    /// Create a new tap value, returns None if out of range
    #[must_use]
    pub const fn new(taps: u8) -> Option<Self> {
        if taps <= MAX_DELAY_TAP {
            Some(Self(taps))
        } else {
            None
        }
    }

    /// Get the raw tap count
    #[must_use]
    pub const fn as_taps(self) -> u8 {
        self.0
    }

    /// Apply one adjustment step, clamped at the bounds
    ///
    /// An adjustment at a bound returns the same value (no-op, not an
    /// error).
    #[must_use]
    pub const fn adjusted(self, direction: Direction) -> Self {
        match direction {
            Direction::Increment => {
                if self.0 >= MAX_DELAY_TAP {
                    Self(MAX_DELAY_TAP)
                } else {
                    Self(self.0 + 1)
                }
            }
            Direction::Decrement => Self(self.0.saturating_sub(1)),
        }
    }

    /// Check whether an adjustment in the given direction would clamp
    #[must_use]
    pub const fn at_bound(self, direction: Direction) -> bool {
        match direction {
            Direction::Increment => self.0 >= MAX_DELAY_TAP,
            Direction::Decrement => self.0 == 0,
        }
    }
}

impl fmt::Debug for TapValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TapValue({} taps)", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TapValue {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{} taps", self.0);
    }
}

/// Direction of a delay-tap adjustment
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Move the sampling instant later
    Increment,
    /// Move the sampling instant earlier
    Decrement,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Direction {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Increment => defmt::write!(f, "INC"),
            Self::Decrement => defmt::write!(f, "DEC"),
        }
    }
}

/// Early/late indication produced by the sampling hardware
///
/// Reports whether the current sampling instant leads or trails the
/// center of the data eye.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseSense {
    /// Sampling instant leads the eye center
    Early,
    /// Sampling instant trails the eye center
    Late,
}

impl PhaseSense {
    /// Contribution of one pulse to the running accumulator
    #[must_use]
    pub const fn weight(self) -> i32 {
        match self {
            Self::Early => 1,
            Self::Late => -1,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PhaseSense {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Early => defmt::write!(f, "EARLY"),
            Self::Late => defmt::write!(f, "LATE"),
        }
    }
}

/// Bit order of the serial source
///
/// Some converters transmit the most-significant bit first and need
/// their deserialized words mirrored before use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BitOrder {
    /// First bit received is the least-significant output bit
    #[default]
    LsbFirst,
    /// First bit received is the most-significant output bit
    MsbFirst,
}

impl BitOrder {
    /// Check whether deserialized words need bit mirroring
    #[must_use]
    pub const fn mirrored(self) -> bool {
        matches!(self, Self::MsbFirst)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for BitOrder {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::LsbFirst => defmt::write!(f, "LSB-FIRST"),
            Self::MsbFirst => defmt::write!(f, "MSB-FIRST"),
        }
    }
}

/// Trigger condition for automatic delay adjustment
///
/// Both variants are in use in the field; the choice trades adjustment
/// latency against hysteresis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AdjustPolicy {
    /// Adjust whenever the latched snapshot is non-zero
    #[default]
    AnyNonZero,
    /// Adjust only when the snapshot magnitude reaches a full window,
    /// i.e. the lane was consistently early or late for the entire
    /// integration period
    ExceedsWindow,
}

impl AdjustPolicy {
    /// Decide whether a latched snapshot warrants an adjustment pulse
    #[must_use]
    pub fn triggers(self, snapshot: i32, period: u32) -> bool {
        match self {
            Self::AnyNonZero => snapshot != 0,
            Self::ExceedsWindow => i64::from(snapshot).unsigned_abs() >= u64::from(period),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for AdjustPolicy {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::AnyNonZero => defmt::write!(f, "NONZERO"),
            Self::ExceedsWindow => defmt::write!(f, "FULL-WINDOW"),
        }
    }
}

/// Behavior of the phase accumulator at its bit-width limit
///
/// Sustained strong drift can push the accumulator to the limit of its
/// representation within one window; what happens then is a deliberate
/// configuration choice rather than an accident of the arithmetic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Two's-complement wraparound (tracking degrades but arithmetic
    /// stays branch-free)
    #[default]
    Wrapping,
    /// Pin at `i32::MIN`/`i32::MAX` so the sign of the error survives
    Saturating,
}

impl OverflowPolicy {
    /// Add a pulse contribution to an accumulator under this policy
    #[must_use]
    pub const fn accumulate(self, accumulator: i32, weight: i32) -> i32 {
        match self {
            Self::Wrapping => accumulator.wrapping_add(weight),
            Self::Saturating => accumulator.saturating_add(weight),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for OverflowPolicy {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Wrapping => defmt::write!(f, "WRAP"),
            Self::Saturating => defmt::write!(f, "SAT"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_DELAY_TAP;

    #[test]
    fn tap_clamps_at_bounds() {
        let top = TapValue::MAX;
        assert_eq!(top.adjusted(Direction::Increment), TapValue::MAX);
        let bottom = TapValue::MIN;
        assert_eq!(bottom.adjusted(Direction::Decrement), TapValue::MIN);
    }

    #[test]
    fn tap_rejects_out_of_range() {
        assert!(TapValue::new(MAX_DELAY_TAP).is_some());
        assert!(TapValue::new(MAX_DELAY_TAP + 1).is_none());
    }

    #[test]
    fn policy_nonzero_triggers_on_any_error() {
        assert!(AdjustPolicy::AnyNonZero.triggers(1, 1024));
        assert!(AdjustPolicy::AnyNonZero.triggers(-1, 1024));
        assert!(!AdjustPolicy::AnyNonZero.triggers(0, 1024));
    }

    #[test]
    fn policy_full_window_needs_saturated_error() {
        assert!(!AdjustPolicy::ExceedsWindow.triggers(1023, 1024));
        assert!(AdjustPolicy::ExceedsWindow.triggers(1024, 1024));
        assert!(AdjustPolicy::ExceedsWindow.triggers(-1024, 1024));
    }

    #[test]
    fn overflow_policies_diverge_at_limit() {
        assert_eq!(
            OverflowPolicy::Wrapping.accumulate(i32::MAX, 1),
            i32::MIN
        );
        assert_eq!(
            OverflowPolicy::Saturating.accumulate(i32::MAX, 1),
            i32::MAX
        );
    }
}
