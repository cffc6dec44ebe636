//! System configuration and engine constants
//!
//! Compile-time constants for the lane-synchronization engine. Startup
//! timeline positions, counter defaults, and sizing limits are
//! centralized here.

/// Maximum number of lanes a single engine instance can track
pub const MAX_LANES: usize = 8;

/// Minimum supported serialization factor (bits per frame)
pub const MIN_SERDES_WIDTH: u8 = 2;

/// Maximum supported serialization factor (bits per frame)
pub const MAX_SERDES_WIDTH: u8 = 16;

/// Highest delay-line tap value; adjustments clamp here and at zero
pub const MAX_DELAY_TAP: u8 = 31;

/// Startup timeline: tick at which master+slave delay calibration fires
pub const CALIBRATE_ALL_TICK: u32 = 20;

/// Startup timeline: tick at which the delay elements are reset
pub const DELAY_RESET_TICK: u32 = 40;

/// Startup timeline: tick at which the engine reports startup done
pub const STARTUP_DONE_TICK: u32 = 60;

/// Startup timeline: tick of the first pre-rotation bit-slip
pub const INITIAL_BITSLIP_FIRST_TICK: u32 = 100;

/// Startup timeline: spacing between pre-rotation bit-slips
pub const INITIAL_BITSLIP_SPACING: u32 = 10;

/// Default number of pre-rotation bit-slips applied during startup
pub const DEFAULT_INITIAL_BITSLIPS: u8 = 2;

/// Integration period in effect at power-on, before the controller
/// writes one through the register interface
pub const POWER_ON_INTEGRATION_PERIOD: u32 = 1 << 23;

/// Integration period the register interface resets to
pub const DEFAULT_INTEGRATION_PERIOD: u32 = 1 << 20;

/// Slave delay recalibration interval (every 0.54 s at 125 MHz)
pub const DEFAULT_RECAL_INTERVAL: u32 = 1 << 26;

/// Training pattern expected on the framing lane once aligned
/// (a frame strobe sampled eight times per frame reads as 0b1111_0000)
pub const DEFAULT_FRAME_PATTERN: u16 = 0xF0;

/// Default serialization factor
pub const DEFAULT_SERDES_WIDTH: u8 = 8;
