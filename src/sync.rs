//! Lane Synchronization Engine
//!
//! Sample-clock-domain logic: delay calibration sequencing, phase-error
//! integration, bit-slip framing, and word assembly. Everything here is
//! evaluated once per sample-clock tick and never blocks.

pub mod bitslip;
pub mod calibration;
pub mod deserializer;
pub mod engine;
pub mod lane;
pub mod phase_detector;
