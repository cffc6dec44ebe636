//! LVDS Lane Synchronization Firmware Library
//!
//! This library provides the core logic for bringing a set of
//! source-synchronous high-speed serial data lanes (LVDS ADC outputs,
//! clock-recovery front-ends) into a stable, correctly-phased,
//! byte-aligned parallel form, and keeping them aligned over time and
//! temperature drift.
//!
//! # Architecture
//!
//! The engine is organized in layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   CONTROL DOMAIN (slow clock)                │
//! │  Register Port  │  Frame Aligner  │  external controller     │
//! ├─────────────────────────────────────────────────────────────┤
//! │              CLOCK-DOMAIN CROSSING PRIMITIVES                │
//! │  Pulse synchronizers  │  double-register value crossings     │
//! ├─────────────────────────────────────────────────────────────┤
//! │                  SAMPLE DOMAIN (bit-clock / S)               │
//! │  Calibration  │  Phase Detector  │  Bit-Slip  │  Assembler   │
//! ├─────────────────────────────────────────────────────────────┤
//! │                      LANE PHY CAPABILITY                     │
//! │  abstract deserializer + variable-delay-line hardware        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Partitioned ownership**: per-lane state is owned and mutated only
//!   by the sample-domain update step; the control domain communicates
//!   exclusively through single-slot crossing primitives
//! - **Type-driven design**: bounded values (delay taps, rotation counts)
//!   enforce their invariants in the type
//! - **Composition over inheritance**: the engine assembles small
//!   capabilities (lane PHY, telemetry exporter, debug indicator)
//! - **No blocking, no allocation**: every update is a fixed amount of
//!   work per tick, suitable for a hard-real-time interrupt context

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

// Re-export dependencies needed by applications
pub use heapless;

/// Frame alignment search run by the control-domain collaborator
pub mod align;

/// System configuration and engine constants
pub mod config;

/// Clock-domain synchronization primitives
pub mod crossing;

/// Debug indicator capability (activity blinker)
pub mod indicator;

/// Abstract lane PHY capability (deserializer + delay line)
pub mod phy;

/// Deterministic software model of an LVDS lane for host testing
pub mod sim;

/// Lane synchronization engine (sample-clock domain)
pub mod sync;

/// Telemetry / control register interface (control-clock domain)
pub mod telemetry;

/// Shared types used across modules
pub mod types;

/// Prelude module for common imports
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::types::*;

    pub use crate::phy::{CalTarget, LanePhy, LaneSample};
    pub use crate::sync::engine::{EngineConfig, LaneSynchronizer, SyncEngine};
    pub use crate::telemetry::{ControlPort, EngineLink, EngineStatus, TelemetryExporter};

    // Error handling
    pub use core::result::Result;
}
