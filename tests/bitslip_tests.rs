//! Bit-Slip Synchronizer Tests
//!
//! Rotation cyclicity, one-pulse-one-rotation, and the framing-offset
//! arithmetic the alignment search relies on.
//! Run with: cargo test --test bitslip_tests

use lanesync_firmware::indicator::NullIndicator;
use lanesync_firmware::sim::SimLane;
use lanesync_firmware::sync::bitslip::rotate_left;
use lanesync_firmware::sync::engine::{EngineConfig, LaneSynchronizer, SyncEngine};
use lanesync_firmware::telemetry::{ControlPort, EngineLink};
use lanesync_firmware::types::{AdjustPolicy, BitOrder, OverflowPolicy};

const FRAME: u16 = 0xF0;

fn test_config() -> EngineConfig {
    EngineConfig {
        serdes_width: 8,
        bit_order: BitOrder::LsbFirst,
        adjust_policy: AdjustPolicy::AnyNonZero,
        overflow_policy: OverflowPolicy::Wrapping,
        initial_bitslips: 0,
        recal_interval: 1 << 26,
        integration_period: 16,
    }
}

fn run_ticks(engine: &mut impl LaneSynchronizer, ticks: u32) {
    for _ in 0..ticks {
        engine.tick();
    }
}

// =============================================================================
// One Pulse, One Rotation
// =============================================================================

#[test]
fn each_request_rotates_exactly_once() {
    let link = EngineLink::new();
    let port = ControlPort::new(&link);
    let mut engine = SyncEngine::new(
        test_config(),
        [SimLane::new(8, FRAME, 0, 0)],
        &link,
        &link,
        NullIndicator,
    )
    .unwrap();
    run_ticks(&mut engine, 60);

    for expected in 1..=3u8 {
        assert!(port.trigger_bitslip());
        engine.tick();
        assert_eq!(engine.lane(0).unwrap().rotation(), expected);
    }
}

#[test]
fn request_rotates_all_lanes_together() {
    let link = EngineLink::new();
    let port = ControlPort::new(&link);
    let mut engine = SyncEngine::new(
        test_config(),
        [SimLane::new(8, FRAME, 0, 0), SimLane::new(8, 0x0F, 0, 0)],
        &link,
        &link,
        NullIndicator,
    )
    .unwrap();
    run_ticks(&mut engine, 60);

    assert!(port.trigger_bitslip());
    engine.tick();
    assert_eq!(engine.lane(0).unwrap().rotation(), 1);
    assert_eq!(engine.lane(1).unwrap().rotation(), 1);
}

// =============================================================================
// Cyclic Round Trip
// =============================================================================

#[test]
fn full_cycle_of_pulses_restores_framing() {
    let link = EngineLink::new();
    let port = ControlPort::new(&link);
    let mut engine = SyncEngine::new(
        test_config(),
        [SimLane::new(8, 0b1011_0001, 0, 0)],
        &link,
        &link,
        NullIndicator,
    )
    .unwrap();
    run_ticks(&mut engine, 60);
    let original = engine.lane(0).unwrap().word();

    for _ in 0..8 {
        assert!(port.trigger_bitslip());
        engine.tick();
    }
    assert_eq!(engine.lane(0).unwrap().rotation(), 0);
    assert_eq!(engine.lane(0).unwrap().word(), original);
}

// =============================================================================
// Framing Offset Arithmetic
// =============================================================================

#[test]
fn three_slips_close_a_five_bit_offset() {
    // A lane deserializing five bit positions off needs exactly
    // (8 - 5) = 3 rotations before the training pattern reappears.
    let link = EngineLink::new();
    let port = ControlPort::new(&link);
    let mut engine = SyncEngine::new(
        test_config(),
        [SimLane::new(8, FRAME, 5, 0)],
        &link,
        &link,
        NullIndicator,
    )
    .unwrap();
    run_ticks(&mut engine, 60);
    assert_ne!(engine.lane(0).unwrap().word(), FRAME);

    for _ in 0..2 {
        assert!(port.trigger_bitslip());
        engine.tick();
        assert_ne!(engine.lane(0).unwrap().word(), FRAME);
    }
    assert!(port.trigger_bitslip());
    engine.tick();
    assert_eq!(engine.lane(0).unwrap().word(), FRAME);
}

#[test]
fn observed_word_tracks_rotation_count() {
    let link = EngineLink::new();
    let port = ControlPort::new(&link);
    let mut engine = SyncEngine::new(
        test_config(),
        [SimLane::new(8, FRAME, 2, 0)],
        &link,
        &link,
        NullIndicator,
    )
    .unwrap();
    run_ticks(&mut engine, 60);
    assert_eq!(engine.lane(0).unwrap().word(), rotate_left(FRAME, 2, 8));

    assert!(port.trigger_bitslip());
    engine.tick();
    assert_eq!(engine.lane(0).unwrap().word(), rotate_left(FRAME, 3, 8));
}
