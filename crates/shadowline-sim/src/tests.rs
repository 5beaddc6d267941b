//! Tests for the detection engine: aggregation, command queue, events and restart.

use std::sync::{Arc, Mutex};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use shadowline_core::commands::RegistryCommand;
use shadowline_core::components::*;
use shadowline_core::config::DetectionConfig;
use shadowline_core::enums::*;
use shadowline_core::error::DetectionError;
use shadowline_core::events::DetectionEvent;
use shadowline_core::types::{Position, Velocity};

use crate::engine::DetectionEngine;
use crate::level::LevelDefinition;
use crate::registry::max_strength;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// Omnidirectional guard, range 100.
fn sentry(id: u32, x: f64, y: f64) -> Detector {
    Detector::visual(id, Position::new(x, y), 100.0, 360.0, 0.0)
}

fn at(x: f64, y: f64) -> Target {
    Target::new(Position::new(x, y), 0.0)
}

fn corridor_engine() -> DetectionEngine {
    let mut engine = DetectionEngine::default();
    engine
        .add_detector(Detector::visual(1, Position::new(0.0, 0.0), 100.0, 90.0, 0.0))
        .unwrap();
    engine.add_obstacle(Obstacle::wall(
        Position::new(50.0, -10.0),
        Position::new(50.0, 10.0),
    ));
    engine
}

fn state_changes(events: &[DetectionEvent]) -> usize {
    events.iter().filter(|e| e.is_state_change()).count()
}

// ---- Aggregation ----

#[test]
fn test_two_guards_take_max_not_sum() {
    let mut engine = DetectionEngine::default();
    engine.add_detector(sentry(1, 0.0, 0.0)).unwrap();
    engine.add_detector(sentry(2, 110.0, 0.0)).unwrap();

    // 70 from guard 1 (0.3) and 40 from guard 2 (0.6). A sum would be DISCOVERED.
    let report = engine.tick(&at(70.0, 0.0), 1.0);
    assert_eq!(report.results.len(), 2);
    assert!(approx(report.max_strength, 0.6));
    assert_eq!(report.state, AlertState::Alert);
}

#[test]
fn test_empty_registry_stays_safe() {
    let mut engine = DetectionEngine::default();
    let report = engine.tick(&at(0.0, 0.0), 1.0);
    assert!(report.results.is_empty());
    assert_eq!(report.max_strength, 0.0);
    assert_eq!(report.state, AlertState::Safe);
    assert!(report.events.is_empty());
}

#[test]
fn test_report_max_matches_results() {
    let mut rng = ChaCha8Rng::seed_from_u64(31);
    for round in 0..50 {
        let mut engine = DetectionEngine::default();
        let count = rng.gen_range(1..6);
        for id in 0..count {
            let detector = Detector::visual(
                id,
                Position::new(rng.gen_range(-200.0..200.0), rng.gen_range(-200.0..200.0)),
                rng.gen_range(10.0..150.0),
                rng.gen_range(10.0..=360.0),
                rng.gen_range(0.0..360.0),
            );
            engine.add_detector(detector).unwrap();
        }
        let target = at(rng.gen_range(-200.0..200.0), rng.gen_range(-200.0..200.0));

        let expected = engine
            .evaluate(&target)
            .iter()
            .map(|r| r.strength)
            .fold(0.0, f64::max);
        let report = engine.tick(&target, 1.0);
        assert_eq!(report.max_strength, expected, "round {round}");
        assert_eq!(report.max_strength, max_strength(&report.results));

        let demanded = engine.alert().params().classify(expected);
        assert_eq!(report.state, demanded.unwrap_or(AlertState::Safe), "round {round}");
    }
}

// ---- Scenarios ----

#[test]
fn test_corridor_wall_hides_target() {
    let mut engine = corridor_engine();
    let report = engine.tick(&at(80.0, 0.0), 1.0);
    assert_eq!(report.max_strength, 0.0);
    assert_eq!(report.state, AlertState::Safe);

    let report = engine.tick(&at(40.0, 0.0), 1.0);
    assert_eq!(report.max_strength, 0.6);
    assert_eq!(report.state, AlertState::Alert);
}

#[test]
fn test_loud_target_heard_by_zone() {
    let mut engine = DetectionEngine::default();
    engine
        .add_audio_zone(AudioZone::new(Position::new(200.0, 200.0), 50.0, 3.0))
        .unwrap();

    let quiet = Target::new(Position::new(220.0, 220.0), 2.0);
    assert_eq!(engine.tick(&quiet, 1.0).state, AlertState::Safe);

    let loud = Target::new(Position::new(220.0, 220.0), 4.0);
    let report = engine.tick(&loud, 1.0);
    assert_eq!(report.max_strength, 0.4);
    assert_eq!(report.state, AlertState::Caution);
}

#[test]
fn test_motion_sensor_ignores_still_target() {
    let mut engine = DetectionEngine::default();
    engine
        .add_detector(Detector::motion(1, Position::new(0.0, 0.0), 100.0, 360.0, 0.0))
        .unwrap();

    let still = at(10.0, 0.0);
    assert_eq!(engine.tick(&still, 1.0).max_strength, 0.0);

    let moving = still.with_velocity(Velocity::new(3.0, 4.0));
    assert_eq!(engine.tick(&moving, 1.0).max_strength, 0.9);
}

#[test]
fn test_alert_relaxes_after_timeout() {
    let mut engine = corridor_engine();
    engine.tick(&at(40.0, 0.0), 1.0);
    assert_eq!(engine.current_state(), AlertState::Alert);

    let hidden = at(80.0, 0.0);
    for i in 0..29 {
        let report = engine.tick(&hidden, 1.0);
        assert_eq!(report.state, AlertState::Alert, "relaxed early at {i}");
    }
    let report = engine.tick(&hidden, 1.0);
    assert_eq!(report.state, AlertState::Safe);
    assert_eq!(state_changes(&report.events), 1);
}

#[test]
fn test_one_state_change_per_transition() {
    let mut engine = corridor_engine();
    let mut changes = 0;
    // Flicker in and out of view for a while; the state goes up once.
    for i in 0..20 {
        let target = if i % 2 == 0 { at(40.0, 0.0) } else { at(80.0, 0.0) };
        changes += state_changes(&engine.tick(&target, 1.0).events);
    }
    assert_eq!(changes, 1);

    let events = engine.drain_events();
    let change = events.iter().find(|e| e.is_state_change()).unwrap();
    assert_eq!(
        *change,
        DetectionEvent::StateChanged {
            previous: AlertState::Safe,
            current: AlertState::Alert,
            tick: 1,
        }
    );
}

#[test]
fn test_escalation_emits_each_step() {
    let mut engine = DetectionEngine::default();
    engine.add_detector(sentry(1, 0.0, 0.0)).unwrap();

    let a = engine.tick(&at(60.0, 0.0), 1.0);
    let b = engine.tick(&at(40.0, 0.0), 1.0);
    let c = engine.tick(&at(10.0, 0.0), 1.0);
    assert_eq!(a.state, AlertState::Caution);
    assert_eq!(b.state, AlertState::Alert);
    assert_eq!(c.state, AlertState::Discovered);
    assert_eq!(state_changes(&a.events) + state_changes(&b.events) + state_changes(&c.events), 3);
}

// ---- Sensor events ----

#[test]
fn test_sensor_events_respect_threshold() {
    let mut engine = DetectionEngine::default();
    engine
        .add_detector(sentry(1, 0.0, 0.0).with_event_threshold(0.5))
        .unwrap();

    let report = engine.tick(&at(70.0, 0.0), 1.0);
    assert!(report
        .events
        .iter()
        .all(|e| !matches!(e, DetectionEvent::SensorDetection { .. })));

    let report = engine.tick(&at(40.0, 0.0), 1.0);
    let sensor: Vec<_> = report
        .events
        .iter()
        .filter(|e| matches!(e, DetectionEvent::SensorDetection { .. }))
        .collect();
    assert_eq!(sensor.len(), 1);
    assert_eq!(
        *sensor[0],
        DetectionEvent::SensorDetection {
            source: DetectionSource::Detector(DetectorId(1)),
            strength: 0.6,
            distance: 40.0,
            tick: 2,
        }
    );
}

#[test]
fn test_sensor_events_precede_state_change() {
    let mut engine = DetectionEngine::default();
    engine.add_detector(sentry(1, 0.0, 0.0)).unwrap();
    let report = engine.tick(&at(10.0, 0.0), 1.0);
    assert_eq!(report.events.len(), 2);
    assert!(!report.events[0].is_state_change());
    assert!(report.events[1].is_state_change());
}

#[test]
fn test_listener_and_channel_delivery() {
    let mut engine = corridor_engine();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let listener = engine.subscribe(move |event| sink.lock().unwrap().push(*event));
    let (_channel, rx) = engine.subscribe_channel();

    engine.tick(&at(40.0, 0.0), 1.0);
    let pushed = seen.lock().unwrap().clone();
    let received: Vec<_> = rx.try_iter().collect();
    assert_eq!(pushed.len(), 2);
    assert_eq!(pushed, received);

    assert!(engine.unsubscribe(listener));
    engine.tick(&at(40.0, 0.0), 1.0);
    assert_eq!(seen.lock().unwrap().len(), 2);
    assert_eq!(rx.try_iter().count(), 1);
}

#[test]
fn test_drain_collects_across_ticks() {
    let mut engine = corridor_engine();
    engine.tick(&at(40.0, 0.0), 1.0);
    engine.tick(&at(40.0, 0.0), 1.0);
    let events = engine.drain_events();
    assert_eq!(events.len(), 3);
    assert!(engine.drain_events().is_empty());
}

// ---- Command queue ----

#[test]
fn test_commands_apply_at_tick_boundary() {
    let mut engine = DetectionEngine::default();
    engine.queue_command(RegistryCommand::AddDetector {
        detector: sentry(1, 0.0, 0.0),
    });
    assert_eq!(engine.registry().detector_count(), 0);

    let report = engine.tick(&at(40.0, 0.0), 1.0);
    assert_eq!(engine.registry().detector_count(), 1);
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.state, AlertState::Alert);
}

#[test]
fn test_pose_update_turns_guard_away() {
    let mut engine = corridor_engine();
    engine.queue_commands([
        RegistryCommand::ClearObstacles,
        RegistryCommand::UpdatePose {
            id: DetectorId(1),
            position: Position::new(0.0, 0.0),
            facing: 180.0,
        },
    ]);
    let report = engine.tick(&at(80.0, 0.0), 1.0);
    assert_eq!(report.max_strength, 0.0);
    assert_eq!(engine.registry().obstacles().len(), 0);

    engine.queue_command(RegistryCommand::UpdatePose {
        id: DetectorId(1),
        position: Position::new(0.0, 0.0),
        facing: 0.0,
    });
    assert!(approx(engine.tick(&at(80.0, 0.0), 1.0).max_strength, 0.2));
}

#[test]
fn test_rejected_commands_are_skipped() {
    let mut engine = DetectionEngine::default();
    engine.queue_commands([
        RegistryCommand::AddDetector {
            detector: sentry(1, 0.0, 0.0),
        },
        RegistryCommand::AddDetector {
            detector: sentry(1, 50.0, 0.0),
        },
        RegistryCommand::SetActive {
            id: DetectorId(7),
            active: false,
        },
        RegistryCommand::RemoveDetector { id: DetectorId(8) },
    ]);
    engine.tick(&at(0.0, 0.0), 1.0);
    assert_eq!(engine.registry().detector_count(), 1);
    assert_eq!(
        engine.registry().detector(DetectorId(1)).unwrap().position,
        Position::new(0.0, 0.0)
    );
}

#[test]
fn test_remove_twice_is_noop() {
    let mut engine = DetectionEngine::default();
    engine.add_detector(sentry(1, 0.0, 0.0)).unwrap();
    assert!(engine.remove_detector(DetectorId(1)));
    assert!(!engine.remove_detector(DetectorId(1)));
    let report = engine.tick(&at(0.0, 0.0), 1.0);
    assert!(report.results.is_empty());
}

#[test]
fn test_disabled_camera_goes_blind() {
    let mut engine = DetectionEngine::default();
    engine.add_detector(sentry(1, 0.0, 0.0)).unwrap();
    engine.set_detector_active(DetectorId(1), false).unwrap();
    assert_eq!(engine.tick(&at(10.0, 0.0), 1.0).max_strength, 0.0);
}

// ---- Level, snapshot, restart ----

#[test]
fn test_tutorial_level_loads() {
    let level = LevelDefinition::tutorial_corridor();
    let mut engine = DetectionEngine::with_level(DetectionConfig::default(), &level).unwrap();
    assert_eq!(engine.registry().detector_count(), 2);
    assert_eq!(engine.registry().audio_zone_count(), 1);

    let report = engine.tick(&at(80.0, 0.0), 1.0);
    assert_eq!(report.results.len(), 3);
    assert_eq!(report.state, AlertState::Safe);
}

#[test]
fn test_level_with_duplicate_ids_rejected() {
    let level = LevelDefinition {
        detectors: vec![sentry(1, 0.0, 0.0), sentry(1, 5.0, 0.0)],
        ..Default::default()
    };
    assert!(DetectionEngine::with_level(DetectionConfig::default(), &level).is_err());
}

#[test]
fn test_failed_level_load_leaves_engine_untouched() {
    let mut engine = DetectionEngine::default();
    engine.add_detector(sentry(9, 500.0, 0.0)).unwrap();

    let level = LevelDefinition {
        detectors: vec![sentry(1, 0.0, 0.0), sentry(1, 5.0, 0.0)],
        audio_zones: vec![AudioZone::new(Position::new(0.0, 0.0), 50.0, 1.0)],
        obstacles: vec![Obstacle::wall(Position::new(0.0, 0.0), Position::new(0.0, 5.0))],
        ..Default::default()
    };
    assert_eq!(
        engine.load_level(&level),
        Err(DetectionError::DuplicateDetector(DetectorId(1)))
    );
    assert_eq!(engine.registry().detector_count(), 1);
    assert_eq!(engine.registry().audio_zone_count(), 0);
    assert!(engine.registry().obstacles().is_empty());

    // Clashing with an already registered id is rejected the same way
    let clash = LevelDefinition {
        detectors: vec![sentry(2, 0.0, 0.0), sentry(9, 5.0, 0.0)],
        ..Default::default()
    };
    assert!(engine.load_level(&clash).is_err());
    assert!(!engine.registry().contains_detector(DetectorId(2)));

    engine.load_level(&LevelDefinition::tutorial_corridor()).unwrap();
    assert_eq!(engine.registry().detector_count(), 3);
}

#[test]
fn test_snapshot_reflects_state() {
    let mut engine = DetectionEngine::default();
    engine.add_detector(sentry(2, 1000.0, 0.0)).unwrap();
    engine.add_detector(sentry(1, 0.0, 0.0)).unwrap();
    engine.tick(&at(50.0, 0.0), 1.0);

    let snap = engine.snapshot();
    assert_eq!(snap.time.tick, 1);
    assert_eq!(snap.alert.state, AlertState::Caution);
    assert_eq!(snap.alert.alert_timer, 0.0);
    let ids: Vec<_> = snap.detectors.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![DetectorId(1), DetectorId(2)]);
    assert_eq!(snap.detectors[0].suspicion, 0.5);
    assert_eq!(snap.detectors[1].suspicion, 0.0);

    let json = serde_json::to_string(&snap).unwrap();
    assert!(json.contains("\"Caution\""));
}

#[test]
fn test_reset_keeps_sensors() {
    let mut engine = DetectionEngine::default();
    engine.add_detector(sentry(1, 0.0, 0.0)).unwrap();
    engine.tick(&at(10.0, 0.0), 1.0);
    assert_eq!(engine.current_state(), AlertState::Discovered);

    engine.reset();
    assert_eq!(engine.current_state(), AlertState::Safe);
    assert_eq!(engine.time().tick, 0);
    assert_eq!(engine.alert().alert_timer(), 0.0);
    assert!(engine.drain_events().is_empty());
    assert_eq!(engine.registry().detector_count(), 1);
    assert_eq!(engine.registry().detector_suspicion(DetectorId(1)), Some(0.0));

    // Restarted mission reaches the same state from the same input
    assert_eq!(engine.tick(&at(10.0, 0.0), 1.0).state, AlertState::Discovered);
}
