//! Fixed-tick headless run of one level against one scripted target.

use serde::Serialize;
use tracing::{info, warn};

use shadowline_alert::mission::MissionMonitor;
use shadowline_core::constants::DT;
use shadowline_core::enums::{AlertState, MissionStatus};
use shadowline_core::events::DetectionEvent;
use shadowline_sim::engine::DetectionEngine;

use crate::script::ScriptPlayer;

/// Default cap on simulated time.
pub const DEFAULT_MAX_SECS: f64 = 300.0;

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Seconds per tick.
    pub dt: f64,
    /// Stop after this much simulated time even if the script is not done.
    pub max_secs: f64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            dt: DT,
            max_secs: DEFAULT_MAX_SECS,
        }
    }
}

/// What happened during a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub elapsed_secs: f64,
    pub final_state: AlertState,
    pub peak_state: AlertState,
    pub transitions: u32,
    pub sensor_detections: u32,
    pub peak_strength: f64,
    pub mission: MissionStatus,
    pub longest_discovery_secs: f64,
}

impl RunSummary {
    pub fn failed(&self) -> bool {
        self.mission == MissionStatus::Failed
    }
}

/// Tick the engine until the script is finished and the guards have
/// settled back to SAFE, the mission fails, or `max_secs` runs out.
pub fn run(engine: &mut DetectionEngine, mut player: ScriptPlayer, options: RunOptions) -> RunSummary {
    let mut monitor = MissionMonitor::from_config(engine.config());
    let mut summary = RunSummary::default();

    while summary.elapsed_secs < options.max_secs {
        let report = engine.tick(&player.target(), options.dt);
        let status = monitor.update(report.state, options.dt);

        summary.ticks = report.time.tick;
        summary.elapsed_secs = report.time.elapsed_secs;
        summary.final_state = report.state;
        summary.peak_state = summary.peak_state.max(report.state);
        summary.peak_strength = summary.peak_strength.max(report.max_strength);
        summary.longest_discovery_secs = summary.longest_discovery_secs.max(monitor.discovered_for());
        for event in &report.events {
            match event {
                DetectionEvent::StateChanged { previous, current, tick } => {
                    summary.transitions += 1;
                    info!(tick, ?previous, ?current, at = ?player.position(), "guards changed state");
                }
                DetectionEvent::SensorDetection { .. } => summary.sensor_detections += 1,
            }
        }

        if status == MissionStatus::Failed {
            warn!(tick = report.time.tick, "target discovered for too long, mission failed");
            break;
        }
        if player.is_finished() && report.state == AlertState::Safe {
            break;
        }

        player.advance(options.dt);
    }

    summary.mission = monitor.status();
    summary
}
