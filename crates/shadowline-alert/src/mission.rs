//! Sustained-discovery watch for the mission controller.
//!
//! Layered on top of the alert state: the mission fails once DISCOVERED
//! has held without interruption for the configured duration. The detection
//! engine never fails a mission on its own; the owning controller feeds
//! this monitor from each tick's report.

use shadowline_core::config::DetectionConfig;
use shadowline_core::enums::{AlertState, MissionStatus};

#[derive(Debug, Clone)]
pub struct MissionMonitor {
    failure_secs: f64,
    discovered_for: f64,
    status: MissionStatus,
}

impl MissionMonitor {
    pub fn new(failure_secs: f64) -> Self {
        Self {
            failure_secs,
            discovered_for: 0.0,
            status: MissionStatus::InProgress,
        }
    }

    pub fn from_config(config: &DetectionConfig) -> Self {
        Self::new(config.discovered_failure_secs)
    }

    /// Feed one tick. Failure latches until `reset`.
    pub fn update(&mut self, state: AlertState, dt: f64) -> MissionStatus {
        if self.status == MissionStatus::Failed {
            return self.status;
        }
        if state == AlertState::Discovered {
            self.discovered_for += dt.max(0.0);
        } else {
            self.discovered_for = 0.0;
        }
        if self.discovered_for >= self.failure_secs {
            self.status = MissionStatus::Failed;
        }
        self.status
    }

    pub fn status(&self) -> MissionStatus {
        self.status
    }

    /// Continuous seconds in DISCOVERED up to the last update.
    pub fn discovered_for(&self) -> f64 {
        self.discovered_for
    }

    pub fn reset(&mut self) {
        self.discovered_for = 0.0;
        self.status = MissionStatus::InProgress;
    }
}

impl Default for MissionMonitor {
    fn default() -> Self {
        Self::from_config(&DetectionConfig::default())
    }
}
