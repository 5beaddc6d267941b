//! Suspicion accumulation and decay.

use serde::{Deserialize, Serialize};

use shadowline_core::config::DetectionConfig;

/// Gain and decay rates, per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuspicionRates {
    /// Gained per second at full strength (scaled by strength).
    pub gain_per_sec: f64,
    /// Lost per second while strength is zero.
    pub decay_per_sec: f64,
}

impl SuspicionRates {
    pub fn from_config(config: &DetectionConfig) -> Self {
        Self {
            gain_per_sec: config.suspicion_gain_per_sec,
            decay_per_sec: config.suspicion_decay_per_sec,
        }
    }
}

impl Default for SuspicionRates {
    fn default() -> Self {
        Self::from_config(&DetectionConfig::default())
    }
}

/// Smoothed detection signal in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SuspicionTimer {
    level: f64,
}

impl SuspicionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    /// Integrate one tick. Rises while detected, decays otherwise.
    pub fn update(&mut self, strength: f64, dt: f64, rates: &SuspicionRates) {
        let dt = dt.max(0.0);
        let delta = if strength > 0.0 {
            rates.gain_per_sec * strength.min(1.0) * dt
        } else {
            -rates.decay_per_sec * dt
        };
        self.level = (self.level + delta).clamp(0.0, 1.0);
    }

    pub fn reset(&mut self) {
        self.level = 0.0;
    }
}
