//! Alert state machine.
//!
//! Escalation is immediate: the highest threshold exceeded this tick wins
//! and the state never drops because of a weaker detection. Relaxation only
//! happens through the alert timer: a strong detection arms it for the
//! full timeout, and the state returns to SAFE once it has run out and the
//! strength is back below the caution threshold.

use serde::{Deserialize, Serialize};

use shadowline_core::config::DetectionConfig;
use shadowline_core::enums::AlertState;
use shadowline_core::types::SimTime;

use crate::suspicion::{SuspicionRates, SuspicionTimer};

/// Thresholds and timeout driving transitions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertParams {
    pub caution_threshold: f64,
    pub alert_threshold: f64,
    pub discovered_threshold: f64,
    pub alert_timeout_secs: f64,
    pub suspicion: SuspicionRates,
}

impl AlertParams {
    pub fn from_config(config: &DetectionConfig) -> Self {
        Self {
            caution_threshold: config.caution_threshold,
            alert_threshold: config.alert_threshold,
            discovered_threshold: config.discovered_threshold,
            alert_timeout_secs: config.alert_timeout_secs,
            suspicion: SuspicionRates::from_config(config),
        }
    }

    /// State demanded by a strength, if it crosses any threshold.
    pub fn classify(&self, strength: f64) -> Option<AlertState> {
        if strength > self.discovered_threshold {
            Some(AlertState::Discovered)
        } else if strength > self.alert_threshold {
            Some(AlertState::Alert)
        } else if strength > self.caution_threshold {
            Some(AlertState::Caution)
        } else {
            None
        }
    }
}

impl Default for AlertParams {
    fn default() -> Self {
        Self::from_config(&DetectionConfig::default())
    }
}

/// A change of alert state. At most one per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTransition {
    pub previous: AlertState,
    pub current: AlertState,
}

/// Aggregate alert state for one mission.
#[derive(Debug, Clone)]
pub struct AlertMachine {
    params: AlertParams,
    state: AlertState,
    alert_timer: f64,
    suspicion: SuspicionTimer,
    time_in_state: f64,
    held_since: SimTime,
}

impl AlertMachine {
    pub fn new(params: AlertParams) -> Self {
        Self {
            params,
            state: AlertState::Safe,
            alert_timer: 0.0,
            suspicion: SuspicionTimer::new(),
            time_in_state: 0.0,
            held_since: SimTime::default(),
        }
    }

    pub fn from_config(config: &DetectionConfig) -> Self {
        Self::new(AlertParams::from_config(config))
    }

    pub fn params(&self) -> &AlertParams {
        &self.params
    }

    pub fn state(&self) -> AlertState {
        self.state
    }

    /// Seconds left before an elevated state may relax.
    pub fn alert_timer(&self) -> f64 {
        self.alert_timer
    }

    pub fn suspicion(&self) -> f64 {
        self.suspicion.level()
    }

    /// Seconds the current state has held without interruption.
    pub fn time_in_state(&self) -> f64 {
        self.time_in_state
    }

    /// Sim time at which the current state was entered.
    pub fn held_since(&self) -> SimTime {
        self.held_since
    }

    /// Whether `state` has held continuously since at least `tick`.
    pub fn held_since_tick(&self, state: AlertState, tick: u64) -> bool {
        self.state == state && self.held_since.tick <= tick
    }

    /// Advance one tick with the strongest sensor strength observed.
    ///
    /// `now` is the sim time at the end of this tick. Returns the transition
    /// if the state changed.
    pub fn update(&mut self, max_strength: f64, dt: f64, now: SimTime) -> Option<StateTransition> {
        let dt = dt.max(0.0);
        let strength = if max_strength.is_nan() {
            0.0
        } else {
            max_strength.clamp(0.0, 1.0)
        };

        self.alert_timer = (self.alert_timer - dt).max(0.0);
        self.suspicion.update(strength, dt, &self.params.suspicion);

        let next = match self.params.classify(strength) {
            Some(demanded) => {
                if demanded >= AlertState::Alert {
                    self.alert_timer = self.params.alert_timeout_secs;
                }
                self.state.max(demanded)
            }
            None if self.alert_timer <= 0.0 => AlertState::Safe,
            None => self.state,
        };

        if next == self.state {
            self.time_in_state += dt;
            return None;
        }

        let transition = StateTransition {
            previous: self.state,
            current: next,
        };
        self.state = next;
        self.time_in_state = 0.0;
        self.held_since = now;
        Some(transition)
    }

    /// Back to SAFE with cleared timers, as at mission start.
    pub fn reset(&mut self) {
        *self = Self::new(self.params);
    }
}

impl Default for AlertMachine {
    fn default() -> Self {
        Self::new(AlertParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(tick: u64) -> SimTime {
        SimTime {
            tick,
            elapsed_secs: tick as f64,
        }
    }

    #[test]
    fn test_classify_highest_wins() {
        let p = AlertParams::default();
        assert_eq!(p.classify(0.9), Some(AlertState::Discovered));
        assert_eq!(p.classify(0.6), Some(AlertState::Alert));
        assert_eq!(p.classify(0.3), Some(AlertState::Caution));
        assert_eq!(p.classify(0.2), None);
        assert_eq!(p.classify(0.0), None);
    }

    #[test]
    fn test_thresholds_are_exclusive() {
        let p = AlertParams::default();
        assert_eq!(p.classify(0.8), Some(AlertState::Alert));
        assert_eq!(p.classify(0.5), Some(AlertState::Caution));
    }

    #[test]
    fn test_safe_to_caution_does_not_arm_timer() {
        let mut m = AlertMachine::default();
        let t = m.update(0.3, 1.0, at(1));
        assert_eq!(
            t,
            Some(StateTransition {
                previous: AlertState::Safe,
                current: AlertState::Caution
            })
        );
        assert_eq!(m.alert_timer(), 0.0);
        // Nothing keeps caution alive once the glimpse is gone
        assert!(m.update(0.0, 1.0, at(2)).is_some());
        assert_eq!(m.state(), AlertState::Safe);
    }

    #[test]
    fn test_weaker_detection_never_lowers_state() {
        let mut m = AlertMachine::default();
        m.update(0.95, 1.0, at(1));
        assert_eq!(m.state(), AlertState::Discovered);
        assert!(m.update(0.6, 1.0, at(2)).is_none());
        assert!(m.update(0.3, 1.0, at(3)).is_none());
        assert_eq!(m.state(), AlertState::Discovered);
    }

    #[test]
    fn test_unchanged_tick_returns_nothing() {
        let mut m = AlertMachine::default();
        assert!(m.update(0.0, 1.0, at(1)).is_none());
        assert!(m.update(0.6, 1.0, at(2)).is_some());
        assert!(m.update(0.6, 1.0, at(3)).is_none());
        assert!(m.update(0.0, 1.0, at(4)).is_none());
    }

    #[test]
    fn test_time_in_state_resets_on_transition() {
        let mut m = AlertMachine::default();
        m.update(0.0, 2.0, at(1));
        assert_eq!(m.time_in_state(), 2.0);
        m.update(0.9, 2.0, at(2));
        assert_eq!(m.time_in_state(), 0.0);
        assert_eq!(m.held_since(), at(2));
        m.update(0.9, 0.5, at(3));
        assert_eq!(m.time_in_state(), 0.5);
        assert!(m.held_since_tick(AlertState::Discovered, 2));
        assert!(!m.held_since_tick(AlertState::Discovered, 1));
        assert!(!m.held_since_tick(AlertState::Alert, 5));
    }

    #[test]
    fn test_nan_strength_treated_as_zero() {
        let mut m = AlertMachine::default();
        assert!(m.update(f64::NAN, 1.0, at(1)).is_none());
        assert_eq!(m.state(), AlertState::Safe);
    }

    #[test]
    fn test_reset_restores_safe() {
        let mut m = AlertMachine::default();
        m.update(0.9, 1.0, at(1));
        m.reset();
        assert_eq!(m.state(), AlertState::Safe);
        assert_eq!(m.alert_timer(), 0.0);
        assert_eq!(m.suspicion(), 0.0);
        assert_eq!(m.held_since(), SimTime::default());
    }
}
