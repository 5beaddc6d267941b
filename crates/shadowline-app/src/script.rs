//! Scripted target paths.
//!
//! The target starts on the first waypoint, holds there for `hold_secs`,
//! then travels in a straight line to the next one at constant speed. A
//! waypoint's `noise` is what the target emits while travelling to it and
//! while holding on it.

use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use shadowline_core::components::Target;
use shadowline_core::types::{Position, Velocity};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub position: Position,
    #[serde(default)]
    pub noise: f64,
    #[serde(default)]
    pub hold_secs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetScript {
    pub waypoints: Vec<Waypoint>,
    /// World units per second.
    pub speed: f64,
}

impl TargetScript {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let script: TargetScript = serde_json::from_str(json).context("malformed target script")?;
        script.validate()?;
        Ok(script)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading target script {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("loading target script {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.waypoints.is_empty(), "target script has no waypoints");
        ensure!(
            self.speed.is_finite() && self.speed > 0.0,
            "target speed must be positive, got {}",
            self.speed
        );
        for (i, wp) in self.waypoints.iter().enumerate() {
            ensure!(wp.position.is_finite(), "waypoint {i} has a non-finite position");
            ensure!(
                wp.noise.is_finite() && wp.noise >= 0.0,
                "waypoint {i} noise must be non-negative"
            );
            ensure!(
                wp.hold_secs.is_finite() && wp.hold_secs >= 0.0,
                "waypoint {i} hold must be non-negative"
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Leg {
    Holding { remaining: f64 },
    Moving,
}

/// Plays a `TargetScript` forward in time.
#[derive(Debug, Clone)]
pub struct ScriptPlayer {
    script: TargetScript,
    position: Position,
    velocity: Velocity,
    /// Waypoint being held on or travelled to.
    current: usize,
    leg: Leg,
}

impl ScriptPlayer {
    /// Callers pass a validated script.
    pub fn new(script: TargetScript) -> Self {
        let (position, hold) = script
            .waypoints
            .first()
            .map(|wp| (wp.position, wp.hold_secs))
            .unwrap_or_default();
        Self {
            script,
            position,
            velocity: Velocity::default(),
            current: 0,
            leg: Leg::Holding { remaining: hold },
        }
    }

    pub fn is_finished(&self) -> bool {
        self.current >= self.script.waypoints.len()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Target state at the current instant.
    pub fn target(&self) -> Target {
        let noise = self
            .script
            .waypoints
            .get(self.current)
            .or_else(|| self.script.waypoints.last())
            .map(|wp| wp.noise)
            .unwrap_or(0.0);
        Target::new(self.position, noise).with_velocity(self.velocity)
    }

    /// Move along the path by `dt` seconds. Several waypoints may be passed
    /// in one step.
    pub fn advance(&mut self, dt: f64) {
        let start = self.position;
        let mut budget = dt.max(0.0);

        while budget > 0.0 && !self.is_finished() {
            match self.leg {
                Leg::Holding { remaining } => {
                    if remaining > budget {
                        self.leg = Leg::Holding {
                            remaining: remaining - budget,
                        };
                        budget = 0.0;
                    } else {
                        budget -= remaining;
                        self.current += 1;
                        self.leg = Leg::Moving;
                    }
                }
                Leg::Moving => {
                    let goal = self.script.waypoints[self.current].position;
                    let distance = self.position.distance_to(&goal);
                    let reach = self.script.speed * budget;
                    if reach < distance {
                        self.position = self.position.lerp(&goal, reach / distance);
                        budget = 0.0;
                    } else {
                        self.position = goal;
                        budget -= distance / self.script.speed;
                        self.leg = Leg::Holding {
                            remaining: self.script.waypoints[self.current].hold_secs,
                        };
                    }
                }
            }
        }

        self.velocity = if dt > 0.0 {
            Velocity::new(
                (self.position.x - start.x) / dt,
                (self.position.y - start.y) / dt,
            )
        } else {
            Velocity::default()
        };
    }
}
