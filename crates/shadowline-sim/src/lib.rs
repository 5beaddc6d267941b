//! Detection engine for SHADOWLINE.
//!
//! Owns the hecs world of registered detectors, runs one evaluation pass
//! per tick, feeds the alert machine, and publishes detection events.

pub mod bus;
pub mod engine;
pub mod level;
pub mod registry;
pub mod snapshot;

pub use shadowline_core as core;
pub use engine::DetectionEngine;
pub use level::LevelDefinition;
pub use registry::SensorRegistry;

#[cfg(test)]
mod tests;
