//! Visibility and audibility for SHADOWLINE.
//!
//! Field-of-view math, obstacle occlusion, and the per-sensor strength
//! functions. Everything here is a pure function over plain data.

pub use shadowline_core as core;

pub mod angles;
pub mod audio;
pub mod geometry;
pub mod los;
pub mod visibility;

// Re-export key functions for convenience.
pub use audio::audio_strength;
pub use los::has_line_of_sight;
pub use visibility::{calculate_visibility, sensor_strength};
