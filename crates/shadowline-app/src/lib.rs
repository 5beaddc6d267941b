//! Headless runner for SHADOWLINE levels.
//!
//! Drives the detection engine at a fixed tick against a scripted target
//! path and reports how the guards reacted. Used for level tuning and
//! regression runs without the game client.

pub mod runner;
pub mod script;
