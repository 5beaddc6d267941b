//! Core types and definitions for the SHADOWLINE detection core.
//!
//! This crate defines the vocabulary shared across all other crates:
//! detectors, obstacles, events, commands, snapshots, constants and
//! tunable configuration. It has no dependency on any game engine.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;
