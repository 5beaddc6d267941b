//! Alerting for SHADOWLINE.
//!
//! Turns the per-tick maximum detection strength into a hysteretic alert
//! state, tracks suspicion, and watches for sustained discovery.
//! No ECS dependency; operates on plain data.

pub mod fsm;
pub mod mission;
pub mod suspicion;

pub use shadowline_core as core;

pub use fsm::{AlertMachine, StateTransition};
pub use mission::MissionMonitor;
pub use suspicion::{SuspicionRates, SuspicionTimer};
