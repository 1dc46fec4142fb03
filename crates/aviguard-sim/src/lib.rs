//! Mission-level side of the aviguard controller.
//!
//! Holds the power & mission integrator, the per-cycle controller, telemetry
//! sinks and a seeded hecs encounter scenario used as the perception source.

pub mod components;
pub mod controller;
pub mod engine;
pub mod error;
pub mod integrator;
pub mod scenario;
pub mod summary;
pub mod systems;
pub mod telemetry;

pub use aviguard_core as core;
pub use controller::{CycleReport, DeterrentController};
pub use engine::{EngineConfig, MissionEngine};
pub use error::{TelemetryError, TelemetryResult};
