//! aviguard command-line application.
//!
//! Runs a mission on a dedicated loop thread, forwards injected observation
//! batches over a channel, and publishes the latest snapshot for polling.

pub mod logging;
pub mod mission_loop;
pub mod state;

pub use aviguard_core as core;
