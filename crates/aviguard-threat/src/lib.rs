//! Threat assessment and deterrent decision logic for aviguard.
//!
//! Implements range/bearing estimation, threat scoring, the deterrent mode
//! state machine and the stochastic effectiveness model. Everything here is
//! a pure function of its inputs except the effectiveness model's injected
//! random source.

pub mod effectiveness;
pub mod fsm;
pub mod geometry;
pub mod scoring;

pub use aviguard_core as core;

#[cfg(test)]
mod tests;
