//! Core types and definitions for the aviguard deterrent controller.
//!
//! This crate defines the vocabulary shared across all other crates:
//! observations, assessments, modes, mission state, events, configuration
//! and default calibration constants. Nothing here touches hardware.

pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;
