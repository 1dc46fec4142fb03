//! Records emitted by the controller for the telemetry/log sink.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Result of one deterrent activation. Never mutated after creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeterrentOutcome {
    /// Monotonic, starting at 1.
    pub activation_id: u64,
    pub mode: SystemMode,
    pub species: Species,
    pub distance_cm: f64,
    pub succeeded: bool,
}

/// Why an observation was dropped before scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// Confidence outside [0, 1] or not a number.
    InvalidConfidence,
    /// Confidence below the configured detection threshold.
    LowConfidence,
}

/// Controller events, one stream per mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ControllerEvent {
    ModeChanged {
        from: SystemMode,
        to: SystemMode,
        level: ThreatLevel,
    },
    DeterrentActivated { outcome: DeterrentOutcome },
    ObservationRejected {
        species: Species,
        reason: RejectReason,
    },
    /// Route progress crossed a milestone fraction.
    Milestone { percent: u8, distance_m: f64 },
    LowBatteryWarning { battery_percent: f64 },
    EmergencyEntered { battery_percent: f64 },
    EmergencyCleared,
    MissionCompleted { elapsed_secs: f64 },
    MissionAborted {
        elapsed_secs: f64,
        distance_m: f64,
    },
}
