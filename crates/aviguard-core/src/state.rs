//! Mission state and the snapshots handed to external consumers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::MissionParams;
use crate::enums::*;
use crate::types::SimTime;

/// Time-integrated mission progress. Mutated only by the integrator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissionState {
    pub elapsed_secs: f64,
    /// Meters along the route; never decreases.
    pub distance_traveled_m: f64,
    pub total_distance_m: f64,
    /// Remaining charge in percent, within [0, 100].
    pub battery_percent: f64,
    pub status: MissionStatus,
}

impl MissionState {
    /// Fresh state at the origin.
    pub fn start(params: &MissionParams) -> Self {
        Self {
            elapsed_secs: 0.0,
            distance_traveled_m: 0.0,
            total_distance_m: params.total_distance_m,
            battery_percent: params.initial_battery_percent.clamp(0.0, 100.0),
            status: MissionStatus::Running,
        }
    }

    /// Fraction of the route covered, within [0, 1].
    pub fn progress(&self) -> f64 {
        if self.total_distance_m <= 0.0 {
            return 1.0;
        }
        (self.distance_traveled_m / self.total_distance_m).clamp(0.0, 1.0)
    }
}

/// Desired actuator state for the driver. The controller never touches hardware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActuatorCommand {
    pub strobe: StrobeIntensity,
    pub audio: bool,
    /// Species whose distress call should be played when audio is on.
    pub call_species: Option<Species>,
}

impl ActuatorCommand {
    pub fn off() -> Self {
        Self::default()
    }
}

/// Per-cycle snapshot for the telemetry sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub time: SimTime,
    pub mode: SystemMode,
    pub threat_level: ThreatLevel,
    pub mission: MissionState,
    pub actuators: ActuatorCommand,
    /// Nominal draw of the mode active during this cycle (watts).
    pub power_w: f64,
    pub activations: u64,
}

/// End-of-mission statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionSummary {
    pub status: MissionStatus,
    pub distance_m: f64,
    pub total_distance_m: f64,
    pub elapsed_minutes: f64,
    pub final_battery_percent: f64,
    /// Observations that passed gating and were scored.
    pub detections: u64,
    pub activations: u64,
    pub successful_deterrents: u64,
    pub species_activations: BTreeMap<Species, u64>,
    pub average_power_w: f64,
    pub peak_power_w: f64,
}

impl MissionSummary {
    /// Deterrent success rate in percent, `None` before any activation.
    pub fn success_rate_percent(&self) -> Option<f64> {
        if self.activations == 0 {
            None
        } else {
            Some(self.successful_deterrents as f64 / self.activations as f64 * 100.0)
        }
    }
}
