//! Per-cycle data types flowing from perception to the state machine.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::enums::{Species, ThreatLevel};

/// One detected object, as handed over by the perception source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub species: Species,
    /// Bounding box width in pixels.
    pub bbox_width: f64,
    /// Bounding box height in pixels.
    pub bbox_height: f64,
    /// Detector confidence in [0, 1].
    pub confidence: f64,
    /// Box center relative to the frame center, each axis normalized to [-1, 1].
    pub frame_offset: DVec2,
}

impl Observation {
    pub fn new(species: Species, bbox_width: f64, bbox_height: f64, confidence: f64) -> Self {
        Self {
            species,
            bbox_width,
            bbox_height,
            confidence,
            frame_offset: DVec2::ZERO,
        }
    }

    pub fn with_offset(mut self, x: f64, y: f64) -> Self {
        self.frame_offset = DVec2::new(x, y);
        self
    }

    /// True when confidence is a finite value inside [0, 1].
    pub fn has_valid_confidence(&self) -> bool {
        self.confidence.is_finite() && (0.0..=1.0).contains(&self.confidence)
    }
}

/// Angular offset of a target from the sensor boresight, in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bearing {
    pub horizontal_deg: f64,
    pub vertical_deg: f64,
}

/// Range and bearing derived from a single observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Estimated range in centimeters.
    pub distance_cm: f64,
    pub bearing: Bearing,
}

/// Threat rating for one observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreatAssessment {
    pub species: Species,
    pub distance_cm: f64,
    pub score: i32,
    pub level: ThreatLevel,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of completed cycles.
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one cycle of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }
}
