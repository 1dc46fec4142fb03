//! Range and bearing estimation from a single detection.
//!
//! Range uses the similar-triangles model
//! `distance = wingspan * focal_length / bbox_width`; bearing scales the
//! normalized frame offset by half the field of view on each axis.

use tracing::debug;

use aviguard_core::config::{SensorCalibration, SpeciesTable};
use aviguard_core::enums::Species;
use aviguard_core::types::{Bearing, Measurement, Observation};

/// Estimate range and bearing. Never fails: degenerate boxes yield the
/// configured fallback range.
pub fn estimate(
    observation: &Observation,
    sensor: &SensorCalibration,
    species: &SpeciesTable,
) -> Measurement {
    Measurement {
        distance_cm: estimate_distance(
            observation.species,
            observation.bbox_width,
            sensor,
            species,
        ),
        bearing: estimate_bearing(observation, sensor),
    }
}

/// Range in centimeters, clamped to the sensor's reportable interval.
pub fn estimate_distance(
    target: Species,
    bbox_width: f64,
    sensor: &SensorCalibration,
    species: &SpeciesTable,
) -> f64 {
    if bbox_width.is_nan() || bbox_width <= 0.0 {
        debug!(
            event = "geometry.fallback",
            species = ?target,
            bbox_width,
            fallback_cm = sensor.fallback_distance_cm,
        );
        return sensor.fallback_distance_cm;
    }

    let wingspan = species.profile(target).wingspan_cm;
    let distance = wingspan * sensor.focal_length_px / bbox_width;
    distance.clamp(sensor.min_distance_cm, sensor.max_distance_cm)
}

/// Angular offset from boresight. Offsets are taken as given; a well-formed
/// offset in [-1, 1] keeps each angle within half the field of view.
pub fn estimate_bearing(observation: &Observation, sensor: &SensorCalibration) -> Bearing {
    let half_fov = glam::DVec2::new(sensor.horizontal_fov_deg, sensor.vertical_fov_deg) * 0.5;
    let angles = observation.frame_offset * half_fov;
    Bearing {
        horizontal_deg: angles.x,
        vertical_deg: angles.y,
    }
}

/// Bounding-box width a bird of `target` species would occupy at `distance_cm`.
///
/// Inverse of [`estimate_distance`] (before clamping); used by simulated
/// perception sources to synthesize detections.
pub fn expected_bbox_width(
    target: Species,
    distance_cm: f64,
    sensor: &SensorCalibration,
    species: &SpeciesTable,
) -> f64 {
    species.profile(target).wingspan_cm * sensor.focal_length_px / distance_cm.max(f64::EPSILON)
}
