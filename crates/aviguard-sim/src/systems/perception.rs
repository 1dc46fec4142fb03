//! Simulated camera: turns birds in view into observations.

use hecs::World;

use aviguard_core::config::{SensorCalibration, SpeciesTable};
use aviguard_core::types::Observation;
use aviguard_threat::geometry::expected_bbox_width;

use crate::components::{Bird, Range};

/// Box height relative to width for a bird in flight.
const BBOX_ASPECT: f64 = 0.6;

/// One observation per bird within the sensor's maximum range.
pub fn run(world: &World, sensor: &SensorCalibration, species: &SpeciesTable) -> Vec<Observation> {
    let mut query = world.query::<(&Bird, &Range)>();
    let observations = query
        .iter()
        .filter(|(_, (_, range))| range.0 <= sensor.max_distance_cm)
        .map(|(_, (bird, range))| {
            let width = expected_bbox_width(bird.species, range.0, sensor, species);
            Observation::new(bird.species, width, width * BBOX_ASPECT, bird.confidence)
                .with_offset(bird.frame_offset.x, bird.frame_offset.y)
        })
        .collect();
    observations
}
