//! Spawns birds while the mission is inside the attack zone.

use glam::DVec2;
use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use aviguard_core::config::ScenarioConfig;
use aviguard_core::enums::{ScenarioKind, Species};
use aviguard_core::state::MissionState;

use crate::components::{Bird, Encounter, Range};

/// Species the scenario draws from, uniformly.
pub const ENCOUNTER_SPECIES: [Species; 4] =
    [Species::Eagle, Species::Hawk, Species::Crow, Species::Pigeon];

/// True when the route position lies inside the configured attack zone.
pub fn in_attack_zone(config: &ScenarioConfig, distance_m: f64) -> bool {
    let (start, end) = config.attack_zone_bounds();
    (start..=end).contains(&distance_m)
}

/// Roll for a new encounter. Returns whether a bird was spawned.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    config: &ScenarioConfig,
    mission: &MissionState,
) -> bool {
    if config.kind == ScenarioKind::Quiet
        || !in_attack_zone(config, mission.distance_traveled_m)
        || !rng.gen_bool(config.encounter_probability.clamp(0.0, 1.0))
    {
        return false;
    }

    let species = ENCOUNTER_SPECIES[rng.gen_range(0..ENCOUNTER_SPECIES.len())];
    let range_cm = rng.gen_range(config.spawn_min_cm..=config.spawn_max_cm);
    let confidence = rng.gen_range(config.confidence_min..=config.confidence_max);
    let frame_offset = DVec2::new(rng.gen_range(-1.0..=1.0), rng.gen_range(-1.0..=1.0));

    debug!(
        event = "scenario.spawned",
        species = ?species,
        range_cm,
        confidence,
        distance_m = mission.distance_traveled_m,
    );
    world.spawn((
        Bird {
            species,
            confidence,
            frame_offset,
        },
        Range(range_cm),
        Encounter::default(),
    ));
    true
}
