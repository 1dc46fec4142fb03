//! Seeded bird-encounter scenario standing in for the perception source.
//!
//! Owns a hecs world of simulated birds and its own ChaCha8 stream, so the
//! encounters of a run depend only on the seed and the route position.

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use aviguard_core::config::{MissionConfig, ScenarioConfig, SensorCalibration, SpeciesTable};
use aviguard_core::events::DeterrentOutcome;
use aviguard_core::state::MissionState;
use aviguard_core::types::Observation;

use crate::components::{Bird, Encounter, Range};
use crate::systems;

/// ChaCha stream reserved for encounter rolls; stream 0 drives effectiveness.
const SCENARIO_STREAM: u64 = 1;

/// Anything that supplies a batch of observations per cycle.
pub trait ObservationSource {
    fn observe(&mut self, mission: &MissionState, dt: f64) -> Vec<Observation>;

    /// Feedback from a deterrent activation.
    fn on_outcome(&mut self, _outcome: &DeterrentOutcome) {}
}

pub struct EncounterScenario {
    world: World,
    rng: ChaCha8Rng,
    config: ScenarioConfig,
    sensor: SensorCalibration,
    species: SpeciesTable,
    despawn_buffer: Vec<Entity>,
    spawned: u64,
}

impl EncounterScenario {
    pub fn new(config: &MissionConfig, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(SCENARIO_STREAM);
        Self {
            world: World::new(),
            rng,
            config: config.scenario.clone(),
            sensor: config.sensor.clone(),
            species: config.species.clone(),
            despawn_buffer: Vec::new(),
            spawned: 0,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world access (for tests placing birds directly).
    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Birds spawned since the start of the run.
    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    /// Mark the nearest undeterred bird of the outcome's species as deterred.
    /// Returns false if no such bird is in the world.
    pub fn mark_deterred(&mut self, outcome: &DeterrentOutcome) -> bool {
        let target = self
            .world
            .query_mut::<(&Bird, &Range, &Encounter)>()
            .into_iter()
            .filter(|(_, (bird, _, encounter))| {
                bird.species == outcome.species && !encounter.deterred
            })
            .min_by(|(_, (_, a, _)), (_, (_, b, _))| a.0.total_cmp(&b.0))
            .map(|(entity, _)| entity);

        let Some(entity) = target else {
            return false;
        };
        if let Ok(mut encounter) = self.world.get::<&mut Encounter>(entity) {
            encounter.deterred = true;
        }
        debug!(
            event = "scenario.deterred",
            activation_id = outcome.activation_id,
            species = ?outcome.species,
        );
        true
    }
}

impl ObservationSource for EncounterScenario {
    /// spawn -> movement -> perception -> cleanup
    fn observe(&mut self, mission: &MissionState, dt: f64) -> Vec<Observation> {
        if systems::spawner::run(&mut self.world, &mut self.rng, &self.config, mission) {
            self.spawned += 1;
        }
        systems::movement::run(
            &mut self.world,
            self.config.closing_speed_cm_s,
            self.sensor.min_distance_cm,
            dt,
        );
        let observations = systems::perception::run(&self.world, &self.sensor, &self.species);
        systems::cleanup::run(
            &mut self.world,
            &mut self.despawn_buffer,
            self.config.despawn_range_cm,
            self.config.max_encounter_steps,
        );
        observations
    }

    fn on_outcome(&mut self, outcome: &DeterrentOutcome) {
        if outcome.succeeded {
            self.mark_deterred(outcome);
        }
    }
}

/// Replays fixed batches in order, then reports an empty sky.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    batches: std::collections::VecDeque<Vec<Observation>>,
}

impl ScriptedSource {
    pub fn new(batches: impl IntoIterator<Item = Vec<Observation>>) -> Self {
        Self {
            batches: batches.into_iter().collect(),
        }
    }
}

impl ObservationSource for ScriptedSource {
    fn observe(&mut self, _mission: &MissionState, _dt: f64) -> Vec<Observation> {
        self.batches.pop_front().unwrap_or_default()
    }
}
