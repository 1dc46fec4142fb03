//! Deterrent effectiveness model.
//!
//! Success probability is additive: base rate + mode bonus + species modifier
//! - proximity penalty, clamped to [0, 1] and sampled as one Bernoulli trial.
//! This is the only stochastic step in the controller; the random source is
//! injected so runs can be replayed exactly.

use std::collections::VecDeque;

use rand::Rng;
use tracing::info;

use aviguard_core::config::{EffectivenessConfig, SpeciesTable};
use aviguard_core::enums::{Species, SystemMode};
use aviguard_core::events::DeterrentOutcome;

/// A source of uniform samples in [0, 1).
pub trait UniformSource {
    fn next_uniform(&mut self) -> f64;
}

impl<R: Rng> UniformSource for R {
    fn next_uniform(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Replays a fixed sequence of samples, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    samples: VecDeque<f64>,
}

impl SequenceSource {
    /// # Panics
    /// If `samples` is empty.
    pub fn new(samples: impl IntoIterator<Item = f64>) -> Self {
        let samples: VecDeque<f64> = samples.into_iter().collect();
        assert!(!samples.is_empty(), "SequenceSource needs at least one sample");
        Self { samples }
    }
}

impl UniformSource for SequenceSource {
    fn next_uniform(&mut self) -> f64 {
        let sample = self.samples.pop_front().unwrap_or_default();
        self.samples.push_back(sample);
        sample
    }
}

/// Composed success probability before clamping.
///
/// # Panics
/// If `mode` cannot activate deterrents. The state machine never requests an
/// activation in standby or emergency; reaching this is a transition-table bug.
pub fn raw_success_probability(
    mode: SystemMode,
    species: Species,
    distance_cm: f64,
    config: &EffectivenessConfig,
    table: &SpeciesTable,
) -> f64 {
    let mode_bonus = config.mode_bonus(mode);
    assert!(
        mode_bonus.is_some(),
        "deterrent activation requested in {mode:?}, which enables no actuators"
    );

    let mut probability = config.base_probability + mode_bonus.unwrap_or_default();
    probability += table.profile(species).success_modifier;
    if distance_cm < config.proximity_range_cm {
        probability -= config.proximity_penalty;
    }
    probability
}

/// Success probability clamped to [0, 1].
pub fn success_probability(
    mode: SystemMode,
    species: Species,
    distance_cm: f64,
    config: &EffectivenessConfig,
    table: &SpeciesTable,
) -> f64 {
    raw_success_probability(mode, species, distance_cm, config, table).clamp(0.0, 1.0)
}

/// Issues activation ids and runs the Bernoulli trial for each activation.
#[derive(Debug, Clone)]
pub struct EffectivenessModel {
    config: EffectivenessConfig,
    species: SpeciesTable,
    last_activation_id: u64,
}

impl EffectivenessModel {
    pub fn new(config: EffectivenessConfig, species: SpeciesTable) -> Self {
        Self {
            config,
            species,
            last_activation_id: 0,
        }
    }

    /// Number of activations attempted so far.
    pub fn activations(&self) -> u64 {
        self.last_activation_id
    }

    /// One activation attempt. Ids start at 1 and increase by one per call.
    ///
    /// # Panics
    /// If `mode` is standby or emergency; see [`raw_success_probability`].
    pub fn attempt<S: UniformSource + ?Sized>(
        &mut self,
        mode: SystemMode,
        species: Species,
        distance_cm: f64,
        source: &mut S,
    ) -> DeterrentOutcome {
        let probability =
            success_probability(mode, species, distance_cm, &self.config, &self.species);
        let succeeded = source.next_uniform() < probability;

        self.last_activation_id += 1;
        let outcome = DeterrentOutcome {
            activation_id: self.last_activation_id,
            mode,
            species,
            distance_cm,
            succeeded,
        };

        info!(
            event = "deterrent.activated",
            activation_id = outcome.activation_id,
            mode = ?mode,
            species = ?species,
            distance_cm,
            probability,
            succeeded,
        );
        outcome
    }
}
