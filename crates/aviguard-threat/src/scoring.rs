//! Threat scoring and the per-cycle reduction to a single assessment.
//!
//! Pure functions over plain data. The reduction uses a total order on
//! assessments, so folding a batch gives the same answer in any order.

use std::cmp::Ordering;

use tracing::{debug, info};

use aviguard_core::config::{MissionConfig, SpeciesTable, ThreatConfig};
use aviguard_core::enums::{Species, ThreatLevel};
use aviguard_core::events::RejectReason;
use aviguard_core::types::{Measurement, Observation, ThreatAssessment};

use crate::geometry;

/// Bonus for the first (nearest) band whose upper bound exceeds `distance_cm`.
pub fn distance_bonus(distance_cm: f64, threat: &ThreatConfig) -> i32 {
    threat
        .distance_bands
        .iter()
        .find(|band| distance_cm < band.below_cm)
        .map_or(0, |band| band.bonus)
}

/// Map a total score onto a level, highest threshold first.
pub fn level_for_score(score: i32, threat: &ThreatConfig) -> ThreatLevel {
    if score >= threat.high_threshold {
        ThreatLevel::High
    } else if score >= threat.medium_threshold {
        ThreatLevel::Medium
    } else if score >= threat.low_threshold {
        ThreatLevel::Low
    } else {
        ThreatLevel::None
    }
}

/// Rate one measurement of `species`.
pub fn score(
    measurement: &Measurement,
    species: Species,
    table: &SpeciesTable,
    threat: &ThreatConfig,
) -> ThreatAssessment {
    let base = table.profile(species).base_threat;
    let score = base + distance_bonus(measurement.distance_cm, threat);
    ThreatAssessment {
        species,
        distance_cm: measurement.distance_cm,
        score,
        level: level_for_score(score, threat),
    }
}

/// Total severity order: level, then score, then the closer target, then species.
pub fn severity_cmp(a: &ThreatAssessment, b: &ThreatAssessment) -> Ordering {
    a.level
        .cmp(&b.level)
        .then(a.score.cmp(&b.score))
        .then(b.distance_cm.total_cmp(&a.distance_cm))
        .then(a.species.cmp(&b.species))
}

/// The more severe of two assessments. Commutative and associative.
pub fn more_severe(a: ThreatAssessment, b: ThreatAssessment) -> ThreatAssessment {
    match severity_cmp(&a, &b) {
        Ordering::Less => b,
        _ => a,
    }
}

/// Reduce any number of assessments to the single most severe one.
pub fn most_severe<I>(assessments: I) -> Option<ThreatAssessment>
where
    I: IntoIterator<Item = ThreatAssessment>,
{
    assessments.into_iter().reduce(more_severe)
}

/// Gate, estimate and score a single observation.
///
/// Malformed confidence and sub-threshold detections are rejected; bad
/// geometry is not, the estimator falls back to its default range instead.
pub fn assess_observation(
    observation: &Observation,
    config: &MissionConfig,
) -> Result<ThreatAssessment, RejectReason> {
    if !observation.has_valid_confidence() {
        debug!(
            event = "observation.rejected",
            species = ?observation.species,
            confidence = observation.confidence,
            reason = "invalid_confidence",
        );
        return Err(RejectReason::InvalidConfidence);
    }
    if observation.confidence <= config.sensor.min_confidence {
        debug!(
            event = "observation.rejected",
            species = ?observation.species,
            confidence = observation.confidence,
            reason = "low_confidence",
        );
        return Err(RejectReason::LowConfidence);
    }
    if observation.species == Species::Unknown {
        info!(
            event = "observation.unknown_species",
            "unrecognized species, using default calibration"
        );
    }

    let measurement = geometry::estimate(observation, &config.sensor, &config.species);
    Ok(score(
        &measurement,
        observation.species,
        &config.species,
        &config.threat,
    ))
}

/// Outcome of assessing every observation in one cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchAssessment {
    /// Most severe accepted assessment, `None` if nothing was accepted.
    pub primary: Option<ThreatAssessment>,
    pub accepted: usize,
    pub rejected: Vec<(Species, RejectReason)>,
}

impl BatchAssessment {
    /// Level handed to the state machine; an empty batch reads as `None`.
    pub fn level(&self) -> ThreatLevel {
        self.primary.map_or(ThreatLevel::None, |a| a.level)
    }
}

/// Assess a batch of simultaneous observations and keep the most severe.
pub fn assess_batch(observations: &[Observation], config: &MissionConfig) -> BatchAssessment {
    let mut batch = BatchAssessment::default();
    let mut accepted = Vec::with_capacity(observations.len());
    for observation in observations {
        match assess_observation(observation, config) {
            Ok(assessment) => accepted.push(assessment),
            Err(reason) => batch.rejected.push((observation.species, reason)),
        }
    }
    batch.accepted = accepted.len();
    batch.primary = most_severe(accepted);
    batch
}
