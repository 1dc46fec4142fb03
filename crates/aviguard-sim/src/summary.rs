//! Running statistics folded into the end-of-mission summary.

use std::collections::BTreeMap;

use aviguard_core::enums::Species;
use aviguard_core::events::DeterrentOutcome;
use aviguard_core::state::{MissionState, MissionSummary};

#[derive(Debug, Clone, Default)]
pub struct SummaryAccumulator {
    cycles: u64,
    detections: u64,
    activations: u64,
    successes: u64,
    species_activations: BTreeMap<Species, u64>,
    power_sum_w: f64,
    peak_power_w: f64,
}

impl SummaryAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// One integrated cycle at `power_w`.
    pub fn record_cycle(&mut self, power_w: f64) {
        self.cycles += 1;
        self.power_sum_w += power_w;
        self.peak_power_w = self.peak_power_w.max(power_w);
    }

    /// Observations that passed gating this cycle.
    pub fn record_detections(&mut self, accepted: usize) {
        self.detections += accepted as u64;
    }

    pub fn record_outcome(&mut self, outcome: &DeterrentOutcome) {
        self.activations += 1;
        if outcome.succeeded {
            self.successes += 1;
        }
        *self.species_activations.entry(outcome.species).or_insert(0) += 1;
    }

    pub fn finish(&self, mission: &MissionState) -> MissionSummary {
        let average_power_w = if self.cycles == 0 {
            0.0
        } else {
            self.power_sum_w / self.cycles as f64
        };
        MissionSummary {
            status: mission.status,
            distance_m: mission.distance_traveled_m.min(mission.total_distance_m),
            total_distance_m: mission.total_distance_m,
            elapsed_minutes: mission.elapsed_secs / 60.0,
            final_battery_percent: mission.battery_percent,
            detections: self.detections,
            activations: self.activations,
            successful_deterrents: self.successes,
            species_activations: self.species_activations.clone(),
            average_power_w,
            peak_power_w: self.peak_power_w,
        }
    }
}
