//! Mission engine: drives the controller from an observation source.
//!
//! `MissionEngine` pairs a [`DeterrentController`] with an
//! [`ObservationSource`] and steps both at the configured time step.
//! Completely headless, so a whole mission can be replayed from a seed.

use std::collections::VecDeque;

use rand_chacha::ChaCha8Rng;
use tracing::info;

use aviguard_core::config::MissionConfig;
use aviguard_core::state::MissionSummary;
use aviguard_core::types::Observation;

use crate::controller::{CycleReport, DeterrentController};
use crate::error::TelemetryResult;
use crate::scenario::{EncounterScenario, ObservationSource};
use crate::telemetry::TelemetrySink;

/// Configuration for starting a new mission run.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// RNG seed for determinism. Same seed = same mission.
    pub seed: u64,
    pub mission: MissionConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            mission: MissionConfig::default(),
        }
    }
}

pub struct MissionEngine<S = EncounterScenario> {
    controller: DeterrentController<ChaCha8Rng>,
    source: S,
    injected: VecDeque<Vec<Observation>>,
    dt: f64,
}

impl MissionEngine<EncounterScenario> {
    /// Engine fed by the seeded encounter scenario.
    pub fn new(config: EngineConfig) -> Self {
        let scenario = EncounterScenario::new(&config.mission, config.seed);
        Self::with_source(config, scenario)
    }
}

impl<S: ObservationSource> MissionEngine<S> {
    pub fn with_source(config: EngineConfig, source: S) -> Self {
        let dt = config.mission.mission.time_step_secs;
        Self {
            controller: DeterrentController::seeded(config.mission, config.seed),
            source,
            injected: VecDeque::new(),
            dt,
        }
    }

    pub fn controller(&self) -> &DeterrentController<ChaCha8Rng> {
        &self.controller
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn is_finished(&self) -> bool {
        self.controller.is_finished()
    }

    /// False once the mission ended or the step cap was reached.
    pub fn should_continue(&self) -> bool {
        !self.is_finished()
            && self.controller.time().tick < self.controller.config().mission.max_steps
    }

    /// Queue an externally supplied batch; it joins the next cycle's observations.
    pub fn inject(&mut self, observations: Vec<Observation>) {
        self.injected.push_back(observations);
    }

    /// Run one cycle and return its report.
    pub fn step(&mut self) -> CycleReport {
        let mut observations = self.source.observe(self.controller.mission(), self.dt);
        if let Some(extra) = self.injected.pop_front() {
            observations.extend(extra);
        }

        let report = self.controller.cycle(&observations, self.dt);
        if let Some(outcome) = &report.outcome {
            self.source.on_outcome(outcome);
        }
        report
    }

    /// Step until the mission ends or the step cap is reached, publishing
    /// every cycle to `sink`, and return the summary.
    pub fn run(&mut self, sink: &mut dyn TelemetrySink) -> TelemetryResult<MissionSummary> {
        while self.should_continue() {
            self.step().publish(sink)?;
        }
        self.finish(sink)
    }

    /// Record the mission summary to `sink` and flush it.
    pub fn finish(&mut self, sink: &mut dyn TelemetrySink) -> TelemetryResult<MissionSummary> {
        let summary = self.controller.summary();
        info!(
            event = "mission.summary",
            status = ?summary.status,
            steps = self.controller.time().tick,
            activations = summary.activations,
            successes = summary.successful_deterrents,
            final_battery_percent = summary.final_battery_percent,
        );
        sink.record_summary(&summary)?;
        sink.flush()?;
        Ok(summary)
    }
}
