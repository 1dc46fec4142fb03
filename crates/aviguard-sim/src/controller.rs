//! The deterrent controller: one observation batch in, one integrated step out.
//!
//! `DeterrentController` is the explicit mutable context for a mission. It owns
//! the mode state machine, the mission state, the activation log and the
//! random source, and is the single writer for all of them. Each call to
//! [`DeterrentController::cycle`] runs the full control flow:
//! assess -> transition -> (maybe) activate -> integrate.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use aviguard_core::config::MissionConfig;
use aviguard_core::constants::MILESTONE_FRACTIONS;
use aviguard_core::enums::{MissionStatus, SystemMode, ThreatLevel};
use aviguard_core::events::{ControllerEvent, DeterrentOutcome};
use aviguard_core::state::{ActuatorCommand, MissionState, MissionSummary, TelemetrySnapshot};
use aviguard_core::types::{Observation, SimTime};
use aviguard_threat::effectiveness::{EffectivenessModel, UniformSource};
use aviguard_threat::fsm::{actuators_for, DeterrentStateMachine, ModeUpdate};
use aviguard_threat::scoring::{assess_batch, BatchAssessment};

use crate::error::TelemetryResult;
use crate::integrator::{effective_dt, PowerIntegrator};
use crate::summary::SummaryAccumulator;
use crate::telemetry::TelemetrySink;

/// Everything that happened in one control cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub batch: BatchAssessment,
    pub mode_update: ModeUpdate,
    pub outcome: Option<DeterrentOutcome>,
    /// Actuator set to forward to the driver.
    pub actuators: ActuatorCommand,
    pub snapshot: TelemetrySnapshot,
    pub events: Vec<ControllerEvent>,
}

impl CycleReport {
    pub fn threat_level(&self) -> ThreatLevel {
        self.batch.level()
    }

    /// Hand the cycle's records to a sink: outcome, then events, then the snapshot.
    pub fn publish(&self, sink: &mut dyn TelemetrySink) -> TelemetryResult<()> {
        if let Some(outcome) = &self.outcome {
            sink.record_outcome(outcome)?;
        }
        for event in &self.events {
            sink.record_event(event)?;
        }
        sink.record_snapshot(&self.snapshot)
    }
}

pub struct DeterrentController<R = ChaCha8Rng> {
    config: MissionConfig,
    fsm: DeterrentStateMachine,
    integrator: PowerIntegrator,
    effectiveness: EffectivenessModel,
    source: R,
    mission: MissionState,
    time: SimTime,
    outcomes: Vec<DeterrentOutcome>,
    stats: SummaryAccumulator,
    milestones_reached: usize,
    low_battery_warned: bool,
    terminal_report: Option<CycleReport>,
}

impl DeterrentController<ChaCha8Rng> {
    /// Controller whose effectiveness draws come from a seeded ChaCha8 stream.
    pub fn seeded(config: MissionConfig, seed: u64) -> Self {
        Self::new(config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: UniformSource> DeterrentController<R> {
    pub fn new(config: MissionConfig, source: R) -> Self {
        let mission = MissionState::start(&config.mission);
        Self {
            fsm: DeterrentStateMachine::new(),
            integrator: PowerIntegrator::new(config.mission.clone(), config.power.clone()),
            effectiveness: EffectivenessModel::new(
                config.effectiveness.clone(),
                config.species.clone(),
            ),
            source,
            mission,
            time: SimTime::default(),
            outcomes: Vec::new(),
            stats: SummaryAccumulator::new(),
            milestones_reached: 0,
            low_battery_warned: false,
            terminal_report: None,
            config,
        }
    }

    pub fn config(&self) -> &MissionConfig {
        &self.config
    }

    pub fn mode(&self) -> SystemMode {
        self.fsm.mode()
    }

    pub fn mission(&self) -> &MissionState {
        &self.mission
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Activation log, oldest first.
    pub fn outcomes(&self) -> &[DeterrentOutcome] {
        &self.outcomes
    }

    pub fn is_finished(&self) -> bool {
        self.mission.status.is_terminal()
    }

    pub fn summary(&self) -> MissionSummary {
        self.stats.finish(&self.mission)
    }

    /// Run one control cycle over a batch of simultaneous observations and
    /// integrate `dt` seconds.
    ///
    /// Once the mission has ended the terminal report is returned again and
    /// nothing changes.
    pub fn cycle(&mut self, observations: &[Observation], dt: f64) -> CycleReport {
        if let Some(report) = &self.terminal_report {
            return report.clone();
        }

        let mut events = Vec::new();

        // 1. Assess
        let batch = assess_batch(observations, &self.config);
        self.stats.record_detections(batch.accepted);
        for &(species, reason) in &batch.rejected {
            events.push(ControllerEvent::ObservationRejected { species, reason });
        }

        // 2. Transition
        let from = self.fsm.mode();
        let mode_update = self.fsm.apply(batch.level());
        if mode_update.mode_changed {
            events.push(ControllerEvent::ModeChanged {
                from,
                to: mode_update.new_mode,
                level: batch.level(),
            });
        }

        // 3. Activate, only on a change into a deterrent mode
        let outcome = match (mode_update.triggers_activation, batch.primary) {
            (true, Some(target)) => {
                let outcome = self.effectiveness.attempt(
                    mode_update.new_mode,
                    target.species,
                    target.distance_cm,
                    &mut self.source,
                );
                self.outcomes.push(outcome);
                self.stats.record_outcome(&outcome);
                events.push(ControllerEvent::DeterrentActivated { outcome });
                Some(outcome)
            }
            _ => None,
        };

        // 4. Integrate
        let mode = self.fsm.mode();
        let power_w = self.integrator.draw_w(mode);
        let dt = effective_dt(dt);
        self.mission = self.integrator.advance(dt, mode, &self.mission);
        self.time.advance(dt);
        self.stats.record_cycle(power_w);

        self.check_milestones(&mut events);
        self.check_battery(&mut events);
        self.check_status(&mut events);

        let actuators = actuators_for(self.fsm.mode(), batch.primary.map(|a| a.species));
        let snapshot = TelemetrySnapshot {
            time: self.time,
            mode: self.fsm.mode(),
            threat_level: batch.level(),
            mission: self.mission,
            actuators,
            power_w,
            activations: self.effectiveness.activations(),
        };

        debug!(
            event = "cycle.completed",
            tick = self.time.tick,
            mode = ?snapshot.mode,
            level = ?snapshot.threat_level,
            accepted = batch.accepted,
            rejected = batch.rejected.len(),
            battery_percent = self.mission.battery_percent,
        );

        let report = CycleReport {
            batch,
            mode_update,
            outcome,
            actuators,
            snapshot,
            events,
        };
        if self.is_finished() {
            self.terminal_report = Some(report.clone());
        }
        report
    }

    fn check_milestones(&mut self, events: &mut Vec<ControllerEvent>) {
        let progress = self.mission.progress();
        while let Some(&fraction) = MILESTONE_FRACTIONS.get(self.milestones_reached) {
            if progress < fraction {
                break;
            }
            self.milestones_reached += 1;
            let percent = (fraction * 100.0).round() as u8;
            info!(
                event = "mission.milestone",
                percent,
                distance_m = self.mission.distance_traveled_m,
                battery_percent = self.mission.battery_percent,
            );
            events.push(ControllerEvent::Milestone {
                percent,
                distance_m: self.mission.distance_traveled_m,
            });
        }
    }

    fn check_battery(&mut self, events: &mut Vec<ControllerEvent>) {
        let warning = self.config.mission.low_battery_warning_percent;
        if self.low_battery_warned || self.mission.battery_percent > warning {
            return;
        }
        self.low_battery_warned = true;
        warn!(
            event = "battery.low",
            battery_percent = self.mission.battery_percent,
        );
        events.push(ControllerEvent::LowBatteryWarning {
            battery_percent: self.mission.battery_percent,
        });
    }

    fn check_status(&mut self, events: &mut Vec<ControllerEvent>) {
        match self.mission.status {
            MissionStatus::Running => {}
            MissionStatus::Completed => {
                if self.fsm.clear_emergency() {
                    events.push(ControllerEvent::EmergencyCleared);
                }
                info!(
                    event = "mission.completed",
                    elapsed_secs = self.mission.elapsed_secs,
                    battery_percent = self.mission.battery_percent,
                    activations = self.outcomes.len(),
                );
                events.push(ControllerEvent::MissionCompleted {
                    elapsed_secs: self.mission.elapsed_secs,
                });
            }
            MissionStatus::Aborted => {
                if self.fsm.signal_low_battery() {
                    events.push(ControllerEvent::EmergencyEntered {
                        battery_percent: self.mission.battery_percent,
                    });
                }
                warn!(
                    event = "mission.aborted",
                    elapsed_secs = self.mission.elapsed_secs,
                    distance_m = self.mission.distance_traveled_m,
                    battery_percent = self.mission.battery_percent,
                );
                events.push(ControllerEvent::MissionAborted {
                    elapsed_secs: self.mission.elapsed_secs,
                    distance_m: self.mission.distance_traveled_m,
                });
            }
        }
    }
}
