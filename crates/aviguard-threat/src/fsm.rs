//! Deterrent mode finite state machine.
//!
//! `evaluate` is a pure, total function over every (mode, level) pair.
//! [`DeterrentStateMachine`] wraps it with the single piece of persistent
//! state, the current mode, and the integrator-owned emergency signals.

use tracing::{info, warn};

use aviguard_core::enums::{Species, StrobeIntensity, SystemMode, ThreatLevel};
use aviguard_core::state::ActuatorCommand;

/// Input to the mode FSM for one cycle.
pub struct ModeContext {
    pub mode: SystemMode,
    pub level: ThreatLevel,
}

/// Output from the mode FSM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeUpdate {
    pub new_mode: SystemMode,
    pub mode_changed: bool,
    /// Set only when the mode changed into one that enables deterrents.
    pub triggers_activation: bool,
}

impl ModeUpdate {
    fn unchanged(mode: SystemMode) -> Self {
        Self {
            new_mode: mode,
            mode_changed: false,
            triggers_activation: false,
        }
    }
}

/// Evaluate the FSM for one threat level.
pub fn evaluate(ctx: &ModeContext) -> ModeUpdate {
    // Emergency only exits through the integrator.
    if ctx.mode == SystemMode::Emergency {
        return ModeUpdate::unchanged(ctx.mode);
    }

    let target = mode_for_level(ctx.level);
    if target == ctx.mode {
        return ModeUpdate::unchanged(ctx.mode);
    }

    ModeUpdate {
        new_mode: target,
        mode_changed: true,
        triggers_activation: target.enables_deterrent(),
    }
}

/// Mode demanded by a threat level, ignoring emergency stickiness.
pub fn mode_for_level(level: ThreatLevel) -> SystemMode {
    match level {
        ThreatLevel::None => SystemMode::Standby,
        ThreatLevel::Low => SystemMode::Alert,
        ThreatLevel::Medium | ThreatLevel::High => SystemMode::Active,
    }
}

/// Actuator set a mode declares. Audio carries the target species so the
/// driver can pick a matching call.
pub fn actuators_for(mode: SystemMode, target: Option<Species>) -> ActuatorCommand {
    match mode {
        SystemMode::Standby | SystemMode::Emergency => ActuatorCommand::off(),
        SystemMode::Alert => ActuatorCommand {
            strobe: StrobeIntensity::Low,
            audio: false,
            call_species: None,
        },
        SystemMode::Active => ActuatorCommand {
            strobe: StrobeIntensity::High,
            audio: true,
            call_species: target,
        },
    }
}

/// Owner of the current mode. Nothing else mutates it.
#[derive(Debug, Clone, Default)]
pub struct DeterrentStateMachine {
    mode: SystemMode,
}

impl DeterrentStateMachine {
    /// Starts in standby.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> SystemMode {
        self.mode
    }

    /// Apply the cycle's threat level and return what happened.
    pub fn apply(&mut self, level: ThreatLevel) -> ModeUpdate {
        let update = evaluate(&ModeContext {
            mode: self.mode,
            level,
        });
        if update.mode_changed {
            info!(
                event = "mode.changed",
                from = ?self.mode,
                to = ?update.new_mode,
                level = ?level,
            );
            self.mode = update.new_mode;
        }
        update
    }

    /// Low-battery signal from the integrator. Returns true if the mode changed.
    pub fn signal_low_battery(&mut self) -> bool {
        if self.mode == SystemMode::Emergency {
            return false;
        }
        warn!(event = "mode.emergency", from = ?self.mode);
        self.mode = SystemMode::Emergency;
        true
    }

    /// Recovery signal from the integrator. Returns true if emergency was cleared.
    pub fn clear_emergency(&mut self) -> bool {
        if self.mode != SystemMode::Emergency {
            return false;
        }
        info!(event = "mode.emergency_cleared");
        self.mode = SystemMode::Standby;
        true
    }
}
