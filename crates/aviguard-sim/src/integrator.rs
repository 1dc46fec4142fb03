//! Power & mission integrator.
//!
//! One fixed-form Euler step per cycle: position advances at cruise speed and
//! the battery drains at the nominal draw of the mode in force. The integrator
//! is the only code that writes `distance_traveled_m` or `battery_percent`.

use tracing::debug;

use aviguard_core::config::{MissionParams, PowerProfile};
use aviguard_core::enums::{MissionStatus, SystemMode};
use aviguard_core::state::MissionState;

/// Battery percentage consumed by drawing `power_w` for `dt` seconds.
pub fn battery_drain_percent(power_w: f64, dt: f64, capacity_wh: f64) -> f64 {
    (power_w * dt / 3600.0) / capacity_wh * 100.0
}

/// The time step actually integrated: a negative or non-finite `dt` counts
/// as zero.
pub fn effective_dt(dt: f64) -> f64 {
    if dt.is_finite() && dt >= 0.0 {
        dt
    } else {
        debug!(event = "mission.invalid_dt", dt, "using zero time step");
        0.0
    }
}

/// Integrates mission progress and energy for a fixed mission profile.
#[derive(Debug, Clone)]
pub struct PowerIntegrator {
    params: MissionParams,
    power: PowerProfile,
}

impl PowerIntegrator {
    pub fn new(params: MissionParams, power: PowerProfile) -> Self {
        Self { params, power }
    }

    /// Nominal draw of `mode` in watts.
    pub fn draw_w(&self, mode: SystemMode) -> f64 {
        self.power.draw_w(mode)
    }

    /// Advance `state` by `dt` seconds spent in `mode`.
    ///
    /// Status is decided after both updates: reaching the destination wins
    /// over a flat battery in the same step. A terminal state is returned
    /// unchanged. `dt` goes through [`effective_dt`] first.
    pub fn advance(&self, dt: f64, mode: SystemMode, state: &MissionState) -> MissionState {
        if state.status.is_terminal() {
            return *state;
        }

        let dt = effective_dt(dt);
        let mut next = *state;
        next.elapsed_secs += dt;
        next.distance_traveled_m += self.params.cruise_speed_mps() * dt;

        let drain = battery_drain_percent(self.draw_w(mode), dt, self.params.battery_capacity_wh);
        next.battery_percent = (next.battery_percent - drain).clamp(0.0, 100.0);

        next.status = if next.distance_traveled_m >= next.total_distance_m {
            MissionStatus::Completed
        } else if next.battery_percent <= self.params.low_battery_threshold_percent {
            MissionStatus::Aborted
        } else {
            MissionStatus::Running
        };

        debug!(
            event = "mission.integrated",
            mode = ?mode,
            distance_m = next.distance_traveled_m,
            battery_percent = next.battery_percent,
            drain_percent = drain,
        );
        next
    }
}

/// Free-function form of [`PowerIntegrator::advance`].
pub fn advance(
    dt: f64,
    mode: SystemMode,
    state: &MissionState,
    params: &MissionParams,
    power: &PowerProfile,
) -> MissionState {
    PowerIntegrator::new(params.clone(), power.clone()).advance(dt, mode, state)
}
