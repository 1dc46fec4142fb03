//! Bird kinematics: approach at the closing speed, retreat once deterred.

use hecs::World;

use crate::components::{Encounter, Range};

/// Integrate range over `dt` seconds and age every encounter by one step.
/// Approaching birds stop at `min_range_cm`.
pub fn run(world: &mut World, closing_speed_cm_s: f64, min_range_cm: f64, dt: f64) {
    let step_cm = closing_speed_cm_s * dt;
    for (_entity, (range, encounter)) in world.query_mut::<(&mut Range, &mut Encounter)>() {
        range.0 = if encounter.deterred {
            range.0 + step_cm
        } else {
            (range.0 - step_cm).max(min_range_cm)
        };
        encounter.age_steps += 1;
    }
}
