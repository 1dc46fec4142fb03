//! Cleanup system: removes birds that flew off or lingered too long.

use hecs::{Entity, World};

use crate::components::{Encounter, Range};

/// Despawn birds beyond `despawn_range_cm` or in view for `max_steps` steps.
/// Uses a pre-allocated buffer to avoid per-step allocation.
pub fn run(
    world: &mut World,
    despawn_buffer: &mut Vec<Entity>,
    despawn_range_cm: f64,
    max_steps: u32,
) {
    despawn_buffer.clear();

    for (entity, (range, encounter)) in world.query_mut::<(&Range, &Encounter)>() {
        if range.0 > despawn_range_cm || encounter.age_steps >= max_steps {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
