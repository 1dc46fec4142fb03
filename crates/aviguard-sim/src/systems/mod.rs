//! ECS systems run by the encounter scenario each step.
//!
//! Systems are free functions over `&mut World` (or `&World` when read-only).
//! All encounter state lives in components.

pub mod cleanup;
pub mod movement;
pub mod perception;
pub mod spawner;
