//! ECS components for simulated birds in the encounter scenario.

use glam::DVec2;

use aviguard_core::enums::Species;

/// A bird in the camera's field of regard.
#[derive(Debug, Clone, Copy)]
pub struct Bird {
    pub species: Species,
    /// Detector confidence reported for this bird on every frame.
    pub confidence: f64,
    /// Normalized position in the frame, each axis in [-1, 1].
    pub frame_offset: DVec2,
}

/// Distance from the sensor (cm).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range(pub f64);

/// Lifecycle of one encounter.
#[derive(Debug, Clone, Copy, Default)]
pub struct Encounter {
    /// Steps the bird has been in view.
    pub age_steps: u32,
    /// Set by a successful activation; the bird turns away.
    pub deterred: bool,
}
