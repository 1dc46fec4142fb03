//! Enumeration types used throughout the controller.

use serde::{Deserialize, Serialize};

/// Classified category of a detected bird.
///
/// Discriminants follow the detector's class ids (0 = unknown).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Species {
    #[default]
    Unknown,
    /// Large raptor, ~200 cm wingspan.
    Eagle,
    /// Mid-size raptor, ~120 cm wingspan.
    Hawk,
    /// Crow-class corvid, ~90 cm wingspan.
    Crow,
    /// Small bird, ~60 cm wingspan.
    Pigeon,
    /// Smallest tracked class, ~25 cm wingspan.
    Sparrow,
}

impl Species {
    /// Every known (non-fallback) species, in class-id order.
    pub const KNOWN: [Species; 5] = [
        Species::Eagle,
        Species::Hawk,
        Species::Crow,
        Species::Pigeon,
        Species::Sparrow,
    ];

    /// Map a detector class id onto a species. Unrecognized ids become `Unknown`.
    pub fn from_class_id(class_id: u32) -> Self {
        match class_id {
            1 => Species::Eagle,
            2 => Species::Hawk,
            3 => Species::Crow,
            4 => Species::Pigeon,
            5 => Species::Sparrow,
            _ => Species::Unknown,
        }
    }

    /// Detector class id for this species.
    pub fn class_id(self) -> u32 {
        match self {
            Species::Unknown => 0,
            Species::Eagle => 1,
            Species::Hawk => 2,
            Species::Crow => 3,
            Species::Pigeon => 4,
            Species::Sparrow => 5,
        }
    }
}

/// Discrete threat severity. Ordered so that `High > Medium > Low > None`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ThreatLevel {
    #[default]
    None,
    Low,
    Medium,
    High,
}

/// Operating mode of the deterrent system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemMode {
    /// Passive watch, all deterrents off.
    #[default]
    Standby,
    /// Low-intensity strobes.
    Alert,
    /// Full deterrent: high-intensity strobes plus species-specific audio.
    Active,
    /// Power-critical. Entered only through the integrator's low-battery signal.
    Emergency,
}

impl SystemMode {
    /// Whether a deterrent activation may be attempted in this mode.
    pub fn enables_deterrent(self) -> bool {
        matches!(self, SystemMode::Alert | SystemMode::Active)
    }
}

/// Mission lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissionStatus {
    #[default]
    Running,
    /// Destination reached.
    Completed,
    /// Energy exhausted before arrival.
    Aborted,
}

impl MissionStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, MissionStatus::Running)
    }
}

/// LED strobe drive level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrobeIntensity {
    #[default]
    Off,
    Low,
    High,
}

impl StrobeIntensity {
    /// 8-bit PWM duty cycle sent to the strobe channels.
    pub fn pwm_duty(self) -> u8 {
        match self {
            StrobeIntensity::Off => 0,
            StrobeIntensity::Low => 50,
            StrobeIntensity::High => 255,
        }
    }
}

/// Which encounter scenario drives the simulated perception source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioKind {
    /// No birds are ever spawned.
    Quiet,
    /// Birds appear while the platform crosses the attack zone.
    #[default]
    AttackZone,
}
