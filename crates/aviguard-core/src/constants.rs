//! Default calibration constants.
//!
//! These seed [`crate::config::MissionConfig::default`]. Code paths read the
//! config, never these constants directly, so alternate hardware profiles can
//! override any of them.

// --- Sensor ---

/// Camera focal length (pixels).
pub const FOCAL_LENGTH_PX: f64 = 500.0;

/// Horizontal field of view (degrees).
pub const HORIZONTAL_FOV_DEG: f64 = 75.0;

/// Vertical field of view (degrees).
pub const VERTICAL_FOV_DEG: f64 = 60.0;

/// Closest range the estimator will report (cm).
pub const DISTANCE_MIN_CM: f64 = 10.0;

/// Farthest range the estimator will report (cm).
pub const DISTANCE_MAX_CM: f64 = 1000.0;

/// Range reported when the bounding box is degenerate (cm).
pub const FALLBACK_DISTANCE_CM: f64 = 500.0;

/// Detections below this confidence are discarded.
pub const MIN_DETECTION_CONFIDENCE: f64 = 0.6;

// --- Wingspans (cm) ---

pub const EAGLE_WINGSPAN_CM: f64 = 200.0;
pub const HAWK_WINGSPAN_CM: f64 = 120.0;
pub const CROW_WINGSPAN_CM: f64 = 90.0;
pub const PIGEON_WINGSPAN_CM: f64 = 60.0;
pub const SPARROW_WINGSPAN_CM: f64 = 25.0;

// --- Threat scoring ---

pub const EAGLE_BASE_THREAT: i32 = 30;
pub const HAWK_BASE_THREAT: i32 = 20;
pub const CROW_BASE_THREAT: i32 = 15;
pub const PIGEON_BASE_THREAT: i32 = 5;
pub const SPARROW_BASE_THREAT: i32 = 5;

/// Distance bands as (upper bound cm, exclusive; bonus), nearest first.
pub const DISTANCE_BANDS: [(f64, i32); 3] = [(50.0, 30), (100.0, 20), (200.0, 10)];

pub const HIGH_THREAT_SCORE: i32 = 40;
pub const MEDIUM_THREAT_SCORE: i32 = 25;
pub const LOW_THREAT_SCORE: i32 = 15;

// --- Deterrent effectiveness ---

pub const BASE_SUCCESS_PROBABILITY: f64 = 0.60;
pub const ALERT_SUCCESS_BONUS: f64 = 0.10;
pub const ACTIVE_SUCCESS_BONUS: f64 = 0.25;

pub const EAGLE_SUCCESS_MODIFIER: f64 = -0.10;
pub const HAWK_SUCCESS_MODIFIER: f64 = -0.05;
pub const CROW_SUCCESS_MODIFIER: f64 = 0.05;
pub const PIGEON_SUCCESS_MODIFIER: f64 = 0.15;

/// Targets closer than this are harder to deter (cm).
pub const PROXIMITY_PENALTY_RANGE_CM: f64 = 100.0;
pub const PROXIMITY_PENALTY: f64 = 0.10;

// --- Power ---

pub const STANDBY_POWER_W: f64 = 15.0;
pub const ALERT_POWER_W: f64 = 35.0;
pub const ACTIVE_POWER_W: f64 = 80.0;
pub const EMERGENCY_POWER_W: f64 = 10.0;

/// 3000 mAh at 11.1 V.
pub const BATTERY_CAPACITY_WH: f64 = 33.3;

pub const LOW_BATTERY_THRESHOLD_PERCENT: f64 = 5.0;
pub const LOW_BATTERY_WARNING_PERCENT: f64 = 20.0;

// --- Mission ---

pub const MISSION_DISTANCE_M: f64 = 10_000.0;
pub const CRUISE_SPEED_KMH: f64 = 50.0;

/// Simulated seconds per control cycle.
pub const TIME_STEP_SECS: f64 = 10.0;

/// Hard cap on cycles for a single run.
pub const MAX_MISSION_STEPS: u64 = 100_000;

/// Progress fractions at which a milestone event is emitted.
pub const MILESTONE_FRACTIONS: [f64; 3] = [0.25, 0.50, 0.75];

// --- Encounter scenario ---

pub const ATTACK_ZONE_CENTER_M: f64 = 5_000.0;

/// Half-width of the attack zone as a fraction of its center distance.
pub const ATTACK_ZONE_SPREAD: f64 = 0.2;

pub const ENCOUNTER_PROBABILITY: f64 = 0.3;
pub const SPAWN_MIN_CM: f64 = 50.0;
pub const SPAWN_MAX_CM: f64 = 300.0;
pub const CLOSING_SPEED_CM_S: f64 = 5.0;
pub const DESPAWN_RANGE_CM: f64 = 1_200.0;
pub const MAX_ENCOUNTER_STEPS: u32 = 3;
