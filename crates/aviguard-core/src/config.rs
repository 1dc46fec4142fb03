//! Mission configuration.
//!
//! Every calibration table the controller consults lives here and is fixed for
//! the duration of one mission run. Files may be partial: any omitted section
//! or field falls back to the defaults in [`crate::constants`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::{ScenarioKind, Species, SystemMode};
use crate::error::{ConfigError, ConfigResult};

// ---------------------------------------------------------------------------
// Mission / energy
// ---------------------------------------------------------------------------

/// Route, speed and battery parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionParams {
    /// Origin-to-destination distance (meters).
    pub total_distance_m: f64,
    /// Cruise speed (km/h).
    pub cruise_speed_kmh: f64,
    /// Simulated seconds per control cycle.
    pub time_step_secs: f64,
    /// Usable battery energy (watt-hours).
    pub battery_capacity_wh: f64,
    pub initial_battery_percent: f64,
    /// At or below this level the mission aborts.
    pub low_battery_threshold_percent: f64,
    /// Crossing below this level emits a warning event.
    pub low_battery_warning_percent: f64,
    /// Safety cap on cycles per run.
    pub max_steps: u64,
}

impl Default for MissionParams {
    fn default() -> Self {
        Self {
            total_distance_m: MISSION_DISTANCE_M,
            cruise_speed_kmh: CRUISE_SPEED_KMH,
            time_step_secs: TIME_STEP_SECS,
            battery_capacity_wh: BATTERY_CAPACITY_WH,
            initial_battery_percent: 100.0,
            low_battery_threshold_percent: LOW_BATTERY_THRESHOLD_PERCENT,
            low_battery_warning_percent: LOW_BATTERY_WARNING_PERCENT,
            max_steps: MAX_MISSION_STEPS,
        }
    }
}

impl MissionParams {
    /// Cruise speed in meters per second.
    pub fn cruise_speed_mps(&self) -> f64 {
        self.cruise_speed_kmh / 3.6
    }
}

/// Nominal power draw per operating mode (watts).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerProfile {
    pub standby_w: f64,
    pub alert_w: f64,
    pub active_w: f64,
    pub emergency_w: f64,
}

impl Default for PowerProfile {
    fn default() -> Self {
        Self {
            standby_w: STANDBY_POWER_W,
            alert_w: ALERT_POWER_W,
            active_w: ACTIVE_POWER_W,
            emergency_w: EMERGENCY_POWER_W,
        }
    }
}

impl PowerProfile {
    pub fn draw_w(&self, mode: SystemMode) -> f64 {
        match mode {
            SystemMode::Standby => self.standby_w,
            SystemMode::Alert => self.alert_w,
            SystemMode::Active => self.active_w,
            SystemMode::Emergency => self.emergency_w,
        }
    }
}

// ---------------------------------------------------------------------------
// Species
// ---------------------------------------------------------------------------

/// Calibration entry for one species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesProfile {
    /// Reference wingspan used by the range estimator (cm).
    pub wingspan_cm: f64,
    /// Base threat score before the distance bonus.
    pub base_threat: i32,
    /// Additive adjustment to deterrent success probability.
    pub success_modifier: f64,
}

impl SpeciesProfile {
    pub const fn new(wingspan_cm: f64, base_threat: i32, success_modifier: f64) -> Self {
        Self {
            wingspan_cm,
            base_threat,
            success_modifier,
        }
    }
}

/// Per-species calibration, with an explicit entry for unrecognized classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeciesTable {
    pub eagle: SpeciesProfile,
    pub hawk: SpeciesProfile,
    pub crow: SpeciesProfile,
    pub pigeon: SpeciesProfile,
    pub sparrow: SpeciesProfile,
    /// Smallest-bird wingspan, lowest base threat, no success modifier.
    pub unknown: SpeciesProfile,
}

impl Default for SpeciesTable {
    fn default() -> Self {
        Self {
            eagle: SpeciesProfile::new(
                EAGLE_WINGSPAN_CM,
                EAGLE_BASE_THREAT,
                EAGLE_SUCCESS_MODIFIER,
            ),
            hawk: SpeciesProfile::new(HAWK_WINGSPAN_CM, HAWK_BASE_THREAT, HAWK_SUCCESS_MODIFIER),
            crow: SpeciesProfile::new(CROW_WINGSPAN_CM, CROW_BASE_THREAT, CROW_SUCCESS_MODIFIER),
            pigeon: SpeciesProfile::new(
                PIGEON_WINGSPAN_CM,
                PIGEON_BASE_THREAT,
                PIGEON_SUCCESS_MODIFIER,
            ),
            sparrow: SpeciesProfile::new(SPARROW_WINGSPAN_CM, SPARROW_BASE_THREAT, 0.0),
            unknown: SpeciesProfile::new(SPARROW_WINGSPAN_CM, SPARROW_BASE_THREAT, 0.0),
        }
    }
}

impl SpeciesTable {
    pub fn profile(&self, species: Species) -> &SpeciesProfile {
        match species {
            Species::Eagle => &self.eagle,
            Species::Hawk => &self.hawk,
            Species::Crow => &self.crow,
            Species::Pigeon => &self.pigeon,
            Species::Sparrow => &self.sparrow,
            Species::Unknown => &self.unknown,
        }
    }

    fn entries(&self) -> [(&'static str, &SpeciesProfile); 6] {
        [
            ("species.eagle", &self.eagle),
            ("species.hawk", &self.hawk),
            ("species.crow", &self.crow),
            ("species.pigeon", &self.pigeon),
            ("species.sparrow", &self.sparrow),
            ("species.unknown", &self.unknown),
        ]
    }
}

// ---------------------------------------------------------------------------
// Sensor
// ---------------------------------------------------------------------------

/// Camera calibration and detection gating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorCalibration {
    pub focal_length_px: f64,
    pub horizontal_fov_deg: f64,
    pub vertical_fov_deg: f64,
    pub min_distance_cm: f64,
    pub max_distance_cm: f64,
    pub fallback_distance_cm: f64,
    /// Observations at or below this confidence are discarded before scoring.
    pub min_confidence: f64,
}

impl Default for SensorCalibration {
    fn default() -> Self {
        Self {
            focal_length_px: FOCAL_LENGTH_PX,
            horizontal_fov_deg: HORIZONTAL_FOV_DEG,
            vertical_fov_deg: VERTICAL_FOV_DEG,
            min_distance_cm: DISTANCE_MIN_CM,
            max_distance_cm: DISTANCE_MAX_CM,
            fallback_distance_cm: FALLBACK_DISTANCE_CM,
            min_confidence: MIN_DETECTION_CONFIDENCE,
        }
    }
}

// ---------------------------------------------------------------------------
// Threat scoring
// ---------------------------------------------------------------------------

/// Score bonus for targets strictly closer than `below_cm`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceBand {
    pub below_cm: f64,
    pub bonus: i32,
}

/// Distance bands and level thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreatConfig {
    /// Evaluated nearest first; the first band that matches wins.
    pub distance_bands: Vec<DistanceBand>,
    pub high_threshold: i32,
    pub medium_threshold: i32,
    pub low_threshold: i32,
}

impl Default for ThreatConfig {
    fn default() -> Self {
        Self {
            distance_bands: DISTANCE_BANDS
                .iter()
                .map(|&(below_cm, bonus)| DistanceBand { below_cm, bonus })
                .collect(),
            high_threshold: HIGH_THREAT_SCORE,
            medium_threshold: MEDIUM_THREAT_SCORE,
            low_threshold: LOW_THREAT_SCORE,
        }
    }
}

// ---------------------------------------------------------------------------
// Deterrent effectiveness
// ---------------------------------------------------------------------------

/// Terms of the additive success-probability model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectivenessConfig {
    pub base_probability: f64,
    pub alert_bonus: f64,
    pub active_bonus: f64,
    pub proximity_range_cm: f64,
    pub proximity_penalty: f64,
}

impl Default for EffectivenessConfig {
    fn default() -> Self {
        Self {
            base_probability: BASE_SUCCESS_PROBABILITY,
            alert_bonus: ALERT_SUCCESS_BONUS,
            active_bonus: ACTIVE_SUCCESS_BONUS,
            proximity_range_cm: PROXIMITY_PENALTY_RANGE_CM,
            proximity_penalty: PROXIMITY_PENALTY,
        }
    }
}

impl EffectivenessConfig {
    /// Mode bonus, or `None` when the mode cannot activate deterrents.
    pub fn mode_bonus(&self, mode: SystemMode) -> Option<f64> {
        match mode {
            SystemMode::Alert => Some(self.alert_bonus),
            SystemMode::Active => Some(self.active_bonus),
            SystemMode::Standby | SystemMode::Emergency => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Encounter scenario
// ---------------------------------------------------------------------------

/// Parameters of the simulated bird-encounter source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub kind: ScenarioKind,
    /// Distance along the route where encounters concentrate (meters).
    pub attack_zone_center_m: f64,
    /// Zone half-width as a fraction of the center distance.
    pub attack_zone_spread: f64,
    /// Chance per cycle of a new bird while inside the zone.
    pub encounter_probability: f64,
    pub spawn_min_cm: f64,
    pub spawn_max_cm: f64,
    pub confidence_min: f64,
    pub confidence_max: f64,
    pub closing_speed_cm_s: f64,
    pub despawn_range_cm: f64,
    /// Cycles a bird stays in view before leaving on its own.
    pub max_encounter_steps: u32,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            kind: ScenarioKind::default(),
            attack_zone_center_m: ATTACK_ZONE_CENTER_M,
            attack_zone_spread: ATTACK_ZONE_SPREAD,
            encounter_probability: ENCOUNTER_PROBABILITY,
            spawn_min_cm: SPAWN_MIN_CM,
            spawn_max_cm: SPAWN_MAX_CM,
            confidence_min: 0.7,
            confidence_max: 0.95,
            closing_speed_cm_s: CLOSING_SPEED_CM_S,
            despawn_range_cm: DESPAWN_RANGE_CM,
            max_encounter_steps: MAX_ENCOUNTER_STEPS,
        }
    }
}

impl ScenarioConfig {
    /// Route interval `[start, end]` (meters) in which birds may spawn.
    pub fn attack_zone_bounds(&self) -> (f64, f64) {
        let center = self.attack_zone_center_m;
        (
            center * (1.0 - self.attack_zone_spread),
            center * (1.0 + self.attack_zone_spread),
        )
    }
}

// ---------------------------------------------------------------------------
// Top level
// ---------------------------------------------------------------------------

/// Aggregated configuration for one mission run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionConfig {
    pub mission: MissionParams,
    pub power: PowerProfile,
    pub species: SpeciesTable,
    pub sensor: SensorCalibration,
    pub threat: ThreatConfig,
    pub effectiveness: EffectivenessConfig,
    pub scenario: ScenarioConfig,
}

impl MissionConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        let config: MissionConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Check every value against its allowed domain.
    pub fn validate(&self) -> ConfigResult<()> {
        let m = &self.mission;
        positive("mission.total_distance_m", m.total_distance_m)?;
        positive("mission.cruise_speed_kmh", m.cruise_speed_kmh)?;
        positive("mission.time_step_secs", m.time_step_secs)?;
        positive("mission.battery_capacity_wh", m.battery_capacity_wh)?;
        percent("mission.initial_battery_percent", m.initial_battery_percent)?;
        percent(
            "mission.low_battery_threshold_percent",
            m.low_battery_threshold_percent,
        )?;
        percent(
            "mission.low_battery_warning_percent",
            m.low_battery_warning_percent,
        )?;
        if m.max_steps == 0 {
            return Err(ConfigError::invalid("mission.max_steps", "must be at least 1"));
        }

        let p = &self.power;
        for (field, watts) in [
            ("power.standby_w", p.standby_w),
            ("power.alert_w", p.alert_w),
            ("power.active_w", p.active_w),
            ("power.emergency_w", p.emergency_w),
        ] {
            non_negative(field, watts)?;
        }

        for (field, profile) in self.species.entries() {
            positive(field, profile.wingspan_cm)?;
            if !profile.success_modifier.is_finite() {
                return Err(ConfigError::invalid(field, "success_modifier must be finite"));
            }
        }

        let s = &self.sensor;
        positive("sensor.focal_length_px", s.focal_length_px)?;
        positive("sensor.horizontal_fov_deg", s.horizontal_fov_deg)?;
        positive("sensor.vertical_fov_deg", s.vertical_fov_deg)?;
        positive("sensor.min_distance_cm", s.min_distance_cm)?;
        if s.max_distance_cm < s.min_distance_cm {
            return Err(ConfigError::invalid(
                "sensor.max_distance_cm",
                format!("{} is below min_distance_cm {}", s.max_distance_cm, s.min_distance_cm),
            ));
        }
        if !(s.min_distance_cm..=s.max_distance_cm).contains(&s.fallback_distance_cm) {
            return Err(ConfigError::invalid(
                "sensor.fallback_distance_cm",
                "must lie within [min_distance_cm, max_distance_cm]",
            ));
        }
        unit_interval("sensor.min_confidence", s.min_confidence)?;

        let t = &self.threat;
        let increasing = t
            .distance_bands
            .windows(2)
            .all(|pair| pair[0].below_cm < pair[1].below_cm);
        if !increasing {
            return Err(ConfigError::invalid(
                "threat.distance_bands",
                "bands must be sorted by strictly increasing distance",
            ));
        }
        let tapering = t
            .distance_bands
            .windows(2)
            .all(|pair| pair[0].bonus >= pair[1].bonus);
        if !tapering {
            return Err(ConfigError::invalid(
                "threat.distance_bands",
                "a farther band may not carry a larger bonus than a nearer one",
            ));
        }
        if !(t.high_threshold >= t.medium_threshold && t.medium_threshold >= t.low_threshold) {
            return Err(ConfigError::invalid(
                "threat.high_threshold",
                "thresholds must satisfy high >= medium >= low",
            ));
        }

        let e = &self.effectiveness;
        unit_interval("effectiveness.base_probability", e.base_probability)?;
        non_negative("effectiveness.proximity_range_cm", e.proximity_range_cm)?;

        let sc = &self.scenario;
        unit_interval("scenario.encounter_probability", sc.encounter_probability)?;
        non_negative("scenario.attack_zone_spread", sc.attack_zone_spread)?;
        positive("scenario.spawn_min_cm", sc.spawn_min_cm)?;
        if sc.spawn_max_cm < sc.spawn_min_cm {
            return Err(ConfigError::invalid(
                "scenario.spawn_max_cm",
                "must be at least spawn_min_cm",
            ));
        }
        unit_interval("scenario.confidence_min", sc.confidence_min)?;
        unit_interval("scenario.confidence_max", sc.confidence_max)?;
        if sc.confidence_max < sc.confidence_min {
            return Err(ConfigError::invalid(
                "scenario.confidence_max",
                "must be at least confidence_min",
            ));
        }
        non_negative("scenario.closing_speed_cm_s", sc.closing_speed_cm_s)?;

        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} must be > 0")))
    }
}

fn non_negative(field: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} must be >= 0")))
    }
}

fn percent(field: &'static str, value: f64) -> ConfigResult<()> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} must be within [0, 100]")))
    }
}

fn unit_interval(field: &'static str, value: f64) -> ConfigResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} must be within [0, 1]")))
    }
}
