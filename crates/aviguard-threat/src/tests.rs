#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use aviguard_core::config::MissionConfig;
    use aviguard_core::enums::{Species, StrobeIntensity, SystemMode, ThreatLevel};
    use aviguard_core::events::RejectReason;
    use aviguard_core::types::{Measurement, Observation, ThreatAssessment};

    use crate::effectiveness::{
        raw_success_probability, success_probability, EffectivenessModel, SequenceSource,
        UniformSource,
    };
    use crate::fsm::{actuators_for, evaluate, DeterrentStateMachine, ModeContext};
    use crate::geometry::{estimate, estimate_distance, expected_bbox_width};
    use crate::scoring::{
        assess_batch, assess_observation, distance_bonus, level_for_score, most_severe, score,
    };

    const ALL_SPECIES: [Species; 6] = [
        Species::Unknown,
        Species::Eagle,
        Species::Hawk,
        Species::Crow,
        Species::Pigeon,
        Species::Sparrow,
    ];

    const ALL_MODES: [SystemMode; 4] = [
        SystemMode::Standby,
        SystemMode::Alert,
        SystemMode::Active,
        SystemMode::Emergency,
    ];

    const ALL_LEVELS: [ThreatLevel; 4] = [
        ThreatLevel::None,
        ThreatLevel::Low,
        ThreatLevel::Medium,
        ThreatLevel::High,
    ];

    fn measurement(distance_cm: f64) -> Measurement {
        Measurement {
            distance_cm,
            bearing: Default::default(),
        }
    }

    fn assessment(species: Species, distance_cm: f64) -> ThreatAssessment {
        let config = MissionConfig::default();
        score(
            &measurement(distance_cm),
            species,
            &config.species,
            &config.threat,
        )
    }

    // ---- Geometry ----

    #[test]
    fn test_distance_similar_triangles() {
        let config = MissionConfig::default();
        // Eagle: 200 cm * 500 px / 250 px = 400 cm
        let d = estimate_distance(Species::Eagle, 250.0, &config.sensor, &config.species);
        assert!((d - 400.0).abs() < 1e-9, "expected 400cm, got {d}");
        // Crow: 90 * 500 / 150 = 300 cm
        let d = estimate_distance(Species::Crow, 150.0, &config.sensor, &config.species);
        assert!((d - 300.0).abs() < 1e-9, "expected 300cm, got {d}");
    }

    #[test]
    fn test_distance_always_within_clamp_for_positive_widths() {
        let config = MissionConfig::default();
        let widths = [1e-6, 0.01, 0.5, 1.0, 7.0, 12.5, 50.0, 333.0, 1e4, 1e9, f64::INFINITY];
        for species in ALL_SPECIES {
            for width in widths {
                let d = estimate_distance(species, width, &config.sensor, &config.species);
                assert!(
                    (10.0..=1000.0).contains(&d),
                    "{species:?} width {width} gave {d}cm outside [10, 1000]"
                );
            }
        }
    }

    #[test]
    fn test_degenerate_width_returns_fallback() {
        let config = MissionConfig::default();
        for width in [0.0, -1.0, -250.0, f64::NAN] {
            let d = estimate_distance(Species::Hawk, width, &config.sensor, &config.species);
            assert_eq!(d, 500.0, "width {width} should use the fallback range");
        }
    }

    #[test]
    fn test_unknown_species_uses_smallest_wingspan() {
        let config = MissionConfig::default();
        let unknown = estimate_distance(Species::Unknown, 50.0, &config.sensor, &config.species);
        let sparrow = estimate_distance(Species::Sparrow, 50.0, &config.sensor, &config.species);
        assert_eq!(unknown, sparrow);
    }

    #[test]
    fn test_bearing_scales_by_half_fov() {
        let config = MissionConfig::default();
        let obs = Observation::new(Species::Crow, 100.0, 60.0, 0.9).with_offset(1.0, -0.5);
        let m = estimate(&obs, &config.sensor, &config.species);
        assert!((m.bearing.horizontal_deg - 37.5).abs() < 1e-9);
        assert!((m.bearing.vertical_deg + 15.0).abs() < 1e-9);

        let centered = Observation::new(Species::Crow, 100.0, 60.0, 0.9);
        let m = estimate(&centered, &config.sensor, &config.species);
        assert_eq!(m.bearing.horizontal_deg, 0.0);
        assert_eq!(m.bearing.vertical_deg, 0.0);
    }

    #[test]
    fn test_expected_bbox_width_inverts_estimate() {
        let config = MissionConfig::default();
        for species in ALL_SPECIES {
            let width = expected_bbox_width(species, 250.0, &config.sensor, &config.species);
            let d = estimate_distance(species, width, &config.sensor, &config.species);
            assert!((d - 250.0).abs() < 1e-9, "{species:?}: {d}");
        }
    }

    // ---- Scoring ----

    #[test]
    fn test_distance_bands_first_match_wins() {
        let threat = MissionConfig::default().threat;
        assert_eq!(distance_bonus(10.0, &threat), 30);
        assert_eq!(distance_bonus(49.99, &threat), 30);
        assert_eq!(distance_bonus(50.0, &threat), 20);
        assert_eq!(distance_bonus(99.99, &threat), 20);
        assert_eq!(distance_bonus(100.0, &threat), 10);
        assert_eq!(distance_bonus(199.99, &threat), 10);
        assert_eq!(distance_bonus(200.0, &threat), 0);
        assert_eq!(distance_bonus(1000.0, &threat), 0);
    }

    #[test]
    fn test_level_thresholds() {
        let threat = MissionConfig::default().threat;
        assert_eq!(level_for_score(40, &threat), ThreatLevel::High);
        assert_eq!(level_for_score(39, &threat), ThreatLevel::Medium);
        assert_eq!(level_for_score(25, &threat), ThreatLevel::Medium);
        assert_eq!(level_for_score(24, &threat), ThreatLevel::Low);
        assert_eq!(level_for_score(15, &threat), ThreatLevel::Low);
        assert_eq!(level_for_score(14, &threat), ThreatLevel::None);
    }

    #[test]
    fn test_score_examples() {
        let a = assessment(Species::Eagle, 40.0);
        assert_eq!(a.score, 60);
        assert_eq!(a.level, ThreatLevel::High);

        let a = assessment(Species::Crow, 150.0);
        assert_eq!(a.score, 25);
        assert_eq!(a.level, ThreatLevel::Medium);

        let a = assessment(Species::Pigeon, 150.0);
        assert_eq!(a.score, 15);
        assert_eq!(a.level, ThreatLevel::Low);

        let a = assessment(Species::Pigeon, 500.0);
        assert_eq!(a.score, 5);
        assert_eq!(a.level, ThreatLevel::None);

        let a = assessment(Species::Unknown, 500.0);
        assert_eq!(a.score, 5);
    }

    #[test]
    fn test_level_monotone_in_distance() {
        for species in ALL_SPECIES {
            let mut previous = ThreatLevel::High;
            let mut distance = 10.0;
            while distance <= 1000.0 {
                let level = assessment(species, distance).level;
                assert!(
                    level <= previous,
                    "{species:?}: level rose from {previous:?} to {level:?} at {distance}cm"
                );
                previous = level;
                distance += 0.5;
            }
        }
    }

    #[test]
    fn test_most_severe_prefers_level_then_score() {
        let high = assessment(Species::Eagle, 40.0); // 60, High
        let medium = assessment(Species::Crow, 150.0); // 25, Medium
        let high_lower_score = assessment(Species::Hawk, 40.0); // 50, High

        let best = most_severe([medium, high_lower_score, high]).unwrap();
        assert_eq!(best, high);
        assert_eq!(most_severe(Vec::<ThreatAssessment>::new()), None);
    }

    #[test]
    fn test_most_severe_is_order_independent() {
        let batch = vec![
            assessment(Species::Hawk, 40.0),
            assessment(Species::Eagle, 150.0),
            assessment(Species::Crow, 40.0),
            assessment(Species::Pigeon, 30.0),
            assessment(Species::Sparrow, 30.0),
            assessment(Species::Eagle, 60.0),
            assessment(Species::Hawk, 45.0),
        ];
        let forward = most_severe(batch.clone()).unwrap();

        let mut reversed = batch.clone();
        reversed.reverse();
        assert_eq!(most_severe(reversed).unwrap(), forward);

        // Every rotation gives the same answer
        for shift in 0..batch.len() {
            let mut rotated = batch.clone();
            rotated.rotate_left(shift);
            assert_eq!(most_severe(rotated).unwrap(), forward);
        }

        // Pairwise split-and-merge, as a parallel evaluation would do
        let (left, right) = batch.split_at(3);
        let merged = most_severe([
            most_severe(left.to_vec()).unwrap(),
            most_severe(right.to_vec()).unwrap(),
        ])
        .unwrap();
        assert_eq!(merged, forward);
    }

    #[test]
    fn test_equal_score_tie_breaks_on_distance() {
        // Pigeon and Sparrow share a base threat; the closer one wins
        let near = assessment(Species::Pigeon, 30.0);
        let far = assessment(Species::Sparrow, 45.0);
        assert_eq!(near.score, far.score);
        assert_eq!(most_severe([far, near]).unwrap(), near);
        assert_eq!(most_severe([near, far]).unwrap(), near);
    }

    #[test]
    fn test_assess_observation_gating() {
        let config = MissionConfig::default();
        let bad = Observation::new(Species::Eagle, 100.0, 50.0, 1.2);
        assert_eq!(
            assess_observation(&bad, &config),
            Err(RejectReason::InvalidConfidence)
        );
        let weak = Observation::new(Species::Eagle, 100.0, 50.0, 0.4);
        assert_eq!(
            assess_observation(&weak, &config),
            Err(RejectReason::LowConfidence)
        );
        let at_threshold = Observation::new(Species::Eagle, 100.0, 50.0, 0.6);
        assert_eq!(
            assess_observation(&at_threshold, &config),
            Err(RejectReason::LowConfidence)
        );
        let just_above = Observation::new(Species::Eagle, 100.0, 50.0, 0.61);
        assert!(assess_observation(&just_above, &config).is_ok());
        // Degenerate geometry is not a rejection; it falls back to 500cm
        let flat = Observation::new(Species::Eagle, 0.0, 0.0, 0.9);
        let a = assess_observation(&flat, &config).unwrap();
        assert_eq!(a.distance_cm, 500.0);
        assert_eq!(a.level, ThreatLevel::Medium);
    }

    #[test]
    fn test_assess_batch_reduces_to_one() {
        let config = MissionConfig::default();
        // Eagle at 40cm: width = 200 * 500 / 40 = 2500 px
        let observations = [
            Observation::new(Species::Pigeon, 100.0, 60.0, 0.9),
            Observation::new(Species::Eagle, 2500.0, 1000.0, 0.9),
            Observation::new(Species::Crow, 50.0, 20.0, 0.1),
        ];
        let batch = assess_batch(&observations, &config);
        assert_eq!(batch.accepted, 2);
        assert_eq!(batch.rejected, vec![(Species::Crow, RejectReason::LowConfidence)]);
        let primary = batch.primary.unwrap();
        assert_eq!(primary.species, Species::Eagle);
        assert_eq!(primary.level, ThreatLevel::High);
        assert_eq!(batch.level(), ThreatLevel::High);
    }

    #[test]
    fn test_empty_batch_reads_as_no_threat() {
        let batch = assess_batch(&[], &MissionConfig::default());
        assert_eq!(batch.primary, None);
        assert_eq!(batch.level(), ThreatLevel::None);
    }

    // ---- Mode FSM ----

    #[test]
    fn test_transition_table_is_total() {
        for mode in ALL_MODES {
            for level in ALL_LEVELS {
                let update = evaluate(&ModeContext { mode, level });
                let expected = match (mode, level) {
                    (SystemMode::Emergency, _) => SystemMode::Emergency,
                    (_, ThreatLevel::None) => SystemMode::Standby,
                    (_, ThreatLevel::Low) => SystemMode::Alert,
                    (_, ThreatLevel::Medium | ThreatLevel::High) => SystemMode::Active,
                };
                assert_eq!(update.new_mode, expected, "{mode:?} x {level:?}");
                assert_eq!(update.mode_changed, expected != mode, "{mode:?} x {level:?}");
                assert_eq!(
                    update.triggers_activation,
                    update.mode_changed && expected.enables_deterrent(),
                    "{mode:?} x {level:?}"
                );
            }
        }
    }

    #[test]
    fn test_same_mode_does_not_trigger_activation() {
        let update = evaluate(&ModeContext {
            mode: SystemMode::Active,
            level: ThreatLevel::High,
        });
        assert!(!update.mode_changed);
        assert!(!update.triggers_activation);

        // Medium -> High stays Active
        let update = evaluate(&ModeContext {
            mode: SystemMode::Active,
            level: ThreatLevel::Medium,
        });
        assert!(!update.triggers_activation);
    }

    #[test]
    fn test_alert_to_active_triggers_activation() {
        let update = evaluate(&ModeContext {
            mode: SystemMode::Alert,
            level: ThreatLevel::High,
        });
        assert_eq!(update.new_mode, SystemMode::Active);
        assert!(update.triggers_activation);
    }

    #[test]
    fn test_emergency_is_sticky_until_cleared() {
        let mut fsm = DeterrentStateMachine::new();
        fsm.apply(ThreatLevel::Low);
        assert!(fsm.signal_low_battery());
        assert_eq!(fsm.mode(), SystemMode::Emergency);
        assert!(!fsm.signal_low_battery(), "second signal is a no-op");

        for level in ALL_LEVELS {
            let update = fsm.apply(level);
            assert!(!update.mode_changed);
            assert!(!update.triggers_activation);
            assert_eq!(fsm.mode(), SystemMode::Emergency);
        }

        assert!(fsm.clear_emergency());
        assert_eq!(fsm.mode(), SystemMode::Standby);
        assert!(!fsm.clear_emergency());
    }

    #[test]
    fn test_state_machine_idempotent_on_repeated_level() {
        let mut fsm = DeterrentStateMachine::new();
        assert_eq!(fsm.mode(), SystemMode::Standby);
        assert!(fsm.apply(ThreatLevel::High).triggers_activation);
        assert!(!fsm.apply(ThreatLevel::High).triggers_activation);
        assert!(!fsm.apply(ThreatLevel::Medium).triggers_activation);
        assert!(!fsm.apply(ThreatLevel::None).triggers_activation);
        assert_eq!(fsm.mode(), SystemMode::Standby);
    }

    #[test]
    fn test_actuator_sets_per_mode() {
        let standby = actuators_for(SystemMode::Standby, Some(Species::Eagle));
        assert_eq!(standby.strobe, StrobeIntensity::Off);
        assert!(!standby.audio);
        assert_eq!(standby.call_species, None);

        let alert = actuators_for(SystemMode::Alert, Some(Species::Eagle));
        assert_eq!(alert.strobe, StrobeIntensity::Low);
        assert!(!alert.audio);

        let active = actuators_for(SystemMode::Active, Some(Species::Hawk));
        assert_eq!(active.strobe, StrobeIntensity::High);
        assert!(active.audio);
        assert_eq!(active.call_species, Some(Species::Hawk));

        let emergency = actuators_for(SystemMode::Emergency, Some(Species::Hawk));
        assert_eq!(emergency.strobe, StrobeIntensity::Off);
        assert!(!emergency.audio);
    }

    // ---- Effectiveness ----

    #[test]
    fn test_probability_additive_formula() {
        let config = MissionConfig::default();
        let eff = &config.effectiveness;
        let table = &config.species;

        // Active + Pigeon + far: 0.60 + 0.25 + 0.15 = 1.00
        let p = raw_success_probability(SystemMode::Active, Species::Pigeon, 150.0, eff, table);
        assert!((p - 1.0).abs() < 1e-12, "got {p}");

        // Alert + Eagle + near: 0.60 + 0.10 - 0.10 - 0.10 = 0.50
        let p = raw_success_probability(SystemMode::Alert, Species::Eagle, 40.0, eff, table);
        assert!((p - 0.50).abs() < 1e-12, "got {p}");

        // Active + Hawk + far: 0.60 + 0.25 - 0.05 = 0.80
        let p = raw_success_probability(SystemMode::Active, Species::Hawk, 300.0, eff, table);
        assert!((p - 0.80).abs() < 1e-12, "got {p}");

        // Active + Crow + near: 0.60 + 0.25 + 0.05 - 0.10 = 0.80
        let p = raw_success_probability(SystemMode::Active, Species::Crow, 99.0, eff, table);
        assert!((p - 0.80).abs() < 1e-12, "got {p}");

        // Unlisted species: no modifier
        let p = raw_success_probability(SystemMode::Alert, Species::Unknown, 100.0, eff, table);
        assert!((p - 0.70).abs() < 1e-12, "got {p}");
    }

    #[test]
    fn test_probability_clamped() {
        let mut config = MissionConfig::default();
        config.effectiveness.base_probability = 0.95;
        let p = success_probability(
            SystemMode::Active,
            Species::Pigeon,
            500.0,
            &config.effectiveness,
            &config.species,
        );
        assert_eq!(p, 1.0);

        config.effectiveness.base_probability = 0.0;
        config.effectiveness.proximity_penalty = 0.5;
        let p = success_probability(
            SystemMode::Alert,
            Species::Eagle,
            20.0,
            &config.effectiveness,
            &config.species,
        );
        assert_eq!(p, 0.0);
    }

    #[test]
    fn test_certain_success_is_deterministic() {
        let config = MissionConfig::default();
        let mut model = EffectivenessModel::new(config.effectiveness, config.species);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for expected_id in 1..=200 {
            let outcome = model.attempt(SystemMode::Active, Species::Pigeon, 150.0, &mut rng);
            assert!(outcome.succeeded, "p = 1.0 must always succeed");
            assert_eq!(outcome.activation_id, expected_id);
        }
        assert_eq!(model.activations(), 200);
    }

    #[test]
    fn test_same_seed_same_outcomes() {
        let config = MissionConfig::default();
        let run = |seed: u64| -> Vec<bool> {
            let mut model =
                EffectivenessModel::new(config.effectiveness.clone(), config.species.clone());
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            (0..100)
                .map(|_| {
                    model
                        .attempt(SystemMode::Alert, Species::Eagle, 40.0, &mut rng)
                        .succeeded
                })
                .collect()
        };
        assert_eq!(run(99), run(99));
        let outcomes = run(99);
        assert!(outcomes.iter().any(|s| *s), "p = 0.5 should succeed sometimes");
        assert!(outcomes.iter().any(|s| !*s), "p = 0.5 should fail sometimes");
    }

    #[test]
    fn test_sequence_source_exact_outcomes() {
        let config = MissionConfig::default();
        let mut model = EffectivenessModel::new(config.effectiveness, config.species);
        // Alert + Eagle + 40cm => p = 0.50
        let mut source = SequenceSource::new([0.49, 0.50, 0.10, 0.99]);
        let outcomes: Vec<bool> = (0..6)
            .map(|_| {
                model
                    .attempt(SystemMode::Alert, Species::Eagle, 40.0, &mut source)
                    .succeeded
            })
            .collect();
        assert_eq!(outcomes, vec![true, false, true, false, true, false]);
    }

    #[test]
    fn test_sequence_source_cycles() {
        let mut source = SequenceSource::new([0.1, 0.2]);
        let samples: Vec<f64> = (0..5).map(|_| source.next_uniform()).collect();
        assert_eq!(samples, vec![0.1, 0.2, 0.1, 0.2, 0.1]);
    }

    #[test]
    #[should_panic(expected = "deterrent activation requested")]
    fn test_activation_in_standby_fails_fast() {
        let config = MissionConfig::default();
        let mut model = EffectivenessModel::new(config.effectiveness, config.species);
        let mut source = SequenceSource::new([0.0]);
        model.attempt(SystemMode::Standby, Species::Crow, 100.0, &mut source);
    }

    #[test]
    #[should_panic(expected = "deterrent activation requested")]
    fn test_activation_in_emergency_fails_fast() {
        let config = MissionConfig::default();
        let mut model = EffectivenessModel::new(config.effectiveness, config.species);
        let mut source = SequenceSource::new([0.0]);
        model.attempt(SystemMode::Emergency, Species::Crow, 100.0, &mut source);
    }
}
