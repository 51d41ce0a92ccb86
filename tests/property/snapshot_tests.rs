//! Property-based tests for snapshot invariants

use std::collections::HashSet;

use chrono::Utc;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use race_feed_simulator::engine::{generate_laps_led, generate_snapshot, FIELD_SIZE, MAX_LAP};
use race_feed_simulator::types::{FlagState, LiveFeed, StageInfo};

fn snapshot(seed: u64, laps_in_race: u32) -> LiveFeed {
    generate_snapshot(&mut StdRng::seed_from_u64(seed), laps_in_race, Utc::now())
}

proptest! {
    /// Running positions are exactly 1..=40 and vehicles come sorted
    #[test]
    fn test_positions_are_sorted_permutation(seed in any::<u64>()) {
        let feed = snapshot(seed, 75);
        prop_assert_eq!(feed.vehicles.len(), FIELD_SIZE);

        let positions: Vec<u32> = feed.vehicles.iter().map(|v| v.running_position).collect();
        prop_assert_eq!(positions, (1..=FIELD_SIZE as u32).collect::<Vec<_>>());

        let drivers: HashSet<u32> = feed.vehicles.iter().map(|v| v.driver.driver_id).collect();
        prop_assert_eq!(drivers.len(), FIELD_SIZE);
    }

    /// Laps to go never goes negative
    #[test]
    fn test_laps_to_go(seed in any::<u64>(), laps_in_race in 46u32..=300) {
        let feed = snapshot(seed, laps_in_race);
        prop_assert!((1..=MAX_LAP).contains(&feed.lap_number));
        prop_assert_eq!(feed.laps_to_go, laps_in_race.saturating_sub(feed.lap_number));
    }

    /// Stage number, finish lap and stage length agree with the lap
    #[test]
    fn test_stage_matches_lap(seed in any::<u64>(), laps_in_race in 46u32..=300) {
        let feed = snapshot(seed, laps_in_race);
        let stage = feed.stage;

        prop_assert_eq!(stage.stage_num, StageInfo::stage_for_lap(feed.lap_number));
        match stage.stage_num {
            1 => {
                prop_assert!(feed.lap_number <= 25);
                prop_assert_eq!((stage.finish_at_lap, stage.laps_in_stage), (25, 25));
            }
            2 => {
                prop_assert!((26..=45).contains(&feed.lap_number));
                prop_assert_eq!((stage.finish_at_lap, stage.laps_in_stage), (45, 20));
            }
            _ => {
                prop_assert!(feed.lap_number > 45);
                prop_assert_eq!(stage.finish_at_lap, laps_in_race);
                prop_assert_eq!(stage.laps_in_stage, laps_in_race - 45);
            }
        }
    }

    /// Best lap is always quicker than the last lap
    #[test]
    fn test_best_beats_last(seed in any::<u64>()) {
        for vehicle in snapshot(seed, 75).vehicles {
            prop_assert!(vehicle.best_lap_time < vehicle.last_lap_time);
            prop_assert!(vehicle.best_lap_speed > vehicle.last_lap_speed);
            prop_assert!(vehicle.best_lap >= 1);
            prop_assert!(vehicle.laps_completed <= 75);
        }
    }

    /// Laps-led intervals are ordered and end by the current lap
    #[test]
    fn test_laps_led_interval(seed in any::<u64>()) {
        let feed = snapshot(seed, 75);
        let mut leaders = 0u32;
        for vehicle in &feed.vehicles {
            prop_assert!(vehicle.laps_led.len() <= 1);
            if let Some(interval) = vehicle.laps_led.first() {
                leaders += 1;
                prop_assert!(interval.start_lap >= 1);
                prop_assert!(interval.start_lap <= interval.end_lap);
                prop_assert!(interval.end_lap <= feed.lap_number);
            }
        }
        prop_assert_eq!(feed.number_of_leaders, leaders);
    }

    /// Any lap, including the first few, yields an ordered interval
    #[test]
    fn test_laps_led_any_lap(seed in any::<u64>(), lap in 1u32..=MAX_LAP) {
        let mut rng = StdRng::seed_from_u64(seed);
        for interval in generate_laps_led(&mut rng, lap) {
            prop_assert!(1 <= interval.start_lap);
            prop_assert!(interval.start_lap <= interval.end_lap);
            prop_assert!(interval.end_lap <= lap);
        }
    }

    /// The generator never throws a red flag
    #[test]
    fn test_no_red_flag(seed in any::<u64>()) {
        prop_assert_ne!(snapshot(seed, 75).flag_state, FlagState::Red);
    }

    /// Serialized snapshot carries wire codes, not enum names
    #[test]
    fn test_wire_codes(seed in any::<u64>()) {
        let feed = snapshot(seed, 75);
        let value = serde_json::to_value(&feed).unwrap();

        let flag = value["flag_state"].as_u64().unwrap();
        prop_assert!(flag == 1 || flag == 2);
        for vehicle in value["vehicles"].as_array().unwrap() {
            let status = vehicle["status"].as_u64().unwrap();
            prop_assert!((1..=3).contains(&status));
        }
        prop_assert_eq!(value["vehicles"][0]["delta"].as_f64(), Some(0.0));
    }
}
