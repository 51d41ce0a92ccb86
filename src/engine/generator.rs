//! Race snapshot generation
//!
//! Everything here is a pure function of the random source and the wall
//! clock passed in. A fresh [`RaceState`] is drawn for every snapshot, so two
//! calls never share positions, laps or flag state.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use rand::prelude::*;

use super::roster::{DRIVERS, FIELD_SIZE, TRACKS};
use crate::types::*;

/// Highest lap a snapshot can be taken on
pub const MAX_LAP: u32 = 75;

/// Scheduled race distance in laps
pub const DEFAULT_LAPS_IN_RACE: u32 = 75;

/// Odds of a vehicle record carrying a laps-led interval
const LAPS_LED_PROBABILITY: f64 = 0.3;

/// Running is four times as likely as either pit road or retired
const STATUS_WEIGHTS: [VehicleStatus; 6] = [
    VehicleStatus::Running,
    VehicleStatus::Running,
    VehicleStatus::Running,
    VehicleStatus::Running,
    VehicleStatus::InPit,
    VehicleStatus::Retired,
];

/// Race-wide state behind one snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct RaceState {
    pub lap_number: u32,
    pub elapsed_time: u32,
    pub flag_state: FlagState,
    pub race_id: u32,
    pub laps_in_race: u32,
    pub track: &'static Track,
    pub stage: StageInfo,
    /// Running position of each roster slot; always a permutation of 1..=40
    pub positions: Vec<u32>,
    pub caution_segments: u32,
    pub caution_laps: u32,
    pub lead_changes: u32,
}

impl RaceState {
    /// Draw a brand new race state
    pub fn randomize<R: Rng>(rng: &mut R, laps_in_race: u32) -> Self {
        let lap_number = rng.gen_range(1..=MAX_LAP);
        let elapsed_time = rng.gen_range(300..=7200);
        let flag_state = if rng.gen_ratio(1, 4) {
            FlagState::Caution
        } else {
            FlagState::Green
        };
        let race_id = rng.gen_range(5000..=6000);
        let track = &TRACKS[rng.gen_range(0..TRACKS.len())];
        let caution_segments = rng.gen_range(0..=8);
        let caution_laps = rng.gen_range(0..=25);
        let lead_changes = rng.gen_range(0..=35);

        let mut positions: Vec<u32> = (1..=FIELD_SIZE as u32).collect();
        positions.shuffle(rng);

        Self {
            lap_number,
            elapsed_time,
            flag_state,
            race_id,
            laps_in_race,
            track,
            stage: StageInfo::for_lap(lap_number, laps_in_race),
            positions,
            caution_segments,
            caution_laps,
            lead_changes,
        }
    }

    pub fn laps_to_go(&self) -> u32 {
        self.laps_in_race.saturating_sub(self.lap_number)
    }
}

/// Draw a new race state and render the full snapshot for it
pub fn generate_snapshot<R: Rng>(rng: &mut R, laps_in_race: u32, now: DateTime<Utc>) -> LiveFeed {
    let state = RaceState::randomize(rng, laps_in_race);
    build_snapshot(&state, rng, now)
}

/// Render the snapshot for an already drawn race state
pub fn build_snapshot<R: Rng>(state: &RaceState, rng: &mut R, now: DateTime<Utc>) -> LiveFeed {
    let mut vehicles: Vec<Vehicle> = DRIVERS
        .iter()
        .zip(state.positions.iter())
        .map(|(driver, &position)| generate_vehicle(rng, state, driver, position))
        .collect();

    vehicles.sort_by_key(|v| v.running_position);

    let number_of_leaders = vehicles
        .iter()
        .filter(|v| !v.laps_led.is_empty())
        .map(|v| v.running_position)
        .collect::<HashSet<_>>()
        .len() as u32;

    let (time_of_day, time_of_day_os) = time_of_day(now);

    LiveFeed {
        lap_number: state.lap_number,
        elapsed_time: state.elapsed_time,
        flag_state: state.flag_state,
        race_id: state.race_id,
        laps_in_race: state.laps_in_race,
        laps_to_go: state.laps_to_go(),
        vehicles,
        run_id: rng.gen_range(1..=20),
        run_name: format!("Mock Race at {}", state.track.name),
        series_id: 1,
        time_of_day,
        time_of_day_os,
        track_id: state.track.id,
        track_length: state.track.length,
        track_name: state.track.name.to_string(),
        run_type: 3,
        number_of_caution_segments: state.caution_segments,
        number_of_caution_laps: state.caution_laps,
        number_of_lead_changes: state.lead_changes,
        number_of_leaders,
        avg_diff_1to3: rng.gen_range(1000..=5000),
        stage: state.stage,
    }
}

fn generate_vehicle<R: Rng>(rng: &mut R, state: &RaceState, driver: &Driver, position: u32) -> Vehicle {
    let track_type = state.track.track_type;
    let lap = state.lap_number;

    let last_lap_time = generate_lap_time(rng, track_type);
    let best_lap_time = last_lap_time - rng.gen_range(1.0..5.0);
    let last_lap_speed = generate_speed(rng, track_type);
    let best_lap_speed = last_lap_speed + rng.gen_range(2.0..8.0);

    Vehicle {
        average_restart_speed: best_lap_speed - rng.gen_range(0.0..3.0),
        average_running_position: position as f64 + rng.gen_range(-2.0..2.0),
        average_speed: last_lap_speed - rng.gen_range(5.0..15.0),
        best_lap: rng.gen_range(1..=lap),
        best_lap_speed: round_to(best_lap_speed, 3),
        best_lap_time: round_to(best_lap_time, 3),
        vehicle_manufacturer: driver.manufacturer.to_string(),
        vehicle_number: driver.number.to_string(),
        driver: DriverInfo {
            driver_id: driver.id,
            full_name: driver.full_name(),
            first_name: driver.first_name.to_string(),
            last_name: driver.last_name.to_string(),
            is_in_chase: rng.gen(),
        },
        vehicle_elapsed_time: state.elapsed_time as f64 - rng.gen_range(0.0..60.0),
        fastest_laps_run: rng.gen_range(0..=10),
        laps_position_improved: rng.gen_range(0..=5),
        laps_completed: lap.saturating_sub(rng.gen_range(0..=2)),
        laps_led: generate_laps_led(rng, lap),
        last_lap_speed: round_to(last_lap_speed, 3),
        last_lap_time: round_to(last_lap_time, 3),
        passes_made: rng.gen_range(0..=15),
        passing_differential: rng.gen_range(-5..=10),
        position_differential_last_10_percent: rng.gen_range(-10..=10),
        pit_stops: generate_pit_stops(rng, state),
        qualifying_status: rng.gen_range(0..=2),
        running_position: position,
        status: STATUS_WEIGHTS[rng.gen_range(0..STATUS_WEIGHTS.len())],
        delta: if position > 1 {
            round_to(rng.gen_range(-5.0..=5.0), 1)
        } else {
            0.0
        },
        sponsor_name: driver.sponsor.to_string(),
        starting_position: rng.gen_range(1..=FIELD_SIZE as u32),
        times_passed: rng.gen_range(0..=8),
        quality_passes: rng.gen_range(0..=5),
        is_on_track: rng.gen_ratio(3, 4),
        is_on_dvp: rng.gen(),
    }
}

/// Last-lap time in seconds around the surface's typical pace
pub fn generate_lap_time<R: Rng>(rng: &mut R, track_type: TrackType) -> f64 {
    track_type.base_lap_time() + rng.gen_range(-2.0..3.0)
}

/// Last-lap speed in mph around the surface's typical pace
pub fn generate_speed<R: Rng>(rng: &mut R, track_type: TrackType) -> f64 {
    track_type.base_speed() + rng.gen_range(-5.0..=5.0)
}

/// Zero to three pit stops within the race so far
pub fn generate_pit_stops<R: Rng>(rng: &mut R, state: &RaceState) -> Vec<PitStop> {
    let count = rng.gen_range(0..=3);
    let elapsed = state.elapsed_time as f64;
    let lap = state.lap_number;

    (0..count)
        .map(|_| PitStop {
            positions_gained_lossed: rng.gen_range(-5..=5),
            pit_in_elapsed_time: rng.gen_range(100.0..=elapsed),
            pit_in_lap_count: rng.gen_range(1..=lap),
            pit_in_leader_lap: rng.gen_range(1..=lap),
            pit_out_elapsed_time: rng.gen_range(100.0..=elapsed),
            pit_in_rank: rng.gen_range(1..=FIELD_SIZE as u32),
            pit_out_rank: rng.gen_range(1..=FIELD_SIZE as u32),
        })
        .collect()
}

/// At most one laps-led interval, ending no later than the current lap
pub fn generate_laps_led<R: Rng>(rng: &mut R, lap_number: u32) -> Vec<LapsLedInterval> {
    if !rng.gen_bool(LAPS_LED_PROBABILITY) {
        return Vec::new();
    }

    let start_lap = rng.gen_range(1..=lap_number.saturating_sub(5).max(1));
    let end_lap = rng.gen_range(start_lap..=lap_number.max(start_lap));
    vec![LapsLedInterval { start_lap, end_lap }]
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Seconds since UTC midnight, plus the clock rendered at a fixed UTC-5 offset
fn time_of_day(now: DateTime<Utc>) -> (u32, String) {
    let seconds = now.timestamp().rem_euclid(86_400) as u32;
    let eastern = (now - Duration::hours(5)).format("%Y-%m-%dT%H:%M:%S%.3f");
    (seconds, format!("{}-05:00", eastern))
}
