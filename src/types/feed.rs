//! Live-feed payload types

use serde::{Deserialize, Serialize};

use super::{FlagState, VehicleStatus};

/// Last lap of stage 1
pub const STAGE_ONE_END: u32 = 25;

/// Last lap of stage 2
pub const STAGE_TWO_END: u32 = 45;

/// Full race snapshot served at `/live-feed`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveFeed {
    pub lap_number: u32,
    pub elapsed_time: u32,
    pub flag_state: FlagState,
    pub race_id: u32,
    pub laps_in_race: u32,
    pub laps_to_go: u32,
    /// Sorted by `running_position`, leader first
    pub vehicles: Vec<Vehicle>,
    pub run_id: u32,
    pub run_name: String,
    pub series_id: u32,
    /// Seconds since midnight
    pub time_of_day: u32,
    pub time_of_day_os: String,
    pub track_id: u32,
    pub track_length: f64,
    pub track_name: String,
    pub run_type: u32,
    pub number_of_caution_segments: u32,
    pub number_of_caution_laps: u32,
    pub number_of_lead_changes: u32,
    pub number_of_leaders: u32,
    pub avg_diff_1to3: u32,
    pub stage: StageInfo,
}

impl LiveFeed {
    /// The vehicle currently in first place, if any
    pub fn leader(&self) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.running_position == 1)
    }
}

/// Per-vehicle timing and scoring record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub average_restart_speed: f64,
    pub average_running_position: f64,
    pub average_speed: f64,
    pub best_lap: u32,
    pub best_lap_speed: f64,
    pub best_lap_time: f64,
    pub vehicle_manufacturer: String,
    pub vehicle_number: String,
    pub driver: DriverInfo,
    pub vehicle_elapsed_time: f64,
    pub fastest_laps_run: u32,
    pub laps_position_improved: u32,
    pub laps_completed: u32,
    pub laps_led: Vec<LapsLedInterval>,
    pub last_lap_speed: f64,
    pub last_lap_time: f64,
    pub passes_made: u32,
    pub passing_differential: i32,
    pub position_differential_last_10_percent: i32,
    pub pit_stops: Vec<PitStop>,
    pub qualifying_status: u8,
    pub running_position: u32,
    pub status: VehicleStatus,
    /// Gap to the leader in seconds
    pub delta: f64,
    pub sponsor_name: String,
    pub starting_position: u32,
    pub times_passed: u32,
    pub quality_passes: u32,
    pub is_on_track: bool,
    pub is_on_dvp: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverInfo {
    pub driver_id: u32,
    pub full_name: String,
    pub first_name: String,
    pub last_name: String,
    pub is_in_chase: bool,
}

/// A run of consecutive laps at the front
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LapsLedInterval {
    pub start_lap: u32,
    pub end_lap: u32,
}

impl LapsLedInterval {
    pub fn laps(&self) -> u32 {
        self.end_lap.saturating_sub(self.start_lap) + 1
    }
}

/// One pit-road visit
///
/// Pit-in and pit-out times are drawn independently; pit-in is not
/// guaranteed to precede pit-out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitStop {
    pub positions_gained_lossed: i32,
    pub pit_in_elapsed_time: f64,
    pub pit_in_lap_count: u32,
    pub pit_in_leader_lap: u32,
    pub pit_out_elapsed_time: f64,
    pub pit_in_rank: u32,
    pub pit_out_rank: u32,
}

/// Current stage and where it ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageInfo {
    pub stage_num: u32,
    pub finish_at_lap: u32,
    pub laps_in_stage: u32,
}

impl StageInfo {
    /// Stage number for a lap: 1 through lap 25, 2 through lap 45, 3 after
    pub fn stage_for_lap(lap: u32) -> u32 {
        if lap <= STAGE_ONE_END {
            1
        } else if lap <= STAGE_TWO_END {
            2
        } else {
            3
        }
    }

    /// Stage boundaries for the given lap in a race of `laps_in_race` laps
    ///
    /// Stage 2 is 20 laps long, where the live feed being mocked reports 25.
    pub fn for_lap(lap: u32, laps_in_race: u32) -> Self {
        let stage_num = Self::stage_for_lap(lap);
        let (finish_at_lap, laps_in_stage) = match stage_num {
            1 => (STAGE_ONE_END, STAGE_ONE_END),
            2 => (STAGE_TWO_END, STAGE_TWO_END - STAGE_ONE_END),
            _ => (laps_in_race, laps_in_race.saturating_sub(STAGE_TWO_END)),
        };

        Self {
            stage_num,
            finish_at_lap,
            laps_in_stage,
        }
    }
}
