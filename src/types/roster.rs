//! Static roster types

use serde::{Deserialize, Serialize};

/// Track surface category, which drives the base lap time and speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackType {
    Street,
    Superspeedway,
    Intermediate,
    #[serde(rename = "Short Track")]
    ShortTrack,
}

impl TrackType {
    /// Typical lap time in seconds
    pub fn base_lap_time(self) -> f64 {
        match self {
            Self::Street => 90.0,
            Self::Superspeedway => 45.0,
            Self::Intermediate => 28.0,
            Self::ShortTrack => 20.0,
        }
    }

    /// Typical lap speed in mph
    pub fn base_speed(self) -> f64 {
        match self {
            Self::Street => 85.0,
            Self::Superspeedway => 200.0,
            Self::Intermediate => 180.0,
            Self::ShortTrack => 90.0,
        }
    }
}

impl std::fmt::Display for TrackType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Street => write!(f, "Street"),
            Self::Superspeedway => write!(f, "Superspeedway"),
            Self::Intermediate => write!(f, "Intermediate"),
            Self::ShortTrack => write!(f, "Short Track"),
        }
    }
}

/// A driver entry in the static field
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Driver {
    pub id: u32,
    pub first_name: &'static str,
    pub last_name: &'static str,
    pub number: &'static str,
    pub manufacturer: &'static str,
    pub sponsor: &'static str,
}

impl Driver {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A circuit the mock race can be held at
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Track {
    pub id: u32,
    pub name: &'static str,
    /// Length in miles
    pub length: f64,
    pub track_type: TrackType,
}
