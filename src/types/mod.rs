//! Wire types for the race feed
//!
//! This module defines the live-feed payload served at `/live-feed` and the
//! static roster types the generator draws from.

mod feed;
mod roster;

pub use feed::*;
pub use roster::*;

use serde::{Deserialize, Serialize};

/// Race-control flag shown to the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum FlagState {
    #[default]
    Green,
    Caution,
    Red,
}

impl FlagState {
    /// Numeric code used on the wire (1 = green, 2 = caution, 3 = red)
    pub fn code(self) -> u8 {
        match self {
            Self::Green => 1,
            Self::Caution => 2,
            Self::Red => 3,
        }
    }
}

impl From<FlagState> for u8 {
    fn from(flag: FlagState) -> Self {
        flag.code()
    }
}

impl TryFrom<u8> for FlagState {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Green),
            2 => Ok(Self::Caution),
            3 => Ok(Self::Red),
            _ => Err(format!("Unknown flag state: {}", code)),
        }
    }
}

impl std::fmt::Display for FlagState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Green => write!(f, "green"),
            Self::Caution => write!(f, "caution"),
            Self::Red => write!(f, "red"),
        }
    }
}

/// Where a vehicle currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum VehicleStatus {
    #[default]
    Running,
    InPit,
    Retired,
}

impl VehicleStatus {
    /// Numeric code used on the wire (1 = running, 2 = pit, 3 = out)
    pub fn code(self) -> u8 {
        match self {
            Self::Running => 1,
            Self::InPit => 2,
            Self::Retired => 3,
        }
    }
}

impl From<VehicleStatus> for u8 {
    fn from(status: VehicleStatus) -> Self {
        status.code()
    }
}

impl TryFrom<u8> for VehicleStatus {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Running),
            2 => Ok(Self::InPit),
            3 => Ok(Self::Retired),
            _ => Err(format!("Unknown vehicle status: {}", code)),
        }
    }
}
