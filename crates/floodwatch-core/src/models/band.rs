//! Sentinel-1 polarization bands.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProcessingError;

/// Radar polarization channel. Only the dual-polarization pair the mission
/// actually transmits is accepted; anything else is rejected before any
/// network call is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Band {
    #[serde(rename = "VV")]
    Vv,
    #[serde(rename = "VH")]
    Vh,
}

impl Band {
    pub fn as_str(&self) -> &'static str {
        match self {
            Band::Vv => "VV",
            Band::Vh => "VH",
        }
    }

    /// Both supported bands, in the order they are fetched.
    pub fn pair() -> [Band; 2] {
        [Band::Vv, Band::Vh]
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Band {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VV" => Ok(Band::Vv),
            "VH" => Ok(Band::Vh),
            other => Err(ProcessingError::InvalidBand {
                name: other.to_string(),
            }),
        }
    }
}
