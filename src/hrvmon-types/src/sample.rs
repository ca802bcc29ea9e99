use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

/// Unit of the raw values pushed into a rolling window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleUnit {
    /// Heart rate in beats per minute, converted to RR on ingestion.
    #[default]
    Bpm,
    /// RR interval in milliseconds, stored as-is.
    RrMillis,
}

impl FromStr for SampleUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bpm" | "hr" => Ok(Self::Bpm),
            "rr" | "rr_ms" | "rr_millis" => Ok(Self::RrMillis),
            other => Err(format!("unknown sample unit `{}`, expected `bpm` or `rr`", other)),
        }
    }
}

impl Display for SampleUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bpm => f.write_str("bpm"),
            Self::RrMillis => f.write_str("rr"),
        }
    }
}
