use std::fmt::Display;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::HrvMetrics;

/// Ordered stress category, `VeryLow = 1` through `VeryHigh = 5`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum StressLevel {
    VeryLow = 1,
    Low = 2,
    Moderate = 3,
    High = 4,
    VeryHigh = 5,
}

impl StressLevel {
    pub const ALL: [StressLevel; 5] = [
        StressLevel::VeryLow,
        StressLevel::Low,
        StressLevel::Moderate,
        StressLevel::High,
        StressLevel::VeryHigh,
    ];

    /// Ordinal value in `1..=5`.
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Symbolic name used on the wire.
    pub fn name(self) -> &'static str {
        match self {
            StressLevel::VeryLow => "VERY_LOW",
            StressLevel::Low => "LOW",
            StressLevel::Moderate => "MODERATE",
            StressLevel::High => "HIGH",
            StressLevel::VeryHigh => "VERY_HIGH",
        }
    }

    /// `High` and `VeryHigh` raise the high-stress alert.
    pub fn is_high(self) -> bool {
        self >= StressLevel::High
    }
}

impl Display for StressLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One classification result. Produced fresh per re-assessment.
#[derive(Debug, Clone, PartialEq)]
pub struct StressAssessment {
    pub stress_level: StressLevel,
    /// Fused score in `[0, 100]`.
    pub stress_score: f64,
    /// Agreement between metrics in `[0, 1]`.
    pub confidence: f64,
    pub hrv_metrics: HrvMetrics,
    pub reasoning: String,
    pub timestamp: NaiveDateTime,
}
