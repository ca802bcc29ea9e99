//! Stable transport form of assessments for whatever persistence or API
//! layer the host owns. Field names here are part of the public contract.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{HrvMetrics, StressAssessment, StressLevel};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HrvMetricsRecord {
    pub sdnn: f64,
    pub rmssd: f64,
    pub pnn50: f64,
    pub mean_rr: f64,
    pub mean_hr: f64,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressAssessmentRecord {
    pub stress_level: StressLevel,
    pub stress_level_value: u8,
    pub stress_score: f64,
    pub confidence: f64,
    pub hrv_metrics: HrvMetricsRecord,
    pub reasoning: String,
    pub timestamp: NaiveDateTime,
}

/// Rounds to two decimals, the precision every record field carries.
pub fn round_float(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

impl From<&HrvMetrics> for HrvMetricsRecord {
    fn from(metrics: &HrvMetrics) -> Self {
        Self {
            sdnn: round_float(metrics.sdnn),
            rmssd: round_float(metrics.rmssd),
            pnn50: round_float(metrics.pnn50),
            mean_rr: round_float(metrics.mean_rr),
            mean_hr: round_float(metrics.mean_hr),
            timestamp: metrics.timestamp,
        }
    }
}

impl From<&StressAssessment> for StressAssessmentRecord {
    fn from(assessment: &StressAssessment) -> Self {
        Self {
            stress_level: assessment.stress_level,
            stress_level_value: assessment.stress_level.value(),
            stress_score: round_float(assessment.stress_score),
            confidence: round_float(assessment.confidence),
            hrv_metrics: HrvMetricsRecord::from(&assessment.hrv_metrics),
            reasoning: assessment.reasoning.clone(),
            timestamp: assessment.timestamp,
        }
    }
}

impl HrvMetrics {
    pub fn to_record(&self) -> HrvMetricsRecord {
        self.into()
    }
}

impl StressAssessment {
    pub fn to_record(&self) -> StressAssessmentRecord {
        self.into()
    }
}
