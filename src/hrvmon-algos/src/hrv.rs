use chrono::NaiveDateTime;
use hrvmon_types::HrvMetrics;

use crate::{
    helpers::math::{mean, sample_std_dev},
    rr::{DEFAULT_OUTLIER_THRESHOLD, filter_outliers, heart_rates_to_rr},
};

/// Time-domain HRV statistics over a list of RR intervals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HrvCalculator {
    /// Successive-difference threshold, `None` disables outlier filtering.
    pub outlier_threshold: Option<f64>,
}

impl Default for HrvCalculator {
    fn default() -> Self {
        Self {
            outlier_threshold: Some(DEFAULT_OUTLIER_THRESHOLD),
        }
    }
}

impl HrvCalculator {
    /// Outlier filtering only kicks in from this many intervals on.
    pub const MIN_FILTER_LEN: usize = 3;

    /// Successive differences above this count towards pNN50 (ms).
    const NN50_MS: f64 = 50.0;

    pub fn new(outlier_threshold: f64) -> Self {
        Self {
            outlier_threshold: Some(outlier_threshold),
        }
    }

    pub fn unfiltered() -> Self {
        Self {
            outlier_threshold: None,
        }
    }

    pub fn calculate(&self, rr: &[f64], timestamp: NaiveDateTime) -> HrvMetrics {
        let filtered;
        let rr = match self.outlier_threshold {
            Some(threshold) if rr.len() >= Self::MIN_FILTER_LEN => {
                filtered = filter_outliers(rr, threshold);
                filtered.as_slice()
            }
            _ => rr,
        };

        if rr.len() < 2 {
            return HrvMetrics::empty(timestamp);
        }

        let mean_rr = mean(rr);
        let mean_hr = if mean_rr == 0.0 { 0.0 } else { 60_000.0 / mean_rr };

        HrvMetrics {
            sdnn: sample_std_dev(rr),
            rmssd: Self::rmssd(rr),
            pnn50: Self::pnn50(rr),
            mean_rr,
            mean_hr,
            timestamp,
        }
    }

    /// Converts heart rates to RR intervals, then calculates.
    pub fn calculate_from_heart_rates(&self, bpm: &[f64], timestamp: NaiveDateTime) -> HrvMetrics {
        self.calculate(&heart_rates_to_rr(bpm), timestamp)
    }

    fn rmssd(rr: &[f64]) -> f64 {
        if rr.len() < 2 {
            return 0.0;
        }
        let sum_sq: f64 = rr.windows(2).map(|w| (w[1] - w[0]).powi(2)).sum();
        (sum_sq / (rr.len() - 1) as f64).sqrt()
    }

    fn pnn50(rr: &[f64]) -> f64 {
        if rr.len() < 2 {
            return 0.0;
        }
        let nn50 = rr
            .windows(2)
            .filter(|w| (w[1] - w[0]).abs() > Self::NN50_MS)
            .count();
        100.0 * nn50 as f64 / (rr.len() - 1) as f64
    }
}
