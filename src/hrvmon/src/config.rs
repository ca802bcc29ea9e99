use chrono::TimeDelta;
use hrvmon_algos::{ClassifierConfig, DEFAULT_OUTLIER_THRESHOLD, RollingWindow};
use hrvmon_types::SampleUnit;
use serde::{Deserialize, Serialize};

use crate::{BoundedHistory, MonitorError};

/// Configuration of one monitor, fixed at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub window_size: usize,
    /// Minimum time between two assessments.
    #[serde(rename = "update_interval_secs", with = "duration_secs")]
    pub update_interval: TimeDelta,
    pub history_capacity: usize,
    pub outlier_threshold: f64,
    pub unit: SampleUnit,
    pub classifier: ClassifierConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            window_size: RollingWindow::DEFAULT_WINDOW_SIZE,
            update_interval: TimeDelta::minutes(1),
            history_capacity: BoundedHistory::<()>::DEFAULT_CAPACITY,
            outlier_threshold: DEFAULT_OUTLIER_THRESHOLD,
            unit: SampleUnit::Bpm,
            classifier: ClassifierConfig::default(),
        }
    }
}

impl MonitorConfig {
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn with_update_interval(mut self, update_interval: TimeDelta) -> Self {
        self.update_interval = update_interval;
        self
    }

    pub fn with_history_capacity(mut self, history_capacity: usize) -> Self {
        self.history_capacity = history_capacity;
        self
    }

    pub fn with_outlier_threshold(mut self, outlier_threshold: f64) -> Self {
        self.outlier_threshold = outlier_threshold;
        self
    }

    pub fn with_unit(mut self, unit: SampleUnit) -> Self {
        self.unit = unit;
        self
    }

    pub fn with_classifier(mut self, classifier: ClassifierConfig) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn validate(&self) -> Result<(), MonitorError> {
        if self.window_size == 0 {
            return Err(MonitorError::InvalidWindowSize(self.window_size));
        }
        if self.update_interval < TimeDelta::zero() {
            return Err(MonitorError::InvalidUpdateInterval(
                self.update_interval.num_seconds(),
            ));
        }
        if self.history_capacity == 0 {
            return Err(MonitorError::InvalidHistoryCapacity(self.history_capacity));
        }
        if !self.outlier_threshold.is_finite() || self.outlier_threshold <= 0.0 {
            return Err(MonitorError::InvalidOutlierThreshold(self.outlier_threshold));
        }
        if !self.classifier.any_enabled() {
            return Err(MonitorError::NoMetricsEnabled);
        }
        Ok(())
    }
}

/// `TimeDelta` as whole seconds on the wire.
pub(crate) mod duration_secs {
    use chrono::TimeDelta;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.num_seconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TimeDelta, D::Error> {
        let secs = i64::deserialize(deserializer)?;
        TimeDelta::try_seconds(secs)
            .ok_or_else(|| serde::de::Error::custom(format!("{secs}s is out of range")))
    }
}
