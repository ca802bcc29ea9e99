use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MonitorError {
    #[error("window size must be at least 1, got {0}")]
    InvalidWindowSize(usize),
    #[error("update interval must not be negative, got {0}s")]
    InvalidUpdateInterval(i64),
    #[error("history capacity must be at least 1, got {0}")]
    InvalidHistoryCapacity(usize),
    #[error("outlier threshold must be a positive number, got {0}")]
    InvalidOutlierThreshold(f64),
    #[error("at least one HRV metric must be enabled for classification")]
    NoMetricsEnabled,
}
