pub(crate) mod rr;
pub use rr::{DEFAULT_OUTLIER_THRESHOLD, filter_outliers, heart_rate_to_rr, heart_rates_to_rr};

pub(crate) mod hrv;
pub use hrv::HrvCalculator;

pub(crate) mod rolling;
pub use rolling::RollingWindow;

pub(crate) mod stress;
pub use stress::{ClassifierConfig, HrvMetric, StressClassifier};

pub(crate) mod recommendations;
pub use recommendations::stress_recommendations;

pub mod helpers;
