mod hrv;
pub use hrv::HrvMetrics;

mod sample;
pub use sample::SampleUnit;

mod stress;
pub use stress::{StressAssessment, StressLevel};

pub mod labels;
pub use labels::LevelLabels;

pub mod records;
pub use records::{HrvMetricsRecord, StressAssessmentRecord, round_float};
