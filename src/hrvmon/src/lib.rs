#[macro_use]
extern crate log;

mod clock;
pub use clock::{Clock, StreamClock, SystemClock};

mod config;
pub use config::MonitorConfig;

mod error;
pub use error::MonitorError;

mod history;
pub use history::BoundedHistory;

mod monitor;
pub use monitor::RealtimeMonitor;

pub mod notify;
pub use notify::{HighStressAlert, LevelChange, Notify};

mod session;
pub use session::{MonitoringSession, SessionSummary};

pub use hrvmon_algos::{ClassifierConfig, stress_recommendations};
pub use hrvmon_types::{
    HrvMetrics, LevelLabels, SampleUnit, StressAssessment, StressAssessmentRecord, StressLevel,
};
