//! Notification sinks invoked in-line by [`RealtimeMonitor::add_sample`].
//!
//! Sinks run synchronously on the caller's thread. A host that must not
//! block should forward the event to its own queue inside the sink.
//!
//! [`RealtimeMonitor::add_sample`]: crate::RealtimeMonitor::add_sample

use hrvmon_types::{StressAssessment, StressLevel};

/// The assessed level differs from the previous assessment's level.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelChange {
    pub previous: StressLevel,
    pub current: StressLevel,
    pub assessment: StressAssessment,
}

/// An assessment landed on `High` or `VeryHigh`.
#[derive(Debug, Clone, PartialEq)]
pub struct HighStressAlert {
    pub assessment: StressAssessment,
}

pub trait Notify<E>: Send {
    fn notify(&mut self, event: &E);
}

impl<E, F> Notify<E> for F
where
    F: FnMut(&E) + Send,
{
    fn notify(&mut self, event: &E) {
        self(event)
    }
}
