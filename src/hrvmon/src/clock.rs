use std::sync::{
    Arc,
    atomic::{AtomicI64, Ordering},
};

use chrono::{DateTime, Local, NaiveDateTime};

/// Source of "now" for time gating, trend windows and session bounds.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

impl<F> Clock for F
where
    F: Fn() -> NaiveDateTime + Send + Sync,
{
    fn now(&self) -> NaiveDateTime {
        self()
    }
}

/// Clock driven by the sample stream itself, for replayed or simulated data.
///
/// Clones share the same cursor, so one handle can be given to a monitor
/// while the feeding loop keeps another.
#[derive(Debug, Clone)]
pub struct StreamClock {
    millis: Arc<AtomicI64>,
}

impl StreamClock {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(start.and_utc().timestamp_millis())),
        }
    }

    /// Moves the cursor to `time`. The cursor never goes backwards.
    pub fn advance_to(&self, time: NaiveDateTime) {
        self.millis
            .fetch_max(time.and_utc().timestamp_millis(), Ordering::Relaxed);
    }
}

impl Clock for StreamClock {
    fn now(&self) -> NaiveDateTime {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::Relaxed))
            .map(|time| time.naive_utc())
            .unwrap_or_default()
    }
}
