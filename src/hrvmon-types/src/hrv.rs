use chrono::NaiveDateTime;

/// Time-domain HRV snapshot computed over one window of RR intervals.
///
/// Every field is `0.0` when fewer than two usable intervals contributed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HrvMetrics {
    /// Standard deviation of RR intervals (ms), sample (n - 1) denominator.
    pub sdnn: f64,
    /// Root mean square of successive differences (ms).
    pub rmssd: f64,
    /// Percentage of successive differences above 50ms.
    pub pnn50: f64,
    pub mean_rr: f64,
    pub mean_hr: f64,
    pub timestamp: NaiveDateTime,
}

impl HrvMetrics {
    pub fn empty(timestamp: NaiveDateTime) -> Self {
        Self {
            sdnn: 0.0,
            rmssd: 0.0,
            pnn50: 0.0,
            mean_rr: 0.0,
            mean_hr: 0.0,
            timestamp,
        }
    }

    /// True when no field carries a usable value.
    pub fn is_empty(&self) -> bool {
        self.sdnn == 0.0 && self.rmssd == 0.0 && self.pnn50 == 0.0 && self.mean_rr == 0.0
    }
}
