use chrono::{NaiveDateTime, TimeDelta};
use hrvmon_algos::{
    HrvCalculator, RollingWindow, StressClassifier, helpers::math::linear_slope,
    stress_recommendations,
};
use hrvmon_types::{HrvMetrics, StressAssessment};

use crate::{
    BoundedHistory, Clock, HighStressAlert, LevelChange, MonitorConfig, MonitorError, Notify,
    SystemClock,
};

/// Streaming stress monitor for one subject.
///
/// Every call to [`add_sample`](Self::add_sample) runs the whole pipeline
/// (window, metrics, classification, notifications) before returning. A
/// monitor shares no state with other monitors; run one per subject.
pub struct RealtimeMonitor {
    config: MonitorConfig,
    window: RollingWindow,
    classifier: StressClassifier,
    current: Option<StressAssessment>,
    last_update: Option<NaiveDateTime>,
    history: BoundedHistory<StressAssessment>,
    clock: Box<dyn Clock>,
    level_change_sink: Option<Box<dyn Notify<LevelChange>>>,
    high_stress_sink: Option<Box<dyn Notify<HighStressAlert>>>,
}

impl RealtimeMonitor {
    /// Default trend window for [`is_increasing`](Self::is_increasing), in minutes.
    pub const DEFAULT_TREND_MINUTES: i64 = 30;

    /// Minimum score slope per assessment for a trend to count as rising.
    const RISING_SLOPE: f64 = 2.0;
    const MIN_TREND_POINTS: usize = 3;

    pub fn new(config: MonitorConfig) -> Result<Self, MonitorError> {
        config.validate()?;

        let calculator = HrvCalculator::new(config.outlier_threshold);
        Ok(Self {
            window: RollingWindow::with_calculator(config.window_size, config.unit, calculator),
            classifier: StressClassifier::new(config.classifier),
            current: None,
            last_update: None,
            history: BoundedHistory::new(config.history_capacity),
            clock: Box::new(SystemClock),
            level_change_sink: None,
            high_stress_sink: None,
            config,
        })
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn on_level_change(mut self, sink: impl Notify<LevelChange> + 'static) -> Self {
        self.level_change_sink = Some(Box::new(sink));
        self
    }

    pub fn on_high_stress(mut self, sink: impl Notify<HighStressAlert> + 'static) -> Self {
        self.high_stress_sink = Some(Box::new(sink));
        self
    }

    /// Ingests one sample.
    ///
    /// Returns an assessment only when the window produced fresh metrics
    /// and at least `update_interval` has passed since the last assessment.
    pub fn add_sample(&mut self, value: f64, timestamp: NaiveDateTime) -> Option<StressAssessment> {
        if !value.is_finite() || value <= 0.0 {
            trace!("Dropping invalid sample {} at {}", value, timestamp);
            return None;
        }

        let metrics = self.window.add(value, timestamp)?;

        if let Some(last) = self.last_update {
            let elapsed = timestamp - last;
            if elapsed < self.config.update_interval {
                debug!(
                    "Window ready but only {}s since last assessment, skipping",
                    elapsed.num_seconds()
                );
                return None;
            }
        }

        let assessment = self.classifier.classify(&metrics);
        self.notify(&assessment);

        self.current = Some(assessment.clone());
        self.last_update = Some(timestamp);
        self.history.push(assessment.clone());

        Some(assessment)
    }

    /// [`add_sample`](Self::add_sample) stamped with the monitor's clock.
    pub fn add_sample_now(&mut self, value: f64) -> Option<StressAssessment> {
        let now = self.now();
        self.add_sample(value, now)
    }

    fn notify(&mut self, assessment: &StressAssessment) {
        let level = assessment.stress_level;

        if let Some(previous) = self.current.as_ref().map(|a| a.stress_level) {
            if previous != level {
                info!("Stress level changed: {} -> {}", previous, level);
                if let Some(sink) = self.level_change_sink.as_mut() {
                    sink.notify(&LevelChange {
                        previous,
                        current: level,
                        assessment: assessment.clone(),
                    });
                }
            }
        }

        if level.is_high() {
            warn!(
                "High stress: {} (score {:.1}, confidence {:.2})",
                level, assessment.stress_score, assessment.confidence
            );
            if let Some(sink) = self.high_stress_sink.as_mut() {
                sink.notify(&HighStressAlert {
                    assessment: assessment.clone(),
                });
            }
        }
    }

    pub fn current(&self) -> Option<&StressAssessment> {
        self.current.as_ref()
    }

    pub fn last_update(&self) -> Option<NaiveDateTime> {
        self.last_update
    }

    /// Partial-window HRV without waiting for a full window.
    pub fn peek_hrv(&self) -> Option<HrvMetrics> {
        self.window.peek()
    }

    /// Suggested actions for the current level, empty before the first
    /// assessment.
    pub fn recommendations(&self) -> &'static [&'static str] {
        self.current
            .as_ref()
            .map(|a| stress_recommendations(a.stress_level))
            .unwrap_or_default()
    }

    /// Assessments from the last `duration`, oldest first.
    pub fn trend(&self, duration: TimeDelta) -> Vec<&StressAssessment> {
        let since = self.now() - duration;
        self.history
            .iter()
            .filter(|a| a.timestamp >= since)
            .collect()
    }

    pub fn average_score(&self, duration: TimeDelta) -> Option<f64> {
        let trend = self.trend(duration);
        if trend.is_empty() {
            return None;
        }
        Some(trend.iter().map(|a| a.stress_score).sum::<f64>() / trend.len() as f64)
    }

    /// True when the least-squares slope of the trend scores exceeds 2 points
    /// per assessment. Needs at least three assessments.
    pub fn is_increasing(&self, duration: TimeDelta) -> bool {
        let scores: Vec<f64> = self.trend(duration).iter().map(|a| a.stress_score).collect();
        if scores.len() < Self::MIN_TREND_POINTS {
            return false;
        }
        linear_slope(&scores).is_some_and(|slope| slope > Self::RISING_SLOPE)
    }

    pub fn history(&self) -> &BoundedHistory<StressAssessment> {
        &self.history
    }

    pub fn buffered(&self) -> usize {
        self.window.len()
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// Clears the window, current assessment, gate and history. Sinks and
    /// clock are kept.
    pub fn reset(&mut self) {
        debug!("Resetting monitor");
        self.window.reset();
        self.current = None;
        self.last_update = None;
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hrvmon_types::{SampleUnit, StressLevel};
    use std::sync::mpsc;

    fn base() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn at(secs: i64) -> NaiveDateTime {
        base() + TimeDelta::seconds(secs)
    }

    fn monitor(window_size: usize, update_secs: i64) -> RealtimeMonitor {
        RealtimeMonitor::new(
            MonitorConfig::default()
                .with_window_size(window_size)
                .with_update_interval(TimeDelta::seconds(update_secs)),
        )
        .unwrap()
    }

    // 70 +/- 4 bpm alternating: RMSSD ~98ms, scores Low
    fn relaxed(i: usize) -> f64 {
        if i % 2 == 0 { 66.0 } else { 74.0 }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let result = RealtimeMonitor::new(MonitorConfig::default().with_window_size(0));
        assert!(matches!(result, Err(MonitorError::InvalidWindowSize(0))));
    }

    #[test]
    fn no_assessment_before_window_is_full() {
        let mut monitor = monitor(10, 0);
        for i in 0..9 {
            assert!(monitor.add_sample(relaxed(i), at(i as i64)).is_none());
        }
        assert!(monitor.current().is_none());
        assert!(monitor.add_sample(relaxed(9), at(9)).is_some());
        assert_eq!(monitor.last_update(), Some(at(9)));
    }

    #[test]
    fn gate_blocks_until_interval_elapsed() {
        let mut monitor = monitor(10, 60);
        for i in 0..10 {
            monitor.add_sample(relaxed(i), at(i as i64));
        }
        assert_eq!(monitor.history().len(), 1);

        // window stays full and ready, but the gate is closed
        for i in 10..69 {
            assert!(
                monitor.add_sample(relaxed(i), at(i as i64)).is_none(),
                "assessed at {i}s"
            );
        }
        // 69 - 9 = 60s elapsed
        assert!(monitor.add_sample(relaxed(69), at(69)).is_some());
        assert_eq!(monitor.history().len(), 2);
    }

    #[test]
    fn zero_interval_assesses_every_ready_sample() {
        let mut monitor = monitor(5, 0);
        let assessed = (0..12)
            .filter(|&i| monitor.add_sample(relaxed(i), at(i as i64)).is_some())
            .count();
        assert_eq!(assessed, 8);
    }

    #[test]
    fn invalid_samples_do_not_disturb_the_stream() {
        let mut monitor = monitor(4, 0);
        for i in 0..3 {
            monitor.add_sample(relaxed(i), at(i as i64));
        }
        assert!(monitor.add_sample(0.0, at(3)).is_none());
        assert!(monitor.add_sample(-1.0, at(4)).is_none());
        assert!(monitor.add_sample(f64::NAN, at(5)).is_none());
        assert_eq!(monitor.buffered(), 3);
        assert!(monitor.add_sample(relaxed(3), at(6)).is_some());
    }

    #[test]
    fn infinite_samples_do_not_poison_the_window() {
        let mut monitor = monitor(5, 0);
        assert!(monitor.add_sample(f64::INFINITY, at(0)).is_none());
        assert!(monitor.add_sample(f64::NEG_INFINITY, at(1)).is_none());
        assert_eq!(monitor.buffered(), 0);

        let assessment = (0..5)
            .filter_map(|i| monitor.add_sample(relaxed(i), at(i as i64 + 2)))
            .last()
            .expect("five finite samples fill the window");
        assert_ne!(assessment.reasoning, StressClassifier::INSUFFICIENT_DATA);
        assert!(assessment.confidence > 0.0);
        assert!(assessment.hrv_metrics.sdnn.is_finite());
    }

    #[test]
    fn infinite_rr_interval_is_dropped() {
        let mut monitor = RealtimeMonitor::new(
            MonitorConfig::default()
                .with_window_size(2)
                .with_update_interval(TimeDelta::zero())
                .with_unit(SampleUnit::RrMillis),
        )
        .unwrap();
        monitor.add_sample(800.0, at(0));
        assert!(monitor.add_sample(f64::INFINITY, at(1)).is_none());
        let assessment = monitor.add_sample(820.0, at(2)).expect("two finite intervals");
        assert_eq!(assessment.hrv_metrics.mean_rr, 810.0);
        assert!(assessment.stress_score.is_finite());
    }

    #[test]
    fn level_change_fires_only_on_transitions() {
        let (tx, rx) = mpsc::channel();
        let mut monitor = monitor(10, 0).on_level_change(move |event: &LevelChange| {
            let _ = tx.send((event.previous, event.current));
        });

        // relaxed first assessment has no predecessor
        for i in 0..10 {
            monitor.add_sample(relaxed(i), at(i as i64));
        }
        assert!(rx.try_recv().is_err());
        let first = monitor.current().unwrap().stress_level;

        // constant heart rate: no variability at all
        for i in 10..20 {
            monitor.add_sample(100.0, at(i));
        }
        let changes: Vec<_> = rx.try_iter().collect();
        assert!(!changes.is_empty());
        assert_eq!(changes[0].0, first);
        assert_eq!(monitor.current().unwrap().stress_level, StressLevel::Moderate);
    }

    #[test]
    fn high_stress_alert_fires_for_high_levels() {
        let (tx, rx) = mpsc::channel();
        let mut monitor = monitor(10, 0).on_high_stress(move |event: &HighStressAlert| {
            let _ = tx.send(event.assessment.stress_level);
        });

        // 100 +/- 0.3 bpm: RMSSD ~4ms, SDNN ~2ms
        for i in 0..10 {
            let bpm = if i % 2 == 0 { 99.7 } else { 100.3 };
            monitor.add_sample(bpm, at(i));
        }
        assert_eq!(rx.try_recv(), Ok(StressLevel::VeryHigh));
    }

    #[test]
    fn trend_and_average_follow_the_clock() {
        let mut monitor = monitor(5, 60).with_clock(|| at(600));
        // assessments at 4s, 64s, 124s, ...
        for i in 0..600 {
            monitor.add_sample(relaxed(i), at(i as i64));
        }
        assert_eq!(monitor.history().len(), 10);

        let trend = monitor.trend(TimeDelta::minutes(3));
        assert_eq!(trend.len(), 3);
        assert!(trend.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        assert!(monitor.average_score(TimeDelta::minutes(3)).is_some());
        assert!(monitor.average_score(TimeDelta::seconds(1)).is_none());
    }

    #[test]
    fn flat_or_short_trend_is_not_increasing() {
        let window = TimeDelta::minutes(RealtimeMonitor::DEFAULT_TREND_MINUTES);
        let mut monitor = monitor(4, 0).with_clock(|| at(100));
        for i in 0..5 {
            monitor.add_sample(70.0, at(i));
        }
        assert_eq!(monitor.history().len(), 2);
        assert!(!monitor.is_increasing(window));

        for i in 5..20 {
            monitor.add_sample(70.0, at(i));
        }
        // all degenerate Moderate/50 assessments: slope 0
        assert!(monitor.history().len() >= 3);
        assert!(!monitor.is_increasing(window));
    }

    #[test]
    fn history_is_bounded() {
        let mut monitor = RealtimeMonitor::new(
            MonitorConfig::default()
                .with_window_size(3)
                .with_update_interval(TimeDelta::zero())
                .with_history_capacity(7),
        )
        .unwrap();
        for i in 0..50 {
            monitor.add_sample(relaxed(i), at(i as i64));
            assert!(monitor.history().len() <= 7);
        }
        assert_eq!(monitor.history().last().map(|a| a.timestamp), Some(at(49)));
    }

    #[test]
    fn recommendations_follow_current_level() {
        let mut monitor = monitor(5, 0);
        assert!(monitor.recommendations().is_empty());
        for i in 0..5 {
            monitor.add_sample(relaxed(i), at(i as i64));
        }
        let level = monitor.current().unwrap().stress_level;
        assert_eq!(monitor.recommendations(), stress_recommendations(level));
    }

    #[test]
    fn rr_input() {
        let mut monitor = RealtimeMonitor::new(
            MonitorConfig::default()
                .with_window_size(4)
                .with_unit(hrvmon_types::SampleUnit::RrMillis),
        )
        .unwrap();
        for (i, rr) in [800.0, 860.0, 790.0].into_iter().enumerate() {
            assert!(monitor.add_sample(rr, at(i as i64)).is_none());
        }
        let assessment = monitor.add_sample(850.0, at(3)).unwrap();
        assert_eq!(assessment.hrv_metrics.mean_rr, 825.0);
    }

    #[test]
    fn peek_before_full_window() {
        let mut monitor = monitor(60, 0);
        for i in 0..30 {
            monitor.add_sample(relaxed(i), at(i as i64));
        }
        assert!(monitor.current().is_none());
        let peeked = monitor.peek_hrv().expect("30 samples buffered");
        assert!(peeked.rmssd > 50.0, "{}", peeked.rmssd);
    }

    #[test]
    fn reset_clears_state() {
        let mut monitor = monitor(5, 0);
        for i in 0..8 {
            monitor.add_sample(relaxed(i), at(i as i64));
        }
        monitor.reset();
        assert!(monitor.current().is_none());
        assert!(monitor.last_update().is_none());
        assert!(monitor.history().is_empty());
        assert_eq!(monitor.buffered(), 0);
    }
}
