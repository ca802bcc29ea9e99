use std::sync::mpsc;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use hrvmon::{
    HighStressAlert, LevelChange, MonitorConfig, RealtimeMonitor, StreamClock, StressLevel,
};
use rand::Rng;

fn at(secs: usize) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 1)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
        + TimeDelta::seconds(secs as i64)
}

/// Heart rate rising linearly from 65 to 100 bpm over `n` samples, with an
/// alternating jitter shrinking linearly from `j0` to `j1` bpm.
fn ramp(i: usize, n: usize, j0: f64, j1: f64) -> f64 {
    let f = i as f64 / (n - 1) as f64;
    let jitter = j0 + (j1 - j0) * f;
    let sign = if i % 2 == 1 { 1.0 } else { -1.0 };
    65.0 + 35.0 * f + sign * jitter
}

fn monitor(window_size: usize, update_interval: TimeDelta) -> RealtimeMonitor {
    RealtimeMonitor::new(
        MonitorConfig::default()
            .with_window_size(window_size)
            .with_update_interval(update_interval),
    )
    .unwrap()
}

#[test]
fn steady_pattern_yields_one_window_below_very_high() {
    // RMSSD ~31ms sits in the Moderate band; SDNN ~18ms is VeryHigh. Fused: High.
    let pattern = [72.0, 76.0, 74.0, 76.0, 72.0, 74.0];
    let mut monitor = monitor(30, TimeDelta::zero());

    let assessments: Vec<_> = (0..30)
        .filter_map(|i| monitor.add_sample(pattern[i % pattern.len()], at(i)))
        .collect();

    assert_eq!(assessments.len(), 1);
    let assessment = &assessments[0];
    let mean_hr = assessment.hrv_metrics.mean_hr;
    assert!((mean_hr - 74.0).abs() < 0.5, "mean hr {mean_hr}");
    assert_eq!(assessment.stress_level, StressLevel::High);
    assert_eq!(assessment.timestamp, at(29));
}

#[test]
fn tight_random_band_around_74_bpm_is_very_high() {
    // 72..=76 bpm keeps successive RR differences under 50ms and SDNN well
    // under 30ms, so pNN50 drops out and both remaining metrics read high.
    let mut rng = rand::rng();
    let mut very_high = 0;
    for _ in 0..200 {
        let mut monitor = monitor(30, TimeDelta::zero());
        let assessments: Vec<_> = (0..30)
            .filter_map(|i| monitor.add_sample(rng.random_range(72.0..=76.0), at(i)))
            .collect();

        assert_eq!(assessments.len(), 1);
        let assessment = &assessments[0];
        let metrics = assessment.hrv_metrics;
        assert!((metrics.mean_hr - 74.0).abs() < 1.0, "mean hr {}", metrics.mean_hr);
        assert!(metrics.sdnn < 30.0, "sdnn {}", metrics.sdnn);
        assert_eq!(metrics.pnn50, 0.0);
        assert!(!assessment.reasoning.contains("pNN50"));
        assert!(assessment.stress_level.is_high(), "{assessment:?}");
        if assessment.stress_level == StressLevel::VeryHigh {
            very_high += 1;
        }
    }
    assert!(very_high >= 180, "VeryHigh in {very_high}/200 runs");
}

#[test]
fn rising_heart_rate_window_is_high_stress() {
    let mut monitor = monitor(60, TimeDelta::zero());

    let mut last = None;
    for i in 0..60 {
        if let Some(assessment) = monitor.add_sample(ramp(i, 60, 0.5, 0.5), at(i)) {
            last = Some(assessment);
        }
    }

    let last = last.expect("full window assessed");
    assert!(
        last.stress_level.is_high(),
        "expected High or VeryHigh, got {:?}",
        last
    );
}

#[test]
fn sustained_rise_fires_transitions_and_rising_trend() {
    let clock = StreamClock::new(at(0));
    let (change_tx, change_rx) = mpsc::channel();
    let (alert_tx, alert_rx) = mpsc::channel();

    let mut monitor = monitor(60, TimeDelta::minutes(1))
        .with_clock(clock.clone())
        .on_level_change(move |event: &LevelChange| {
            let _ = change_tx.send((event.previous, event.current));
        })
        .on_high_stress(move |event: &HighStressAlert| {
            let _ = alert_tx.send(event.assessment.timestamp);
        });

    // 1Hz for five minutes, HRV collapsing while heart rate climbs
    for i in 0..300 {
        clock.advance_to(at(i));
        monitor.add_sample(ramp(i, 300, 4.0, 0.3), at(i));
    }

    assert_eq!(monitor.history().len(), 5);
    let levels: Vec<_> = monitor.history().iter().map(|a| a.stress_level).collect();
    assert!(levels[0] <= StressLevel::Low, "{levels:?}");

    let changes: Vec<_> = change_rx.try_iter().collect();
    assert!(!changes.is_empty());
    assert!(changes.iter().all(|(previous, current)| previous < current));

    let current = monitor.current().unwrap();
    assert!(current.stress_level.is_high(), "{current:?}");
    assert_eq!(alert_rx.try_iter().last(), Some(current.timestamp));

    assert!(monitor.is_increasing(TimeDelta::minutes(30)));
    let average = monitor.average_score(TimeDelta::minutes(30)).unwrap();
    assert!(average > 40.0 && average < 90.0, "{average}");
}

#[test]
fn gate_holds_back_ready_windows() {
    let mut monitor = monitor(10, TimeDelta::minutes(1));
    let assessed: Vec<usize> = (0..130)
        .filter(|&i| monitor.add_sample(ramp(i, 130, 3.0, 3.0), at(i)).is_some())
        .collect();
    assert_eq!(assessed, vec![9, 69, 129]);
}

#[test]
fn reset_returns_to_idle() {
    let mut monitor = monitor(20, TimeDelta::zero());
    for i in 0..45 {
        monitor.add_sample(ramp(i, 45, 2.0, 2.0), at(i));
    }
    assert!(monitor.current().is_some());

    monitor.reset();
    assert!(monitor.current().is_none());
    assert_eq!(monitor.buffered(), 0);
    assert!(monitor.history().is_empty());
    assert!(monitor.peek_hrv().is_none());

    // the first full window after a reset is assessed straight away
    for i in 100..119 {
        assert!(monitor.add_sample(72.0, at(i)).is_none());
    }
    assert!(monitor.add_sample(72.0, at(119)).is_some());
}

#[test]
fn assessments_serialize_for_transport() {
    let mut monitor = monitor(30, TimeDelta::zero());
    let assessment = (0..30)
        .filter_map(|i| monitor.add_sample(ramp(i, 30, 2.0, 2.0), at(i)))
        .last()
        .unwrap();

    let value = serde_json::to_value(assessment.to_record()).unwrap();
    assert_eq!(value["stress_level"], assessment.stress_level.name());
    assert_eq!(value["stress_level_value"], assessment.stress_level.value());
    assert!(value["hrv_metrics"]["rmssd"].is_f64());
    assert_eq!(value["timestamp"], "2025-01-01T10:00:29");
}
