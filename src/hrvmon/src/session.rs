use std::collections::BTreeMap;

use chrono::{NaiveDateTime, TimeDelta};
use hrvmon_algos::helpers::math::round_float;
use hrvmon_types::{StressAssessment, StressLevel};
use serde::Serialize;

use crate::{RealtimeMonitor, config::duration_secs};

/// One monitoring session over a borrowed monitor: start, ingest, end.
///
/// Starting a session resets the monitor. [`end`](Self::end) releases the
/// monitor and returns the summary of what was assessed in between.
#[must_use = "a session should be ended to obtain its summary"]
pub struct MonitoringSession<'m> {
    monitor: &'m mut RealtimeMonitor,
    started_at: NaiveDateTime,
}

/// Read-only digest of a finished session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub started_at: NaiveDateTime,
    pub ended_at: NaiveDateTime,
    #[serde(rename = "duration_secs", with = "duration_secs")]
    pub duration: TimeDelta,
    pub assessment_count: usize,
    pub average_score: Option<f64>,
    pub min_score: Option<f64>,
    pub max_score: Option<f64>,
    pub level_distribution: BTreeMap<StressLevel, usize>,
    /// Assessments that landed on `High` or `VeryHigh`.
    pub high_stress_count: usize,
}

impl RealtimeMonitor {
    pub fn start_session(&mut self) -> MonitoringSession<'_> {
        self.reset();
        let started_at = self.now();
        info!("Monitoring session started at {}", started_at);
        MonitoringSession {
            monitor: self,
            started_at,
        }
    }
}

impl MonitoringSession<'_> {
    pub fn add_sample(&mut self, value: f64, timestamp: NaiveDateTime) -> Option<StressAssessment> {
        self.monitor.add_sample(value, timestamp)
    }

    pub fn add_sample_now(&mut self, value: f64) -> Option<StressAssessment> {
        self.monitor.add_sample_now(value)
    }

    pub fn monitor(&self) -> &RealtimeMonitor {
        self.monitor
    }

    pub fn started_at(&self) -> NaiveDateTime {
        self.started_at
    }

    pub fn end(self) -> SessionSummary {
        let ended_at = self.monitor.now();
        let summary =
            SessionSummary::from_assessments(self.started_at, ended_at, self.monitor.history());
        info!(
            "Monitoring session ended after {}s with {} assessments",
            summary.duration.num_seconds(),
            summary.assessment_count
        );
        summary
    }
}

impl SessionSummary {
    pub fn from_assessments<'a>(
        started_at: NaiveDateTime,
        ended_at: NaiveDateTime,
        assessments: impl IntoIterator<Item = &'a StressAssessment>,
    ) -> Self {
        let mut level_distribution: BTreeMap<StressLevel, usize> =
            StressLevel::ALL.into_iter().map(|level| (level, 0)).collect();
        let mut scores = Vec::new();

        for assessment in assessments {
            *level_distribution
                .entry(assessment.stress_level)
                .or_default() += 1;
            scores.push(assessment.stress_score);
        }

        let high_stress_count = level_distribution
            .iter()
            .filter(|(level, _)| level.is_high())
            .map(|(_, count)| count)
            .sum();

        let average_score = (!scores.is_empty())
            .then(|| round_float(scores.iter().sum::<f64>() / scores.len() as f64));
        let min_score = scores.iter().copied().reduce(f64::min).map(round_float);
        let max_score = scores.iter().copied().reduce(f64::max).map(round_float);

        Self {
            started_at,
            ended_at,
            duration: ended_at - started_at,
            assessment_count: scores.len(),
            average_score,
            min_score,
            max_score,
            level_distribution,
            high_stress_count,
        }
    }
}
