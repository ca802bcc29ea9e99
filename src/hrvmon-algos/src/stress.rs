use std::fmt::Display;

use hrvmon_types::{HrvMetrics, StressAssessment, StressLevel};
use serde::{Deserialize, Serialize};

use crate::helpers::math::variance;

/// Which metrics take part in fusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub use_rmssd: bool,
    pub use_sdnn: bool,
    pub use_pnn50: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            use_rmssd: true,
            use_sdnn: true,
            use_pnn50: true,
        }
    }
}

impl ClassifierConfig {
    pub fn any_enabled(&self) -> bool {
        self.use_rmssd || self.use_sdnn || self.use_pnn50
    }

    fn is_enabled(&self, metric: HrvMetric) -> bool {
        match metric {
            HrvMetric::Rmssd => self.use_rmssd,
            HrvMetric::Sdnn => self.use_sdnn,
            HrvMetric::Pnn50 => self.use_pnn50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HrvMetric {
    Rmssd,
    Sdnn,
    Pnn50,
}

/// Lower edges of the High, Moderate, Low and VeryLow bands, plus the slope
/// of the open-ended VeryLow band.
struct Bands {
    edges: [f64; 4],
    tail_slope: f64,
}

impl HrvMetric {
    pub const ALL: [HrvMetric; 3] = [HrvMetric::Rmssd, HrvMetric::Sdnn, HrvMetric::Pnn50];

    pub fn weight(self) -> f64 {
        match self {
            HrvMetric::Rmssd => 0.4,
            HrvMetric::Sdnn => 0.35,
            HrvMetric::Pnn50 => 0.25,
        }
    }

    pub fn value(self, metrics: &HrvMetrics) -> f64 {
        match self {
            HrvMetric::Rmssd => metrics.rmssd,
            HrvMetric::Sdnn => metrics.sdnn,
            HrvMetric::Pnn50 => metrics.pnn50,
        }
    }

    fn unit(self) -> &'static str {
        match self {
            HrvMetric::Rmssd | HrvMetric::Sdnn => "ms",
            HrvMetric::Pnn50 => "%",
        }
    }

    fn bands(self) -> Bands {
        match self {
            HrvMetric::Rmssd => Bands {
                edges: [15.0, 25.0, 35.0, 50.0],
                tail_slope: 0.2,
            },
            HrvMetric::Sdnn => Bands {
                edges: [30.0, 50.0, 70.0, 100.0],
                tail_slope: 0.15,
            },
            HrvMetric::Pnn50 => Bands {
                edges: [1.0, 3.0, 7.0, 15.0],
                tail_slope: 1.0,
            },
        }
    }

    /// Scores one value on `[0, 100]`, lower variability scoring higher.
    ///
    /// Bands are closed-open: `[edge_i, edge_i+1)`. Within a band the score is
    /// interpolated linearly from its upper to its lower anchor; the open
    /// VeryLow band decays from 30 and floors at 0.
    pub fn score(self, value: f64) -> (StressLevel, f64) {
        let Bands { edges, tail_slope } = self.bands();
        let lerp =
            |lo: f64, hi: f64, from: f64, to: f64| from + (value - lo) / (hi - lo) * (to - from);

        if value < edges[0] {
            (StressLevel::VeryHigh, 90.0)
        } else if value < edges[1] {
            (StressLevel::High, lerp(edges[0], edges[1], 90.0, 70.0))
        } else if value < edges[2] {
            (StressLevel::Moderate, lerp(edges[1], edges[2], 70.0, 50.0))
        } else if value < edges[3] {
            (StressLevel::Low, lerp(edges[2], edges[3], 50.0, 30.0))
        } else {
            let score = (30.0 - (value - edges[3]) * tail_slope).max(0.0);
            (StressLevel::VeryLow, score)
        }
    }
}

impl Display for HrvMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HrvMetric::Rmssd => f.write_str("RMSSD"),
            HrvMetric::Sdnn => f.write_str("SDNN"),
            HrvMetric::Pnn50 => f.write_str("pNN50"),
        }
    }
}

/// Maps an HRV snapshot to a stress level, score and confidence.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StressClassifier {
    pub config: ClassifierConfig,
}

struct MetricScore {
    metric: HrvMetric,
    value: f64,
    level: StressLevel,
    score: f64,
}

impl StressClassifier {
    pub const INSUFFICIENT_DATA: &'static str = "insufficient data";

    /// Confidence when only one metric contributed.
    const SINGLE_METRIC_CONFIDENCE: f64 = 0.7;
    const MIN_CONFIDENCE: f64 = 0.5;

    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Final level from the fused score: 80/60/40/20 thresholds.
    pub fn level_for_score(score: f64) -> StressLevel {
        if score >= 80.0 {
            StressLevel::VeryHigh
        } else if score >= 60.0 {
            StressLevel::High
        } else if score >= 40.0 {
            StressLevel::Moderate
        } else if score >= 20.0 {
            StressLevel::Low
        } else {
            StressLevel::VeryLow
        }
    }

    pub fn classify(&self, metrics: &HrvMetrics) -> StressAssessment {
        let scores: Vec<MetricScore> = HrvMetric::ALL
            .into_iter()
            .filter(|&metric| self.config.is_enabled(metric))
            .filter_map(|metric| {
                let value = metric.value(metrics);
                (value > 0.0).then(|| {
                    let (level, score) = metric.score(value);
                    MetricScore {
                        metric,
                        value,
                        level,
                        score,
                    }
                })
            })
            .collect();

        if scores.is_empty() {
            return StressAssessment {
                stress_level: StressLevel::Moderate,
                stress_score: 50.0,
                confidence: 0.0,
                hrv_metrics: *metrics,
                reasoning: Self::INSUFFICIENT_DATA.to_string(),
                timestamp: metrics.timestamp,
            };
        }

        let total_weight: f64 = scores.iter().map(|s| s.metric.weight()).sum();
        let stress_score = (scores
            .iter()
            .map(|s| s.metric.weight() * s.score)
            .sum::<f64>()
            / total_weight)
            .clamp(0.0, 100.0);

        StressAssessment {
            stress_level: Self::level_for_score(stress_score),
            stress_score,
            confidence: Self::confidence(&scores),
            hrv_metrics: *metrics,
            reasoning: Self::reasoning(&scores),
            timestamp: metrics.timestamp,
        }
    }

    /// Agreement between per-metric levels: `1 - var/4`, floored at 0.5.
    fn confidence(scores: &[MetricScore]) -> f64 {
        if scores.len() < 2 {
            return Self::SINGLE_METRIC_CONFIDENCE;
        }
        let levels: Vec<f64> = scores.iter().map(|s| f64::from(s.level.value())).collect();
        (1.0 - variance(&levels) / 4.0).clamp(Self::MIN_CONFIDENCE, 1.0)
    }

    fn reasoning(scores: &[MetricScore]) -> String {
        scores
            .iter()
            .map(|s| format!("{} {:.2}{} ({})", s.metric, s.value, s.metric.unit(), s.level))
            .collect::<Vec<_>>()
            .join("; ")
    }
}
