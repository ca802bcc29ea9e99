//! Display labels for [`StressLevel`], kept apart from the enum so hosts
//! can plug in their own localisation.

use crate::StressLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelLabels {
    labels: [&'static str; 5],
}

impl LevelLabels {
    pub const ENGLISH: LevelLabels = LevelLabels {
        labels: ["Very low", "Low", "Moderate", "High", "Very high"],
    };

    /// Labels are given in ordinal order, `VeryLow` first.
    pub const fn new(labels: [&'static str; 5]) -> Self {
        Self { labels }
    }

    pub fn label(&self, level: StressLevel) -> &'static str {
        self.labels[usize::from(level.value() - 1)]
    }
}

impl Default for LevelLabels {
    fn default() -> Self {
        Self::ENGLISH
    }
}
