use std::collections::VecDeque;

use chrono::NaiveDateTime;
use hrvmon_types::{HrvMetrics, SampleUnit};

use crate::{HrvCalculator, rr::heart_rate_to_rr};

/// Fixed-capacity FIFO of the most recent RR intervals.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    window_size: usize,
    unit: SampleUnit,
    calculator: HrvCalculator,
    intervals: VecDeque<f64>,
    last_time: Option<NaiveDateTime>,
}

impl RollingWindow {
    pub const DEFAULT_WINDOW_SIZE: usize = 60;

    /// `peek` answers once this many intervals (or the full window, if
    /// smaller) are buffered.
    pub const MIN_PEEK_LEN: usize = 30;

    pub fn new(window_size: usize, unit: SampleUnit) -> Self {
        Self::with_calculator(window_size, unit, HrvCalculator::default())
    }

    pub fn with_calculator(
        window_size: usize,
        unit: SampleUnit,
        calculator: HrvCalculator,
    ) -> Self {
        let window_size = window_size.max(1);
        Self {
            window_size,
            unit,
            calculator,
            intervals: VecDeque::with_capacity(window_size + 1),
            last_time: None,
        }
    }

    /// Pushes one raw value and returns fresh metrics when the window holds
    /// exactly `window_size` intervals after eviction.
    ///
    /// Non-positive and non-finite values are dropped without touching the
    /// window.
    pub fn add(&mut self, value: f64, time: NaiveDateTime) -> Option<HrvMetrics> {
        let rr = match self.unit {
            SampleUnit::Bpm => heart_rate_to_rr(value)?,
            SampleUnit::RrMillis if value.is_finite() && value > 0.0 => value,
            SampleUnit::RrMillis => return None,
        };

        self.intervals.push_back(rr);
        while self.intervals.len() > self.window_size {
            self.intervals.pop_front();
        }
        self.last_time = Some(time);

        (self.intervals.len() == self.window_size).then(|| self.compute(time))
    }

    /// Partial-window metrics without mutating the buffer.
    pub fn peek(&self) -> Option<HrvMetrics> {
        let time = self.last_time?;
        (self.intervals.len() >= Self::MIN_PEEK_LEN.min(self.window_size))
            .then(|| self.compute(time))
    }

    pub fn reset(&mut self) {
        self.intervals.clear();
        self.last_time = None;
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn intervals(&self) -> impl Iterator<Item = f64> + '_ {
        self.intervals.iter().copied()
    }

    fn compute(&self, time: NaiveDateTime) -> HrvMetrics {
        let (front, back) = self.intervals.as_slices();
        if back.is_empty() {
            self.calculator.calculate(front, time)
        } else {
            let rr: Vec<f64> = self.intervals.iter().copied().collect();
            self.calculator.calculate(&rr, time)
        }
    }
}

impl Default for RollingWindow {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WINDOW_SIZE, SampleUnit::Bpm)
    }
}
