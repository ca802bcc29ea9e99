use std::io::BufRead;

use anyhow::{Context, anyhow};
use chrono::{NaiveDateTime, TimeDelta};
use clap::ValueEnum;

/// Synthetic heart-rate streams for `simulate`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Profile {
    /// 70 bpm with wide beat-to-beat variation
    Rest,
    /// 65 to 100 bpm while variation collapses
    Rising,
    /// 100 bpm with almost no variation
    Stressed,
}

impl Profile {
    /// Heart rate of sample `i` out of `n`, shifted by `offset` bpm.
    pub fn heart_rate(self, i: usize, n: usize, offset: f64) -> f64 {
        let sign = if i % 2 == 1 { 1.0 } else { -1.0 };
        let bpm = match self {
            Profile::Rest => 70.0 + sign * 4.0,
            Profile::Rising => {
                let f = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.0 };
                let jitter = 4.0 - 3.7 * f;
                65.0 + 35.0 * f + sign * jitter
            }
            Profile::Stressed => 100.0 + sign * 0.3,
        };
        bpm + offset
    }

    pub fn samples(self, n: usize, offset: f64) -> Vec<f64> {
        (0..n).map(|i| self.heart_rate(i, n, offset)).collect()
    }
}

/// Parses one `value[,timestamp]` line. Blank lines and `#` comments yield
/// `Ok(None)`.
pub fn parse_line(line: &str) -> anyhow::Result<Option<(f64, Option<NaiveDateTime>)>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut fields = line.split(',').map(str::trim);
    let value = fields
        .next()
        .ok_or_else(|| anyhow!("missing value"))?
        .parse::<f64>()
        .with_context(|| format!("invalid sample value in `{}`", line))?;

    let timestamp = match fields.next() {
        Some(field) if !field.is_empty() => Some(
            field
                .parse::<NaiveDateTime>()
                .with_context(|| format!("invalid timestamp `{}`", field))?,
        ),
        _ => None,
    };

    Ok(Some((value, timestamp)))
}

/// Reads a whole replay input. Samples without a timestamp are placed one
/// second after the previous sample, the first one at `start`.
pub fn read_samples(
    reader: impl BufRead,
    start: NaiveDateTime,
) -> anyhow::Result<Vec<(f64, NaiveDateTime)>> {
    let mut samples = Vec::new();
    let mut previous: Option<NaiveDateTime> = None;

    for (number, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", number + 1))?;
        let Some((value, timestamp)) =
            parse_line(&line).with_context(|| format!("line {}", number + 1))?
        else {
            continue;
        };

        let time = timestamp.unwrap_or_else(|| match previous {
            Some(previous) => previous + TimeDelta::seconds(1),
            None => start,
        });
        previous = Some(time);
        samples.push((value, time));
    }

    Ok(samples)
}
