#[macro_use]
extern crate log;

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::PathBuf,
};

use anyhow::Context;
use chrono::{Local, NaiveDateTime, TimeDelta};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use hrvmon::{
    HighStressAlert, LevelChange, LevelLabels, MonitorConfig, RealtimeMonitor, SampleUnit,
    StreamClock,
};
use serde_json::json;

mod host;
use host::Profile;

#[derive(Parser)]
pub struct HrvMonCli {
    /// Number of RR intervals per HRV window
    #[arg(env, long, default_value_t = 60)]
    pub window_size: usize,
    /// Minimum seconds between two assessments
    #[arg(env, long, default_value_t = 60)]
    pub update_interval: i64,
    #[arg(env, long, default_value_t = 100)]
    pub history_capacity: usize,
    #[arg(env, long, default_value_t = 0.2)]
    pub outlier_threshold: f64,
    /// Unit of incoming values: `bpm` or `rr` (milliseconds)
    #[arg(env, long, default_value_t = SampleUnit::Bpm)]
    pub unit: SampleUnit,
    #[clap(subcommand)]
    pub subcommand: HrvMonCommand,
}

#[derive(Subcommand)]
pub enum HrvMonCommand {
    ///
    /// Monitor synthetic heart-rate streams, one monitor per subject
    ///
    Simulate {
        #[arg(long, value_enum, default_value_t = Profile::Rising)]
        profile: Profile,
        /// Samples per subject, one per second
        #[arg(long, default_value_t = 300)]
        samples: usize,
        #[arg(long, default_value_t = 1)]
        subjects: usize,
    },
    ///
    /// Monitor `value[,timestamp]` lines from a file or stdin
    ///
    Replay {
        /// Input file, stdin when omitted
        input: Option<PathBuf>,
    },
}

impl HrvMonCli {
    fn config(&self) -> anyhow::Result<MonitorConfig> {
        let update_interval = TimeDelta::try_seconds(self.update_interval)
            .context("update interval out of range")?;
        let config = MonitorConfig::default()
            .with_window_size(self.window_size)
            .with_update_interval(update_interval)
            .with_history_capacity(self.history_capacity)
            .with_outlier_threshold(self.outlier_threshold)
            .with_unit(self.unit);
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(error) = dotenv() {
        println!("{}", error);
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = HrvMonCli::parse();
    let config = cli.config()?;

    match cli.subcommand {
        HrvMonCommand::Simulate {
            profile,
            samples,
            subjects,
        } => {
            let start = Local::now().naive_local() - TimeDelta::seconds(samples as i64);
            let handles = (0..subjects)
                .map(|subject| {
                    let stream = profile
                        .samples(samples, subject as f64)
                        .into_iter()
                        .enumerate()
                        .map(|(i, bpm)| (bpm, start + TimeDelta::seconds(i as i64)))
                        .collect::<Vec<_>>();
                    tokio::task::spawn_blocking(move || run_subject(subject, config, stream))
                })
                .collect::<Vec<_>>();

            for handle in handles {
                let report = handle.await??;
                println!("{}", report);
            }
            Ok(())
        }
        HrvMonCommand::Replay { input } => {
            let reader: Box<dyn BufRead> = match input {
                Some(path) => Box::new(BufReader::new(
                    File::open(&path)
                        .with_context(|| format!("failed to open {}", path.display()))?,
                )),
                None => Box::new(io::stdin().lock()),
            };
            let stream = host::read_samples(reader, Local::now().naive_local())?;
            info!("Replaying {} samples", stream.len());

            let report = run_subject(0, config, stream)?;
            println!("{}", report);
            Ok(())
        }
    }
}

/// Runs one monitoring session over a finished stream, printing each
/// assessment as a JSON line. Returns the session report.
fn run_subject(
    subject: usize,
    config: MonitorConfig,
    stream: Vec<(f64, NaiveDateTime)>,
) -> anyhow::Result<serde_json::Value> {
    let start = stream
        .first()
        .map(|(_, time)| *time)
        .unwrap_or_else(|| Local::now().naive_local());
    let clock = StreamClock::new(start);

    let mut monitor = RealtimeMonitor::new(config)?
        .with_clock(clock.clone())
        .on_level_change(move |event: &LevelChange| {
            info!(
                "[subject {}] stress level {} -> {}",
                subject, event.previous, event.current
            );
        })
        .on_high_stress(move |event: &HighStressAlert| {
            warn!(
                "[subject {}] high stress alert at {}: {}",
                subject, event.assessment.timestamp, event.assessment.reasoning
            );
        });

    let mut session = monitor.start_session();
    for (value, time) in stream {
        clock.advance_to(time);
        if let Some(assessment) = session.add_sample(value, time) {
            let line = json!({ "subject": subject, "assessment": assessment.to_record() });
            println!("{}", line);
        }
    }
    let summary = session.end();

    let labels = LevelLabels::default();
    let current = monitor.current().map(|a| labels.label(a.stress_level));
    let trend_window = TimeDelta::minutes(RealtimeMonitor::DEFAULT_TREND_MINUTES);
    Ok(json!({
        "subject": subject,
        "summary": summary,
        "current_level": current,
        "increasing": monitor.is_increasing(trend_window),
        "recommendations": monitor.recommendations(),
    }))
}
