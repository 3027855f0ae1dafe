//! Console, JSON and CSV output of a finished run.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::config::BenchConfig;
use crate::engine::{Mode, RunResult};
use crate::stats::LatencyStats;
use crate::Result;

#[derive(Debug, serde::Serialize)]
pub struct Report<'a> {
    pub device: &'a str,
    pub config: &'a BenchConfig,
    pub mode: Mode,
    pub repetitions: usize,
    pub total_s: f64,
    pub mean_ms: f64,
    pub stats: Option<LatencyStats>,
    pub samples: Option<&'a [f64]>,
}

impl<'a> Report<'a> {
    pub fn new(device: &'a str, config: &'a BenchConfig, result: &'a RunResult) -> Self {
        let samples = result.samples();
        Self {
            device,
            config,
            mode: result.mode(),
            repetitions: result.repetitions(),
            total_s: result.total(),
            mean_ms: result.mean_ms(),
            stats: samples.and_then(LatencyStats::from_samples),
            samples,
        }
    }
}

pub fn summary_line(result: &RunResult) -> String {
    format!(
        "REPS: {}, total time: {:.3}s (avg {:.3} ms per matmul)",
        result.repetitions(),
        result.total(),
        result.mean_ms()
    )
}

pub fn stats_line(stats: &LatencyStats) -> String {
    const MS: f64 = 1e3;
    format!(
        "latency (ms): min {:.3}, p50 {:.3}, p90 {:.3}, p99 {:.3}, max {:.3}, std {:.3}",
        stats.min * MS,
        stats.p50 * MS,
        stats.p90 * MS,
        stats.p99 * MS,
        stats.max * MS,
        stats.std * MS
    )
}

pub fn print_report(result: &RunResult) {
    println!("{}", summary_line(result));
    if let Some(stats) = result.samples().and_then(LatencyStats::from_samples) {
        println!("{}", stats_line(&stats));
    }
}

pub fn save_json(report: &Report<'_>, path: impl AsRef<Path>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush()?;
    Ok(())
}

/// Writes one `iteration,latency_s` row per sample, aggregate runs only get
/// the header.
pub fn save_csv(result: &RunResult, path: impl AsRef<Path>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    writeln!(writer, "iteration,latency_s")?;
    for (iteration, latency) in result.samples().unwrap_or_default().iter().enumerate() {
        writeln!(writer, "{iteration},{latency}")?;
    }
    writer.flush()?;
    Ok(())
}
