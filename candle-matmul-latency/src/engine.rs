//! The timed execution loop.
use std::time::Instant;

use crate::device::Accelerator;
use crate::workload::Workload;
use crate::{Error, Result};

/// Timing policy for a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Time all repetitions as one unsynchronized batch.
    Aggregate,
    /// Synchronize around every repetition and keep each latency.
    PerSample,
}

/// The step of a run during which a device call failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Warmup,
    Dispatch,
    Synchronize,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Warmup => "warmup",
            Self::Dispatch => "dispatch",
            Self::Synchronize => "synchronize",
        };
        f.write_str(name)
    }
}

/// Outcome of a completed run, durations are in seconds.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum RunResult {
    Aggregate { repetitions: usize, elapsed: f64 },
    PerSample { samples: Vec<f64>, total: f64 },
}

impl RunResult {
    pub fn mode(&self) -> Mode {
        match self {
            Self::Aggregate { .. } => Mode::Aggregate,
            Self::PerSample { .. } => Mode::PerSample,
        }
    }

    pub fn repetitions(&self) -> usize {
        match self {
            Self::Aggregate { repetitions, .. } => *repetitions,
            Self::PerSample { samples, .. } => samples.len(),
        }
    }

    /// Total measured time in seconds.
    pub fn total(&self) -> f64 {
        match self {
            Self::Aggregate { elapsed, .. } => *elapsed,
            Self::PerSample { total, .. } => *total,
        }
    }

    /// Mean time per multiply in milliseconds, zero for an empty result.
    pub fn mean_ms(&self) -> f64 {
        match self.repetitions() {
            0 => 0.,
            reps => self.total() / reps as f64 * 1000.,
        }
    }

    /// The per-iteration latencies in iteration order, per-sample runs only.
    pub fn samples(&self) -> Option<&[f64]> {
        match self {
            Self::Aggregate { .. } => None,
            Self::PerSample { samples, .. } => Some(samples),
        }
    }
}

fn sync<A: Accelerator>(accel: &A, phase: Phase, iteration: Option<usize>) -> Result<()> {
    accel.synchronize().map_err(|source| Error::DeviceExecution {
        phase,
        iteration,
        source,
    })
}

fn dispatch<A: Accelerator>(
    accel: &A,
    workload: &Workload<A::Matrix>,
    phase: Phase,
    iteration: Option<usize>,
) -> Result<()> {
    accel
        .matmul(workload.lhs(), workload.rhs())
        .map_err(|source| Error::DeviceExecution {
            phase,
            iteration,
            source,
        })
}

/// Runs one untimed multiply and waits for the device to drain.
pub fn warmup<A: Accelerator>(accel: &A, workload: &Workload<A::Matrix>) -> Result<()> {
    dispatch(accel, workload, Phase::Warmup, None)?;
    sync(accel, Phase::Warmup, None)
}

/// Warms up then times `repetitions` multiplies of the workload operands.
///
/// Any device failure aborts the run, samples collected up to that point are
/// dropped with it.
pub fn run<A: Accelerator>(
    accel: &A,
    workload: &Workload<A::Matrix>,
    repetitions: usize,
    mode: Mode,
) -> Result<RunResult> {
    if repetitions == 0 {
        return Err(Error::InvalidConfig(
            "repetitions must be positive".to_string(),
        ));
    }
    let _span = tracing::info_span!("run", device = accel.label(), ?mode, repetitions).entered();

    warmup(accel, workload)?;
    tracing::debug!("warmup done");

    let result = match mode {
        Mode::Aggregate => {
            sync(accel, Phase::Synchronize, None)?;
            let start = Instant::now();
            for iteration in 0..repetitions {
                dispatch(accel, workload, Phase::Dispatch, Some(iteration))?;
            }
            sync(accel, Phase::Synchronize, None)?;
            RunResult::Aggregate {
                repetitions,
                elapsed: start.elapsed().as_secs_f64(),
            }
        }
        Mode::PerSample => {
            let mut samples = Vec::with_capacity(repetitions);
            for iteration in 0..repetitions {
                sync(accel, Phase::Synchronize, Some(iteration))?;
                let start = Instant::now();
                dispatch(accel, workload, Phase::Dispatch, Some(iteration))?;
                sync(accel, Phase::Synchronize, Some(iteration))?;
                samples.push(start.elapsed().as_secs_f64());
            }
            let total = samples.iter().sum();
            RunResult::PerSample { samples, total }
        }
    };
    tracing::info!(
        total_s = result.total(),
        mean_ms = result.mean_ms(),
        "run complete"
    );
    Ok(result)
}
