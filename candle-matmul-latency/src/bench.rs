//! End to end runs: select, provision, time.
use crate::config::BenchConfig;
use crate::device::{select_device, Accelerator};
use crate::engine::{self, RunResult};
use crate::workload::Workload;
use crate::Result;

/// A finished run together with the device it ran on.
#[derive(Clone, Debug)]
pub struct Outcome {
    pub device: String,
    pub result: RunResult,
}

fn execute<A: Accelerator>(accel: &A, config: &BenchConfig) -> Result<RunResult> {
    let workload = Workload::provision(accel, config.size, config.precision, config.seed)?;
    engine::run(accel, &workload, config.repetitions, config.mode)
}

/// Provisions the workload on `accel` and times it as `config` describes.
pub fn run_on<A: Accelerator>(accel: &A, config: &BenchConfig) -> Result<RunResult> {
    config.validate()?;
    execute(accel, config)
}

/// Validates `config` before touching any device, then selects it and runs.
pub fn run_benchmark(config: &BenchConfig) -> Result<Outcome> {
    config.validate()?;
    let ctx = select_device(config.backend, config.ordinal)?;
    tracing::info!(device = ctx.label(), "running matmul benchmark");
    let result = execute(&ctx, config)?;
    Ok(Outcome {
        device: ctx.label().to_string(),
        result,
    })
}
