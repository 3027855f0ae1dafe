//! Steady-state matmul latency harness
//!
//! Two square matrices are provisioned once on a device, a single warm-up
//! multiply absorbs one-time setup costs, then the same multiply is executed
//! repeatedly while the host clock measures it between device synchronization
//! points.
//!
//! ```rust,no_run
//! use candle_matmul_latency::{engine, select_device, Backend, Mode, Precision, Workload};
//! # fn main() -> candle_matmul_latency::Result<()> {
//! let ctx = select_device(Backend::Cuda, 0)?;
//! let workload = Workload::provision(&ctx, 4096, Precision::F32, Some(42))?;
//! let result = engine::run(&ctx, &workload, 10, Mode::PerSample)?;
//! println!("{}", candle_matmul_latency::report::summary_line(&result));
//! # Ok(())}
//! ```
//!
//! ## Timing modes
//!
//! - [`Mode::Aggregate`] enqueues every multiply back-to-back and synchronizes
//!   once at each end, which keeps the device queue full.
//! - [`Mode::PerSample`] drains the device around each multiply and records one
//!   latency sample per iteration, exposing jitter at the cost of an extra
//!   barrier per call.

pub mod bench;
pub mod config;
pub mod device;
pub mod engine;
mod error;
pub mod plot;
pub mod report;
pub mod stats;
pub mod workload;

pub use bench::{run_benchmark, Outcome};
pub use config::BenchConfig;
pub use device::{select_device, Accelerator, Backend, DeviceContext};
pub use engine::{Mode, Phase, RunResult};
pub use error::{Error, Result};
pub use stats::LatencyStats;
pub use workload::{allocate_matrix, Precision, Workload};
