use std::path::PathBuf;

use crate::device::Backend;
use crate::engine::Mode;
use crate::workload::Precision;
use crate::{Error, Result};

pub const DEFAULT_SIZE: usize = 4096;
pub const DEFAULT_REPETITIONS: usize = 4000;

/// Everything a run needs, resolved before the device is touched.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct BenchConfig {
    pub backend: Backend,
    pub ordinal: usize,
    pub size: usize,
    pub repetitions: usize,
    pub mode: Mode,
    pub precision: Precision,
    pub seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot: Option<PathBuf>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Cuda,
            ordinal: 0,
            size: DEFAULT_SIZE,
            repetitions: DEFAULT_REPETITIONS,
            mode: Mode::PerSample,
            precision: Precision::F32,
            seed: None,
            json: None,
            csv: None,
            plot: None,
        }
    }
}

impl BenchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(Error::InvalidConfig(
                "matrix size must be positive".to_string(),
            ));
        }
        if self.repetitions == 0 {
            return Err(Error::InvalidConfig(
                "repetitions must be positive".to_string(),
            ));
        }
        if self.plot.is_some() && self.mode == Mode::Aggregate {
            return Err(Error::InvalidConfig(
                "plotting needs per-sample latencies, use --mode per-sample".to_string(),
            ));
        }
        Ok(())
    }
}
