use crate::device::Backend;
use crate::engine::Phase;
use crate::workload::Precision;

/// Main library error type.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The requested device does not exist or its runtime failed to initialize.
    #[error("device {backend}:{ordinal} is unavailable")]
    DeviceUnavailable {
        backend: Backend,
        ordinal: usize,
        #[source]
        source: candle::Error,
    },

    /// The device could not hold an `n x n` buffer of the requested precision.
    #[error("cannot allocate a {n}x{n} {precision} matrix on {device}")]
    Allocation {
        n: usize,
        precision: Precision,
        device: String,
        #[source]
        source: candle::Error,
    },

    /// A queued operation or a synchronization failed while running.
    #[error("device {phase} failed{}", at_iteration(.iteration))]
    DeviceExecution {
        phase: Phase,
        iteration: Option<usize>,
        #[source]
        source: candle::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn at_iteration(iteration: &Option<usize>) -> String {
    match iteration {
        Some(i) => format!(" at iteration {i}"),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execution_error_mentions_iteration() {
        let err = Error::DeviceExecution {
            phase: Phase::Synchronize,
            iteration: Some(5),
            source: candle::Error::Msg("device lost".to_string()),
        };
        assert_eq!(err.to_string(), "device synchronize failed at iteration 5");

        let err = Error::DeviceExecution {
            phase: Phase::Warmup,
            iteration: None,
            source: candle::Error::Msg("device lost".to_string()),
        };
        assert_eq!(err.to_string(), "device warmup failed");
    }
}
