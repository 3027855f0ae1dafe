//! Device selection and the execution seam used by the timing engine.
use candle::{DType, Device, Tensor};
use rand::RngCore;
use rand_distr::{Distribution, Normal};

use crate::{Error, Result};

/// The family of device a run targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Cpu,
    Cuda,
    Metal,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Cpu => "cpu",
            Self::Cuda => "cuda",
            Self::Metal => "metal",
        };
        f.write_str(name)
    }
}

/// Operations the timing engine issues against a device.
///
/// `matmul` only has to enqueue work: on asynchronous devices it may return
/// before the multiply completes. `synchronize` blocks until everything issued
/// so far on this device has finished. Errors are reported as raw candle
/// errors, the caller decides which part of the run they belong to.
pub trait Accelerator {
    type Matrix;

    /// Human readable name of the device, e.g. `cuda:0`.
    fn label(&self) -> &str;

    /// Allocates an `n x n` matrix of standard normal values drawn from `rng`.
    fn allocate_matrix(
        &self,
        n: usize,
        dtype: DType,
        rng: &mut dyn RngCore,
    ) -> candle::Result<Self::Matrix>;

    fn matmul(&self, lhs: &Self::Matrix, rhs: &Self::Matrix) -> candle::Result<()>;

    fn synchronize(&self) -> candle::Result<()>;
}

/// An explicitly passed device context, there is no process-wide current device.
#[derive(Debug, Clone)]
pub struct DeviceContext {
    device: Device,
    backend: Backend,
    ordinal: usize,
    label: String,
}

/// Resolves `backend:ordinal` to a usable device.
///
/// Any failure to construct the device, including a build without support for
/// the backend, is reported as [`Error::DeviceUnavailable`].
pub fn select_device(backend: Backend, ordinal: usize) -> Result<DeviceContext> {
    let device = match backend {
        Backend::Cpu => Ok(Device::Cpu),
        Backend::Cuda => Device::new_cuda(ordinal),
        Backend::Metal => Device::new_metal(ordinal),
    }
    .map_err(|source| Error::DeviceUnavailable {
        backend,
        ordinal,
        source,
    })?;
    let label = match backend {
        Backend::Cpu => backend.to_string(),
        Backend::Cuda | Backend::Metal => format!("{backend}:{ordinal}"),
    };
    tracing::debug!(device = %label, "selected device");
    Ok(DeviceContext {
        device,
        backend,
        ordinal,
        label,
    })
}

impl DeviceContext {
    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }
}

// Reserved up front: a buffer the host cannot back is an error, not an abort.
fn sample_host_buffer<T, D: Distribution<T>>(
    len: usize,
    dist: &D,
    rng: &mut dyn RngCore,
) -> candle::Result<Vec<T>> {
    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(candle::Error::wrap)?;
    data.extend((0..len).map(|_| dist.sample(&mut *rng)));
    Ok(data)
}

impl Accelerator for DeviceContext {
    type Matrix = Tensor;

    fn label(&self) -> &str {
        &self.label
    }

    fn allocate_matrix(
        &self,
        n: usize,
        dtype: DType,
        rng: &mut dyn RngCore,
    ) -> candle::Result<Tensor> {
        let len = n
            .checked_mul(n)
            .ok_or_else(|| candle::Error::Msg(format!("{n}x{n} element count overflows")))?;
        match dtype {
            DType::F64 => {
                let normal = Normal::new(0f64, 1f64).map_err(candle::Error::wrap)?;
                let data = sample_host_buffer(len, &normal, rng)?;
                Tensor::from_vec(data, (n, n), &self.device)
            }
            _ => {
                let normal = Normal::new(0f32, 1f32).map_err(candle::Error::wrap)?;
                let data = sample_host_buffer(len, &normal, rng)?;
                let matrix = Tensor::from_vec(data, (n, n), &self.device)?;
                if dtype == DType::F32 {
                    Ok(matrix)
                } else {
                    matrix.to_dtype(dtype)
                }
            }
        }
    }

    fn matmul(&self, lhs: &Tensor, rhs: &Tensor) -> candle::Result<()> {
        let product = lhs.matmul(rhs)?;
        std::hint::black_box(product);
        Ok(())
    }

    fn synchronize(&self) -> candle::Result<()> {
        self.device.synchronize()
    }
}
