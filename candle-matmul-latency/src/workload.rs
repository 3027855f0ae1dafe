//! Provisioning of the fixed operands shared by every timed iteration.
use candle::DType;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::device::Accelerator;
use crate::{Error, Result};

/// Numeric precision of the provisioned matrices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    F32,
    F16,
    Bf16,
    F64,
}

impl Precision {
    pub fn dtype(&self) -> DType {
        match self {
            Self::F32 => DType::F32,
            Self::F16 => DType::F16,
            Self::Bf16 => DType::BF16,
            Self::F64 => DType::F64,
        }
    }

    pub fn size_in_bytes(&self) -> usize {
        self.dtype().size_in_bytes()
    }
}

impl std::fmt::Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.dtype())
    }
}

/// Allocates one `n x n` random matrix resident on `accel`.
pub fn allocate_matrix<A: Accelerator>(
    accel: &A,
    n: usize,
    precision: Precision,
    rng: &mut dyn RngCore,
) -> Result<A::Matrix> {
    let allocation_error = |source| Error::Allocation {
        n,
        precision,
        device: accel.label().to_string(),
        source,
    };
    let bytes = n
        .checked_mul(n)
        .and_then(|elems| elems.checked_mul(precision.size_in_bytes()))
        .ok_or_else(|| {
            allocation_error(candle::Error::Msg(format!(
                "{n}x{n} {precision} buffer size overflows usize"
            )))
        })?;
    tracing::debug!(n, %precision, bytes, device = accel.label(), "allocating matrix");
    accel
        .allocate_matrix(n, precision.dtype(), rng)
        .map_err(allocation_error)
}

/// The two operands of the benchmarked multiply.
///
/// Both matrices are created once and only ever handed out by shared
/// reference, so every iteration of a run multiplies the same contents.
#[derive(Debug)]
pub struct Workload<M> {
    lhs: M,
    rhs: M,
    size: usize,
    precision: Precision,
}

impl<M> Workload<M> {
    /// Provisions the operands, seeding the generator with `seed` when given
    /// and with OS entropy otherwise.
    pub fn provision<A>(
        accel: &A,
        size: usize,
        precision: Precision,
        seed: Option<u64>,
    ) -> Result<Self>
    where
        A: Accelerator<Matrix = M>,
    {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::provision_with_rng(accel, size, precision, &mut rng)
    }

    pub fn provision_with_rng<A>(
        accel: &A,
        size: usize,
        precision: Precision,
        rng: &mut dyn RngCore,
    ) -> Result<Self>
    where
        A: Accelerator<Matrix = M>,
    {
        if size == 0 {
            return Err(Error::InvalidConfig(
                "matrix size must be positive".to_string(),
            ));
        }
        let lhs = allocate_matrix(accel, size, precision, rng)?;
        let rhs = allocate_matrix(accel, size, precision, rng)?;
        Ok(Self {
            lhs,
            rhs,
            size,
            precision,
        })
    }

    pub fn lhs(&self) -> &M {
        &self.lhs
    }

    pub fn rhs(&self) -> &M {
        &self.rhs
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }
}
