//! Random tensor initialization.
//!
//! All sampling goes through an explicit [`TensorRng`] handle so callers
//! control seeding and reproducibility; there is no hidden global state.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::storage::Storage;
use crate::tensor::from_storage;
use crate::{Device, Error, Result, Shape, Tensor};

/// A seedable random source for tensor initialization.
pub struct TensorRng(StdRng);

impl TensorRng {
    /// A generator with a fixed seed; the same seed replays the same
    /// sequence of tensors.
    pub fn seed(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    /// A generator seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }
}

fn sample<T, F>(n: usize, mut f: F) -> Result<Vec<T>>
where
    F: FnMut() -> T,
{
    let mut out: Vec<T> = Vec::new();
    out.try_reserve_exact(n).map_err(|_| Error::Allocation {
        bytes: n * std::mem::size_of::<T>(),
    })?;
    out.extend((0..n).map(|_| f()));
    Ok(out)
}

impl Tensor {
    /// Uniform samples in `[0, 1)`, float32.
    pub fn rand<S: Into<Shape>>(shape: S, device: Device, rng: &mut TensorRng) -> Result<Tensor> {
        let shape = shape.into();
        let data = sample(shape.num_elements(), || rng.0.gen::<f32>())?;
        Ok(from_storage(Storage::F32(data), shape, device))
    }

    /// Standard normal samples (mean 0, variance 1), float32.
    pub fn randn<S: Into<Shape>>(shape: S, device: Device, rng: &mut TensorRng) -> Result<Tensor> {
        let shape = shape.into();
        let data = sample(shape.num_elements(), || rng.0.sample(StandardNormal))?;
        Ok(from_storage(Storage::F32(data), shape, device))
    }

    /// Uniform integer samples in `[low, high)`, int32.
    pub fn randint<S: Into<Shape>>(
        low: i32,
        high: i32,
        shape: S,
        device: Device,
        rng: &mut TensorRng,
    ) -> Result<Tensor> {
        if low >= high {
            return Err(Error::Degenerate {
                op: "randint",
                reason: format!("empty range [{low}, {high})"),
            });
        }
        let shape = shape.into();
        let data = sample(shape.num_elements(), || rng.0.gen_range(low..high))?;
        Ok(from_storage(Storage::I32(data), shape, device))
    }
}
