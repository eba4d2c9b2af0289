//! Linear algebra: dot product and matrix multiplication.
//!
//! Float matmul dispatches to the `gemm` microkernels with rayon
//! parallelism; integer matmul falls back to a blocked-free naive loop.
//! Factorization routines (det, inv, svd, eig, solve, lstsq) and the FFT
//! family are declared but not implemented by this crate; they report
//! [`Error::Unsupported`] instead of returning placeholder values.

use gemm::{gemm, Parallelism};

use crate::storage::Storage;
use crate::tensor::from_storage;
use crate::{Error, Result, Shape, Tensor};

/// C += A @ B for row-major contiguous buffers, `read_dst = false` so the
/// destination is overwritten rather than accumulated into.
macro_rules! gemm_dispatch {
    ($ty:ty, $l:expr, $r:expr, $m:expr, $n:expr, $k:expr) => {{
        let mut dst: Vec<$ty> = Vec::new();
        dst.try_reserve_exact($m * $n)
            .map_err(|_| Error::Allocation {
                bytes: $m * $n * std::mem::size_of::<$ty>(),
            })?;
        dst.resize($m * $n, <$ty>::default());
        unsafe {
            gemm::<$ty>(
                $m,
                $n,
                $k,
                dst.as_mut_ptr(),
                1,
                $n as isize,
                false,
                $l.as_ptr(),
                1,
                $k as isize,
                $r.as_ptr(),
                1,
                $n as isize,
                <$ty>::default(),
                1 as $ty,
                false,
                false,
                false,
                Parallelism::Rayon(num_cpus::get()),
            );
        }
        dst
    }};
}

fn naive_matmul<T>(l: &[T], r: &[T], m: usize, n: usize, k: usize) -> Result<Vec<T>>
where
    T: Copy + Default + std::ops::Mul<Output = T> + std::ops::Add<Output = T>,
{
    let mut dst: Vec<T> = Vec::new();
    dst.try_reserve_exact(m * n).map_err(|_| Error::Allocation {
        bytes: m * n * std::mem::size_of::<T>(),
    })?;
    dst.resize(m * n, T::default());
    for i in 0..m {
        for p in 0..k {
            let a = l[i * k + p];
            for j in 0..n {
                dst[i * n + j] = dst[i * n + j] + a * r[p * n + j];
            }
        }
    }
    Ok(dst)
}

impl Tensor {
    /// Inner product of two rank-1 tensors of equal length and dtype.
    /// The result is a rank-1 tensor of shape `[1]`.
    pub fn dot(&self, rhs: &Tensor) -> Result<Tensor> {
        if self.rank() != 1 || rhs.rank() != 1 {
            return Err(Error::RankMismatch {
                op: "dot",
                expected: 1,
                got: if self.rank() != 1 { self.rank() } else { rhs.rank() },
            });
        }
        if self.size() != rhs.size() {
            return Err(Error::ShapeMismatch {
                op: "dot",
                lhs: self.dims().to_vec(),
                rhs: rhs.dims().to_vec(),
            });
        }
        if self.dtype() != rhs.dtype() {
            return Err(Error::DTypeMismatch {
                op: "dot",
                lhs: self.dtype(),
                rhs: rhs.dtype(),
            });
        }
        let lhs = self.contiguous()?;
        let rhs = rhs.contiguous()?;
        let lhs_s = lhs.storage()?;
        let rhs_s;
        // Aliasing operands share one lock; taking the RwLock twice from
        // one thread may deadlock.
        let rhs_ref = if lhs.shares_storage(&rhs) {
            &*lhs_s
        } else {
            rhs_s = rhs.storage()?;
            &*rhs_s
        };
        let out = match (&*lhs_s, rhs_ref) {
            (Storage::F32(l), Storage::F32(r)) => {
                Storage::F32(vec![l.iter().zip(r).map(|(x, y)| x * y).sum()])
            }
            (Storage::F64(l), Storage::F64(r)) => {
                Storage::F64(vec![l.iter().zip(r).map(|(x, y)| x * y).sum()])
            }
            (Storage::I32(l), Storage::I32(r)) => Storage::I32(vec![l
                .iter()
                .zip(r)
                .fold(0i32, |acc, (x, y)| acc.wrapping_add(x.wrapping_mul(*y)))]),
            (Storage::I64(l), Storage::I64(r)) => Storage::I64(vec![l
                .iter()
                .zip(r)
                .fold(0i64, |acc, (x, y)| acc.wrapping_add(x.wrapping_mul(*y)))]),
            _ => {
                return Err(Error::UnsupportedDType {
                    op: "dot",
                    dtype: self.dtype(),
                })
            }
        };
        Ok(from_storage(out, Shape::from([1]), self.device()))
    }

    /// Matrix product of two rank-2 tensors, `[m, k] @ [k, n] -> [m, n]`.
    ///
    /// Non-contiguous operands (e.g. transposed views) are materialized
    /// first. f32/f64 use the gemm microkernels; i32/i64 use a naive
    /// triple loop.
    pub fn matmul(&self, rhs: &Tensor) -> Result<Tensor> {
        if self.rank() != 2 || rhs.rank() != 2 {
            return Err(Error::RankMismatch {
                op: "matmul",
                expected: 2,
                got: if self.rank() != 2 { self.rank() } else { rhs.rank() },
            });
        }
        let (m, k) = (self.dims()[0], self.dims()[1]);
        let (k2, n) = (rhs.dims()[0], rhs.dims()[1]);
        if k != k2 {
            return Err(Error::ShapeMismatch {
                op: "matmul",
                lhs: self.dims().to_vec(),
                rhs: rhs.dims().to_vec(),
            });
        }
        if self.dtype() != rhs.dtype() {
            return Err(Error::DTypeMismatch {
                op: "matmul",
                lhs: self.dtype(),
                rhs: rhs.dtype(),
            });
        }
        let lhs = self.contiguous()?;
        let rhs = rhs.contiguous()?;
        let lhs_s = lhs.storage()?;
        let rhs_s;
        // Aliasing operands share one lock; taking the RwLock twice from
        // one thread may deadlock.
        let rhs_ref = if lhs.shares_storage(&rhs) {
            &*lhs_s
        } else {
            rhs_s = rhs.storage()?;
            &*rhs_s
        };
        let out = match (&*lhs_s, rhs_ref) {
            (Storage::F32(l), Storage::F32(r)) => {
                Storage::F32(gemm_dispatch!(f32, l, r, m, n, k))
            }
            (Storage::F64(l), Storage::F64(r)) => {
                Storage::F64(gemm_dispatch!(f64, l, r, m, n, k))
            }
            (Storage::I32(l), Storage::I32(r)) => Storage::I32(naive_matmul(l, r, m, n, k)?),
            (Storage::I64(l), Storage::I64(r)) => Storage::I64(naive_matmul(l, r, m, n, k)?),
            _ => {
                return Err(Error::UnsupportedDType {
                    op: "matmul",
                    dtype: self.dtype(),
                })
            }
        };
        Ok(from_storage(out, Shape::from([m, n]), self.device()))
    }

    pub fn det(&self) -> Result<Tensor> {
        Err(Error::Unsupported("determinant is not implemented"))
    }

    pub fn inv(&self) -> Result<Tensor> {
        Err(Error::Unsupported("matrix inverse is not implemented"))
    }

    pub fn svd(&self) -> Result<(Tensor, Tensor, Tensor)> {
        Err(Error::Unsupported(
            "singular value decomposition is not implemented",
        ))
    }

    pub fn eig(&self) -> Result<(Tensor, Tensor)> {
        Err(Error::Unsupported(
            "eigendecomposition is not implemented",
        ))
    }

    pub fn solve(&self, _rhs: &Tensor) -> Result<Tensor> {
        Err(Error::Unsupported("linear solve is not implemented"))
    }

    pub fn lstsq(&self, _rhs: &Tensor) -> Result<Tensor> {
        Err(Error::Unsupported("least squares is not implemented"))
    }

    pub fn fft(&self) -> Result<Tensor> {
        Err(Error::Unsupported("fft is not implemented"))
    }

    pub fn ifft(&self) -> Result<Tensor> {
        Err(Error::Unsupported("inverse fft is not implemented"))
    }

    pub fn fft2(&self) -> Result<Tensor> {
        Err(Error::Unsupported("2-d fft is not implemented"))
    }

    pub fn ifft2(&self) -> Result<Tensor> {
        Err(Error::Unsupported("2-d inverse fft is not implemented"))
    }
}
