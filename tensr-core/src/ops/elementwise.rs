//! Element-wise binary, comparison, logical, and unary operations.
//!
//! Operands are paired positionally in logical row-major order; shapes must
//! have equal element counts (no broadcasting). Non-contiguous views are
//! walked through their strides. Every operation writes into a freshly
//! allocated contiguous result and never touches its operands.

use rayon::prelude::*;

use crate::storage::Storage;
use crate::tensor::from_storage;
use crate::{Error, Result, Tensor};

fn zip_map<T, U, F>(lhs: &Tensor, l: &[T], rhs: &Tensor, r: &[T], f: F) -> Result<Vec<U>>
where
    T: Copy + Sync,
    U: Send,
    F: Fn(T, T) -> U + Sync + Send,
{
    let n = lhs.size();
    let mut out: Vec<U> = Vec::new();
    out.try_reserve_exact(n).map_err(|_| Error::Allocation {
        bytes: n * std::mem::size_of::<U>(),
    })?;
    if lhs.is_contiguous() && rhs.is_contiguous() {
        out.par_extend(
            l[..n]
                .par_iter()
                .zip(r[..n].par_iter())
                .map(|(&x, &y)| f(x, y)),
        );
    } else {
        out.extend(
            lhs.strided_index()
                .zip(rhs.strided_index())
                .map(|(i, j)| f(l[i], r[j])),
        );
    }
    Ok(out)
}

fn map_values<T, U, F>(t: &Tensor, data: &[T], f: F) -> Result<Vec<U>>
where
    T: Copy + Sync,
    U: Send,
    F: Fn(T) -> U + Sync + Send,
{
    let n = t.size();
    let mut out: Vec<U> = Vec::new();
    out.try_reserve_exact(n).map_err(|_| Error::Allocation {
        bytes: n * std::mem::size_of::<U>(),
    })?;
    if t.is_contiguous() {
        out.par_extend(data[..n].par_iter().map(|&x| f(x)));
    } else {
        out.extend(t.strided_index().map(|i| f(data[i])));
    }
    Ok(out)
}

impl Tensor {
    fn check_binary(&self, rhs: &Tensor, op: &'static str) -> Result<()> {
        if self.size() != rhs.size() {
            return Err(Error::ShapeMismatch {
                op,
                lhs: self.dims().to_vec(),
                rhs: rhs.dims().to_vec(),
            });
        }
        if self.dtype() != rhs.dtype() {
            return Err(Error::DTypeMismatch {
                op,
                lhs: self.dtype(),
                rhs: rhs.dtype(),
            });
        }
        Ok(())
    }
}

macro_rules! arith_op {
    ($fn_name:ident, $op:tt) => {
        #[doc = concat!("Element-wise `", stringify!($op), "` over two same-size, same-dtype tensors.")]
        pub fn $fn_name(&self, rhs: &Tensor) -> Result<Tensor> {
            self.check_binary(rhs, stringify!($fn_name))?;
            let lhs_s = self.storage()?;
            let rhs_s;
            // One lock serves both sides when the operands alias the same
            // buffer; taking the RwLock twice from one thread may deadlock.
            let rhs_ref = if self.shares_storage(rhs) {
                &*lhs_s
            } else {
                rhs_s = rhs.storage()?;
                &*rhs_s
            };
            let out = match (&*lhs_s, rhs_ref) {
                (Storage::F32(l), Storage::F32(r)) => {
                    Storage::F32(zip_map(self, l, rhs, r, |x, y| x $op y)?)
                }
                (Storage::F64(l), Storage::F64(r)) => {
                    Storage::F64(zip_map(self, l, rhs, r, |x, y| x $op y)?)
                }
                (Storage::I32(l), Storage::I32(r)) => {
                    Storage::I32(zip_map(self, l, rhs, r, |x, y| x $op y)?)
                }
                (Storage::I64(l), Storage::I64(r)) => {
                    Storage::I64(zip_map(self, l, rhs, r, |x, y| x $op y)?)
                }
                (Storage::U8(l), Storage::U8(r)) => {
                    Storage::U8(zip_map(self, l, rhs, r, |x, y| x $op y)?)
                }
                _ => {
                    return Err(Error::UnsupportedDType {
                        op: stringify!($fn_name),
                        dtype: self.dtype(),
                    })
                }
            };
            Ok(from_storage(out, self.shape().clone(), self.device()))
        }
    };
}

macro_rules! cmp_op {
    ($fn_name:ident, $op:tt) => {
        #[doc = concat!("Element-wise `", stringify!($op), "`; the result dtype is always bool.")]
        pub fn $fn_name(&self, rhs: &Tensor) -> Result<Tensor> {
            self.check_binary(rhs, stringify!($fn_name))?;
            let lhs_s = self.storage()?;
            let rhs_s;
            // One lock serves both sides when the operands alias the same
            // buffer; taking the RwLock twice from one thread may deadlock.
            let rhs_ref = if self.shares_storage(rhs) {
                &*lhs_s
            } else {
                rhs_s = rhs.storage()?;
                &*rhs_s
            };
            let out = match (&*lhs_s, rhs_ref) {
                (Storage::F32(l), Storage::F32(r)) => zip_map(self, l, rhs, r, |x, y| x $op y)?,
                (Storage::F64(l), Storage::F64(r)) => zip_map(self, l, rhs, r, |x, y| x $op y)?,
                (Storage::I32(l), Storage::I32(r)) => zip_map(self, l, rhs, r, |x, y| x $op y)?,
                (Storage::I64(l), Storage::I64(r)) => zip_map(self, l, rhs, r, |x, y| x $op y)?,
                (Storage::U8(l), Storage::U8(r)) => zip_map(self, l, rhs, r, |x, y| x $op y)?,
                (Storage::Bool(l), Storage::Bool(r)) => zip_map(self, l, rhs, r, |x, y| x $op y)?,
                _ => unreachable!("check_binary enforces equal dtypes"),
            };
            Ok(from_storage(
                Storage::Bool(out),
                self.shape().clone(),
                self.device(),
            ))
        }
    };
}

macro_rules! logical_op {
    ($fn_name:ident, $op:tt) => {
        #[doc = concat!("Element-wise logical `", stringify!($op), "`; both operands must be bool.")]
        pub fn $fn_name(&self, rhs: &Tensor) -> Result<Tensor> {
            self.check_binary(rhs, stringify!($fn_name))?;
            let lhs_s = self.storage()?;
            let rhs_s;
            // One lock serves both sides when the operands alias the same
            // buffer; taking the RwLock twice from one thread may deadlock.
            let rhs_ref = if self.shares_storage(rhs) {
                &*lhs_s
            } else {
                rhs_s = rhs.storage()?;
                &*rhs_s
            };
            let out = match (&*lhs_s, rhs_ref) {
                (Storage::Bool(l), Storage::Bool(r)) => {
                    zip_map(self, l, rhs, r, |x, y| x $op y)?
                }
                _ => {
                    return Err(Error::UnsupportedDType {
                        op: stringify!($fn_name),
                        dtype: self.dtype(),
                    })
                }
            };
            Ok(from_storage(
                Storage::Bool(out),
                self.shape().clone(),
                self.device(),
            ))
        }
    };
}

macro_rules! unary_float_op {
    ($fn_name:ident, $method:ident) => {
        #[doc = concat!("Element-wise `", stringify!($method), "`. Float dtypes only.")]
        pub fn $fn_name(&self) -> Result<Tensor> {
            let guard = self.storage()?;
            let out = match &*guard {
                Storage::F32(d) => Storage::F32(map_values(self, d, |x| x.$method())?),
                Storage::F64(d) => Storage::F64(map_values(self, d, |x| x.$method())?),
                _ => {
                    return Err(Error::UnsupportedDType {
                        op: stringify!($fn_name),
                        dtype: self.dtype(),
                    })
                }
            };
            Ok(from_storage(out, self.shape().clone(), self.device()))
        }
    };
}

impl Tensor {
    arith_op!(add, +);
    arith_op!(sub, -);
    arith_op!(mul, *);
    arith_op!(div, /);

    cmp_op!(equal, ==);
    cmp_op!(not_equal, !=);
    cmp_op!(greater, >);
    cmp_op!(less, <);
    cmp_op!(greater_equal, >=);
    cmp_op!(less_equal, <=);

    logical_op!(logical_and, &&);
    logical_op!(logical_or, ||);

    /// Element-wise logical negation; bool dtype only.
    pub fn logical_not(&self) -> Result<Tensor> {
        let guard = self.storage()?;
        let out = match &*guard {
            Storage::Bool(d) => map_values(self, d, |x| !x)?,
            _ => {
                return Err(Error::UnsupportedDType {
                    op: "logical_not",
                    dtype: self.dtype(),
                })
            }
        };
        Ok(from_storage(
            Storage::Bool(out),
            self.shape().clone(),
            self.device(),
        ))
    }

    unary_float_op!(sqrt, sqrt);
    unary_float_op!(exp, exp);
    unary_float_op!(log, ln);
    unary_float_op!(sin, sin);
    unary_float_op!(cos, cos);
    unary_float_op!(tan, tan);
    unary_float_op!(arcsin, asin);
    unary_float_op!(arccos, acos);
    unary_float_op!(arctan, atan);

    /// Element-wise power with a scalar exponent. Float dtypes only.
    pub fn pow(&self, exponent: f64) -> Result<Tensor> {
        let guard = self.storage()?;
        let out = match &*guard {
            Storage::F32(d) => {
                let e = exponent as f32;
                Storage::F32(map_values(self, d, move |x| x.powf(e))?)
            }
            Storage::F64(d) => Storage::F64(map_values(self, d, move |x| x.powf(exponent))?),
            _ => {
                return Err(Error::UnsupportedDType {
                    op: "pow",
                    dtype: self.dtype(),
                })
            }
        };
        Ok(from_storage(out, self.shape().clone(), self.device()))
    }

    /// Element-wise absolute value for float and signed integer dtypes.
    pub fn abs(&self) -> Result<Tensor> {
        let guard = self.storage()?;
        let out = match &*guard {
            Storage::F32(d) => Storage::F32(map_values(self, d, |x| x.abs())?),
            Storage::F64(d) => Storage::F64(map_values(self, d, |x| x.abs())?),
            Storage::I32(d) => Storage::I32(map_values(self, d, |x| x.abs())?),
            Storage::I64(d) => Storage::I64(map_values(self, d, |x| x.abs())?),
            _ => {
                return Err(Error::UnsupportedDType {
                    op: "abs",
                    dtype: self.dtype(),
                })
            }
        };
        Ok(from_storage(out, self.shape().clone(), self.device()))
    }

    /// Element-wise negation, preserving the dtype. Unsigned and bool
    /// dtypes are rejected.
    pub fn neg(&self) -> Result<Tensor> {
        let guard = self.storage()?;
        let out = match &*guard {
            Storage::F32(d) => Storage::F32(map_values(self, d, |x| -x)?),
            Storage::F64(d) => Storage::F64(map_values(self, d, |x| -x)?),
            Storage::I32(d) => Storage::I32(map_values(self, d, |x| -x)?),
            Storage::I64(d) => Storage::I64(map_values(self, d, |x| -x)?),
            _ => {
                return Err(Error::UnsupportedDType {
                    op: "neg",
                    dtype: self.dtype(),
                })
            }
        };
        Ok(from_storage(out, self.shape().clone(), self.device()))
    }
}
