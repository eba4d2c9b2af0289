//! Reductions: full and per-axis aggregation.
//!
//! An empty axis list reduces the whole buffer to a single value of shape
//! `[1]` (or the original rank with every dimension forced to 1 under
//! `keepdims`). A non-empty axis list folds along exactly those axes: every
//! input multi-index is visited once and accumulated into the output slot
//! addressed by the surviving axes, so permuted views reduce correctly.

use crate::storage::Storage;
use crate::tensor::from_storage;
use crate::{Error, Result, Shape, Tensor};

struct ReducePlan {
    /// Per input dimension: 0 if the dimension is reduced away, otherwise
    /// the output stride for that dimension.
    out_map_strides: Vec<usize>,
    out_len: usize,
    final_shape: Shape,
}

fn reduce_plan(t: &Tensor, axes: &[usize], keepdims: bool, op: &'static str) -> Result<ReducePlan> {
    let rank = t.rank();
    let mut is_reduced = vec![axes.is_empty(); rank];
    for &a in axes {
        if a >= rank {
            return Err(Error::InvalidAxis { op, axis: a, rank });
        }
        if is_reduced[a] {
            return Err(Error::Degenerate {
                op,
                reason: format!("axis {a} listed more than once"),
            });
        }
        is_reduced[a] = true;
    }

    let mut out_dims = t.dims().to_vec();
    for d in 0..rank {
        if is_reduced[d] {
            out_dims[d] = 1;
        }
    }
    let out_shape = Shape::new(out_dims.clone());
    let out_strides = out_shape.strides();
    let out_map_strides = (0..rank)
        .map(|d| if is_reduced[d] { 0 } else { out_strides[d] })
        .collect();

    let final_shape = if keepdims {
        out_shape.clone()
    } else {
        let kept: Vec<usize> = (0..rank)
            .filter(|&d| !is_reduced[d])
            .map(|d| t.dims()[d])
            .collect();
        if kept.is_empty() {
            Shape::from([1])
        } else {
            Shape::new(kept)
        }
    };

    Ok(ReducePlan {
        out_map_strides,
        out_len: out_shape.num_elements(),
        final_shape,
    })
}

/// Fold every element of `data` (walked in `t`'s logical order) into the
/// output slot its surviving axes address.
fn accumulate<T, F>(t: &Tensor, data: &[T], init: T, plan: &ReducePlan, f: F) -> Result<Vec<T>>
where
    T: Copy,
    F: Fn(T, T) -> T,
{
    let mut out: Vec<T> = Vec::new();
    out.try_reserve_exact(plan.out_len)
        .map_err(|_| Error::Allocation {
            bytes: plan.out_len * std::mem::size_of::<T>(),
        })?;
    out.resize(plan.out_len, init);

    let dims = t.dims();
    let strides = t.strides();
    let rank = dims.len();
    let n = t.size();
    if n == 0 {
        return Ok(out);
    }
    let mut multi = vec![0usize; rank];
    let mut in_off = 0usize;
    let mut out_off = 0usize;
    for _ in 0..n {
        out[out_off] = f(out[out_off], data[in_off]);
        for d in (0..rank).rev() {
            multi[d] += 1;
            in_off += strides[d];
            out_off += plan.out_map_strides[d];
            if multi[d] < dims[d] {
                break;
            }
            in_off -= multi[d] * strides[d];
            out_off -= multi[d] * plan.out_map_strides[d];
            multi[d] = 0;
        }
    }
    Ok(out)
}

fn scan_extremum<T, F>(t: &Tensor, data: &[T], better: F) -> usize
where
    T: Copy,
    F: Fn(T, T) -> bool,
{
    let mut best_pos = 0usize;
    let mut best: Option<T> = None;
    for (pos, offset) in t.strided_index().enumerate() {
        let x = data[offset];
        match best {
            None => {
                best = Some(x);
                best_pos = pos;
            }
            // Strict comparison: ties keep the first occurrence.
            Some(b) if better(x, b) => {
                best = Some(x);
                best_pos = pos;
            }
            _ => {}
        }
    }
    best_pos
}

macro_rules! fold_minmax {
    ($fn_name:ident, $op:tt, $f32_init:expr, $f64_init:expr, $i32_init:expr, $i64_init:expr, $u8_init:expr) => {
        #[doc = concat!("Reduce with element-wise `", stringify!($op), "` along `axes` (all axes when empty). Rejects empty tensors.")]
        pub fn $fn_name(&self, axes: &[usize], keepdims: bool) -> Result<Tensor> {
            if self.size() == 0 {
                return Err(Error::Degenerate {
                    op: stringify!($fn_name),
                    reason: "reduction over an empty tensor".to_string(),
                });
            }
            let plan = reduce_plan(self, axes, keepdims, stringify!($fn_name))?;
            let guard = self.storage()?;
            let out = match &*guard {
                Storage::F32(d) => {
                    Storage::F32(accumulate(self, d, $f32_init, &plan, |a, x| if x $op a { x } else { a })?)
                }
                Storage::F64(d) => {
                    Storage::F64(accumulate(self, d, $f64_init, &plan, |a, x| if x $op a { x } else { a })?)
                }
                Storage::I32(d) => {
                    Storage::I32(accumulate(self, d, $i32_init, &plan, |a, x| if x $op a { x } else { a })?)
                }
                Storage::I64(d) => {
                    Storage::I64(accumulate(self, d, $i64_init, &plan, |a, x| if x $op a { x } else { a })?)
                }
                Storage::U8(d) => {
                    Storage::U8(accumulate(self, d, $u8_init, &plan, |a, x| if x $op a { x } else { a })?)
                }
                Storage::Bool(_) => {
                    return Err(Error::UnsupportedDType {
                        op: stringify!($fn_name),
                        dtype: self.dtype(),
                    })
                }
            };
            Ok(from_storage(out, plan.final_shape, self.device()))
        }
    };
}

macro_rules! arg_extremum {
    ($fn_name:ident, $op:tt) => {
        #[doc = concat!("Flat row-major index (as int64) of the first ", stringify!($fn_name), " value.")]
        pub fn $fn_name(&self) -> Result<Tensor> {
            if self.size() == 0 {
                return Err(Error::Degenerate {
                    op: stringify!($fn_name),
                    reason: "reduction over an empty tensor".to_string(),
                });
            }
            let guard = self.storage()?;
            let idx = match &*guard {
                Storage::F32(d) => scan_extremum(self, d, |x, b| x $op b),
                Storage::F64(d) => scan_extremum(self, d, |x, b| x $op b),
                Storage::I32(d) => scan_extremum(self, d, |x, b| x $op b),
                Storage::I64(d) => scan_extremum(self, d, |x, b| x $op b),
                Storage::U8(d) => scan_extremum(self, d, |x, b| x $op b),
                Storage::Bool(_) => {
                    return Err(Error::UnsupportedDType {
                        op: stringify!($fn_name),
                        dtype: self.dtype(),
                    })
                }
            };
            drop(guard);
            Tensor::from_vec(vec![idx as i64], [1], self.device())
        }
    };
}

impl Tensor {
    /// Sum along `axes` (all axes when empty), optionally keeping reduced
    /// dimensions as size 1. Integer dtypes accumulate with wrapping
    /// arithmetic, matching the element type's native overflow behavior.
    pub fn sum(&self, axes: &[usize], keepdims: bool) -> Result<Tensor> {
        let plan = reduce_plan(self, axes, keepdims, "sum")?;
        let guard = self.storage()?;
        let out = match &*guard {
            Storage::F32(d) => Storage::F32(accumulate(self, d, 0f32, &plan, |a, x| a + x)?),
            Storage::F64(d) => Storage::F64(accumulate(self, d, 0f64, &plan, |a, x| a + x)?),
            Storage::I32(d) => {
                Storage::I32(accumulate(self, d, 0i32, &plan, |a, x| a.wrapping_add(x))?)
            }
            Storage::I64(d) => {
                Storage::I64(accumulate(self, d, 0i64, &plan, |a, x| a.wrapping_add(x))?)
            }
            Storage::U8(d) => {
                Storage::U8(accumulate(self, d, 0u8, &plan, |a, x| a.wrapping_add(x))?)
            }
            Storage::Bool(_) => {
                return Err(Error::UnsupportedDType {
                    op: "sum",
                    dtype: self.dtype(),
                })
            }
        };
        Ok(from_storage(out, plan.final_shape, self.device()))
    }

    /// Arithmetic mean along `axes`. Float dtypes only; empty tensors are
    /// rejected (the per-slot divisor would be zero).
    pub fn mean(&self, axes: &[usize], keepdims: bool) -> Result<Tensor> {
        if !self.dtype().is_float() {
            return Err(Error::UnsupportedDType {
                op: "mean",
                dtype: self.dtype(),
            });
        }
        if self.size() == 0 {
            return Err(Error::Degenerate {
                op: "mean",
                reason: "mean of an empty tensor".to_string(),
            });
        }
        let sum = self.sum(axes, keepdims)?;
        let count = self.size() / sum.size();
        let mut guard = sum.storage_mut()?;
        match &mut *guard {
            Storage::F32(v) => v.iter_mut().for_each(|x| *x /= count as f32),
            Storage::F64(v) => v.iter_mut().for_each(|x| *x /= count as f64),
            _ => unreachable!("mean only accepts float dtypes"),
        }
        drop(guard);
        Ok(sum)
    }

    fold_minmax!(max, >, f32::NEG_INFINITY, f64::NEG_INFINITY, i32::MIN, i64::MIN, u8::MIN);
    fold_minmax!(min, <, f32::INFINITY, f64::INFINITY, i32::MAX, i64::MAX, u8::MAX);

    arg_extremum!(argmax, >);
    arg_extremum!(argmin, <);
}
