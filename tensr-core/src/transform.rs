//! Shape transforms: reshape, transpose, squeeze, expand_dims.
//!
//! All of these are metadata-only views sharing the source buffer; none
//! moves data. [`Tensor::contiguous`] materializes a view back into an
//! owning row-major tensor when an operation needs one.

use crate::{Error, Result, Shape, Tensor};

impl Tensor {
    /// Reinterpret this tensor under a new shape with the same element
    /// count. Returns a view sharing the buffer, with strides recomputed
    /// from `new_shape`.
    ///
    /// Requires a contiguous source: reinterpreting a permuted view's
    /// buffer under fresh row-major strides would scramble it. Call
    /// [`Tensor::contiguous`] first in that case.
    pub fn reshape<S: Into<Shape>>(&self, new_shape: S) -> Result<Tensor> {
        let new_shape = new_shape.into();
        if new_shape.num_elements() != self.size() {
            return Err(Error::ShapeMismatch {
                op: "reshape",
                lhs: self.dims().to_vec(),
                rhs: new_shape.dims().to_vec(),
            });
        }
        if !self.is_contiguous() {
            return Err(Error::NonContiguous {
                op: "reshape",
                strides: self.strides().to_vec(),
            });
        }
        let strides = new_shape.strides();
        Ok(self.view_with(new_shape, strides))
    }

    /// Permute dimensions. An empty `axes` reverses the dimension order;
    /// otherwise `axes` must be a permutation of `0..rank`.
    ///
    /// Returns a strided view: `shape[i] = self.shape[axes[i]]` and
    /// `strides[i] = self.strides[axes[i]]`. No data moves; element access
    /// and every operation walk the permuted strides.
    pub fn transpose(&self, axes: &[usize]) -> Result<Tensor> {
        let rank = self.rank();
        let reversed: Vec<usize>;
        let axes = if axes.is_empty() {
            reversed = (0..rank).rev().collect();
            &reversed
        } else {
            axes
        };
        if axes.len() != rank {
            return Err(Error::RankMismatch {
                op: "transpose",
                expected: rank,
                got: axes.len(),
            });
        }
        let mut seen = vec![false; rank];
        for &a in axes {
            if a >= rank {
                return Err(Error::InvalidAxis {
                    op: "transpose",
                    axis: a,
                    rank,
                });
            }
            if seen[a] {
                return Err(Error::Degenerate {
                    op: "transpose",
                    reason: format!("axis {a} repeated in permutation"),
                });
            }
            seen[a] = true;
        }
        let shape: Vec<usize> = axes.iter().map(|&a| self.dims()[a]).collect();
        let strides: Vec<usize> = axes.iter().map(|&a| self.strides()[a]).collect();
        Ok(self.view_with(Shape::new(shape), strides))
    }

    /// Drop a size-1 dimension.
    pub fn squeeze(&self, axis: usize) -> Result<Tensor> {
        let rank = self.rank();
        if axis >= rank {
            return Err(Error::InvalidAxis {
                op: "squeeze",
                axis,
                rank,
            });
        }
        if self.dims()[axis] != 1 {
            return Err(Error::Degenerate {
                op: "squeeze",
                reason: format!(
                    "axis {axis} has size {}, expected 1",
                    self.dims()[axis]
                ),
            });
        }
        let mut dims = self.dims().to_vec();
        let mut strides = self.strides().to_vec();
        dims.remove(axis);
        strides.remove(axis);
        Ok(self.view_with(Shape::new(dims), strides))
    }

    /// Insert a size-1 dimension at `axis` (which may equal the rank, to
    /// append a trailing dimension).
    pub fn expand_dims(&self, axis: usize) -> Result<Tensor> {
        let rank = self.rank();
        if axis > rank {
            return Err(Error::InvalidAxis {
                op: "expand_dims",
                axis,
                rank,
            });
        }
        let mut dims = self.dims().to_vec();
        let mut strides = self.strides().to_vec();
        // The new dimension has a single element, so any stride is
        // consistent; this choice keeps contiguous tensors contiguous.
        let stride = if axis == rank {
            1
        } else {
            strides[axis] * dims[axis]
        };
        dims.insert(axis, 1);
        strides.insert(axis, stride);
        Ok(self.view_with(Shape::new(dims), strides))
    }

    /// An owning row-major tensor with this tensor's logical contents.
    /// Contiguous tensors are returned as a shared handle without copying.
    pub fn contiguous(&self) -> Result<Tensor> {
        if self.is_contiguous() {
            Ok(self.clone())
        } else {
            self.copy()
        }
    }
}
