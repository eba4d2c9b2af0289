//! Joining tensors: concat, stack, and the vstack/hstack shorthands.
//!
//! Joins materialize: the result is always a freshly allocated contiguous
//! tensor, with every input read in its logical row-major order (strided
//! views join correctly). Slicing and advanced indexing are declared
//! capability points that report [`Error::Unsupported`].

use crate::storage::Storage;
use crate::tensor::from_storage;
use crate::{DType, Element, Error, Result, Shape, Tensor};

/// Interleave per-tensor row-major blocks: for each index along the axes
/// before `axis`, emit every input's block of the axes from `axis` on.
fn join_blocks<T: Copy>(parts: &[Vec<T>], outer: usize, inners: &[usize]) -> Result<Vec<T>> {
    let total: usize = parts.iter().map(Vec::len).sum();
    let mut out: Vec<T> = Vec::new();
    out.try_reserve_exact(total).map_err(|_| Error::Allocation {
        bytes: total * std::mem::size_of::<T>(),
    })?;
    for o in 0..outer {
        for (part, &inner) in parts.iter().zip(inners) {
            out.extend_from_slice(&part[o * inner..(o + 1) * inner]);
        }
    }
    Ok(out)
}

fn join_typed<T: Element>(tensors: &[Tensor], outer: usize, inners: &[usize]) -> Result<Storage> {
    let mut parts = Vec::with_capacity(tensors.len());
    for t in tensors {
        parts.push(t.to_flat_vec::<T>()?);
    }
    Ok(T::into_storage(join_blocks(&parts, outer, inners)?))
}

impl Tensor {
    /// Join tensors along an existing axis. All inputs must share rank,
    /// dtype, and every dimension except `axis`; the result's `axis`
    /// dimension is the sum of the inputs'.
    pub fn concat(tensors: &[Tensor], axis: usize) -> Result<Tensor> {
        let first = tensors.first().ok_or_else(|| Error::Degenerate {
            op: "concat",
            reason: "no tensors to join".to_string(),
        })?;
        let rank = first.rank();
        if axis >= rank {
            return Err(Error::InvalidAxis {
                op: "concat",
                axis,
                rank,
            });
        }
        for t in tensors {
            if t.rank() != rank {
                return Err(Error::RankMismatch {
                    op: "concat",
                    expected: rank,
                    got: t.rank(),
                });
            }
            if t.dtype() != first.dtype() {
                return Err(Error::DTypeMismatch {
                    op: "concat",
                    lhs: first.dtype(),
                    rhs: t.dtype(),
                });
            }
            let dims_agree = t
                .dims()
                .iter()
                .zip(first.dims())
                .enumerate()
                .all(|(d, (a, b))| d == axis || a == b);
            if !dims_agree {
                return Err(Error::ShapeMismatch {
                    op: "concat",
                    lhs: first.dims().to_vec(),
                    rhs: t.dims().to_vec(),
                });
            }
        }

        let mut out_dims = first.dims().to_vec();
        out_dims[axis] = tensors.iter().map(|t| t.dims()[axis]).sum();
        let outer: usize = first.dims()[..axis].iter().product();
        // Row-major block emitted per outer index: the axis itself and
        // everything after it.
        let inners: Vec<usize> = tensors
            .iter()
            .map(|t| t.dims()[axis..].iter().product())
            .collect();

        let storage = match first.dtype() {
            DType::F32 => join_typed::<f32>(tensors, outer, &inners)?,
            DType::F64 => join_typed::<f64>(tensors, outer, &inners)?,
            DType::I32 => join_typed::<i32>(tensors, outer, &inners)?,
            DType::I64 => join_typed::<i64>(tensors, outer, &inners)?,
            DType::U8 => join_typed::<u8>(tensors, outer, &inners)?,
            DType::Bool => join_typed::<bool>(tensors, outer, &inners)?,
        };
        Ok(from_storage(storage, Shape::new(out_dims), first.device()))
    }

    /// Join same-shape tensors along a new axis; the result's rank is one
    /// higher, with dimension `tensors.len()` at `axis`.
    pub fn stack(tensors: &[Tensor], axis: usize) -> Result<Tensor> {
        if tensors.is_empty() {
            return Err(Error::Degenerate {
                op: "stack",
                reason: "no tensors to join".to_string(),
            });
        }
        let expanded = tensors
            .iter()
            .map(|t| t.expand_dims(axis))
            .collect::<Result<Vec<_>>>()?;
        Self::concat(&expanded, axis)
    }

    /// Stack along a new leading axis.
    pub fn vstack(tensors: &[Tensor]) -> Result<Tensor> {
        Self::stack(tensors, 0)
    }

    /// Stack along a new second axis.
    pub fn hstack(tensors: &[Tensor]) -> Result<Tensor> {
        Self::stack(tensors, 1)
    }

    pub fn slice(&self, _start: &[usize], _stop: &[usize], _step: &[usize]) -> Result<Tensor> {
        Err(Error::Unsupported("slicing is not implemented"))
    }

    pub fn index(&self, _indices: &[usize]) -> Result<Tensor> {
        Err(Error::Unsupported("advanced indexing is not implemented"))
    }
}
