//! Shape descriptors and row-major layout arithmetic.

use std::fmt;

use crate::DType;

/// Dimensions of a [`crate::Tensor`].
///
/// Immutable once created; shape-changing operations always produce a new
/// tensor. Rank 0 is the scalar shape with a single element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    dims: Vec<usize>,
}

impl Shape {
    pub fn new(dims: Vec<usize>) -> Self {
        Self { dims }
    }

    /// Rank-0 shape.
    pub fn scalar() -> Self {
        Self { dims: vec![] }
    }

    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Total element count: the product of all dimensions, 1 for rank 0.
    /// Zero-sized dimensions are legal and yield 0.
    pub fn num_elements(&self) -> usize {
        self.dims.iter().product()
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn dim(&self, index: usize) -> Option<usize> {
        self.dims.get(index).copied()
    }

    /// Buffer size in bytes for the given dtype.
    pub fn size_bytes(&self, dtype: DType) -> usize {
        self.num_elements() * dtype.size_bytes()
    }

    /// Row-major (C-order) strides, in elements.
    ///
    /// `strides[rank-1] == 1` and `strides[i] == strides[i+1] * dims[i+1]`.
    pub fn strides(&self) -> Vec<usize> {
        let rank = self.dims.len();
        if rank == 0 {
            return vec![];
        }
        let mut strides = vec![0usize; rank];
        strides[rank - 1] = 1;
        for i in (0..rank - 1).rev() {
            strides[i] = strides[i + 1] * self.dims[i + 1];
        }
        strides
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{d}")?;
        }
        write!(f, "]")
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Self::new(dims)
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Self::new(dims.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(dims: [usize; N]) -> Self {
        Self::new(dims.to_vec())
    }
}

/// Iterator from logical row-major position to storage offset for a tensor
/// with arbitrary strides.
///
/// Contiguous tensors yield `0, 1, 2, ..`; transposed or otherwise permuted
/// views yield their buffer offsets in the view's logical order. Every
/// operation that walks a possibly non-contiguous operand goes through this.
pub(crate) struct StridedIndex<'a> {
    next_storage_offset: Option<usize>,
    multi_index: Vec<usize>,
    dims: &'a [usize],
    strides: &'a [usize],
}

impl<'a> StridedIndex<'a> {
    pub(crate) fn new(dims: &'a [usize], strides: &'a [usize]) -> Self {
        let num_elements: usize = dims.iter().product();
        Self {
            next_storage_offset: if num_elements == 0 { None } else { Some(0) },
            multi_index: vec![0; dims.len()],
            dims,
            strides,
        }
    }
}

impl Iterator for StridedIndex<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let offset = self.next_storage_offset?;
        let mut next_offset = offset;
        let mut advanced = false;
        for d in (0..self.dims.len()).rev() {
            self.multi_index[d] += 1;
            next_offset += self.strides[d];
            if self.multi_index[d] < self.dims[d] {
                advanced = true;
                break;
            }
            next_offset -= self.multi_index[d] * self.strides[d];
            self.multi_index[d] = 0;
        }
        self.next_storage_offset = if advanced { Some(next_offset) } else { None };
        Some(offset)
    }
}
