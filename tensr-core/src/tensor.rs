//! The core tensor value type: shape, strides, dtype, device tag, and a
//! shared storage handle.

use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::layout::StridedIndex;
use crate::storage::Storage;
use crate::{Device, DType, Element, Error, Result, Shape};

pub struct Tensor_ {
    storage: Arc<RwLock<Storage>>,
    shape: Shape,
    strides: Vec<usize>,
    dtype: DType,
    device: Device,
    device_id: usize,
}

/// A dense n-dimensional array.
///
/// Cheap to clone: the handle is an `Arc`. Views produced by the shape
/// transform layer share the underlying buffer through a second `Arc`
/// level, so the buffer is freed exactly when the last owner or view is
/// dropped. Operations never mutate their operands; only [`Tensor::set`]
/// writes in place, and concurrent `set`/read on the same tensor is the
/// caller's responsibility to order (the lock makes it safe, not
/// deterministic).
#[derive(Clone)]
pub struct Tensor(Arc<Tensor_>);

impl std::ops::Deref for Tensor {
    type Target = Tensor_;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

pub(crate) fn from_storage(storage: Storage, shape: Shape, device: Device) -> Tensor {
    debug_assert_eq!(storage.len(), shape.num_elements());
    let dtype = storage.dtype();
    let strides = shape.strides();
    Tensor(Arc::new(Tensor_ {
        storage: Arc::new(RwLock::new(storage)),
        shape,
        strides,
        dtype,
        device,
        device_id: 0,
    }))
}

impl Tensor_ {
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn dims(&self) -> &[usize] {
        self.shape.dims()
    }

    /// Element strides. Contiguous row-major unless this tensor is a
    /// permuted view.
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    /// Total element count.
    pub fn size(&self) -> usize {
        self.shape.num_elements()
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn device_id(&self) -> usize {
        self.device_id
    }

    pub fn is_contiguous(&self) -> bool {
        self.strides == self.shape.strides()
    }

    pub(crate) fn storage(&self) -> Result<RwLockReadGuard<'_, Storage>> {
        self.storage
            .read()
            .map_err(|_| Error::msg("tensor storage lock poisoned"))
    }

    pub(crate) fn storage_mut(&self) -> Result<RwLockWriteGuard<'_, Storage>> {
        self.storage
            .write()
            .map_err(|_| Error::msg("tensor storage lock poisoned"))
    }

    pub(crate) fn strided_index(&self) -> StridedIndex<'_> {
        StridedIndex::new(self.shape.dims(), &self.strides)
    }

    /// Collect the elements of `data` in this tensor's logical row-major
    /// order, honoring its strides.
    pub(crate) fn gather<T: Copy>(&self, data: &[T]) -> Result<Vec<T>> {
        let n = self.size();
        let mut out: Vec<T> = Vec::new();
        out.try_reserve_exact(n).map_err(|_| Error::Allocation {
            bytes: n * std::mem::size_of::<T>(),
        })?;
        if self.is_contiguous() {
            out.extend_from_slice(&data[..n]);
        } else {
            out.extend(self.strided_index().map(|offset| data[offset]));
        }
        Ok(out)
    }

    fn offset_of(&self, indices: &[usize], op: &'static str) -> Result<usize> {
        if indices.len() != self.rank() {
            return Err(Error::RankMismatch {
                op,
                expected: self.rank(),
                got: indices.len(),
            });
        }
        let mut offset = 0;
        for (d, (&i, &dim)) in indices.iter().zip(self.dims().iter()).enumerate() {
            if i >= dim {
                return Err(Error::IndexOutOfBounds {
                    op,
                    index: i,
                    dim,
                });
            }
            offset += i * self.strides[d];
        }
        Ok(offset)
    }

    /// Read the element at a multi-index, widened to `f64` via
    /// [`Element::to_f64`].
    pub fn get(&self, indices: &[usize]) -> Result<f64> {
        let offset = self.offset_of(indices, "get")?;
        let guard = self.storage()?;
        Ok(match &*guard {
            Storage::F32(d) => d[offset].to_f64(),
            Storage::F64(d) => d[offset].to_f64(),
            Storage::I32(d) => d[offset].to_f64(),
            Storage::I64(d) => d[offset].to_f64(),
            Storage::U8(d) => d[offset].to_f64(),
            Storage::Bool(d) => d[offset].to_f64(),
        })
    }

    /// Write the element at a multi-index, converting `value` per dtype via
    /// [`Element::from_f64`].
    ///
    /// The write is visible through every view sharing this buffer.
    pub fn set(&self, indices: &[usize], value: f64) -> Result<()> {
        let offset = self.offset_of(indices, "set")?;
        let mut guard = self.storage_mut()?;
        match &mut *guard {
            Storage::F32(d) => d[offset] = Element::from_f64(value),
            Storage::F64(d) => d[offset] = Element::from_f64(value),
            Storage::I32(d) => d[offset] = Element::from_f64(value),
            Storage::I64(d) => d[offset] = Element::from_f64(value),
            Storage::U8(d) => d[offset] = Element::from_f64(value),
            Storage::Bool(d) => d[offset] = Element::from_f64(value),
        }
        Ok(())
    }

    /// True when both handles share one underlying buffer.
    pub fn shares_storage(&self, other: &Tensor_) -> bool {
        Arc::ptr_eq(&self.storage, &other.storage)
    }
}

impl Tensor {
    /// Build a tensor from a typed vector. The vector length must match the
    /// shape's element count.
    pub fn from_vec<T: Element, S: Into<Shape>>(
        data: Vec<T>,
        shape: S,
        device: Device,
    ) -> Result<Tensor> {
        let shape = shape.into();
        if data.len() != shape.num_elements() {
            return Err(Error::ShapeMismatch {
                op: "from_vec",
                lhs: vec![data.len()],
                rhs: shape.dims().to_vec(),
            });
        }
        Ok(from_storage(T::into_storage(data), shape, device))
    }

    pub fn zeros<S: Into<Shape>>(shape: S, dtype: DType, device: Device) -> Result<Tensor> {
        Self::full(shape, 0.0, dtype, device)
    }

    pub fn ones<S: Into<Shape>>(shape: S, dtype: DType, device: Device) -> Result<Tensor> {
        Self::full(shape, 1.0, dtype, device)
    }

    /// A tensor with every element set to `value`, converted per dtype
    /// (C-style truncation toward zero for integer dtypes).
    pub fn full<S: Into<Shape>>(
        shape: S,
        value: f64,
        dtype: DType,
        device: Device,
    ) -> Result<Tensor> {
        let shape = shape.into();
        let storage = Storage::try_filled(shape.num_elements(), dtype, value)?;
        Ok(from_storage(storage, shape, device))
    }

    /// Evenly spaced values in `[start, stop)` with the given step.
    ///
    /// `step == 0` is rejected before the length is computed.
    pub fn arange(
        start: f64,
        stop: f64,
        step: f64,
        dtype: DType,
        device: Device,
    ) -> Result<Tensor> {
        if step == 0.0 {
            return Err(Error::Degenerate {
                op: "arange",
                reason: "step must be non-zero".to_string(),
            });
        }
        if dtype == DType::Bool {
            return Err(Error::UnsupportedDType {
                op: "arange",
                dtype,
            });
        }
        let n = ((stop - start) / step).ceil().max(0.0) as usize;
        let storage =
            Storage::from_f64_iter((0..n).map(|i| start + i as f64 * step), dtype)?;
        Ok(from_storage(storage, Shape::from([n]), device))
    }

    /// `num` samples spaced linearly over `[start, stop]`, both endpoints
    /// included. Float dtypes only.
    pub fn linspace(
        start: f64,
        stop: f64,
        num: usize,
        dtype: DType,
        device: Device,
    ) -> Result<Tensor> {
        if !dtype.is_float() {
            return Err(Error::UnsupportedDType {
                op: "linspace",
                dtype,
            });
        }
        // A single sample has no defined step; emit `start` alone.
        let step = if num > 1 {
            (stop - start) / (num - 1) as f64
        } else {
            0.0
        };
        let storage =
            Storage::from_f64_iter((0..num).map(|i| start + i as f64 * step), dtype)?;
        Ok(from_storage(storage, Shape::from([num]), device))
    }

    /// The `n`x`n` identity matrix.
    pub fn eye(n: usize, dtype: DType, device: Device) -> Result<Tensor> {
        if dtype == DType::Bool {
            return Err(Error::UnsupportedDType { op: "eye", dtype });
        }
        let storage = Storage::from_f64_iter(
            (0..n * n).map(|i| if n > 0 && i % (n + 1) == 0 { 1.0 } else { 0.0 }),
            dtype,
        )?;
        Ok(from_storage(storage, Shape::from([n, n]), device))
    }

    /// Deep copy: a freshly allocated, contiguous, owning tensor with the
    /// same shape, dtype, and device, regardless of whether `self` is a
    /// view.
    pub fn copy(&self) -> Result<Tensor> {
        let guard = self.storage()?;
        let storage = match &*guard {
            Storage::F32(d) => Storage::F32(self.gather(d)?),
            Storage::F64(d) => Storage::F64(self.gather(d)?),
            Storage::I32(d) => Storage::I32(self.gather(d)?),
            Storage::I64(d) => Storage::I64(self.gather(d)?),
            Storage::U8(d) => Storage::U8(self.gather(d)?),
            Storage::Bool(d) => Storage::Bool(self.gather(d)?),
        };
        drop(guard);
        Ok(from_storage(storage, self.shape().clone(), self.device())
            .to_device(self.device(), self.device_id()))
    }

    /// Extract the elements in logical row-major order.
    pub fn to_flat_vec<T: Element>(&self) -> Result<Vec<T>> {
        if T::DTYPE != self.dtype() {
            return Err(Error::DTypeMismatch {
                op: "to_flat_vec",
                lhs: self.dtype(),
                rhs: T::DTYPE,
            });
        }
        let guard = self.storage()?;
        let data = T::storage_slice(&guard)
            .ok_or(Error::UnsupportedDType {
                op: "to_flat_vec",
                dtype: self.dtype(),
            })?;
        self.gather(data)
    }

    /// Rebind the device tag. No bytes move in the core; migration is the
    /// accelerator collaborator's job.
    pub fn to_device(&self, device: Device, device_id: usize) -> Tensor {
        Tensor(Arc::new(Tensor_ {
            storage: self.0.storage.clone(),
            shape: self.shape.clone(),
            strides: self.strides.clone(),
            dtype: self.dtype,
            device,
            device_id,
        }))
    }

    /// Build a view sharing this tensor's buffer with new metadata.
    /// Only the shape transform layer may pass non-contiguous strides.
    pub(crate) fn view_with(&self, shape: Shape, strides: Vec<usize>) -> Tensor {
        Tensor(Arc::new(Tensor_ {
            storage: self.0.storage.clone(),
            shape,
            strides,
            dtype: self.dtype,
            device: self.device,
            device_id: self.device_id,
        }))
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tensor(shape={}, dtype={}, device={})",
            self.shape(),
            self.dtype(),
            self.device()
        )
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape().dims())
            .field("strides", &self.strides())
            .field("dtype", &self.dtype())
            .field("device", &self.device())
            .finish()
    }
}
