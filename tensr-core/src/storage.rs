//! Typed buffers backing tensors.

use crate::{DType, Error, Result};

/// Tagged union over the closed set of element buffers.
///
/// Each variant owns a plain `Vec`; sharing between a tensor and its views
/// happens one level up through the tensor's `Arc`.
#[derive(Debug, Clone)]
pub enum Storage {
    F32(Vec<f32>),
    F64(Vec<f64>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    U8(Vec<u8>),
    Bool(Vec<bool>),
}

macro_rules! filled {
    ($t:ty, $variant:ident, $size:expr, $value:expr) => {{
        let mut buf: Vec<$t> = Vec::new();
        buf.try_reserve_exact($size).map_err(|_| Error::Allocation {
            bytes: $size * std::mem::size_of::<$t>(),
        })?;
        buf.resize($size, $value);
        Storage::$variant(buf)
    }};
}

impl Storage {
    pub fn dtype(&self) -> DType {
        match self {
            Storage::F32(_) => DType::F32,
            Storage::F64(_) => DType::F64,
            Storage::I32(_) => DType::I32,
            Storage::I64(_) => DType::I64,
            Storage::U8(_) => DType::U8,
            Storage::Bool(_) => DType::Bool,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Storage::F32(d) => d.len(),
            Storage::F64(d) => d.len(),
            Storage::I32(d) => d.len(),
            Storage::I64(d) => d.len(),
            Storage::U8(d) => d.len(),
            Storage::Bool(d) => d.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Allocate a buffer of `size` elements, every one set to `value`
    /// converted per dtype (C-style truncation toward zero for integers).
    ///
    /// Allocation failure surfaces as [`Error::Allocation`], never a smaller
    /// buffer.
    pub(crate) fn try_filled(size: usize, dtype: DType, value: f64) -> Result<Self> {
        Ok(match dtype {
            DType::F32 => filled!(f32, F32, size, value as f32),
            DType::F64 => filled!(f64, F64, size, value),
            DType::I32 => filled!(i32, I32, size, value as i32),
            DType::I64 => filled!(i64, I64, size, value as i64),
            DType::U8 => filled!(u8, U8, size, value as u8),
            DType::Bool => filled!(bool, Bool, size, value != 0.0),
        })
    }

    /// Collect an exact-size stream of `f64` values into a typed buffer,
    /// converting per dtype.
    pub(crate) fn from_f64_iter<I>(values: I, dtype: DType) -> Result<Self>
    where
        I: ExactSizeIterator<Item = f64>,
    {
        macro_rules! collect {
            ($t:ty, $variant:ident) => {{
                let mut buf: Vec<$t> = Vec::new();
                buf.try_reserve_exact(values.len())
                    .map_err(|_| Error::Allocation {
                        bytes: values.len() * std::mem::size_of::<$t>(),
                    })?;
                buf.extend(values.map(|v| v as $t));
                Storage::$variant(buf)
            }};
        }
        Ok(match dtype {
            DType::F32 => collect!(f32, F32),
            DType::F64 => collect!(f64, F64),
            DType::I32 => collect!(i32, I32),
            DType::I64 => collect!(i64, I64),
            DType::U8 => collect!(u8, U8),
            DType::Bool => {
                let mut buf: Vec<bool> = Vec::new();
                buf.try_reserve_exact(values.len())
                    .map_err(|_| Error::Allocation { bytes: values.len() })?;
                buf.extend(values.map(|v| v != 0.0));
                Storage::Bool(buf)
            }
        })
    }
}
