use std::fmt;

use crate::storage::Storage;
use crate::{Error, Result};

/// Element storage type of a [`crate::Tensor`].
///
/// Fixed at creation; binary operations require equal dtypes on both
/// operands. The discriminant doubles as the on-disk dtype code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    F32 = 0,
    F64 = 1,
    I32 = 2,
    I64 = 3,
    U8 = 4,
    Bool = 5,
}

impl DType {
    /// Size of one element in bytes.
    pub fn size_bytes(self) -> usize {
        match self {
            DType::F32 => 4,
            DType::F64 => 8,
            DType::I32 => 4,
            DType::I64 => 8,
            DType::U8 => 1,
            DType::Bool => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DType::F32 => "float32",
            DType::F64 => "float64",
            DType::I32 => "int32",
            DType::I64 => "int64",
            DType::U8 => "uint8",
            DType::Bool => "bool",
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, DType::F32 | DType::F64)
    }

    /// Dtype code used by the binary persistence format.
    pub(crate) fn to_code(self) -> u32 {
        self as u32
    }

    pub(crate) fn from_code(code: u32) -> Result<Self> {
        match code {
            0 => Ok(DType::F32),
            1 => Ok(DType::F64),
            2 => Ok(DType::I32),
            3 => Ok(DType::I64),
            4 => Ok(DType::U8),
            5 => Ok(DType::Bool),
            other => Err(Error::msg(format!("unknown dtype code {other}"))),
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Marker trait tying a Rust scalar to its [`DType`] and [`Storage`] variant.
///
/// Implemented for the closed element set only; generic constructors and
/// accessors dispatch through it instead of a per-dtype match at every call
/// site.
pub trait Element: Copy + Send + Sync + 'static {
    const DTYPE: DType;

    fn into_storage(data: Vec<Self>) -> Storage;
    fn storage_slice(storage: &Storage) -> Option<&[Self]>;
    fn to_f64(self) -> f64;
    /// C-style conversion: floats truncate toward zero for integer targets.
    fn from_f64(x: f64) -> Self;
}

macro_rules! element {
    ($rt:ty, $variant:ident) => {
        impl Element for $rt {
            const DTYPE: DType = DType::$variant;

            fn into_storage(data: Vec<Self>) -> Storage {
                Storage::$variant(data)
            }
            fn storage_slice(storage: &Storage) -> Option<&[Self]> {
                match storage {
                    Storage::$variant(data) => Some(data),
                    _ => None,
                }
            }
            fn to_f64(self) -> f64 {
                self as f64
            }
            fn from_f64(x: f64) -> Self {
                x as $rt
            }
        }
    };
}

element!(f32, F32);
element!(f64, F64);
element!(i32, I32);
element!(i64, I64);
element!(u8, U8);

impl Element for bool {
    const DTYPE: DType = DType::Bool;

    fn into_storage(data: Vec<Self>) -> Storage {
        Storage::Bool(data)
    }
    fn storage_slice(storage: &Storage) -> Option<&[Self]> {
        match storage {
            Storage::Bool(data) => Some(data),
            _ => None,
        }
    }
    fn to_f64(self) -> f64 {
        self as u8 as f64
    }
    fn from_f64(x: f64) -> Self {
        x != 0.0
    }
}
