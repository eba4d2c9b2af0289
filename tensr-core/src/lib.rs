//! Tensr is a dense, strided, typed tensor runtime for the CPU.
//!
//! Tensors carry a shape, row-major strides, a dtype from a closed set
//! (float32/float64/int32/int64/uint8/bool), and a device tag. Buffers are
//! reference counted: shape transforms like [`Tensor::reshape`] and
//! [`Tensor::transpose`] return views that share the underlying storage, and
//! the buffer is freed exactly when the last owner or view is dropped.
//!
//! Element-wise math, reductions, matrix multiplication, random
//! initialization, and a small binary persistence format are built in.
//! Every operation walks a view's strides, so a transposed matrix behaves
//! exactly like its materialized copy.
//!
//! ```
//! use tensr_core::{DType, Device, Tensor};
//!
//! # fn main() -> tensr_core::Result<()> {
//! let a = Tensor::ones([2, 3], DType::F32, Device::Cpu)?;
//! let b = Tensor::full([2, 3], 2.0, DType::F32, Device::Cpu)?;
//! let c = a.add(&b)?;
//!
//! let total = c.sum(&[], false)?;
//! assert_eq!(total.to_flat_vec::<f32>()?, vec![18.0]);
//!
//! let t = c.reshape([3, 2])?.transpose(&[])?;
//! assert_eq!(t.dims(), &[2, 3]);
//! assert!(t.shares_storage(&c));
//! # Ok(())
//! # }
//! ```

mod device;
mod dtype;
mod error;
pub mod io;
mod layout;
mod linalg;
mod ops;
mod rng;
mod storage;
mod tensor;
mod transform;

pub use device::{device_count, synchronize, Device};
pub use dtype::{DType, Element};
pub use error::{Error, Result};
pub use layout::Shape;
pub use rng::TensorRng;
pub use storage::Storage;
pub use tensor::Tensor;
