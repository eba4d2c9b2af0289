//! Binary persistence.
//!
//! Layout, all fields native-endian:
//!
//! ```text
//! rank      usize
//! dtype     u32 code (see DType)
//! size      usize (element count, redundant with the dims)
//! dims      rank x usize
//! elements  size x element, raw bytes; bool stored as one byte, 0 or 1
//! ```
//!
//! The format is not portable across machines with different endianness or
//! word size. Saving a non-contiguous view writes its elements in logical
//! row-major order, so loading always yields an owning contiguous tensor.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::storage::Storage;
use crate::tensor::from_storage;
use crate::{DType, Device, Error, Result, Shape, Tensor};

fn write_usize<W: Write>(w: &mut W, v: usize) -> Result<()> {
    w.write_all(&v.to_ne_bytes())?;
    Ok(())
}

fn read_usize<R: Read>(r: &mut R) -> Result<usize> {
    let mut buf = [0u8; std::mem::size_of::<usize>()];
    r.read_exact(&mut buf)?;
    Ok(usize::from_ne_bytes(buf))
}

fn read_u32<R: Read>(r: &mut R) -> Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_ne_bytes(buf))
}

macro_rules! write_elems {
    ($w:expr, $data:expr) => {
        for v in $data {
            $w.write_all(&v.to_ne_bytes())?;
        }
    };
}

macro_rules! read_elems {
    ($r:expr, $t:ty, $size:expr) => {{
        let mut buf: Vec<$t> = Vec::new();
        buf.try_reserve_exact($size).map_err(|_| Error::Allocation {
            bytes: $size * std::mem::size_of::<$t>(),
        })?;
        let mut bytes = [0u8; std::mem::size_of::<$t>()];
        for _ in 0..$size {
            $r.read_exact(&mut bytes)?;
            buf.push(<$t>::from_ne_bytes(bytes));
        }
        buf
    }};
}

/// Write `tensor` to `path`, elements in logical row-major order.
pub fn save<P: AsRef<Path>>(tensor: &Tensor, path: P) -> Result<()> {
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);

    write_usize(&mut w, tensor.rank())?;
    w.write_all(&tensor.dtype().to_code().to_ne_bytes())?;
    write_usize(&mut w, tensor.size())?;
    for &dim in tensor.dims() {
        write_usize(&mut w, dim)?;
    }

    let guard = tensor.storage()?;
    match &*guard {
        Storage::F32(d) => write_elems!(w, tensor.gather(d)?),
        Storage::F64(d) => write_elems!(w, tensor.gather(d)?),
        Storage::I32(d) => write_elems!(w, tensor.gather(d)?),
        Storage::I64(d) => write_elems!(w, tensor.gather(d)?),
        Storage::U8(d) => w.write_all(&tensor.gather(d)?)?,
        Storage::Bool(d) => {
            for v in tensor.gather(d)? {
                w.write_all(&[v as u8])?;
            }
        }
    }
    drop(guard);
    w.flush()?;
    Ok(())
}

/// Read a tensor from `path`. The result is an owning, contiguous CPU
/// tensor; the header's size field must agree with the dims.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Tensor> {
    let file = File::open(path)?;
    let mut r = BufReader::new(file);

    let rank = read_usize(&mut r)?;
    let dtype = DType::from_code(read_u32(&mut r)?)?;
    let size = read_usize(&mut r)?;
    let mut dims = Vec::with_capacity(rank.min(64));
    for _ in 0..rank {
        dims.push(read_usize(&mut r)?);
    }
    let shape = Shape::new(dims);
    if shape.num_elements() != size {
        return Err(Error::ShapeMismatch {
            op: "load",
            lhs: vec![size],
            rhs: shape.dims().to_vec(),
        });
    }

    let storage = match dtype {
        DType::F32 => Storage::F32(read_elems!(r, f32, size)),
        DType::F64 => Storage::F64(read_elems!(r, f64, size)),
        DType::I32 => Storage::I32(read_elems!(r, i32, size)),
        DType::I64 => Storage::I64(read_elems!(r, i64, size)),
        DType::U8 => Storage::U8(read_elems!(r, u8, size)),
        DType::Bool => {
            let raw = read_elems!(r, u8, size);
            Storage::Bool(raw.into_iter().map(|b| b != 0).collect())
        }
    };
    Ok(from_storage(storage, shape, Device::Cpu))
}
