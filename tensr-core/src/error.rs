use std::fmt::Display;

use crate::DType;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("allocation of {bytes} bytes failed")]
    Allocation { bytes: usize },

    #[error("{op}: shape mismatch, lhs {lhs:?} rhs {rhs:?}")]
    ShapeMismatch {
        op: &'static str,
        lhs: Vec<usize>,
        rhs: Vec<usize>,
    },

    #[error("{op}: dtype mismatch, lhs {lhs} rhs {rhs}")]
    DTypeMismatch {
        op: &'static str,
        lhs: DType,
        rhs: DType,
    },

    #[error("{op}: expected rank {expected}, got {got}")]
    RankMismatch {
        op: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("{op}: axis {axis} out of range for rank {rank}")]
    InvalidAxis {
        op: &'static str,
        axis: usize,
        rank: usize,
    },

    #[error("{op}: index {index} out of bounds for dimension of size {dim}")]
    IndexOutOfBounds {
        op: &'static str,
        index: usize,
        dim: usize,
    },

    #[error("{op} is not supported for dtype {dtype}")]
    UnsupportedDType { op: &'static str, dtype: DType },

    #[error("{op}: {reason}")]
    Degenerate { op: &'static str, reason: String },

    #[error("{op} requires a contiguous tensor, strides {strides:?}")]
    NonContiguous {
        op: &'static str,
        strides: Vec<usize>,
    },

    /// Capability point declared by the API but not implemented in the core.
    #[error("{0} is not implemented in the core")]
    Unsupported(&'static str),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Message: {0}")]
    Msg(String),

    #[error("{inner}\n{backtrace}")]
    WithBacktrace {
        inner: Box<Self>,
        backtrace: Box<std::backtrace::Backtrace>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new error based on a printable error message.
    pub fn msg<M: Display>(msg: M) -> Self {
        Self::Msg(msg.to_string()).bt()
    }

    pub fn bt(self) -> Self {
        let backtrace = std::backtrace::Backtrace::capture();
        match backtrace.status() {
            std::backtrace::BacktraceStatus::Disabled
            | std::backtrace::BacktraceStatus::Unsupported => self,
            _ => Self::WithBacktrace {
                inner: Box::new(self),
                backtrace: Box::new(backtrace),
            },
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::IoError(value.to_string())
    }
}
