//! Error types for layout and view operations.
//!
//! Every failure here is a hard, immediately-surfaced precondition
//! violation; there are no transient failures and no retry paths. The
//! no-copy reshape's "copy required" outcome is deliberately *not* an
//! error — it is modeled as `Option::None` by [`crate::reshape`].

use thiserror::Error;

/// Failures of the shape/stride/view core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// Total element counts of two shapes disagree (reshape, assign).
    #[error("shape mismatch: expected total length {expected}, got {got} (target shape {shape:?})")]
    ShapeMismatch {
        expected: usize,
        got: usize,
        shape: Vec<usize>,
    },

    /// A dimension index exceeded its bound.
    #[error("index {index} out of range for dimension {dim} of size {bound}")]
    IndexOutOfRange {
        index: isize,
        bound: usize,
        dim: usize,
    },

    /// Argument to permute was not a permutation of `0..rank`.
    #[error("invalid permutation {axes:?} for rank {rank}")]
    InvalidPermutation { axes: Vec<usize>, rank: usize },

    /// A rank-specialized fast path was called with the wrong rank.
    #[error("unsupported rank: operation requires rank {expected}, array has rank {got}")]
    UnsupportedRank { expected: usize, got: usize },

    /// Number of indices (or per-dimension arguments) disagrees with rank.
    #[error("rank mismatch: expected {expected} entries, got {got}")]
    RankMismatch { expected: usize, got: usize },

    /// A computed length or offset would exceed the representable range.
    #[error("numeric overflow computing length or offset for shape {shape:?}")]
    Overflow { shape: Vec<usize> },
}

impl ShapeError {
    pub(crate) fn shape_mismatch(expected: usize, got: usize, shape: &[usize]) -> Self {
        ShapeError::ShapeMismatch {
            expected,
            got,
            shape: shape.to_vec(),
        }
    }

    pub(crate) fn index_oob(index: isize, bound: usize, dim: usize) -> Self {
        ShapeError::IndexOutOfRange { index, bound, dim }
    }
}
