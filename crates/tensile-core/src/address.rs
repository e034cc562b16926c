//! Element addressing: multi-index ↔ linear index ↔ buffer offset.
//!
//! These functions are the arithmetic every iteration path in the crate is
//! built on. `offset_for` maps a bounds-checked multi-index to an element
//! offset inside the view's buffer; the `linear_to_indices` /
//! `indices_to_linear` pair converts between flat positions and
//! multi-indices in either traversal order; `offset_of_linear` composes the
//! two. For all valid linear indices the round trip
//! `offset_for(linear_to_indices(i)) == offset_of_linear(i)` holds.

use crate::descriptor::ShapeDescriptor;
use crate::error::ShapeError;
use crate::types::{Order, Shape};

/// Buffer element offset of `indices` within `desc`'s view.
///
/// Requires exactly `rank` indices. Dimensions of size 1 contribute nothing
/// regardless of their stride, which makes addressing safe for broadcast
/// views whose singleton strides are meaningless.
///
/// # Examples
///
/// ```
/// use tensile_core::{address, Order, ShapeDescriptor};
///
/// let d = ShapeDescriptor::contiguous(&[2, 3], Order::RowMajor).unwrap();
/// assert_eq!(address::offset_for(&d, &[1, 2]).unwrap(), 5);
/// assert!(address::offset_for(&d, &[0, 3]).is_err());
/// ```
pub fn offset_for(desc: &ShapeDescriptor, indices: &[usize]) -> Result<usize, ShapeError> {
    let rank = desc.rank();
    if indices.len() != rank {
        return Err(ShapeError::RankMismatch {
            expected: rank,
            got: indices.len(),
        });
    }
    let shape = desc.shape();
    let strides = desc.strides();
    let mut offset = desc.offset() as isize;
    for dim in 0..rank {
        let idx = indices[dim];
        if idx >= shape[dim] {
            return Err(ShapeError::index_oob(idx as isize, shape[dim], dim));
        }
        if shape[dim] != 1 {
            offset += idx as isize * strides[dim];
        }
    }
    debug_assert!(offset >= 0, "negative-stride views must keep offsets in range");
    Ok(offset as usize)
}

/// Rank-2 fast path of [`offset_for`]; identical semantics, no index slice.
pub fn offset2(desc: &ShapeDescriptor, row: usize, col: usize) -> Result<usize, ShapeError> {
    require_rank(desc, 2)?;
    offset_fixed(desc, &[row, col])
}

/// Rank-3 fast path of [`offset_for`].
pub fn offset3(
    desc: &ShapeDescriptor,
    i: usize,
    j: usize,
    k: usize,
) -> Result<usize, ShapeError> {
    require_rank(desc, 3)?;
    offset_fixed(desc, &[i, j, k])
}

/// Rank-4 fast path of [`offset_for`].
pub fn offset4(
    desc: &ShapeDescriptor,
    i: usize,
    j: usize,
    k: usize,
    l: usize,
) -> Result<usize, ShapeError> {
    require_rank(desc, 4)?;
    offset_fixed(desc, &[i, j, k, l])
}

fn require_rank(desc: &ShapeDescriptor, expected: usize) -> Result<(), ShapeError> {
    if desc.rank() != expected {
        return Err(ShapeError::UnsupportedRank {
            expected,
            got: desc.rank(),
        });
    }
    Ok(())
}

fn offset_fixed(desc: &ShapeDescriptor, indices: &[usize]) -> Result<usize, ShapeError> {
    let shape = desc.shape();
    let strides = desc.strides();
    let mut offset = desc.offset() as isize;
    for (dim, &idx) in indices.iter().enumerate() {
        if idx >= shape[dim] {
            return Err(ShapeError::index_oob(idx as isize, shape[dim], dim));
        }
        if shape[dim] != 1 {
            offset += idx as isize * strides[dim];
        }
    }
    Ok(offset as usize)
}

/// Decompose a flat position into a multi-index over `shape`.
///
/// Row-major decomposition varies the last dimension fastest; column-major
/// varies the first fastest. `Either` decomposes row-major.
///
/// # Examples
///
/// ```
/// use tensile_core::{address, Order};
///
/// assert_eq!(
///     address::linear_to_indices(&[2, 3], 4, Order::RowMajor).unwrap().as_slice(),
///     &[1, 1]
/// );
/// assert_eq!(
///     address::linear_to_indices(&[2, 3], 4, Order::ColMajor).unwrap().as_slice(),
///     &[0, 2]
/// );
/// ```
pub fn linear_to_indices(shape: &[usize], linear: usize, order: Order) -> Result<Shape, ShapeError> {
    let len: usize = shape.iter().product();
    if linear >= len.max(1) {
        return Err(ShapeError::index_oob(linear as isize, len, 0));
    }
    let rank = shape.len();
    let mut indices = Shape::from_elem(0, rank);
    let mut rem = linear;
    if order.is_f() {
        for d in 0..rank {
            if shape[d] == 0 {
                continue;
            }
            indices[d] = rem % shape[d];
            rem /= shape[d];
        }
    } else {
        for d in (0..rank).rev() {
            if shape[d] == 0 {
                continue;
            }
            indices[d] = rem % shape[d];
            rem /= shape[d];
        }
    }
    Ok(indices)
}

/// Inverse of [`linear_to_indices`]: flat position of a multi-index.
pub fn indices_to_linear(
    shape: &[usize],
    indices: &[usize],
    order: Order,
) -> Result<usize, ShapeError> {
    if indices.len() != shape.len() {
        return Err(ShapeError::RankMismatch {
            expected: shape.len(),
            got: indices.len(),
        });
    }
    let mut linear = 0usize;
    if order.is_f() {
        let mut mul = 1usize;
        for d in 0..shape.len() {
            if indices[d] >= shape[d] {
                return Err(ShapeError::index_oob(indices[d] as isize, shape[d], d));
            }
            linear += indices[d] * mul;
            mul *= shape[d];
        }
    } else {
        let mut mul = 1usize;
        for d in (0..shape.len()).rev() {
            if indices[d] >= shape[d] {
                return Err(ShapeError::index_oob(indices[d] as isize, shape[d], d));
            }
            linear += indices[d] * mul;
            mul *= shape[d];
        }
    }
    Ok(linear)
}

/// Buffer offset of the `linear`-th logical element of `desc`, traversed in
/// the descriptor's own order.
pub fn offset_of_linear(desc: &ShapeDescriptor, linear: usize) -> Result<usize, ShapeError> {
    let indices = linear_to_indices(desc.shape(), linear, desc.order())?;
    offset_for(desc, &indices)
}
