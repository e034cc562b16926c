//! Derived-view construction: slice, permute, sub-array, and
//! tensor-along-dimension descriptors.
//!
//! Each builder is a pure transformation from one descriptor to another;
//! none of them touch element data. Buffer sharing is the container's
//! concern ([`crate::dense`]).

use crate::address;
use crate::descriptor::{normalize_dim, ShapeDescriptor};
use crate::error::ShapeError;
use crate::types::{Order, Shape, Strides};

/// Fix dimension `dim` of `desc` at `index`, removing it from the shape.
///
/// The view's offset advances by `index * strides[dim]`; all other
/// dimensions keep their strides. Slicing at `index == size(dim)` fails
/// (exclusive upper bound).
///
/// # Examples
///
/// ```
/// use tensile_core::{view, Order, ShapeDescriptor};
///
/// let d = ShapeDescriptor::contiguous(&[2, 3], Order::RowMajor).unwrap();
/// let row1 = view::slice_at(&d, 0, 1).unwrap();
/// assert_eq!(row1.shape(), &[3]);
/// assert_eq!(row1.offset(), 3);
/// ```
pub fn slice_at(desc: &ShapeDescriptor, dim: usize, index: usize) -> Result<ShapeDescriptor, ShapeError> {
    let rank = desc.rank();
    if dim >= rank {
        return Err(ShapeError::index_oob(dim as isize, rank, dim));
    }
    if index >= desc.shape()[dim] {
        return Err(ShapeError::index_oob(index as isize, desc.shape()[dim], dim));
    }
    let offset = (desc.offset() as isize + index as isize * desc.strides()[dim]) as usize;
    let shape: Shape = desc
        .shape()
        .iter()
        .enumerate()
        .filter(|&(d, _)| d != dim)
        .map(|(_, &s)| s)
        .collect();
    let strides: Strides = desc
        .strides()
        .iter()
        .enumerate()
        .filter(|&(d, _)| d != dim)
        .map(|(_, &s)| s)
        .collect();
    desc.derived(&shape, &strides, offset)
}

/// Validate that `axes` is a permutation of `0..rank`.
pub fn validate_permutation(axes: &[usize], rank: usize) -> Result<(), ShapeError> {
    let invalid = || ShapeError::InvalidPermutation {
        axes: axes.to_vec(),
        rank,
    };
    if axes.len() != rank {
        return Err(invalid());
    }
    let mut seen = vec![false; rank];
    for &a in axes {
        if a >= rank || seen[a] {
            return Err(invalid());
        }
        seen[a] = true;
    }
    Ok(())
}

/// Whether `axes` is the identity permutation.
pub fn is_identity(axes: &[usize]) -> bool {
    axes.iter().enumerate().all(|(i, &a)| i == a)
}

/// Reorder the dimensions of `desc` by `axes`.
///
/// Validates before applying; a failed permutation leaves nothing
/// half-reordered. The element-wise stride and order tag are re-derived,
/// since permutation generally breaks flat-stride contiguity.
pub fn permuted(desc: &ShapeDescriptor, axes: &[usize]) -> Result<ShapeDescriptor, ShapeError> {
    validate_permutation(axes, desc.rank())?;
    if is_identity(axes) {
        return Ok(desc.clone());
    }
    let shape: Shape = axes.iter().map(|&a| desc.shape()[a]).collect();
    let strides: Strides = axes.iter().map(|&a| desc.strides()[a]).collect();
    desc.derived(&shape, &strides, desc.offset())
}

/// Inverse of a permutation.
pub fn inverse_permutation(axes: &[usize]) -> Vec<usize> {
    let mut inv = vec![0; axes.len()];
    for (i, &a) in axes.iter().enumerate() {
        inv[a] = i;
    }
    inv
}

/// Construct a sub-array descriptor from externally-resolved per-dimension
/// `offsets`, `shape`, and `strides` (the output of index-expression
/// resolution).
///
/// Returns a clone of `desc` when the request is the whole view (target
/// shape equals the current shape and all offsets are zero). Otherwise the
/// absolute offset is the view's offset plus each dimension offset scaled
/// by the *current* strides, and the order tag is re-derived from the new
/// shape/strides.
pub fn sub_array(
    desc: &ShapeDescriptor,
    offsets: &[usize],
    shape: &[usize],
    strides: &[isize],
) -> Result<ShapeDescriptor, ShapeError> {
    let rank = desc.rank();
    if offsets.len() != rank || shape.len() != rank || strides.len() != rank {
        return Err(ShapeError::RankMismatch {
            expected: rank,
            got: offsets.len().min(shape.len()).min(strides.len()),
        });
    }
    if shape == desc.shape() && offsets.iter().all(|&o| o == 0) {
        return Ok(desc.clone());
    }
    let mut offset = desc.offset() as isize;
    for d in 0..rank {
        if offsets[d] >= desc.shape()[d] {
            return Err(ShapeError::index_oob(offsets[d] as isize, desc.shape()[d], d));
        }
        offset += offsets[d] as isize * desc.strides()[d];
    }
    desc.derived(shape, strides, offset as usize)
}

/// Normalize, deduplicate, and sort a tensor-along-dimension axis list.
pub fn normalize_tad_dims(dims: &[isize], rank: usize) -> Result<Vec<usize>, ShapeError> {
    let mut out = Vec::with_capacity(dims.len());
    for &d in dims {
        out.push(normalize_dim(d, rank)?);
    }
    out.sort_unstable();
    out.dedup();
    Ok(out)
}

/// Number of tensors along the given (already normalized) dimensions:
/// total length divided by the product of the selected sizes.
pub fn tad_count(desc: &ShapeDescriptor, dims: &[usize]) -> usize {
    let selected: usize = dims.iter().map(|&d| desc.shape()[d]).product();
    desc.len() / selected.max(1)
}

/// Descriptor of the `index`-th tensor along `dims`.
///
/// The selected dimensions are held as the result's axes; all others are
/// iterated. Built as the composition the rest of the system depends on:
/// permute the non-selected dimensions to the front (selected reversed to
/// the back), slice each leading dimension at the decomposed index, then
/// permute back so the selected dimensions appear in ascending original
/// order. The tad index decomposes over the non-selected dimensions in
/// row-major order (last one varies fastest).
pub fn tad(
    desc: &ShapeDescriptor,
    index: usize,
    dims: &[usize],
) -> Result<ShapeDescriptor, ShapeError> {
    let rank = desc.rank();
    let count = tad_count(desc, dims);
    if index >= count {
        return Err(ShapeError::index_oob(index as isize, count, 0));
    }

    let others: Vec<usize> = (0..rank).filter(|d| !dims.contains(d)).collect();
    let mut perm: Vec<usize> = others.clone();
    perm.extend(dims.iter().rev());
    let mut view = permuted(desc, &perm)?;

    // Decompose the tad index over the leading (non-selected) dimensions.
    let others_shape: Vec<usize> = others.iter().map(|&d| desc.shape()[d]).collect();
    let leading = address::linear_to_indices(&others_shape, index, Order::RowMajor)?;
    for &idx in leading.iter() {
        view = slice_at(&view, 0, idx)?;
    }

    // Restore ascending original order of the selected dimensions.
    let m = dims.len();
    let back: Vec<usize> = (0..m).rev().collect();
    permuted(&view, &back)
}
