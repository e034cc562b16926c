//! Layout analysis: contiguity, order inference, and the element-wise
//! stride collapse.
//!
//! Everything here is a pure function of `(shape, strides)` slices; nothing
//! reads or writes a descriptor. The two central routines are
//! [`element_wise_stride`], which decides whether a strided view can be
//! walked with one constant stride, and [`infer_order`], which classifies a
//! shape/stride pair as row-major, column-major, or either.

use crate::types::{Order, Strides, NO_EWS};

/// Standard dense strides for `shape` under `order`, at offset zero.
///
/// Row-major strides descend (`[12, 4, 1]` for `[2, 3, 4]`); column-major
/// strides ascend (`[1, 2, 6]`). `Either` is resolved as row-major.
pub fn contiguous_strides(shape: &[usize], order: Order) -> Strides {
    let rank = shape.len();
    let mut strides = Strides::from_elem(1, rank);
    if order.is_f() {
        let mut acc = 1isize;
        for d in 0..rank {
            strides[d] = acc;
            acc *= shape[d].max(1) as isize;
        }
    } else {
        let mut acc = 1isize;
        for d in (0..rank).rev() {
            strides[d] = acc;
            acc *= shape[d].max(1) as isize;
        }
    }
    strides
}

/// Compute the single flat-iteration stride of a view, or [`NO_EWS`] when
/// no such stride exists.
///
/// Size-1 dimensions never affect contiguity and are stripped first. The
/// remaining axes are greedily merged innermost-out: two adjacent axes fuse
/// when the outer one steps exactly one block of the inner one
/// (`strides[k] == strides[k+1] * shape[k+1]` for row-major, mirrored for
/// column-major). If every axis fuses into a single run, its innermost
/// stride is the element-wise stride.
///
/// # Examples
///
/// ```
/// use tensile_core::layout::element_wise_stride;
///
/// // Dense C-order [2,3,4]
/// assert_eq!(element_wise_stride(&[2, 3, 4], &[12, 4, 1], false), 1);
/// // Every-other-element vector view: still flat, stride 2
/// assert_eq!(element_wise_stride(&[4], &[2], false), 2);
/// // Transposed C-order matrix: no single flat stride
/// assert_eq!(element_wise_stride(&[3, 2], &[1, 3], false), -1);
/// ```
pub fn element_wise_stride(shape: &[usize], strides: &[isize], f_order: bool) -> isize {
    debug_assert_eq!(shape.len(), strides.len());
    let mut dims: Vec<(usize, isize)> = shape
        .iter()
        .zip(strides.iter())
        .filter(|(&s, _)| s != 1)
        .map(|(&s, &st)| (s, st))
        .collect();
    if dims.is_empty() {
        // Single element (or empty): any stride walks it.
        return 1;
    }
    if f_order {
        dims.reverse();
    }
    // dims is now innermost-last for the requested order; merge outward.
    let n = dims.len();
    for k in (1..n).rev() {
        let (inner_size, inner_stride) = dims[k];
        let (_, outer_stride) = dims[k - 1];
        if outer_stride != inner_stride * inner_size as isize {
            return NO_EWS;
        }
    }
    dims[n - 1].1
}

/// Infer the traversal order of a shape/stride pair, with a unit base
/// element stride. See [`infer_order_with_base`].
pub fn infer_order(shape: &[usize], strides: &[isize]) -> Order {
    infer_order_with_base(shape, strides, 1)
}

/// Infer the traversal order of a shape/stride pair.
///
/// Scans from the innermost dimension outward for the classic descending-C
/// and ascending-F cumulative stride patterns, starting from
/// `element_stride`. Returns [`Order::Either`] when both hold (all
/// dimensions of size 1, vectors), and falls back to [`Order::RowMajor`]
/// when neither holds. The fallback is a documented approximation for
/// irregular layouts, not a contiguity guarantee; use [`is_contiguous`] when
/// a guarantee is required.
pub fn infer_order_with_base(shape: &[usize], strides: &[isize], element_stride: isize) -> Order {
    let rank = shape.len();

    let mut c_holds = true;
    let mut expected = element_stride;
    for d in (0..rank).rev() {
        if shape[d] == 1 {
            continue;
        }
        if strides[d] != expected {
            c_holds = false;
            break;
        }
        expected *= shape[d] as isize;
    }

    let mut f_holds = true;
    let mut expected = element_stride;
    for d in 0..rank {
        if shape[d] == 1 {
            continue;
        }
        if strides[d] != expected {
            f_holds = false;
            break;
        }
        expected *= shape[d] as isize;
    }

    match (c_holds, f_holds) {
        (true, true) => Order::Either,
        (true, false) => Order::RowMajor,
        (false, true) => Order::ColMajor,
        // Irregular layout: report row-major as the documented fallback.
        (false, false) => Order::RowMajor,
    }
}

/// Strict contiguity test: the view's elements occupy one dense unit-stride
/// block in the buffer when traversed in `order`.
pub fn is_contiguous(shape: &[usize], strides: &[isize], order: Order) -> bool {
    let expected = contiguous_strides(shape, order);
    shape
        .iter()
        .zip(strides.iter().zip(expected.iter()))
        .all(|(&s, (&got, &want))| s == 1 || got == want)
}

/// Whether strides descend in C order or ascend in F order, ignoring size-1
/// dimensions. This is the relaxed monotonicity check BLAS callers use to
/// decide whether a view is directly consumable.
pub fn stride_descending_c_ascending_f(shape: &[usize], strides: &[isize], order: Order) -> bool {
    let active: Vec<isize> = shape
        .iter()
        .zip(strides.iter())
        .filter(|(&s, _)| s != 1)
        .map(|(_, &st)| st)
        .collect();
    if active.len() < 2 {
        return true;
    }
    if order.is_f() {
        active.windows(2).all(|w| w[0] <= w[1])
    } else {
        active.windows(2).all(|w| w[0] >= w[1])
    }
}
