//! The no-copy reshape algorithm.
//!
//! Given a source descriptor and a target shape, [`try_reshape_no_copy`]
//! either derives strides that let the same buffer be read with the new
//! shape, or reports that the elements must be copied. The strategy is the
//! classic one: partition old and new dimensions into maximal groups of
//! equal product, require each old group to be one contiguous run in the
//! requested order, and rebuild strides inside each new group by cumulative
//! multiplication.
//!
//! A `None` outcome is not a failure. It means the view's memory is laid
//! out such that no stride assignment can express the target shape, and the
//! caller must fall back to an element-by-element copy.

use crate::descriptor::{checked_len, ShapeDescriptor};
use crate::error::ShapeError;
use crate::layout;
use crate::types::{Order, Strides, NO_EWS};

/// Attempt to reshape `desc` to `new_shape` without copying.
///
/// Returns `Ok(None)` when a copy is required. Returns an error only for
/// the hard precondition violations: mismatched total element count or an
/// overflowing target shape.
///
/// # Examples
///
/// ```
/// use tensile_core::{reshape, Order, ShapeDescriptor};
///
/// let d = ShapeDescriptor::contiguous(&[2, 3, 4], Order::RowMajor).unwrap();
/// let r = reshape::try_reshape_no_copy(&d, &[6, 4], false).unwrap().unwrap();
/// assert_eq!(r.shape(), &[6, 4]);
/// assert_eq!(r.strides(), &[4, 1]);
///
/// // A transposed view cannot be flattened in place.
/// let t = ShapeDescriptor::create(&[3, 2], &[1, 3], 0, -1, Order::ColMajor).unwrap();
/// assert!(reshape::try_reshape_no_copy(&t, &[6], false).unwrap().is_none());
/// ```
pub fn try_reshape_no_copy(
    desc: &ShapeDescriptor,
    new_shape: &[usize],
    f_order: bool,
) -> Result<Option<ShapeDescriptor>, ShapeError> {
    let new_len = checked_len(new_shape)?;
    let old_len = desc.len();
    if new_len != old_len {
        return Err(ShapeError::shape_mismatch(old_len, new_len, new_shape));
    }

    // Fast paths: identical shape, or a single-element view, reuse the
    // source layout directly.
    if new_shape == desc.shape() {
        return Ok(Some(desc.clone()));
    }
    if old_len <= 1 {
        let strides = layout::contiguous_strides(new_shape, order_of(f_order));
        return Ok(Some(ShapeDescriptor::create(
            new_shape,
            &strides,
            desc.offset(),
            1,
            order_of(f_order),
        )?));
    }

    // Dimensions of size 1 never constrain the layout; strip them.
    let (old_dims, old_strides): (Vec<usize>, Vec<isize>) = desc
        .shape()
        .iter()
        .zip(desc.strides().iter())
        .filter(|(&s, _)| s != 1)
        .map(|(&s, &st)| (s, st))
        .unzip();
    let old_nd = old_dims.len();
    let new_nd = new_shape.len();

    let mut new_strides: Strides = Strides::from_elem(0, new_nd);

    // Walk both dimension lists, closing a group each time the running
    // products agree.
    let mut oi = 0;
    let mut oj = 1;
    let mut ni = 0;
    let mut nj = 1;
    while ni < new_nd && oi < old_nd {
        let mut np = new_shape[ni];
        let mut op = old_dims[oi];
        while np != op {
            if np < op {
                np *= new_shape[nj];
                nj += 1;
            } else {
                op *= old_dims[oj];
                oj += 1;
            }
        }

        // The old group must be one contiguous run in the requested order.
        for k in oi..oj - 1 {
            if f_order {
                if old_strides[k + 1] != old_dims[k] as isize * old_strides[k] {
                    return Ok(None);
                }
            } else if old_strides[k] != old_dims[k + 1] as isize * old_strides[k + 1] {
                return Ok(None);
            }
        }

        // Rebuild strides inside the new group by cumulative multiplication.
        if f_order {
            new_strides[ni] = old_strides[oi];
            for k in ni + 1..nj {
                new_strides[k] = new_strides[k - 1] * new_shape[k - 1] as isize;
            }
        } else {
            new_strides[nj - 1] = old_strides[oj - 1];
            for k in (ni..nj - 1).rev() {
                new_strides[k] = new_strides[k + 1] * new_shape[k + 1] as isize;
            }
        }

        ni = nj;
        nj += 1;
        oi = oj;
        oj += 1;
    }

    // Trailing size-1 dimensions of the new shape inherit the last computed
    // stride, or the source's element stride when no groups were consumed.
    let mut last_stride = if ni >= 1 {
        new_strides[ni - 1]
    } else {
        match desc.element_wise_stride() {
            NO_EWS => 1,
            ews => ews,
        }
    };
    if f_order && ni >= 1 {
        last_stride *= new_shape[ni - 1] as isize;
    }
    for k in ni..new_nd {
        new_strides[k] = last_stride;
    }

    let order = order_of(f_order);
    let ews = layout::element_wise_stride(new_shape, &new_strides, f_order);
    Ok(Some(ShapeDescriptor::create(
        new_shape,
        &new_strides,
        desc.offset(),
        ews,
        order,
    )?))
}

fn order_of(f_order: bool) -> Order {
    if f_order {
        Order::ColMajor
    } else {
        Order::RowMajor
    }
}
