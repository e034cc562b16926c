//! The packed shape/stride/offset metadata record.
//!
//! A [`ShapeDescriptor`] is the single source of truth for how a view maps
//! logical indices onto its buffer: rank, per-dimension sizes, per-dimension
//! element strides, the element offset of index zero, the cached element-wise
//! stride, and the traversal-order tag.
//!
//! Descriptors are immutable value objects. Views may share or cache them, so
//! every shape-changing operation builds a fresh descriptor via
//! [`ShapeDescriptor::create`] instead of editing fields in place.

use std::fmt;

use crate::error::ShapeError;
use crate::layout;
use crate::types::{Order, Shape, Strides};

/// Immutable layout metadata of one N-dimensional view.
///
/// # Examples
///
/// ```
/// use tensile_core::{Order, ShapeDescriptor};
///
/// let desc = ShapeDescriptor::contiguous(&[2, 3, 4], Order::RowMajor).unwrap();
/// assert_eq!(desc.rank(), 3);
/// assert_eq!(desc.strides(), &[12, 4, 1]);
/// assert_eq!(desc.element_wise_stride(), 1);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ShapeDescriptor {
    shape: Shape,
    strides: Strides,
    offset: usize,
    element_wise_stride: isize,
    order: Order,
}

impl ShapeDescriptor {
    /// Create a descriptor from explicit fields.
    ///
    /// Validates that `shape` and `strides` have equal length and that the
    /// total element count is representable without overflow.
    pub fn create(
        shape: &[usize],
        strides: &[isize],
        offset: usize,
        element_wise_stride: isize,
        order: Order,
    ) -> Result<Self, ShapeError> {
        if shape.len() != strides.len() {
            return Err(ShapeError::RankMismatch {
                expected: shape.len(),
                got: strides.len(),
            });
        }
        checked_len(shape)?;
        Ok(Self {
            shape: Shape::from_slice(shape),
            strides: Strides::from_slice(strides),
            offset,
            element_wise_stride,
            order,
        })
    }

    /// Create a dense descriptor at offset zero with standard strides for
    /// the given order. The element-wise stride of a dense layout is 1.
    pub fn contiguous(shape: &[usize], order: Order) -> Result<Self, ShapeError> {
        checked_len(shape)?;
        let strides = layout::contiguous_strides(shape, order);
        Self::create(shape, &strides, 0, 1, order)
    }

    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Dimension sizes.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Per-dimension element strides.
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    /// Element offset into the buffer where index zero of this view begins.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Cached flat-iteration stride, or [`crate::types::NO_EWS`] when the
    /// view cannot be walked with a single constant stride.
    pub fn element_wise_stride(&self) -> isize {
        self.element_wise_stride
    }

    /// Traversal-order tag.
    pub fn order(&self) -> Order {
        self.order
    }

    /// Total number of logical elements (product of the shape).
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    /// Whether the view holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this descriptor denotes a scalar: a single element at rank
    /// at most 2 (the crate normalizes scalars to `[1, 1]`).
    pub fn is_scalar(&self) -> bool {
        self.rank() <= 2 && self.len() == 1
    }

    /// Size of dimension `dim`, with negative indexing (`-1` is the last
    /// dimension).
    ///
    /// Scalars accept any `dim` in `{-1, 0, 1}` and report 1, so rank-2
    /// `[1, 1]` scalars answer vector- and matrix-style queries alike.
    ///
    /// # Examples
    ///
    /// ```
    /// use tensile_core::{Order, ShapeDescriptor};
    ///
    /// let d = ShapeDescriptor::contiguous(&[2, 3], Order::RowMajor).unwrap();
    /// assert_eq!(d.size(-1).unwrap(), 3);
    /// assert!(d.size(2).is_err());
    /// ```
    pub fn size(&self, dim: isize) -> Result<usize, ShapeError> {
        if self.is_scalar() && (-1..=1).contains(&dim) {
            return Ok(1);
        }
        let d = normalize_dim(dim, self.rank())?;
        Ok(self.shape[d])
    }

    /// Stride of dimension `dim`, with negative indexing.
    pub fn stride_of(&self, dim: isize) -> Result<isize, ShapeError> {
        let d = normalize_dim(dim, self.rank())?;
        Ok(self.strides[d])
    }

    /// Number of leading dimensions of size 1.
    pub fn leading_ones(&self) -> usize {
        self.shape.iter().take_while(|&&s| s == 1).count()
    }

    /// Number of trailing dimensions of size 1.
    pub fn trailing_ones(&self) -> usize {
        self.shape.iter().rev().take_while(|&&s| s == 1).count()
    }

    /// Flat packed representation, the canonical serialization header:
    /// `[rank, shape.., strides.., offset, elementWiseStride, order]`.
    ///
    /// The order is encoded as the unicode value of its character code.
    pub fn to_packed(&self) -> Vec<i64> {
        let rank = self.rank();
        let mut out = Vec::with_capacity(2 * rank + 4);
        out.push(rank as i64);
        out.extend(self.shape.iter().map(|&s| s as i64));
        out.extend(self.strides.iter().map(|&s| s as i64));
        out.push(self.offset as i64);
        out.push(self.element_wise_stride as i64);
        out.push(self.order.to_char() as i64);
        out
    }

    /// Rebuild a descriptor from its packed representation.
    pub fn from_packed(packed: &[i64]) -> Result<Self, ShapeError> {
        if packed.is_empty() {
            return Err(ShapeError::RankMismatch {
                expected: 1,
                got: 0,
            });
        }
        let rank = packed[0] as usize;
        let expected = 2 * rank + 4;
        if packed.len() != expected {
            return Err(ShapeError::RankMismatch {
                expected,
                got: packed.len(),
            });
        }
        let shape: Vec<usize> = packed[1..1 + rank].iter().map(|&v| v as usize).collect();
        let strides: Vec<isize> = packed[1 + rank..1 + 2 * rank]
            .iter()
            .map(|&v| v as isize)
            .collect();
        let offset = packed[1 + 2 * rank] as usize;
        let ews = packed[2 + 2 * rank] as isize;
        let order_code = packed[3 + 2 * rank];
        let order = char::from_u32(order_code as u32)
            .and_then(Order::from_char)
            .unwrap_or(Order::RowMajor);
        Self::create(&shape, &strides, offset, ews, order)
    }

    /// Build the replacement descriptor for the same buffer region with new
    /// shape and strides, re-deriving the element-wise stride and order.
    pub(crate) fn derived(
        &self,
        shape: &[usize],
        strides: &[isize],
        offset: usize,
    ) -> Result<Self, ShapeError> {
        let order = layout::infer_order(shape, strides);
        let ews = layout::element_wise_stride(shape, strides, order.is_f());
        Self::create(shape, strides, offset, ews, order)
    }
}

impl fmt::Debug for ShapeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ShapeDescriptor {{ shape: {:?}, strides: {:?}, offset: {}, ews: {}, order: '{}' }}",
            self.shape.as_slice(),
            self.strides.as_slice(),
            self.offset,
            self.element_wise_stride,
            self.order.to_char()
        )
    }
}

/// Normalize a possibly-negative dimension index against `rank`.
pub fn normalize_dim(dim: isize, rank: usize) -> Result<usize, ShapeError> {
    let adjusted = if dim < 0 { dim + rank as isize } else { dim };
    if adjusted < 0 || adjusted as usize >= rank {
        return Err(ShapeError::index_oob(dim, rank, 0));
    }
    Ok(adjusted as usize)
}

/// Total length of `shape`, rejecting products that overflow `usize`.
pub(crate) fn checked_len(shape: &[usize]) -> Result<usize, ShapeError> {
    let mut len: usize = 1;
    for &s in shape {
        len = len.checked_mul(s).ok_or_else(|| ShapeError::Overflow {
            shape: shape.to_vec(),
        })?;
    }
    // Offsets are computed in i64 space downstream.
    if len > i64::MAX as usize {
        return Err(ShapeError::Overflow {
            shape: shape.to_vec(),
        });
    }
    Ok(len)
}
