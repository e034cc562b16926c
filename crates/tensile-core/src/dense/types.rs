//! Dense array type definition and basic accessors.
//!
//! This module defines the core `NdArray<T>` type: a shared element buffer
//! plus one [`ShapeDescriptor`]. Operations are organized in the sibling
//! modules.

use std::fmt;
use std::sync::Arc;

use num_traits::Num;
use parking_lot::RwLock;

use crate::descriptor::ShapeDescriptor;
use crate::layout;
use crate::types::{Order, Shape};

/// Shared element storage. Many views may hold the same buffer; element
/// writes through one view are visible through all of them.
pub(crate) type Buffer<T> = Arc<RwLock<Vec<T>>>;

/// Dense N-dimensional array: a buffer plus layout metadata.
///
/// `Clone` is cheap and produces another *view* of the same buffer (the
/// descriptor is copied, the elements are shared). Use
/// [`dup`](NdArray::dup) for a deep copy that breaks aliasing.
///
/// Rank normalization: constructors represent scalars as `[1, 1]` and bare
/// rank-1 shapes `[n]` as row vectors `[1, n]`.
///
/// # Examples
///
/// ```
/// use tensile_core::NdArray;
///
/// let a = NdArray::<f64>::zeros(&[2, 3, 4]);
/// assert_eq!(a.shape(), &[2, 3, 4]);
/// assert_eq!(a.rank(), 3);
/// ```
#[derive(Clone)]
pub struct NdArray<T> {
    pub(crate) buffer: Buffer<T>,
    pub(crate) desc: ShapeDescriptor,
}

impl<T> NdArray<T>
where
    T: Clone + Num,
{
    /// Assemble an array from an existing buffer and descriptor.
    pub(crate) fn from_parts(buffer: Buffer<T>, desc: ShapeDescriptor) -> Self {
        Self { buffer, desc }
    }

    /// Another view of the same buffer with the same layout.
    pub(crate) fn view_with(&self, desc: ShapeDescriptor) -> Self {
        Self {
            buffer: Arc::clone(&self.buffer),
            desc,
        }
    }

    /// The layout descriptor of this view.
    pub fn descriptor(&self) -> &ShapeDescriptor {
        &self.desc
    }

    /// Replace this view's descriptor. Only this view observes the
    /// replacement; buffer-sharing views keep their own descriptors.
    pub(crate) fn replace_descriptor(&mut self, desc: ShapeDescriptor) {
        self.desc = desc;
    }

    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        self.desc.rank()
    }

    /// Dimension sizes.
    pub fn shape(&self) -> &[usize] {
        self.desc.shape()
    }

    /// Per-dimension element strides.
    pub fn strides(&self) -> &[isize] {
        self.desc.strides()
    }

    /// Element offset of index zero within the buffer.
    pub fn offset(&self) -> usize {
        self.desc.offset()
    }

    /// Traversal-order tag of this view.
    pub fn order(&self) -> Order {
        self.desc.order()
    }

    /// Flat-iteration stride, or the −1 sentinel. Kernels use this to pick
    /// the fast flat path over general multi-index iteration.
    pub fn element_wise_stride(&self) -> isize {
        self.desc.element_wise_stride()
    }

    /// Total number of logical elements.
    pub fn len(&self) -> usize {
        self.desc.len()
    }

    /// Whether the view holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this array is a scalar (`[1, 1]` after normalization).
    pub fn is_scalar(&self) -> bool {
        self.desc.is_scalar()
    }

    /// Whether this array is a row or column vector (rank 2, one axis of
    /// size 1, more than one element).
    pub fn is_vector(&self) -> bool {
        self.rank() == 2
            && (self.shape()[0] == 1 || self.shape()[1] == 1)
            && self.len() > 1
    }

    /// Whether this array is a `[1, n]` row vector.
    pub fn is_row_vector(&self) -> bool {
        self.is_vector() && self.shape()[0] == 1
    }

    /// Whether this array is an `[n, 1]` column vector.
    pub fn is_column_vector(&self) -> bool {
        self.is_vector() && self.shape()[1] == 1
    }

    /// Whether this array is a true matrix: rank 2 and not a vector or
    /// scalar.
    pub fn is_matrix(&self) -> bool {
        self.rank() == 2 && !self.is_vector() && !self.is_scalar()
    }

    /// Row count of a rank-2 array.
    pub fn rows(&self) -> anyhow::Result<usize> {
        if self.rank() != 2 {
            anyhow::bail!("rows() requires rank 2, array has rank {}", self.rank());
        }
        Ok(self.shape()[0])
    }

    /// Column count of a rank-2 array.
    pub fn columns(&self) -> anyhow::Result<usize> {
        if self.rank() != 2 {
            anyhow::bail!("columns() requires rank 2, array has rank {}", self.rank());
        }
        Ok(self.shape()[1])
    }

    /// Number of leading size-1 dimensions.
    pub fn leading_ones(&self) -> usize {
        self.desc.leading_ones()
    }

    /// Number of trailing size-1 dimensions.
    pub fn trailing_ones(&self) -> usize {
        self.desc.trailing_ones()
    }

    /// Whether this array is a view: it does not own its whole buffer
    /// exclusively (non-zero offset, covers fewer elements than the buffer
    /// holds, or shares the buffer with other views).
    pub fn is_view(&self) -> bool {
        self.offset() > 0
            || self.len() < self.buffer.read().len()
            || Arc::strong_count(&self.buffer) > 1
    }

    /// Strict contiguity in the buffer under `order`: dense unit-stride
    /// block, usable directly by native BLAS when also at offset zero.
    pub fn is_contiguous_in_buffer(&self, order: Order) -> bool {
        layout::is_contiguous(self.shape(), self.strides(), order)
    }

    /// Relaxed BLAS monotonicity check: strides descend in C order or
    /// ascend in F order, ignoring size-1 dimensions.
    pub fn stride_descending_c_ascending_f(&self, order: Order) -> bool {
        layout::stride_descending_c_ascending_f(self.shape(), self.strides(), order)
    }
}

/// Apply the rank normalization convention: `[]` becomes `[1, 1]`, a bare
/// `[n]` becomes the row vector `[1, n]`, everything else is unchanged.
pub(crate) fn normalize_shape(shape: &[usize]) -> Shape {
    match shape.len() {
        0 => Shape::from_slice(&[1, 1]),
        1 => Shape::from_slice(&[1, shape[0]]),
        _ => Shape::from_slice(shape),
    }
}

impl<T> fmt::Debug for NdArray<T>
where
    T: Clone + Num + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Cap element dumps so large arrays stay printable.
        const SUMMARY_CAP: usize = 64;
        write!(
            f,
            "NdArray {{ shape: {:?}, order: '{}', offset: {} }}",
            self.shape(),
            self.order().to_char(),
            self.offset()
        )?;
        if self.len() <= SUMMARY_CAP {
            write!(f, " {:?}", self.to_vec_row_major())?;
        }
        Ok(())
    }
}
