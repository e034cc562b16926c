//! Shape manipulation: reshape, permute, transpose, and their variants.
//!
//! Reshape first attempts the no-copy stride derivation; only when the
//! view's memory layout cannot express the target shape does it fall back
//! to an element copy in the requested order. Both paths produce identical
//! logical contents.

use num_traits::Num;

use super::types::NdArray;
use crate::reshape::try_reshape_no_copy;
use crate::types::Order;
use crate::view;

impl<T> NdArray<T>
where
    T: Clone + Num,
{
    /// Reshape to `new_shape`, row-major.
    ///
    /// Zero-copy when the layout permits; otherwise the elements are copied
    /// once. The total element count must match.
    ///
    /// # Examples
    ///
    /// ```
    /// use tensile_core::NdArray;
    ///
    /// let a = NdArray::from_vec((1..=6).map(f64::from).collect(), &[2, 3]).unwrap();
    /// let r = a.reshape(&[3, 2]).unwrap();
    /// assert_eq!(r.shape(), &[3, 2]);
    /// assert_eq!(r.at(&[1, 1]).unwrap(), 4.0);
    /// assert!(a.reshape(&[4]).is_err());
    /// ```
    pub fn reshape(&self, new_shape: &[usize]) -> anyhow::Result<Self> {
        self.reshape_with_order(new_shape, Order::RowMajor)
    }

    /// Reshape reading/writing elements in the given order.
    pub fn reshape_with_order(&self, new_shape: &[usize], order: Order) -> anyhow::Result<Self> {
        if let Some(desc) = try_reshape_no_copy(&self.desc, new_shape, order.is_f())? {
            return Ok(self.view_with(desc));
        }
        // Copy fallback: read the view in the requested order and lay the
        // elements out densely in that same order.
        let data = self.to_vec_in_order(order);
        let arr = Self::from_vec_exact(data, new_shape, order)?;
        Ok(arr)
    }

    /// Flatten to a `[1, n]` row vector (copying only when the view is not
    /// flat-iterable).
    pub fn ravel(&self) -> anyhow::Result<Self> {
        self.reshape(&[1, self.len()])
    }

    /// View with all axes reversed.
    ///
    /// # Examples
    ///
    /// ```
    /// use tensile_core::NdArray;
    ///
    /// let a = NdArray::from_vec((1..=6).map(f64::from).collect(), &[2, 3]).unwrap();
    /// let t = a.transpose().unwrap();
    /// assert_eq!(t.shape(), &[3, 2]);
    /// assert_eq!(t.at(&[1, 0]).unwrap(), 2.0);
    /// ```
    pub fn transpose(&self) -> anyhow::Result<Self> {
        let axes: Vec<usize> = (0..self.rank()).rev().collect();
        self.permute(&axes)
    }

    /// View with dimensions reordered by `axes` (a permutation of
    /// `0..rank`). Shares the buffer; the identity permutation returns an
    /// equal view without recomputation.
    pub fn permute(&self, axes: &[usize]) -> anyhow::Result<Self> {
        let desc = view::permuted(&self.desc, axes)?;
        Ok(self.view_with(desc))
    }

    /// Reorder this view's own dimensions in place.
    ///
    /// Replaces only this view's descriptor; other views of the same buffer
    /// are unaffected. The identity permutation leaves the descriptor
    /// untouched.
    pub fn permute_in_place(&mut self, axes: &[usize]) -> anyhow::Result<()> {
        view::validate_permutation(axes, self.rank())?;
        if view::is_identity(axes) {
            return Ok(());
        }
        let desc = view::permuted(&self.desc, axes)?;
        self.replace_descriptor(desc);
        Ok(())
    }

    /// View with axes `a` and `b` exchanged.
    pub fn swap_axes(&self, a: usize, b: usize) -> anyhow::Result<Self> {
        let rank = self.rank();
        if a >= rank || b >= rank {
            anyhow::bail!(
                "swap_axes({}, {}) out of range for rank {}",
                a,
                b,
                rank
            );
        }
        let mut axes: Vec<usize> = (0..rank).collect();
        axes.swap(a, b);
        self.permute(&axes)
    }

    /// View with all size-1 dimensions removed (normalized back to rank 2
    /// when fewer than two dimensions remain).
    pub fn squeeze(&self) -> anyhow::Result<Self> {
        let kept: Vec<usize> = self
            .shape()
            .iter()
            .filter(|&&s| s != 1)
            .copied()
            .collect();
        self.reshape(&super::types::normalize_shape(&kept))
    }

    /// View with a size-1 dimension inserted at `dim`.
    pub fn expand_dims(&self, dim: usize) -> anyhow::Result<Self> {
        if dim > self.rank() {
            anyhow::bail!(
                "expand_dims position {} out of range for rank {}",
                dim,
                self.rank()
            );
        }
        let mut shape: Vec<usize> = self.shape().to_vec();
        shape.insert(dim, 1);
        self.reshape(&shape)
    }

    fn from_vec_exact(data: Vec<T>, shape: &[usize], order: Order) -> anyhow::Result<Self> {
        use crate::descriptor::ShapeDescriptor;
        use parking_lot::RwLock;
        use std::sync::Arc;

        let total: usize = shape.iter().product();
        if data.len() != total {
            anyhow::bail!(
                "shape {:?} requires {} elements, but got {}",
                shape,
                total,
                data.len()
            );
        }
        let desc = ShapeDescriptor::contiguous(shape, order)?;
        Ok(Self::from_parts(Arc::new(RwLock::new(data)), desc))
    }
}
