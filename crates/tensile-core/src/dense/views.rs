//! View-producing operations: slice, sub-array, tensor-along-dimension,
//! and the copy-producing escape hatches (`dup`, `to_contiguous`).
//!
//! Everything here shares the parent's buffer except `dup` and the
//! copy branch of `to_contiguous`: mutations through a view are visible
//! through the parent and vice versa.

use num_traits::Num;

use super::types::{normalize_shape, NdArray};
use crate::types::Order;
use crate::view;

impl<T> NdArray<T>
where
    T: Clone + Num,
{
    /// View with dimension `dim` fixed at `index` and removed from the
    /// shape. Shares the buffer. Results below rank 2 are normalized to
    /// the row-vector convention.
    ///
    /// # Examples
    ///
    /// ```
    /// use tensile_core::NdArray;
    ///
    /// let a = NdArray::from_vec((1..=6).map(f64::from).collect(), &[2, 3]).unwrap();
    /// let row1 = a.slice(0, 1).unwrap();
    /// assert_eq!(row1.shape(), &[1, 3]);
    /// assert_eq!(row1.at(&[0, 0]).unwrap(), 4.0);
    /// assert!(a.slice(0, 2).is_err());
    /// ```
    pub fn slice(&self, dim: usize, index: usize) -> anyhow::Result<Self> {
        let desc = view::slice_at(&self.desc, dim, index)?;
        Ok(self.view_with(self.normalized(desc)?))
    }

    /// View described by externally-resolved per-dimension `offsets`,
    /// `shape`, and `strides` (the output of index-expression resolution).
    /// Returns an equal view of the whole array when the request covers it
    /// exactly.
    pub fn sub_array(
        &self,
        offsets: &[usize],
        shape: &[usize],
        strides: &[isize],
    ) -> anyhow::Result<Self> {
        let desc = view::sub_array(&self.desc, offsets, shape, strides)?;
        Ok(self.view_with(desc))
    }

    /// Number of tensors along the given dimensions. Vectors count as a
    /// single tensor along their only meaningful axis.
    pub fn tensors_along_dimension(&self, dims: &[isize]) -> anyhow::Result<usize> {
        let dims = view::normalize_tad_dims(dims, self.rank())?;
        if self.is_vector() && dims.len() == 1 {
            return Ok(1);
        }
        Ok(view::tad_count(&self.desc, &dims))
    }

    /// The `index`-th tensor along `dims`: the view obtained by holding
    /// `dims` as the result's axes and fixing all other dimensions at the
    /// decomposed `index`.
    ///
    /// Negative dims are normalized, duplicates removed. Vectors are their
    /// own single tensor: selecting along the long axis returns the view
    /// itself, selecting along the unit axis returns its transpose.
    ///
    /// # Examples
    ///
    /// ```
    /// use tensile_core::NdArray;
    ///
    /// let a = NdArray::from_vec((1..=24).map(f64::from).collect(), &[2, 3, 4]).unwrap();
    /// // Rows of length 4; row 5 is the last one.
    /// let t = a.tensor_along_dimension(5, &[2]).unwrap();
    /// assert_eq!(t.shape(), &[1, 4]);
    /// assert_eq!(t.at(&[0, 0]).unwrap(), 21.0);
    /// ```
    pub fn tensor_along_dimension(&self, index: usize, dims: &[isize]) -> anyhow::Result<Self> {
        let rank = self.rank();
        let dims = view::normalize_tad_dims(dims, rank)?;
        if dims.is_empty() {
            anyhow::bail!("tensor_along_dimension requires at least one dimension");
        }

        if self.is_scalar() {
            if index > 0 {
                anyhow::bail!("tensor index {} out of range: scalar has a single tensor", index);
            }
            return Ok(self.clone());
        }
        if self.is_vector() && dims.len() == 1 {
            if index > 0 {
                anyhow::bail!(
                    "tensor index {} out of range: vector has a single tensor along {:?}",
                    index,
                    dims
                );
            }
            let long_axis = if self.shape()[0] == 1 { 1 } else { 0 };
            return if dims[0] == long_axis {
                Ok(self.clone())
            } else {
                self.transpose()
            };
        }

        let desc = view::tad(&self.desc, index, &dims)?;
        Ok(self.view_with(self.normalized(desc)?))
    }

    /// Deep copy in row-major order at offset zero. Breaks aliasing: the
    /// copy has its own buffer.
    ///
    /// # Examples
    ///
    /// ```
    /// use tensile_core::NdArray;
    ///
    /// let mut a = NdArray::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
    /// let mut d = a.dup();
    /// d.put_scalar(&[0, 0], 9.0).unwrap();
    /// assert_eq!(a.at(&[0, 0]).unwrap(), 1.0);
    /// ```
    pub fn dup(&self) -> Self {
        self.dup_with_order(Order::RowMajor)
    }

    /// Deep copy laid out densely in the given order at offset zero.
    pub fn dup_with_order(&self, order: Order) -> Self {
        use crate::descriptor::ShapeDescriptor;
        use parking_lot::RwLock;
        use std::sync::Arc;

        let data = self.to_vec_in_order(order);
        let desc = ShapeDescriptor::contiguous(self.shape(), order)
            .expect("existing shape is valid");
        Self::from_parts(Arc::new(RwLock::new(data)), desc)
    }

    /// Return this view unchanged when it is already a dense offset-zero
    /// block in `order` (directly consumable by native BLAS); otherwise a
    /// dense copy in that order.
    pub fn to_contiguous(&self, order: Order) -> Self {
        if self.offset() == 0
            && self.is_contiguous_in_buffer(order)
            && self.len() == self.buffer.read().len()
        {
            return self.clone();
        }
        self.dup_with_order(order)
    }

    /// Re-apply the rank normalization convention to a derived descriptor:
    /// rank 0 becomes `[1, 1]`, rank 1 becomes `[1, n]`.
    fn normalized(
        &self,
        desc: crate::descriptor::ShapeDescriptor,
    ) -> anyhow::Result<crate::descriptor::ShapeDescriptor> {
        if desc.rank() >= 2 {
            return Ok(desc);
        }
        let shape = normalize_shape(desc.shape());
        let mut strides: Vec<isize> = Vec::with_capacity(2);
        match desc.rank() {
            0 => strides.extend([1, 1]),
            _ => {
                let st = desc.strides()[0];
                // The size-1 row axis never contributes to addressing; give
                // it the whole-vector step for C-convention consistency.
                strides.extend([st * desc.shape()[0] as isize, st]);
            }
        }
        Ok(desc.derived(&shape, &strides, desc.offset())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn iota(shape: &[usize]) -> NdArray<f64> {
        let len: usize = shape.iter().product();
        NdArray::from_vec((1..=len).map(|x| x as f64).collect(), shape).unwrap()
    }

    #[test]
    fn slice_shares_buffer_and_aliases() {
        let a = iota(&[2, 3]);
        let mut row = a.slice(0, 1).unwrap();
        assert!(Arc::ptr_eq(&a.buffer, &row.buffer));
        row.put_scalar(&[0, 2], 99.0).unwrap();
        assert_eq!(a.at(&[1, 2]).unwrap(), 99.0);
    }

    #[test]
    fn slice_of_rank3() {
        let a = iota(&[2, 3, 4]);
        let s = a.slice(1, 2).unwrap();
        assert_eq!(s.shape(), &[2, 4]);
        assert_eq!(s.at(&[0, 0]).unwrap(), 9.0);
        assert_eq!(s.at(&[1, 3]).unwrap(), 24.0);
    }

    #[test]
    fn sub_array_block() {
        let a = iota(&[4, 5]);
        let s = a.sub_array(&[1, 2], &[2, 3], &[5, 1]).unwrap();
        assert_eq!(s.at(&[0, 0]).unwrap(), 8.0);
        assert_eq!(s.at(&[1, 2]).unwrap(), 15.0);
        // Whole-array request is a plain view.
        let whole = a.sub_array(&[0, 0], &[4, 5], &[5, 1]).unwrap();
        assert_eq!(whole.descriptor(), a.descriptor());
    }

    #[test]
    fn tad_rows_and_columns_of_matrix() {
        let a = iota(&[2, 3]);
        // Along dim 1: rows.
        assert_eq!(a.tensors_along_dimension(&[1]).unwrap(), 2);
        let r1 = a.tensor_along_dimension(1, &[1]).unwrap();
        assert_eq!(r1.shape(), &[1, 3]);
        assert_eq!(r1.to_vec_row_major(), vec![4.0, 5.0, 6.0]);
        // Along dim 0: columns.
        assert_eq!(a.tensors_along_dimension(&[0]).unwrap(), 3);
        let c2 = a.tensor_along_dimension(2, &[0]).unwrap();
        assert_eq!(c2.shape(), &[1, 2]);
        assert_eq!(c2.to_vec_row_major(), vec![3.0, 6.0]);
    }

    #[test]
    fn tad_matrix_slices_of_cube() {
        let a = iota(&[2, 3, 4]);
        assert_eq!(a.tensors_along_dimension(&[1, 2]).unwrap(), 2);
        let m1 = a.tensor_along_dimension(1, &[1, 2]).unwrap();
        assert_eq!(m1.shape(), &[3, 4]);
        assert_eq!(m1.at(&[0, 0]).unwrap(), 13.0);
        assert_eq!(m1.at(&[2, 3]).unwrap(), 24.0);
    }

    #[test]
    fn tad_negative_and_duplicate_dims() {
        let a = iota(&[2, 3, 4]);
        let t = a.tensor_along_dimension(0, &[-1, 2]).unwrap();
        assert_eq!(t.shape(), &[1, 4]);
        assert_eq!(t.to_vec_row_major(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn tad_vector_special_cases() {
        let row = iota(&[1, 4]);
        let same = row.tensor_along_dimension(0, &[1]).unwrap();
        assert_eq!(same.shape(), &[1, 4]);
        let t = row.tensor_along_dimension(0, &[0]).unwrap();
        assert_eq!(t.shape(), &[4, 1]);
        assert!(row.tensor_along_dimension(1, &[1]).is_err());
        assert_eq!(row.tensors_along_dimension(&[1]).unwrap(), 1);
    }

    #[test]
    fn tad_index_bound() {
        let a = iota(&[2, 3, 4]);
        assert!(a.tensor_along_dimension(6, &[2]).is_err());
    }

    #[test]
    fn tad_aliases_parent() {
        let a = iota(&[2, 3, 4]);
        let mut t = a.tensor_along_dimension(0, &[2]).unwrap();
        t.put_scalar(&[0, 1], -1.0).unwrap();
        assert_eq!(a.at(&[0, 0, 1]).unwrap(), -1.0);
    }

    #[test]
    fn dup_breaks_aliasing() {
        let a = iota(&[2, 2]);
        let t = a.transpose().unwrap();
        let mut d = t.dup();
        assert_eq!(d.offset(), 0);
        assert_eq!(d.to_vec_row_major(), t.to_vec_row_major());
        d.put_scalar(&[0, 0], 42.0).unwrap();
        assert_eq!(a.at(&[0, 0]).unwrap(), 1.0);
    }

    #[test]
    fn to_contiguous_returns_compatible_views_unchanged() {
        let a = iota(&[2, 3]);
        let c = a.to_contiguous(Order::RowMajor);
        assert!(Arc::ptr_eq(&a.buffer, &c.buffer));
        // A transpose is not C-contiguous: it must be copied.
        let t = a.transpose().unwrap();
        let tc = t.to_contiguous(Order::RowMajor);
        assert!(!Arc::ptr_eq(&a.buffer, &tc.buffer));
        assert_eq!(tc.to_vec_row_major(), t.to_vec_row_major());
        // ...but it is F-contiguous at offset zero, so the F request is free.
        let tf = t.to_contiguous(Order::ColMajor);
        assert!(Arc::ptr_eq(&a.buffer, &tf.buffer));
    }
}
