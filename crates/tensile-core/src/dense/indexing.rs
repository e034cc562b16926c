//! Element access and logical-order extraction.
//!
//! All access goes through the address calculator, so it is correct for any
//! strided view. Writes through one view are visible through every other
//! view sharing the buffer.

use num_traits::Num;

use super::types::NdArray;
use crate::address;
use crate::types::{Order, NO_EWS};

impl<T> NdArray<T>
where
    T: Clone + Num,
{
    /// Element at `indices`, or `None` when out of bounds or rank differs.
    ///
    /// # Examples
    ///
    /// ```
    /// use tensile_core::NdArray;
    ///
    /// let a = NdArray::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
    /// assert_eq!(a.get(&[0, 1]), Some(2.0));
    /// assert_eq!(a.get(&[2, 0]), None);
    /// ```
    pub fn get(&self, indices: &[usize]) -> Option<T> {
        let offset = address::offset_for(&self.desc, indices).ok()?;
        self.buffer.read().get(offset).cloned()
    }

    /// Element at `indices`, with the violated bound reported on failure.
    pub fn at(&self, indices: &[usize]) -> anyhow::Result<T> {
        let offset = address::offset_for(&self.desc, indices)?;
        Ok(self.buffer.read()[offset].clone())
    }

    /// Rank-2 fast-path accessor. Hard error on any other rank.
    pub fn at2(&self, row: usize, col: usize) -> anyhow::Result<T> {
        let offset = address::offset2(&self.desc, row, col)?;
        Ok(self.buffer.read()[offset].clone())
    }

    /// Rank-3 fast-path accessor.
    pub fn at3(&self, i: usize, j: usize, k: usize) -> anyhow::Result<T> {
        let offset = address::offset3(&self.desc, i, j, k)?;
        Ok(self.buffer.read()[offset].clone())
    }

    /// Rank-4 fast-path accessor.
    pub fn at4(&self, i: usize, j: usize, k: usize, l: usize) -> anyhow::Result<T> {
        let offset = address::offset4(&self.desc, i, j, k, l)?;
        Ok(self.buffer.read()[offset].clone())
    }

    /// Write one element. The write is visible through every view sharing
    /// this buffer.
    ///
    /// # Examples
    ///
    /// ```
    /// use tensile_core::NdArray;
    ///
    /// let mut a = NdArray::<f64>::zeros(&[2, 2]);
    /// a.put_scalar(&[1, 0], 5.0).unwrap();
    /// assert_eq!(a.at(&[1, 0]).unwrap(), 5.0);
    /// ```
    pub fn put_scalar(&mut self, indices: &[usize], value: T) -> anyhow::Result<()> {
        let offset = address::offset_for(&self.desc, indices)?;
        self.buffer.write()[offset] = value;
        Ok(())
    }

    /// The `linear`-th element when the view is traversed in its own order.
    pub fn at_linear(&self, linear: usize) -> anyhow::Result<T> {
        let offset = address::offset_of_linear(&self.desc, linear)?;
        Ok(self.buffer.read()[offset].clone())
    }

    /// All elements in row-major logical order, regardless of the view's
    /// memory layout.
    pub fn to_vec_row_major(&self) -> Vec<T> {
        self.to_vec_in_order(Order::RowMajor)
    }

    /// All elements traversed in the given logical order.
    ///
    /// Uses the flat element-wise-stride walk when the view supports it for
    /// the requested order, falling back to full multi-index addressing.
    pub fn to_vec_in_order(&self, order: Order) -> Vec<T> {
        let len = self.len();
        let buf = self.buffer.read();
        let ews = self.element_wise_stride();
        let flat_ok = ews != NO_EWS
            && (self.order() == Order::Either || order == self.effective_order());
        if flat_ok {
            let base = self.offset() as isize;
            return (0..len)
                .map(|i| buf[(base + i as isize * ews) as usize].clone())
                .collect();
        }
        let shape = self.shape();
        (0..len)
            .map(|i| {
                let idx = address::linear_to_indices(shape, i, order)
                    .expect("linear index in range");
                let off = address::offset_for(&self.desc, &idx).expect("index in range");
                buf[off].clone()
            })
            .collect()
    }

    /// Copy all elements of `other` into this view, matching positions in
    /// row-major logical order. Hard failure when total lengths differ.
    ///
    /// # Examples
    ///
    /// ```
    /// use tensile_core::NdArray;
    ///
    /// let src = NdArray::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
    /// let mut dst = NdArray::<f64>::zeros(&[2, 2]);
    /// dst.assign(&src).unwrap();
    /// assert_eq!(dst.at(&[1, 1]).unwrap(), 4.0);
    /// ```
    pub fn assign(&mut self, other: &NdArray<T>) -> anyhow::Result<()> {
        if other.len() != self.len() {
            anyhow::bail!(
                "cannot assign {} elements (shape {:?}) into {} elements (shape {:?})",
                other.len(),
                other.shape(),
                self.len(),
                self.shape()
            );
        }
        // Snapshot first: self and other may alias the same buffer.
        let values = other.to_vec_row_major();
        let shape = self.shape().to_vec();
        let mut buf = self.buffer.write();
        for (i, v) in values.into_iter().enumerate() {
            let idx = address::linear_to_indices(&shape, i, Order::RowMajor)?;
            let off = address::offset_for(&self.desc, &idx)?;
            buf[off] = v;
        }
        Ok(())
    }

    /// Resolve `Either` to the concrete traversal order used for flat
    /// iteration.
    pub(crate) fn effective_order(&self) -> Order {
        match self.order() {
            Order::Either => Order::RowMajor,
            o => o,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_and_put_roundtrip() {
        let mut a = NdArray::<f64>::zeros(&[2, 3]);
        a.put_scalar(&[1, 2], 9.0).unwrap();
        assert_eq!(a.get(&[1, 2]), Some(9.0));
        assert_eq!(a.at2(1, 2).unwrap(), 9.0);
        assert!(a.put_scalar(&[1, 3], 0.0).is_err());
    }

    #[test]
    fn fast_path_rank_errors() {
        let a = NdArray::<f64>::zeros(&[2, 3, 4]);
        assert!(a.at2(0, 0).is_err());
        assert_eq!(a.at3(1, 2, 3).unwrap(), 0.0);
        assert!(a.at4(0, 0, 0, 0).is_err());
    }

    #[test]
    fn to_vec_row_major_of_f_buffer() {
        // F-layout buffer read back in row-major logical order.
        let a = NdArray::from_vec_with_order(
            vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0],
            &[2, 3],
            Order::ColMajor,
        )
        .unwrap();
        assert_eq!(a.to_vec_row_major(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(
            a.to_vec_in_order(Order::ColMajor),
            vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]
        );
    }

    #[test]
    fn at_linear_follows_view_order() {
        let a = NdArray::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
        let vals: Vec<f64> = (0..4).map(|i| a.at_linear(i).unwrap()).collect();
        assert_eq!(vals, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn assign_requires_equal_lengths() {
        let src = NdArray::<f64>::zeros(&[2, 3]);
        let mut dst = NdArray::<f64>::zeros(&[2, 2]);
        assert!(dst.assign(&src).is_err());
    }

    #[test]
    fn assign_between_layouts_matches_logical_order() {
        let src = NdArray::from_vec_with_order(
            vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0],
            &[2, 3],
            Order::ColMajor,
        )
        .unwrap();
        let mut dst = NdArray::<f64>::zeros(&[2, 3]);
        dst.assign(&src).unwrap();
        assert_eq!(dst.to_vec_row_major(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }
}
