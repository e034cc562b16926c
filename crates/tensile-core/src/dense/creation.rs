//! Array creation and initialization.
//!
//! All constructors apply the rank normalization convention (scalars become
//! `[1, 1]`, bare `[n]` becomes the row vector `[1, n]`) and produce dense
//! buffers at offset zero. Order defaults to row-major; the `_with_order`
//! variants and [`Context`] factories make it explicit.

use std::sync::Arc;

use num_traits::{Num, NumCast};
use parking_lot::RwLock;

use super::types::{normalize_shape, NdArray};
use crate::descriptor::ShapeDescriptor;
use crate::types::{Context, Order};

impl<T> NdArray<T>
where
    T: Clone + Num,
{
    /// Create a zero-filled array.
    ///
    /// # Examples
    ///
    /// ```
    /// use tensile_core::NdArray;
    ///
    /// let a = NdArray::<f64>::zeros(&[2, 3]);
    /// assert_eq!(a.at(&[1, 2]).unwrap(), 0.0);
    /// ```
    pub fn zeros(shape: &[usize]) -> Self {
        Self::from_elem(shape, T::zero())
    }

    /// Create a one-filled array.
    pub fn ones(shape: &[usize]) -> Self {
        Self::from_elem(shape, T::one())
    }

    /// Create an array filled with `value`, row-major.
    pub fn from_elem(shape: &[usize], value: T) -> Self {
        Self::from_elem_with_order(shape, value, Order::RowMajor)
    }

    /// Create an array filled with `value` in the given order.
    pub fn from_elem_with_order(shape: &[usize], value: T, order: Order) -> Self {
        let shape = normalize_shape(shape);
        let len: usize = shape.iter().product();
        let desc = ShapeDescriptor::contiguous(&shape, order)
            .expect("normalized shape is valid");
        Self::from_parts(Arc::new(RwLock::new(vec![value; len])), desc)
    }

    /// Create an array from a flat vector, interpreted in row-major order.
    ///
    /// # Examples
    ///
    /// ```
    /// use tensile_core::NdArray;
    ///
    /// let a = NdArray::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
    /// assert_eq!(a.at(&[0, 1]).unwrap(), 2.0);
    /// assert_eq!(a.at(&[1, 0]).unwrap(), 4.0);
    /// ```
    pub fn from_vec(data: Vec<T>, shape: &[usize]) -> anyhow::Result<Self> {
        Self::from_vec_with_order(data, shape, Order::RowMajor)
    }

    /// Create an array from a flat vector laid out in the given order.
    pub fn from_vec_with_order(
        data: Vec<T>,
        shape: &[usize],
        order: Order,
    ) -> anyhow::Result<Self> {
        let shape = normalize_shape(shape);
        let total: usize = shape.iter().product();
        if data.len() != total {
            anyhow::bail!(
                "shape {:?} requires {} elements, but got {}",
                shape.as_slice(),
                total,
                data.len()
            );
        }
        let desc = ShapeDescriptor::contiguous(&shape, order)?;
        Ok(Self::from_parts(Arc::new(RwLock::new(data)), desc))
    }

    /// Create a `[1, 1]` scalar array.
    pub fn scalar(value: T) -> Self {
        Self::from_elem(&[], value)
    }
}

impl<T> NdArray<T>
where
    T: Clone + Num + NumCast,
{
    /// Row vector `[1, n]` of the integers `0..n` cast into `T`.
    pub fn arange(n: usize) -> anyhow::Result<Self> {
        let data = (0..n)
            .map(|i| {
                NumCast::from(i)
                    .ok_or_else(|| anyhow::anyhow!("cannot represent {} in element type", i))
            })
            .collect::<anyhow::Result<Vec<T>>>()?;
        Self::from_vec(data, &[n])
    }
}

impl Context {
    /// Zero-filled array in this context's default order.
    pub fn zeros<T: Clone + Num>(&self, shape: &[usize]) -> NdArray<T> {
        NdArray::from_elem_with_order(shape, T::zero(), self.default_order)
    }

    /// One-filled array in this context's default order.
    pub fn ones<T: Clone + Num>(&self, shape: &[usize]) -> NdArray<T> {
        NdArray::from_elem_with_order(shape, T::one(), self.default_order)
    }

    /// Array from a flat vector laid out in this context's default order.
    pub fn from_vec<T: Clone + Num>(
        &self,
        data: Vec<T>,
        shape: &[usize],
    ) -> anyhow::Result<NdArray<T>> {
        NdArray::from_vec_with_order(data, shape, self.default_order)
    }
}
