//! # tensile-core
//!
//! The dense N-dimensional array layout core: shape/stride/offset
//! descriptors, element addressing, layout analysis, no-copy reshape, and
//! the view-producing operations built on them.
//!
//! This crate is the computational substrate under a larger numeric stack.
//! It owns the hard part — the metadata system — and exposes narrow
//! contracts (`(buffer, descriptor)` pairs, offset/index functions, the
//! element-wise-stride fast-path signal) to the operation kernels, BLAS
//! glue, and serialization layers built on top of it.
//!
//! ## Core pieces
//!
//! - [`ShapeDescriptor`] — the immutable layout record: rank, shape,
//!   strides, offset, element-wise stride, order tag, with a packed flat
//!   representation
//! - [`address`] — multi-index ↔ linear index ↔ buffer offset arithmetic
//! - [`layout`] — contiguity analysis, order inference, element-wise stride
//! - [`reshape`] — the no-copy reshape algorithm (`None` means "copy
//!   required", which the container's reshape handles)
//! - [`view`] — slice / permute / sub-array / tensor-along-dimension
//!   descriptor builders
//! - [`NdArray`] — the user-facing container: shared buffer + descriptor
//!
//! ## Memory model
//!
//! Buffers are shared: slices, transposes, and other views alias their
//! parent's elements, and element writes through any view are visible
//! through all of them. Descriptors are immutable value objects — a shape
//! change replaces the view's descriptor, never edits it, so descriptor
//! replacement on one view is invisible to the others.
//!
//! ## Quick start
//!
//! ```
//! use tensile_core::NdArray;
//!
//! let a = NdArray::from_vec((1..=6).map(f64::from).collect(), &[2, 3]).unwrap();
//!
//! // Transpose is a zero-copy view.
//! let t = a.transpose().unwrap();
//! assert_eq!(t.shape(), &[3, 2]);
//! assert_eq!(t.at(&[1, 0]).unwrap(), a.at(&[0, 1]).unwrap());
//!
//! // Flattening the transpose cannot reuse the buffer: it copies, in the
//! // element order of the transposed view.
//! let flat = t.reshape(&[6]).unwrap();
//! assert_eq!(flat.to_vec_row_major(), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
//! ```

pub mod address;
pub mod dense;
pub mod descriptor;
pub mod error;
pub mod layout;
pub mod reshape;
pub mod types;
pub mod view;


pub use dense::NdArray;
pub use descriptor::{normalize_dim, ShapeDescriptor};
pub use error::ShapeError;
pub use types::{Context, Order, Shape, Strides, NO_EWS};
