//! The dense N-dimensional array container.
//!
//! [`NdArray`] pairs a shared element buffer with a [`crate::ShapeDescriptor`]
//! and exposes the view-producing operations on top of it, organized into
//! functional sub-modules.

// Core type definition
pub mod types;

// Operation modules (organized by functionality)
mod creation;
mod indexing;
mod shape_ops;
mod views;

// Re-export the main type
pub use types::NdArray;
