//! Core type definitions for the tensile layout engine.
//!
//! This module defines the small value types shared by every other module:
//!
//! - [`Shape`] / [`Strides`] — SmallVec-backed dimension and stride storage
//! - [`Order`] — memory traversal order tag (row-major / column-major / either)
//! - [`Context`] — explicit construction defaults, passed to factories
//!   instead of being read from process-global state

use smallvec::SmallVec;

/// Dimension sizes, inline up to rank 6 to avoid heap allocation for the
/// common cases.
pub type Shape = SmallVec<[usize; 6]>;

/// Per-dimension element strides (elements, not bytes). Signed: views with
/// reversed axes carry negative strides.
pub type Strides = SmallVec<[isize; 6]>;

/// Sentinel value of the cached element-wise stride meaning "no single flat
/// stride exists; use full multi-index addressing".
pub const NO_EWS: isize = -1;

/// Memory traversal order of an array layout.
///
/// # Examples
///
/// ```
/// use tensile_core::Order;
///
/// assert_eq!(Order::RowMajor.to_char(), 'c');
/// assert_eq!(Order::from_char('f'), Some(Order::ColMajor));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Order {
    /// Row-major ("C"): the last logical axis varies fastest in memory.
    RowMajor,
    /// Column-major ("Fortran"): the first logical axis varies fastest.
    ColMajor,
    /// Both traversal orders are contiguous (e.g. vectors, all-ones shapes).
    Either,
}

impl Order {
    /// Single-character code used in the packed descriptor representation.
    pub fn to_char(self) -> char {
        match self {
            Order::RowMajor => 'c',
            Order::ColMajor => 'f',
            Order::Either => 'a',
        }
    }

    /// Parse the single-character order code.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'c' => Some(Order::RowMajor),
            'f' => Some(Order::ColMajor),
            'a' => Some(Order::Either),
            _ => None,
        }
    }

    /// Whether this order resolves to column-major traversal. `Either`
    /// resolves to row-major, the crate-wide default.
    pub fn is_f(self) -> bool {
        matches!(self, Order::ColMajor)
    }
}

impl Default for Order {
    fn default() -> Self {
        Order::RowMajor
    }
}

/// Construction defaults carried explicitly rather than read from a global.
///
/// Factories on [`Context`] construct arrays with this context's default
/// order, so independent contexts (e.g. per test) never interfere.
///
/// # Examples
///
/// ```
/// use tensile_core::{Context, Order};
///
/// let ctx = Context::new(Order::ColMajor);
/// let a = ctx.zeros::<f64>(&[2, 3]);
/// assert_eq!(a.order(), Order::ColMajor);
/// ```
#[derive(Copy, Clone, Debug, Default)]
pub struct Context {
    /// Order used by factories when the caller does not specify one.
    pub default_order: Order,
}

impl Context {
    /// Create a context with the given default order.
    pub fn new(default_order: Order) -> Self {
        Self { default_order }
    }
}
