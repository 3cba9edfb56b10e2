//! Integer variables, their interval domains and the store holding all domains of a search node.

mod domain;
mod store;

pub use domain::IntDomain;
pub use store::{InvalidUpdate, Store};

use crate::create_ref_type;

/// Type of the integer constants appearing in domains, extents and offsets.
pub type IntCst = i32;

/// Largest value allowed in a domain.
/// Kept well below `i32::MAX` so that adding an extent (itself at most `INT_CST_MAX`) to a bound never overflows.
pub const INT_CST_MAX: IntCst = 1 << 29;
/// Smallest value allowed in a domain.
pub const INT_CST_MIN: IntCst = -INT_CST_MAX;

create_ref_type!(VarRef);
