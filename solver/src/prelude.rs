//! Module that re-export most commonly used types and traits to ease import.

pub use crate::core::{IntCst, IntDomain, VarRef};
pub use crate::errors::ArgumentError;
pub use crate::search::bisect::Bisect;
pub use crate::search::interval::IntervalSplit;
pub use crate::search::lexical::{Lexical, PreferredValue};
pub use crate::search::{Brancher, Choice, ChoiceArchive, VarSelect};
pub use crate::solver::{Objective, Search, SearchLimits, SearchStatus, Solution, Space};
