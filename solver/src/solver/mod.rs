//! Search nodes and the search engine exploring them.

pub mod driver;
pub mod solution;
pub mod space;
pub mod stats;

pub use driver::{Objective, Search, SearchLimits, SearchStatus};
pub use solution::Solution;
pub use space::Space;
pub use stats::Stats;
