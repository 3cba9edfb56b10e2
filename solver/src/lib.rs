//! Finite-domain constraint solving over copied search nodes.
//!
//! A [Space](solver::Space) holds integer variables with interval domains, the propagators narrowing them and the
//! branchers splitting them. The [Search](solver::Search) engine explores the tree of spaces depth first, optionally
//! in branch-and-bound mode.
//!
//! ```
//! use tessera::prelude::*;
//!
//! let mut space = Space::new();
//! let xs = space.new_vars(2, 0, 3);
//! let ys = space.new_vars(2, 0, 0);
//! space.post_no_overlap(&xs, &[2, 2], &ys, &[1, 1]).unwrap();
//! space.branch(Lexical::with_min(xs.clone()));
//!
//! let solution = Search::dfs(space).next().unwrap();
//! assert_eq!(solution.values(&xs), Some(vec![0, 2]));
//! ```

pub mod collections;
pub mod core;
pub mod errors;
pub mod prelude;
pub mod reasoners;
pub mod search;
pub mod solver;
