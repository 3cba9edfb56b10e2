//! Non-overlap of rectangles whose positions are variables and whose extents are fixed.
//!
//! Coordinates grow to the right on the `x` axis and downwards on the `y` axis. For a pair of rectangles
//! `(i, j)`, four relations each guarantee that the two do not overlap:
//!
//!  - `Left`:  `j` is entirely on the left of `i`, `x_j + w_j <= x_i`
//!  - `Right`: `j` is entirely on the right of `i`, `x_i + w_i <= x_j`
//!  - `Above`: `j` is entirely above `i`, `y_j + h_j <= y_i`
//!  - `Below`: `j` is entirely below `i`, `y_i + h_i <= y_j`
//!
//! The propagator only reasons on bounds. When the bounds exclude three of the relations, the last one is
//! enforced. When they exclude all four, the two rectangles necessarily overlap and the store is failed.

use crate::core::{IntCst, InvalidUpdate, Store, VarRef, INT_CST_MAX};
use crate::reasoners::cp::{Propagator, PropagatorId, PropagatorStatus, Watches};
use itertools::Itertools;

/// A rectangle with a variable top-left corner `(x, y)` and fixed `width` and `height`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rectangle {
    pub x: VarRef,
    pub y: VarRef,
    pub width: IntCst,
    pub height: IntCst,
}

impl Rectangle {
    pub fn new(x: VarRef, width: IntCst, y: VarRef, height: IntCst) -> Self {
        debug_assert!((0..=INT_CST_MAX).contains(&width) && (0..=INT_CST_MAX).contains(&height));
        Rectangle { x, y, width, height }
    }
}

/// Relative placement of a rectangle `j` with respect to a rectangle `i`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Placement {
    Left,
    Right,
    Above,
    Below,
}

impl Placement {
    pub const ALL: [Placement; 4] = [Placement::Left, Placement::Right, Placement::Above, Placement::Below];

    /// True if the bounds still allow `j` to be placed at this position relative to `i`.
    pub fn possible(self, i: &Rectangle, j: &Rectangle, store: &Store) -> bool {
        match self {
            Placement::Left => store.lb(j.x) + j.width <= store.ub(i.x),
            Placement::Right => store.lb(i.x) + i.width <= store.ub(j.x),
            Placement::Above => store.lb(j.y) + j.height <= store.ub(i.y),
            Placement::Below => store.lb(i.y) + i.height <= store.ub(j.y),
        }
    }

    /// True if `j` is at this position relative to `i` for every value left in the domains.
    pub fn entailed(self, i: &Rectangle, j: &Rectangle, store: &Store) -> bool {
        match self {
            Placement::Left => store.ub(j.x) + j.width <= store.lb(i.x),
            Placement::Right => store.ub(i.x) + i.width <= store.lb(j.x),
            Placement::Above => store.ub(j.y) + j.height <= store.lb(i.y),
            Placement::Below => store.ub(i.y) + i.height <= store.lb(j.y),
        }
    }

    /// Narrows the bounds so that `j` is at this position relative to `i`.
    /// Returns true if any domain was modified.
    pub fn enforce(self, i: &Rectangle, j: &Rectangle, store: &mut Store) -> Result<bool, InvalidUpdate> {
        // `before + extent <= after`
        let (before, extent, after) = match self {
            Placement::Left => (j.x, j.width, i.x),
            Placement::Right => (i.x, i.width, j.x),
            Placement::Above => (j.y, j.height, i.y),
            Placement::Below => (i.y, i.height, j.y),
        };
        let a = store.set_lb(after, store.lb(before) + extent)?;
        let b = store.set_ub(before, store.ub(after) - extent)?;
        Ok(a || b)
    }
}

/// Global constraint stating that no two rectangles overlap.
#[derive(Clone, Debug)]
pub struct NoOverlap {
    rectangles: Vec<Rectangle>,
}

impl NoOverlap {
    pub fn new(rectangles: impl IntoIterator<Item = Rectangle>) -> Self {
        NoOverlap {
            rectangles: rectangles.into_iter().collect(),
        }
    }

    pub fn rectangles(&self) -> &[Rectangle] {
        &self.rectangles
    }

    fn pairs(&self) -> impl Iterator<Item = (&Rectangle, &Rectangle)> + '_ {
        self.rectangles.iter().tuple_combinations()
    }

    /// Enforces the only placement left for the pair, if any. Returns true if a domain was modified.
    fn prune_pair(i: &Rectangle, j: &Rectangle, store: &mut Store) -> Result<bool, InvalidUpdate> {
        let mut possible = Placement::ALL.iter().filter(|p| p.possible(i, j, store));
        match (possible.next(), possible.next()) {
            (None, _) => Err(store.wipe_out(j.x)),
            (Some(&forced), None) => forced.enforce(i, j, store),
            _ => Ok(false),
        }
    }

    /// True if every pair of rectangles is separated whatever the values taken in the current domains.
    /// Once this holds, no further narrowing can make two rectangles overlap.
    pub fn separated(&self, store: &Store) -> bool {
        self.pairs()
            .all(|(i, j)| Placement::ALL.iter().any(|p| p.entailed(i, j, store)))
    }
}

impl Propagator for NoOverlap {
    fn name(&self) -> &'static str {
        "no-overlap"
    }

    fn setup(&self, id: PropagatorId, context: &mut Watches) {
        for r in &self.rectangles {
            context.add_watch(r.x, id);
            context.add_watch(r.y, id);
        }
    }

    fn propagate(&self, store: &mut Store) -> Result<PropagatorStatus, InvalidUpdate> {
        // pruning a pair may enable the pruning of a pair that was already processed: iterate to a local fixed point
        let mut changed = true;
        while changed {
            changed = false;
            for (i, j) in self.pairs() {
                changed |= Self::prune_pair(i, j, store)?;
            }
        }

        if self.separated(store) {
            Ok(PropagatorStatus::Subsumed)
        } else {
            Ok(PropagatorStatus::Fix)
        }
    }

    fn idempotent(&self) -> bool {
        true
    }

    fn clone_box(&self) -> Box<dyn Propagator> {
        Box::new(self.clone())
    }
}
