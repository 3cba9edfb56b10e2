use crate::collections::ref_store::RefVec;
use crate::core::{IntCst, InvalidUpdate, Store, VarRef};
use crate::errors::{check_extents, check_same_sizes, ArgumentError};
use crate::reasoners::cp::difference::LeqOffset;
use crate::reasoners::cp::no_overlap::{NoOverlap, Rectangle};
use crate::reasoners::cp::{self, Cp, DynPropagator, PropagatorId};
use crate::search::interval::IntervalSplit;
use crate::search::{BrancherId, Choice, ChoiceArchive, DynBrancher};

/// A search node: the domains of all variables, together with the propagators and branchers acting on them.
///
/// Cloning a space yields a fully independent node: propagators and branchers are copied by value and refer to
/// variables through their index only.
#[derive(Clone, Default)]
pub struct Space {
    store: Store,
    cp: Cp,
    branchers: RefVec<BrancherId, DynBrancher>,
    /// Branchers before this index have no work left in this node and its descendants.
    first_active: usize,
}

impl Space {
    pub fn new() -> Space {
        Space::default()
    }

    pub fn new_var(&mut self, lb: IntCst, ub: IntCst) -> VarRef {
        self.store.new_var(lb, ub)
    }

    pub fn new_vars(&mut self, n: usize, lb: IntCst, ub: IntCst) -> Vec<VarRef> {
        (0..n).map(|_| self.new_var(lb, ub)).collect()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn is_failed(&self) -> bool {
        self.store.is_failed()
    }

    pub fn lb(&self, var: VarRef) -> IntCst {
        self.store.lb(var)
    }

    pub fn ub(&self, var: VarRef) -> IntCst {
        self.store.ub(var)
    }

    pub fn value(&self, var: VarRef) -> Option<IntCst> {
        self.store.value(var)
    }

    /// Restricts the domain of `var` to `[lb, ub]`. Dependent propagators run on the next propagation.
    pub fn narrow(&mut self, var: VarRef, lb: IntCst, ub: IntCst) -> Result<bool, InvalidUpdate> {
        self.store.narrow(var, lb, ub)
    }

    pub fn cp_stats(&self) -> cp::Stats {
        self.cp.stats
    }

    pub fn num_active_propagators(&self) -> usize {
        self.cp.num_active()
    }

    /// Posts a propagator. Returns `None` (and posts nothing) if the space is already failed.
    pub fn post(&mut self, propagator: impl Into<DynPropagator>) -> Option<PropagatorId> {
        if self.is_failed() {
            None
        } else {
            Some(self.cp.add_propagator(propagator))
        }
    }

    /// Posts `x + offset <= y`.
    pub fn post_leq(&mut self, x: VarRef, offset: IntCst, y: VarRef) -> Option<PropagatorId> {
        self.post(LeqOffset::new(x, offset, y))
    }

    /// Posts the non-overlap of the rectangles `(xs[i], ys[i], widths[i], heights[i])`.
    ///
    /// Nothing is posted if the space is failed or if there are less than two rectangles.
    pub fn post_no_overlap(
        &mut self,
        xs: &[VarRef],
        widths: &[IntCst],
        ys: &[VarRef],
        heights: &[IntCst],
    ) -> Result<(), ArgumentError> {
        check_same_sizes("nooverlap", &[xs.len(), widths.len(), ys.len(), heights.len()])?;
        check_extents("nooverlap", widths)?;
        check_extents("nooverlap", heights)?;
        if xs.len() > 1 {
            let rectangles = (0..xs.len()).map(|i| Rectangle::new(xs[i], widths[i], ys[i], heights[i]));
            self.post(NoOverlap::new(rectangles));
        }
        Ok(())
    }

    /// Adds a brancher, consulted after all previously added ones have no work left.
    /// Returns `None` (and adds nothing) if the space is already failed.
    pub fn branch(&mut self, brancher: impl Into<DynBrancher>) -> Option<BrancherId> {
        if self.is_failed() {
            None
        } else {
            Some(self.branchers.push(brancher.into()))
        }
    }

    /// Adds an [IntervalSplit] brancher over `vars` whose items have the given `extents`.
    pub fn post_interval_brancher(
        &mut self,
        vars: &[VarRef],
        extents: &[IntCst],
        mandatory_fraction: f64,
    ) -> Result<(), ArgumentError> {
        let brancher = IntervalSplit::new(vars.to_vec(), extents.to_vec(), mandatory_fraction)?;
        self.branch(brancher);
        Ok(())
    }

    /// Runs all propagators to a fixed point.
    pub fn propagate(&mut self) -> Result<(), InvalidUpdate> {
        self.cp.propagate(&mut self.store)
    }

    /// Returns the next choice to explore, or `None` if no brancher has work left, i.e. the node is a solution.
    /// Should only be called on a propagated, non-failed space.
    pub fn choice(&mut self) -> Option<Choice> {
        debug_assert!(!self.is_failed());
        while self.first_active < self.branchers.len() {
            let id = BrancherId::from(self.first_active);
            let brancher = &mut self.branchers[id].brancher;
            if brancher.status(&self.store) {
                return Some(brancher.choice(id, &self.store));
            }
            self.first_active += 1;
        }
        None
    }

    /// Commits the space to the alternative `alternative` of `choice`.
    pub fn commit(&mut self, choice: &Choice, alternative: u32) -> Result<(), InvalidUpdate> {
        debug_assert!(alternative < choice.alternatives());
        self.branchers[choice.brancher()]
            .brancher
            .commit(choice, alternative, &mut self.store)
    }

    /// Rebuilds a choice from its archived form, against the branchers of this space.
    pub fn restore_choice(&self, archive: &ChoiceArchive) -> Result<Choice, ArgumentError> {
        let id = BrancherId::from_u32(archive.brancher);
        let brancher = self
            .branchers
            .get(id)
            .ok_or(ArgumentError::UnknownBrancher(archive.brancher))?;
        brancher
            .brancher
            .restore(id, archive.pos as usize, archive.min, archive.max)
    }

    pub fn describe(&self, choice: &Choice, alternative: u32) -> String {
        self.branchers[choice.brancher()]
            .brancher
            .describe(choice, alternative)
    }

    pub(crate) fn into_store(self) -> Store {
        self.store
    }
}
