//! Propagation engine for bounds-consistency propagators.
//!
//! The [Cp] reasoner owns all propagators of a search node, together with the watches subscribing them to
//! variables. Propagation runs a worklist until a fixed point is reached: a propagator is (re)scheduled whenever
//! the bounds of one of its watched variables change. Propagators proving that they can never prune again are
//! retired and never scheduled again, neither in this node nor in any of its descendants.

pub mod difference;
pub mod no_overlap;

mod propagator;
pub use propagator::*;

use crate::collections::ref_store::RefVec;
use crate::core::{InvalidUpdate, Store, VarRef};
use fixedbitset::FixedBitSet;
use std::collections::VecDeque;

#[derive(Clone, Default)]
pub struct Watches {
    on_bounds: RefVec<VarRef, Vec<PropagatorId>>,
}

impl Watches {
    /// Request a trigger of `propagator_id` on every bound change (lower or upper bound) of `watched`.
    pub fn add_watch(&mut self, watched: VarRef, propagator_id: PropagatorId) {
        self.on_bounds.fill_with(watched, Vec::new);
        let watchers = &mut self.on_bounds[watched];
        if !watchers.contains(&propagator_id) {
            watchers.push(propagator_id);
        }
    }

    /// Returns all propagators watching `var`.
    pub fn watchers(&self, var: VarRef) -> &[PropagatorId] {
        self.on_bounds.get(var).map(|v| v.as_slice()).unwrap_or(&[])
    }
}

#[derive(Clone, Copy, Default, Debug)]
pub struct Stats {
    pub num_propagations: u64,
    pub num_retired: u64,
}

#[derive(Clone, Default)]
pub struct Cp {
    /// All propagators ever posted. A `None` entry is a retired (subsumed) propagator.
    constraints: RefVec<PropagatorId, Option<DynPropagator>>,
    watches: Watches,
    num_active: usize,
    /// Propagators waiting to be run, in FIFO order.
    pending: VecDeque<PropagatorId>,
    /// Membership in `pending`, to avoid scheduling a propagator twice.
    scheduled: FixedBitSet,
    pub stats: Stats,
}

impl Cp {
    pub fn new() -> Cp {
        Cp::default()
    }

    /// Adds a propagator and schedules it for its initial propagation.
    pub fn add_propagator(&mut self, propagator: impl Into<DynPropagator>) -> PropagatorId {
        let propagator = propagator.into();
        let propagator_id = self.constraints.next_key();
        propagator.constraint.setup(propagator_id, &mut self.watches);
        self.constraints.push(Some(propagator));
        self.num_active += 1;
        self.scheduled.grow(self.constraints.len());
        self.schedule(propagator_id);
        propagator_id
    }

    /// Number of propagators that have not been retired.
    pub fn num_active(&self) -> usize {
        self.num_active
    }

    pub fn num_propagators(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_retired(&self, propagator: PropagatorId) -> bool {
        matches!(self.constraints.get(propagator), Some(None))
    }

    fn schedule(&mut self, propagator: PropagatorId) {
        if !self.scheduled.put(usize::from(propagator)) {
            self.pending.push_back(propagator);
        }
    }

    /// Schedules every propagator watching a variable modified since the last call.
    /// `origin` is not rescheduled: it is the idempotent propagator that made the changes.
    fn schedule_watchers(&mut self, store: &mut Store, origin: Option<PropagatorId>) {
        for var in store.drain_changes() {
            for &watcher in self.watches.watchers(var) {
                if Some(watcher) != origin
                    && self.constraints[watcher].is_some()
                    && !self.scheduled.put(usize::from(watcher))
                {
                    self.pending.push_back(watcher);
                }
            }
        }
    }

    fn retire(&mut self, propagator: PropagatorId) {
        if let Some(retired) = self.constraints[propagator].take() {
            tracing::trace!(propagator = retired.constraint.name(), id = ?propagator, "retired");
            self.num_active -= 1;
            self.stats.num_retired += 1;
        }
    }

    fn clear_pending(&mut self) {
        self.pending.clear();
        self.scheduled.clear();
    }

    /// Runs all scheduled propagators until a fixed point is reached.
    ///
    /// Changes made to `store` since the previous call (e.g. by a branching decision) schedule the corresponding
    /// watchers first. Returns an error if the store is or becomes failed.
    pub fn propagate(&mut self, store: &mut Store) -> Result<(), InvalidUpdate> {
        if let Some(failure) = store.failure() {
            self.clear_pending();
            return Err(failure);
        }
        self.schedule_watchers(store, None);

        while let Some(id) = self.pending.pop_front() {
            self.scheduled.set(usize::from(id), false);
            let Some(propagator) = &self.constraints[id] else {
                continue;
            };
            let propagator = propagator.constraint.as_ref();
            self.stats.num_propagations += 1;
            let result = propagator.propagate(store);
            let origin = propagator.idempotent().then_some(id);
            match result {
                Ok(PropagatorStatus::Fix) => self.schedule_watchers(store, origin),
                Ok(PropagatorStatus::Subsumed) => {
                    self.retire(id);
                    self.schedule_watchers(store, Some(id));
                }
                Err(failure) => {
                    tracing::trace!(propagator = propagator.name(), %failure, "failure");
                    self.clear_pending();
                    return Err(failure);
                }
            }
        }
        debug_assert!(!store.has_pending_changes());
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::difference::LeqOffset;
    use super::*;

    #[test]
    fn chained_differences_reach_fixed_point() {
        let mut store = Store::new();
        let vars: Vec<VarRef> = (0..5).map(|_| store.new_var(0, 20)).collect();
        let mut cp = Cp::new();
        for w in vars.windows(2) {
            // x_i + 3 <= x_{i+1}
            cp.add_propagator(LeqOffset::new(w[0], 3, w[1]));
        }
        cp.propagate(&mut store).unwrap();
        for (i, &v) in vars.iter().enumerate() {
            let i = i as i32;
            assert_eq!(store.bounds(v), (3 * i, 20 - 3 * (4 - i)));
        }

        // a later change only wakes up the watchers of the modified variable
        let before = cp.stats.num_propagations;
        store.set_lb(vars[4], 19).unwrap();
        cp.propagate(&mut store).unwrap();
        assert_eq!(cp.stats.num_propagations, before + 1);
        assert_eq!(store.bounds(vars[3]), (9, 17));
    }

    #[test]
    fn subsumed_propagators_are_retired() {
        let mut store = Store::new();
        let a = store.new_var(0, 5);
        let b = store.new_var(10, 15);
        let c = store.new_var(0, 15);
        let mut cp = Cp::new();
        let entailed = cp.add_propagator(LeqOffset::new(a, 2, b));
        let open = cp.add_propagator(LeqOffset::new(a, 2, c));
        cp.propagate(&mut store).unwrap();
        assert!(cp.is_retired(entailed));
        assert!(!cp.is_retired(open));
        assert_eq!(cp.num_active(), 1);
        assert_eq!(cp.stats.num_retired, 1);

        // a retired propagator is never run again
        let before = cp.stats.num_propagations;
        store.set_lb(a, 3).unwrap();
        cp.propagate(&mut store).unwrap();
        assert_eq!(cp.stats.num_propagations, before + 1);
        assert_eq!(store.lb(c), 5);
    }

    #[test]
    fn failure_is_reported_and_sticky() {
        let mut store = Store::new();
        let a = store.new_var(5, 10);
        let b = store.new_var(0, 6);
        let mut cp = Cp::new();
        cp.add_propagator(LeqOffset::new(a, 2, b));
        assert!(cp.propagate(&mut store).is_err());
        assert!(store.is_failed());
        assert!(cp.propagate(&mut store).is_err());
    }

    #[test]
    fn clones_propagate_independently() {
        let mut store = Store::new();
        let a = store.new_var(0, 10);
        let b = store.new_var(0, 10);
        let mut cp = Cp::new();
        cp.add_propagator(LeqOffset::new(a, 1, b));
        cp.propagate(&mut store).unwrap();

        let (mut store2, mut cp2) = (store.clone(), cp.clone());
        store2.set_lb(a, 6).unwrap();
        cp2.propagate(&mut store2).unwrap();
        assert_eq!(store2.lb(b), 7);
        assert_eq!(store.lb(b), 1);

        store.set_ub(b, 3).unwrap();
        cp.propagate(&mut store).unwrap();
        assert_eq!(store.ub(a), 2);
        assert_eq!(store2.ub(a), 9);
    }
}
