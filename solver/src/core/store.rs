use crate::collections::ref_store::RefVec;
use crate::core::{IntCst, IntDomain, VarRef, INT_CST_MAX, INT_CST_MIN};
use thiserror::Error;

/// An update that would have left `var` with the empty domain `[lb, ub]`.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Error)]
#[error("empty domain for {var:?}: [{lb}, {ub}]")]
pub struct InvalidUpdate {
    pub var: VarRef,
    pub lb: IntCst,
    pub ub: IntCst,
}

/// Domains of all variables of a search node.
///
/// Bounds only ever shrink. Every effective change is recorded so that the propagation engine can wake up the
/// propagators watching the modified variable.
///
/// **Invariant:** as long as the store is not failed, every domain is non-empty. An update that would empty a
/// domain is rejected, returned as an [InvalidUpdate] and permanently fails the store.
#[derive(Clone, Default, Debug)]
pub struct Store {
    domains: RefVec<VarRef, IntDomain>,
    /// Variables whose bounds changed since the last call to `drain_changes`. May contain duplicates.
    changes: Vec<VarRef>,
    failure: Option<InvalidUpdate>,
}

impl Store {
    pub fn new() -> Store {
        Store::default()
    }

    /// Creates a new variable with domain `[lb, ub]`.
    /// An empty initial domain, or one reaching outside `[INT_CST_MIN, INT_CST_MAX]`, fails the store.
    pub fn new_var(&mut self, lb: IntCst, ub: IntCst) -> VarRef {
        let var = self.domains.push(IntDomain::new(lb.max(INT_CST_MIN), ub.min(INT_CST_MAX)));
        if lb > ub || lb < INT_CST_MIN || ub > INT_CST_MAX {
            self.record_failure(InvalidUpdate { var, lb, ub });
        }
        var
    }

    pub fn num_variables(&self) -> usize {
        self.domains.len()
    }

    pub fn variables(&self) -> impl Iterator<Item = VarRef> {
        self.domains.keys()
    }

    pub fn domain(&self, var: VarRef) -> IntDomain {
        self.domains[var]
    }

    pub fn lb(&self, var: VarRef) -> IntCst {
        self.domains[var].lb
    }

    pub fn ub(&self, var: VarRef) -> IntCst {
        self.domains[var].ub
    }

    pub fn bounds(&self, var: VarRef) -> (IntCst, IntCst) {
        let dom = self.domains[var];
        (dom.lb, dom.ub)
    }

    pub fn is_bound(&self, var: VarRef) -> bool {
        self.domains[var].is_bound()
    }

    /// Value of the variable if its domain is a singleton.
    pub fn value(&self, var: VarRef) -> Option<IntCst> {
        self.domains[var].as_singleton()
    }

    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }

    /// The update that failed this store, if any.
    pub fn failure(&self) -> Option<InvalidUpdate> {
        self.failure
    }

    /// Intersects the domain of `var` with `[lb, ub]`.
    ///
    /// Results:
    ///  - `Ok(true)`: the domain was reduced and is non-empty.
    ///  - `Ok(false)`: nothing changed, the domain was already included in `[lb, ub]`.
    ///  - `Err(InvalidUpdate)`: the intersection is empty. The domain is left untouched but the store is now failed.
    pub fn narrow(&mut self, var: VarRef, lb: IntCst, ub: IntCst) -> Result<bool, InvalidUpdate> {
        if let Some(failure) = self.failure {
            return Err(failure);
        }
        let current = self.domains[var];
        let new = current.intersection(&IntDomain::new(lb, ub));
        if new.is_empty() {
            let failure = InvalidUpdate {
                var,
                lb: new.lb,
                ub: new.ub,
            };
            self.record_failure(failure);
            Err(failure)
        } else if new == current {
            Ok(false)
        } else {
            self.domains[var] = new;
            self.changes.push(var);
            Ok(true)
        }
    }

    pub fn set_lb(&mut self, var: VarRef, lb: IntCst) -> Result<bool, InvalidUpdate> {
        self.narrow(var, lb, IntCst::MAX)
    }

    pub fn set_ub(&mut self, var: VarRef, ub: IntCst) -> Result<bool, InvalidUpdate> {
        self.narrow(var, IntCst::MIN, ub)
    }

    pub fn set_value(&mut self, var: VarRef, value: IntCst) -> Result<bool, InvalidUpdate> {
        self.narrow(var, value, value)
    }

    /// Fails the store because `var` has no support left, even though its bounds are not crossed yet.
    pub fn wipe_out(&mut self, var: VarRef) -> InvalidUpdate {
        let dom = self.domains[var];
        let failure = InvalidUpdate {
            var,
            lb: dom.ub.saturating_add(1),
            ub: dom.ub,
        };
        self.record_failure(failure);
        failure
    }

    fn record_failure(&mut self, failure: InvalidUpdate) {
        if self.failure.is_none() {
            self.failure = Some(failure);
        }
    }

    /// True if there are changes not yet consumed by [Store::drain_changes].
    pub fn has_pending_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Returns and forgets all variables modified since the previous call.
    pub fn drain_changes(&mut self) -> std::vec::Drain<'_, VarRef> {
        self.changes.drain(..)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn narrowing_records_changes() {
        let mut store = Store::new();
        let a = store.new_var(0, 10);
        let b = store.new_var(-5, 5);

        assert_eq!(store.narrow(a, 2, 20), Ok(true));
        assert_eq!(store.bounds(a), (2, 10));
        assert_eq!(store.set_lb(a, 1), Ok(false));
        assert_eq!(store.set_ub(b, 0), Ok(true));
        assert_eq!(store.set_value(b, 0), Ok(true));
        assert_eq!(store.value(b), Some(0));
        assert_eq!(store.drain_changes().collect::<Vec<_>>(), vec![a, b, b]);
        assert!(!store.has_pending_changes());
    }

    #[test]
    fn empty_intersection_fails_the_store() {
        let mut store = Store::new();
        let a = store.new_var(0, 10);
        let failure = store.narrow(a, 11, 15).unwrap_err();
        assert_eq!(failure.var, a);
        assert_eq!((failure.lb, failure.ub), (11, 10));
        assert!(store.is_failed());
        // the domain is untouched but no further update is accepted
        assert_eq!(store.bounds(a), (0, 10));
        assert_eq!(store.set_lb(a, 3), Err(failure));
    }

    #[test]
    fn empty_initial_domain() {
        let mut store = Store::new();
        store.new_var(3, 2);
        assert!(store.is_failed());
    }

    #[test]
    fn out_of_range_domain() {
        let mut store = Store::new();
        store.new_var(INT_CST_MIN, INT_CST_MAX);
        assert!(!store.is_failed());
        let a = store.new_var(0, IntCst::MAX);
        assert!(store.is_failed());
        assert_eq!(store.bounds(a), (0, INT_CST_MAX));

        let mut store = Store::new();
        store.new_var(IntCst::MIN, 0);
        assert!(store.is_failed());
    }

    #[test]
    fn clones_are_independent() {
        let mut parent = Store::new();
        let a = parent.new_var(0, 10);
        let mut child = parent.clone();
        child.set_ub(a, 3).unwrap();
        assert_eq!(parent.bounds(a), (0, 10));
        assert_eq!(child.bounds(a), (0, 3));
        parent.wipe_out(a);
        assert!(parent.is_failed());
        assert!(!child.is_failed());
    }
}
