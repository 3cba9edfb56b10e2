use crate::core::{IntCst, IntDomain, Store, VarRef};

/// The domains of a solution node.
///
/// Only the variables decided by branchers (and those fixed by propagation) are guaranteed to be bound.
#[derive(Clone, Debug)]
pub struct Solution {
    store: Store,
}

impl Solution {
    pub(crate) fn new(store: Store) -> Self {
        Solution { store }
    }

    /// Value of `var`, or `None` if its domain in the solution is not a singleton.
    pub fn value(&self, var: VarRef) -> Option<IntCst> {
        self.store.value(var)
    }

    pub fn domain(&self, var: VarRef) -> IntDomain {
        self.store.domain(var)
    }

    pub fn lb(&self, var: VarRef) -> IntCst {
        self.store.lb(var)
    }

    pub fn ub(&self, var: VarRef) -> IntCst {
        self.store.ub(var)
    }

    /// Values of all `vars`, or `None` if one of them is not bound.
    pub fn values(&self, vars: &[VarRef]) -> Option<Vec<IntCst>> {
        vars.iter().map(|&v| self.value(v)).collect()
    }
}
