use crate::core::{InvalidUpdate, Store};
use crate::create_ref_type;

use super::Watches;

/// Unique ID of a propagator (assigned by the CP reasoner)
create_ref_type!(PropagatorId);

/// Outcome of a successful propagation.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum PropagatorStatus {
    /// The propagator may prune again after some of its variables change.
    Fix,
    /// The constraint is entailed by the current domains: the propagator can never prune again and should be retired.
    Subsumed,
}

pub trait Propagator: Send {
    /// Human readable name, used in traces.
    fn name(&self) -> &'static str;

    /// Registers the variables whose bound changes should trigger this propagator.
    fn setup(&self, id: PropagatorId, context: &mut Watches);

    /// Narrows the domains of `store`.
    ///
    /// An `Err` means that the store is failed (an empty domain was produced).
    fn propagate(&self, store: &mut Store) -> Result<PropagatorStatus, InvalidUpdate>;

    /// True if a single call to `propagate` always reaches a fixed point for this propagator.
    /// An idempotent propagator is not rescheduled by its own modifications.
    fn idempotent(&self) -> bool {
        false
    }

    fn clone_box(&self) -> Box<dyn Propagator>;
}

/// A simple wrapper around a propagator for dynamic-dispatch
pub struct DynPropagator {
    pub(super) constraint: Box<dyn Propagator>,
}

impl Clone for DynPropagator {
    fn clone(&self) -> Self {
        DynPropagator {
            constraint: self.constraint.clone_box(),
        }
    }
}

impl<T: Propagator + 'static> From<T> for DynPropagator {
    fn from(propagator: T) -> Self {
        DynPropagator {
            constraint: Box::new(propagator),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::VarRef;
    use crate::reasoners::cp::Cp;

    /// An example propagator for `a != b` over bounds: it can only act once one side is fixed
    /// and its value sits on a bound of the other side.
    #[derive(Clone)]
    struct NotEqual {
        a: VarRef,
        b: VarRef,
    }

    impl NotEqual {
        fn prune(store: &mut Store, fixed: VarRef, other: VarRef) -> Result<(), InvalidUpdate> {
            if let Some(v) = store.value(fixed) {
                // only bounds can be removed, a value strictly inside the domain is kept
                if store.lb(other) == v {
                    store.set_lb(other, v + 1)?;
                }
                if store.ub(other) == v {
                    store.set_ub(other, v - 1)?;
                }
            }
            Ok(())
        }
    }

    impl Propagator for NotEqual {
        fn name(&self) -> &'static str {
            "not-equal"
        }

        fn setup(&self, id: PropagatorId, context: &mut Watches) {
            context.add_watch(self.a, id);
            context.add_watch(self.b, id);
        }

        fn propagate(&self, store: &mut Store) -> Result<PropagatorStatus, InvalidUpdate> {
            Self::prune(store, self.a, self.b)?;
            Self::prune(store, self.b, self.a)?;
            let (a_lb, a_ub) = store.bounds(self.a);
            let (b_lb, b_ub) = store.bounds(self.b);
            if a_ub < b_lb || b_ub < a_lb {
                Ok(PropagatorStatus::Subsumed)
            } else {
                Ok(PropagatorStatus::Fix)
            }
        }

        fn clone_box(&self) -> Box<dyn Propagator> {
            Box::new(self.clone())
        }
    }

    #[test]
    fn user_defined_propagator() {
        let mut store = Store::new();
        let a = store.new_var(0, 0);
        let b = store.new_var(0, 3);
        let c = store.new_var(0, 3);
        let mut cp = Cp::new();
        cp.add_propagator(NotEqual { a, b });
        cp.add_propagator(NotEqual { a: b, b: c });
        assert!(cp.propagate(&mut store).is_ok());
        assert_eq!(store.bounds(b), (1, 3));
        assert_eq!(cp.num_active(), 1);

        store.set_value(b, 2).unwrap();
        store.set_value(c, 2).unwrap();
        let failure = cp.propagate(&mut store).unwrap_err();
        assert_eq!(failure.var, c);
        assert!(store.is_failed());
    }
}
