use crate::core::{IntCst, InvalidUpdate, Store, VarRef, INT_CST_MAX};
use crate::reasoners::cp::{Propagator, PropagatorId, PropagatorStatus, Watches};

/// Difference constraint `x + offset <= y`, propagated on bounds.
#[derive(Clone, Debug)]
pub struct LeqOffset {
    x: VarRef,
    offset: IntCst,
    y: VarRef,
}

impl LeqOffset {
    /// Offsets beyond the width of the value range are clamped: the constraint is then trivially true (or false)
    /// for every pair of values, and shifting a bound by the offset stays within `IntCst`.
    pub fn new(x: VarRef, offset: IntCst, y: VarRef) -> Self {
        let span = 2 * INT_CST_MAX + 1;
        LeqOffset {
            x,
            offset: offset.clamp(-span, span),
            y,
        }
    }

    /// True if the constraint holds for every value left in the domains.
    pub fn entailed(&self, store: &Store) -> bool {
        store.ub(self.x) + self.offset <= store.lb(self.y)
    }
}

impl Propagator for LeqOffset {
    fn name(&self) -> &'static str {
        "leq-offset"
    }

    fn setup(&self, id: PropagatorId, context: &mut Watches) {
        context.add_watch(self.x, id);
        context.add_watch(self.y, id);
    }

    fn propagate(&self, store: &mut Store) -> Result<PropagatorStatus, InvalidUpdate> {
        store.set_lb(self.y, store.lb(self.x) + self.offset)?;
        store.set_ub(self.x, store.ub(self.y) - self.offset)?;
        if self.entailed(store) {
            Ok(PropagatorStatus::Subsumed)
        } else {
            Ok(PropagatorStatus::Fix)
        }
    }

    fn idempotent(&self) -> bool {
        // the second update cannot invalidate the first one
        true
    }

    fn clone_box(&self) -> Box<dyn Propagator> {
        Box::new(self.clone())
    }
}
