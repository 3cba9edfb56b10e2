use crate::core::IntCst;
use std::fmt::{Display, Formatter};

/// Bounds `[lb, ub]` of an integer variable.
///
/// A domain with `lb > ub` is empty. Empty domains never live in a consistent [Store](crate::core::Store):
/// an update producing one is rejected and fails the store instead.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct IntDomain {
    pub lb: IntCst,
    pub ub: IntCst,
}

impl IntDomain {
    pub const fn new(lb: IntCst, ub: IntCst) -> IntDomain {
        IntDomain { lb, ub }
    }

    pub const fn singleton(value: IntCst) -> IntDomain {
        IntDomain { lb: value, ub: value }
    }

    pub fn is_empty(&self) -> bool {
        self.lb > self.ub
    }

    /// True if the domain contains a single value.
    pub fn is_bound(&self) -> bool {
        self.lb == self.ub
    }

    pub fn as_singleton(&self) -> Option<IntCst> {
        if self.is_bound() {
            Some(self.lb)
        } else {
            None
        }
    }

    /// Difference between the upper and lower bound, e.g. `0` for a singleton.
    pub fn width(&self) -> IntCst {
        self.ub - self.lb
    }

    /// Number of values in the domain.
    pub fn size(&self) -> i64 {
        (self.ub as i64 - self.lb as i64 + 1).max(0)
    }

    pub fn contains(&self, value: IntCst) -> bool {
        self.lb <= value && value <= self.ub
    }

    pub fn intersection(&self, other: &IntDomain) -> IntDomain {
        IntDomain::new(self.lb.max(other.lb), self.ub.min(other.ub))
    }

    /// True if every value of `self` is in `other`.
    pub fn is_subset_of(&self, other: &IntDomain) -> bool {
        self.is_empty() || (other.lb <= self.lb && self.ub <= other.ub)
    }
}

impl Display for IntDomain {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_bound() {
            write!(f, "{}", self.lb)
        } else {
            write!(f, "[{}, {}]", self.lb, self.ub)
        }
    }
}
