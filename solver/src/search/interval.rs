//! Interval branching for placement variables.
//!
//! Each variable `x_i` is the position of an item of extent `w_i`. The brancher cuts the domain of `x_i` into
//! consecutive intervals of at most `floor((1 - p) * w_i) + 1` values each, creating one alternative per interval.
//! Whatever the interval chosen, the item then covers a *mandatory part* of at least `p * w_i` values, which
//! gives propagators (e.g. non-overlap) something to reason on long before the position is fixed.

use crate::core::{IntCst, InvalidUpdate, Store, VarRef, INT_CST_MAX};
use crate::errors::{check_extents, check_same_sizes, ArgumentError};
use crate::search::{check_pos, Brancher, BrancherId, Choice};
use env_param::EnvParam;

/// Items smaller than this are never split: the gain in propagation does not pay for the extra alternatives.
pub static INTERVAL_MIN_EXTENT: EnvParam<IntCst> = EnvParam::new("TESSERA_INTERVAL_MIN_EXTENT", "5");

/// Tolerance when flooring `(1 - p) * w`, so that e.g. `(1 - 0.9) * 10` yields `1` and not `0`.
const FLOOR_EPSILON: f64 = 1e-9;

#[derive(Clone, Debug)]
pub struct IntervalSplit {
    vars: Vec<VarRef>,
    extents: Vec<IntCst>,
    /// Mandatory fraction, in `(0, 1)`.
    p: f64,
    min_extent: IntCst,
    /// All variables before this index are known not to need any split.
    start: usize,
}

impl IntervalSplit {
    pub fn new(vars: Vec<VarRef>, extents: Vec<IntCst>, p: f64) -> Result<Self, ArgumentError> {
        check_same_sizes("interval", &[vars.len(), extents.len()])?;
        check_extents("interval", &extents)?;
        if !(p > 0.0 && p < 1.0) {
            return Err(ArgumentError::InvalidFraction {
                constraint: "interval",
                value: p,
            });
        }
        Ok(IntervalSplit {
            vars,
            extents,
            p,
            min_extent: INTERVAL_MIN_EXTENT.get(),
            start: 0,
        })
    }

    /// Overrides the minimal extent of the items to split.
    pub fn with_min_extent(mut self, min_extent: IntCst) -> Self {
        self.min_extent = min_extent;
        self
    }

    pub fn mandatory_fraction(&self) -> f64 {
        self.p
    }

    /// Maximal width (`max - min`) of an interval for the variable at `pos`.
    pub fn interval_size(&self, pos: usize) -> IntCst {
        ((1.0 - self.p) * self.extents[pos] as f64 + FLOOR_EPSILON).floor() as IntCst
    }

    /// Number of intervals of width at most `new_width` needed to cover a domain of width `old_width`.
    pub fn alternatives(old_width: IntCst, new_width: IntCst) -> u32 {
        debug_assert!(old_width >= 0 && new_width >= 0);
        let values = old_width as i64 + 1;
        let per_interval = new_width as i64 + 1;
        ((values + per_interval - 1) / per_interval) as u32
    }

    fn needs_split(&self, pos: usize, store: &Store) -> bool {
        self.extents[pos] >= self.min_extent && store.domain(self.vars[pos]).width() > self.interval_size(pos)
    }

    /// Bounds of the interval selected by `alternative`.
    fn interval(&self, choice: &Choice, alternative: u32) -> (IntCst, IntCst) {
        let step = self.interval_size(choice.pos()) as i64 + 1;
        let lo = choice.min() as i64 + alternative as i64 * step;
        let hi = (lo + step - 1).min(choice.max() as i64);
        (lo.min(INT_CST_MAX as i64) as IntCst, hi as IntCst)
    }
}

impl Brancher for IntervalSplit {
    fn status(&mut self, store: &Store) -> bool {
        while self.start < self.vars.len() {
            if self.needs_split(self.start, store) {
                return true;
            }
            self.start += 1;
        }
        false
    }

    fn choice(&mut self, id: BrancherId, store: &Store) -> Choice {
        let Some(pos) = (self.start..self.vars.len()).find(|&i| self.needs_split(i, store)) else {
            panic!("interval brancher has no variable left to split");
        };
        let dom = store.domain(self.vars[pos]);
        let alternatives = Self::alternatives(dom.width(), self.interval_size(pos));
        Choice::new(id, pos, dom.lb, dom.ub, alternatives)
    }

    fn restore(&self, id: BrancherId, pos: usize, min: IntCst, max: IntCst) -> Result<Choice, ArgumentError> {
        check_pos(id, pos, self.vars.len())?;
        let alternatives = Self::alternatives((max - min).max(0), self.interval_size(pos));
        Ok(Choice::new(id, pos, min, max, alternatives))
    }

    fn commit(&self, choice: &Choice, alternative: u32, store: &mut Store) -> Result<(), InvalidUpdate> {
        debug_assert!(alternative < choice.alternatives());
        let (lo, hi) = self.interval(choice, alternative);
        store.narrow(self.vars[choice.pos()], lo, hi)?;
        Ok(())
    }

    fn describe(&self, choice: &Choice, alternative: u32) -> String {
        let (lo, hi) = self.interval(choice, alternative);
        format!("{lo} <= x[{}] <= {hi}", choice.pos())
    }

    fn clone_box(&self) -> Box<dyn Brancher> {
        Box::new(self.clone())
    }
}
