use crate::core::{IntCst, InvalidUpdate, Store, VarRef};
use crate::errors::{check_extents, check_same_sizes, ArgumentError};
use crate::search::{check_pos, Brancher, BrancherId, Choice};
use num_integer::average_floor;

/// Splits domains in two halves: `x <= mid` first, then `x > mid`.
///
/// With a filter, a variable is only split while its domain holds at least `ratio * extent` values, which stops the
/// bisection once the position of an item of that extent is roughly known.
#[derive(Clone, Debug)]
pub struct Bisect {
    vars: Vec<VarRef>,
    filter: Option<SizeFilter>,
    /// All variables before this index are known to be resolved.
    start: usize,
}

#[derive(Clone, Debug)]
struct SizeFilter {
    extents: Vec<IntCst>,
    ratio: f64,
}

impl Bisect {
    pub fn new(vars: Vec<VarRef>) -> Self {
        Bisect {
            vars,
            filter: None,
            start: 0,
        }
    }

    /// Only split variable `i` while its domain size is at least `ratio * extents[i]`.
    pub fn with_filter(vars: Vec<VarRef>, extents: Vec<IntCst>, ratio: f64) -> Result<Self, ArgumentError> {
        check_same_sizes("bisect", &[vars.len(), extents.len()])?;
        check_extents("bisect", &extents)?;
        Ok(Bisect {
            vars,
            filter: Some(SizeFilter { extents, ratio }),
            start: 0,
        })
    }

    fn eligible(&self, pos: usize, store: &Store) -> bool {
        let dom = store.domain(self.vars[pos]);
        if dom.is_bound() {
            return false;
        }
        match &self.filter {
            Some(filter) => dom.size() as f64 >= filter.ratio * filter.extents[pos] as f64,
            None => true,
        }
    }

    fn mid(choice: &Choice) -> IntCst {
        average_floor(choice.min(), choice.max())
    }
}

impl Brancher for Bisect {
    fn status(&mut self, store: &Store) -> bool {
        while self.start < self.vars.len() {
            if self.eligible(self.start, store) {
                return true;
            }
            self.start += 1;
        }
        false
    }

    fn choice(&mut self, id: BrancherId, store: &Store) -> Choice {
        let Some(pos) = (self.start..self.vars.len()).find(|&i| self.eligible(i, store)) else {
            panic!("bisect brancher has no variable left to split");
        };
        let (lb, ub) = store.bounds(self.vars[pos]);
        Choice::new(id, pos, lb, ub, 2)
    }

    fn restore(&self, id: BrancherId, pos: usize, min: IntCst, max: IntCst) -> Result<Choice, ArgumentError> {
        check_pos(id, pos, self.vars.len())?;
        Ok(Choice::new(id, pos, min, max, 2))
    }

    fn commit(&self, choice: &Choice, alternative: u32, store: &mut Store) -> Result<(), InvalidUpdate> {
        let var = self.vars[choice.pos()];
        let mid = Self::mid(choice);
        if alternative == 0 {
            store.set_ub(var, mid)?;
        } else {
            store.set_lb(var, mid + 1)?;
        }
        Ok(())
    }

    fn describe(&self, choice: &Choice, alternative: u32) -> String {
        let op = if alternative == 0 { "<=" } else { ">" };
        format!("x[{}] {op} {}", choice.pos(), Self::mid(choice))
    }

    fn clone_box(&self) -> Box<dyn Brancher> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const ID: BrancherId = BrancherId::from_u32(0);

    #[test]
    fn halves() {
        let mut store = Store::new();
        let x = store.new_var(-3, 4);
        let mut brancher = Bisect::new(vec![x]);
        assert!(brancher.status(&store));
        let choice = brancher.choice(ID, &store);
        let mut low = store.clone();
        brancher.commit(&choice, 0, &mut low).unwrap();
        assert_eq!(low.bounds(x), (-3, 0));
        brancher.commit(&choice, 1, &mut store).unwrap();
        assert_eq!(store.bounds(x), (1, 4));
        assert_eq!(brancher.describe(&choice, 0), "x[0] <= 0");
    }

    #[test]
    fn filter_stops_splitting() {
        let mut store = Store::new();
        let x = store.new_var(0, 9);
        // extent 10 with ratio 0.3: split while at least 3 values remain
        let mut brancher = Bisect::with_filter(vec![x], vec![10], 0.3).unwrap();
        assert!(brancher.status(&store));
        store.narrow(x, 4, 6).unwrap();
        assert!(brancher.status(&store));
        store.narrow(x, 4, 5).unwrap();
        assert!(!brancher.status(&store));
        assert!(Bisect::with_filter(vec![x], vec![], 0.3).is_err());
    }
}
