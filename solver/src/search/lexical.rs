use crate::core::{IntCst, InvalidUpdate, Store, VarRef};
use crate::errors::ArgumentError;
use crate::search::{check_pos, Brancher, BrancherId, Choice, VarSelect};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PreferredValue {
    Min,
    Max,
}

/// Assigns variables to their minimal or maximal value.
///
/// Each choice has two alternatives: the variable takes the preferred bound, or the bound is excluded.
/// Typically posted last, to finish the search once all high-priority decisions have been taken.
#[derive(Clone, Debug)]
pub struct Lexical {
    vars: Vec<VarRef>,
    select: VarSelect,
    pref: PreferredValue,
    /// All variables before this index are bound.
    start: usize,
}

impl Lexical {
    pub fn new(vars: Vec<VarRef>, select: VarSelect, pref: PreferredValue) -> Self {
        Lexical {
            vars,
            select,
            pref,
            start: 0,
        }
    }

    /// Assigns variables in declaration order to their minimal value.
    pub fn with_min(vars: Vec<VarRef>) -> Self {
        Lexical::new(vars, VarSelect::First, PreferredValue::Min)
    }

    /// Assigns variables in declaration order to their maximal value.
    pub fn with_max(vars: Vec<VarRef>) -> Self {
        Lexical::new(vars, VarSelect::First, PreferredValue::Max)
    }

    fn value(&self, choice: &Choice) -> IntCst {
        match self.pref {
            PreferredValue::Min => choice.min(),
            PreferredValue::Max => choice.max(),
        }
    }
}

impl Brancher for Lexical {
    fn status(&mut self, store: &Store) -> bool {
        while self.start < self.vars.len() && store.is_bound(self.vars[self.start]) {
            self.start += 1;
        }
        self.start < self.vars.len()
    }

    fn choice(&mut self, id: BrancherId, store: &Store) -> Choice {
        let vars = &self.vars;
        let Some(pos) = self.select.select(vars, self.start, store, |i| !store.is_bound(vars[i])) else {
            panic!("lexical brancher has no unbound variable left");
        };
        let (lb, ub) = store.bounds(vars[pos]);
        Choice::new(id, pos, lb, ub, 2)
    }

    fn restore(&self, id: BrancherId, pos: usize, min: IntCst, max: IntCst) -> Result<Choice, ArgumentError> {
        check_pos(id, pos, self.vars.len())?;
        Ok(Choice::new(id, pos, min, max, 2))
    }

    fn commit(&self, choice: &Choice, alternative: u32, store: &mut Store) -> Result<(), InvalidUpdate> {
        let var = self.vars[choice.pos()];
        let value = self.value(choice);
        match (alternative, self.pref) {
            (0, _) => store.set_value(var, value)?,
            (_, PreferredValue::Min) => store.set_lb(var, value + 1)?,
            (_, PreferredValue::Max) => store.set_ub(var, value - 1)?,
        };
        Ok(())
    }

    fn describe(&self, choice: &Choice, alternative: u32) -> String {
        let op = if alternative == 0 { "=" } else { "!=" };
        format!("x[{}] {op} {}", choice.pos(), self.value(choice))
    }

    fn clone_box(&self) -> Box<dyn Brancher> {
        Box::new(self.clone())
    }
}
