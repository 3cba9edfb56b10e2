//! Branchers: policies deciding how to split a search node into several children when propagation alone does not
//! solve the problem.
//!
//! A brancher is asked for its [status](Brancher::status) and, if it still has work, for a [Choice]. The search
//! engine then [commits](Brancher::commit) each alternative of the choice in its own copy of the node.

pub mod bisect;
pub mod interval;
pub mod lexical;

use crate::core::{IntCst, InvalidUpdate, Store, VarRef};
use crate::create_ref_type;
use crate::errors::ArgumentError;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

create_ref_type!(BrancherId);

/// A branching decision: split the domain of the variable at index `pos` of a brancher, whose bounds were
/// `[min, max]` when the choice was made, into `alternatives` children.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Choice {
    brancher: BrancherId,
    pos: u32,
    min: IntCst,
    max: IntCst,
    alternatives: u32,
}

impl Choice {
    pub fn new(brancher: BrancherId, pos: usize, min: IntCst, max: IntCst, alternatives: u32) -> Self {
        debug_assert!(alternatives >= 1);
        Choice {
            brancher,
            pos: pos as u32,
            min,
            max,
            alternatives,
        }
    }

    pub fn brancher(&self) -> BrancherId {
        self.brancher
    }

    pub fn pos(&self) -> usize {
        self.pos as usize
    }

    pub fn min(&self) -> IntCst {
        self.min
    }

    pub fn max(&self) -> IntCst {
        self.max
    }

    pub fn alternatives(&self) -> u32 {
        self.alternatives
    }

    /// Serializable form of the choice. The number of alternatives is not part of it: it is recomputed by the
    /// brancher when restoring the choice.
    pub fn archive(&self) -> ChoiceArchive {
        ChoiceArchive {
            brancher: self.brancher.to_u32(),
            pos: self.pos,
            min: self.min,
            max: self.max,
        }
    }
}

/// Archived [Choice], from which the brancher can rebuild an identical choice.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ChoiceArchive {
    pub brancher: u32,
    pub pos: u32,
    pub min: IntCst,
    pub max: IntCst,
}

pub trait Brancher: Send {
    /// Returns true if the brancher still has a decision to make in this node.
    ///
    /// The brancher may use it to advance internal caches: it is invoked on the node's own copy of the brancher and
    /// domains only shrink in descendants.
    fn status(&mut self, store: &Store) -> bool;

    /// Builds the next choice. Must only be called after `status` returned true.
    ///
    /// # Panic
    /// Panics if no decision can be made, which means the brancher broke its own contract.
    fn choice(&mut self, id: BrancherId, store: &Store) -> Choice;

    /// Rebuilds a choice from its archived parts.
    fn restore(&self, id: BrancherId, pos: usize, min: IntCst, max: IntCst) -> Result<Choice, ArgumentError>;

    /// Applies the alternative `alternative` of `choice` to the store.
    fn commit(&self, choice: &Choice, alternative: u32, store: &mut Store) -> Result<(), InvalidUpdate>;

    /// Human readable description of an alternative, used in traces.
    fn describe(&self, choice: &Choice, alternative: u32) -> String;

    fn clone_box(&self) -> Box<dyn Brancher>;
}

/// A simple wrapper around a brancher for dynamic-dispatch
pub struct DynBrancher {
    pub(crate) brancher: Box<dyn Brancher>,
}

impl Clone for DynBrancher {
    fn clone(&self) -> Self {
        DynBrancher {
            brancher: self.brancher.clone_box(),
        }
    }
}

impl<T: Brancher + 'static> From<T> for DynBrancher {
    fn from(brancher: T) -> Self {
        DynBrancher {
            brancher: Box::new(brancher),
        }
    }
}

/// Heuristic for picking the next variable to branch on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum VarSelect {
    /// First variable in declaration order.
    #[default]
    First,
    /// Variable with the fewest values, ties broken by declaration order.
    SmallestDomain,
    /// Variable with the smallest lower bound, ties broken by declaration order.
    SmallestMin,
    /// Variable with the largest upper bound, ties broken by declaration order.
    LargestMax,
}

impl VarSelect {
    /// Index of the selected variable among those accepted by `eligible`.
    /// `start` is the index of the first variable that may be eligible.
    pub(crate) fn select(
        self,
        vars: &[VarRef],
        start: usize,
        store: &Store,
        eligible: impl Fn(usize) -> bool,
    ) -> Option<usize> {
        let mut candidates = (start..vars.len()).filter(|&i| eligible(i));
        match self {
            VarSelect::First => candidates.next(),
            VarSelect::SmallestDomain => candidates.min_by_key(|&i| store.domain(vars[i]).size()),
            VarSelect::SmallestMin => candidates.min_by_key(|&i| store.lb(vars[i])),
            VarSelect::LargestMax => candidates.min_by_key(|&i| Reverse(store.ub(vars[i]))),
        }
    }
}

/// Checks that `pos` designates one of the `len` variables of a brancher.
pub(crate) fn check_pos(id: BrancherId, pos: usize, len: usize) -> Result<(), ArgumentError> {
    if pos < len {
        Ok(())
    } else {
        Err(ArgumentError::InvalidPosition {
            brancher: id.to_u32(),
            pos: pos as u32,
            len,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn archive_drops_alternatives() {
        let choice = Choice::new(BrancherId::from_u32(2), 3, -4, 12, 5);
        let archive = choice.archive();
        assert_eq!(
            archive,
            ChoiceArchive {
                brancher: 2,
                pos: 3,
                min: -4,
                max: 12
            }
        );
        let json = serde_json::to_string(&archive).unwrap();
        assert_eq!(json, r#"{"brancher":2,"pos":3,"min":-4,"max":12}"#);
        let back: ChoiceArchive = serde_json::from_str(&json).unwrap();
        assert_eq!(back, archive);
    }

    #[test]
    fn variable_selection() {
        let mut store = Store::new();
        let vars = [
            store.new_var(5, 9),
            store.new_var(2, 3),
            store.new_var(1, 1),
            store.new_var(2, 8),
        ];
        let unbound = |i: usize| !store.is_bound(vars[i]);
        assert_eq!(VarSelect::First.select(&vars, 0, &store, unbound), Some(0));
        assert_eq!(VarSelect::First.select(&vars, 2, &store, unbound), Some(3));
        assert_eq!(VarSelect::SmallestDomain.select(&vars, 0, &store, unbound), Some(1));
        assert_eq!(VarSelect::SmallestMin.select(&vars, 0, &store, unbound), Some(1));
        assert_eq!(VarSelect::SmallestMin.select(&vars, 4, &store, unbound), None);
        assert_eq!(VarSelect::LargestMax.select(&vars, 0, &store, unbound), Some(0));
        assert_eq!(VarSelect::LargestMax.select(&vars, 1, &store, unbound), Some(3));
    }

    #[test]
    fn largest_max_keeps_declaration_order_on_ties() {
        let mut store = Store::new();
        let vars = [store.new_var(0, 4), store.new_var(3, 7), store.new_var(1, 7)];
        assert_eq!(VarSelect::LargestMax.select(&vars, 0, &store, |_| true), Some(1));
    }
}
