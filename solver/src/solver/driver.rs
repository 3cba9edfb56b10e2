use crate::core::{IntCst, InvalidUpdate, VarRef};
use crate::search::Choice;
use crate::solver::solution::Solution;
use crate::solver::space::Space;
use crate::solver::stats::Stats;
use std::time::Instant;

/// Optimization objective for branch-and-bound search.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Objective {
    Minimize(VarRef),
    Maximize(VarRef),
}

impl Objective {
    pub fn var(&self) -> VarRef {
        match self {
            Objective::Minimize(var) | Objective::Maximize(var) => *var,
        }
    }

    /// Best objective value reachable in the solution.
    fn value(&self, solution: &Solution) -> IntCst {
        match self {
            Objective::Minimize(var) => solution.lb(*var),
            Objective::Maximize(var) => solution.ub(*var),
        }
    }

    /// Requires the objective to be strictly better than `best`.
    fn improve_on(&self, best: IntCst, space: &mut Space) -> Result<bool, InvalidUpdate> {
        match self {
            Objective::Minimize(var) => space.narrow(*var, IntCst::MIN, best - 1),
            Objective::Maximize(var) => space.narrow(*var, best + 1, IntCst::MAX),
        }
    }
}

/// Budget of a search. The search is interrupted as soon as one of the limits is exceeded.
#[derive(Copy, Clone, Debug, Default)]
pub struct SearchLimits {
    pub max_nodes: Option<u64>,
    pub deadline: Option<Instant>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SearchStatus {
    /// More solutions may be produced.
    Running,
    /// The whole search tree was explored: no solution (or no better solution) exists beyond those produced.
    Exhausted,
    /// The search stopped because its budget was exceeded. Unexplored parts of the tree may contain solutions.
    Interrupted,
}

/// An open node of the search tree: a propagated space together with the choice made in it.
struct Frame {
    space: Space,
    choice: Choice,
    next_alternative: u32,
}

/// Depth-first search, producing solutions lazily through [Iterator::next].
///
/// Each node is propagated to a fixed point then split according to the choice of the first brancher with work
/// left. Alternatives are explored left to right, each in its own copy of the node, copies being made only when the
/// alternative is explored. The last alternative reuses the node itself.
///
/// In branch-and-bound mode, every node explored after a solution must improve on the objective value of the best
/// solution found so far, so that each produced solution is strictly better than the previous one.
pub struct Search {
    root: Option<Space>,
    stack: Vec<Frame>,
    objective: Option<Objective>,
    best: Option<IntCst>,
    limits: SearchLimits,
    status: SearchStatus,
    stats: Stats,
}

impl Search {
    /// Plain depth-first search enumerating all solutions of `root`.
    pub fn dfs(root: Space) -> Search {
        Search {
            root: Some(root),
            stack: Vec::new(),
            objective: None,
            best: None,
            limits: SearchLimits::default(),
            status: SearchStatus::Running,
            stats: Stats::default(),
        }
    }

    /// Branch-and-bound search producing solutions of strictly improving objective value.
    pub fn bab(root: Space, objective: Objective) -> Search {
        Search {
            objective: Some(objective),
            ..Search::dfs(root)
        }
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Search {
        self.limits = limits;
        self
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Objective value of the best solution found so far, in branch-and-bound mode.
    pub fn best_objective(&self) -> Option<IntCst> {
        self.best
    }

    /// Explores the tree until the next solution, returning `None` once the search is exhausted or interrupted.
    pub fn next_solution(&mut self) -> Option<Solution> {
        if self.status != SearchStatus::Running {
            return None;
        }
        let start = Instant::now();
        let result = self.explore();
        self.stats.solve_time += start.elapsed();
        match self.status {
            SearchStatus::Running => {}
            SearchStatus::Exhausted => tracing::debug!(solutions = self.stats.num_solutions, "search exhausted"),
            SearchStatus::Interrupted => tracing::debug!(nodes = self.stats.num_nodes, "search interrupted"),
        }
        result
    }

    /// Best solution of the search, consuming all intermediate ones.
    /// In branch-and-bound mode, this is the optimum if the search ends [exhausted](SearchStatus::Exhausted).
    pub fn last_solution(&mut self) -> Option<Solution> {
        let mut last = None;
        while let Some(sol) = self.next_solution() {
            last = Some(sol);
        }
        last
    }

    fn limit_exceeded(&self) -> bool {
        self.limits.max_nodes.is_some_and(|max| self.stats.num_nodes >= max)
            || self.limits.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    fn explore(&mut self) -> Option<Solution> {
        loop {
            if self.limit_exceeded() {
                self.status = SearchStatus::Interrupted;
                return None;
            }
            let Some(mut space) = self.next_node() else {
                if self.status == SearchStatus::Running {
                    self.status = SearchStatus::Exhausted;
                }
                return None;
            };
            self.stats.num_nodes += 1;
            if let Err(failure) = self.process(&mut space) {
                tracing::trace!(%failure, depth = self.stack.len(), "failed node");
                self.stats.num_failures += 1;
                continue;
            }
            match space.choice() {
                Some(choice) => {
                    self.stats.num_decisions += 1;
                    self.stack.push(Frame {
                        space,
                        choice,
                        next_alternative: 0,
                    });
                    self.stats.max_depth = self.stats.max_depth.max(self.stack.len());
                }
                None => {
                    let solution = Solution::new(space.into_store());
                    self.stats.num_solutions += 1;
                    if let Some(objective) = &self.objective {
                        let value = objective.value(&solution);
                        tracing::debug!(objective = value, nodes = self.stats.num_nodes, "new solution");
                        self.best = Some(value);
                    } else {
                        tracing::debug!(nodes = self.stats.num_nodes, "new solution");
                    }
                    return Some(solution);
                }
            }
        }
    }

    /// Constrains the node with the current bound on the objective, if any, and propagates it.
    fn process(&mut self, space: &mut Space) -> Result<(), InvalidUpdate> {
        if let (Some(objective), Some(best)) = (&self.objective, self.best) {
            objective.improve_on(best, space)?;
        }
        let before = space.cp_stats();
        let result = space.propagate();
        let after = space.cp_stats();
        self.stats.num_propagations += after.num_propagations - before.num_propagations;
        self.stats.num_retired += after.num_retired - before.num_retired;
        result
    }

    /// Returns the next node to explore: the root on the first call, then the next alternative of the deepest open
    /// choice. Nodes whose commit fails are counted and skipped, which may exhaust the budget: the search is then
    /// marked as interrupted and `None` is returned.
    fn next_node(&mut self) -> Option<Space> {
        if let Some(root) = self.root.take() {
            return Some(root);
        }
        loop {
            if self.limit_exceeded() {
                self.status = SearchStatus::Interrupted;
                return None;
            }
            let frame = self.stack.last_mut()?;
            let alternative = frame.next_alternative;
            frame.next_alternative += 1;
            let choice = frame.choice;
            let mut child = if frame.next_alternative < choice.alternatives() {
                frame.space.clone()
            } else {
                self.stack.pop()?.space
            };
            if tracing::enabled!(tracing::Level::TRACE) {
                tracing::trace!(depth = self.stack.len(), "commit {}", child.describe(&choice, alternative));
            }
            match child.commit(&choice, alternative) {
                Ok(()) => return Some(child),
                Err(failure) => {
                    tracing::trace!(%failure, "failed commit");
                    self.stats.num_nodes += 1;
                    self.stats.num_failures += 1;
                }
            }
        }
    }
}

impl Iterator for Search {
    type Item = Solution;

    fn next(&mut self) -> Option<Solution> {
        self.next_solution()
    }
}
