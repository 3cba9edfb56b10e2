use std::fmt::{Display, Error, Formatter};
use std::time::Duration;

/// Statistics of a search.
#[derive(Clone, Default, Debug)]
pub struct Stats {
    /// Nodes whose propagation was attempted.
    pub num_nodes: u64,
    /// Nodes that failed, either when committing a decision or during propagation.
    pub num_failures: u64,
    pub num_solutions: u64,
    /// Number of choices made.
    pub num_decisions: u64,
    /// Number of propagator invocations.
    pub num_propagations: u64,
    /// Propagators retired because they were subsumed.
    pub num_retired: u64,
    /// Deepest level of the search tree reached.
    pub max_depth: usize,
    pub solve_time: Duration,
}

impl Display for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        writeln!(f, "nodes:        {:>12}", self.num_nodes)?;
        writeln!(f, "failures:     {:>12}", self.num_failures)?;
        writeln!(f, "solutions:    {:>12}", self.num_solutions)?;
        writeln!(f, "decisions:    {:>12}", self.num_decisions)?;
        writeln!(f, "propagations: {:>12}", self.num_propagations)?;
        writeln!(f, "retired:      {:>12}", self.num_retired)?;
        writeln!(f, "max depth:    {:>12}", self.max_depth)?;
        write!(f, "solve time:   {:>11.3}s", self.solve_time.as_secs_f64())
    }
}
