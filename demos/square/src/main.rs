mod model;

use crate::model::{Branching, Packing, Propagation};
use anyhow::Result;
use clap::Parser;
use env_param::EnvParam;
use std::time::{Duration, Instant};
use tessera::prelude::*;

static PRINT_STATS: EnvParam<bool> = EnvParam::new("TESSERA_PRINT_STATS", "false");

/// Packs the squares of sizes n, n-1, .., 2 in the smallest enclosing square.
#[derive(Debug, Parser)]
#[command(name = "tessera-square")]
struct Opt {
    /// Size of the biggest square
    #[arg(default_value = "5")]
    n: IntCst,
    /// How non-overlapping is enforced
    #[arg(long, value_enum, default_value = "prop")]
    model: Propagation,
    /// Order in which the positions of the squares are decided
    #[arg(long, value_enum, default_value = "x")]
    strategy: Branching,
    /// Mandatory fraction of the interval splitting strategies, in (0, 1)
    #[arg(long, default_value = "0.5")]
    p: f64,
    /// Interrupt the search after this many nodes
    #[arg(long)]
    max_nodes: Option<u64>,
    /// Maximum runtime, in seconds
    #[arg(long, short)]
    timeout: Option<u64>,
    /// Logging level to use: one of "error", "warn", "info", "debug", "trace"
    #[arg(long, default_value = "info")]
    log_level: tracing::Level,
}

fn main() -> Result<()> {
    let opt = Opt::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_timer(tracing_subscriber::fmt::time::Uptime::from(Instant::now()))
        .with_max_level(opt.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    anyhow::ensure!(opt.n >= 2, "size must be greater than 1, got {}", opt.n);
    let packing = Packing::new(opt.n, opt.model, opt.strategy, opt.p)?;
    tracing::info!(
        squares = packing.sizes().len(),
        min_side = packing.space().lb(packing.side()),
        max_side = packing.space().ub(packing.side()),
        "model built"
    );

    let limits = SearchLimits {
        max_nodes: opt.max_nodes,
        deadline: opt.timeout.map(|secs| Instant::now() + Duration::from_secs(secs)),
    };
    let mut search = Search::bab(packing.space().clone(), Objective::Minimize(packing.side())).with_limits(limits);

    let mut best = None;
    while let Some(solution) = search.next() {
        println!("{}", packing.format(&solution));
        best = Some(solution);
    }

    match (search.status(), &best) {
        (SearchStatus::Exhausted, Some(sol)) => println!("OPTIMAL: s = {}", packing.side_of(sol)),
        (SearchStatus::Exhausted, None) => println!("NO SOLUTION"),
        (_, Some(sol)) => println!("INTERRUPTED (best s = {})", packing.side_of(sol)),
        (_, None) => println!("INTERRUPTED (no solution found)"),
    }
    if PRINT_STATS.get() {
        println!("{}", search.stats());
    }
    Ok(())
}
