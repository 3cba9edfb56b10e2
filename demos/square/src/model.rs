use itertools::Itertools;
use tessera::prelude::*;

/// Minimal domain size, relative to the size of a square, under which its position is no longer bisected.
const BISECT_RATIO: f64 = 0.3;

#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Propagation {
    /// A single global no-overlap propagator
    Prop,
    /// One no-overlap propagator per pair of squares
    Decomposed,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Branching {
    /// Assign x coordinates then y coordinates, smallest domain first
    X,
    /// Place squares one by one, biggest first
    Big,
    /// Assign the leftmost x coordinate first, then y coordinates
    Left,
    /// Assign y coordinates first, largest upper bound first and to their largest value, then x coordinates
    /// from their largest value
    Top,
    /// Split x, assign x, split y, then assign y
    Interval,
    /// Split x, split y, assign x, then assign y
    Split,
    /// Bisect x, assign x, bisect y, then assign y
    Bisect,
}

/// The square packing model: the side of the enclosing square and the bottom-left corner of each square.
pub struct Packing {
    space: Space,
    sizes: Vec<IntCst>,
    side: VarRef,
    xs: Vec<VarRef>,
    ys: Vec<VarRef>,
}

impl Packing {
    pub fn new(n: IntCst, propagation: Propagation, branching: Branching, p: f64) -> Result<Packing, ArgumentError> {
        let sizes = (2..=n).rev().collect_vec();
        let area: IntCst = sizes.iter().map(|s| s * s).sum();
        let ceil_sqrt = f64::from(n).sqrt().ceil() as IntCst;
        let min_side = (f64::from(area).sqrt().ceil() as IntCst).max(n);
        let max_side = n * ceil_sqrt;

        let mut space = Space::new();
        let side = space.new_var(min_side, max_side);
        let xs = space.new_vars(sizes.len(), 0, max_side - 1);
        let ys = space.new_vars(sizes.len(), 0, max_side - 1);
        for i in 0..sizes.len() {
            space.post_leq(xs[i], sizes[i], side);
            space.post_leq(ys[i], sizes[i], side);
        }
        // symmetry breaking: the biggest square lies below the diagonal
        space.post_leq(ys[0], 0, xs[0]);

        match propagation {
            Propagation::Prop => space.post_no_overlap(&xs, &sizes, &ys, &sizes)?,
            Propagation::Decomposed => {
                for (i, j) in (0..sizes.len()).tuple_combinations() {
                    let pair = [sizes[i], sizes[j]];
                    space.post_no_overlap(&[xs[i], xs[j]], &pair, &[ys[i], ys[j]], &pair)?;
                }
            }
        }

        space.branch(Lexical::with_min(vec![side]));
        let assign = |vars: &[VarRef]| Lexical::new(vars.to_vec(), VarSelect::First, PreferredValue::Min);
        match branching {
            Branching::X => {
                space.branch(Lexical::new(xs.clone(), VarSelect::SmallestDomain, PreferredValue::Min));
                space.branch(Lexical::new(ys.clone(), VarSelect::SmallestDomain, PreferredValue::Min));
            }
            Branching::Big => {
                for i in 0..sizes.len() {
                    space.branch(assign(&[xs[i]]));
                    space.branch(assign(&[ys[i]]));
                }
            }
            Branching::Left => {
                space.branch(Lexical::new(xs.clone(), VarSelect::SmallestMin, PreferredValue::Min));
                space.branch(Lexical::new(ys.clone(), VarSelect::SmallestDomain, PreferredValue::Min));
            }
            Branching::Top => {
                space.branch(Lexical::new(ys.clone(), VarSelect::LargestMax, PreferredValue::Max));
                space.branch(Lexical::new(xs.clone(), VarSelect::SmallestDomain, PreferredValue::Max));
            }
            Branching::Interval => {
                space.post_interval_brancher(&xs, &sizes, p)?;
                space.branch(assign(&xs));
                space.post_interval_brancher(&ys, &sizes, p)?;
                space.branch(assign(&ys));
            }
            Branching::Split => {
                space.post_interval_brancher(&xs, &sizes, p)?;
                space.post_interval_brancher(&ys, &sizes, p)?;
                space.branch(assign(&xs));
                space.branch(assign(&ys));
            }
            Branching::Bisect => {
                space.branch(Bisect::with_filter(xs.clone(), sizes.clone(), BISECT_RATIO)?);
                space.branch(assign(&xs));
                space.branch(Bisect::with_filter(ys.clone(), sizes.clone(), BISECT_RATIO)?);
                space.branch(assign(&ys));
            }
        }

        Ok(Packing {
            space,
            sizes,
            side,
            xs,
            ys,
        })
    }

    pub fn space(&self) -> &Space {
        &self.space
    }

    pub fn sizes(&self) -> &[IntCst] {
        &self.sizes
    }

    pub fn side(&self) -> VarRef {
        self.side
    }

    pub fn side_of(&self, solution: &Solution) -> IntCst {
        solution.lb(self.side)
    }

    pub fn format(&self, solution: &Solution) -> String {
        let squares = self.sizes.iter().enumerate().map(|(i, size)| {
            format!(
                "{size}, x={}, y={}",
                solution.domain(self.xs[i]),
                solution.domain(self.ys[i])
            )
        });
        std::iter::once(format!("s = {}", solution.domain(self.side)))
            .chain(squares)
            .join("\n")
    }
}
