use itertools::Itertools;
use tessera::prelude::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Model {
    Global,
    Pairwise,
}

struct Packing {
    space: Space,
    sizes: Vec<IntCst>,
    side: VarRef,
    xs: Vec<VarRef>,
    ys: Vec<VarRef>,
}

impl Packing {
    /// Squares of sizes `n, n-1, .., 2` in an enclosing square whose side lies in `[min_side, max_side]`.
    fn new(n: IntCst, min_side: IntCst, max_side: IntCst, model: Model) -> Packing {
        let sizes = (2..=n).rev().collect_vec();
        let mut space = Space::new();
        let side = space.new_var(min_side, max_side);
        let xs = space.new_vars(sizes.len(), 0, max_side);
        let ys = space.new_vars(sizes.len(), 0, max_side);
        for i in 0..sizes.len() {
            space.post_leq(xs[i], sizes[i], side);
            space.post_leq(ys[i], sizes[i], side);
        }
        match model {
            Model::Global => space.post_no_overlap(&xs, &sizes, &ys, &sizes).unwrap(),
            Model::Pairwise => {
                for (i, j) in (0..sizes.len()).tuple_combinations() {
                    let pair = [sizes[i], sizes[j]];
                    space.post_no_overlap(&[xs[i], xs[j]], &pair, &[ys[i], ys[j]], &pair).unwrap();
                }
            }
        }
        space.branch(Lexical::with_min(vec![side]));
        Packing {
            space,
            sizes,
            side,
            xs,
            ys,
        }
    }

    fn positions(&self) -> Vec<VarRef> {
        self.xs.iter().chain(self.ys.iter()).copied().collect()
    }

    fn assert_valid(&self, solution: &Solution) {
        let side = solution.value(self.side).unwrap();
        let xs = solution.values(&self.xs).unwrap();
        let ys = solution.values(&self.ys).unwrap();
        for (i, size) in self.sizes.iter().enumerate() {
            assert!(xs[i] + size <= side && ys[i] + size <= side);
        }
        for (i, j) in (0..self.sizes.len()).tuple_combinations() {
            let separated = xs[i] + self.sizes[i] <= xs[j]
                || xs[j] + self.sizes[j] <= xs[i]
                || ys[i] + self.sizes[i] <= ys[j]
                || ys[j] + self.sizes[j] <= ys[i];
            assert!(separated, "squares {i} and {j} overlap");
        }
    }

    fn optimum(&self) -> IntCst {
        let mut search = Search::bab(self.space.clone(), Objective::Minimize(self.side));
        let best = search.last_solution().unwrap();
        assert_eq!(search.status(), SearchStatus::Exhausted);
        self.assert_valid(&best);
        best.value(self.side).unwrap()
    }
}

fn assigned(n: IntCst, min_side: IntCst, max_side: IntCst, model: Model) -> Packing {
    let mut p = Packing::new(n, min_side, max_side, model);
    p.space.branch(Lexical::with_min(p.positions()));
    p
}

#[test]
fn smallest_enclosing_squares() {
    assert_eq!(assigned(3, 4, 9, Model::Global).optimum(), 5);
    assert_eq!(assigned(4, 6, 12, Model::Global).optimum(), 7);
    assert_eq!(assigned(5, 8, 15, Model::Global).optimum(), 9);
}

#[test]
fn pairwise_decomposition_agrees() {
    for n in 3..=5 {
        let global = assigned(n, 1, 3 * n, Model::Global).optimum();
        let pairwise = assigned(n, 1, 3 * n, Model::Pairwise).optimum();
        assert_eq!(global, pairwise);
    }
}

#[test]
fn same_placements_in_both_models() {
    let placements = |model| {
        let p = assigned(3, 5, 5, model);
        let mut search = Search::dfs(p.space.clone());
        let all = search
            .by_ref()
            .map(|s| {
                p.assert_valid(&s);
                (s.values(&p.xs).unwrap(), s.values(&p.ys).unwrap())
            })
            .collect_vec();
        assert_eq!(search.status(), SearchStatus::Exhausted);
        all
    };
    let global = placements(Model::Global);
    assert!(!global.is_empty());
    assert_eq!(global, placements(Model::Pairwise));
}

#[test]
fn interval_splitting_then_assignment() {
    let mut p = Packing::new(5, 8, 15, Model::Global);
    p.space.post_interval_brancher(&p.xs, &p.sizes, 0.5).unwrap();
    p.space.post_interval_brancher(&p.ys, &p.sizes, 0.5).unwrap();
    p.space.branch(Lexical::with_min(p.positions()));
    assert_eq!(p.optimum(), 9);
}

#[test]
fn budget_is_reported() {
    let p = assigned(6, 1, 30, Model::Global);
    let limits = SearchLimits {
        max_nodes: Some(10),
        deadline: None,
    };
    let mut search = Search::bab(p.space, Objective::Minimize(p.side)).with_limits(limits);
    while search.next().is_some() {}
    assert_eq!(search.status(), SearchStatus::Interrupted);
    assert_eq!(search.stats().num_nodes, 10);
}
