use divan::{Bencher, black_box};
use treeedit::{CandidateMap, Enumerator, Refiner, Tree, enumerate, min_cost, parse_tree};

fn main() {
    divan::main();
}

const PAIRS: &[(&str, &str)] = &[
    ("r(x, y)", "r(y, x)"),
    ("a(b(c, d), e(f))", "a(b(d), e(c, f))"),
    ("s(np(d, n), vp(v, np(d, n)))", "s(np(n), vp(v, np(d, adj, n)))"),
];

fn trees(index: usize) -> (Tree, Tree) {
    let (t1, t2) = PAIRS[index];
    (parse_tree(t1).unwrap(), parse_tree(t2).unwrap())
}

/// Full enumeration, collecting every mapping
#[divan::bench(args = [0, 1, 2])]
fn enumerate_pair(bencher: Bencher, index: usize) {
    let (t1, _) = trees(index);
    bencher
        .with_inputs(|| parse_tree(PAIRS[index].1).unwrap())
        .bench_local_values(|mut t2| black_box(enumerate(black_box(&t1), &mut t2)));
}

/// Counting mappings through the visitor, without collecting them
#[divan::bench(args = [0, 1, 2])]
fn count_pair(bencher: Bencher, index: usize) {
    let (t1, mut t2) = trees(index);
    let candidates = CandidateMap::build(&t1, &mut t2);
    bencher.bench_local(|| {
        let enumerator = Enumerator::new(&t1, &t2, candidates.clone());
        let mut count = 0usize;
        enumerator.visit(|_| {
            count += 1;
            std::ops::ControlFlow::Continue(())
        });
        black_box(count);
    });
}

/// Minimum-cost selection over a precomputed solution set
#[divan::bench]
fn min_cost_largest(bencher: Bencher) {
    let (t1, mut t2) = trees(2);
    let result = enumerate(&t1, &mut t2);
    bencher.bench_local(|| black_box(min_cost(&t1, &t2, black_box(&result.solutions))));
}

/// One refinement step at the root
#[divan::bench]
fn refine_root(bencher: Bencher) {
    let (t1, mut t2) = trees(2);
    let candidates = CandidateMap::build(&t1, &mut t2);
    let refiner = Refiner::new(&t1, &t2);
    bencher.bench_local(|| black_box(refiner.refine(black_box(&candidates), 0, 0)));
}
