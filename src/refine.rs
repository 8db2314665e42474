//! Constraint propagation after fixing one pair
//!
//! Fixing `v -> w` narrows the candidates of every source node still to be
//! assigned (those after `v` in preorder):
//!
//! 1. Injectivity: a real target `w` is removed from every other list. The
//!    sentinel may be shared by any number of source nodes.
//! 2. Ancestor consistency: children of `v` may only map to children of `w`
//!    (or the sentinel). When `w` is the sentinel they are forced onto it.
//! 3. Sibling order: later siblings of `v` lose every real target that comes
//!    before `w` in target preorder. The sentinel takes no part in ordering.
//!
//! Rule 3 only looks forward: later siblings are constrained relative to the
//! one just fixed, never the other way around.

use crate::candidates::CandidateMap;
use crate::tree::{NodeId, Tree};

/// Derives refined candidate snapshots for a pair of trees
#[derive(Debug, Clone, Copy)]
pub struct Refiner<'a> {
    t1: &'a Tree,
    t2: &'a Tree,
}

impl<'a> Refiner<'a> {
    pub fn new(t1: &'a Tree, t2: &'a Tree) -> Self {
        Self { t1, t2 }
    }

    /// Return a new snapshot consistent with the fixed pair `v -> w`.
    ///
    /// `candidates` is left untouched, so sibling branches of the search each
    /// refine from the same parent snapshot.
    pub fn refine(&self, candidates: &CandidateMap, v: NodeId, w: NodeId) -> CandidateMap {
        let mut refined = candidates.clone();
        let sentinel = candidates.sentinel();
        let v_order = self.t1.preorder_index(v);

        if w != sentinel {
            for u in self.t1.nodes.iter().filter(|u| u.preorder > v_order) {
                refined.retain(u.id, |&x| x != w);
            }
        }

        for &c in self.t1.children(v) {
            if w == sentinel {
                refined.retain(c, |&x| x == sentinel);
            } else {
                refined.retain(c, |&x| x == sentinel || self.t2.parent(x) == Some(w));
            }
        }

        if w != sentinel
            && let Some(parent) = self.t1.parent(v)
        {
            let w_order = self.t2.preorder_index(w);
            for &s in self.t1.children(parent) {
                if self.t1.preorder_index(s) > v_order {
                    refined.retain(s, |&x| x == sentinel || self.t2.preorder_index(x) >= w_order);
                }
            }
        }

        refined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::parse_tree;

    fn setup(t1: &str, t2: &str) -> (Tree, Tree, CandidateMap) {
        let t1 = parse_tree(t1).unwrap();
        let mut t2 = parse_tree(t2).unwrap();
        let candidates = CandidateMap::build(&t1, &mut t2);
        (t1, t2, candidates)
    }

    #[test]
    fn test_injectivity_removes_real_target() {
        // a(b, c) onto r(p, q): fixing b -> p removes p from c
        let (t1, t2, base) = setup("a(b, c)", "r(p, q)");
        let s = base.sentinel();
        let refiner = Refiner::new(&t1, &t2);

        let after_root = refiner.refine(&base, 0, 0);
        let refined = refiner.refine(&after_root, 1, 1);
        assert_eq!(refined.get(2), &[s, 2]);
    }

    #[test]
    fn test_sentinel_is_shared() {
        let (t1, t2, base) = setup("a(b, c)", "r(p, q)");
        let s = base.sentinel();
        let refiner = Refiner::new(&t1, &t2);

        let after_root = refiner.refine(&base, 0, 0);
        let refined = refiner.refine(&after_root, 1, s);
        assert_eq!(refined.get(2), &[s, 1, 2]);
    }

    #[test]
    fn test_deleted_parent_forces_deleted_children() {
        let (t1, t2, base) = setup("a(b, c)", "r(p, q)");
        let s = base.sentinel();
        let refined = Refiner::new(&t1, &t2).refine(&base, 0, s);

        assert_eq!(refined.get(1), &[s]);
        assert_eq!(refined.get(2), &[s]);
    }

    #[test]
    fn test_children_follow_parent_image() {
        // a(b(c)) onto r(x(y), z(w)): fixing the root then b -> z leaves
        // c only w
        let (t1, t2, base) = setup("a(b(c))", "r(x(y), z(w))");
        let s = base.sentinel();
        let refiner = Refiner::new(&t1, &t2);

        let after_root = refiner.refine(&base, 0, 0);
        assert_eq!(after_root.get(1), &[s, 1, 3]);

        let after_b = refiner.refine(&after_root, 1, 3);
        assert_eq!(after_b.get(2), &[s, 4]);
    }

    #[test]
    fn test_later_siblings_keep_order() {
        // a(b, c) onto r(p, q): fixing b -> q leaves c only the sentinel
        let (t1, t2, base) = setup("a(b, c)", "r(p, q)");
        let s = base.sentinel();
        let refiner = Refiner::new(&t1, &t2);

        let after_root = refiner.refine(&base, 0, 0);
        let refined = refiner.refine(&after_root, 1, 2);
        assert_eq!(refined.get(2), &[s]);
    }

    #[test]
    fn test_sibling_rule_only_looks_forward() {
        // Fixing the later sibling c -> p does not touch the earlier b
        let (t1, t2, base) = setup("a(b, c)", "r(p, q)");
        let refiner = Refiner::new(&t1, &t2);

        let after_root = refiner.refine(&base, 0, 0);
        let refined = refiner.refine(&after_root, 2, 1);
        // b comes first in preorder, so its list is not revisited
        assert_eq!(refined.get(1), after_root.get(1));
    }

    #[test]
    fn test_refine_leaves_input_untouched() {
        let (t1, t2, base) = setup("a(b, c)", "r(p, q)");
        let snapshot = base.clone();
        let refiner = Refiner::new(&t1, &t2);

        let first = refiner.refine(&base, 0, 0);
        let deleted = refiner.refine(&base, 0, base.sentinel());
        assert_eq!(base, snapshot);

        // Refining in the opposite order gives the same snapshots
        let deleted_again = refiner.refine(&base, 0, base.sentinel());
        let first_again = refiner.refine(&base, 0, 0);
        assert_eq!(first, first_again);
        assert_eq!(deleted, deleted_again);
        assert_ne!(first, deleted);
    }
}
