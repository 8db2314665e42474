//! Initial candidate sets
//!
//! Every source node starts with the sentinel (deletion) followed by all
//! target nodes at the same depth, in target preorder. Depth-mismatched
//! targets can never be part of a structure-preserving mapping, so they are
//! pruned here rather than discovered during the search.

use crate::tree::{NodeId, Tree};

/// Candidate target nodes for each source node, indexed by source `NodeId`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateMap {
    lists: Vec<Vec<NodeId>>,
    sentinel: NodeId,
}

impl CandidateMap {
    /// Build the initial candidate map, adding the sentinel to `t2` if needed
    pub fn build(t1: &Tree, t2: &mut Tree) -> Self {
        let sentinel = t2.ensure_sentinel();
        let t2_order = t2.preorder();

        let lists = t1
            .nodes
            .iter()
            .map(|v| {
                std::iter::once(sentinel)
                    .chain(t2_order.iter().copied().filter(|&w| t2.depth(w) == v.depth))
                    .collect()
            })
            .collect();

        Self { lists, sentinel }
    }

    /// The sentinel id of the target tree these candidates point into
    #[inline]
    pub fn sentinel(&self) -> NodeId {
        self.sentinel
    }

    /// Candidates for source node `v`
    #[inline]
    pub fn get(&self, v: NodeId) -> &[NodeId] {
        &self.lists[v]
    }

    /// Number of source nodes covered
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Keep only the candidates of `v` accepted by `keep`
    pub(crate) fn retain(&mut self, v: NodeId, keep: impl FnMut(&NodeId) -> bool) {
        self.lists[v].retain(keep);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::parse_tree;

    #[test]
    fn test_sentinel_first_then_same_depth() {
        let t1 = parse_tree("a(b, c)").unwrap();
        let mut t2 = parse_tree("x(y(z), w)").unwrap();
        let candidates = CandidateMap::build(&t1, &mut t2);
        let s = t2.sentinel().unwrap();

        assert_eq!(candidates.sentinel(), s);
        assert_eq!(candidates.len(), 3);
        // a is at depth 0: only x
        assert_eq!(candidates.get(0), &[s, 0]);
        // b and c are at depth 1: y then w, in preorder
        assert_eq!(candidates.get(1), &[s, 1, 3]);
        assert_eq!(candidates.get(2), &[s, 1, 3]);
    }

    #[test]
    fn test_no_same_depth_targets() {
        let t1 = parse_tree("a(b(c))").unwrap();
        let mut t2 = parse_tree("a").unwrap();
        let candidates = CandidateMap::build(&t1, &mut t2);
        let s = candidates.sentinel();

        assert_eq!(candidates.get(1), &[s]);
        assert_eq!(candidates.get(2), &[s]);
    }

    #[test]
    fn test_existing_sentinel_is_reused() {
        let t1 = parse_tree("a").unwrap();
        let mut t2 = parse_tree("a").unwrap();
        let s = t2.ensure_sentinel();
        let candidates = CandidateMap::build(&t1, &mut t2);

        assert_eq!(candidates.sentinel(), s);
        assert_eq!(t2.nodes.len(), 2);
    }

    #[test]
    fn test_candidates_follow_preorder_not_creation_order() {
        // Node 1 ("late") is created before node 2 but comes later in preorder
        let mut t2 = Tree::new();
        let r = t2.create_node("r");
        let late = t2.create_node("late");
        let early = t2.create_node("early");
        t2.set_root(r).unwrap();
        t2.add_child(r, early).unwrap();
        t2.add_child(r, late).unwrap();
        t2.assign_preorder_and_depth();

        let t1 = parse_tree("r(x)").unwrap();
        let candidates = CandidateMap::build(&t1, &mut t2);
        let s = candidates.sentinel();
        assert_eq!(candidates.get(1), &[s, early, late]);
    }
}
