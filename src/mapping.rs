//! Assignments and solution sets

use crate::tree::NodeId;

/// A (partial) mapping from source nodes to target nodes
///
/// Pairs are kept in the order they were fixed, which during a search is
/// source preorder. The search pushes one pair per level and pops it on
/// backtrack.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Mapping {
    pairs: Vec<(NodeId, NodeId)>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pairs: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn push(&mut self, v: NodeId, w: NodeId) {
        self.pairs.push((v, w));
    }

    #[inline]
    pub fn pop(&mut self) -> Option<(NodeId, NodeId)> {
        self.pairs.pop()
    }

    /// Image of source node `v`, if assigned
    pub fn get(&self, v: NodeId) -> Option<NodeId> {
        self.pairs
            .iter()
            .find(|&&(source, _)| source == v)
            .map(|&(_, target)| target)
    }

    /// Iterate over `(source, target)` pairs in assignment order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.pairs.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl FromIterator<(NodeId, NodeId)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (NodeId, NodeId)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

/// Complete mappings in the order the search found them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolutionSet {
    mappings: Vec<Mapping>,
}

impl SolutionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, mapping: Mapping) {
        self.mappings.push(mapping);
    }

    pub fn get(&self, index: usize) -> Option<&Mapping> {
        self.mappings.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Mapping> {
        self.mappings.iter()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

impl IntoIterator for SolutionSet {
    type Item = Mapping;
    type IntoIter = std::vec::IntoIter<Mapping>;

    fn into_iter(self) -> Self::IntoIter {
        self.mappings.into_iter()
    }
}

impl<'a> IntoIterator for &'a SolutionSet {
    type Item = &'a Mapping;
    type IntoIter = std::slice::Iter<'a, Mapping>;

    fn into_iter(self) -> Self::IntoIter {
        self.mappings.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_behaves_like_stack() {
        let mut mapping = Mapping::new();
        mapping.push(0, 3);
        mapping.push(1, 4);
        assert_eq!(mapping.get(1), Some(4));

        assert_eq!(mapping.pop(), Some((1, 4)));
        assert_eq!(mapping.get(1), None);
        assert_eq!(mapping.get(0), Some(3));
        assert_eq!(mapping.len(), 1);
    }

    #[test]
    fn test_collect_and_iterate() {
        let mapping: Mapping = vec![(0, 1), (2, 5)].into_iter().collect();
        let pairs: Vec<_> = mapping.iter().collect();
        assert_eq!(pairs, vec![(0, 1), (2, 5)]);
    }

    #[test]
    fn test_solution_set_keeps_order() {
        let mut solutions = SolutionSet::new();
        solutions.push([(0, 9)].into_iter().collect());
        solutions.push([(0, 0)].into_iter().collect());

        assert_eq!(solutions.len(), 2);
        assert_eq!(solutions.get(0).unwrap().get(0), Some(9));
        assert_eq!(solutions.get(1).unwrap().get(0), Some(0));
    }
}
