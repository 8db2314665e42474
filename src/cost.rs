//! Edit costs of complete mappings
//!
//! A mapping implies one deletion per source node sent to the sentinel, one
//! insertion per target node left without a preimage, and one substitution
//! per real pair whose labels differ. All operations cost 1.

use crate::mapping::{Mapping, SolutionSet};
use crate::tree::{NodeId, SENTINEL_LABEL, Tree};
use rustc_hash::FxHashSet;
use std::fmt;

/// Operation counts implied by a mapping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EditCost {
    pub deletions: usize,
    pub insertions: usize,
    pub substitutions: usize,
}

impl EditCost {
    /// Unit-cost edit distance
    pub fn total(&self) -> usize {
        self.deletions + self.insertions + self.substitutions
    }
}

impl fmt::Display for EditCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (deletions: {}, insertions: {}, substitutions: {})",
            self.total(),
            self.deletions,
            self.insertions,
            self.substitutions
        )
    }
}

/// Score a complete mapping of `t1` onto `t2`
pub fn edit_cost(t1: &Tree, t2: &Tree, mapping: &Mapping) -> EditCost {
    let mut cost = EditCost::default();
    let mut images = FxHashSet::default();

    for (v, w) in mapping.iter() {
        if t2.is_sentinel(w) {
            cost.deletions += 1;
            continue;
        }
        images.insert(w);
        if t1.label(v) != t2.label(w) {
            cost.substitutions += 1;
        }
    }

    cost.insertions = t2
        .preorder()
        .into_iter()
        .filter(|w| !images.contains(w))
        .count();
    cost
}

/// Index and cost of the cheapest solution
///
/// Ties go to the solution found first. Returns `None` for an empty set.
pub fn min_cost(t1: &Tree, t2: &Tree, solutions: &SolutionSet) -> Option<(usize, EditCost)> {
    let mut best: Option<(usize, EditCost)> = None;
    for (index, mapping) in solutions.iter().enumerate() {
        let cost = edit_cost(t1, t2, mapping);
        match best {
            Some((_, current)) if current.total() <= cost.total() => {}
            _ => best = Some((index, cost)),
        }
    }
    best
}

/// One step of an edit script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    /// Source node kept with the same label
    Keep { from: NodeId, to: NodeId },
    /// Source node kept under a different label
    Substitute { from: NodeId, to: NodeId },
    /// Source node removed
    Delete(NodeId),
    /// Target node added
    Insert(NodeId),
}

impl EditOp {
    pub fn is_keep(&self) -> bool {
        matches!(self, EditOp::Keep { .. })
    }

    /// Render with labels resolved against the two trees
    pub fn describe(&self, t1: &Tree, t2: &Tree) -> String {
        match *self {
            EditOp::Keep { from, to } => {
                format!("keep({}, {})", t1.display_label(from), t2.display_label(to))
            }
            EditOp::Substitute { from, to } => {
                format!("subst({}, {})", t1.display_label(from), t2.display_label(to))
            }
            EditOp::Delete(from) => format!("del({}, {})", t1.display_label(from), SENTINEL_LABEL),
            EditOp::Insert(to) => format!("insert({}, {})", SENTINEL_LABEL, t2.display_label(to)),
        }
    }
}

/// Spell out the operations a complete mapping implies
///
/// Source nodes come first in mapping order, then insertions in target
/// preorder. The number of non-`Keep` operations equals the mapping's total
/// edit cost.
pub fn edit_script(t1: &Tree, t2: &Tree, mapping: &Mapping) -> Vec<EditOp> {
    let mut ops = Vec::with_capacity(mapping.len());
    let mut images = FxHashSet::default();

    for (v, w) in mapping.iter() {
        let op = if t2.is_sentinel(w) {
            EditOp::Delete(v)
        } else {
            images.insert(w);
            if t1.label(v) == t2.label(w) {
                EditOp::Keep { from: v, to: w }
            } else {
                EditOp::Substitute { from: v, to: w }
            }
        };
        ops.push(op);
    }

    ops.extend(
        t2.preorder()
            .into_iter()
            .filter(|w| !images.contains(w))
            .map(EditOp::Insert),
    );
    ops
}
