//! Treeedit: exhaustive enumeration of ordered tree mappings
//!
//! Enumerates every depth-preserving, order-preserving, injective mapping of
//! a source tree onto a target tree (with deletions) by backtracking search,
//! and scores each mapping by its unit-cost edit distance.
//! Core implementation in Rust with Python bindings.

// Core modules
pub mod candidates; // Initial same-depth candidate lists
pub mod cost; // Edit costs and edit scripts
pub mod input; // Parent-record and edge-list readers
pub mod mapping; // Assignments and solution sets
pub mod notation; // Bracket notation parser
pub mod refine; // Candidate refinement after fixing one pair
pub mod report; // Plain-text report
pub mod search; // Backtracking enumerator
pub mod tree; // Arena tree with interned labels and sentinel

// Python bindings
#[cfg(feature = "pyo3")]
pub mod python;

// Re-exports for convenience
pub use candidates::CandidateMap;
pub use cost::{EditCost, EditOp, edit_cost, edit_script, min_cost};
pub use input::{InputError, InputFormat, parse_tree_pair, read_tree_pair};
pub use mapping::{Mapping, SolutionSet};
pub use notation::{NotationError, parse_tree};
pub use refine::Refiner;
pub use report::{ReportOptions, write_report};
pub use search::{
    Enumeration, Enumerator, SearchOptions, SearchStats, SearchStatus, enumerate, enumerate_with,
};
pub use tree::{Node, NodeId, SENTINEL_LABEL, Tree, TreeError};
