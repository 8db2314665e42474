//! Exhaustive backtracking enumeration of tree mappings
//!
//! The search walks the source tree in preorder, one recursion level per
//! node. At each level every surviving candidate is tried in list order
//! (sentinel first, then target preorder), the candidate map is refined for
//! the remaining nodes and the search recurses. Reaching the last node yields
//! one complete mapping. Every candidate is visited: the result is the full
//! solution set, not just the first or cheapest mapping.
//!
//! Recursion depth equals the source tree size and each level owns a full
//! candidate snapshot, so one search path holds O(n²) candidate entries.
//! Source trees beyond a few thousand nodes need a larger thread stack.

use crate::candidates::CandidateMap;
use crate::mapping::{Mapping, SolutionSet};
use crate::refine::Refiner;
use crate::tree::{NodeId, Tree};
use std::ops::ControlFlow;

/// Optional limits on a search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Maximum number of candidates tried
    pub max_steps: Option<u64>,
    /// Stop after this many complete mappings
    pub max_solutions: Option<usize>,
}

/// How a search ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// Every branch was explored
    Complete,
    /// `max_steps` ran out
    StepLimitReached,
    /// `max_solutions` mappings were found
    SolutionLimitReached,
    /// The visitor asked to stop
    Stopped,
}

/// Summary of a visiting search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    pub status: SearchStatus,
    /// Candidates tried
    pub steps: u64,
    /// Complete mappings handed to the visitor
    pub solutions: usize,
}

/// Result of a collecting search
#[derive(Debug, Clone)]
pub struct Enumeration {
    pub solutions: SolutionSet,
    pub status: SearchStatus,
    pub steps: u64,
}

impl Enumeration {
    /// True if the solution set is exhaustive
    pub fn is_complete(&self) -> bool {
        self.status == SearchStatus::Complete
    }
}

/// Backtracking enumerator over one source/target pair
pub struct Enumerator<'a> {
    t1: &'a Tree,
    t2: &'a Tree,
    order: Vec<NodeId>,
    initial: CandidateMap,
    options: SearchOptions,
}

impl<'a> Enumerator<'a> {
    /// Create an enumerator from the initial candidates built for `t1`/`t2`
    pub fn new(t1: &'a Tree, t2: &'a Tree, initial: CandidateMap) -> Self {
        Self {
            t1,
            t2,
            order: t1.preorder(),
            initial,
            options: SearchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    /// Run the search and collect every complete mapping
    pub fn run(&self) -> Enumeration {
        let mut solutions = SolutionSet::new();
        let stats = self.visit(|mapping| {
            solutions.push(mapping.clone());
            ControlFlow::Continue(())
        });

        log::debug!(
            "enumerated {} mappings of {} source nodes in {} steps",
            stats.solutions,
            self.order.len(),
            stats.steps
        );

        Enumeration {
            solutions,
            status: stats.status,
            steps: stats.steps,
        }
    }

    /// Run the search, handing each complete mapping to `visitor`
    ///
    /// Returning `ControlFlow::Break` from the visitor ends the search with
    /// [`SearchStatus::Stopped`].
    pub fn visit<F>(&self, visitor: F) -> SearchStats
    where
        F: FnMut(&Mapping) -> ControlFlow<()>,
    {
        let mut search = Search {
            refiner: Refiner::new(self.t1, self.t2),
            order: &self.order,
            options: self.options,
            mapping: Mapping::with_capacity(self.order.len()),
            steps: 0,
            solutions: 0,
            visitor,
        };

        let flow = if self.order.is_empty() {
            // An empty source tree has exactly one (empty) mapping
            search.emit()
        } else {
            search.extend(0, &self.initial)
        };

        let status = match flow {
            ControlFlow::Continue(()) => SearchStatus::Complete,
            ControlFlow::Break(status) => status,
        };
        if matches!(
            status,
            SearchStatus::StepLimitReached | SearchStatus::SolutionLimitReached
        ) {
            log::warn!(
                "search truncated ({:?}) after {} steps and {} mappings",
                status,
                search.steps,
                search.solutions
            );
        }

        SearchStats {
            status,
            steps: search.steps,
            solutions: search.solutions,
        }
    }
}

/// Mutable state of one running search
struct Search<'e, F> {
    refiner: Refiner<'e>,
    order: &'e [NodeId],
    options: SearchOptions,
    mapping: Mapping,
    steps: u64,
    solutions: usize,
    visitor: F,
}

impl<F> Search<'_, F>
where
    F: FnMut(&Mapping) -> ControlFlow<()>,
{
    fn extend(&mut self, i: usize, candidates: &CandidateMap) -> ControlFlow<SearchStatus> {
        let v = self.order[i];
        let last = i + 1 == self.order.len();
        log::trace!(
            "level {}: node {} has {} candidates",
            i,
            v,
            candidates.get(v).len()
        );

        for &w in candidates.get(v) {
            if self.options.max_steps.is_some_and(|max| self.steps >= max) {
                return ControlFlow::Break(SearchStatus::StepLimitReached);
            }
            self.steps += 1;

            self.mapping.push(v, w);
            let flow = if last {
                self.emit()
            } else {
                let refined = self.refiner.refine(candidates, v, w);
                self.extend(i + 1, &refined)
            };
            self.mapping.pop();

            if let ControlFlow::Break(status) = flow {
                return ControlFlow::Break(status);
            }
        }

        ControlFlow::Continue(())
    }

    fn emit(&mut self) -> ControlFlow<SearchStatus> {
        if self.solution_limit_reached() {
            return ControlFlow::Break(SearchStatus::SolutionLimitReached);
        }
        self.solutions += 1;
        if (self.visitor)(&self.mapping).is_break() {
            return ControlFlow::Break(SearchStatus::Stopped);
        }
        if self.solution_limit_reached() {
            return ControlFlow::Break(SearchStatus::SolutionLimitReached);
        }
        ControlFlow::Continue(())
    }

    fn solution_limit_reached(&self) -> bool {
        self.options
            .max_solutions
            .is_some_and(|max| self.solutions >= max)
    }
}

/// Enumerate every mapping of `t1` onto `t2`, adding the sentinel to `t2`
pub fn enumerate(t1: &Tree, t2: &mut Tree) -> Enumeration {
    enumerate_with(t1, t2, SearchOptions::default())
}

/// Enumerate with search limits
pub fn enumerate_with(t1: &Tree, t2: &mut Tree, options: SearchOptions) -> Enumeration {
    let candidates = CandidateMap::build(t1, t2);
    Enumerator::new(t1, t2, candidates)
        .with_options(options)
        .run()
}
