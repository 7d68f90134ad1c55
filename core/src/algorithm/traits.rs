//! Algorithm descriptor and dispatch types
//!
//! This module establishes the selection interface for instrumented
//! algorithms: immutable metadata plus the pure `generate`/`execute`
//! function pair. Descriptors carry no state of their own, so no descriptor
//! can observe or mutate another, and repeated selection of the same
//! descriptor is trivially idempotent.
//!
//! # Determinism
//! `generate` is the only consumer of randomness and receives its PRNG
//! explicitly; `execute` is a pure function of the generated input, so
//! re-running it on the same input reproduces an identical trace.

use std::fmt;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::algorithm::dp::DpInput;
use crate::algorithm::graph::GraphInput;
use crate::algorithm::sorting::SortingInput;
use crate::algorithm::string_matching::TextInput;
use crate::algorithm::tree::TreeInput;
use crate::step::{Highlights, Trace, TraceBuilder};

/// Algorithm family grouping, used for registry filtering and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmCategory {
    Sorting,
    Graph,
    StringMatching,
    Tree,
    DynamicProgramming,
}

impl AlgorithmCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sorting => "Sorting",
            Self::Graph => "Graph",
            Self::StringMatching => "String Matching",
            Self::Tree => "Tree",
            Self::DynamicProgramming => "Dynamic Programming",
        }
    }
}

impl fmt::Display for AlgorithmCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Freshly generated input instance for one algorithm family.
///
/// Every variant owns its data outright; handing the same input to
/// `execute` twice yields byte-identical traces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum AlgorithmInput {
    Sorting(SortingInput),
    Graph(GraphInput),
    Text(TextInput),
    Tree(TreeInput),
    Dp(DpInput),
}

impl AlgorithmInput {
    /// Snapshot of the untouched input, used for banner and terminal steps.
    pub fn initial_snapshot(&self) -> crate::step::StepData {
        match self {
            Self::Sorting(input) => input.snapshot(),
            Self::Graph(input) => input.snapshot(),
            Self::Text(input) => input.snapshot(),
            Self::Tree(input) => input.snapshot(),
            Self::Dp(input) => input.snapshot(),
        }
    }
}

/// Constructs a fresh random input instance from the supplied PRNG.
pub type GenerateFn = fn(&mut StdRng) -> AlgorithmInput;

/// Pure trace generator: input instance to ordered step sequence.
pub type ExecuteFn = fn(&AlgorithmInput) -> Trace;

/// Metadata and function pair identifying one selectable algorithm.
///
/// All fields are `'static`: descriptors are compile-time constants
/// registered in [`crate::registry`].
#[derive(Debug, Clone, Copy)]
pub struct AlgorithmDescriptor {
    /// Stable identifier used for registry lookup and selection.
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub time_complexity: &'static str,
    pub space_complexity: &'static str,
    pub category: AlgorithmCategory,
    pub generate: GenerateFn,
    pub execute: ExecuteFn,
}

impl AlgorithmDescriptor {
    /// Generates a fresh input instance for this algorithm.
    pub fn new_input(&self, rng: &mut StdRng) -> AlgorithmInput {
        (self.generate)(rng)
    }

    /// Runs the instrumented algorithm over `input`, producing the full
    /// step trace synchronously. Never panics; a foreign input family
    /// degrades to a single-step terminal trace.
    pub fn run(&self, input: &AlgorithmInput) -> Trace {
        (self.execute)(input)
    }
}

impl PartialEq for AlgorithmDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// Terminal single-step trace for an input from the wrong family.
///
/// `execute` never panics; an impossible pairing (which `generate` cannot
/// produce) still yields a valid trace whose message states the outcome.
pub(crate) fn unsupported_input(name: &'static str, input: &AlgorithmInput) -> Trace {
    let mut trace = TraceBuilder::new();
    trace.push(
        input.initial_snapshot(),
        format!("{name} cannot run on this input family"),
        Highlights::new(),
    );
    trace.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::sorting;

    #[test]
    fn category_labels() {
        assert_eq!(AlgorithmCategory::StringMatching.label(), "String Matching");
        assert_eq!(
            AlgorithmCategory::DynamicProgramming.to_string(),
            "Dynamic Programming"
        );
    }

    #[test]
    fn descriptor_equality_is_by_id() {
        assert_eq!(sorting::BUBBLE_SORT, sorting::BUBBLE_SORT);
        assert_ne!(sorting::BUBBLE_SORT, sorting::QUICK_SORT);
    }

    #[test]
    fn foreign_input_degrades_to_terminal_step() {
        use rand::SeedableRng;
        let mut rng = StdRng::seed_from_u64(7);
        let graph_input = crate::algorithm::graph::BFS.new_input(&mut rng);

        let trace = sorting::BUBBLE_SORT.run(&graph_input);
        assert_eq!(trace.len(), 1);
        assert!(trace.last().message.contains("cannot run"));
    }
}
