//! Immutable step and trace model for algorithm playback
//!
//! This module defines the snapshot vocabulary shared by every instrumented
//! algorithm family: a `Step` captures one observable unit of work together
//! with a human-readable message and the highlight sets a renderer needs to
//! draw that instant, and a `Trace` is the finite, ordered, immutable
//! sequence of steps produced by a single execution.
//!
//! # Immutability Contract
//! Steps are produced once and never mutated. Every step owns a deep copy of
//! its snapshot data; no step's `data` aliases mutable substructure shared
//! with a later step, so replaying a trace backwards can never observe a
//! value written by a future step.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::algorithm::dp::TableSnapshot;
use crate::algorithm::graph::GraphSnapshot;
use crate::algorithm::sorting::SortingSnapshot;
use crate::algorithm::string_matching::TextSnapshot;
use crate::algorithm::tree::TreeSnapshot;

/// Errors arising from trace serialization and deserialization.
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("trace serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("deserialized trace contains no steps")]
    Empty,
}

/// Named index/id collections describing which elements are semantically
/// significant at a given step.
///
/// Semantics are fixed per algorithm family: sorting highlights index
/// positions into the working array, graph and tree highlights carry node
/// ids, string matching highlights carry text offsets, and dynamic
/// programming highlights carry row indices into the table. Collections are
/// sets; ordering within a collection carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlights {
    /// Elements currently being compared.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comparing: Vec<usize>,

    /// Elements currently being exchanged or invalidated.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub swapping: Vec<usize>,

    /// Elements in their final, settled position (or confirmed matches).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sorted: Vec<usize>,

    /// Elements already processed by a traversal.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub visited: Vec<usize>,

    /// The element the algorithm is focused on right now.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub current: Vec<usize>,

    /// Elements on a reconstructed path.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<usize>,
}

impl Highlights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_comparing(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.comparing = indices.into_iter().collect();
        self
    }

    pub fn with_swapping(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.swapping = indices.into_iter().collect();
        self
    }

    pub fn with_sorted(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.sorted = indices.into_iter().collect();
        self
    }

    pub fn with_visited(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.visited = indices.into_iter().collect();
        self
    }

    pub fn with_current(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.current = indices.into_iter().collect();
        self
    }

    pub fn with_path(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.path = indices.into_iter().collect();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.comparing.is_empty()
            && self.swapping.is_empty()
            && self.sorted.is_empty()
            && self.visited.is_empty()
            && self.current.is_empty()
            && self.path.is_empty()
    }
}

/// Algorithm-specific snapshot payload.
///
/// Each variant is a deep copy of all state relevant to redrawing the
/// visualization at one instant; a diff against the previous step is not
/// sufficient and is never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum StepData {
    Sorting(SortingSnapshot),
    Graph(GraphSnapshot),
    Text(TextSnapshot),
    Tree(TreeSnapshot),
    Table(TableSnapshot),
}

/// One immutable recorded instant of an algorithm's execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Deep snapshot of all render-relevant state at this instant.
    pub data: StepData,

    /// Human-readable description of the action just taken.
    pub message: String,

    /// Highlight sets for this instant.
    #[serde(default, skip_serializing_if = "Highlights::is_empty")]
    pub highlights: Highlights,
}

/// The full ordered sequence of steps produced by running an instrumented
/// algorithm to completion.
///
/// A trace is finite, immutable for its lifetime, and always contains at
/// least one step: even degenerate inputs terminate with an explanatory
/// terminal step rather than an empty sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trace {
    steps: Vec<Step>,
}

impl Trace {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// First step of the trace. Total by the non-empty invariant.
    pub fn first(&self) -> &Step {
        &self.steps[0]
    }

    /// Terminal step of the trace. Total by the non-empty invariant.
    pub fn last(&self) -> &Step {
        &self.steps[self.steps.len() - 1]
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }

    /// Serializes the trace as JSON for persistence or golden-file testing.
    pub fn to_json(&self) -> Result<String, TraceError> {
        Ok(serde_json::to_string(&self.steps)?)
    }

    /// Deserializes a trace from JSON, rejecting empty sequences.
    pub fn from_json(json: &str) -> Result<Self, TraceError> {
        let steps: Vec<Step> = serde_json::from_str(json)?;
        if steps.is_empty() {
            return Err(TraceError::Empty);
        }
        Ok(Self { steps })
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// Append-only builder used by instrumented algorithms to accumulate steps.
///
/// Replaces the recursive-closure-over-shared-array pattern: recursive
/// helpers receive `&mut TraceBuilder` explicitly, which preserves step
/// ordering while keeping each step's snapshot independently owned.
#[derive(Debug, Default)]
pub struct TraceBuilder {
    steps: Vec<Step>,
}

impl TraceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one step. `data` must already be a deep copy of the working
    /// state; the builder never snapshots on the caller's behalf.
    pub fn push(&mut self, data: StepData, message: impl Into<String>, highlights: Highlights) {
        self.steps.push(Step {
            data,
            message: message.into(),
            highlights,
        });
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn finish(self) -> Trace {
        debug_assert!(
            !self.steps.is_empty(),
            "every execution must record at least a terminal step"
        );
        Trace { steps: self.steps }
    }
}
