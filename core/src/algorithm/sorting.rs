//! Instrumented comparison sorts
//!
//! Five textbook sorting algorithms, each recording one step per observable
//! unit of work: a comparison, a swap, a shift, or a pivot placement. The
//! `sorted` highlight set only ever names index positions that will not move
//! again, and the terminal step's array is sorted ascending with `sorted`
//! covering the whole range.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{
    unsupported_input, AlgorithmCategory, AlgorithmDescriptor, AlgorithmInput,
};
use crate::step::{Highlights, StepData, Trace, TraceBuilder};

/// Default element count for generated arrays.
pub const DEFAULT_SIZE: usize = 12;

const VALUE_MIN: u32 = 10;
const VALUE_MAX: u32 = 99;

/// Input instance for the sorting family: the unsorted array plus its
/// maximum value (kept alongside so a renderer can scale bars without
/// rescanning).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortingInput {
    pub values: Vec<u32>,
    pub max_value: u32,
}

impl SortingInput {
    pub fn new(values: Vec<u32>) -> Self {
        let max_value = values.iter().copied().max().unwrap_or(0);
        Self { values, max_value }
    }

    /// Uniform random array of `len` values in 10..=99.
    pub fn random(rng: &mut StdRng, len: usize) -> Self {
        Self::new((0..len).map(|_| rng.random_range(VALUE_MIN..=VALUE_MAX)).collect())
    }

    pub(crate) fn snapshot(&self) -> StepData {
        snapshot(&self.values, self.max_value)
    }
}

/// Render snapshot for one sorting step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortingSnapshot {
    pub array: Vec<u32>,
    pub max_value: u32,
}

fn snapshot(array: &[u32], max_value: u32) -> StepData {
    StepData::Sorting(SortingSnapshot {
        array: array.to_vec(),
        max_value,
    })
}

/// Pushes the shared "empty array" terminal step; returns whether it fired.
fn handle_empty(array: &[u32], max_value: u32, trace: &mut TraceBuilder) -> bool {
    if array.is_empty() {
        trace.push(
            snapshot(array, max_value),
            "Array is empty - nothing to sort",
            Highlights::new().with_sorted(0..0),
        );
        return true;
    }
    false
}

pub fn bubble_sort(input: &SortingInput) -> Trace {
    let mut array = input.values.clone();
    let max = input.max_value;
    let n = array.len();
    let mut trace = TraceBuilder::new();

    trace.push(
        snapshot(&array, max),
        "Starting Bubble Sort - comparing adjacent elements",
        Highlights::new(),
    );
    if handle_empty(&array, max, &mut trace) {
        return trace.finish();
    }

    for i in 0..n.saturating_sub(1) {
        for j in 0..n - 1 - i {
            trace.push(
                snapshot(&array, max),
                format!(
                    "Comparing elements at positions {} and {}: {} vs {}",
                    j,
                    j + 1,
                    array[j],
                    array[j + 1]
                ),
                Highlights::new()
                    .with_comparing([j, j + 1])
                    .with_sorted(n - i..n),
            );

            if array[j] > array[j + 1] {
                array.swap(j, j + 1);
                trace.push(
                    snapshot(&array, max),
                    format!("Swapped {} and {}", array[j + 1], array[j]),
                    Highlights::new()
                        .with_swapping([j, j + 1])
                        .with_sorted(n - i..n),
                );
            }
        }
    }

    trace.push(
        snapshot(&array, max),
        "Bubble Sort completed! Array is now sorted.",
        Highlights::new().with_sorted(0..n),
    );
    trace.finish()
}

pub fn quick_sort(input: &SortingInput) -> Trace {
    let mut array = input.values.clone();
    let max = input.max_value;
    let n = array.len();
    let mut trace = TraceBuilder::new();

    trace.push(
        snapshot(&array, max),
        "Starting Quick Sort - divide and conquer approach",
        Highlights::new(),
    );
    if handle_empty(&array, max, &mut trace) {
        return trace.finish();
    }

    quick_sort_range(&mut array, max, 0, n - 1, &mut trace);

    trace.push(
        snapshot(&array, max),
        "Quick Sort completed!",
        Highlights::new().with_sorted(0..n),
    );
    trace.finish()
}

fn quick_sort_range(array: &mut [u32], max: u32, low: usize, high: usize, trace: &mut TraceBuilder) {
    if low >= high {
        return;
    }
    let pivot_index = partition(array, max, low, high, trace);
    if pivot_index > low {
        quick_sort_range(array, max, low, pivot_index - 1, trace);
    }
    if pivot_index < high {
        quick_sort_range(array, max, pivot_index + 1, high, trace);
    }
}

/// Lomuto partition; the pivot-placement swap is recorded as its own step,
/// distinct from the comparison steps that precede it.
fn partition(array: &mut [u32], max: u32, low: usize, high: usize, trace: &mut TraceBuilder) -> usize {
    let pivot = array[high];
    let mut slot = low;

    trace.push(
        snapshot(array, max),
        format!("Partitioning with pivot {pivot} at position {high}"),
        Highlights::new().with_current([high]),
    );

    for j in low..high {
        trace.push(
            snapshot(array, max),
            format!("Comparing {} with pivot {}", array[j], pivot),
            Highlights::new().with_comparing([j]).with_current([high]),
        );

        if array[j] < pivot {
            if slot != j {
                array.swap(slot, j);
                trace.push(
                    snapshot(array, max),
                    format!(
                        "Swapped {} and {} - moving smaller element left",
                        array[slot], array[j]
                    ),
                    Highlights::new().with_swapping([slot, j]).with_current([high]),
                );
            }
            slot += 1;
        }
    }

    array.swap(slot, high);
    trace.push(
        snapshot(array, max),
        format!("Placing pivot {pivot} in correct position {slot}"),
        Highlights::new().with_swapping([slot, high]),
    );

    slot
}

pub fn merge_sort(input: &SortingInput) -> Trace {
    let mut array = input.values.clone();
    let max = input.max_value;
    let n = array.len();
    let mut trace = TraceBuilder::new();

    trace.push(
        snapshot(&array, max),
        "Starting Merge Sort - divide and conquer with merging",
        Highlights::new(),
    );
    if handle_empty(&array, max, &mut trace) {
        return trace.finish();
    }

    merge_sort_range(&mut array, max, 0, n - 1, &mut trace);

    trace.push(
        snapshot(&array, max),
        "Merge Sort completed!",
        Highlights::new().with_sorted(0..n),
    );
    trace.finish()
}

fn merge_sort_range(array: &mut [u32], max: u32, left: usize, right: usize, trace: &mut TraceBuilder) {
    if left < right {
        let mid = (left + right) / 2;
        merge_sort_range(array, max, left, mid, trace);
        merge_sort_range(array, max, mid + 1, right, trace);
        merge(array, max, left, mid, right, trace);
    }
}

fn merge(array: &mut [u32], max: u32, left: usize, mid: usize, right: usize, trace: &mut TraceBuilder) {
    let left_half = array[left..=mid].to_vec();
    let right_half = array[mid + 1..=right].to_vec();

    trace.push(
        snapshot(array, max),
        format!("Merging subarrays [{left}..{mid}] and [{}..{right}]", mid + 1),
        Highlights::new().with_comparing(left..=right),
    );

    let (mut i, mut j, mut k) = (0, 0, left);
    while i < left_half.len() && j < right_half.len() {
        if left_half[i] <= right_half[j] {
            array[k] = left_half[i];
            i += 1;
        } else {
            array[k] = right_half[j];
            j += 1;
        }
        k += 1;

        trace.push(
            snapshot(array, max),
            format!("Placed {} in position {}", array[k - 1], k - 1),
            Highlights::new()
                .with_current([k - 1])
                .with_comparing(left..=right),
        );
    }

    while i < left_half.len() {
        array[k] = left_half[i];
        i += 1;
        k += 1;
    }
    while j < right_half.len() {
        array[k] = right_half[j];
        j += 1;
        k += 1;
    }
}

pub fn selection_sort(input: &SortingInput) -> Trace {
    let mut array = input.values.clone();
    let max = input.max_value;
    let n = array.len();
    let mut trace = TraceBuilder::new();

    trace.push(
        snapshot(&array, max),
        "Starting Selection Sort - finding minimum element in each iteration",
        Highlights::new(),
    );
    if handle_empty(&array, max, &mut trace) {
        return trace.finish();
    }

    for i in 0..n.saturating_sub(1) {
        let mut min_index = i;

        trace.push(
            snapshot(&array, max),
            "Finding minimum element in remaining unsorted portion",
            Highlights::new().with_current([i]).with_sorted(0..i),
        );

        for j in i + 1..n {
            trace.push(
                snapshot(&array, max),
                format!(
                    "Comparing {} with current minimum {}",
                    array[j], array[min_index]
                ),
                Highlights::new()
                    .with_comparing([j, min_index])
                    .with_current([i])
                    .with_sorted(0..i),
            );

            if array[j] < array[min_index] {
                min_index = j;
            }
        }

        if min_index != i {
            array.swap(i, min_index);
            trace.push(
                snapshot(&array, max),
                format!("Swapped {} to position {}", array[i], i),
                Highlights::new()
                    .with_swapping([i, min_index])
                    .with_sorted(0..i),
            );
        }
    }

    trace.push(
        snapshot(&array, max),
        "Selection Sort completed!",
        Highlights::new().with_sorted(0..n),
    );
    trace.finish()
}

pub fn insertion_sort(input: &SortingInput) -> Trace {
    let mut array = input.values.clone();
    let max = input.max_value;
    let n = array.len();
    let mut trace = TraceBuilder::new();

    trace.push(
        snapshot(&array, max),
        "Starting Insertion Sort - building sorted portion one element at a time",
        Highlights::new(),
    );
    if handle_empty(&array, max, &mut trace) {
        return trace.finish();
    }

    for i in 1..n {
        let key = array[i];
        let mut slot = i;

        trace.push(
            snapshot(&array, max),
            format!("Inserting {key} into sorted portion"),
            Highlights::new().with_current([i]).with_sorted(0..i),
        );

        while slot > 0 && array[slot - 1] > key {
            trace.push(
                snapshot(&array, max),
                format!("{} > {}, shifting right", array[slot - 1], key),
                Highlights::new()
                    .with_comparing([slot - 1, slot])
                    .with_sorted(0..i),
            );

            array[slot] = array[slot - 1];
            slot -= 1;

            trace.push(
                snapshot(&array, max),
                format!("Shifted {} to the right", array[slot + 1]),
                Highlights::new()
                    .with_swapping([slot, slot + 1])
                    .with_sorted(0..i),
            );
        }

        array[slot] = key;
        trace.push(
            snapshot(&array, max),
            format!("Placed {key} in correct position"),
            Highlights::new().with_current([slot]).with_sorted(0..i + 1),
        );
    }

    trace.push(
        snapshot(&array, max),
        "Insertion Sort completed!",
        Highlights::new().with_sorted(0..n),
    );
    trace.finish()
}

fn generate(rng: &mut StdRng) -> AlgorithmInput {
    AlgorithmInput::Sorting(SortingInput::random(rng, DEFAULT_SIZE))
}

fn run_bubble(input: &AlgorithmInput) -> Trace {
    match input {
        AlgorithmInput::Sorting(data) => bubble_sort(data),
        other => unsupported_input("Bubble Sort", other),
    }
}

fn run_quick(input: &AlgorithmInput) -> Trace {
    match input {
        AlgorithmInput::Sorting(data) => quick_sort(data),
        other => unsupported_input("Quick Sort", other),
    }
}

fn run_merge(input: &AlgorithmInput) -> Trace {
    match input {
        AlgorithmInput::Sorting(data) => merge_sort(data),
        other => unsupported_input("Merge Sort", other),
    }
}

fn run_selection(input: &AlgorithmInput) -> Trace {
    match input {
        AlgorithmInput::Sorting(data) => selection_sort(data),
        other => unsupported_input("Selection Sort", other),
    }
}

fn run_insertion(input: &AlgorithmInput) -> Trace {
    match input {
        AlgorithmInput::Sorting(data) => insertion_sort(data),
        other => unsupported_input("Insertion Sort", other),
    }
}

pub const BUBBLE_SORT: AlgorithmDescriptor = AlgorithmDescriptor {
    id: "bubble",
    name: "Bubble Sort",
    description: "Repeatedly steps through the list, compares adjacent elements and swaps them if they are in the wrong order.",
    time_complexity: "O(n²)",
    space_complexity: "O(1)",
    category: AlgorithmCategory::Sorting,
    generate,
    execute: run_bubble,
};

pub const QUICK_SORT: AlgorithmDescriptor = AlgorithmDescriptor {
    id: "quick",
    name: "Quick Sort",
    description: "Divides the array into partitions around a pivot element and recursively sorts the partitions.",
    time_complexity: "O(n log n)",
    space_complexity: "O(log n)",
    category: AlgorithmCategory::Sorting,
    generate,
    execute: run_quick,
};

pub const MERGE_SORT: AlgorithmDescriptor = AlgorithmDescriptor {
    id: "merge",
    name: "Merge Sort",
    description: "Divides the array into halves, recursively sorts them, and merges the sorted halves.",
    time_complexity: "O(n log n)",
    space_complexity: "O(n)",
    category: AlgorithmCategory::Sorting,
    generate,
    execute: run_merge,
};

pub const SELECTION_SORT: AlgorithmDescriptor = AlgorithmDescriptor {
    id: "selection",
    name: "Selection Sort",
    description: "Finds the minimum element and places it at the beginning. Repeats for the remaining unsorted portion.",
    time_complexity: "O(n²)",
    space_complexity: "O(1)",
    category: AlgorithmCategory::Sorting,
    generate,
    execute: run_selection,
};

pub const INSERTION_SORT: AlgorithmDescriptor = AlgorithmDescriptor {
    id: "insertion",
    name: "Insertion Sort",
    description: "Builds the final sorted array one item at a time. Very efficient for small datasets.",
    time_complexity: "O(n²)",
    space_complexity: "O(1)",
    category: AlgorithmCategory::Sorting,
    generate,
    execute: run_insertion,
};

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    type SortFn = fn(&SortingInput) -> Trace;

    const SORTS: [(&str, SortFn); 5] = [
        ("bubble", bubble_sort),
        ("quick", quick_sort),
        ("merge", merge_sort),
        ("selection", selection_sort),
        ("insertion", insertion_sort),
    ];

    fn final_array(trace: &Trace) -> Vec<u32> {
        match &trace.last().data {
            StepData::Sorting(snapshot) => snapshot.array.clone(),
            other => panic!("expected sorting snapshot, got {other:?}"),
        }
    }

    #[test]
    fn bubble_sort_concrete_scenario() {
        let input = SortingInput::new(vec![5, 3, 4, 1, 2]);
        let trace = bubble_sort(&input);

        assert_eq!(final_array(&trace), vec![1, 2, 3, 4, 5]);
        let mut sorted = trace.last().highlights.sorted.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn all_sorts_produce_non_decreasing_output_and_full_sorted_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for round in 0..100 {
            let len = rng.random_range(1..=50);
            let input = SortingInput::random(&mut rng, len);
            for (name, sort) in SORTS {
                let trace = sort(&input);
                let result = final_array(&trace);
                assert!(
                    result.windows(2).all(|w| w[0] <= w[1]),
                    "{name} produced unsorted output in round {round}"
                );
                let mut expected = input.values.clone();
                expected.sort_unstable();
                assert_eq!(result, expected, "{name} lost or invented elements");

                let mut covered = trace.last().highlights.sorted.clone();
                covered.sort_unstable();
                assert_eq!(covered, (0..len).collect::<Vec<_>>(), "{name} sorted coverage");
            }
        }
    }

    #[test]
    fn sorted_highlights_only_name_settled_positions() {
        let mut rng = StdRng::seed_from_u64(9);
        let input = SortingInput::random(&mut rng, 16);
        for (name, sort) in SORTS {
            let trace = sort(&input);
            let result = final_array(&trace);
            for (step_index, step) in trace.iter().enumerate() {
                let StepData::Sorting(snapshot) = &step.data else {
                    panic!("foreign snapshot in {name}");
                };
                for &idx in &step.highlights.sorted {
                    assert_eq!(
                        snapshot.array[idx], result[idx],
                        "{name} step {step_index}: sorted index {idx} still moves"
                    );
                }
            }
        }
    }

    #[test]
    fn quick_sort_records_distinct_pivot_placement_steps() {
        let input = SortingInput::new(vec![9, 4, 7, 1, 8]);
        let trace = quick_sort(&input);

        let pivot_steps = trace
            .iter()
            .filter(|s| s.message.starts_with("Placing pivot"))
            .count();
        let comparisons = trace
            .iter()
            .filter(|s| s.message.contains("with pivot"))
            .count();
        assert!(pivot_steps >= 1);
        assert!(comparisons >= 1);
    }

    #[test]
    fn empty_input_terminates_with_explanatory_step() {
        let input = SortingInput::new(Vec::new());
        for (name, sort) in SORTS {
            let trace = sort(&input);
            assert!(
                trace.last().message.contains("empty"),
                "{name} missing empty-input terminal step"
            );
        }
    }

    #[test]
    fn execute_does_not_mutate_its_input() {
        let input = SortingInput::new(vec![3, 1, 2]);
        let before = input.clone();
        let _ = quick_sort(&input);
        assert_eq!(input, before);
    }

    #[test]
    fn execute_is_deterministic_for_a_fixed_input() {
        let mut rng = StdRng::seed_from_u64(7);
        let input = SortingInput::random(&mut rng, 20);
        for (_, sort) in SORTS {
            assert_eq!(sort(&input), sort(&input));
        }
    }
}
