//! Algorithm registry
//!
//! A static table of every selectable algorithm descriptor, keyed by id.
//! Descriptors are stateless compile-time constants, so selection cannot
//! mutate registry state and reselecting the current id is a no-op at the
//! controller level.

use thiserror::Error;

use crate::algorithm::{dp, graph, sorting, string_matching, tree};
use crate::algorithm::{AlgorithmCategory, AlgorithmDescriptor};

/// Registry lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("unknown algorithm id: {0}")]
    UnknownAlgorithm(String),
}

/// Every selectable algorithm, grouped by family.
pub static DESCRIPTORS: [AlgorithmDescriptor; 21] = [
    sorting::BUBBLE_SORT,
    sorting::QUICK_SORT,
    sorting::MERGE_SORT,
    sorting::SELECTION_SORT,
    sorting::INSERTION_SORT,
    graph::BFS,
    graph::DFS,
    graph::DIJKSTRA,
    graph::PRIM,
    string_matching::KMP,
    string_matching::BOYER_MOORE,
    string_matching::RABIN_KARP,
    tree::INORDER,
    tree::PREORDER,
    tree::POSTORDER,
    tree::LEVEL_ORDER,
    tree::BST_SEARCH,
    dp::FIBONACCI,
    dp::KNAPSACK,
    dp::LCS,
    dp::COIN_CHANGE,
];

pub fn all() -> &'static [AlgorithmDescriptor] {
    &DESCRIPTORS
}

pub fn find(id: &str) -> Option<&'static AlgorithmDescriptor> {
    DESCRIPTORS.iter().find(|descriptor| descriptor.id == id)
}

pub fn lookup(id: &str) -> Result<&'static AlgorithmDescriptor, RegistryError> {
    find(id).ok_or_else(|| RegistryError::UnknownAlgorithm(id.to_string()))
}

pub fn by_category(
    category: AlgorithmCategory,
) -> impl Iterator<Item = &'static AlgorithmDescriptor> {
    DESCRIPTORS
        .iter()
        .filter(move |descriptor| descriptor.category == category)
}

pub fn ids() -> impl Iterator<Item = &'static str> {
    DESCRIPTORS.iter().map(|descriptor| descriptor.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn ids_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for id in ids() {
            assert!(seen.insert(id), "duplicate algorithm id: {id}");
        }
        assert_eq!(seen.len(), 21);
    }

    #[test]
    fn find_and_lookup_agree() {
        assert_eq!(find("dijkstra").map(|d| d.name), Some("Dijkstra's Algorithm"));
        assert!(lookup("dijkstra").is_ok());
        assert_eq!(
            lookup("does-not-exist"),
            Err(RegistryError::UnknownAlgorithm("does-not-exist".to_string()))
        );
    }

    #[test]
    fn category_counts_match_the_families() {
        assert_eq!(by_category(AlgorithmCategory::Sorting).count(), 5);
        assert_eq!(by_category(AlgorithmCategory::Graph).count(), 4);
        assert_eq!(by_category(AlgorithmCategory::StringMatching).count(), 3);
        assert_eq!(by_category(AlgorithmCategory::Tree).count(), 5);
        assert_eq!(by_category(AlgorithmCategory::DynamicProgramming).count(), 4);
    }

    #[test]
    fn every_descriptor_is_deterministic_over_a_generated_input() {
        for descriptor in all() {
            let mut rng = StdRng::seed_from_u64(42);
            let input = descriptor.new_input(&mut rng);
            let first = descriptor.run(&input);
            let second = descriptor.run(&input);
            assert_eq!(first.len(), second.len(), "{} trace length", descriptor.id);
            assert_eq!(first, second, "{} full trace", descriptor.id);
            assert!(first.len() >= 1, "{} empty trace", descriptor.id);
        }
    }

    #[test]
    fn every_descriptor_survives_many_generated_inputs() {
        let mut rng = StdRng::seed_from_u64(1234);
        for descriptor in all() {
            for _ in 0..10 {
                let input = descriptor.new_input(&mut rng);
                let trace = descriptor.run(&input);
                assert!(!trace.is_empty(), "{} produced an empty trace", descriptor.id);
                assert!(
                    !trace.last().message.is_empty(),
                    "{} terminal step has no message",
                    descriptor.id
                );
            }
        }
    }
}
