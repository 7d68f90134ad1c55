//! Instrumented dynamic programming table fills
//!
//! Fibonacci, 0/1 knapsack, longest common subsequence, and minimum coin
//! change. Each cell write is one step, and cells are filled in an order
//! consistent with the recurrence's dependencies: knapsack row `i` reads
//! only row `i - 1`, LCS cell `(i, j)` reads its three upper-left
//! neighbors, and coin change amount `i` reads `i - coin`. The internal
//! "unreachable" sentinel is `u64::MAX`, rendered as `∞`; the terminal step
//! reports the extracted scalar result (`-1` for coin change with no
//! solution).
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{
    unsupported_input, AlgorithmCategory, AlgorithmDescriptor, AlgorithmInput,
};
use crate::step::{Highlights, StepData, Trace, TraceBuilder};

/// Internal "unreachable" cell sentinel, rendered as `∞`.
pub const UNREACHABLE: u64 = u64::MAX;

/// Per-problem input payload for the dynamic programming family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "problem", rename_all = "snake_case")]
pub enum DpInput {
    Fibonacci {
        n: usize,
    },
    Knapsack {
        weights: Vec<u32>,
        values: Vec<u32>,
        capacity: u32,
    },
    Lcs {
        first: String,
        second: String,
    },
    CoinChange {
        coins: Vec<u32>,
        amount: u32,
    },
}

impl DpInput {
    pub(crate) fn snapshot(&self) -> StepData {
        snapshot(self, &[], None)
    }
}

/// Render snapshot for one dynamic programming step: the problem input,
/// the table as filled so far, and the extracted result once known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub input: DpInput,
    pub table: Vec<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<i64>,
}

fn snapshot(input: &DpInput, table: &[Vec<u64>], result: Option<i64>) -> StepData {
    StepData::Table(TableSnapshot {
        input: input.clone(),
        table: table.to_vec(),
        result,
    })
}

fn fmt_cell(value: u64) -> String {
    if value == UNREACHABLE {
        "∞".to_string()
    } else {
        value.to_string()
    }
}

fn join_u32(values: &[u32]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Bottom-up Fibonacci: `F(i) = F(i-1) + F(i-2)`.
pub fn fibonacci(n: usize) -> Trace {
    let input = DpInput::Fibonacci { n };
    let mut dp = vec![0u64; n + 1];
    let mut trace = TraceBuilder::new();

    trace.push(
        snapshot(&input, &[dp.clone()], None),
        format!("Computing Fibonacci({n}) using Dynamic Programming"),
        Highlights::new(),
    );

    if n >= 1 {
        dp[1] = 1;
    }
    trace.push(
        snapshot(&input, &[dp.clone()], None),
        "Base cases: F(0) = 0, F(1) = 1",
        Highlights::new().with_current([0, 1]),
    );

    for i in 2..=n {
        dp[i] = dp[i - 1] + dp[i - 2];
        trace.push(
            snapshot(&input, &[dp.clone()], None),
            format!(
                "F({i}) = F({}) + F({}) = {} + {} = {}",
                i - 1,
                i - 2,
                dp[i - 1],
                dp[i - 2],
                dp[i]
            ),
            Highlights::new().with_current([i]).with_comparing([i - 1, i - 2]),
        );
    }

    trace.push(
        snapshot(&input, &[dp.clone()], Some(dp[n] as i64)),
        format!("Fibonacci({n}) = {}", dp[n]),
        Highlights::new().with_sorted([n]),
    );
    trace.finish()
}

/// 0/1 knapsack over a (items + 1) x (capacity + 1) table. Row `i` reads
/// only row `i - 1`, so the row-major fill respects the recurrence.
pub fn knapsack(weights: &[u32], values: &[u32], capacity: u32) -> Trace {
    let input = DpInput::Knapsack {
        weights: weights.to_vec(),
        values: values.to_vec(),
        capacity,
    };
    let n = weights.len().min(values.len());
    let cap = capacity as usize;
    let mut dp = vec![vec![0u64; cap + 1]; n + 1];
    let mut trace = TraceBuilder::new();

    trace.push(
        snapshot(&input, &dp, None),
        format!("0/1 Knapsack: {n} items, capacity {capacity}"),
        Highlights::new(),
    );
    trace.push(
        snapshot(&input, &dp, None),
        format!(
            "Weights: [{}], Values: [{}]",
            join_u32(&weights[..n]),
            join_u32(&values[..n])
        ),
        Highlights::new(),
    );
    trace.push(
        snapshot(&input, &dp, None),
        "Base case: 0 items gives 0 value for any capacity",
        Highlights::new().with_current([0]),
    );

    for i in 1..=n {
        for w in 0..=cap {
            let weight = weights[i - 1] as usize;
            let value = u64::from(values[i - 1]);

            if weight <= w {
                let include = value + dp[i - 1][w - weight];
                let exclude = dp[i - 1][w];
                dp[i][w] = include.max(exclude);

                trace.push(
                    snapshot(&input, &dp, None),
                    format!(
                        "Item {i} (w={weight}, v={value}): Include={include} vs Exclude={exclude} → {}",
                        dp[i][w]
                    ),
                    Highlights::new().with_current([i]).with_comparing([i - 1]),
                );
            } else {
                dp[i][w] = dp[i - 1][w];

                trace.push(
                    snapshot(&input, &dp, None),
                    format!("Item {i} too heavy ({weight} > {w}), exclude: {}", dp[i][w]),
                    Highlights::new().with_current([i]).with_swapping([i - 1]),
                );
            }
        }
    }

    trace.push(
        snapshot(&input, &dp, Some(dp[n][cap] as i64)),
        format!("Maximum value: {}", dp[n][cap]),
        Highlights::new().with_sorted([n]),
    );
    trace.finish()
}

/// Longest common subsequence over an (m + 1) x (n + 1) table.
pub fn longest_common_subsequence(first: &str, second: &str) -> Trace {
    let input = DpInput::Lcs {
        first: first.to_string(),
        second: second.to_string(),
    };
    let a = first.as_bytes();
    let b = second.as_bytes();
    let (m, n) = (a.len(), b.len());
    let mut dp = vec![vec![0u64; n + 1]; m + 1];
    let mut trace = TraceBuilder::new();

    trace.push(
        snapshot(&input, &dp, None),
        format!("LCS of \"{first}\" and \"{second}\""),
        Highlights::new(),
    );
    trace.push(
        snapshot(&input, &dp, None),
        "Base case: empty string has LCS length 0",
        Highlights::new().with_current([0]),
    );

    for i in 1..=m {
        for j in 1..=n {
            if a[i - 1] == b[j - 1] {
                dp[i][j] = dp[i - 1][j - 1] + 1;

                trace.push(
                    snapshot(&input, &dp, None),
                    format!(
                        "Match: '{}' = '{}', LCS[{i}][{j}] = {}",
                        a[i - 1] as char,
                        b[j - 1] as char,
                        dp[i][j]
                    ),
                    Highlights::new().with_current([i]).with_sorted([i - 1]),
                );
            } else {
                dp[i][j] = dp[i - 1][j].max(dp[i][j - 1]);

                trace.push(
                    snapshot(&input, &dp, None),
                    format!(
                        "No match: '{}' ≠ '{}', take max({}, {}) = {}",
                        a[i - 1] as char,
                        b[j - 1] as char,
                        dp[i - 1][j],
                        dp[i][j - 1],
                        dp[i][j]
                    ),
                    Highlights::new().with_current([i]).with_comparing([i - 1]),
                );
            }
        }
    }

    trace.push(
        snapshot(&input, &dp, Some(dp[m][n] as i64)),
        format!("LCS length: {}", dp[m][n]),
        Highlights::new().with_sorted([m]),
    );
    trace.finish()
}

/// Minimum coin change. `UNREACHABLE` marks amounts no coin combination
/// can form; the terminal result is `-1` when the target amount stays
/// unreachable.
pub fn coin_change(coins: &[u32], amount: u32) -> Trace {
    let input = DpInput::CoinChange {
        coins: coins.to_vec(),
        amount,
    };
    let target = amount as usize;
    let mut dp = vec![UNREACHABLE; target + 1];
    dp[0] = 0;
    let mut trace = TraceBuilder::new();

    trace.push(
        snapshot(&input, &[dp.clone()], None),
        format!("Coin Change: coins [{}], amount {amount}", join_u32(coins)),
        Highlights::new(),
    );
    trace.push(
        snapshot(&input, &[dp.clone()], None),
        "Base case: 0 coins needed for amount 0",
        Highlights::new().with_current([0]),
    );

    for i in 1..=target {
        trace.push(
            snapshot(&input, &[dp.clone()], None),
            format!("Computing minimum coins for amount {i}"),
            Highlights::new().with_current([i]),
        );

        for &coin in coins {
            let coin = coin as usize;
            if coin == 0 || coin > i || dp[i - coin] == UNREACHABLE {
                continue;
            }
            let candidate = dp[i - coin] + 1;
            if candidate < dp[i] {
                dp[i] = candidate;

                trace.push(
                    snapshot(&input, &[dp.clone()], None),
                    format!(
                        "Using coin {coin}: dp[{i}] = dp[{}] + 1 = {} + 1 = {}",
                        i - coin,
                        fmt_cell(dp[i - coin]),
                        fmt_cell(dp[i])
                    ),
                    Highlights::new().with_current([i]).with_comparing([i - coin]),
                );
            }
        }

        if dp[i] == UNREACHABLE {
            trace.push(
                snapshot(&input, &[dp.clone()], None),
                format!("No solution possible for amount {i}"),
                Highlights::new().with_swapping([i]),
            );
        }
    }

    let result = if dp[target] == UNREACHABLE {
        -1
    } else {
        dp[target] as i64
    };
    trace.push(
        snapshot(&input, &[dp.clone()], Some(result)),
        if result == -1 {
            "No solution possible".to_string()
        } else {
            format!("Minimum coins: {result}")
        },
        Highlights::new().with_sorted([target]),
    );
    trace.finish()
}

const LCS_POOL: [(&str, &str); 4] = [
    ("ABCDGH", "AEDFHR"),
    ("AGGTAB", "GXTXAYB"),
    ("STONE", "LONGEST"),
    ("ABCDEF", "ACBDEF"),
];

const COIN_POOL: [&[u32]; 4] = [&[1, 3, 4], &[1, 2, 5], &[2, 3, 5], &[1, 4, 5]];

fn generate_fibonacci(rng: &mut StdRng) -> AlgorithmInput {
    AlgorithmInput::Dp(DpInput::Fibonacci {
        n: rng.random_range(5..=14),
    })
}

fn generate_knapsack(rng: &mut StdRng) -> AlgorithmInput {
    let n = rng.random_range(3..=6);
    AlgorithmInput::Dp(DpInput::Knapsack {
        weights: (0..n).map(|_| rng.random_range(1..=5)).collect(),
        values: (0..n).map(|_| rng.random_range(2..=9)).collect(),
        capacity: rng.random_range(8..=17),
    })
}

fn generate_lcs(rng: &mut StdRng) -> AlgorithmInput {
    let (first, second) = LCS_POOL[rng.random_range(0..LCS_POOL.len())];
    AlgorithmInput::Dp(DpInput::Lcs {
        first: first.to_string(),
        second: second.to_string(),
    })
}

fn generate_coin_change(rng: &mut StdRng) -> AlgorithmInput {
    AlgorithmInput::Dp(DpInput::CoinChange {
        coins: COIN_POOL[rng.random_range(0..COIN_POOL.len())].to_vec(),
        amount: rng.random_range(6..=13),
    })
}

fn run_fibonacci(input: &AlgorithmInput) -> Trace {
    match input {
        AlgorithmInput::Dp(DpInput::Fibonacci { n }) => fibonacci(*n),
        other => unsupported_input("Fibonacci DP", other),
    }
}

fn run_knapsack(input: &AlgorithmInput) -> Trace {
    match input {
        AlgorithmInput::Dp(DpInput::Knapsack {
            weights,
            values,
            capacity,
        }) => knapsack(weights, values, *capacity),
        other => unsupported_input("0/1 Knapsack", other),
    }
}

fn run_lcs(input: &AlgorithmInput) -> Trace {
    match input {
        AlgorithmInput::Dp(DpInput::Lcs { first, second }) => {
            longest_common_subsequence(first, second)
        }
        other => unsupported_input("Longest Common Subsequence", other),
    }
}

fn run_coin_change(input: &AlgorithmInput) -> Trace {
    match input {
        AlgorithmInput::Dp(DpInput::CoinChange { coins, amount }) => coin_change(coins, *amount),
        other => unsupported_input("Coin Change", other),
    }
}

pub const FIBONACCI: AlgorithmDescriptor = AlgorithmDescriptor {
    id: "fibonacci",
    name: "Fibonacci DP",
    description: "Compute Fibonacci numbers using dynamic programming to avoid redundant calculations.",
    time_complexity: "O(n)",
    space_complexity: "O(n)",
    category: AlgorithmCategory::DynamicProgramming,
    generate: generate_fibonacci,
    execute: run_fibonacci,
};

pub const KNAPSACK: AlgorithmDescriptor = AlgorithmDescriptor {
    id: "knapsack",
    name: "0/1 Knapsack",
    description: "Find maximum value subset of items that fit in knapsack capacity.",
    time_complexity: "O(nW)",
    space_complexity: "O(nW)",
    category: AlgorithmCategory::DynamicProgramming,
    generate: generate_knapsack,
    execute: run_knapsack,
};

pub const LCS: AlgorithmDescriptor = AlgorithmDescriptor {
    id: "lcs",
    name: "Longest Common Subsequence",
    description: "Find the length of longest subsequence common to two sequences.",
    time_complexity: "O(mn)",
    space_complexity: "O(mn)",
    category: AlgorithmCategory::DynamicProgramming,
    generate: generate_lcs,
    execute: run_lcs,
};

pub const COIN_CHANGE: AlgorithmDescriptor = AlgorithmDescriptor {
    id: "coinchange",
    name: "Coin Change",
    description: "Find minimum number of coins needed to make a given amount.",
    time_complexity: "O(n×amount)",
    space_complexity: "O(amount)",
    category: AlgorithmCategory::DynamicProgramming,
    generate: generate_coin_change,
    execute: run_coin_change,
};

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn final_result(trace: &Trace) -> Option<i64> {
        match &trace.last().data {
            StepData::Table(snapshot) => snapshot.result,
            other => panic!("expected table snapshot, got {other:?}"),
        }
    }

    fn final_table(trace: &Trace) -> Vec<Vec<u64>> {
        match &trace.last().data {
            StepData::Table(snapshot) => snapshot.table.clone(),
            other => panic!("expected table snapshot, got {other:?}"),
        }
    }

    #[test]
    fn fibonacci_known_values() {
        assert_eq!(final_result(&fibonacci(10)), Some(55));
        assert_eq!(final_result(&fibonacci(1)), Some(1));
        assert_eq!(final_result(&fibonacci(0)), Some(0));
        assert_eq!(final_result(&fibonacci(14)), Some(377));
    }

    #[test]
    fn fibonacci_records_one_step_per_cell() {
        let trace = fibonacci(10);
        let cell_steps = trace
            .iter()
            .filter(|s| s.message.starts_with("F("))
            .count();
        assert_eq!(cell_steps, 9, "one step per cell F(2)..F(10)");
    }

    /// Exhaustive subset enumeration reference.
    fn knapsack_reference(weights: &[u32], values: &[u32], capacity: u32) -> u64 {
        let n = weights.len();
        let mut best = 0u64;
        for mask in 0u32..(1 << n) {
            let (mut weight, mut value) = (0u64, 0u64);
            for i in 0..n {
                if mask & (1 << i) != 0 {
                    weight += u64::from(weights[i]);
                    value += u64::from(values[i]);
                }
            }
            if weight <= u64::from(capacity) {
                best = best.max(value);
            }
        }
        best
    }

    #[test]
    fn knapsack_matches_exhaustive_reference() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let n = rng.random_range(3..=6);
            let weights: Vec<u32> = (0..n).map(|_| rng.random_range(1..=5)).collect();
            let values: Vec<u32> = (0..n).map(|_| rng.random_range(2..=9)).collect();
            let capacity = rng.random_range(8..=17);

            let trace = knapsack(&weights, &values, capacity);
            let expected = knapsack_reference(&weights, &values, capacity) as i64;
            assert_eq!(final_result(&trace), Some(expected));
        }
    }

    #[test]
    fn knapsack_fills_one_cell_per_step() {
        let trace = knapsack(&[2, 3], &[3, 4], 5);
        let cell_steps = trace
            .iter()
            .filter(|s| s.message.starts_with("Item"))
            .count();
        assert_eq!(cell_steps, 2 * 6, "rows 1..=2, columns 0..=5");
    }

    /// Plain recursive LCS reference.
    fn lcs_reference(a: &[u8], b: &[u8]) -> u64 {
        if a.is_empty() || b.is_empty() {
            0
        } else if a[a.len() - 1] == b[b.len() - 1] {
            1 + lcs_reference(&a[..a.len() - 1], &b[..b.len() - 1])
        } else {
            lcs_reference(&a[..a.len() - 1], b).max(lcs_reference(a, &b[..b.len() - 1]))
        }
    }

    #[test]
    fn lcs_matches_recursive_reference_on_pool() {
        for (first, second) in LCS_POOL {
            let trace = longest_common_subsequence(first, second);
            let expected = lcs_reference(first.as_bytes(), second.as_bytes()) as i64;
            assert_eq!(final_result(&trace), Some(expected), "LCS({first}, {second})");
        }
    }

    #[test]
    fn lcs_known_value() {
        let trace = longest_common_subsequence("AGGTAB", "GXTXAYB");
        assert_eq!(final_result(&trace), Some(4));
    }

    #[test]
    fn coin_change_finds_minimum() {
        let trace = coin_change(&[1, 3, 4], 6);
        assert_eq!(final_result(&trace), Some(2));

        let trace = coin_change(&[1, 2, 5], 11);
        assert_eq!(final_result(&trace), Some(3));
    }

    #[test]
    fn coin_change_reports_minus_one_when_unreachable() {
        let trace = coin_change(&[5], 3);
        assert_eq!(final_result(&trace), Some(-1));
        assert!(trace.last().message.contains("No solution possible"));

        let unreachable_steps = trace
            .iter()
            .filter(|s| s.message.starts_with("No solution possible for amount"))
            .count();
        assert_eq!(unreachable_steps, 3, "amounts 1, 2, 3 are all unreachable");
    }

    #[test]
    fn coin_change_table_uses_unreachable_sentinel_internally() {
        let trace = coin_change(&[5], 3);
        let table = final_table(&trace);
        assert_eq!(table[0][3], UNREACHABLE);
        assert_eq!(table[0][0], 0);
    }

    #[test]
    fn tables_fill_in_dependency_order() {
        // Knapsack row i only ever reads row i - 1: verify that at each
        // "Item i" step, rows above i - 1 are never needed by checking the
        // final table against the recurrence directly.
        let weights = [2u32, 3, 4];
        let values = [3u32, 4, 5];
        let trace = knapsack(&weights, &values, 6);
        let table = final_table(&trace);
        for i in 1..table.len() {
            for w in 0..table[i].len() {
                let weight = weights[i - 1] as usize;
                let expected = if weight <= w {
                    table[i - 1][w].max(u64::from(values[i - 1]) + table[i - 1][w - weight])
                } else {
                    table[i - 1][w]
                };
                assert_eq!(table[i][w], expected);
            }
        }
    }

    #[test]
    fn execute_is_deterministic_for_a_fixed_input() {
        assert_eq!(fibonacci(12), fibonacci(12));
        assert_eq!(coin_change(&[2, 3, 5], 13), coin_change(&[2, 3, 5], 13));
        assert_eq!(
            longest_common_subsequence("STONE", "LONGEST"),
            longest_common_subsequence("STONE", "LONGEST")
        );
        assert_eq!(knapsack(&[1, 2], &[2, 3], 3), knapsack(&[1, 2], &[2, 3], 3));
    }
}
