//! Instrumented exact string matching
//!
//! KMP, Boyer-Moore (bad-character rule), and Rabin-Karp over ASCII text.
//! Each algorithm records its preprocessing artifact (failure function,
//! bad-character table, pattern hash) as an explicit step before matching
//! begins, then one step per character comparison, shift, or verified
//! match. The snapshot accumulates the offsets of confirmed matches so the
//! terminal step is self-describing.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{
    unsupported_input, AlgorithmCategory, AlgorithmDescriptor, AlgorithmInput,
};
use crate::step::{Highlights, StepData, Trace, TraceBuilder};

const HASH_BASE: u64 = 256;
const HASH_PRIME: u64 = 101;

/// Input instance for the string matching family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextInput {
    pub text: String,
    pub pattern: String,
}

impl TextInput {
    pub fn new(text: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            pattern: pattern.into(),
        }
    }

    pub(crate) fn snapshot(&self) -> StepData {
        StepData::Text(TextSnapshot::base(self))
    }
}

/// Render snapshot for one string matching step. Preprocessing artifacts
/// and cursors are present only once the owning algorithm has produced
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSnapshot {
    pub text: String,
    pub pattern: String,

    /// KMP failure function.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<Vec<usize>>,

    /// Boyer-Moore bad-character shift table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bad_char: Option<BTreeMap<char, usize>>,

    /// Rabin-Karp pattern hash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_hash: Option<u64>,

    /// Rabin-Karp rolling window hash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_hash: Option<u64>,

    /// Absolute text offset under comparison.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_index: Option<usize>,

    /// Pattern offset under comparison.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_index: Option<usize>,

    /// Current window start (Rabin-Karp).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_position: Option<usize>,

    /// Offsets of confirmed matches so far.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matches: Vec<usize>,
}

impl TextSnapshot {
    fn base(input: &TextInput) -> Self {
        Self {
            text: input.text.clone(),
            pattern: input.pattern.clone(),
            failure: None,
            bad_char: None,
            pattern_hash: None,
            text_hash: None,
            text_index: None,
            pattern_index: None,
            current_position: None,
            matches: Vec::new(),
        }
    }
}

fn join_usizes(values: &[usize]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn fmt_table(table: &BTreeMap<char, usize>) -> String {
    let entries = table
        .iter()
        .map(|(c, shift)| format!("\"{c}\": {shift}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{entries}}}")
}

/// Pushes the shared empty-pattern terminal step; returns whether it fired.
fn handle_empty_pattern(input: &TextInput, trace: &mut TraceBuilder) -> bool {
    if input.pattern.is_empty() {
        trace.push(
            input.snapshot(),
            "Pattern is empty - nothing to search for",
            Highlights::new(),
        );
        return true;
    }
    false
}

fn completion_message(name: &str, matches: &[usize]) -> String {
    if matches.is_empty() {
        format!("{name} string matching completed - pattern not found")
    } else {
        format!("{name} string matching completed!")
    }
}

/// KMP prefix (failure) function: `failure[i]` is the length of the longest
/// proper prefix of the pattern that is also a suffix of `pattern[..=i]`.
fn failure_function(pattern: &[u8]) -> Vec<usize> {
    let mut failure = vec![0; pattern.len()];
    let mut len = 0;
    let mut i = 1;
    while i < pattern.len() {
        if pattern[i] == pattern[len] {
            len += 1;
            failure[i] = len;
            i += 1;
        } else if len > 0 {
            len = failure[len - 1];
        } else {
            failure[i] = 0;
            i += 1;
        }
    }
    failure
}

/// Knuth-Morris-Pratt search. The failure function is built before matching
/// begins and recorded as its own step; the text cursor never moves
/// backwards, so no position is re-compared once advanced past.
pub fn kmp_search(input: &TextInput) -> Trace {
    let text = input.text.as_bytes();
    let pattern = input.pattern.as_bytes();
    let mut trace = TraceBuilder::new();
    let mut matches: Vec<usize> = Vec::new();

    trace.push(
        input.snapshot(),
        format!(
            "KMP: Searching for pattern \"{}\" in text \"{}\"",
            input.pattern, input.text
        ),
        Highlights::new(),
    );
    if handle_empty_pattern(input, &mut trace) {
        return trace.finish();
    }

    let failure = failure_function(pattern);
    let snapshot = |i: Option<usize>, j: Option<usize>, matches: &[usize]| {
        let mut s = TextSnapshot::base(input);
        s.failure = Some(failure.clone());
        s.text_index = i;
        s.pattern_index = j;
        s.matches = matches.to_vec();
        StepData::Text(s)
    };

    trace.push(
        snapshot(None, None, &matches),
        format!("Built failure function: [{}]", join_usizes(&failure)),
        Highlights::new(),
    );

    let (mut i, mut j) = (0, 0);
    while i < text.len() {
        trace.push(
            snapshot(Some(i), Some(j), &matches),
            format!(
                "Comparing text[{i}]='{}' with pattern[{j}]='{}'",
                text[i] as char, pattern[j] as char
            ),
            Highlights::new().with_comparing([i]).with_current([j]),
        );

        if text[i] == pattern[j] {
            i += 1;
            j += 1;

            if j == pattern.len() {
                let offset = i - j;
                matches.push(offset);
                trace.push(
                    snapshot(Some(i), Some(j), &matches),
                    format!("Pattern found at position {offset}!"),
                    Highlights::new().with_sorted(offset..offset + pattern.len()),
                );
                j = failure[j - 1];
            }
        } else if j > 0 {
            j = failure[j - 1];
            trace.push(
                snapshot(Some(i), Some(j), &matches),
                format!("Mismatch! Using failure function: j = {j}"),
                Highlights::new().with_comparing([i]).with_current([j]),
            );
        } else {
            i += 1;
        }
    }

    trace.push(
        snapshot(None, None, &matches),
        completion_message("KMP", &matches),
        Highlights::new(),
    );
    trace.finish()
}

/// Boyer-Moore search with the bad-character rule: the pattern is compared
/// right to left within each alignment window, and on mismatch the window
/// shifts by the table value for the offending text character (or the full
/// pattern length when absent).
pub fn boyer_moore_search(input: &TextInput) -> Trace {
    let text = input.text.as_bytes();
    let pattern = input.pattern.as_bytes();
    let (n, m) = (text.len(), pattern.len());
    let mut trace = TraceBuilder::new();
    let mut matches: Vec<usize> = Vec::new();

    trace.push(
        input.snapshot(),
        format!(
            "Boyer-Moore: Searching for pattern \"{}\" in text \"{}\"",
            input.pattern, input.text
        ),
        Highlights::new(),
    );
    if handle_empty_pattern(input, &mut trace) {
        return trace.finish();
    }

    // Later occurrences overwrite earlier ones, leaving the rightmost shift.
    let mut table: BTreeMap<char, usize> = BTreeMap::new();
    for (i, &byte) in pattern.iter().take(m - 1).enumerate() {
        table.insert(byte as char, m - 1 - i);
    }

    let snapshot = |i: Option<usize>, j: Option<usize>, matches: &[usize]| {
        let mut s = TextSnapshot::base(input);
        s.bad_char = Some(table.clone());
        s.text_index = i;
        s.pattern_index = j;
        s.matches = matches.to_vec();
        StepData::Text(s)
    };

    trace.push(
        snapshot(None, None, &matches),
        format!("Built bad character table: {}", fmt_table(&table)),
        Highlights::new(),
    );

    if m > n {
        trace.push(
            snapshot(None, None, &matches),
            "Pattern is longer than the text - no match possible",
            Highlights::new(),
        );
        return trace.finish();
    }

    let mut i = 0;
    while i <= n - m {
        trace.push(
            snapshot(Some(i + m - 1), Some(m - 1), &matches),
            format!("Aligning pattern at text position {i}, comparing from right to left"),
            Highlights::new().with_current(i..i + m),
        );

        // Countdown cursor: position j - 1 is under comparison.
        let mut j = m;
        while j > 0 && text[i + j - 1] == pattern[j - 1] {
            trace.push(
                snapshot(Some(i + j - 1), Some(j - 1), &matches),
                format!(
                    "Match: text[{}]='{}' = pattern[{}]='{}'",
                    i + j - 1,
                    text[i + j - 1] as char,
                    j - 1,
                    pattern[j - 1] as char
                ),
                Highlights::new()
                    .with_comparing([i + j - 1])
                    .with_visited(i + j - 1..i + m),
            );
            j -= 1;
        }

        if j == 0 {
            matches.push(i);
            trace.push(
                snapshot(Some(i), Some(0), &matches),
                format!("Pattern found at position {i}!"),
                Highlights::new().with_sorted(i..i + m),
            );
            i += 1;
        } else {
            let bad = text[i + j - 1] as char;
            let shift = table.get(&bad).copied().unwrap_or(m);
            trace.push(
                snapshot(Some(i + j - 1), Some(j - 1), &matches),
                format!(
                    "Mismatch: text[{}]='{}' ≠ pattern[{}]='{}'. Shifting by {}",
                    i + j - 1,
                    bad,
                    j - 1,
                    pattern[j - 1] as char,
                    shift
                ),
                Highlights::new()
                    .with_comparing([i + j - 1])
                    .with_swapping([i + j - 1]),
            );
            i += shift;
        }
    }

    trace.push(
        snapshot(None, None, &matches),
        completion_message("Boyer-Moore", &matches),
        Highlights::new(),
    );
    trace.finish()
}

fn hash_of(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(0, |hash, &b| (hash * HASH_BASE + u64::from(b)) % HASH_PRIME)
}

/// Rabin-Karp search with a base-256, mod-101 rolling hash. Each shift
/// recomputes the window hash in O(1); hash equality alone is never
/// reported as a match - the window is verified character by character and
/// collisions are recorded as explicit false-positive steps.
pub fn rabin_karp_search(input: &TextInput) -> Trace {
    let text = input.text.as_bytes();
    let pattern = input.pattern.as_bytes();
    let (n, m) = (text.len(), pattern.len());
    let mut trace = TraceBuilder::new();
    let mut matches: Vec<usize> = Vec::new();

    trace.push(
        input.snapshot(),
        format!(
            "Rabin-Karp: Searching for pattern \"{}\" in text \"{}\"",
            input.pattern, input.text
        ),
        Highlights::new(),
    );
    if handle_empty_pattern(input, &mut trace) {
        return trace.finish();
    }
    if m > n {
        trace.push(
            input.snapshot(),
            "Pattern is longer than the text - no match possible",
            Highlights::new(),
        );
        return trace.finish();
    }

    let pattern_hash = hash_of(pattern);
    let mut text_hash = hash_of(&text[..m]);
    // BASE^(m-1) mod PRIME, the weight of the outgoing character.
    let high_weight = (0..m - 1).fold(1u64, |acc, _| (acc * HASH_BASE) % HASH_PRIME);

    let snapshot = |text_hash: u64, position: Option<usize>, matches: &[usize]| {
        let mut s = TextSnapshot::base(input);
        s.pattern_hash = Some(pattern_hash);
        s.text_hash = Some(text_hash);
        s.current_position = position;
        s.matches = matches.to_vec();
        StepData::Text(s)
    };

    trace.push(
        snapshot(text_hash, None, &matches),
        format!("Pattern hash: {pattern_hash}"),
        Highlights::new(),
    );

    for i in 0..=n - m {
        if i > 0 {
            let outgoing = u64::from(text[i - 1]);
            let incoming = u64::from(text[i + m - 1]);
            let without_outgoing =
                (text_hash + HASH_PRIME - (outgoing * high_weight) % HASH_PRIME) % HASH_PRIME;
            text_hash = (without_outgoing * HASH_BASE + incoming) % HASH_PRIME;
        }

        trace.push(
            snapshot(text_hash, Some(i), &matches),
            format!("Position {i}: Text hash = {text_hash}, Pattern hash = {pattern_hash}"),
            Highlights::new().with_current(i..i + m),
        );

        if text_hash == pattern_hash {
            let mut verified = true;
            for j in 0..m {
                trace.push(
                    snapshot(text_hash, Some(i), &matches),
                    format!(
                        "Hash match! Verifying: text[{}]='{}' vs pattern[{j}]='{}'",
                        i + j,
                        text[i + j] as char,
                        pattern[j] as char
                    ),
                    Highlights::new()
                        .with_comparing([i + j])
                        .with_current(i..i + m),
                );

                if text[i + j] != pattern[j] {
                    verified = false;
                    trace.push(
                        snapshot(text_hash, Some(i), &matches),
                        "Character mismatch - false positive!",
                        Highlights::new().with_swapping([i + j]),
                    );
                    break;
                }
            }

            if verified {
                matches.push(i);
                trace.push(
                    snapshot(text_hash, Some(i), &matches),
                    format!("Pattern found at position {i}!"),
                    Highlights::new().with_sorted(i..i + m),
                );
            }
        }
    }

    trace.push(
        snapshot(text_hash, None, &matches),
        completion_message("Rabin-Karp", &matches),
        Highlights::new(),
    );
    trace.finish()
}

const KMP_POOL: [(&str, &str); 4] = [
    ("ABABCABABA", "ABABA"),
    ("ABAAABCDABABCABCABCDAB", "ABCAB"),
    ("AABAACAADAABAABA", "AABA"),
    ("ABCDEFGHIJKLMNOP", "KLMN"),
];

const BOYER_MOORE_POOL: [(&str, &str); 4] = [
    ("ABAAABCDABABCABCABCDAB", "ABCAB"),
    ("ABABCABABA", "ABABA"),
    ("WHICH-FINALLY-HALTS-AT-THIS-POINT", "AT-THIS"),
    ("ABCDEFGHIJKLMNOP", "KLMN"),
];

const RABIN_KARP_POOL: [(&str, &str); 4] = [
    ("ABABCABABA", "ABABA"),
    ("GEEKSFORGEEKS", "GEEK"),
    ("ABCCDDAEFG", "CDD"),
    ("ABCDEFGHIJKLMNOP", "DEFG"),
];

fn pick(rng: &mut StdRng, pool: &[(&str, &str)]) -> AlgorithmInput {
    let (text, pattern) = pool[rng.random_range(0..pool.len())];
    AlgorithmInput::Text(TextInput::new(text, pattern))
}

fn generate_kmp(rng: &mut StdRng) -> AlgorithmInput {
    pick(rng, &KMP_POOL)
}

fn generate_boyer_moore(rng: &mut StdRng) -> AlgorithmInput {
    pick(rng, &BOYER_MOORE_POOL)
}

fn generate_rabin_karp(rng: &mut StdRng) -> AlgorithmInput {
    pick(rng, &RABIN_KARP_POOL)
}

fn run_kmp(input: &AlgorithmInput) -> Trace {
    match input {
        AlgorithmInput::Text(data) => kmp_search(data),
        other => unsupported_input("KMP String Matching", other),
    }
}

fn run_boyer_moore(input: &AlgorithmInput) -> Trace {
    match input {
        AlgorithmInput::Text(data) => boyer_moore_search(data),
        other => unsupported_input("Boyer-Moore String Matching", other),
    }
}

fn run_rabin_karp(input: &AlgorithmInput) -> Trace {
    match input {
        AlgorithmInput::Text(data) => rabin_karp_search(data),
        other => unsupported_input("Rabin-Karp String Matching", other),
    }
}

pub const KMP: AlgorithmDescriptor = AlgorithmDescriptor {
    id: "kmp",
    name: "KMP String Matching",
    description: "Knuth-Morris-Pratt algorithm for efficient pattern matching using failure function to avoid redundant comparisons.",
    time_complexity: "O(n + m)",
    space_complexity: "O(m)",
    category: AlgorithmCategory::StringMatching,
    generate: generate_kmp,
    execute: run_kmp,
};

pub const BOYER_MOORE: AlgorithmDescriptor = AlgorithmDescriptor {
    id: "boyer-moore",
    name: "Boyer-Moore String Matching",
    description: "Efficient string matching algorithm that scans the pattern from right to left and uses bad character rule for skipping.",
    time_complexity: "O(nm)",
    space_complexity: "O(σ)",
    category: AlgorithmCategory::StringMatching,
    generate: generate_boyer_moore,
    execute: run_boyer_moore,
};

pub const RABIN_KARP: AlgorithmDescriptor = AlgorithmDescriptor {
    id: "rabin-karp",
    name: "Rabin-Karp String Matching",
    description: "Uses rolling hash function to find pattern matches. Efficient for multiple pattern search.",
    time_complexity: "O(nm)",
    space_complexity: "O(1)",
    category: AlgorithmCategory::StringMatching,
    generate: generate_rabin_karp,
    execute: run_rabin_karp,
};
