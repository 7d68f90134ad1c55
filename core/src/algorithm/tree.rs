//! Instrumented binary tree traversals and BST search
//!
//! Inorder, preorder, postorder, and level-order traversals plus binary
//! search tree lookup over a small arena-allocated BST. Nodes are stored in
//! a `Vec` with index links rather than boxed pointers, which keeps
//! snapshots cheaply cloneable and ids stable across steps.
//!
//! Traversal order matches the textbook recursive definitions exactly;
//! level-order uses the same FIFO queue discipline as graph BFS. The search
//! target is part of the generated input, not chosen at execution time, so
//! re-running `execute` on the same input reproduces an identical trace.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{
    unsupported_input, AlgorithmCategory, AlgorithmDescriptor, AlgorithmInput,
};
use crate::step::{Highlights, StepData, Trace, TraceBuilder};

/// Default node count for generated trees.
pub const DEFAULT_NODE_COUNT: usize = 12;

/// One arena node. `id` doubles as the node's index in the arena and the
/// value carried by highlight sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: usize,
    pub value: u32,
    pub left: Option<usize>,
    pub right: Option<usize>,
}

/// Input instance for the tree family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeInput {
    pub nodes: Vec<TreeNode>,
    pub root: Option<usize>,
    pub height: usize,
    /// Value the BST search descriptor looks for; traversals ignore it.
    pub search_target: u32,
}

impl TreeInput {
    /// BST over the values 1..=`max_nodes`, inserted in balanced
    /// (middle-first) order. The search target is drawn from
    /// 1..=`max_nodes`+3 so absent-target searches occur.
    pub fn random(rng: &mut StdRng, max_nodes: usize) -> Self {
        let sorted: Vec<u32> = (1..=max_nodes as u32).collect();
        let mut order = Vec::with_capacity(sorted.len());
        balanced_order(&sorted, &mut order);

        let search_target = if max_nodes == 0 {
            0
        } else {
            rng.random_range(1..=max_nodes as u32 + 3)
        };
        Self::from_values(&order, search_target)
    }

    /// BST built by inserting `values` in the given order.
    pub fn from_values(values: &[u32], search_target: u32) -> Self {
        let mut nodes = Vec::with_capacity(values.len());
        let mut root = None;
        for &value in values {
            let inserted = insert_bst(&mut nodes, root, value);
            root.get_or_insert(inserted);
        }
        let height = height_of(&nodes, root);
        Self {
            nodes,
            root,
            height,
            search_target,
        }
    }

    fn node(&self, index: usize) -> &TreeNode {
        &self.nodes[index]
    }

    pub(crate) fn snapshot(&self) -> StepData {
        TreeSnapshot::plain(self, &[])
    }
}

/// Middle-first insertion order over a sorted slice, yielding a balanced
/// BST.
fn balanced_order(sorted: &[u32], out: &mut Vec<u32>) {
    if sorted.is_empty() {
        return;
    }
    let mid = sorted.len() / 2;
    out.push(sorted[mid]);
    balanced_order(&sorted[..mid], out);
    balanced_order(&sorted[mid + 1..], out);
}

/// Inserts `value` below `node`, allocating in the arena; returns the index
/// of the subtree root. Equal values descend right.
fn insert_bst(nodes: &mut Vec<TreeNode>, node: Option<usize>, value: u32) -> usize {
    match node {
        None => {
            let id = nodes.len();
            nodes.push(TreeNode {
                id,
                value,
                left: None,
                right: None,
            });
            id
        }
        Some(index) => {
            if value < nodes[index].value {
                let left = nodes[index].left;
                let child = insert_bst(nodes, left, value);
                nodes[index].left = Some(child);
            } else {
                let right = nodes[index].right;
                let child = insert_bst(nodes, right, value);
                nodes[index].right = Some(child);
            }
            index
        }
    }
}

fn height_of(nodes: &[TreeNode], node: Option<usize>) -> usize {
    match node {
        None => 0,
        Some(index) => {
            1 + height_of(nodes, nodes[index].left).max(height_of(nodes, nodes[index].right))
        }
    }
}

/// Render snapshot for one tree step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    pub nodes: Vec<TreeNode>,
    pub root: Option<usize>,
    pub height: usize,

    /// Traversal output collected so far.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub result: Vec<u32>,

    /// Live FIFO queue contents by node value (level-order).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue: Option<Vec<u32>>,

    /// Search target (BST search).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<u32>,
}

impl TreeSnapshot {
    fn plain(input: &TreeInput, result: &[u32]) -> StepData {
        StepData::Tree(Self {
            nodes: input.nodes.clone(),
            root: input.root,
            height: input.height,
            result: result.to_vec(),
            queue: None,
            target: None,
        })
    }

    fn with_queue(input: &TreeInput, result: &[u32], queue: &VecDeque<usize>) -> StepData {
        StepData::Tree(Self {
            nodes: input.nodes.clone(),
            root: input.root,
            height: input.height,
            result: result.to_vec(),
            queue: Some(queue.iter().map(|&i| input.node(i).value).collect()),
            target: None,
        })
    }

    fn with_target(input: &TreeInput, target: u32) -> StepData {
        StepData::Tree(Self {
            nodes: input.nodes.clone(),
            root: input.root,
            height: input.height,
            result: Vec::new(),
            queue: None,
            target: Some(target),
        })
    }
}

fn join_values(values: &[u32]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Pushes the shared "empty tree" terminal step; returns whether it fired.
fn handle_empty(input: &TreeInput, trace: &mut TraceBuilder) -> bool {
    if input.root.is_none() {
        trace.push(
            TreeSnapshot::plain(input, &[]),
            "Tree is empty - nothing to traverse",
            Highlights::new(),
        );
        return true;
    }
    false
}

fn all_ids(input: &TreeInput) -> Vec<usize> {
    input.nodes.iter().map(|n| n.id).collect()
}

pub fn inorder_traversal(input: &TreeInput) -> Trace {
    let mut trace = TraceBuilder::new();
    let mut result: Vec<u32> = Vec::new();

    trace.push(
        TreeSnapshot::plain(input, &result),
        "Starting Inorder Traversal (Left -> Root -> Right)",
        Highlights::new(),
    );
    if handle_empty(input, &mut trace) {
        return trace.finish();
    }

    if let Some(root) = input.root {
        inorder_visit(input, root, &mut result, &mut trace);
    }

    trace.push(
        TreeSnapshot::plain(input, &result),
        format!("Inorder traversal completed! Result: [{}]", join_values(&result)),
        Highlights::new().with_visited(all_ids(input)),
    );
    trace.finish()
}

fn inorder_visit(input: &TreeInput, index: usize, result: &mut Vec<u32>, trace: &mut TraceBuilder) {
    let node = *input.node(index);

    trace.push(
        TreeSnapshot::plain(input, result),
        format!("Visiting node {} - going left first", node.value),
        Highlights::new().with_current([node.id]),
    );

    if let Some(left) = node.left {
        trace.push(
            TreeSnapshot::plain(input, result),
            format!("Moving to left child of {}", node.value),
            Highlights::new().with_current([node.id]).with_comparing([left]),
        );
        inorder_visit(input, left, result, trace);
    }

    result.push(node.value);
    trace.push(
        TreeSnapshot::plain(input, result),
        format!("Processing node {} - adding to result", node.value),
        Highlights::new().with_visited([node.id]),
    );

    if let Some(right) = node.right {
        trace.push(
            TreeSnapshot::plain(input, result),
            format!("Moving to right child of {}", node.value),
            Highlights::new().with_visited([node.id]).with_comparing([right]),
        );
        inorder_visit(input, right, result, trace);
    }
}

pub fn preorder_traversal(input: &TreeInput) -> Trace {
    let mut trace = TraceBuilder::new();
    let mut result: Vec<u32> = Vec::new();

    trace.push(
        TreeSnapshot::plain(input, &result),
        "Starting Preorder Traversal (Root -> Left -> Right)",
        Highlights::new(),
    );
    if handle_empty(input, &mut trace) {
        return trace.finish();
    }

    if let Some(root) = input.root {
        preorder_visit(input, root, &mut result, &mut trace);
    }

    trace.push(
        TreeSnapshot::plain(input, &result),
        format!("Preorder traversal completed! Result: [{}]", join_values(&result)),
        Highlights::new().with_visited(all_ids(input)),
    );
    trace.finish()
}

fn preorder_visit(input: &TreeInput, index: usize, result: &mut Vec<u32>, trace: &mut TraceBuilder) {
    let node = *input.node(index);

    result.push(node.value);
    trace.push(
        TreeSnapshot::plain(input, result),
        format!("Processing node {} - adding to result first", node.value),
        Highlights::new().with_visited([node.id]),
    );

    if let Some(left) = node.left {
        trace.push(
            TreeSnapshot::plain(input, result),
            format!("Moving to left child of {}", node.value),
            Highlights::new().with_visited([node.id]).with_comparing([left]),
        );
        preorder_visit(input, left, result, trace);
    }

    if let Some(right) = node.right {
        trace.push(
            TreeSnapshot::plain(input, result),
            format!("Moving to right child of {}", node.value),
            Highlights::new().with_visited([node.id]).with_comparing([right]),
        );
        preorder_visit(input, right, result, trace);
    }
}

pub fn postorder_traversal(input: &TreeInput) -> Trace {
    let mut trace = TraceBuilder::new();
    let mut result: Vec<u32> = Vec::new();

    trace.push(
        TreeSnapshot::plain(input, &result),
        "Starting Postorder Traversal (Left -> Right -> Root)",
        Highlights::new(),
    );
    if handle_empty(input, &mut trace) {
        return trace.finish();
    }

    if let Some(root) = input.root {
        postorder_visit(input, root, &mut result, &mut trace);
    }

    trace.push(
        TreeSnapshot::plain(input, &result),
        format!("Postorder traversal completed! Result: [{}]", join_values(&result)),
        Highlights::new().with_visited(all_ids(input)),
    );
    trace.finish()
}

fn postorder_visit(input: &TreeInput, index: usize, result: &mut Vec<u32>, trace: &mut TraceBuilder) {
    let node = *input.node(index);

    trace.push(
        TreeSnapshot::plain(input, result),
        format!("Visiting node {} - processing children first", node.value),
        Highlights::new().with_current([node.id]),
    );

    if let Some(left) = node.left {
        trace.push(
            TreeSnapshot::plain(input, result),
            format!("Moving to left child of {}", node.value),
            Highlights::new().with_current([node.id]).with_comparing([left]),
        );
        postorder_visit(input, left, result, trace);
    }

    if let Some(right) = node.right {
        trace.push(
            TreeSnapshot::plain(input, result),
            format!("Moving to right child of {}", node.value),
            Highlights::new().with_current([node.id]).with_comparing([right]),
        );
        postorder_visit(input, right, result, trace);
    }

    result.push(node.value);
    trace.push(
        TreeSnapshot::plain(input, result),
        format!("Processing node {} - adding to result after children", node.value),
        Highlights::new().with_visited([node.id]),
    );
}

/// Level-order traversal with the same FIFO discipline as graph BFS.
pub fn level_order_traversal(input: &TreeInput) -> Trace {
    let mut trace = TraceBuilder::new();
    let mut result: Vec<u32> = Vec::new();

    trace.push(
        TreeSnapshot::plain(input, &result),
        "Starting Level Order Traversal (BFS)",
        match input.root {
            Some(root) => Highlights::new().with_current([input.node(root).id]),
            None => Highlights::new(),
        },
    );
    if handle_empty(input, &mut trace) {
        return trace.finish();
    }

    let mut queue: VecDeque<usize> = VecDeque::new();
    if let Some(root) = input.root {
        queue.push_back(root);
    }

    while let Some(index) = queue.pop_front() {
        let node = *input.node(index);
        result.push(node.value);

        trace.push(
            TreeSnapshot::with_queue(input, &result, &queue),
            format!("Processing node {} from queue", node.value),
            Highlights::new().with_visited([node.id]),
        );

        if let Some(left) = node.left {
            queue.push_back(left);
            trace.push(
                TreeSnapshot::with_queue(input, &result, &queue),
                format!("Adding left child {} to queue", input.node(left).value),
                Highlights::new().with_visited([node.id]).with_comparing([left]),
            );
        }

        if let Some(right) = node.right {
            queue.push_back(right);
            trace.push(
                TreeSnapshot::with_queue(input, &result, &queue),
                format!("Adding right child {} to queue", input.node(right).value),
                Highlights::new().with_visited([node.id]).with_comparing([right]),
            );
        }
    }

    trace.push(
        TreeSnapshot::with_queue(input, &result, &VecDeque::new()),
        format!(
            "Level order traversal completed! Result: [{}]",
            join_values(&result)
        ),
        Highlights::new().with_visited(all_ids(input)),
    );
    trace.finish()
}

/// Binary search tree lookup for the input's `search_target`. Compares at
/// each node, branches left or right, and terminates on a null child with
/// an explicit "not found" step whose highlights are empty.
pub fn bst_search(input: &TreeInput) -> Trace {
    let mut trace = TraceBuilder::new();
    let target = input.search_target;

    trace.push(
        TreeSnapshot::with_target(input, target),
        format!("Starting BST Search for value {target}"),
        Highlights::new(),
    );
    if input.root.is_none() {
        trace.push(
            TreeSnapshot::with_target(input, target),
            format!("Tree is empty - value {target} not found"),
            Highlights::new(),
        );
        return trace.finish();
    }

    search_visit(input, input.root, target, &mut trace);
    trace.finish()
}

fn search_visit(input: &TreeInput, node: Option<usize>, target: u32, trace: &mut TraceBuilder) {
    let Some(index) = node else {
        trace.push(
            TreeSnapshot::with_target(input, target),
            format!("Reached null node - value {target} not found"),
            Highlights::new(),
        );
        return;
    };
    let node = *input.node(index);

    trace.push(
        TreeSnapshot::with_target(input, target),
        format!("Comparing {target} with node {}", node.value),
        Highlights::new().with_current([node.id]),
    );

    if target == node.value {
        trace.push(
            TreeSnapshot::with_target(input, target),
            format!("Found {target}! Search successful"),
            Highlights::new().with_sorted([node.id]),
        );
    } else if target < node.value {
        trace.push(
            TreeSnapshot::with_target(input, target),
            format!("{target} < {}, searching left subtree", node.value),
            Highlights::new()
                .with_current([node.id])
                .with_comparing(node.left.into_iter()),
        );
        search_visit(input, node.left, target, trace);
    } else {
        trace.push(
            TreeSnapshot::with_target(input, target),
            format!("{target} > {}, searching right subtree", node.value),
            Highlights::new()
                .with_current([node.id])
                .with_comparing(node.right.into_iter()),
        );
        search_visit(input, node.right, target, trace);
    }
}

fn generate(rng: &mut StdRng) -> AlgorithmInput {
    AlgorithmInput::Tree(TreeInput::random(rng, DEFAULT_NODE_COUNT))
}

fn run_inorder(input: &AlgorithmInput) -> Trace {
    match input {
        AlgorithmInput::Tree(data) => inorder_traversal(data),
        other => unsupported_input("Inorder Traversal", other),
    }
}

fn run_preorder(input: &AlgorithmInput) -> Trace {
    match input {
        AlgorithmInput::Tree(data) => preorder_traversal(data),
        other => unsupported_input("Preorder Traversal", other),
    }
}

fn run_postorder(input: &AlgorithmInput) -> Trace {
    match input {
        AlgorithmInput::Tree(data) => postorder_traversal(data),
        other => unsupported_input("Postorder Traversal", other),
    }
}

fn run_level_order(input: &AlgorithmInput) -> Trace {
    match input {
        AlgorithmInput::Tree(data) => level_order_traversal(data),
        other => unsupported_input("Level Order Traversal", other),
    }
}

fn run_bst_search(input: &AlgorithmInput) -> Trace {
    match input {
        AlgorithmInput::Tree(data) => bst_search(data),
        other => unsupported_input("BST Search", other),
    }
}

pub const INORDER: AlgorithmDescriptor = AlgorithmDescriptor {
    id: "inorder",
    name: "Inorder Traversal",
    description: "Traverse the tree in Left-Root-Right order. For BST, this gives sorted sequence.",
    time_complexity: "O(n)",
    space_complexity: "O(h)",
    category: AlgorithmCategory::Tree,
    generate,
    execute: run_inorder,
};

pub const PREORDER: AlgorithmDescriptor = AlgorithmDescriptor {
    id: "preorder",
    name: "Preorder Traversal",
    description: "Traverse the tree in Root-Left-Right order. Useful for creating copy of tree.",
    time_complexity: "O(n)",
    space_complexity: "O(h)",
    category: AlgorithmCategory::Tree,
    generate,
    execute: run_preorder,
};

pub const POSTORDER: AlgorithmDescriptor = AlgorithmDescriptor {
    id: "postorder",
    name: "Postorder Traversal",
    description: "Traverse the tree in Left-Right-Root order. Useful for deleting tree.",
    time_complexity: "O(n)",
    space_complexity: "O(h)",
    category: AlgorithmCategory::Tree,
    generate,
    execute: run_postorder,
};

pub const LEVEL_ORDER: AlgorithmDescriptor = AlgorithmDescriptor {
    id: "levelorder",
    name: "Level Order Traversal",
    description: "Traverse the tree level by level using a queue (BFS approach).",
    time_complexity: "O(n)",
    space_complexity: "O(w)",
    category: AlgorithmCategory::Tree,
    generate,
    execute: run_level_order,
};

pub const BST_SEARCH: AlgorithmDescriptor = AlgorithmDescriptor {
    id: "bst-search",
    name: "BST Search",
    description: "Search for a value in Binary Search Tree by comparing and choosing left/right path.",
    time_complexity: "O(h)",
    space_complexity: "O(h)",
    category: AlgorithmCategory::Tree,
    generate,
    execute: run_bst_search,
};
