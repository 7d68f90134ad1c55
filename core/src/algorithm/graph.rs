//! Instrumented graph traversal and optimization algorithms
//!
//! BFS, DFS, Dijkstra's shortest paths, and Prim's minimum spanning tree
//! over small undirected weighted graphs. Each algorithm records a step per
//! node visit, enqueue, relaxation, or edge adoption, with the live queue,
//! distance table, or MST edge list embedded in the snapshot so every
//! instant is independently renderable.
//!
//! # Deterministic Tie-Breaking
//! Where the textbook algorithm leaves the choice among equal candidates
//! open, this module fixes it explicitly: Dijkstra selects the unvisited
//! node of minimum tentative distance with ties broken by lowest node id,
//! and Prim adopts the minimum-weight crossing edge with ties broken by the
//! lowest (from, to) id pair. Both scans walk ids in ascending order and
//! accept only strictly better candidates.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{
    unsupported_input, AlgorithmCategory, AlgorithmDescriptor, AlgorithmInput,
};
use crate::step::{Highlights, StepData, Trace, TraceBuilder};

/// Default node count for generated graphs.
pub const DEFAULT_NODE_COUNT: usize = 6;

/// Internal "unreachable" distance sentinel, rendered as `∞`.
pub const UNREACHABLE: u32 = u32::MAX;

const LAYOUT_RADIUS: f64 = 120.0;
const LAYOUT_CENTER_X: f64 = 200.0;
const LAYOUT_CENTER_Y: f64 = 150.0;

/// One graph vertex with its circle-layout position and adjacency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: usize,
    pub label: char,
    pub x: f64,
    pub y: f64,
    pub neighbors: Vec<usize>,
    pub weights: BTreeMap<usize, u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: usize,
    pub to: usize,
    pub weight: u32,
}

/// Input instance for the graph family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphInput {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub directed: bool,
}

impl GraphInput {
    /// Random undirected graph with `node_count` vertices on a circle
    /// layout and ⌊1.5·n⌋ distinct edges of weight 1..=10. Connectivity is
    /// not guaranteed; the algorithms treat unreachable components as a
    /// reportable outcome, not an error.
    pub fn random(rng: &mut StdRng, node_count: usize) -> Self {
        let mut nodes = layout_nodes(node_count);

        let max_edges = node_count.saturating_sub(1) * node_count / 2;
        let edge_count = (node_count * 3 / 2).min(max_edges);
        let mut seen = HashSet::new();
        let mut edges = Vec::with_capacity(edge_count);

        while edges.len() < edge_count {
            let from = rng.random_range(0..node_count);
            let to = rng.random_range(0..node_count);
            if from == to || !seen.insert((from.min(to), from.max(to))) {
                continue;
            }
            let weight = rng.random_range(1..=10);
            edges.push(GraphEdge { from, to, weight });
            nodes[from].neighbors.push(to);
            nodes[from].weights.insert(to, weight);
            nodes[to].neighbors.push(from);
            nodes[to].weights.insert(from, weight);
        }

        Self {
            nodes,
            edges,
            directed: false,
        }
    }

    /// Undirected graph from an explicit edge list, on the same circle
    /// layout as [`GraphInput::random`].
    pub fn from_edges(node_count: usize, edge_list: &[(usize, usize, u32)]) -> Self {
        let mut nodes = layout_nodes(node_count);
        let mut edges = Vec::with_capacity(edge_list.len());
        for &(from, to, weight) in edge_list {
            edges.push(GraphEdge { from, to, weight });
            nodes[from].neighbors.push(to);
            nodes[from].weights.insert(to, weight);
            nodes[to].neighbors.push(from);
            nodes[to].weights.insert(from, weight);
        }
        Self {
            nodes,
            edges,
            directed: false,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn label(&self, id: usize) -> char {
        self.nodes[id].label
    }

    pub(crate) fn snapshot(&self) -> StepData {
        StepData::Graph(GraphSnapshot::base(self))
    }
}

fn layout_nodes(node_count: usize) -> Vec<GraphNode> {
    (0..node_count)
        .map(|i| {
            let angle = TAU * i as f64 / node_count.max(1) as f64;
            GraphNode {
                id: i,
                label: (b'A' + (i % 26) as u8) as char,
                x: LAYOUT_CENTER_X + LAYOUT_RADIUS * angle.cos(),
                y: LAYOUT_CENTER_Y + LAYOUT_RADIUS * angle.sin(),
                neighbors: Vec::new(),
                weights: BTreeMap::new(),
            }
        })
        .collect()
}

/// Render snapshot for one graph step. Auxiliary tables are present only
/// for the algorithm that maintains them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub directed: bool,

    /// Live FIFO queue contents (BFS).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue: Option<Vec<usize>>,

    /// Tentative distances indexed by node id, `UNREACHABLE` meaning ∞
    /// (Dijkstra).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distances: Option<Vec<u32>>,

    /// Predecessor on the best known path, indexed by node id (Dijkstra).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<Vec<Option<usize>>>,

    /// Edges adopted into the spanning tree so far (Prim).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mst_edges: Option<Vec<GraphEdge>>,
}

impl GraphSnapshot {
    fn base(input: &GraphInput) -> Self {
        Self {
            nodes: input.nodes.clone(),
            edges: input.edges.clone(),
            directed: input.directed,
            queue: None,
            distances: None,
            previous: None,
            mst_edges: None,
        }
    }
}

fn plain(input: &GraphInput) -> StepData {
    StepData::Graph(GraphSnapshot::base(input))
}

fn with_queue(input: &GraphInput, queue: &VecDeque<usize>) -> StepData {
    let mut snapshot = GraphSnapshot::base(input);
    snapshot.queue = Some(queue.iter().copied().collect());
    StepData::Graph(snapshot)
}

fn with_distances(input: &GraphInput, distances: &[u32], previous: &[Option<usize>]) -> StepData {
    let mut snapshot = GraphSnapshot::base(input);
    snapshot.distances = Some(distances.to_vec());
    snapshot.previous = Some(previous.to_vec());
    StepData::Graph(snapshot)
}

fn with_mst(input: &GraphInput, mst_edges: &[GraphEdge]) -> StepData {
    let mut snapshot = GraphSnapshot::base(input);
    snapshot.mst_edges = Some(mst_edges.to_vec());
    StepData::Graph(snapshot)
}

fn fmt_distance(distance: u32) -> String {
    if distance == UNREACHABLE {
        "∞".to_string()
    } else {
        distance.to_string()
    }
}

/// Pushes the shared "empty graph" terminal step; returns whether it fired.
fn handle_empty(input: &GraphInput, trace: &mut TraceBuilder) -> bool {
    if input.is_empty() {
        trace.push(
            plain(input),
            "Graph is empty - nothing to traverse",
            Highlights::new(),
        );
        return true;
    }
    false
}

/// Breadth-first search from node 0.
///
/// Strict FIFO order; a node is enqueued at most once (the guard checks
/// both the visited set and current queue membership) and marked visited
/// exactly once.
pub fn breadth_first_search(input: &GraphInput) -> Trace {
    let mut trace = TraceBuilder::new();
    if handle_empty(input, &mut trace) {
        return trace.finish();
    }

    let start = 0;
    let n = input.len();
    let mut visited: Vec<usize> = Vec::new();
    let mut queue: VecDeque<usize> = VecDeque::from([start]);

    trace.push(
        plain(input),
        format!("Starting BFS from node {}", input.label(start)),
        Highlights::new().with_current([start]),
    );

    while let Some(current) = queue.pop_front() {
        if visited.contains(&current) {
            continue;
        }
        visited.push(current);

        trace.push(
            with_queue(input, &queue),
            format!("Visiting node {}", input.label(current)),
            Highlights::new()
                .with_current([current])
                .with_visited(visited.iter().copied()),
        );

        for &neighbor in &input.nodes[current].neighbors {
            if !visited.contains(&neighbor) && !queue.contains(&neighbor) {
                queue.push_back(neighbor);
                trace.push(
                    with_queue(input, &queue),
                    format!("Adding node {} to queue", input.label(neighbor)),
                    Highlights::new()
                        .with_current([current])
                        .with_comparing([neighbor])
                        .with_visited(visited.iter().copied()),
                );
            }
        }
    }

    let message = if visited.len() == n {
        "BFS traversal completed!".to_string()
    } else {
        format!(
            "BFS traversal completed - {} of {} nodes reachable from {}",
            visited.len(),
            n,
            input.label(start)
        )
    };
    trace.push(plain(input), message, Highlights::new().with_visited(visited));
    trace.finish()
}

/// Depth-first search from node 0, step-recorded in recursive pre-order:
/// each node is recorded when visited, before its neighbors are explored.
pub fn depth_first_search(input: &GraphInput) -> Trace {
    let mut trace = TraceBuilder::new();
    if handle_empty(input, &mut trace) {
        return trace.finish();
    }

    let start = 0;
    let n = input.len();
    let mut visited: Vec<usize> = Vec::new();

    trace.push(
        plain(input),
        format!("Starting DFS from node {}", input.label(start)),
        Highlights::new().with_current([start]),
    );

    dfs_visit(input, start, &mut visited, &mut trace);

    let message = if visited.len() == n {
        "DFS traversal completed!".to_string()
    } else {
        format!(
            "DFS traversal completed - {} of {} nodes reachable from {}",
            visited.len(),
            n,
            input.label(start)
        )
    };
    trace.push(plain(input), message, Highlights::new().with_visited(visited));
    trace.finish()
}

fn dfs_visit(input: &GraphInput, node: usize, visited: &mut Vec<usize>, trace: &mut TraceBuilder) {
    visited.push(node);

    trace.push(
        plain(input),
        format!("Visiting node {}", input.label(node)),
        Highlights::new()
            .with_current([node])
            .with_visited(visited.iter().copied()),
    );

    for &neighbor in &input.nodes[node].neighbors {
        if !visited.contains(&neighbor) {
            trace.push(
                plain(input),
                format!("Exploring neighbor {}", input.label(neighbor)),
                Highlights::new()
                    .with_current([node])
                    .with_comparing([neighbor])
                    .with_visited(visited.iter().copied()),
            );
            dfs_visit(input, neighbor, visited, trace);
        }
    }
}

/// Dijkstra's single-source shortest paths from node 0.
///
/// Selects, among unvisited nodes, the minimum tentative distance; ties
/// are broken by lowest node id (ascending-id scan with strict `<`). A
/// neighbor's distance is updated only when the candidate is strictly
/// smaller, so no node's recorded distance ever increases.
pub fn dijkstra(input: &GraphInput) -> Trace {
    let mut trace = TraceBuilder::new();
    if handle_empty(input, &mut trace) {
        return trace.finish();
    }

    let start = 0;
    let n = input.len();
    let mut distances = vec![UNREACHABLE; n];
    let mut previous: Vec<Option<usize>> = vec![None; n];
    let mut done = vec![false; n];
    let mut visited: Vec<usize> = Vec::new();
    distances[start] = 0;

    trace.push(
        with_distances(input, &distances, &previous),
        format!("Starting Dijkstra's algorithm from node {}", input.label(start)),
        Highlights::new().with_current([start]),
    );

    loop {
        let mut current = None;
        let mut min_distance = UNREACHABLE;
        for node in 0..n {
            if !done[node] && distances[node] < min_distance {
                min_distance = distances[node];
                current = Some(node);
            }
        }
        let Some(current) = current else { break };

        done[current] = true;
        visited.push(current);

        trace.push(
            with_distances(input, &distances, &previous),
            format!(
                "Processing node {} with distance {}",
                input.label(current),
                fmt_distance(distances[current])
            ),
            Highlights::new()
                .with_current([current])
                .with_visited(visited.iter().copied()),
        );

        for &neighbor in &input.nodes[current].neighbors {
            if done[neighbor] {
                continue;
            }
            let weight = input.nodes[current].weights.get(&neighbor).copied().unwrap_or(1);
            let candidate = distances[current].saturating_add(weight);
            if candidate < distances[neighbor] {
                distances[neighbor] = candidate;
                previous[neighbor] = Some(current);

                trace.push(
                    with_distances(input, &distances, &previous),
                    format!(
                        "Updated distance to {}: {} (via {})",
                        input.label(neighbor),
                        candidate,
                        input.label(current)
                    ),
                    Highlights::new()
                        .with_current([current])
                        .with_comparing([neighbor])
                        .with_visited(visited.iter().copied()),
                );
            }
        }
    }

    let message = if visited.len() == n {
        "Dijkstra's algorithm completed!".to_string()
    } else {
        format!(
            "Dijkstra's algorithm completed - {} of {} nodes are unreachable",
            n - visited.len(),
            n
        )
    };
    trace.push(
        with_distances(input, &distances, &previous),
        message,
        Highlights::new().with_visited(visited),
    );
    trace.finish()
}

/// Prim's minimum spanning tree grown from node 0.
///
/// Each round adopts the globally minimum-weight edge connecting the
/// visited set to the unvisited set; ties are broken by the lowest
/// (from, to) id pair. On a disconnected graph the loop stops once no
/// crossing edge remains and the terminal step reports the partial tree.
pub fn prim_mst(input: &GraphInput) -> Trace {
    let mut trace = TraceBuilder::new();
    if handle_empty(input, &mut trace) {
        return trace.finish();
    }

    let n = input.len();
    let mut visited: Vec<usize> = vec![0];
    let mut mst_edges: Vec<GraphEdge> = Vec::new();

    trace.push(
        with_mst(input, &mst_edges),
        format!("Starting Prim's MST from node {}", input.label(0)),
        Highlights::new().with_visited([0]),
    );

    while visited.len() < n {
        let mut frontier: Vec<usize> = visited.clone();
        frontier.sort_unstable();

        let mut best: Option<GraphEdge> = None;
        for &from in &frontier {
            let mut neighbors: Vec<usize> = input.nodes[from].neighbors.clone();
            neighbors.sort_unstable();
            for to in neighbors {
                if visited.contains(&to) {
                    continue;
                }
                let weight = input.nodes[from].weights.get(&to).copied().unwrap_or(1);
                if best.map_or(true, |edge| weight < edge.weight) {
                    best = Some(GraphEdge { from, to, weight });
                }
            }
        }

        let Some(edge) = best else { break };

        visited.push(edge.to);
        mst_edges.push(edge);

        trace.push(
            with_mst(input, &mst_edges),
            format!(
                "Added edge {}-{} (weight: {})",
                input.label(edge.from),
                input.label(edge.to),
                edge.weight
            ),
            Highlights::new()
                .with_visited(visited.iter().copied())
                .with_current([edge.from, edge.to]),
        );
    }

    let total: u32 = mst_edges.iter().map(|edge| edge.weight).sum();
    let message = if visited.len() == n {
        format!("Prim's MST completed! Total weight: {total}")
    } else {
        format!(
            "Prim's MST incomplete - {} of {} nodes unreachable. Partial weight: {total}",
            n - visited.len(),
            n
        )
    };
    trace.push(
        with_mst(input, &mst_edges),
        message,
        Highlights::new().with_visited(visited),
    );
    trace.finish()
}

fn generate(rng: &mut StdRng) -> AlgorithmInput {
    AlgorithmInput::Graph(GraphInput::random(rng, DEFAULT_NODE_COUNT))
}

fn run_bfs(input: &AlgorithmInput) -> Trace {
    match input {
        AlgorithmInput::Graph(data) => breadth_first_search(data),
        other => unsupported_input("Breadth-First Search", other),
    }
}

fn run_dfs(input: &AlgorithmInput) -> Trace {
    match input {
        AlgorithmInput::Graph(data) => depth_first_search(data),
        other => unsupported_input("Depth-First Search", other),
    }
}

fn run_dijkstra(input: &AlgorithmInput) -> Trace {
    match input {
        AlgorithmInput::Graph(data) => dijkstra(data),
        other => unsupported_input("Dijkstra's Algorithm", other),
    }
}

fn run_prim(input: &AlgorithmInput) -> Trace {
    match input {
        AlgorithmInput::Graph(data) => prim_mst(data),
        other => unsupported_input("Prim's MST", other),
    }
}

pub const BFS: AlgorithmDescriptor = AlgorithmDescriptor {
    id: "bfs",
    name: "Breadth-First Search",
    description: "Explores graph level by level using a queue, visiting all neighbors before going deeper.",
    time_complexity: "O(V + E)",
    space_complexity: "O(V)",
    category: AlgorithmCategory::Graph,
    generate,
    execute: run_bfs,
};

pub const DFS: AlgorithmDescriptor = AlgorithmDescriptor {
    id: "dfs",
    name: "Depth-First Search",
    description: "Explores graph by going as deep as possible before backtracking.",
    time_complexity: "O(V + E)",
    space_complexity: "O(V)",
    category: AlgorithmCategory::Graph,
    generate,
    execute: run_dfs,
};

pub const DIJKSTRA: AlgorithmDescriptor = AlgorithmDescriptor {
    id: "dijkstra",
    name: "Dijkstra's Algorithm",
    description: "Finds shortest paths from a source vertex to all other vertices in a weighted graph.",
    time_complexity: "O((V + E) log V)",
    space_complexity: "O(V)",
    category: AlgorithmCategory::Graph,
    generate,
    execute: run_dijkstra,
};

pub const PRIM: AlgorithmDescriptor = AlgorithmDescriptor {
    id: "prim",
    name: "Prim's MST",
    description: "Finds minimum spanning tree by growing the tree one edge at a time.",
    time_complexity: "O(E log V)",
    space_complexity: "O(V)",
    category: AlgorithmCategory::Graph,
    generate,
    execute: run_prim,
};

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn visited_of(trace: &Trace) -> Vec<usize> {
        let mut v = trace.last().highlights.visited.clone();
        v.sort_unstable();
        v
    }

    #[test]
    fn bfs_two_node_scenario() {
        let input = GraphInput::from_edges(2, &[(0, 1, 1)]);
        let trace = breadth_first_search(&input);

        assert_eq!(visited_of(&trace), vec![0, 1]);
        let enqueues = trace
            .iter()
            .filter(|s| s.message.contains("Adding node"))
            .count();
        assert_eq!(enqueues, 1);
    }

    #[test]
    fn bfs_and_dfs_visit_each_node_exactly_once_on_connected_graphs() {
        let input = GraphInput::from_edges(
            5,
            &[(0, 1, 2), (1, 2, 3), (2, 3, 1), (3, 4, 4), (0, 4, 9)],
        );
        for search in [breadth_first_search, depth_first_search] {
            let trace = search(&input);
            assert_eq!(visited_of(&trace), vec![0, 1, 2, 3, 4]);

            let visits = trace
                .iter()
                .filter(|s| s.message.starts_with("Visiting node"))
                .count();
            assert_eq!(visits, 5, "each node visited exactly once");
        }
    }

    #[test]
    fn bfs_reports_unreachable_component() {
        let input = GraphInput::from_edges(4, &[(0, 1, 1), (2, 3, 1)]);
        let trace = breadth_first_search(&input);
        assert_eq!(visited_of(&trace), vec![0, 1]);
        assert!(trace.last().message.contains("2 of 4 nodes reachable"));
    }

    #[test]
    fn dfs_records_preorder() {
        // 0 - 1 - 2, plus 0 - 3: neighbors of 0 are [1, 3] in insertion
        // order, so pre-order is 0, 1, 2, 3.
        let input = GraphInput::from_edges(4, &[(0, 1, 1), (1, 2, 1), (0, 3, 1)]);
        let trace = depth_first_search(&input);
        let order: Vec<char> = trace
            .iter()
            .filter(|s| s.message.starts_with("Visiting node"))
            .map(|s| s.message.chars().last().unwrap())
            .collect();
        assert_eq!(order, vec!['A', 'B', 'C', 'D']);
    }

    #[test]
    fn dijkstra_distances_never_increase() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let input = GraphInput::random(&mut rng, 7);
            let trace = dijkstra(&input);

            let mut last_seen = vec![UNREACHABLE; input.len()];
            for step in &trace {
                let StepData::Graph(snapshot) = &step.data else {
                    panic!("foreign snapshot")
                };
                let Some(distances) = &snapshot.distances else {
                    continue;
                };
                for (node, &d) in distances.iter().enumerate() {
                    assert!(d <= last_seen[node], "distance increased for node {node}");
                    last_seen[node] = d;
                }
            }
        }
    }

    #[test]
    fn dijkstra_computes_known_shortest_paths() {
        let input = GraphInput::from_edges(
            4,
            &[(0, 1, 1), (1, 2, 1), (0, 2, 5), (2, 3, 2)],
        );
        let trace = dijkstra(&input);
        let StepData::Graph(snapshot) = &trace.last().data else {
            panic!("foreign snapshot")
        };
        assert_eq!(snapshot.distances.as_deref(), Some(&[0, 1, 2, 4][..]));
    }

    #[test]
    fn prim_builds_minimum_spanning_tree() {
        // Classic square with diagonal: MST weight is 1 + 2 + 3 = 6.
        let input = GraphInput::from_edges(
            4,
            &[(0, 1, 1), (1, 2, 2), (2, 3, 3), (3, 0, 4), (0, 2, 5)],
        );
        let trace = prim_mst(&input);
        let StepData::Graph(snapshot) = &trace.last().data else {
            panic!("foreign snapshot")
        };
        let mst = snapshot.mst_edges.as_ref().expect("mst edges");
        assert_eq!(mst.len(), 3);
        assert_eq!(mst.iter().map(|e| e.weight).sum::<u32>(), 6);
        assert!(trace.last().message.contains("Total weight: 6"));
    }

    #[test]
    fn prim_terminates_on_disconnected_graph() {
        let input = GraphInput::from_edges(4, &[(0, 1, 1), (2, 3, 1)]);
        let trace = prim_mst(&input);
        assert!(trace.last().message.contains("incomplete"));
        assert_eq!(visited_of(&trace), vec![0, 1]);
    }

    #[test]
    fn empty_graph_terminates_with_explanatory_step() {
        let input = GraphInput {
            nodes: Vec::new(),
            edges: Vec::new(),
            directed: false,
        };
        for run in [breadth_first_search, depth_first_search, dijkstra, prim_mst] {
            let trace = run(&input);
            assert_eq!(trace.len(), 1);
            assert!(trace.last().message.contains("empty"));
        }
    }

    #[test]
    fn execute_is_deterministic_for_a_fixed_input() {
        let mut rng = StdRng::seed_from_u64(3);
        let input = GraphInput::random(&mut rng, 6);
        for run in [breadth_first_search, depth_first_search, dijkstra, prim_mst] {
            assert_eq!(run(&input), run(&input));
        }
    }
}
