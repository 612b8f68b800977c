//! Graph algorithms used by the retriever.
//!
//! Provides:
//! - Multi-hop neighbourhood expansion from a seed set, returning the
//!   induced subgraph (edges are followed in both directions)
//! - Lazy enumeration of simple directed paths between two nodes
//!
//! Both are pure reads over `GraphData` and bounded by their hop/length
//! arguments.

use crate::{Edge, GraphData, Node};
use petgraph::Direction;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{BTreeSet, HashMap};

// ============================================================================
// Subgraph
// ============================================================================

/// An induced subgraph copied out of a `GraphData`.
///
/// Nodes and edges keep the insertion order of the source graph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Subgraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    positions: HashMap<String, usize>,
}

impl Subgraph {
    /// Creates an empty subgraph.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Assemble a subgraph from nodes and edges.
    ///
    /// Edges whose endpoints are not both among `nodes` are dropped, so
    /// the result is always induced on its node set. Repeated node IDs keep
    /// their first occurrence.
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let mut kept: Vec<Node> = Vec::with_capacity(nodes.len());
        let mut positions = HashMap::with_capacity(nodes.len());
        for node in nodes {
            if !positions.contains_key(&node.id) {
                positions.insert(node.id.clone(), kept.len());
                kept.push(node);
            }
        }
        let edges = edges
            .into_iter()
            .filter(|e| positions.contains_key(&e.source) && positions.contains_key(&e.target))
            .collect();
        Self {
            nodes: kept,
            edges,
            positions,
        }
    }

    /// Returns the number of nodes.
    pub fn number_of_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of edges.
    pub fn number_of_edges(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if the subgraph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Checks if a node is part of the subgraph.
    pub fn contains_node(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Gets a node by ID.
    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.positions.get(id).map(|&pos| &self.nodes[pos])
    }

    /// All nodes in source-graph insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges in source-graph insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns an iterator over node IDs.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }
}

// ============================================================================
// Neighbourhood expansion
// ============================================================================

/// Expand `start_nodes` by `max_hops` rounds and return the induced subgraph.
///
/// Each round adds every successor and predecessor of every node already
/// collected. The returned subgraph contains all collected nodes and every
/// edge of `graph` whose endpoints were both collected, whichever direction
/// was traversed to reach them.
///
/// An empty seed set gives an empty subgraph, and `max_hops == 0` gives
/// the subgraph induced on the seeds alone. Seeds that are not in the
/// graph are ignored.
///
/// # Example
///
/// ```rust
/// use coursekg_graph::{EdgeType, GraphData, NodeAttributes, NodeType, get_subgraph};
///
/// let mut graph = GraphData::new();
/// graph.add_node(NodeType::Course, "course_CSCI1010", NodeAttributes::new());
/// graph.add_node(NodeType::Course, "course_CSCI1012", NodeAttributes::new());
/// graph.add_edge_default("course_CSCI1010", "course_CSCI1012", EdgeType::Prerequisite);
///
/// let zero = get_subgraph(&graph, ["course_CSCI1010"], 0);
/// assert_eq!((zero.number_of_nodes(), zero.number_of_edges()), (1, 0));
///
/// let one = get_subgraph(&graph, ["course_CSCI1010"], 1);
/// assert_eq!((one.number_of_nodes(), one.number_of_edges()), (2, 1));
/// ```
pub fn get_subgraph<I, S>(graph: &GraphData, start_nodes: I, max_hops: usize) -> Subgraph
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut members: BTreeSet<NodeIndex> = BTreeSet::new();
    for id in start_nodes {
        match graph.get_index(id.as_ref()) {
            Some(idx) => {
                members.insert(idx);
            }
            None => log::debug!("Ignoring unknown seed node {}", id.as_ref()),
        }
    }

    if members.is_empty() {
        return Subgraph::empty();
    }

    for hop in 0..max_hops {
        let frontier: BTreeSet<NodeIndex> = members
            .iter()
            .flat_map(|&idx| graph.graph.neighbors_undirected(idx))
            .filter(|n| !members.contains(n))
            .collect();

        if frontier.is_empty() {
            log::debug!("Expansion reached a fixed point after {hop} of {max_hops} hops");
            break;
        }
        members.extend(frontier);
    }

    induced_subgraph(graph, &members)
}

/// Copy out the subgraph induced on `members`.
fn induced_subgraph(graph: &GraphData, members: &BTreeSet<NodeIndex>) -> Subgraph {
    let nodes: Vec<Node> = members.iter().map(|&idx| graph.graph[idx].clone()).collect();

    let mut edge_ids: Vec<EdgeIndex> = members
        .iter()
        .flat_map(|&idx| graph.graph.edges_directed(idx, Direction::Outgoing))
        .filter(|edge_ref| members.contains(&edge_ref.target()))
        .map(|edge_ref| edge_ref.id())
        .collect();
    edge_ids.sort();

    let edges = edge_ids
        .into_iter()
        .map(|idx| graph.graph[idx].clone())
        .collect();

    Subgraph::from_parts(nodes, edges)
}

// ============================================================================
// Simple path enumeration
// ============================================================================

/// Lazy iterator over simple directed paths between two nodes.
///
/// Created by [`find_paths`]. Each item is the ordered list of node IDs from
/// source to target.
pub struct SimplePaths<'a> {
    graph: &'a GraphData,
    target: NodeIndex,
    max_length: usize,
    path: Vec<NodeIndex>,
    stack: Vec<std::collections::btree_set::IntoIter<NodeIndex>>,
}

impl<'a> SimplePaths<'a> {
    fn exhausted(graph: &'a GraphData) -> Self {
        Self {
            graph,
            target: NodeIndex::end(),
            max_length: 0,
            path: Vec::new(),
            stack: Vec::new(),
        }
    }

    fn path_ids(&self, last: NodeIndex) -> Vec<String> {
        self.path
            .iter()
            .chain(std::iter::once(&last))
            .map(|&idx| self.graph.graph[idx].id.clone())
            .collect()
    }
}

impl Iterator for SimplePaths<'_> {
    type Item = Vec<String>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(children) = self.stack.last_mut() {
            match children.next() {
                Some(child) => {
                    // Taking `child` makes the path `path.len()` edges long.
                    let length = self.path.len();
                    if child == self.target {
                        return Some(self.path_ids(child));
                    }
                    if length < self.max_length && !self.path.contains(&child) {
                        self.path.push(child);
                        self.stack
                            .push(self.graph.neighbor_indices(child, Direction::Outgoing).into_iter());
                    }
                }
                None => {
                    self.stack.pop();
                    self.path.pop();
                }
            }
        }
        None
    }
}

/// Enumerate simple directed paths from `source` to `target`.
///
/// Paths have at most `max_length` edges and never repeat a node. The
/// search is depth-first and branches in node insertion order, so the
/// sequence is repeatable for a given graph.
///
/// Never fails: an unknown endpoint, `source == target`, `max_length == 0`,
/// or a disconnected pair all give an empty iterator.
pub fn find_paths<'a>(
    graph: &'a GraphData,
    source: &str,
    target: &str,
    max_length: usize,
) -> SimplePaths<'a> {
    let (Some(source_idx), Some(target_idx)) = (graph.get_index(source), graph.get_index(target))
    else {
        return SimplePaths::exhausted(graph);
    };
    if source_idx == target_idx || max_length == 0 {
        return SimplePaths::exhausted(graph);
    }

    SimplePaths {
        graph,
        target: target_idx,
        max_length,
        path: vec![source_idx],
        stack: vec![graph.neighbor_indices(source_idx, Direction::Outgoing).into_iter()],
    }
}

// ============================================================================
// Convenience methods on GraphData
// ============================================================================

impl GraphData {
    /// See [`get_subgraph`].
    pub fn get_subgraph<I, S>(&self, start_nodes: I, max_hops: usize) -> Subgraph
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        get_subgraph(self, start_nodes, max_hops)
    }

    /// See [`find_paths`].
    pub fn find_paths(&self, source: &str, target: &str, max_length: usize) -> SimplePaths<'_> {
        find_paths(self, source, target, max_length)
    }
}

// ============================================================================
// Tests
// ============================================================================
