//! Human-readable lookup tables maintained alongside the graph store.
//!
//! The index maps course codes, professor display names, and topic labels
//! to node IDs. Ingestion populates it while it builds the graph; the
//! retriever only reads it. Registration is checked against the store so
//! every entry resolves to a node that actually exists.

use crate::GraphData;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lookup tables from display keys to node IDs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeIndex {
    /// Course code (`CSCI 1010`) → node ID.
    #[serde(default)]
    pub course_nodes: BTreeMap<String, String>,
    /// Professor display name → node ID.
    #[serde(default)]
    pub professor_nodes: BTreeMap<String, String>,
    /// Topic label → node ID.
    #[serde(default)]
    pub topic_nodes: BTreeMap<String, String>,
}

/// An index entry whose node is missing from the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DanglingEntry {
    /// Which table the entry lives in ("course", "professor", "topic").
    pub table: &'static str,
    /// The lookup key.
    pub key: String,
    /// The node ID it points at.
    pub node_id: String,
}

impl KnowledgeIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a course code for an existing node.
    ///
    /// Returns `false` (and records nothing) if the node is not in `graph`.
    pub fn register_course(&mut self, graph: &GraphData, code: &str, node_id: &str) -> bool {
        register(&mut self.course_nodes, graph, code, node_id)
    }

    /// Register a professor display name for an existing node.
    pub fn register_professor(&mut self, graph: &GraphData, name: &str, node_id: &str) -> bool {
        register(&mut self.professor_nodes, graph, name, node_id)
    }

    /// Register a topic label for an existing node.
    pub fn register_topic(&mut self, graph: &GraphData, label: &str, node_id: &str) -> bool {
        register(&mut self.topic_nodes, graph, label, node_id)
    }

    /// Exact course-code lookup.
    pub fn course(&self, code: &str) -> Option<&str> {
        self.course_nodes.get(code).map(String::as_str)
    }

    /// Exact professor-name lookup.
    pub fn professor(&self, name: &str) -> Option<&str> {
        self.professor_nodes.get(name).map(String::as_str)
    }

    /// Exact topic-label lookup.
    pub fn topic(&self, label: &str) -> Option<&str> {
        self.topic_nodes.get(label).map(String::as_str)
    }

    /// Total number of entries across all three tables.
    pub fn len(&self) -> usize {
        self.course_nodes.len() + self.professor_nodes.len() + self.topic_nodes.len()
    }

    /// Returns `true` if no entries are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries that point at nodes missing from `graph`.
    pub fn validate(&self, graph: &GraphData) -> Vec<DanglingEntry> {
        let tables = [
            ("course", &self.course_nodes),
            ("professor", &self.professor_nodes),
            ("topic", &self.topic_nodes),
        ];
        tables
            .into_iter()
            .flat_map(|(table, map)| {
                map.iter()
                    .filter(|(_, node_id)| !graph.has_node(node_id))
                    .map(move |(key, node_id)| DanglingEntry {
                        table,
                        key: key.clone(),
                        node_id: node_id.clone(),
                    })
            })
            .collect()
    }
}

fn register(
    table: &mut BTreeMap<String, String>,
    graph: &GraphData,
    key: &str,
    node_id: &str,
) -> bool {
    if !graph.has_node(node_id) {
        log::debug!("Refusing index entry {key:?} -> {node_id}: node not in graph");
        return false;
    }
    table.insert(key.to_string(), node_id.to_string());
    true
}
