//! Versioned JSON snapshots of a built course graph.
//!
//! A snapshot holds the full node and edge lists plus the lookup index.
//! Loading is all-or-nothing: if any part fails validation the caller gets
//! an error and no graph.
//!
//! # Usage
//!
//! ```rust,ignore
//! use coursekg_graph::persistence::{load_snapshot, save_snapshot};
//!
//! save_snapshot(&kg, "data/course_graph.json")?;
//! let kg = load_snapshot("data/course_graph.json")?;
//! ```

use crate::{Edge, GraphData, KnowledgeGraph, KnowledgeIndex, Node};
use chrono::Utc;
use coursekg_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Snapshot format version written by this crate.
pub const SCHEMA_VERSION: u32 = 1;

/// On-disk snapshot of a `KnowledgeGraph`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// Format version; loading rejects anything else.
    pub schema_version: u32,

    /// Creation timestamp (RFC 3339).
    pub exported_at: String,

    /// Nodes in insertion order.
    pub nodes: Vec<Node>,

    /// Edges in insertion order.
    pub edges: Vec<Edge>,

    /// Lookup tables (`course_nodes`, `professor_nodes`, `topic_nodes`).
    #[serde(flatten)]
    pub index: KnowledgeIndex,
}

impl GraphSnapshot {
    /// Capture a graph and its index.
    pub fn from_graph(kg: &KnowledgeGraph) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            exported_at: Utc::now().to_rfc3339(),
            nodes: kg.graph.iter_nodes().cloned().collect(),
            edges: kg.graph.iter_edges().cloned().collect(),
            index: kg.index.clone(),
        }
    }

    /// Rebuild the graph, validating every node, edge, and index entry.
    pub fn into_knowledge_graph(self) -> Result<KnowledgeGraph> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(Error::corrupt_graph(format!(
                "unsupported schema version {} (expected {SCHEMA_VERSION})",
                self.schema_version
            )));
        }

        let mut graph = GraphData::new();
        for node in self.nodes {
            if !graph.add_node(node.node_type, &node.id, node.attributes) {
                return Err(Error::corrupt_graph(format!("duplicate node {}", node.id)));
            }
        }

        for edge in self.edges {
            if !graph.has_node(&edge.source) || !graph.has_node(&edge.target) {
                return Err(Error::corrupt_graph(format!(
                    "edge {} -[{}]-> {} references a missing node",
                    edge.source, edge.edge_type, edge.target
                )));
            }
            if !graph.add_edge(&edge.source, &edge.target, edge.edge_type.clone(), edge.weight) {
                log::warn!(
                    "Ignoring repeated edge {} -[{}]-> {} in snapshot",
                    edge.source,
                    edge.edge_type,
                    edge.target
                );
            }
        }

        if let Some(entry) = self.index.validate(&graph).first() {
            return Err(Error::corrupt_graph(format!(
                "{} index entry {:?} points at missing node {}",
                entry.table, entry.key, entry.node_id
            )));
        }

        Ok(KnowledgeGraph::new(graph, self.index))
    }
}

/// Serialize a graph to snapshot JSON.
pub fn to_snapshot_string(kg: &KnowledgeGraph) -> Result<String> {
    Ok(serde_json::to_string_pretty(&GraphSnapshot::from_graph(kg))?)
}

/// Parse and validate snapshot JSON.
pub fn from_snapshot_str(json: &str) -> Result<KnowledgeGraph> {
    let snapshot: GraphSnapshot = serde_json::from_str(json)
        .map_err(|e| Error::corrupt_graph(format!("invalid snapshot JSON: {e}")))?;
    snapshot.into_knowledge_graph()
}

/// Write a snapshot file, creating parent directories as needed.
pub fn save_snapshot(kg: &KnowledgeGraph, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
    }
    let json = to_snapshot_string(kg)?;
    std::fs::write(path, json).map_err(|e| Error::io_with_path(e, path))?;
    log::info!(
        "Saved graph snapshot ({} nodes, {} edges) to {}",
        kg.graph.number_of_nodes(),
        kg.graph.number_of_edges(),
        path.display()
    );
    Ok(())
}

/// Read and validate a snapshot file.
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<KnowledgeGraph> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
    let kg = from_snapshot_str(&content)?;
    log::info!(
        "Loaded graph snapshot ({} nodes, {} edges) from {}",
        kg.graph.number_of_nodes(),
        kg.graph.number_of_edges(),
        path.display()
    );
    Ok(kg)
}

// ============================================================================
// Tests
// ============================================================================
