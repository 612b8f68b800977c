//! Node/link JSON interchange format for graph viewers.
//!
//! ```json
//! {
//!   "nodes": [{"id": "course_CSCI1010", "label": "CSCI1010", "type": "course", "code": "CSCI 1010"}],
//!   "links": [{"source": "course_CSCI1010", "target": "course_CSCI1012", "type": "prerequisite", "label": "prerequisite", "weight": 1.0}],
//!   "_metadata": {"note": "...", "total_nodes": 1, "total_links": 1}
//! }
//! ```
//!
//! Conversion back into a store is lenient: nodes without a usable type
//! get one from their ID prefix, and links with a missing endpoint are
//! skipped.

use crate::{DEFAULT_EDGE_WEIGHT, EdgeType, GraphData, KnowledgeGraph, KnowledgeIndex, NodeAttributes, NodeType};
use coursekg_core::{Error, Result, display_label};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

const EXPORT_NOTE: &str = "Exported from the course knowledge graph";

/// A node in interchange form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterchangeNode {
    /// Node ID, type prefix included.
    pub id: String,
    /// ID without its type prefix.
    #[serde(default)]
    pub label: String,
    /// Node type name (`course`, `professor`, `topic`).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    /// Every other attribute. Reserved keys are never written here.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// An edge in interchange form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterchangeLink {
    /// Source node ID.
    pub source: String,
    /// Target node ID.
    pub target: String,
    /// Edge type name.
    #[serde(rename = "type")]
    pub edge_type: String,
    /// Display label; written as the edge type name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Edge weight; missing means the default weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

/// Summary block written under `_metadata`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterchangeMetadata {
    /// Free-text provenance note.
    pub note: String,
    /// Number of entries in `nodes`.
    pub total_nodes: usize,
    /// Number of entries in `links`.
    pub total_links: usize,
}

/// A whole graph in interchange form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterchangeGraph {
    /// Nodes in insertion order.
    pub nodes: Vec<InterchangeNode>,
    /// Links in insertion order.
    #[serde(default)]
    pub links: Vec<InterchangeLink>,
    /// Summary counts; optional on input.
    #[serde(rename = "_metadata", default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<InterchangeMetadata>,
}

// ============================================================================
// Conversion
// ============================================================================

/// Convert a store to interchange form, preserving insertion order.
pub fn to_interchange(graph: &GraphData) -> InterchangeGraph {
    let nodes: Vec<InterchangeNode> = graph
        .iter_nodes()
        .map(|node| InterchangeNode {
            id: node.id.clone(),
            label: display_label(&node.id).to_string(),
            node_type: Some(node.node_type.name().to_string()),
            attributes: node.attributes.to_json_map(),
        })
        .collect();

    let links: Vec<InterchangeLink> = graph
        .iter_edges()
        .map(|edge| InterchangeLink {
            source: edge.source.clone(),
            target: edge.target.clone(),
            edge_type: edge.edge_type.name().to_string(),
            label: Some(edge.edge_type.name().to_string()),
            weight: Some(edge.weight),
        })
        .collect();

    let metadata = InterchangeMetadata {
        note: EXPORT_NOTE.to_string(),
        total_nodes: nodes.len(),
        total_links: links.len(),
    };

    InterchangeGraph {
        nodes,
        links,
        metadata: Some(metadata),
    }
}

/// Build a store from interchange form.
///
/// Node type comes from `type`, then a `node_type` attribute, then the ID
/// prefix. Repeated node IDs keep their first occurrence; links naming a
/// missing node or repeating an existing typed edge are skipped.
pub fn from_interchange(data: &InterchangeGraph) -> GraphData {
    let mut graph = GraphData::new();

    for node in &data.nodes {
        let node_type = resolve_node_type(node);
        let mut attributes = NodeAttributes::new();
        for (key, value) in &node.attributes {
            attributes.insert_if_absent(key, value.clone());
        }
        if !graph.add_node(node_type, &node.id, attributes) {
            log::warn!("Ignoring repeated interchange node {}", node.id);
        }
    }

    let mut skipped = 0usize;
    for link in &data.links {
        let edge_type = EdgeType::from(link.edge_type.clone());
        let weight = link.weight.unwrap_or(DEFAULT_EDGE_WEIGHT);
        if !graph.add_edge(&link.source, &link.target, edge_type, weight) {
            skipped += 1;
        }
    }
    if skipped > 0 {
        log::warn!("Skipped {skipped} interchange link(s) with missing endpoints or duplicate types");
    }

    graph
}

/// Build a store and derive its lookup index from node attributes.
///
/// Courses are keyed by `code`, professors and topics by `name`, each
/// falling back to the ID label.
pub fn knowledge_graph_from_interchange(data: &InterchangeGraph) -> KnowledgeGraph {
    let graph = from_interchange(data);
    let mut index = KnowledgeIndex::new();

    for node in graph.iter_nodes() {
        let label = display_label(&node.id);
        match node.node_type {
            NodeType::Course => {
                let key = node.attributes.code.as_deref().unwrap_or(label);
                index.register_course(&graph, key, &node.id);
            }
            NodeType::Professor => {
                let key = node.attributes.name.as_deref().unwrap_or(label);
                index.register_professor(&graph, key, &node.id);
            }
            NodeType::Topic => {
                let key = node.attributes.name.as_deref().unwrap_or(label);
                index.register_topic(&graph, key, &node.id);
            }
            NodeType::Unknown => {}
        }
    }

    KnowledgeGraph::new(graph, index)
}

fn resolve_node_type(node: &InterchangeNode) -> NodeType {
    let explicit = node
        .node_type
        .as_deref()
        .or_else(|| node.attributes.get("node_type").and_then(Value::as_str))
        .and_then(NodeType::from_name);
    match explicit {
        Some(NodeType::Unknown) | None => NodeType::infer_from_id(&node.id),
        Some(known) => known,
    }
}

// ============================================================================
// File helpers
// ============================================================================

/// Serialize a store as interchange JSON.
pub fn to_interchange_string(graph: &GraphData) -> Result<String> {
    Ok(serde_json::to_string_pretty(&to_interchange(graph))?)
}

/// Parse interchange JSON.
pub fn parse_interchange(json: &str) -> Result<InterchangeGraph> {
    serde_json::from_str(json).map_err(|e| Error::parse(format!("Invalid interchange JSON: {e}")))
}

/// Write a store as an interchange file.
pub fn write_interchange(graph: &GraphData, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json = to_interchange_string(graph)?;
    std::fs::write(path, json).map_err(|e| Error::io_with_path(e, path))?;
    log::info!(
        "Exported {} nodes and {} links to {}",
        graph.number_of_nodes(),
        graph.number_of_edges(),
        path.display()
    );
    Ok(())
}

/// Read an interchange file into a store.
pub fn read_interchange(path: impl AsRef<Path>) -> Result<GraphData> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
    Ok(from_interchange(&parse_interchange(&content)?))
}

// ============================================================================
// Tests
// ============================================================================
