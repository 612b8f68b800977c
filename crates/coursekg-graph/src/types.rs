//! Core graph types for the course knowledge graph.
//!
//! This module provides the node and edge types and [`GraphData`], the
//! append-only graph store. Courses, professors, and topics are nodes;
//! prerequisites, teaching assignments, and topic coverage are typed,
//! directed edges. The store is a multigraph: different edge types may
//! connect the same ordered pair, but each `(source, target, type)` triple
//! exists at most once.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// Weight given to edges when none is specified.
pub const DEFAULT_EDGE_WEIGHT: f64 = 1.0;

/// Keys the serialized node forms use for structure; never stored as attributes.
pub const RESERVED_ATTRIBUTE_KEYS: [&str; 4] = ["id", "label", "type", "node_type"];

const NAMED_ATTRIBUTE_KEYS: [&str; 4] = ["code", "name", "title", "description"];

/// Returns `true` if `key` may be stored in [`NodeAttributes::extra`].
pub fn is_extra_attribute_key(key: &str) -> bool {
    !RESERVED_ATTRIBUTE_KEYS.contains(&key) && !NAMED_ATTRIBUTE_KEYS.contains(&key)
}

// ============================================================================
// EdgeType enum
// ============================================================================

/// Edge types for the course graph.
///
/// The three known types get first-class variants so the context formatter
/// can match on them; anything else produced by ingestion is carried as
/// `Custom(String)` and is ignored when rendering context.
///
/// Serialized as its plain name (`"prerequisite"`, `"taught_by"`, ...).
///
/// # Example
///
/// ```rust
/// use coursekg_graph::EdgeType;
///
/// assert_eq!(EdgeType::Prerequisite.name(), "prerequisite");
/// assert_eq!(EdgeType::from("cross_listed".to_string()).name(), "cross_listed");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EdgeType {
    /// Source course is a prerequisite of the target course.
    Prerequisite,
    /// Source course is taught by the target professor.
    TaughtBy,
    /// Source course covers the target topic.
    CoversTopic,
    /// Any other relationship recorded by ingestion.
    Custom(String),
}

impl EdgeType {
    /// Returns the edge type name as a string.
    pub fn name(&self) -> &str {
        match self {
            Self::Prerequisite => "prerequisite",
            Self::TaughtBy => "taught_by",
            Self::CoversTopic => "covers_topic",
            Self::Custom(name) => name,
        }
    }

    /// Parse a type name, accepting common aliases.
    ///
    /// Used for hand-written inputs (manual edge files). Persisted graphs
    /// go through the exact `From<String>` conversion instead.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "prerequisite" | "prereq" | "requires" => Self::Prerequisite,
            "taught_by" | "taughtby" | "instructor" => Self::TaughtBy,
            "covers_topic" | "coverstopic" | "covers" | "topic" => Self::CoversTopic,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Map a `Custom` type carrying a known name onto its variant.
    ///
    /// Two edge types are the same relationship exactly when their names
    /// match, so `Custom("prerequisite")` becomes `Prerequisite`.
    pub fn canonical(self) -> Self {
        match self {
            Self::Custom(name) => Self::from(name),
            known => known,
        }
    }
}

impl From<String> for EdgeType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "prerequisite" => Self::Prerequisite,
            "taught_by" => Self::TaughtBy,
            "covers_topic" => Self::CoversTopic,
            _ => Self::Custom(s),
        }
    }
}

impl From<EdgeType> for String {
    fn from(edge_type: EdgeType) -> Self {
        match edge_type {
            EdgeType::Custom(name) => name,
            known => known.name().to_string(),
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// NodeType enum
// ============================================================================

/// Type of a graph node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    /// A catalog course (`course_` prefix).
    Course,
    /// An instructor (`prof_` prefix).
    Professor,
    /// A subject-matter topic (`topic_` prefix).
    Topic,
    /// Type could not be determined (interchange input only).
    #[default]
    Unknown,
}

impl NodeType {
    /// Returns the node type name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Course => "course",
            Self::Professor => "professor",
            Self::Topic => "topic",
            Self::Unknown => "unknown",
        }
    }

    /// Look up a node type by name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "course" => Some(Self::Course),
            "professor" => Some(Self::Professor),
            "topic" => Some(Self::Topic),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    /// Infer a node type from the ID prefix (`course_`, `prof_`, `topic_`).
    pub fn infer_from_id(id: &str) -> Self {
        coursekg_core::infer_node_kind(id)
            .and_then(Self::from_name)
            .unwrap_or(Self::Unknown)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// NodeAttributes struct
// ============================================================================

/// Attributes attached to a node.
///
/// The fields the retriever reads are named and typed; everything else the
/// ingestion side records (schedule, credits, CRN, ...) lives in `extra`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeAttributes {
    /// Course code in `SUBJ 1234` form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Display name (professor name, topic label).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Course title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Long-form catalog description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Remaining attributes.
    ///
    /// Reserved and named keys are omitted when serializing.
    #[serde(flatten, serialize_with = "serialize_extra")]
    pub extra: BTreeMap<String, serde_json::Value>,
}

fn serialize_extra<S>(
    extra: &BTreeMap<String, serde_json::Value>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_map(extra.iter().filter(|(key, _)| is_extra_attribute_key(key)))
}

impl NodeAttributes {
    /// Creates an empty attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the course code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds an extra key-value pair.
    ///
    /// Reserved keys (`id`, `label`, `type`, `node_type`) and the named
    /// field keys are ignored; use the typed setters for named fields.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        let key = key.into();
        if is_extra_attribute_key(&key) {
            self.extra.insert(key, value.into());
        } else {
            log::debug!("Ignoring extra attribute with reserved key {key:?}");
        }
        self
    }

    /// Returns `true` if the named attribute is set.
    pub fn contains(&self, key: &str) -> bool {
        match key {
            "code" => self.code.is_some(),
            "name" => self.name.is_some(),
            "title" => self.title.is_some(),
            "description" => self.description.is_some(),
            other => self.extra.contains_key(other),
        }
    }

    /// Set an attribute only if it is not already present.
    ///
    /// Returns whether the value was stored. Named keys (`code`, `name`,
    /// `title`, `description`) only accept string values; reserved keys
    /// are never stored.
    pub fn insert_if_absent(&mut self, key: &str, value: serde_json::Value) -> bool {
        if self.contains(key) || RESERVED_ATTRIBUTE_KEYS.contains(&key) {
            return false;
        }
        let slot = match key {
            "code" => &mut self.code,
            "name" => &mut self.name,
            "title" => &mut self.title,
            "description" => &mut self.description,
            other => {
                self.extra.insert(other.to_string(), value);
                return true;
            }
        };
        match value {
            serde_json::Value::String(s) => {
                *slot = Some(s);
                true
            }
            _ => false,
        }
    }

    /// Copy every attribute of `other` that is not yet set here.
    ///
    /// Returns the number of attributes added.
    pub fn merge_missing(&mut self, other: &NodeAttributes) -> usize {
        let mut added = 0;
        for (key, value) in other.to_json_map() {
            if self.insert_if_absent(&key, value) {
                added += 1;
            }
        }
        added
    }

    /// All attributes as a flat JSON map (named fields included).
    pub fn to_json_map(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut map = serde_json::Map::new();
        let named = [
            ("code", &self.code),
            ("name", &self.name),
            ("title", &self.title),
            ("description", &self.description),
        ];
        for (key, value) in named {
            if let Some(v) = value {
                map.insert(key.to_string(), serde_json::Value::String(v.clone()));
            }
        }
        for (key, value) in &self.extra {
            if is_extra_attribute_key(key) {
                map.insert(key.clone(), value.clone());
            }
        }
        map
    }
}

// ============================================================================
// Node struct
// ============================================================================

/// A node in the course graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier (e.g., "course_CSCI1010", "prof_Goldfrank, J").
    pub id: String,
    /// Type of this node.
    #[serde(default)]
    pub node_type: NodeType,
    /// Node attributes.
    #[serde(flatten)]
    pub attributes: NodeAttributes,
}

impl Node {
    /// Creates a node with no attributes.
    pub fn new(node_type: NodeType, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type,
            attributes: NodeAttributes::default(),
        }
    }

    /// Sets the attributes.
    pub fn with_attributes(mut self, attributes: NodeAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Course code, falling back to the raw node ID.
    pub fn display_code(&self) -> &str {
        self.attributes.code.as_deref().unwrap_or(&self.id)
    }

    /// Display name, falling back to the raw node ID.
    pub fn display_name(&self) -> &str {
        self.attributes.name.as_deref().unwrap_or(&self.id)
    }
}

// ============================================================================
// Edge struct
// ============================================================================

/// A directed, typed edge between two nodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Source node ID.
    pub source: String,
    /// Target node ID.
    pub target: String,
    /// Type of relationship.
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
    /// Edge weight.
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    DEFAULT_EDGE_WEIGHT
}

impl Edge {
    /// Creates a new edge with the default weight.
    pub fn new(source: impl Into<String>, target: impl Into<String>, edge_type: EdgeType) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            edge_type,
            weight: DEFAULT_EDGE_WEIGHT,
        }
    }

    /// Sets an explicit weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}

// ============================================================================
// GraphData struct
// ============================================================================

/// The graph store.
///
/// Wraps a petgraph `DiGraph` with lookup tables. Construction is
/// append-only: nodes and edges are never removed, so petgraph indices are
/// stable and ascend in insertion order. Every iterator and neighbour list
/// returned here follows that insertion order.
#[derive(Clone, Debug, Default)]
pub struct GraphData {
    /// The underlying directed multigraph.
    pub(crate) graph: DiGraph<Node, Edge>,
    /// Lookup table: node ID → petgraph NodeIndex.
    pub(crate) node_indices: HashMap<String, NodeIndex>,
    /// Attributes as given at insertion time, keyed by node ID.
    node_features: HashMap<String, NodeAttributes>,
    /// Types recorded per ordered pair, in insertion order.
    edge_types: HashMap<(String, String), Vec<EdgeType>>,
}

impl GraphData {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of nodes.
    pub fn number_of_nodes(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges.
    pub fn number_of_edges(&self) -> usize {
        self.graph.edge_count()
    }

    /// Checks if a node exists.
    pub fn has_node(&self, id: &str) -> bool {
        self.node_indices.contains_key(id)
    }

    /// Gets a node by ID.
    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.get_index(id).map(|idx| &self.graph[idx])
    }

    /// Gets the petgraph NodeIndex for a node ID.
    pub fn get_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_indices.get(id).copied()
    }

    /// Attributes recorded when the node was inserted.
    pub fn node_features(&self, id: &str) -> Option<&NodeAttributes> {
        self.node_features.get(id)
    }

    /// Returns an iterator over all nodes in insertion order.
    pub fn iter_nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// Returns an iterator over all edges in insertion order.
    pub fn iter_edges(&self) -> impl Iterator<Item = &Edge> {
        self.graph.edge_indices().map(move |idx| &self.graph[idx])
    }

    /// Nodes reachable over one outgoing edge, in insertion order.
    ///
    /// Unknown IDs yield an empty list.
    pub fn successors(&self, id: &str) -> Vec<&str> {
        self.neighbors(id, Direction::Outgoing)
    }

    /// Nodes with an edge into `id`, in insertion order.
    ///
    /// Unknown IDs yield an empty list.
    pub fn predecessors(&self, id: &str) -> Vec<&str> {
        self.neighbors(id, Direction::Incoming)
    }

    pub(crate) fn neighbor_indices(&self, idx: NodeIndex, direction: Direction) -> BTreeSet<NodeIndex> {
        self.graph.neighbors_directed(idx, direction).collect()
    }

    fn neighbors(&self, id: &str, direction: Direction) -> Vec<&str> {
        let Some(idx) = self.get_index(id) else {
            return Vec::new();
        };
        self.neighbor_indices(idx, direction)
            .into_iter()
            .map(|n| self.graph[n].id.as_str())
            .collect()
    }

    /// Checks whether an edge of the given type exists.
    pub fn has_edge(&self, source: &str, target: &str, edge_type: &EdgeType) -> bool {
        let edge_type = edge_type.clone().canonical();
        self.edge_types_between(source, target).contains(&edge_type)
    }

    /// The most recently added edge type between an ordered pair.
    pub fn edge_type(&self, source: &str, target: &str) -> Option<&EdgeType> {
        self.edge_types_between(source, target).last()
    }

    /// Every edge type between an ordered pair, in insertion order.
    pub fn edge_types_between(&self, source: &str, target: &str) -> &[EdgeType] {
        self.edge_types
            .get(&(source.to_string(), target.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    // ========================================================================
    // Construction API
    // ========================================================================

    /// Insert a node if `id` is not yet present.
    ///
    /// Returns whether the node was inserted. Re-adding an existing ID is a
    /// no-op that returns `false`; the existing attributes are untouched.
    pub fn add_node(&mut self, node_type: NodeType, id: &str, attributes: NodeAttributes) -> bool {
        if self.node_indices.contains_key(id) {
            return false;
        }
        self.node_features.insert(id.to_string(), attributes.clone());
        let node = Node::new(node_type, id).with_attributes(attributes);
        let idx = self.graph.add_node(node);
        self.node_indices.insert(id.to_string(), idx);
        true
    }

    /// Insert a directed edge between two existing nodes.
    ///
    /// Returns `false` without modifying the graph if either endpoint is
    /// missing or an edge of the same type already joins the pair. A
    /// `Custom` type named like a known type is stored as that type.
    pub fn add_edge(&mut self, source: &str, target: &str, edge_type: EdgeType, weight: f64) -> bool {
        let edge_type = edge_type.canonical();
        let (Some(from_idx), Some(to_idx)) = (self.get_index(source), self.get_index(target)) else {
            log::debug!(
                "Skipping edge {source} -[{}]-> {target}: endpoint missing",
                edge_type.name()
            );
            return false;
        };

        let types = self
            .edge_types
            .entry((source.to_string(), target.to_string()))
            .or_default();
        if types.contains(&edge_type) {
            return false;
        }
        types.push(edge_type.clone());

        let edge = Edge::new(source, target, edge_type).with_weight(weight);
        self.graph.add_edge(from_idx, to_idx, edge);
        true
    }

    /// Insert a directed edge with the default weight.
    pub fn add_edge_default(&mut self, source: &str, target: &str, edge_type: EdgeType) -> bool {
        self.add_edge(source, target, edge_type, DEFAULT_EDGE_WEIGHT)
    }

    /// Add an attribute to an existing node if the key is not yet set.
    ///
    /// Returns whether the attribute was stored.
    pub fn add_attribute(&mut self, id: &str, key: &str, value: impl Into<serde_json::Value>) -> bool {
        let Some(idx) = self.get_index(id) else {
            return false;
        };
        let value = value.into();
        let added = self.graph[idx].attributes.insert_if_absent(key, value.clone());
        if added {
            if let Some(features) = self.node_features.get_mut(id) {
                features.insert_if_absent(key, value);
            }
        }
        added
    }

    /// Copy attributes missing on an existing node from `attributes`.
    ///
    /// Returns the number of attributes added.
    pub fn merge_attributes(&mut self, id: &str, attributes: &NodeAttributes) -> usize {
        let Some(idx) = self.get_index(id) else {
            return 0;
        };
        let added = self.graph[idx].attributes.merge_missing(attributes);
        if added > 0 {
            if let Some(features) = self.node_features.get_mut(id) {
                features.merge_missing(attributes);
            }
        }
        added
    }
}

// ============================================================================
// Tests
// ============================================================================
