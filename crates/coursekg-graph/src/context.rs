//! Rendering subgraphs and paths as compact text for a language model.
//!
//! The output is line oriented: one labeled line per relationship kind,
//! entries separated by `; `. Only prerequisite, teaching, and topic
//! edges are rendered; other edge types are dropped.

use crate::{EdgeType, GraphData, Node, Subgraph};

/// Rendered when the subgraph has no nodes.
pub const EMPTY_CONTEXT: &str = "No relevant graph information found.";

/// Rendered when the subgraph has nodes but no renderable edges.
pub const NO_RELATIONS_CONTEXT: &str = "Graph context available.";

/// Entries rendered per edge type unless a caller asks otherwise.
pub const DEFAULT_MAX_EDGES_PER_TYPE: usize = 10;

const ENTRY_SEPARATOR: &str = "; ";

/// Format a subgraph with the default per-type cap.
///
/// # Example
///
/// ```rust
/// use coursekg_graph::{EdgeType, GraphData, NodeAttributes, NodeType, format_subgraph_context};
///
/// let mut graph = GraphData::new();
/// graph.add_node(NodeType::Course, "course_CSCI1010", NodeAttributes::new().with_code("CSCI 1010"));
/// graph.add_node(NodeType::Course, "course_CSCI1012", NodeAttributes::new().with_code("CSCI 1012"));
/// graph.add_edge_default("course_CSCI1010", "course_CSCI1012", EdgeType::Prerequisite);
///
/// let sub = graph.get_subgraph(["course_CSCI1010"], 1);
/// assert_eq!(
///     format_subgraph_context(&sub),
///     "Prerequisites: CSCI 1010 is a prerequisite for CSCI 1012"
/// );
/// ```
pub fn format_subgraph_context(subgraph: &Subgraph) -> String {
    format_subgraph_context_with_limit(subgraph, DEFAULT_MAX_EDGES_PER_TYPE)
}

/// Format a subgraph, rendering at most `limit` edges of each type.
///
/// Edges are taken in subgraph order, so the first `limit` edges of a type
/// are the ones that appear.
pub fn format_subgraph_context_with_limit(subgraph: &Subgraph, limit: usize) -> String {
    if subgraph.is_empty() {
        return EMPTY_CONTEXT.to_string();
    }

    let mut prerequisites: Vec<String> = Vec::new();
    let mut instructors: Vec<String> = Vec::new();
    let mut topics: Vec<String> = Vec::new();

    for edge in subgraph.edges() {
        let source = subgraph.get_node(&edge.source);
        let target = subgraph.get_node(&edge.target);
        let (bucket, entry) = match edge.edge_type {
            EdgeType::Prerequisite => (
                &mut prerequisites,
                format!(
                    "{} is a prerequisite for {}",
                    code_of(source, &edge.source),
                    code_of(target, &edge.target)
                ),
            ),
            EdgeType::TaughtBy => (
                &mut instructors,
                format!(
                    "{} is taught by {}",
                    code_of(source, &edge.source),
                    name_of(target, &edge.target)
                ),
            ),
            EdgeType::CoversTopic => (
                &mut topics,
                format!(
                    "{} covers {}",
                    code_of(source, &edge.source),
                    name_of(target, &edge.target)
                ),
            ),
            EdgeType::Custom(_) => continue,
        };
        if bucket.len() < limit {
            bucket.push(entry);
        }
    }

    let lines: Vec<String> = [
        ("Prerequisites: ", prerequisites),
        ("Instructors: ", instructors),
        ("Topics: ", topics),
    ]
    .into_iter()
    .filter(|(_, entries)| !entries.is_empty())
    .map(|(label, entries)| format!("{label}{}", entries.join(ENTRY_SEPARATOR)))
    .collect();

    if lines.is_empty() {
        NO_RELATIONS_CONTEXT.to_string()
    } else {
        lines.join("\n")
    }
}

/// Render enumerated paths as `Reasoning Path: A -> B -> C` lines.
///
/// Node IDs are shown by course code, else by name, else as the raw ID.
/// At most `limit` paths are rendered; no paths renders the empty string.
pub fn format_path_context(graph: &GraphData, paths: &[Vec<String>], limit: usize) -> String {
    paths
        .iter()
        .take(limit)
        .map(|path| {
            let steps: Vec<&str> = path
                .iter()
                .map(|id| match graph.get_node(id) {
                    Some(node) => label_of(node),
                    None => id.as_str(),
                })
                .collect();
            format!("Reasoning Path: {}", steps.join(" -> "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn code_of<'a>(node: Option<&'a Node>, id: &'a str) -> &'a str {
    node.map(Node::display_code).unwrap_or(id)
}

fn name_of<'a>(node: Option<&'a Node>, id: &'a str) -> &'a str {
    node.map(Node::display_name).unwrap_or(id)
}

fn label_of(node: &Node) -> &str {
    node.attributes
        .code
        .as_deref()
        .or(node.attributes.name.as_deref())
        .unwrap_or(&node.id)
}
