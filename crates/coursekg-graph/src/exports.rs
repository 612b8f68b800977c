//! Flat JSON views of the graph for front-end consumers.
//!
//! Each view is a JSON object mapping a key to a list, plus a `_metadata`
//! entry. The metadata count is the number of keys minus one, the
//! convention existing consumers expect.

use crate::interchange::write_interchange;
use crate::{EdgeType, GraphData};
use coursekg_core::{Error, Result};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::path::Path;

/// File names written by [`write_exports`].
pub const KNOWLEDGE_GRAPH_FILE: &str = "knowledge_graph.json";
pub const PREREQUISITES_FILE: &str = "prerequisites_map.json";
pub const TOPICS_FILE: &str = "topics_map.json";
pub const INSTRUCTORS_FILE: &str = "instructors_map.json";

/// Target course ID → IDs of its prerequisite courses.
pub fn prerequisites_map(graph: &GraphData) -> Value {
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for edge in graph.iter_edges().filter(|e| e.edge_type == EdgeType::Prerequisite) {
        groups
            .entry(edge.target.clone())
            .or_default()
            .push(edge.source.clone());
    }
    with_metadata(
        groups,
        "Prerequisites extracted from the course knowledge graph",
        "total_courses",
    )
}

/// Course ID → labels of the topics it covers.
pub fn topics_map(graph: &GraphData) -> Value {
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for edge in graph.iter_edges().filter(|e| e.edge_type == EdgeType::CoversTopic) {
        groups
            .entry(edge.source.clone())
            .or_default()
            .push(name_or_id(graph, &edge.target));
    }
    with_metadata(
        groups,
        "Topics extracted from the course knowledge graph",
        "total_courses",
    )
}

/// Professor display name → IDs of the courses they teach.
pub fn instructors_map(graph: &GraphData) -> Value {
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for edge in graph.iter_edges().filter(|e| e.edge_type == EdgeType::TaughtBy) {
        groups
            .entry(name_or_id(graph, &edge.target))
            .or_default()
            .push(edge.source.clone());
    }
    with_metadata(
        groups,
        "Instructor mappings from the course knowledge graph",
        "total_professors",
    )
}

/// Write the interchange graph and the three views into `dir`.
pub fn write_exports(graph: &GraphData, dir: impl AsRef<Path>) -> Result<()> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir).map_err(|e| Error::io_with_path(e, dir))?;

    write_interchange(graph, dir.join(KNOWLEDGE_GRAPH_FILE))?;
    let views = [
        (PREREQUISITES_FILE, prerequisites_map(graph)),
        (TOPICS_FILE, topics_map(graph)),
        (INSTRUCTORS_FILE, instructors_map(graph)),
    ];
    for (file, view) in views {
        let path = dir.join(file);
        let json = serde_json::to_string_pretty(&view)?;
        std::fs::write(&path, json).map_err(|e| Error::io_with_path(e, &path))?;
    }

    log::info!("Wrote graph exports to {}", dir.display());
    Ok(())
}

fn name_or_id(graph: &GraphData, id: &str) -> String {
    graph
        .get_node(id)
        .and_then(|n| n.attributes.name.clone())
        .unwrap_or_else(|| id.to_string())
}

fn with_metadata(groups: BTreeMap<String, Vec<String>>, note: &str, count_key: &str) -> Value {
    let count = groups.len() as i64 - 1;
    let mut map: Map<String, Value> = groups
        .into_iter()
        .map(|(key, values)| (key, json!(values)))
        .collect();
    let mut metadata = Map::new();
    metadata.insert("note".to_string(), json!(note));
    metadata.insert(count_key.to_string(), json!(count));
    map.insert("_metadata".to_string(), Value::Object(metadata));
    Value::Object(map)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_knowledge_graph;
    use crate::{NodeAttributes, NodeType};

    #[test]
    fn test_prerequisites_map() {
        let kg = sample_knowledge_graph();
        let view = prerequisites_map(&kg.graph);
        assert_eq!(view["course_CSCI1012"], json!(["course_CSCI1010"]));
        assert_eq!(view["course_CSCI6364"], json!(["course_CSCI1012"]));
        assert_eq!(view["_metadata"]["total_courses"], 1);
        assert!(view["_metadata"]["note"].is_string());
    }

    #[test]
    fn test_topics_map_uses_topic_name() {
        let kg = sample_knowledge_graph();
        let view = topics_map(&kg.graph);
        assert_eq!(view["course_CSCI6364"], json!(["machine learning"]));
        assert_eq!(view["_metadata"]["total_courses"], 0);
    }

    #[test]
    fn test_instructors_map_keys_by_name() {
        let kg = sample_knowledge_graph();
        let view = instructors_map(&kg.graph);
        assert_eq!(view["Goldfrank, J"], json!(["course_CSCI1012"]));
        assert_eq!(view["Smith, A"], json!(["course_CSCI6364"]));
        assert_eq!(view["_metadata"]["total_professors"], 1);
    }

    #[test]
    fn test_views_of_empty_graph() {
        let graph = GraphData::new();
        assert_eq!(prerequisites_map(&graph)["_metadata"]["total_courses"], -1);
    }

    #[test]
    fn test_name_falls_back_to_id() {
        let mut graph = GraphData::new();
        graph.add_node(NodeType::Course, "course_A1000", NodeAttributes::new());
        graph.add_node(NodeType::Professor, "prof_X", NodeAttributes::new());
        graph.add_edge_default("course_A1000", "prof_X", EdgeType::TaughtBy);
        assert_eq!(instructors_map(&graph)["prof_X"], json!(["course_A1000"]));
    }

    #[test]
    fn test_write_exports() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("public").join("data");
        let kg = sample_knowledge_graph();

        write_exports(&kg.graph, &out).unwrap();
        for file in [KNOWLEDGE_GRAPH_FILE, PREREQUISITES_FILE, TOPICS_FILE, INSTRUCTORS_FILE] {
            assert!(out.join(file).exists(), "{file} missing");
        }
        let text = std::fs::read_to_string(out.join(INSTRUCTORS_FILE)).unwrap();
        let view: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(view, instructors_map(&kg.graph));
    }
}
