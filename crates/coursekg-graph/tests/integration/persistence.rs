//! Integration tests for snapshots, interchange, and export views.

use coursekg_core::Error;
use coursekg_graph::exports::{INSTRUCTORS_FILE, KNOWLEDGE_GRAPH_FILE, write_exports};
use coursekg_graph::interchange::{knowledge_graph_from_interchange, read_interchange, write_interchange};
use coursekg_graph::{GraphRetriever, from_interchange, load_snapshot, save_snapshot, to_interchange};
use tempfile::tempdir;

use crate::common::{sample_graph, write_file};

#[test]
fn test_snapshot_roundtrip_keeps_retrieval_behaviour() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("graph.json");
    let (kg, _stats) = sample_graph();

    save_snapshot(&kg, &path).unwrap();
    let loaded = load_snapshot(&path).unwrap();

    assert_eq!(loaded.stats(), kg.stats());
    let query = "Who teaches CSCI 6364?";
    assert_eq!(
        GraphRetriever::new(&loaded).retrieve_context(query),
        GraphRetriever::new(&kg).retrieve_context(query)
    );
}

#[test]
fn test_truncated_snapshot_is_fatal() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("graph.json");
    let (kg, _stats) = sample_graph();
    save_snapshot(&kg, &path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let truncated = write_file(dir.path(), "truncated.json", &content[..content.len() / 2]);

    let err = load_snapshot(&truncated).unwrap_err();
    assert!(matches!(err, Error::CorruptGraph(_)));
    assert!(err.is_fatal_load_error());
}

#[test]
fn test_interchange_roundtrip_reproduces_counts() {
    let (kg, _stats) = sample_graph();
    let restored = from_interchange(&to_interchange(&kg.graph));
    assert_eq!(restored.number_of_nodes(), kg.graph.number_of_nodes());
    assert_eq!(restored.number_of_edges(), kg.graph.number_of_edges());
}

#[test]
fn test_interchange_file_rebuilds_retrievable_graph() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("knowledge_graph.json");
    let (kg, _stats) = sample_graph();

    write_interchange(&kg.graph, &path).unwrap();
    let graph = read_interchange(&path).unwrap();
    assert_eq!(graph.number_of_edges(), 10);

    let content = std::fs::read_to_string(&path).unwrap();
    let data = coursekg_graph::interchange::parse_interchange(&content).unwrap();
    let rebuilt = knowledge_graph_from_interchange(&data);
    assert_eq!(rebuilt.index, kg.index);

    let context = GraphRetriever::new(&rebuilt).retrieve_context("CSCI 1012?");
    assert!(context.contains("CSCI 1010 is a prerequisite for CSCI 1012"));
}

#[test]
fn test_exports_directory() {
    let dir = tempdir().unwrap();
    let (kg, _stats) = sample_graph();

    write_exports(&kg.graph, dir.path()).unwrap();

    let graph: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join(KNOWLEDGE_GRAPH_FILE)).unwrap())
            .unwrap();
    assert_eq!(graph["_metadata"]["total_nodes"], 10);
    assert_eq!(graph["_metadata"]["total_links"], 10);

    let instructors: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join(INSTRUCTORS_FILE)).unwrap())
            .unwrap();
    assert_eq!(
        instructors["Goldfrank, J"],
        serde_json::json!(["course_CSCI1010", "course_CSCI1012"])
    );
    assert_eq!(instructors["_metadata"]["total_professors"], 1);
}
