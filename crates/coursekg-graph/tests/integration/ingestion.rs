//! Integration tests for CSV ingestion.

use coursekg_graph::{CourseGraphBuilder, EdgeType, ErrorHandling, NodeType};
use tempfile::tempdir;

use crate::common::{SCHEDULE_CSV, sample_graph, write_file};

#[test]
fn test_sample_schedule_counts() {
    let (kg, stats) = sample_graph();

    assert_eq!(stats.rows_processed, 4);
    assert_eq!(stats.rows_skipped, 0);
    assert!(stats.dangling_refs.is_empty());

    let summary = kg.stats();
    assert_eq!(summary.courses, 4);
    assert_eq!(summary.professors, 2);
    assert_eq!(summary.topics, 4);
    assert_eq!(summary.nodes, 10);
    assert_eq!(summary.edges, 10);
    assert_eq!(stats.nodes_created, 10);
    assert_eq!(stats.edges_created, 10);
}

#[test]
fn test_placeholder_instructors_are_not_nodes() {
    let (kg, _stats) = sample_graph();
    let professors: Vec<&str> = kg
        .graph
        .iter_nodes()
        .filter(|n| n.node_type == NodeType::Professor)
        .map(|n| n.id.as_str())
        .collect();
    assert_eq!(professors, vec!["prof_Goldfrank, J", "prof_Smith, A"]);
}

#[test]
fn test_every_index_entry_resolves() {
    let (kg, _stats) = sample_graph();
    assert!(kg.index.validate(&kg.graph).is_empty());
    for node_id in kg.index.course_nodes.values() {
        assert_eq!(kg.graph.get_node(node_id).unwrap().node_type, NodeType::Course);
    }
}

#[test]
fn test_every_edge_joins_existing_nodes() {
    let (kg, _stats) = sample_graph();
    for edge in kg.graph.iter_edges() {
        assert!(kg.graph.has_node(&edge.source), "missing {}", edge.source);
        assert!(kg.graph.has_node(&edge.target), "missing {}", edge.target);
    }
}

#[test]
fn test_build_from_files_with_catalog_and_manual_edges() {
    let dir = tempdir().unwrap();
    let schedule = write_file(dir.path(), "schedule.csv", SCHEDULE_CSV);
    let catalog = write_file(
        dir.path(),
        "catalog.csv",
        "course_code,title,description\n\
         CSCI 1010,Intro CS,Algorithms for beginners.\n\
         NOT A CODE,Broken,Ignored\n",
    );
    let manual = write_file(
        dir.path(),
        "manual_edges.json",
        r#"[{"source": "course_CSCI1010", "target": "course_CSCI6527", "type": "recommended", "weight": 0.25}]"#,
    );

    let (kg, stats) = CourseGraphBuilder::new()
        .with_schedule_path(&schedule)
        .with_catalog_path(&catalog)
        .with_manual_edges(&manual)
        .with_topic_keywords(["algorithms", "computer vision"])
        .build()
        .unwrap();

    assert_eq!(stats.rows_skipped, 1);
    assert_eq!(stats.skipped_rows[0].source, "catalog");
    assert_eq!(stats.manual_edges_loaded, 1);

    let intro = kg.graph.get_node("course_CSCI1010").unwrap();
    assert_eq!(intro.attributes.title.as_deref(), Some("Introduction to Computer Science"));
    assert_eq!(intro.attributes.description.as_deref(), Some("Algorithms for beginners."));

    assert!(kg.graph.has_edge("course_CSCI1010", "topic_algorithms", &EdgeType::CoversTopic));
    assert!(kg.graph.has_edge("course_CSCI6527", "topic_computer vision", &EdgeType::CoversTopic));
    assert_eq!(
        kg.graph.edge_type("course_CSCI1010", "course_CSCI6527"),
        Some(&EdgeType::Custom("recommended".to_string()))
    );
    assert_eq!(kg.index.topic_nodes.len(), 2);
}

#[test]
fn test_fail_fast_aborts_on_bad_row() {
    let csv = format!("{SCHEDULE_CSV}CSCI,unknown,Broken,,,,,,,\n");
    let result = CourseGraphBuilder::new()
        .with_schedule_csv(csv.clone())
        .with_error_handling(ErrorHandling::FailFast)
        .build();
    assert!(result.is_err());

    let (kg, stats) = CourseGraphBuilder::new().with_schedule_csv(csv).build().unwrap();
    assert_eq!(stats.rows_skipped, 1);
    assert_eq!(stats.skipped_rows[0].record, 5);
    assert_eq!(kg.index.course_nodes.len(), 4);
}
