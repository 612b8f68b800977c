//! Shared fixtures for integration tests.

use coursekg_graph::{
    BuildStats, CourseGraphBuilder, EdgeType, GraphData, KnowledgeGraph, NodeAttributes, NodeType,
};
use std::path::{Path, PathBuf};

/// Four courses in a prerequisite chain, two named instructors, and
/// placeholder instructors that must not become nodes.
pub const SCHEDULE_CSV: &str = "\
subject,course_code,title,instructor,building_room,day_time,credits,status,crn,description
CSCI,CSCI 1010,Introduction to Computer Science,\"Goldfrank, J\",SEH 1300,MW 10:00,3,OPEN,10001,
CSCI,CSCI 1012,Introduction to Programming,\"Goldfrank, J\",SEH 1400,TR 11:00,3,OPEN,10002,Prerequisite: CSCI 1010.
CSCI,CSCI 6364,Machine Learning,\"Smith, A; TBA\",SEH 2000,W 18:00,3,OPEN,10003,Prerequisites: CSCI 1012. Neural networks and deep learning.
CSCI,CSCI 6527,Computer Vision,Staff,SEH 2100,R 18:00,3,OPEN,10004,Prerequisite: CSCI 6364.
";

/// Build the sample schedule with default settings.
pub fn sample_graph() -> (KnowledgeGraph, BuildStats) {
    CourseGraphBuilder::new()
        .with_schedule_csv(SCHEDULE_CSV)
        .build()
        .expect("sample schedule should build")
}

/// Two courses joined by a single prerequisite edge (CSCI 1010 -> CSCI 1012).
pub fn two_course_graph() -> GraphData {
    let mut graph = GraphData::new();
    for code in ["CSCI 1010", "CSCI 1012"] {
        graph.add_node(
            NodeType::Course,
            &coursekg_core::course_node_id(code),
            NodeAttributes::new().with_code(code),
        );
    }
    graph.add_edge_default("course_CSCI1010", "course_CSCI1012", EdgeType::Prerequisite);
    graph
}

/// Write `content` to `name` inside `dir`, returning the path.
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("fixture file should be writable");
    path
}
