//! Small fixture graph for tests and examples.
//!
//! Available in unit tests and under the `test-utils` feature.

use crate::{EdgeType, GraphData, KnowledgeGraph, KnowledgeIndex, NodeAttributes, NodeType};

/// Three courses in a prerequisite chain, two instructors, one topic.
///
/// ```text
/// CSCI 1010 -> CSCI 1012 -> CSCI 6364 -> topic "machine learning"
///                 |            |
///            Goldfrank, J   Smith, A
/// ```
pub fn sample_knowledge_graph() -> KnowledgeGraph {
    let mut graph = GraphData::new();
    let mut index = KnowledgeIndex::new();

    let courses = [
        ("CSCI 1010", "Introduction to Computer Science"),
        ("CSCI 1012", "Introduction to Programming with Python"),
        ("CSCI 6364", "Machine Learning"),
    ];
    for (code, title) in courses {
        let id = coursekg_core::course_node_id(code);
        let attributes = NodeAttributes::new()
            .with_code(code)
            .with_title(title)
            .with_extra("subject", "CSCI");
        graph.add_node(NodeType::Course, &id, attributes);
        index.register_course(&graph, code, &id);
    }

    for name in ["Goldfrank, J", "Smith, A"] {
        let id = coursekg_core::professor_node_id(name);
        graph.add_node(NodeType::Professor, &id, NodeAttributes::new().with_name(name));
        index.register_professor(&graph, name, &id);
    }

    let topic_id = coursekg_core::topic_node_id("machine learning");
    graph.add_node(
        NodeType::Topic,
        &topic_id,
        NodeAttributes::new().with_name("machine learning"),
    );
    index.register_topic(&graph, "machine learning", &topic_id);

    graph.add_edge_default("course_CSCI1010", "course_CSCI1012", EdgeType::Prerequisite);
    graph.add_edge_default("course_CSCI1012", "course_CSCI6364", EdgeType::Prerequisite);
    graph.add_edge_default("course_CSCI1012", "prof_Goldfrank, J", EdgeType::TaughtBy);
    graph.add_edge_default("course_CSCI6364", "prof_Smith, A", EdgeType::TaughtBy);
    graph.add_edge_default("course_CSCI6364", &topic_id, EdgeType::CoversTopic);

    KnowledgeGraph::new(graph, index)
}
