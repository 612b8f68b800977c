//! Property tests for store invariants.

use coursekg_graph::{EdgeType, GraphData, NodeAttributes, NodeType, format_subgraph_context};
use proptest::prelude::*;

fn edge_type(code: u8) -> EdgeType {
    match code % 4 {
        0 => EdgeType::Prerequisite,
        1 => EdgeType::TaughtBy,
        2 => EdgeType::CoversTopic,
        _ => EdgeType::Custom("related".to_string()),
    }
}

proptest! {
    #[test]
    fn test_node_insertion_is_idempotent(ids in proptest::collection::vec("[a-d]{1,2}", 1..30)) {
        let mut graph = GraphData::new();
        let mut distinct = std::collections::BTreeSet::new();
        for id in &ids {
            let inserted = graph.add_node(NodeType::Course, id, NodeAttributes::new());
            prop_assert_eq!(inserted, distinct.insert(id.clone()));
        }
        prop_assert_eq!(graph.number_of_nodes(), distinct.len());
    }

    #[test]
    fn test_edges_only_between_existing_nodes(
        edges in proptest::collection::vec((0u8..6, 0u8..6, 0u8..4), 0..40),
    ) {
        let mut graph = GraphData::new();
        // Only n0..n3 exist; n4 and n5 are never inserted.
        for n in 0..4u8 {
            graph.add_node(NodeType::Course, &format!("n{n}"), NodeAttributes::new());
        }

        let mut expected = std::collections::BTreeSet::new();
        for (s, t, k) in edges {
            let (source, target) = (format!("n{s}"), format!("n{t}"));
            let added = graph.add_edge_default(&source, &target, edge_type(k));
            let valid = s < 4 && t < 4;
            prop_assert_eq!(added, valid && expected.insert((s, t, k % 4)));
        }

        prop_assert_eq!(graph.number_of_edges(), expected.len());
        for edge in graph.iter_edges() {
            prop_assert!(graph.has_node(&edge.source) && graph.has_node(&edge.target));
        }
    }

    #[test]
    fn test_formatting_is_total(
        edges in proptest::collection::vec((0u8..5, 0u8..5, 0u8..4), 0..20),
        hops in 0usize..3,
    ) {
        let mut graph = GraphData::new();
        for n in 0..5u8 {
            graph.add_node(NodeType::Course, &format!("n{n}"), NodeAttributes::new());
        }
        for (s, t, k) in edges {
            graph.add_edge_default(&format!("n{s}"), &format!("n{t}"), edge_type(k));
        }
        let text = format_subgraph_context(&graph.get_subgraph(["n0"], hops));
        prop_assert!(!text.is_empty());
        prop_assert!(text.lines().count() <= 3);
    }
}
