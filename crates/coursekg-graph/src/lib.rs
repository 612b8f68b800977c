//! CourseKG Graph: course knowledge graph store and multi-hop retriever.
//!
//! Courses, professors, and topics are nodes in a directed multigraph;
//! prerequisites, teaching assignments, and topic coverage are typed edges.
//! Given a question, the retriever resolves the entities it mentions,
//! expands a bounded neighbourhood around them, and renders that
//! neighbourhood as compact text for a question-answering model.
//!
//! # Modules
//!
//! - [`types`]: Node, edge, and graph store types
//! - [`index`]: Display-key lookups into the store
//! - [`algorithms`]: Subgraph expansion and simple path enumeration
//! - [`resolver`]: Question fragments to node IDs
//! - [`context`]: Subgraph and path rendering
//! - [`retriever`]: `GraphRetriever` and prompt assembly
//! - [`builder`]: CSV ingestion
//! - [`persistence`]: Versioned JSON snapshots
//! - [`interchange`]: Node/link JSON for graph viewers
//! - [`exports`]: Flat JSON views
//! - [`config`]: Retriever configuration

#![doc = include_str!("../README.md")]

pub mod algorithms;
pub mod builder;
pub mod config;
pub mod context;
pub mod exports;
pub mod index;
pub mod interchange;
pub mod persistence;
pub mod resolver;
pub mod retriever;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod fixtures;

// Re-exports: types
pub use types::{DEFAULT_EDGE_WEIGHT, Edge, EdgeType, GraphData, Node, NodeAttributes, NodeType};

// Re-exports: index and retrieval
pub use index::{DanglingEntry, KnowledgeIndex};
pub use retriever::{GraphRetriever, GraphSummary, KnowledgeGraph, build_user_prompt};

// Re-exports: algorithms
pub use algorithms::{SimplePaths, Subgraph, find_paths, get_subgraph};

// Re-exports: formatting
pub use context::{
    EMPTY_CONTEXT, NO_RELATIONS_CONTEXT, format_path_context, format_subgraph_context,
    format_subgraph_context_with_limit,
};

// Re-exports: builder
pub use builder::{BuildError, BuildStats, CourseGraphBuilder, ErrorHandling, ManualEdge};

// Re-exports: persistence and interchange
pub use interchange::{InterchangeGraph, from_interchange, to_interchange};
pub use persistence::{GraphSnapshot, load_snapshot, save_snapshot};

// Re-exports: config
pub use config::RetrieverConfig;
