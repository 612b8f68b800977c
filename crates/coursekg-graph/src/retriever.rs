//! Question-driven retrieval over a loaded course graph.
//!
//! The retriever never mutates the graph. A typical flow:
//!
//! ```rust
//! use coursekg_graph::{GraphRetriever, KnowledgeGraph};
//!
//! let kg = KnowledgeGraph::default();
//! let retriever = GraphRetriever::new(&kg);
//! let context = retriever.retrieve_context("What does CSCI 1012 require?");
//! assert_eq!(
//!     retriever.build_user_prompt("What does CSCI 1012 require?", &context),
//!     "Question: What does CSCI 1012 require?"
//! );
//! ```

use crate::context::{EMPTY_CONTEXT, format_path_context, format_subgraph_context_with_limit};
use crate::resolver::{extract_entities, resolve};
use crate::{GraphData, KnowledgeIndex, RetrieverConfig, Subgraph, find_paths, get_subgraph};
use serde::{Deserialize, Serialize};

// ============================================================================
// KnowledgeGraph
// ============================================================================

/// A graph store together with its lookup index.
#[derive(Clone, Debug, Default)]
pub struct KnowledgeGraph {
    /// The graph store.
    pub graph: GraphData,
    /// Display-key lookups into `graph`.
    pub index: KnowledgeIndex,
}

impl KnowledgeGraph {
    /// Bundle a store and index.
    pub fn new(graph: GraphData, index: KnowledgeIndex) -> Self {
        Self { graph, index }
    }

    /// Summary counts.
    pub fn stats(&self) -> GraphSummary {
        GraphSummary {
            nodes: self.graph.number_of_nodes(),
            edges: self.graph.number_of_edges(),
            courses: self.index.course_nodes.len(),
            professors: self.index.professor_nodes.len(),
            topics: self.index.topic_nodes.len(),
        }
    }
}

/// Node, edge, and index counts of a `KnowledgeGraph`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSummary {
    /// Nodes in the store.
    pub nodes: usize,
    /// Edges in the store.
    pub edges: usize,
    /// Entries in the course-code index.
    pub courses: usize,
    /// Entries in the professor-name index.
    pub professors: usize,
    /// Entries in the topic-label index.
    pub topics: usize,
}

// ============================================================================
// Prompt assembly
// ============================================================================

/// Assemble the user message sent to the answering model.
///
/// Without usable context (the empty sentinel) the message is just the
/// question.
pub fn build_user_prompt(query: &str, context: &str) -> String {
    if context == EMPTY_CONTEXT {
        format!("Question: {query}")
    } else {
        format!("Graph Context:\n{context}\n\nQuestion: {query}")
    }
}

// ============================================================================
// GraphRetriever
// ============================================================================

/// Resolves question fragments against a graph and renders context.
pub struct GraphRetriever<'a> {
    kg: &'a KnowledgeGraph,
    config: RetrieverConfig,
}

impl<'a> GraphRetriever<'a> {
    /// Retriever with the default configuration.
    pub fn new(kg: &'a KnowledgeGraph) -> Self {
        Self::with_config(kg, RetrieverConfig::default())
    }

    /// Retriever with an explicit configuration.
    pub fn with_config(kg: &'a KnowledgeGraph, config: RetrieverConfig) -> Self {
        Self { kg, config }
    }

    /// The active configuration.
    pub fn config(&self) -> &RetrieverConfig {
        &self.config
    }

    /// Resolve fragments and expand them by `max_hops`.
    ///
    /// Fragments that resolve to nothing give an empty subgraph.
    pub fn retrieve_subgraph<I, S>(&self, fragments: I, max_hops: usize) -> Subgraph
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let seeds = resolve(&self.kg.index, fragments);
        if seeds.is_empty() {
            return Subgraph::empty();
        }
        get_subgraph(&self.kg.graph, &seeds, max_hops)
    }

    /// Extract entities from `query`, retrieve, and format the result.
    pub fn retrieve_context(&self, query: &str) -> String {
        let entities = extract_entities(query, &self.config.topic_keywords);
        log::debug!("Extracted {} entity fragment(s) from query", entities.len());
        let subgraph = self.retrieve_subgraph(&entities, self.config.max_hops);
        format_subgraph_context_with_limit(&subgraph, self.config.max_edges_per_type)
    }

    /// Simple paths from anything `from` resolves to, to anything `to`
    /// resolves to.
    ///
    /// Seed pairs are visited in sorted ID order and each pair's paths in
    /// enumeration order.
    pub fn find_paths_between(&self, from: &str, to: &str) -> Vec<Vec<String>> {
        let sources = resolve(&self.kg.index, [from]);
        let targets = resolve(&self.kg.index, [to]);

        let mut paths = Vec::new();
        for source in &sources {
            for target in &targets {
                paths.extend(find_paths(
                    &self.kg.graph,
                    source,
                    target,
                    self.config.max_path_length,
                ));
            }
        }
        paths
    }

    /// `find_paths_between` rendered as `Reasoning Path:` lines.
    pub fn retrieve_path_context(&self, from: &str, to: &str) -> String {
        let paths = self.find_paths_between(from, to);
        format_path_context(&self.kg.graph, &paths, self.config.max_edges_per_type)
    }

    /// See [`build_user_prompt`].
    pub fn build_user_prompt(&self, query: &str, context: &str) -> String {
        build_user_prompt(query, context)
    }

    /// Retrieve context for `query` and wrap both into a user prompt.
    pub fn prompt_for(&self, query: &str) -> String {
        let context = self.retrieve_context(query);
        build_user_prompt(query, &context)
    }
}
