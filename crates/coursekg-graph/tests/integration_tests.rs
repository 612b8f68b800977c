//! Integration test suite for the course knowledge graph.
//!
//! Exercises ingestion, retrieval, persistence, and export end to end
//! through the public API.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;
mod integration;
