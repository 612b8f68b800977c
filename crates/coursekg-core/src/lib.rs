//! CourseKG Core: shared error type and identifier utilities.
//!
//! This crate provides the foundational pieces used by the course knowledge
//! graph crates. It has no internal CourseKG dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`util`]: Node ID and course-code utilities

pub mod error;
pub mod util;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};

// Convenience re-exports from util
pub use util::ids::{
    course_node_id, display_label, infer_node_kind, normalize_course_code, professor_node_id,
    topic_node_id,
};
