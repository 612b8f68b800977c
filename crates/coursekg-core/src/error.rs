//! Error types for coursekg-core

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for CourseKG operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, loading, or configuring a graph.
///
/// Lookups and insertions never produce these: a missing node or a
/// dangling edge is reported through a `bool` or an empty result so that
/// ingestion can skip and continue. Only whole-artifact failures (a file
/// that cannot be read, a snapshot that does not validate) surface here.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// I/O failure, optionally tied to a path.
    #[error("I/O error{}: {source}", path_suffix(.path))]
    Io {
        /// Path involved in the failed operation, if known
        path: Option<PathBuf>,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Input could not be parsed (CSV, JSON, TOML).
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A named entity does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of entity (e.g. "node", "course")
        kind: String,
        /// Identifier that was looked up
        id: String,
    },

    /// A persisted graph failed validation; no partial graph is returned.
    #[error("Corrupt graph: {0}")]
    CorruptGraph(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Wrap an I/O error together with the path that caused it.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::Io {
            path: Some(path.as_ref().to_path_buf()),
            source,
        }
    }

    /// Creates a parse error.
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Error::Parse(message.into())
    }

    /// Creates a configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config(message.into())
    }

    /// Creates a not-found error for the given entity kind and id.
    pub fn not_found(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Error::NotFound {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Creates a corrupt-graph error.
    pub fn corrupt_graph<S: Into<String>>(message: S) -> Self {
        Error::CorruptGraph(message.into())
    }

    /// Returns `true` if this error means a persisted graph is unusable.
    pub fn is_fatal_load_error(&self) -> bool {
        matches!(
            self,
            Error::CorruptGraph(_) | Error::Serialization(_) | Error::Parse(_)
        )
    }
}

fn path_suffix(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!(" at {}", p.display()),
        None => String::new(),
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io { path: None, source }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = Error::not_found("node", "course_CSCI1010");
        assert_eq!(err.to_string(), "node not found: course_CSCI1010");
    }

    #[test]
    fn test_io_with_path_display() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = Error::io_with_path(io, "/tmp/graph.json");
        let msg = err.to_string();
        assert!(msg.contains("/tmp/graph.json"));
        assert!(msg.contains("missing"));
    }

    #[test]
    fn test_io_without_path_display() {
        let io = std::io::Error::other("boom");
        let err: Error = io.into();
        assert_eq!(err.to_string(), "I/O error: boom");
    }

    #[test]
    fn test_corrupt_graph_is_fatal() {
        assert!(Error::corrupt_graph("dangling edge").is_fatal_load_error());
        assert!(Error::parse("bad csv").is_fatal_load_error());
        assert!(!Error::config("max_hops").is_fatal_load_error());
    }

    #[test]
    fn test_serde_error_conversion() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let err: Error = serde_err.into();
        assert!(matches!(err, Error::Serialization(_)));
        assert!(err.is_fatal_load_error());
    }

    #[test]
    fn test_error_implements_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
