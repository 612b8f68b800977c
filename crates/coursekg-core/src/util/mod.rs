//! Utility modules for identifier handling.
//!
//! # Modules
//!
//! - [`ids`]: Node ID construction, prefix inference, and course-code normalization

pub mod ids;
