//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types shared across the Skladno stack. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! The pure deadline/alert core is total and produces no errors of its own;
//! everything here belongs to the boundaries around it — parsing, record
//! validation, fetch, and session plumbing.

use thiserror::Error;

/// Top-level error type for the Skladno stack.
#[derive(Error, Debug)]
pub enum SklError {
    /// Input failed boundary validation (bad timestamp, bad identifier,
    /// malformed record).
    #[error("validation error: {0}")]
    Validation(String),

    /// Fetching records from the external store failed.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Session/token acquisition failed after exhausting retries.
    #[error("session error: {0}")]
    Session(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
