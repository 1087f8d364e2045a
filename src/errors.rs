//! Error types for the navpath search core.
//!
//! Only fatal, non-search-outcome failures live here: store lookup
//! failures propagate as errors. Every recoverable condition — invalid
//! input, timeout, max-expansions, unreachable, chain failures — is
//! reported as data on [`crate::path::PathResult`], never as an `Err`.

use std::fmt;

/// Core error type for the navpath search core.
#[derive(Debug)]
pub enum NavPathError {
    /// The world store could not be opened or a query against it failed.
    Store(String),

    /// The driver was asked to run a search before its inputs were validated,
    /// or constructing the provider/store failed for a reason outside the
    /// `PathResult::reason` taxonomy.
    Setup(String),
}

impl fmt::Display for NavPathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavPathError::Store(msg) => write!(f, "world store error: {}", msg),
            NavPathError::Setup(msg) => write!(f, "search setup error: {}", msg),
        }
    }
}

impl std::error::Error for NavPathError {}

impl From<rusqlite::Error> for NavPathError {
    fn from(err: rusqlite::Error) -> Self {
        NavPathError::Store(err.to_string())
    }
}

impl From<std::io::Error> for NavPathError {
    fn from(err: std::io::Error) -> Self {
        NavPathError::Setup(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NavPathError>;
