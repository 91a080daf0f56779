//! Error types for the reactive system.
//!
//! Most reactive operations cannot fail. Reads always succeed, and a panic
//! raised inside a subscriber unwinds straight through the write that
//! triggered it. The errors here cover the few fallible edges: keyed lookups
//! on a store, the optional notification depth guard, configuration, and
//! JSON output of store state.

use thiserror::Error;

/// Errors produced by the reactive runtime.
#[derive(Debug, Error)]
pub enum RippleError {
    #[error("store has no entry for key {key}")]
    MissingKey { key: String },

    #[error("notification depth {depth} exceeds configured limit {limit}")]
    NotifyDepthExceeded { depth: usize, limit: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse configuration")]
    ConfigParse(#[source] serde_json::Error),

    #[error("failed to serialize reactive state")]
    Serialize(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T, E = RippleError> = std::result::Result<T, E>;
