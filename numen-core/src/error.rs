//! Error types for the NUMEN core library.
//!
//! The engine itself is total over its numeric domain: out-of-range inputs are
//! clamped, never rejected. The variants below cover the edges where the host
//! hands us something we cannot interpret.

use thiserror::Error;

/// Top-level error type for all NUMEN operations.
#[derive(Error, Debug)]
pub enum NumenError {
    /// A notification trigger name outside the fixed set was requested.
    #[error("Unknown trigger: '{name}'. Valid values: {valid}")]
    UnknownTrigger {
        /// The name the caller asked for.
        name: String,
        /// Comma-separated list of accepted names.
        valid: String,
    },

    /// A name could not be parsed into one of the closed enumerations
    /// (event kind, mood dimension, alignment).
    #[error("Unknown {what}: '{name}'")]
    UnknownName {
        /// Which enumeration was being parsed.
        what: &'static str,
        /// The offending input.
        name: String,
    },

    /// Snapshot serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, NumenError>;
