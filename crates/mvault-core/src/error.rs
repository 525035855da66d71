//! # Error Hierarchy
//!
//! Structured error types shared across the Memvault Stack, built with
//! `thiserror`. Crate-specific failures (accumulator structure, proof
//! pipeline) live in their own crates; this module holds the errors that
//! cut across crate boundaries.
//!
//! Each variant carries enough diagnostic context to act on: the value
//! that was rejected and why.

use thiserror::Error;

/// Errors during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations —
    /// their serialization is not deterministic across platforms.
    /// Numeric values must be strings or integers.
    #[error("float values are not permitted in canonical representations; use string or integer: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed during canonicalization.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Validation errors for domain primitives.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Timestamp string is not valid UTC ISO 8601.
    #[error("invalid timestamp: \"{value}\" ({reason})")]
    InvalidTimestamp {
        /// The string that failed to parse.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalization_error_display() {
        let err = CanonicalizationError::FloatRejected(1.5);
        let msg = format!("{err}");
        assert!(msg.contains("not permitted"));
        assert!(msg.contains("1.5"));
    }

    #[test]
    fn timestamp_error_display_includes_reason() {
        let err = ValidationError::InvalidTimestamp {
            value: "yesterday".to_string(),
            reason: "not ISO 8601".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("yesterday"));
        assert!(msg.contains("not ISO 8601"));
    }
}
