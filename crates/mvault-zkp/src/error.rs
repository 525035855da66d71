//! # Proof Pipeline Errors
//!
//! ## Security Invariant
//!
//! Only [`ProofError::BackendUnavailable`] may trigger a mock fallback.
//! Binding and witness errors abort the request outright: the pipeline
//! never silently degrades proof strength in response to a caller error.

use thiserror::Error;

use mvault_crypto::error::CryptoError;

/// Error during proof generation.
#[derive(Error, Debug)]
pub enum ProofError {
    /// The recomputed witness commitment does not match the supplied
    /// public commitment. Caller error; never retried, never falls back.
    #[error("witness commitment {actual} does not match supplied commitment {expected}")]
    Binding {
        /// Hex of the commitment the caller supplied.
        expected: String,
        /// Hex of the commitment recomputed from the witness.
        actual: String,
    },
    /// The witness is incomplete: content and salt must be supplied
    /// together, or both omitted to request derived-witness mode.
    #[error("invalid witness: {0}")]
    InvalidWitness(String),
    /// The real backend failed or timed out. Recoverable: triggers mock
    /// fallback unless fallback is disabled.
    #[error("proving backend unavailable: {0}")]
    BackendUnavailable(String),
    /// A field-arithmetic or Poseidon failure.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// Error during proof verification.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// The artifact is structurally malformed (corrupt blob, bad
    /// encoding, wrong signal count).
    #[error("malformed proof artifact: {0}")]
    MalformedArtifact(String),
    /// The verifier for the artifact's mode is not available (e.g. a
    /// real artifact presented to a mock-only pipeline).
    #[error("no verifier available: {0}")]
    VerifierUnavailable(String),
    /// The backend verifier itself failed.
    #[error("backend verification failed: {0}")]
    Backend(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_error_names_both_commitments() {
        let err = ProofError::Binding {
            expected: "aa".repeat(32),
            actual: "bb".repeat(32),
        };
        let msg = err.to_string();
        assert!(msg.contains(&"aa".repeat(32)));
        assert!(msg.contains(&"bb".repeat(32)));
    }

    #[test]
    fn backend_unavailable_is_distinct_from_binding() {
        let err = ProofError::BackendUnavailable("timed out after 10s".into());
        assert!(matches!(err, ProofError::BackendUnavailable(_)));
    }
}
