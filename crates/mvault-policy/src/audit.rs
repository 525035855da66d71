//! # Audit Operation Records
//!
//! Every successful `prove()` and `insert()` is summarized as an
//! [`OperationRecord`] for an external append-only, hash-chained audit
//! service. This module produces the stable, hashable per-operation
//! summary; the chain itself is an external collaborator.
//!
//! ## Security Invariant
//!
//! Records are individually digestable via `CanonicalBytes` +
//! `sha256_digest`, so the external chain can verify that a record was
//! not altered after emission. Records never contain private material —
//! only commitments, roots, and proof hashes, which are already public.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mvault_core::{sha256_digest, CanonicalBytes, ContentDigest, Timestamp};

/// The operation an audit record summarizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// A proof artifact was produced by the pipeline.
    ProofGenerated,
    /// A proof artifact was verified.
    ProofVerified,
    /// A commitment was inserted into the accumulator.
    LeafInserted,
    /// A batch of commitments was inserted atomically.
    BatchInserted,
}

impl AuditAction {
    /// The action's wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProofGenerated => "proof_generated",
            Self::ProofVerified => "proof_verified",
            Self::LeafInserted => "leaf_inserted",
            Self::BatchInserted => "batch_inserted",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stable, hashable summary of one successful operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationRecord {
    /// Unique record identifier.
    pub record_id: Uuid,
    /// The operation performed.
    pub action: AuditAction,
    /// The subject the operation concerned: an agent ID for proofs, a
    /// commitment hex for inserts.
    pub subject_id: String,
    /// Hex digest of the operation's result: a proof hash for proofs,
    /// the new root for inserts.
    pub result_hash: String,
    /// UTC time the operation completed.
    pub timestamp: Timestamp,
}

impl OperationRecord {
    /// Create a record with the current UTC timestamp and a fresh id.
    pub fn new(
        action: AuditAction,
        subject_id: impl Into<String>,
        result_hash: impl Into<String>,
    ) -> Self {
        Self {
            record_id: Uuid::new_v4(),
            action,
            subject_id: subject_id.into(),
            result_hash: result_hash.into(),
            timestamp: Timestamp::now(),
        }
    }

    /// Compute the record's canonical digest for the external chain.
    ///
    /// Returns `None` if canonicalization fails; the record fields are
    /// all strings and enums, so in practice this only trips if a caller
    /// extends the type carelessly.
    pub fn digest(&self) -> Option<ContentDigest> {
        let canonical = match CanonicalBytes::new(self) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(
                    action = %self.action,
                    error = %e,
                    "audit record canonicalization failed; digest unavailable"
                );
                return None;
            }
        };
        Some(sha256_digest(&canonical))
    }
}
