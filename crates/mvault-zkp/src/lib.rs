#![deny(missing_docs)]

//! # mvault-zkp — Policy-Evaluation Proof Pipeline
//!
//! Converts a private memory fragment, a salt, and sensitivity flags
//! into a verifiable allow/block proof artifact:
//!
//! - **Artifacts** ([`artifact`]): the ordered public-signal contract
//!   and the immutable [`ProofArtifact`] with its content hash.
//! - **Backends** ([`backend`]): the real-or-mock tagged variant,
//!   selected once at construction by probing for circuit artifacts or
//!   injecting a [`CircuitProver`].
//! - **Mock synthesis** ([`mock`]): deterministic Groth16-shaped
//!   fallback blobs derived only from public data.
//! - **Pipeline** ([`pipeline`]): binding check, policy evaluation,
//!   backend invocation under a timeout, and logged fallback.
//! - **Ranking** ([`ranker`]): non-cryptographic shortlisting of
//!   candidate commitments before per-candidate proving.
//!
//! ## Security Invariant
//!
//! Proof strength is never degraded silently: every artifact carries
//! `is_real_proof`, and only backend unavailability (never a binding or
//! witness error) triggers the mock fallback.

pub mod artifact;
pub mod backend;
pub mod error;
pub mod mock;
pub mod pipeline;
pub mod ranker;

// Re-export primary types.
pub use artifact::{ProofArtifact, PublicSignals};
pub use backend::{CircuitArtifacts, CircuitProver, PrivateWitness, ProofBackend};
pub use error::{ProofError, VerifyError};
pub use pipeline::{ProofPipeline, ProveRequest};
pub use ranker::{RankedCandidate, RelevanceRanker};
