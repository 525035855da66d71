#![deny(missing_docs)]

//! # mvault-core — Foundational Types for the Memvault Stack
//!
//! This crate defines the types every other crate in the workspace depends
//! on. It has no internal crate dependencies — only `serde`, `serde_json`,
//! `thiserror`, `chrono`, and `sha2` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **[`CanonicalBytes`] is the sole path to digest computation.** All
//!    content-addressed digests in the stack — audit record hashes, mock
//!    proof material, proof artifact hashes — flow through
//!    `CanonicalBytes::new()`, which applies deterministic canonicalization
//!    (float rejection, datetime normalization, compact sorted output).
//!
//! 2. **Structured errors with `thiserror`.** No `Box<dyn Error>`, no
//!    `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod temporal;

// Re-export primary types at crate root for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, ContentDigest, DigestAlgorithm, Sha256Accumulator};
pub use error::{CanonicalizationError, ValidationError};
pub use temporal::Timestamp;
