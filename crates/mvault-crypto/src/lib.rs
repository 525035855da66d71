#![deny(missing_docs)]

//! # mvault-crypto — Cryptographic Primitives for the Memvault Stack
//!
//! This crate provides the algebraic building blocks used throughout the
//! workspace:
//!
//! - **Field encoding** ([`field`]): deterministic mapping of byte strings
//!   into the BN254 scalar field, plus hex/decimal conversions and serde
//!   helpers for field elements.
//! - **Poseidon commitment hashing** ([`poseidon`]): the fixed-arity
//!   algebraic hash used both as the commitment function
//!   `H(content, salt)` and as the accumulator's node combiner. Uses
//!   circom-compatible parameters so commitments remain provable inside
//!   an arithmetic circuit.
//! - **Sparse Merkle accumulator** ([`smt`]): a fixed-depth, append-only
//!   indexed accumulator over commitments with O(depth) insertion and
//!   inclusion proofs.
//! - **Shared accumulator** ([`shared`]): a single-writer /
//!   concurrent-reader wrapper for sharing one accumulator across tasks.
//!
//! ## Hashing Discipline
//!
//! SHA-256 is used only where data never needs to be proven in-circuit:
//! the field encoder's digest step. Everything on the commitment path —
//! leaf hashes, node combination, empty-subtree constants — is Poseidon.

pub mod error;
pub mod field;
pub mod poseidon;
pub mod shared;
pub mod smt;

// Re-export primary types.
pub use error::{AccumulatorError, CryptoError};
pub use field::FieldEncoder;
pub use poseidon::CommitmentHasher;
pub use shared::SharedAccumulator;
pub use smt::{InclusionProof, InsertReceipt, SparseMerkleAccumulator};

/// The scalar field all commitments and accumulator nodes live in.
pub use ark_bn254::Fr;
