//! # Cryptographic Error Types
//!
//! Structured errors for all cryptographic operations in `mvault-crypto`,
//! built with `thiserror`.
//!
//! Accumulator errors are structural: they describe a state or caller
//! error (duplicate leaf, unknown leaf, full tree) and are never retried.
//! No accumulator error leaves the tree partially updated.

use thiserror::Error;

/// Errors from low-level field and hash operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Poseidon hashing failed (wrong input arity or parameter setup).
    #[error("poseidon error: {0}")]
    Poseidon(String),

    /// Hex decoding error.
    #[error("hex decode error: {0}")]
    HexDecode(String),

    /// A string or byte encoding does not decode to a field element.
    #[error("field decode error: {0}")]
    FieldDecode(String),
}

/// Structural errors from sparse Merkle accumulator operations.
#[derive(Error, Debug)]
pub enum AccumulatorError {
    /// The commitment is already present (in the tree or earlier in the
    /// same batch); leaves are immutable and inserted at most once.
    #[error("duplicate leaf: commitment {commitment} already present")]
    DuplicateLeaf {
        /// Hex encoding of the duplicate commitment.
        commitment: String,
    },

    /// The commitment was never inserted, so no inclusion proof exists.
    #[error("leaf not found: commitment {commitment} was never inserted")]
    LeafNotFound {
        /// Hex encoding of the unknown commitment.
        commitment: String,
    },

    /// The tree is full: a depth-D accumulator holds at most 2^D leaves.
    #[error("capacity exceeded: depth {depth} accumulator holds at most {capacity} leaves")]
    CapacityExceeded {
        /// The fixed tree depth.
        depth: u32,
        /// The maximum number of leaves (2^depth).
        capacity: u64,
    },

    /// Depth must be between 1 and 63 so leaf indices fit in a `u64`.
    #[error("invalid depth {depth}: must be in 1..=63")]
    InvalidDepth {
        /// The rejected depth.
        depth: u32,
    },

    /// An underlying hash operation failed.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_leaf_display() {
        let err = AccumulatorError::DuplicateLeaf {
            commitment: "ab".repeat(32),
        };
        let msg = format!("{err}");
        assert!(msg.contains("duplicate leaf"));
        assert!(msg.contains(&"ab".repeat(32)));
    }

    #[test]
    fn capacity_display_includes_bounds() {
        let err = AccumulatorError::CapacityExceeded {
            depth: 2,
            capacity: 4,
        };
        let msg = format!("{err}");
        assert!(msg.contains("depth 2"));
        assert!(msg.contains("4 leaves"));
    }

    #[test]
    fn crypto_error_converts() {
        let err: AccumulatorError = CryptoError::Poseidon("bad arity".to_string()).into();
        assert!(matches!(err, AccumulatorError::Crypto(_)));
    }
}
