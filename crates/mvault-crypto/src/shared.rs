//! # Shared Accumulator
//!
//! A clonable handle enforcing the accumulator's concurrency discipline:
//! inserts are mutually exclusive (write lock) while proof generation and
//! root reads run concurrently with each other (read lock) but never with
//! an in-flight insert. Root recomputation is read-then-write over the
//! node map, so an unsynchronized reader could observe a half-updated
//! path.
//!
//! Tests that need independent accumulators should construct their own
//! [`SparseMerkleAccumulator`] instances instead of sharing a handle —
//! there is no module-level state anywhere in this crate.

use std::sync::Arc;

use ark_bn254::Fr;
use parking_lot::RwLock;

use crate::error::AccumulatorError;
use crate::smt::{InclusionProof, InsertReceipt, SparseMerkleAccumulator};

/// A clonable, thread-safe handle to one accumulator instance.
#[derive(Debug, Clone)]
pub struct SharedAccumulator {
    inner: Arc<RwLock<SparseMerkleAccumulator>>,
}

impl SharedAccumulator {
    /// Create a shared handle around a fresh accumulator of the given depth.
    pub fn new(depth: u32) -> Result<Self, AccumulatorError> {
        Ok(Self {
            inner: Arc::new(RwLock::new(SparseMerkleAccumulator::new(depth)?)),
        })
    }

    /// Wrap an existing accumulator (e.g. one rebuilt from an insert log).
    pub fn from_accumulator(acc: SparseMerkleAccumulator) -> Self {
        Self {
            inner: Arc::new(RwLock::new(acc)),
        }
    }

    /// Insert a commitment under the write lock.
    pub fn insert(&self, commitment: Fr) -> Result<InsertReceipt, AccumulatorError> {
        self.inner.write().insert(commitment)
    }

    /// Insert a batch atomically under the write lock.
    pub fn insert_batch(&self, commitments: &[Fr]) -> Result<Vec<InsertReceipt>, AccumulatorError> {
        self.inner.write().insert_batch(commitments)
    }

    /// Build an inclusion proof under a read lock.
    pub fn generate_proof(&self, commitment: &Fr) -> Result<InclusionProof, AccumulatorError> {
        self.inner.read().generate_proof(commitment)
    }

    /// Current root under a read lock.
    pub fn root(&self) -> Fr {
        self.inner.read().root()
    }

    /// Current leaf count under a read lock.
    pub fn leaf_count(&self) -> u64 {
        self.inner.read().leaf_count()
    }

    /// Whether a commitment has been inserted.
    pub fn contains(&self, commitment: &Fr) -> bool {
        self.inner.read().contains(commitment)
    }

    /// Snapshot of the ordered insert log.
    pub fn insert_log(&self) -> Vec<(u64, Fr)> {
        self.inner.read().insert_log()
    }
}
