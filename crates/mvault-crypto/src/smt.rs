//! # Sparse Merkle Accumulator
//!
//! A fixed-depth, append-only indexed accumulator over Poseidon
//! commitments. Leaves are assigned monotonically increasing indices at
//! insertion and are immutable afterwards — no update, no delete. The
//! root is a pure function of the ordered `(index, commitment)` set and
//! the depth's empty-subtree constants, so replaying the insert log on a
//! fresh accumulator reproduces the root bit-for-bit.
//!
//! ## Structure
//!
//! Only the nodes on inserted paths are materialized; everything else is
//! covered by the empty-subtree constant chain `empty[0] = 0`,
//! `empty[l+1] = H(empty[l], empty[l])`. Insertion recomputes the
//! O(depth) path from leaf to root.
//!
//! ## Path-Bit Convention
//!
//! Bit `l` of the leaf index selects the argument order at level `l`:
//! bit 0 ⇒ the running node is the LEFT argument `H(node, sibling)`,
//! bit 1 ⇒ the RIGHT argument `H(sibling, node)`. This must match the
//! argument order of [`CommitmentHasher::hash2`] — see the convention
//! note there.
//!
//! ## Concurrency
//!
//! This struct is not internally synchronized. Insertion is
//! read-then-write over the node map, so writers must be mutually
//! exclusive and readers must not observe an in-flight insert. Use one
//! accumulator per owner or wrap it in [`SharedAccumulator`].
//!
//! [`SharedAccumulator`]: crate::shared::SharedAccumulator

use std::collections::{HashMap, HashSet};

use ark_bn254::Fr;
use ark_ff::Zero;
use serde::{Deserialize, Serialize};

use crate::error::AccumulatorError;
use crate::field::{fr_hex, fr_hex_vec, fr_to_hex};
use crate::poseidon::CommitmentHasher;

/// Maximum supported tree depth; leaf indices must fit in a `u64`.
pub const MAX_DEPTH: u32 = 63;

/// Receipt for a successful insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertReceipt {
    /// Root before the insertion.
    #[serde(with = "fr_hex")]
    pub old_root: Fr,
    /// Root after the insertion.
    #[serde(with = "fr_hex")]
    pub new_root: Fr,
    /// The index assigned to the new leaf.
    pub index: u64,
    /// The inserted commitment.
    #[serde(with = "fr_hex")]
    pub commitment: Fr,
}

/// An inclusion proof for one leaf: enough to recompute the claimed root
/// without any other tree state.
///
/// Validity means recomputing the root from `leaf`, `siblings`, and
/// `path_bits` yields `root`. Whether `root` is the accumulator's LIVE
/// root is a separate freshness check the caller performs against
/// [`SparseMerkleAccumulator::root`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusionProof {
    /// The leaf commitment being proven.
    #[serde(with = "fr_hex")]
    pub leaf: Fr,
    /// Sibling hashes from leaf level to the root's children (length D).
    #[serde(with = "fr_hex_vec")]
    pub siblings: Vec<Fr>,
    /// Path bits from leaf level upward: `false` = running node is the
    /// left argument at that level (length D).
    pub path_bits: Vec<bool>,
    /// The root this proof claims to recompute.
    #[serde(with = "fr_hex")]
    pub root: Fr,
}

/// A fixed-depth sparse Merkle accumulator over commitments.
#[derive(Debug, Clone)]
pub struct SparseMerkleAccumulator {
    /// Fixed tree depth D; capacity is 2^D leaves.
    depth: u32,
    /// Materialized nodes on inserted paths, keyed by `(level, index)`.
    /// Level 0 is the leaf level; level `depth` holds only the root.
    nodes: HashMap<(u32, u64), Fr>,
    /// Commitment → leaf index, for O(1) duplicate checks and lookups.
    leaf_index: HashMap<Fr, u64>,
    /// Ordered insert log; position is the leaf index.
    leaves: Vec<Fr>,
    /// Empty-subtree constants, `empty[l]` for levels 0..=depth.
    empty: Vec<Fr>,
    /// Current root.
    root: Fr,
}

impl SparseMerkleAccumulator {
    /// Create an empty accumulator of the given depth.
    ///
    /// The empty root is `empty[depth]` from the constant chain
    /// `empty[0] = 0`, `empty[l+1] = H(empty[l], empty[l])`.
    pub fn new(depth: u32) -> Result<Self, AccumulatorError> {
        if depth == 0 || depth > MAX_DEPTH {
            return Err(AccumulatorError::InvalidDepth { depth });
        }
        let mut empty = Vec::with_capacity(depth as usize + 1);
        empty.push(Fr::zero());
        for level in 0..depth {
            let e = empty[level as usize];
            empty.push(CommitmentHasher::hash2(e, e)?);
        }
        let root = empty[depth as usize];
        Ok(Self {
            depth,
            nodes: HashMap::new(),
            leaf_index: HashMap::new(),
            leaves: Vec::new(),
            empty,
            root,
        })
    }

    /// Rebuild an accumulator by replaying an ordered insert log.
    ///
    /// Replay is the persistence contract: the resulting accumulator is
    /// identical (same root, same indices) to the one that produced the
    /// log.
    pub fn from_log(depth: u32, commitments: &[Fr]) -> Result<Self, AccumulatorError> {
        let mut acc = Self::new(depth)?;
        for c in commitments {
            acc.insert(*c)?;
        }
        Ok(acc)
    }

    /// The fixed tree depth.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Maximum number of leaves: 2^depth.
    pub fn capacity(&self) -> u64 {
        1u64 << self.depth
    }

    /// Number of leaves inserted so far.
    pub fn leaf_count(&self) -> u64 {
        self.leaves.len() as u64
    }

    /// The current root.
    pub fn root(&self) -> Fr {
        self.root
    }

    /// Whether a commitment has been inserted.
    pub fn contains(&self, commitment: &Fr) -> bool {
        self.leaf_index.contains_key(commitment)
    }

    /// The index a commitment was inserted at, if any.
    pub fn index_of(&self, commitment: &Fr) -> Option<u64> {
        self.leaf_index.get(commitment).copied()
    }

    /// The ordered insert log as `(index, commitment)` pairs.
    pub fn insert_log(&self) -> Vec<(u64, Fr)> {
        self.leaves
            .iter()
            .enumerate()
            .map(|(i, c)| (i as u64, *c))
            .collect()
    }

    /// Node at `(level, index)`, falling back to the empty-subtree
    /// constant for that level.
    fn node(&self, level: u32, index: u64) -> Fr {
        self.nodes
            .get(&(level, index))
            .copied()
            .unwrap_or(self.empty[level as usize])
    }

    /// Insert a commitment, assigning it the next leaf index.
    ///
    /// Fails with [`AccumulatorError::DuplicateLeaf`] if the commitment
    /// is already present and [`AccumulatorError::CapacityExceeded`] if
    /// the tree is full. The update is atomic: node writes are staged and
    /// only applied once the whole path has hashed cleanly, so no error
    /// leaves the tree partially updated.
    pub fn insert(&mut self, commitment: Fr) -> Result<InsertReceipt, AccumulatorError> {
        if self.contains(&commitment) {
            return Err(AccumulatorError::DuplicateLeaf {
                commitment: fr_to_hex(&commitment),
            });
        }
        if self.leaf_count() == self.capacity() {
            return Err(AccumulatorError::CapacityExceeded {
                depth: self.depth,
                capacity: self.capacity(),
            });
        }

        let index = self.leaves.len() as u64;
        let mut staged: Vec<((u32, u64), Fr)> = Vec::with_capacity(self.depth as usize + 1);
        staged.push(((0, index), commitment));

        let mut cur = commitment;
        let mut idx = index;
        for level in 0..self.depth {
            let sibling = self.node(level, idx ^ 1);
            cur = if idx & 1 == 0 {
                CommitmentHasher::hash2(cur, sibling)?
            } else {
                CommitmentHasher::hash2(sibling, cur)?
            };
            idx >>= 1;
            staged.push(((level + 1, idx), cur));
        }

        let old_root = self.root;
        for (key, value) in staged {
            self.nodes.insert(key, value);
        }
        self.root = cur;
        self.leaves.push(commitment);
        self.leaf_index.insert(commitment, index);

        tracing::debug!(index, root = %fr_to_hex(&self.root), "leaf inserted");

        Ok(InsertReceipt {
            old_root,
            new_root: cur,
            index,
            commitment,
        })
    }

    /// Insert a batch of commitments in order.
    ///
    /// All-or-nothing: if any member is already present, is repeated
    /// within the batch, or would exceed capacity, no leaf is inserted
    /// and the accumulator is unchanged. Returns the receipts in batch
    /// order.
    pub fn insert_batch(
        &mut self,
        commitments: &[Fr],
    ) -> Result<Vec<InsertReceipt>, AccumulatorError> {
        if self.leaf_count() + commitments.len() as u64 > self.capacity() {
            return Err(AccumulatorError::CapacityExceeded {
                depth: self.depth,
                capacity: self.capacity(),
            });
        }
        let mut seen: HashSet<Fr> = HashSet::with_capacity(commitments.len());
        for c in commitments {
            if self.contains(c) || !seen.insert(*c) {
                return Err(AccumulatorError::DuplicateLeaf {
                    commitment: fr_to_hex(c),
                });
            }
        }

        // Apply on a working copy and swap, so a mid-batch hash failure
        // cannot leave a partial commit.
        let mut staged = self.clone();
        let mut receipts = Vec::with_capacity(commitments.len());
        for c in commitments {
            receipts.push(staged.insert(*c)?);
        }
        *self = staged;
        Ok(receipts)
    }

    /// Build an inclusion proof for an inserted commitment.
    ///
    /// Fails with [`AccumulatorError::LeafNotFound`] if the commitment
    /// was never inserted.
    pub fn generate_proof(&self, commitment: &Fr) -> Result<InclusionProof, AccumulatorError> {
        let index = self
            .index_of(commitment)
            .ok_or_else(|| AccumulatorError::LeafNotFound {
                commitment: fr_to_hex(commitment),
            })?;

        let mut siblings = Vec::with_capacity(self.depth as usize);
        let mut path_bits = Vec::with_capacity(self.depth as usize);
        let mut idx = index;
        for level in 0..self.depth {
            siblings.push(self.node(level, idx ^ 1));
            path_bits.push(idx & 1 == 1);
            idx >>= 1;
        }

        Ok(InclusionProof {
            leaf: *commitment,
            siblings,
            path_bits,
            root: self.root,
        })
    }

    /// Verify an inclusion proof against its own claimed root.
    ///
    /// Pure: uses only the proof's contents — no tree state. Returns
    /// `false` for malformed proofs rather than erroring. Checking the
    /// claimed root against the live [`root()`](Self::root) is the
    /// caller's freshness responsibility.
    pub fn verify_proof(proof: &InclusionProof) -> bool {
        if proof.siblings.len() != proof.path_bits.len() || proof.siblings.is_empty() {
            return false;
        }
        let mut cur = proof.leaf;
        for (sibling, bit) in proof.siblings.iter().zip(proof.path_bits.iter()) {
            let combined = if *bit {
                CommitmentHasher::hash2(*sibling, cur)
            } else {
                CommitmentHasher::hash2(cur, *sibling)
            };
            cur = match combined {
                Ok(h) => h,
                Err(_) => return false,
            };
        }
        cur == proof.root
    }
}
