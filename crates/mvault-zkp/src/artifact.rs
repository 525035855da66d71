//! # Proof Artifacts and Public Signals
//!
//! A [`ProofArtifact`] is the immutable output of one `prove()` call:
//! an ordered set of public signals, an opaque proof blob, a flag
//! recording which backend produced it, and a content hash used as an
//! idempotent lookup key.
//!
//! ## Signal Ordering
//!
//! Public signals are exposed to verifiers as decimal strings in a
//! fixed order (matching circuit tooling conventions, where booleans
//! are `"0"`/`"1"` field elements):
//!
//! 1. `allowed_for_agent`
//! 2. `memory_commitment`
//! 3. `is_finance`
//! 4. `is_health`
//! 5. `is_personal`
//! 6. `current_key_version`
//! 7. `min_key_version`
//!
//! This order is a wire contract; reordering it invalidates every
//! stored `proof_hash`.

use ark_bn254::Fr;
use serde::{Deserialize, Serialize};

use mvault_core::Sha256Accumulator;
use mvault_crypto::field::{fr_hex, fr_to_decimal};
use mvault_policy::PolicyLabel;

/// Domain tag mixed into every artifact hash.
const PROOF_HASH_DOMAIN: &[u8] = b"mvault.proof.v1";

/// The disclosed outputs of a policy-evaluation proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicSignals {
    /// The decision bit: whether the agent may use the fragment.
    pub allowed_for_agent: bool,
    /// The public commitment the proof is bound to.
    #[serde(with = "fr_hex")]
    pub memory_commitment: Fr,
    /// Finance sensitivity flag (public input, echoed as a signal).
    pub is_finance: bool,
    /// Health sensitivity flag.
    pub is_health: bool,
    /// Personal sensitivity flag.
    pub is_personal: bool,
    /// Current (newest) key version of the accepting window.
    pub current_key_version: u32,
    /// Oldest still-accepted key version.
    pub min_key_version: u32,
}

impl PublicSignals {
    /// Render the signals as decimal strings in the normative order.
    pub fn to_signal_strings(&self) -> Vec<String> {
        vec![
            bool_signal(self.allowed_for_agent).to_string(),
            fr_to_decimal(&self.memory_commitment),
            bool_signal(self.is_finance).to_string(),
            bool_signal(self.is_health).to_string(),
            bool_signal(self.is_personal).to_string(),
            self.current_key_version.to_string(),
            self.min_key_version.to_string(),
        ]
    }

    /// Fold the ordered signals into a hash accumulator with length
    /// framing, so no two distinct signal lists collide by
    /// concatenation.
    pub(crate) fn absorb(&self, acc: &mut Sha256Accumulator) {
        for signal in self.to_signal_strings() {
            acc.update(&(signal.len() as u64).to_be_bytes());
            acc.update(signal.as_bytes());
        }
    }
}

fn bool_signal(b: bool) -> &'static str {
    if b {
        "1"
    } else {
        "0"
    }
}

/// The immutable output of one `prove()` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofArtifact {
    /// Ordered public signals the proof exposes.
    pub public_signals: PublicSignals,
    /// Which policy rule the decision fell under.
    pub policy_label: PolicyLabel,
    /// Opaque proof bytes. Backend wire format if real; a synthetic
    /// shape-compatible blob derived only from public data if mock.
    #[serde(with = "blob_hex")]
    pub proof_blob: Vec<u8>,
    /// Whether a real proving backend produced the blob. Callers must
    /// branch on this before trusting a verification result for
    /// compliance purposes.
    pub is_real_proof: bool,
    /// Content hash of the artifact (hex), used as an idempotent lookup
    /// key. In mock mode this is a pure function of the public signals.
    pub proof_hash: String,
}

impl ProofArtifact {
    /// Compute the content hash of (signals, blob).
    pub fn compute_hash(signals: &PublicSignals, blob: &[u8]) -> String {
        let mut acc = Sha256Accumulator::new();
        acc.update(PROOF_HASH_DOMAIN);
        signals.absorb(&mut acc);
        acc.update(blob);
        acc.finalize_hex()
    }
}

/// Serde adapter for the proof blob, serialized as lowercase hex.
mod blob_hex {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(blob: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let hex: String = blob.iter().map(|b| format!("{b:02x}")).collect();
        serializer.serialize_str(&hex)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex = String::deserialize(deserializer)?;
        if hex.len() % 2 != 0 {
            return Err(serde::de::Error::custom("odd-length hex blob"));
        }
        hex.as_bytes()
            .chunks(2)
            .map(|chunk| {
                let s = std::str::from_utf8(chunk).map_err(serde::de::Error::custom)?;
                u8::from_str_radix(s, 16).map_err(serde::de::Error::custom)
            })
            .collect()
    }
}
