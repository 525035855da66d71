//! # Mock Proof Synthesis
//!
//! The deterministic fallback backend. Produces Groth16-shaped proof
//! blobs derived **only from public data**, so inspecting a mock blob
//! can never leak more than the public signals already reveal.
//!
//! ## Security Invariant
//!
//! The Groth16 shape (three curve-point fields, protocol and curve
//! tags) exists purely for structural compatibility with consumers of
//! real proofs. It has no cryptographic meaning: mock verification
//! checks shape and determinism, never soundness. Callers must branch
//! on `is_real_proof` before trusting a mock result.

use ark_bn254::Fr;
use ark_ff::PrimeField;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use mvault_crypto::field::fr_to_decimal;

use crate::artifact::{ProofArtifact, PublicSignals};
use crate::error::{ProofError, VerifyError};

/// Domain tag for mock blob derivation.
const MOCK_DOMAIN: &[u8] = b"mvault.mock.groth16.v1";

/// A Groth16-shaped proof blob: field coordinates as decimal strings,
/// in the layout circuit tooling emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockGroth16Proof {
    /// First proof element, affine coordinates plus projective `"1"`.
    pub pi_a: [String; 3],
    /// Second proof element, coordinate pairs over the extension field.
    pub pi_b: [[String; 2]; 3],
    /// Third proof element.
    pub pi_c: [String; 3],
    /// Protocol tag, always `"groth16"`.
    pub protocol: String,
    /// Curve tag, always `"bn128"`.
    pub curve: String,
}

/// Derive one deterministic coordinate from the seed and a slot tag.
fn coordinate(seed: &[u8; 32], slot: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(seed);
    hasher.update(slot.as_bytes());
    let digest = hasher.finalize();
    fr_to_decimal(&Fr::from_be_bytes_mod_order(&digest))
}

/// Synthesize the deterministic mock blob for a set of public signals.
///
/// Pure: identical signals yield byte-identical blobs, which is what
/// makes the mock-mode `proof_hash` usable as an idempotent lookup key.
pub fn synthesize_blob(signals: &PublicSignals) -> Result<Vec<u8>, ProofError> {
    let mut hasher = Sha256::new();
    hasher.update(MOCK_DOMAIN);
    for signal in signals.to_signal_strings() {
        hasher.update((signal.len() as u64).to_be_bytes());
        hasher.update(signal.as_bytes());
    }
    let seed: [u8; 32] = hasher.finalize().into();

    let proof = MockGroth16Proof {
        pi_a: [
            coordinate(&seed, "a.0"),
            coordinate(&seed, "a.1"),
            "1".to_string(),
        ],
        pi_b: [
            [coordinate(&seed, "b.0.0"), coordinate(&seed, "b.0.1")],
            [coordinate(&seed, "b.1.0"), coordinate(&seed, "b.1.1")],
            ["1".to_string(), "0".to_string()],
        ],
        pi_c: [
            coordinate(&seed, "c.0"),
            coordinate(&seed, "c.1"),
            "1".to_string(),
        ],
        protocol: "groth16".to_string(),
        curve: "bn128".to_string(),
    };

    serde_json::to_vec(&proof)
        .map_err(|e| ProofError::BackendUnavailable(format!("mock blob encoding failed: {e}")))
}

/// Structural verification of a mock artifact.
///
/// Checks the protocol and curve tags, then recomputes the blob and the
/// artifact hash from the public signals and compares both. Returns
/// `Ok(false)` on any mismatch; errors only on a blob that cannot be
/// parsed at all.
pub fn verify_structure(artifact: &ProofArtifact) -> Result<bool, VerifyError> {
    let proof: MockGroth16Proof = serde_json::from_slice(&artifact.proof_blob)
        .map_err(|e| VerifyError::MalformedArtifact(format!("mock blob not parseable: {e}")))?;

    if proof.protocol != "groth16" || proof.curve != "bn128" {
        return Ok(false);
    }

    let expected_blob = synthesize_blob(&artifact.public_signals)
        .map_err(|e| VerifyError::Backend(e.to_string()))?;
    if expected_blob != artifact.proof_blob {
        return Ok(false);
    }

    let expected_hash =
        ProofArtifact::compute_hash(&artifact.public_signals, &artifact.proof_blob);
    Ok(expected_hash == artifact.proof_hash)
}
