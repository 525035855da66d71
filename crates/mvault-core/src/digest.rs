//! # Content-Addressed Digests
//!
//! Defines [`ContentDigest`] and [`DigestAlgorithm`]. Every digest carries
//! an algorithm tag so that consumers of serialized digests never guess
//! which hash produced a value. Poseidon commitments live entirely in
//! `mvault-crypto` as field elements and are not `ContentDigest`s.
//!
//! ## Security Invariant
//!
//! [`sha256_digest()`] accepts only [`CanonicalBytes`] — not raw `&[u8]`.
//! Every SHA-256 digest in the system was therefore produced from properly
//! canonicalized data. The one sanctioned exception is
//! [`Sha256Accumulator`], used where canonical bytes must be concatenated
//! with raw binary material (mock proof synthesis); its call sites document
//! the exception.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;

/// The hash algorithm used to compute a digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigestAlgorithm {
    /// SHA-256 — standard content addressing (audit records, proof hashes).
    Sha256,
}

impl DigestAlgorithm {
    /// The algorithm identifier string used in serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
        }
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A content-addressed digest with its algorithm tag.
///
/// The 32-byte digest and its algorithm are always stored together so that
/// verification code never guesses which hash produced a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest {
    /// The hash algorithm that produced this digest.
    pub algorithm: DigestAlgorithm,
    /// The raw 32-byte digest value.
    pub bytes: [u8; 32],
}

impl ContentDigest {
    /// Create a new SHA-256 content digest from raw bytes.
    pub fn sha256(bytes: [u8; 32]) -> Self {
        Self {
            algorithm: DigestAlgorithm::Sha256,
            bytes,
        }
    }

    /// Return the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.to_hex())
    }
}

/// Compute a SHA-256 content digest from canonical bytes.
///
/// This is the standard digest computation path. The signature requires
/// [`CanonicalBytes`], so a digest over non-canonical data cannot compile.
pub fn sha256_digest(data: &CanonicalBytes) -> ContentDigest {
    let hash = Sha256::digest(data.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest::sha256(bytes)
}

/// Incremental SHA-256 over a sequence of byte slices.
///
/// Exists for the cases where a digest input is a composite of canonical
/// bytes and raw binary material (e.g. `canonical(signals) || proof_blob`).
/// Call sites must document why the plain [`sha256_digest()`] path does
/// not apply.
#[derive(Debug, Default)]
pub struct Sha256Accumulator {
    hasher: Sha256,
}

impl Sha256Accumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes into the accumulator.
    pub fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    /// Finalize and return the digest.
    pub fn finalize(self) -> ContentDigest {
        let hash = self.hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hash);
        ContentDigest::sha256(bytes)
    }

    /// Finalize and return the digest as lowercase hex.
    pub fn finalize_hex(self) -> String {
        self.finalize().to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sha256_digest_deterministic() {
        let cb = CanonicalBytes::new(&json!({"a": 1, "b": 2})).unwrap();
        assert_eq!(sha256_digest(&cb), sha256_digest(&cb));
    }

    #[test]
    fn known_vector_empty_object() {
        let cb = CanonicalBytes::new(&json!({})).unwrap();
        assert_eq!(cb.as_bytes(), b"{}");
        assert_eq!(
            sha256_digest(&cb).to_hex(),
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }

    #[test]
    fn display_includes_algorithm_tag() {
        let cb = CanonicalBytes::new(&json!({"k": "v"})).unwrap();
        let d = sha256_digest(&cb);
        let s = format!("{d}");
        assert!(s.starts_with("sha256:"));
        assert_eq!(s.len(), 7 + 64);
    }

    #[test]
    fn accumulator_matches_one_shot() {
        let cb = CanonicalBytes::new(&json!({"x": 9})).unwrap();
        let mut acc = Sha256Accumulator::new();
        acc.update(cb.as_bytes());
        assert_eq!(acc.finalize(), sha256_digest(&cb));
    }

    #[test]
    fn accumulator_order_matters() {
        let mut a = Sha256Accumulator::new();
        a.update(b"ab");
        a.update(b"c");
        let mut b = Sha256Accumulator::new();
        b.update(b"a");
        b.update(b"bc");
        // Same concatenation, same digest.
        assert_eq!(a.finalize_hex(), b.finalize_hex());

        let mut c = Sha256Accumulator::new();
        c.update(b"cba");
        let mut d = Sha256Accumulator::new();
        d.update(b"abc");
        assert_ne!(c.finalize_hex(), d.finalize_hex());
    }

    #[test]
    fn algorithm_tag_wire_format() {
        assert_eq!(
            serde_json::to_string(&DigestAlgorithm::Sha256).unwrap(),
            "\"sha256\""
        );
        assert_eq!(DigestAlgorithm::Sha256.as_str(), "sha256");
    }

    #[test]
    fn different_inputs_different_digests() {
        let c1 = CanonicalBytes::new(&json!({"a": 1})).unwrap();
        let c2 = CanonicalBytes::new(&json!({"a": 2})).unwrap();
        assert_ne!(sha256_digest(&c1), sha256_digest(&c2));
    }
}
