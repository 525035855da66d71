//! # Field Encoding — Byte Strings into the BN254 Scalar Field
//!
//! Deterministic, pure mapping of arbitrary byte strings to field
//! elements: `encode(bytes) = SHA256(bytes) mod p`. The digest step
//! supplies pre-image resistance; the reduction guarantees field
//! membership. Same input ⇒ same element, across processes and time.
//!
//! Also provides the hex/decimal conversions and serde helpers used
//! wherever field elements cross a serialization boundary (inclusion
//! proofs, public signals).

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use sha2::{Digest, Sha256};
use std::str::FromStr;

use crate::error::CryptoError;

/// Deterministic encoder from byte strings to BN254 scalar field elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldEncoder;

impl FieldEncoder {
    /// Encode a byte string as a field element.
    ///
    /// Computes SHA-256 of the input and reduces the 256-bit digest into
    /// the field. The reduction loses at most two bits of the digest;
    /// collision resistance is inherited from SHA-256.
    pub fn encode(data: &[u8]) -> Fr {
        let digest = Sha256::digest(data);
        Fr::from_be_bytes_mod_order(&digest)
    }

    /// Encode a string after lowercasing it.
    ///
    /// Used by the relevance ranker so that query fingerprints are
    /// case-insensitive.
    pub fn encode_lowercase(text: &str) -> Fr {
        Self::encode(text.to_lowercase().as_bytes())
    }
}

/// Big-endian 32-byte encoding of a field element.
pub fn fr_to_bytes_be(fr: &Fr) -> [u8; 32] {
    let bytes = fr.into_bigint().to_bytes_be();
    let mut out = [0u8; 32];
    out.copy_from_slice(&bytes);
    out
}

/// Decode a canonical big-endian 32-byte encoding into a field element.
///
/// Rejects non-canonical encodings (values ≥ p): the round trip through
/// the field must reproduce the input bytes exactly.
pub fn fr_from_bytes_be(bytes: &[u8]) -> Result<Fr, CryptoError> {
    if bytes.len() != 32 {
        return Err(CryptoError::FieldDecode(format!(
            "expected 32 bytes, got {}",
            bytes.len()
        )));
    }
    let fr = Fr::from_be_bytes_mod_order(bytes);
    if fr_to_bytes_be(&fr) != bytes {
        return Err(CryptoError::FieldDecode(
            "encoding is not a canonical field element (value >= modulus)".to_string(),
        ));
    }
    Ok(fr)
}

/// Render a field element as 64 lowercase hex chars (big-endian).
pub fn fr_to_hex(fr: &Fr) -> String {
    fr_to_bytes_be(fr).iter().map(|b| format!("{b:02x}")).collect()
}

/// Parse 64 hex chars into a field element. Rejects non-canonical values.
pub fn fr_from_hex(hex: &str) -> Result<Fr, CryptoError> {
    let hex = hex.trim().to_lowercase();
    if hex.len() != 64 {
        return Err(CryptoError::HexDecode(format!(
            "expected 64 hex chars, got {}",
            hex.len()
        )));
    }
    let mut bytes = [0u8; 32];
    for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
        let s = std::str::from_utf8(chunk)
            .map_err(|e| CryptoError::HexDecode(format!("invalid hex: {e}")))?;
        bytes[i] = u8::from_str_radix(s, 16)
            .map_err(|e| CryptoError::HexDecode(format!("invalid hex at byte {i}: {e}")))?;
    }
    fr_from_bytes_be(&bytes)
}

/// Render a field element as its decimal string (the representation used
/// in public signals, matching circuit tooling conventions).
pub fn fr_to_decimal(fr: &Fr) -> String {
    fr.into_bigint().to_string()
}

/// Parse a decimal string into a field element.
pub fn fr_from_decimal(s: &str) -> Result<Fr, CryptoError> {
    Fr::from_str(s.trim())
        .map_err(|_| CryptoError::FieldDecode(format!("not a decimal field element: \"{s}\"")))
}

/// Serde adapter for `Fr` fields, serialized as 64 hex chars.
pub mod fr_hex {
    use super::{fr_from_hex, fr_to_hex};
    use ark_bn254::Fr;
    use serde::{self, Deserialize, Deserializer, Serializer};

    /// Serialize a field element as a hex string.
    pub fn serialize<S>(fr: &Fr, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&fr_to_hex(fr))
    }

    /// Deserialize a field element from a hex string.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Fr, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        fr_from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for `Vec<Fr>` fields, serialized as hex strings.
pub mod fr_hex_vec {
    use super::{fr_from_hex, fr_to_hex};
    use ark_bn254::Fr;
    use serde::{self, Deserialize, Deserializer, Serializer};

    /// Serialize a vector of field elements as hex strings.
    pub fn serialize<S>(frs: &[Fr], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let hexes: Vec<String> = frs.iter().map(fr_to_hex).collect();
        serde::Serialize::serialize(&hexes, serializer)
    }

    /// Deserialize a vector of field elements from hex strings.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Fr>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hexes = Vec::<String>::deserialize(deserializer)?;
        hexes
            .iter()
            .map(|h| fr_from_hex(h).map_err(serde::de::Error::custom))
            .collect()
    }
}
