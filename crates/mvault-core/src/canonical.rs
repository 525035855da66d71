//! # Canonical Serialization
//!
//! This module defines [`CanonicalBytes`], the sole construction path for
//! bytes used in digest computation across the Memvault Stack.
//!
//! ## Security Invariant
//!
//! The inner `Vec<u8>` is private. The only way to construct
//! `CanonicalBytes` is through [`CanonicalBytes::new()`], which applies the
//! full coercion pipeline before serialization. Any function that computes
//! a digest accepts `&CanonicalBytes`, never raw `&[u8]` — so a "wrong
//! serialization path" defect cannot exist in the first place.
//!
//! This matters here because proof hashes and audit record digests must be
//! reproducible by independent verifiers: two parties serializing the same
//! public signals must obtain the same bytes.
//!
//! ## Coercion Rules
//!
//! 1. Reject floats — numeric values must be strings or integers.
//! 2. Normalize RFC 3339 datetime strings to UTC with `Z` suffix,
//!    truncated to seconds.
//! 3. Object keys are serialized in lexicographic order.
//! 4. Compact separators (no whitespace).

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by deterministic canonicalization.
///
/// The inner `Vec<u8>` is private — downstream code cannot construct
/// `CanonicalBytes` except through [`CanonicalBytes::new()`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// Applies the full coercion pipeline before serialization. This is
    /// the ONLY way to construct `CanonicalBytes`; all digest computation
    /// in the stack flows through this constructor.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        let coerced = coerce_json_value(value)?;
        let bytes = serialize_canonical(&coerced)?;
        Ok(Self(bytes))
    }

    /// Access the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume and return the inner byte vector.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Recursively coerce JSON values according to the canonicalization rules.
fn coerce_json_value(value: Value) -> Result<Value, CanonicalizationError> {
    match value {
        Value::Number(n) => {
            // Reject pure floats — values must be strings or integers.
            if let Some(f) = n.as_f64() {
                if n.is_f64() && !n.is_i64() && !n.is_u64() {
                    return Err(CanonicalizationError::FloatRejected(f));
                }
            }
            Ok(Value::Number(n))
        }
        Value::Object(map) => {
            let mut coerced = serde_json::Map::new();
            for (k, v) in map {
                coerced.insert(k, coerce_json_value(v)?);
            }
            Ok(Value::Object(coerced))
        }
        Value::Array(arr) => {
            let coerced: Result<Vec<_>, _> = arr.into_iter().map(coerce_json_value).collect();
            Ok(Value::Array(coerced?))
        }
        Value::String(s) => {
            // Datetime normalization: if the string parses as RFC 3339,
            // normalize to UTC with Z suffix, truncated to seconds.
            if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(&s) {
                let utc = dt.with_timezone(&chrono::Utc);
                Ok(Value::String(utc.format("%Y-%m-%dT%H:%M:%SZ").to_string()))
            } else {
                Ok(Value::String(s))
            }
        }
        // Bool and Null pass through unchanged.
        other => Ok(other),
    }
}

/// Serialize a JSON value with sorted keys and compact separators.
fn serialize_canonical(value: &Value) -> Result<Vec<u8>, CanonicalizationError> {
    // serde_json::Map is configured with the `preserve_order` feature OFF
    // in this workspace, so maps iterate in sorted key order and `to_vec`
    // produces compact output.
    Ok(serde_json::to_vec(value)?)
}
