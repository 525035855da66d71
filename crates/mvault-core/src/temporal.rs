//! # Temporal Types
//!
//! UTC-only timestamp type for the Memvault Stack. All timestamps are
//! stored in UTC with second-level precision and a `Z` suffix in
//! serialized form.
//!
//! ## Design Decision
//!
//! Audit records and proof artifacts are compared and digested across
//! machines in different time zones. To keep those digests reproducible,
//! all timestamps are UTC with subsecond precision truncated during
//! canonicalization. Local time is a presentation concern for consumers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A UTC timestamp with second-level precision.
///
/// Serializes to ISO 8601 with `Z` suffix (e.g. `2026-01-15T12:00:00Z`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp representing the current UTC time.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Parse an ISO 8601 / RFC 3339 string into a UTC timestamp.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(|e| ValidationError::InvalidTimestamp {
                value: s.to_string(),
                reason: e.to_string(),
            })
    }

    /// Access the underlying `chrono::DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Return the timestamp as an ISO 8601 string with Z suffix,
    /// truncated to seconds (matching canonicalization rules).
    pub fn to_canonical_string(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}
