//! # Policy Evaluation
//!
//! The pure decision function that converts a memory fragment's status,
//! key-version window, and content-pattern flags into an allow/block
//! decision with a human-readable policy label.
//!
//! ## Gate Order (normative)
//!
//! Evaluation short-circuits in this exact order:
//!
//! 1. `status != ACTIVE` ⇒ BLOCK_ALL
//! 2. key version outside `[min, current]` (inclusive) ⇒ BLOCK_ALL
//! 3. `is_personal` ⇒ BLOCK_ALL (absolute veto among content flags)
//! 4. `is_finance` ⇒ ALLOW_FINANCE
//! 5. `is_health` ⇒ ALLOW_HEALTH
//! 6. otherwise ⇒ ALLOW_GENERAL
//!
//! Status and key-version gates are absolute vetoes checked before any
//! content flag. Once personal is ruled out, finance/health are
//! informative labels, not additive restrictions.
//!
//! ## Determinism
//!
//! Given identical inputs the decision is identical on every machine:
//! no clock, no randomness, no state. This is what makes the decision
//! embeddable in a proof's public signals.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from policy input construction.
#[derive(Error, Debug)]
pub enum PolicyError {
    /// A key-version window must satisfy `min <= current`.
    #[error("invalid key-version window: min {min} > current {current}")]
    InvalidKeyWindow {
        /// The window's minimum accepted version.
        min: u32,
        /// The window's current (maximum) version.
        current: u32,
    },
}

/// Lifecycle status of a memory fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemoryStatus {
    /// The fragment is live and usable.
    Active,
    /// The fragment was deleted by its owner.
    Deleted,
    /// Access to the fragment was revoked.
    Revoked,
}

/// Non-exclusive content-sensitivity flags. Public inputs: they describe
/// the fragment's category, never its content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternFlags {
    /// The fragment matches financial-data patterns.
    pub is_finance: bool,
    /// The fragment matches health-data patterns.
    pub is_health: bool,
    /// The fragment matches personal-identity patterns (absolute veto).
    pub is_personal: bool,
}

/// The accepted range of key versions, inclusive on both ends.
///
/// `current` only moves forward and `min` trails it as old key versions
/// are retired, so `min <= current` holds by construction — enforced
/// here at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyVersionWindow {
    /// Oldest still-accepted key version.
    pub min: u32,
    /// Current (newest) key version.
    pub current: u32,
}

impl KeyVersionWindow {
    /// Construct a validated window.
    pub fn new(min: u32, current: u32) -> Result<Self, PolicyError> {
        if min > current {
            return Err(PolicyError::InvalidKeyWindow { min, current });
        }
        Ok(Self { min, current })
    }

    /// Whether a key version falls inside the window (bounds inclusive).
    pub fn contains(&self, key_version: u32) -> bool {
        self.min <= key_version && key_version <= self.current
    }
}

/// The policy rule a decision fell under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyLabel {
    /// Finance-flagged fragment allowed for agent use.
    AllowFinance,
    /// Health-flagged fragment allowed for agent use.
    AllowHealth,
    /// Reserved label for personal-flagged fragments. Never produced by
    /// evaluation — personal is an absolute veto — but kept in the wire
    /// taxonomy for compatibility with consumers that enumerate labels.
    AllowPersonal,
    /// Unflagged fragment allowed for agent use.
    AllowGeneral,
    /// Access blocked: inactive status, stale key version, or personal
    /// content.
    BlockAll,
}

impl PolicyLabel {
    /// The label's wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllowFinance => "ALLOW_FINANCE",
            Self::AllowHealth => "ALLOW_HEALTH",
            Self::AllowPersonal => "ALLOW_PERSONAL",
            Self::AllowGeneral => "ALLOW_GENERAL",
            Self::BlockAll => "BLOCK_ALL",
        }
    }
}

impl std::fmt::Display for PolicyLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDecision {
    /// Whether the agent may use the fragment.
    pub allowed_for_agent: bool,
    /// Which rule produced the decision.
    pub label: PolicyLabel,
}

impl PolicyDecision {
    fn allow(label: PolicyLabel) -> Self {
        Self {
            allowed_for_agent: true,
            label,
        }
    }

    fn block() -> Self {
        Self {
            allowed_for_agent: false,
            label: PolicyLabel::BlockAll,
        }
    }
}

/// The pure policy decision function.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyEvaluator;

impl PolicyEvaluator {
    /// Evaluate the gates in normative order (see module docs).
    pub fn evaluate(
        status: MemoryStatus,
        key_version: u32,
        window: KeyVersionWindow,
        flags: PatternFlags,
    ) -> PolicyDecision {
        if status != MemoryStatus::Active {
            return PolicyDecision::block();
        }
        if !window.contains(key_version) {
            return PolicyDecision::block();
        }
        if flags.is_personal {
            return PolicyDecision::block();
        }
        if flags.is_finance {
            return PolicyDecision::allow(PolicyLabel::AllowFinance);
        }
        if flags.is_health {
            return PolicyDecision::allow(PolicyLabel::AllowHealth);
        }
        PolicyDecision::allow(PolicyLabel::AllowGeneral)
    }
}
