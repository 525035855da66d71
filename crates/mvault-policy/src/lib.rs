#![deny(missing_docs)]

//! # mvault-policy — Sensitivity Policy Engine
//!
//! Pure allow/block evaluation for agent access to private memory
//! fragments, and the audit operation records that successful operations
//! emit toward an external compliance log.
//!
//! ## Architecture
//!
//! - **Evaluator** ([`evaluator`]): the deterministic decision function
//!   over memory status, key-version window, and content-pattern flags.
//!   No I/O, no clock, no state — identical inputs produce identical
//!   decisions everywhere.
//!
//! - **Audit** ([`audit`]): per-operation summary records
//!   `{action, subject_id, result_hash, timestamp}` with canonical
//!   digests, ready for an append-only hash-chained audit service. The
//!   chain itself lives outside this workspace.

pub mod audit;
pub mod evaluator;

pub use audit::{AuditAction, OperationRecord};
pub use evaluator::{
    KeyVersionWindow, MemoryStatus, PatternFlags, PolicyDecision, PolicyError, PolicyEvaluator,
    PolicyLabel,
};
