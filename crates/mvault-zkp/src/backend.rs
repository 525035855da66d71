//! # Proof Backends
//!
//! The real-or-mock duality is a tagged variant selected once at
//! construction, not a class hierarchy with fallback via exception
//! interception. [`ProofBackend::Real`] carries an injected
//! [`CircuitProver`]; [`ProofBackend::Mock`] carries nothing and
//! synthesizes deterministic artifacts. Both paths are equally
//! testable: tests inject stub provers to exercise failure and timeout
//! handling without circuit tooling installed.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ark_bn254::Fr;

use mvault_policy::MemoryStatus;

use crate::artifact::{ProofArtifact, PublicSignals};
use crate::error::{ProofError, VerifyError};

/// File name of the compiled witness generator.
const CIRCUIT_WASM: &str = "policy.wasm";
/// File name of the Groth16 proving key.
const PROVING_KEY: &str = "policy_final.zkey";
/// File name of the verification parameters.
const VERIFICATION_KEY: &str = "verification_key.json";

/// Paths to the on-disk circuit artifacts a real prover needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitArtifacts {
    /// Compiled witness generator.
    pub circuit_wasm: PathBuf,
    /// Proving key.
    pub proving_key: PathBuf,
    /// Verification parameters for the verifier side.
    pub verification_key: PathBuf,
}

impl CircuitArtifacts {
    /// Probe a directory for the full artifact set.
    ///
    /// Returns `None` unless all three files exist; a partial set is
    /// treated as no backend, since proving would fail midway.
    pub fn probe(dir: &Path) -> Option<Self> {
        let artifacts = Self {
            circuit_wasm: dir.join(CIRCUIT_WASM),
            proving_key: dir.join(PROVING_KEY),
            verification_key: dir.join(VERIFICATION_KEY),
        };
        let complete = artifacts.circuit_wasm.is_file()
            && artifacts.proving_key.is_file()
            && artifacts.verification_key.is_file();
        if complete {
            tracing::debug!(dir = %dir.display(), "circuit artifacts found");
            Some(artifacts)
        } else {
            tracing::debug!(dir = %dir.display(), "circuit artifacts incomplete or absent");
            None
        }
    }
}

/// The private inputs consumed when producing a real proof.
///
/// Never serialized and never logged; the pipeline hands it to the
/// prover and drops it.
#[derive(Clone)]
pub struct PrivateWitness {
    /// The memory fragment content.
    pub content: Vec<u8>,
    /// The commitment salt.
    pub salt: Fr,
    /// Lifecycle status of the fragment.
    pub status: MemoryStatus,
    /// Key version the fragment was encrypted under.
    pub key_version: u32,
}

impl fmt::Debug for PrivateWitness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Private material stays out of debug output.
        f.debug_struct("PrivateWitness")
            .field("content", &format!("<{} bytes>", self.content.len()))
            .field("salt", &"<redacted>")
            .field("status", &self.status)
            .field("key_version", &self.key_version)
            .finish()
    }
}

/// A real proving backend: consumes a witness, returns opaque proof
/// bytes whose wire format the pipeline never inspects.
///
/// Implementations wrap external circuit tooling (witness generator
/// plus Groth16 prover over the artifacts in [`CircuitArtifacts`]).
/// `prove` is synchronous and long-running; the pipeline invokes it on
/// a blocking thread under an enforced timeout.
pub trait CircuitProver: Send + Sync {
    /// Generate a proof for the public signals using the witness.
    fn prove(
        &self,
        signals: &PublicSignals,
        witness: &PrivateWitness,
    ) -> Result<Vec<u8>, ProofError>;

    /// Verify a real artifact against stored verification parameters.
    fn verify(&self, artifact: &ProofArtifact) -> Result<bool, VerifyError>;
}

/// The backend a pipeline was constructed with.
#[derive(Clone)]
pub enum ProofBackend {
    /// A real prover is available.
    Real(Arc<dyn CircuitProver>),
    /// No circuit artifacts; all proofs are deterministic mocks.
    Mock,
}

impl ProofBackend {
    /// Wrap an injected prover.
    pub fn real(prover: Arc<dyn CircuitProver>) -> Self {
        Self::Real(prover)
    }

    /// Whether this backend produces real proofs.
    pub fn is_real(&self) -> bool {
        matches!(self, Self::Real(_))
    }
}

impl fmt::Debug for ProofBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real(_) => f.write_str("ProofBackend::Real"),
            Self::Mock => f.write_str("ProofBackend::Mock"),
        }
    }
}
