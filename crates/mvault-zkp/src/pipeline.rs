//! # Proof Pipeline
//!
//! Orchestrates one `prove()` request end to end: witness binding,
//! policy evaluation, backend invocation, and fallback.
//!
//! ## Security Invariant
//!
//! The binding check runs before any backend call: a witness that does
//! not recompute to the supplied commitment fails with
//! [`ProofError::Binding`] and the prover never sees it. Backend
//! failure and timeout are the only conditions that degrade to a mock
//! proof, and the degradation is always visible via `is_real_proof`.
//! Bounded worst-case latency is chosen over always using the
//! strongest proof.

use std::sync::Arc;
use std::time::Duration;

use ark_bn254::Fr;

use mvault_crypto::field::{fr_to_bytes_be, fr_to_hex};
use mvault_crypto::{CommitmentHasher, FieldEncoder};
use mvault_policy::{
    KeyVersionWindow, MemoryStatus, PatternFlags, PolicyDecision, PolicyEvaluator, PolicyLabel,
};

use crate::artifact::{ProofArtifact, PublicSignals};
use crate::backend::{CircuitProver, PrivateWitness, ProofBackend};
use crate::error::{ProofError, VerifyError};
use crate::mock;

/// Domain tag for the derived-witness salt.
const DERIVED_SALT_DOMAIN: &[u8] = b"mvault.derived.salt.v1";

/// Default cap on real-backend proving time.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// One proof request.
///
/// `content` and `salt` must be supplied together. Omitting both
/// requests derived-witness mode (see [`ProofPipeline::prove`]).
#[derive(Debug, Clone)]
pub struct ProveRequest {
    /// The public commitment the proof must bind to.
    pub memory_commitment: Fr,
    /// The private fragment content, if available at call time.
    pub content: Option<Vec<u8>>,
    /// The commitment salt, if available at call time.
    pub salt: Option<Fr>,
    /// Lifecycle status of the fragment.
    pub status: MemoryStatus,
    /// Key version the fragment was encrypted under.
    pub key_version: u32,
    /// The accepted key-version window.
    pub window: KeyVersionWindow,
    /// Content-sensitivity flags.
    pub flags: PatternFlags,
}

/// The proof pipeline: one backend, one timeout, selected at
/// construction. Stateless across requests; cheap to clone and share.
#[derive(Debug, Clone)]
pub struct ProofPipeline {
    backend: ProofBackend,
    timeout: Duration,
    fallback_enabled: bool,
}

impl ProofPipeline {
    /// Build a pipeline over the given backend with the default timeout
    /// and fallback enabled.
    pub fn new(backend: ProofBackend) -> Self {
        Self {
            backend,
            timeout: DEFAULT_TIMEOUT,
            fallback_enabled: true,
        }
    }

    /// Override the real-backend timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Disable mock fallback: backend failure becomes a hard error.
    pub fn without_fallback(mut self) -> Self {
        self.fallback_enabled = false;
        self
    }

    /// The backend this pipeline was constructed with.
    pub fn backend(&self) -> &ProofBackend {
        &self.backend
    }

    /// Produce a proof artifact for one request.
    ///
    /// A blocked policy decision is not an error: the artifact carries
    /// `allowed_for_agent = false` and verifies like any other.
    ///
    /// If both `content` and `salt` are omitted the witness is derived
    /// deterministically from the commitment itself. This is a
    /// documented weakening for callers that no longer hold the
    /// fragment: the binding check is skipped (a derived witness cannot
    /// recompute to an independently produced commitment) and the mode
    /// is logged at warning level. Real deployments must supply the
    /// true witness.
    ///
    /// # Errors
    ///
    /// [`ProofError::Binding`] if the witness does not recompute to the
    /// supplied commitment; [`ProofError::InvalidWitness`] if only one
    /// of content/salt is present; [`ProofError::BackendUnavailable`]
    /// if the real backend fails and fallback is disabled.
    pub async fn prove(&self, request: ProveRequest) -> Result<ProofArtifact, ProofError> {
        let witness = Self::resolve_witness(&request)?;

        let decision = PolicyEvaluator::evaluate(
            request.status,
            request.key_version,
            request.window,
            request.flags,
        );
        let signals = Self::signals(&request, decision);

        match &self.backend {
            ProofBackend::Mock => Self::mock_artifact(signals, decision.label),
            ProofBackend::Real(prover) => {
                match self.real_prove(Arc::clone(prover), signals, witness).await {
                    Ok(blob) => Ok(ProofArtifact {
                        proof_hash: ProofArtifact::compute_hash(&signals, &blob),
                        public_signals: signals,
                        policy_label: decision.label,
                        proof_blob: blob,
                        is_real_proof: true,
                    }),
                    Err(ProofError::BackendUnavailable(reason)) if self.fallback_enabled => {
                        tracing::warn!(%reason, "real backend unavailable, falling back to mock proof");
                        Self::mock_artifact(signals, decision.label)
                    }
                    Err(e) => Err(e),
                }
            }
        }
    }

    /// Verify a proof artifact.
    ///
    /// Real artifacts delegate to the backend verifier; mock artifacts
    /// get structural checks only. Callers must branch on
    /// `is_real_proof` before trusting a mock result for compliance
    /// purposes.
    pub fn verify(&self, artifact: &ProofArtifact) -> Result<bool, VerifyError> {
        if artifact.is_real_proof {
            match &self.backend {
                ProofBackend::Real(prover) => prover.verify(artifact),
                ProofBackend::Mock => Err(VerifyError::VerifierUnavailable(
                    "artifact claims a real proof but this pipeline has no real verifier"
                        .to_string(),
                )),
            }
        } else {
            mock::verify_structure(artifact)
        }
    }

    // ---- internals ----

    fn resolve_witness(request: &ProveRequest) -> Result<PrivateWitness, ProofError> {
        let (content, salt) = match (&request.content, request.salt) {
            (Some(content), Some(salt)) => {
                let recomputed = CommitmentHasher::commit_bytes(content, salt)?;
                if recomputed != request.memory_commitment {
                    return Err(ProofError::Binding {
                        expected: fr_to_hex(&request.memory_commitment),
                        actual: fr_to_hex(&recomputed),
                    });
                }
                (content.clone(), salt)
            }
            (None, None) => {
                tracing::warn!(
                    commitment = %fr_to_hex(&request.memory_commitment),
                    "no witness supplied, deriving content and salt from the commitment"
                );
                let bytes = fr_to_bytes_be(&request.memory_commitment);
                let mut salt_input = DERIVED_SALT_DOMAIN.to_vec();
                salt_input.extend_from_slice(&bytes);
                (bytes.to_vec(), FieldEncoder::encode(&salt_input))
            }
            _ => {
                return Err(ProofError::InvalidWitness(
                    "content and salt must be supplied together".to_string(),
                ));
            }
        };
        Ok(PrivateWitness {
            content,
            salt,
            status: request.status,
            key_version: request.key_version,
        })
    }

    fn signals(request: &ProveRequest, decision: PolicyDecision) -> PublicSignals {
        PublicSignals {
            allowed_for_agent: decision.allowed_for_agent,
            memory_commitment: request.memory_commitment,
            is_finance: request.flags.is_finance,
            is_health: request.flags.is_health,
            is_personal: request.flags.is_personal,
            current_key_version: request.window.current,
            min_key_version: request.window.min,
        }
    }

    fn mock_artifact(
        signals: PublicSignals,
        label: PolicyLabel,
    ) -> Result<ProofArtifact, ProofError> {
        let blob = mock::synthesize_blob(&signals)?;
        Ok(ProofArtifact {
            proof_hash: ProofArtifact::compute_hash(&signals, &blob),
            public_signals: signals,
            policy_label: label,
            proof_blob: blob,
            is_real_proof: false,
        })
    }

    /// Run the prover on a blocking thread under the configured timeout.
    /// Any prover failure surfaces as `BackendUnavailable`: binding was
    /// already checked, so from here on every error is a backend
    /// condition.
    async fn real_prove(
        &self,
        prover: Arc<dyn CircuitProver>,
        signals: PublicSignals,
        witness: PrivateWitness,
    ) -> Result<Vec<u8>, ProofError> {
        let handle =
            tokio::task::spawn_blocking(move || prover.prove(&signals, &witness));
        match tokio::time::timeout(self.timeout, handle).await {
            Ok(Ok(Ok(blob))) => Ok(blob),
            Ok(Ok(Err(e))) => Err(ProofError::BackendUnavailable(e.to_string())),
            Ok(Err(join_err)) => Err(ProofError::BackendUnavailable(format!(
                "prover task failed: {join_err}"
            ))),
            Err(_) => Err(ProofError::BackendUnavailable(format!(
                "proving timed out after {:?}",
                self.timeout
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn window() -> KeyVersionWindow {
        KeyVersionWindow { min: 2, current: 5 }
    }

    fn finance_flags() -> PatternFlags {
        PatternFlags {
            is_finance: true,
            is_health: false,
            is_personal: false,
        }
    }

    fn bound_request(content: &[u8], flags: PatternFlags) -> ProveRequest {
        let salt = Fr::from(7u64);
        let commitment = CommitmentHasher::commit_bytes(content, salt).unwrap();
        ProveRequest {
            memory_commitment: commitment,
            content: Some(content.to_vec()),
            salt: Some(salt),
            status: MemoryStatus::Active,
            key_version: 3,
            window: window(),
            flags,
        }
    }

    /// Stub prover that records whether it was invoked.
    struct RecordingProver {
        invoked: AtomicBool,
        result: Result<Vec<u8>, String>,
    }

    impl RecordingProver {
        fn succeeding(blob: &[u8]) -> Self {
            Self {
                invoked: AtomicBool::new(false),
                result: Ok(blob.to_vec()),
            }
        }

        fn failing(reason: &str) -> Self {
            Self {
                invoked: AtomicBool::new(false),
                result: Err(reason.to_string()),
            }
        }
    }

    impl CircuitProver for RecordingProver {
        fn prove(
            &self,
            _signals: &PublicSignals,
            _witness: &PrivateWitness,
        ) -> Result<Vec<u8>, ProofError> {
            self.invoked.store(true, Ordering::SeqCst);
            self.result
                .clone()
                .map_err(ProofError::BackendUnavailable)
        }

        fn verify(&self, artifact: &ProofArtifact) -> Result<bool, VerifyError> {
            Ok(artifact.proof_blob == self.result.clone().unwrap_or_default())
        }
    }

    /// Stub prover that blocks longer than any test timeout.
    struct SlowProver;

    impl CircuitProver for SlowProver {
        fn prove(
            &self,
            signals: &PublicSignals,
            _witness: &PrivateWitness,
        ) -> Result<Vec<u8>, ProofError> {
            std::thread::sleep(Duration::from_millis(500));
            Ok(signals.to_signal_strings().join(",").into_bytes())
        }

        fn verify(&self, _artifact: &ProofArtifact) -> Result<bool, VerifyError> {
            Ok(true)
        }
    }

    #[tokio::test]
    async fn mock_prove_allows_finance() {
        let pipeline = ProofPipeline::new(ProofBackend::Mock);
        let artifact = pipeline
            .prove(bound_request(b"tax records", finance_flags()))
            .await
            .unwrap();
        assert!(artifact.public_signals.allowed_for_agent);
        assert_eq!(artifact.policy_label, PolicyLabel::AllowFinance);
        assert!(!artifact.is_real_proof);
        assert!(pipeline.verify(&artifact).unwrap());
    }

    #[tokio::test]
    async fn blocked_decision_is_not_an_error() {
        let pipeline = ProofPipeline::new(ProofBackend::Mock);
        let mut flags = finance_flags();
        flags.is_personal = true;
        let artifact = pipeline
            .prove(bound_request(b"tax records", flags))
            .await
            .unwrap();
        assert!(!artifact.public_signals.allowed_for_agent);
        assert_eq!(artifact.policy_label, PolicyLabel::BlockAll);
        assert!(pipeline.verify(&artifact).unwrap());
    }

    #[tokio::test]
    async fn mock_proof_hash_is_pure_function_of_public_signals() {
        let pipeline = ProofPipeline::new(ProofBackend::Mock);
        let a = pipeline
            .prove(bound_request(b"fragment", finance_flags()))
            .await
            .unwrap();
        let b = pipeline
            .prove(bound_request(b"fragment", finance_flags()))
            .await
            .unwrap();
        assert_eq!(a.proof_hash, b.proof_hash);

        let c = pipeline
            .prove(bound_request(b"other fragment", finance_flags()))
            .await
            .unwrap();
        assert_ne!(a.proof_hash, c.proof_hash);
    }

    #[tokio::test]
    async fn binding_mismatch_fails_before_backend_invocation() {
        let prover = Arc::new(RecordingProver::succeeding(b"real"));
        let pipeline = ProofPipeline::new(ProofBackend::real(prover.clone()));

        let mut request = bound_request(b"fragment", finance_flags());
        request.content = Some(b"a different fragment".to_vec());

        let err = pipeline.prove(request).await.unwrap_err();
        assert!(matches!(err, ProofError::Binding { .. }));
        assert!(!prover.invoked.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn partial_witness_is_rejected() {
        let pipeline = ProofPipeline::new(ProofBackend::Mock);
        let mut request = bound_request(b"fragment", finance_flags());
        request.content = None;
        let err = pipeline.prove(request).await.unwrap_err();
        assert!(matches!(err, ProofError::InvalidWitness(_)));
    }

    #[tokio::test]
    async fn derived_witness_mode_proves_without_fragment() {
        let pipeline = ProofPipeline::new(ProofBackend::Mock);
        let mut request = bound_request(b"fragment", finance_flags());
        let commitment = request.memory_commitment;
        request.content = None;
        request.salt = None;
        let artifact = pipeline.prove(request).await.unwrap();
        assert_eq!(artifact.public_signals.memory_commitment, commitment);
        assert!(pipeline.verify(&artifact).unwrap());
    }

    #[tokio::test]
    async fn real_backend_produces_real_artifact() {
        let prover = Arc::new(RecordingProver::succeeding(b"real proof bytes"));
        let pipeline = ProofPipeline::new(ProofBackend::real(prover.clone()));
        let artifact = pipeline
            .prove(bound_request(b"fragment", finance_flags()))
            .await
            .unwrap();
        assert!(artifact.is_real_proof);
        assert_eq!(artifact.proof_blob, b"real proof bytes");
        assert!(prover.invoked.load(Ordering::SeqCst));
        assert!(pipeline.verify(&artifact).unwrap());
    }

    #[tokio::test]
    async fn backend_failure_falls_back_to_mock() {
        let prover = Arc::new(RecordingProver::failing("prover crashed"));
        let pipeline = ProofPipeline::new(ProofBackend::real(prover.clone()));
        let artifact = pipeline
            .prove(bound_request(b"fragment", finance_flags()))
            .await
            .unwrap();
        assert!(!artifact.is_real_proof);
        assert!(prover.invoked.load(Ordering::SeqCst));
        // The fallback artifact is a well-formed mock.
        assert!(pipeline.verify(&artifact).unwrap());
    }

    #[tokio::test]
    async fn backend_failure_without_fallback_is_a_hard_error() {
        let prover = Arc::new(RecordingProver::failing("prover crashed"));
        let pipeline =
            ProofPipeline::new(ProofBackend::real(prover)).without_fallback();
        let err = pipeline
            .prove(bound_request(b"fragment", finance_flags()))
            .await
            .unwrap_err();
        assert!(matches!(err, ProofError::BackendUnavailable(_)));
    }

    #[tokio::test]
    async fn timeout_triggers_fallback() {
        let pipeline = ProofPipeline::new(ProofBackend::real(Arc::new(SlowProver)))
            .with_timeout(Duration::from_millis(50));
        let artifact = pipeline
            .prove(bound_request(b"fragment", finance_flags()))
            .await
            .unwrap();
        assert!(!artifact.is_real_proof);
        assert!(pipeline.verify(&artifact).unwrap());
    }

    #[tokio::test]
    async fn real_artifact_needs_a_real_verifier() {
        let prover = Arc::new(RecordingProver::succeeding(b"real"));
        let real_pipeline = ProofPipeline::new(ProofBackend::real(prover));
        let artifact = real_pipeline
            .prove(bound_request(b"fragment", finance_flags()))
            .await
            .unwrap();

        let mock_pipeline = ProofPipeline::new(ProofBackend::Mock);
        assert!(matches!(
            mock_pipeline.verify(&artifact),
            Err(VerifyError::VerifierUnavailable(_))
        ));
    }
}
