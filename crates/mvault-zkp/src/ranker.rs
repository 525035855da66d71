//! # Relevance Ranking
//!
//! A non-cryptographic pre-filter that orders candidate commitments
//! against a query fingerprint before the pipeline proves each one.
//! Scores carry no access semantics: ranking must never be the sole
//! basis for an access decision.

use ark_bn254::Fr;

use mvault_crypto::field::fr_to_bytes_be;
use mvault_crypto::FieldEncoder;

/// Lower clamp on scores; keeps every candidate faintly eligible.
const SCORE_FLOOR: f64 = 0.1;
/// Upper clamp; the fingerprint match is never treated as certainty.
const SCORE_CEILING: f64 = 0.99;
/// Bits compared between two 32-byte fingerprints.
const FINGERPRINT_BITS: f64 = 256.0;

/// A candidate with its relevance score and original position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedCandidate {
    /// The candidate commitment.
    pub commitment: Fr,
    /// Position in the caller's input slice.
    pub original_index: usize,
    /// Relevance score in `[0.1, 0.99]`.
    pub score: f64,
}

/// Scores candidate commitments against a query fingerprint.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelevanceRanker;

impl RelevanceRanker {
    /// Score one candidate against the query.
    ///
    /// The query is lowercased and encoded into the field; the score is
    /// `clamp(1 - hamming(fingerprint, candidate) / 256, 0.1, 0.99)`
    /// over the big-endian byte encodings.
    pub fn score(query: &str, candidate: &Fr) -> f64 {
        let fingerprint = fr_to_bytes_be(&FieldEncoder::encode_lowercase(query));
        let candidate_bytes = fr_to_bytes_be(candidate);
        let distance: u32 = fingerprint
            .iter()
            .zip(candidate_bytes.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum();
        let similarity = 1.0 - f64::from(distance) / FINGERPRINT_BITS;
        similarity.clamp(SCORE_FLOOR, SCORE_CEILING)
    }

    /// Rank candidates descending by score; ties keep input order.
    pub fn rank(query: &str, candidates: &[Fr]) -> Vec<RankedCandidate> {
        let mut ranked: Vec<RankedCandidate> = candidates
            .iter()
            .enumerate()
            .map(|(original_index, commitment)| RankedCandidate {
                commitment: *commitment,
                original_index,
                score: Self::score(query, commitment),
            })
            .collect();
        // Stable sort: equal scores retain original order.
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
    }

    /// The top `k` candidates for per-candidate proving.
    pub fn shortlist(query: &str, candidates: &[Fr], k: usize) -> Vec<Fr> {
        Self::rank(query, candidates)
            .into_iter()
            .take(k)
            .map(|c| c.commitment)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn score_is_clamped() {
        let candidate = FieldEncoder::encode(b"anything");
        let s = RelevanceRanker::score("query", &candidate);
        assert!((SCORE_FLOOR..=SCORE_CEILING).contains(&s));
    }

    #[test]
    fn identical_fingerprint_hits_ceiling() {
        // A candidate equal to the query fingerprint has zero distance.
        let candidate = FieldEncoder::encode_lowercase("tax records");
        assert_eq!(RelevanceRanker::score("Tax Records", &candidate), SCORE_CEILING);
    }

    #[test]
    fn score_is_case_insensitive_in_query() {
        let candidate = FieldEncoder::encode(b"candidate");
        assert_eq!(
            RelevanceRanker::score("Medical History", &candidate),
            RelevanceRanker::score("medical history", &candidate)
        );
    }

    #[test]
    fn rank_is_descending_and_complete() {
        let candidates: Vec<Fr> = (0..8u64)
            .map(|i| FieldEncoder::encode(format!("candidate {i}").as_bytes()))
            .collect();
        let ranked = RelevanceRanker::rank("some query", &candidates);
        assert_eq!(ranked.len(), candidates.len());
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn ties_keep_original_order() {
        // The same commitment three times scores identically; the stable
        // sort must keep the input order among the copies.
        let c = FieldEncoder::encode(b"duplicate");
        let ranked = RelevanceRanker::rank("query", &[c, c, c]);
        let order: Vec<usize> = ranked.iter().map(|r| r.original_index).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn shortlist_truncates() {
        let candidates: Vec<Fr> = (0..10u64)
            .map(|i| FieldEncoder::encode(format!("c{i}").as_bytes()))
            .collect();
        assert_eq!(RelevanceRanker::shortlist("q", &candidates, 3).len(), 3);
        assert_eq!(
            RelevanceRanker::shortlist("q", &candidates, 100).len(),
            candidates.len()
        );
        assert!(RelevanceRanker::shortlist("q", &[], 3).is_empty());
    }

    proptest! {
        #[test]
        fn score_always_in_bounds(query in ".{0,64}", seed in any::<u64>()) {
            let candidate = FieldEncoder::encode(&seed.to_be_bytes());
            let s = RelevanceRanker::score(&query, &candidate);
            prop_assert!((SCORE_FLOOR..=SCORE_CEILING).contains(&s));
        }

        #[test]
        fn rank_is_permutation(seeds in proptest::collection::vec(any::<u64>(), 0..16)) {
            let candidates: Vec<Fr> =
                seeds.iter().map(|s| FieldEncoder::encode(&s.to_be_bytes())).collect();
            let ranked = RelevanceRanker::rank("query", &candidates);
            prop_assert_eq!(ranked.len(), candidates.len());
            let mut indices: Vec<usize> =
                ranked.iter().map(|r| r.original_index).collect();
            indices.sort_unstable();
            prop_assert_eq!(indices, (0..candidates.len()).collect::<Vec<_>>());
        }
    }
}
