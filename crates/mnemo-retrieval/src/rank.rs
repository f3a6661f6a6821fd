//! Cosine-similarity ranking of embedded candidates.

use log::debug;

/// Default minimum similarity for a candidate to be retained.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.6;
/// Default maximum number of retained candidates.
pub const DEFAULT_TOP_K: usize = 5;

/// Compute cosine similarity between two vectors.
///
/// Returns a value in [-1, 1]. Returns 0.0 for empty, mismatched-length,
/// or zero-magnitude vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < 1e-10 {
        return 0.0;
    }
    (dot / denom) as f32
}

/// A candidate that cleared the similarity threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranked {
    /// Position of the candidate in the input order.
    pub index: usize,
    /// Cosine similarity against the query vector.
    pub similarity: f32,
}

/// Ranks candidate vectors against a query vector.
#[derive(Debug, Clone)]
pub struct RelevanceRanker {
    /// Minimum similarity for a candidate to be retained.
    threshold: f32,
    /// Maximum number of retained candidates.
    top_k: usize,
}

impl Default for RelevanceRanker {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_TOP_K)
    }
}

impl RelevanceRanker {
    /// Create a ranker with the given threshold and result bound.
    pub fn new(threshold: f32, top_k: usize) -> Self {
        Self { threshold, top_k }
    }

    /// Minimum similarity this ranker retains.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Rank candidates by similarity to `query`, descending.
    ///
    /// Candidates below the threshold are dropped and the result is
    /// truncated to `top_k`. The sort is stable, so candidates earlier in
    /// the input win exact similarity ties, keeping results deterministic.
    /// An empty query or candidate set yields an empty result.
    pub fn rank(&self, query: &[f32], candidates: &[Vec<f32>]) -> Vec<Ranked> {
        if query.is_empty() || candidates.is_empty() {
            return Vec::new();
        }

        let mut ranked: Vec<Ranked> = candidates
            .iter()
            .enumerate()
            .filter_map(|(index, vector)| {
                let similarity = cosine_similarity(query, vector);
                (similarity >= self.threshold).then_some(Ranked { index, similarity })
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(self.top_k);
        debug!(
            "ranked candidates (total={}, retained={}, threshold={})",
            candidates.len(),
            ranked.len(),
            self.threshold
        );
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::{RelevanceRanker, Ranked, cosine_similarity};
    use pretty_assertions::assert_eq;

    #[test]
    fn cosine_identical_vectors() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_orthogonal_vectors() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn cosine_degenerate_inputs() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }

    fn ranker(threshold: f32, top_k: usize) -> RelevanceRanker {
        RelevanceRanker::new(threshold, top_k)
    }

    #[test]
    fn rank_filters_below_threshold_and_sorts_descending() {
        let query = vec![1.0, 0.0];
        let candidates = vec![
            vec![0.0, 1.0],  // 0.0, dropped
            vec![1.0, 0.0],  // 1.0
            vec![1.0, 1.0],  // ~0.707
        ];
        let ranked = ranker(0.6, 5).rank(&query, &candidates);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].index, 1);
        assert_eq!(ranked[1].index, 2);
        assert!(ranked.iter().all(|entry| entry.similarity >= 0.6));
    }

    #[test]
    fn rank_truncates_to_top_k() {
        let query = vec![1.0, 0.0];
        let candidates = vec![vec![1.0, 0.0]; 8];
        let ranked = ranker(0.0, 3).rank(&query, &candidates);
        assert_eq!(ranked.len(), 3);
    }

    #[test]
    fn rank_breaks_ties_on_input_order() {
        let query = vec![1.0, 0.0];
        // identical candidates, all similarity 1.0
        let candidates = vec![vec![2.0, 0.0], vec![3.0, 0.0], vec![4.0, 0.0]];
        let ranked = ranker(0.5, 2).rank(&query, &candidates);
        assert_eq!(
            ranked,
            vec![
                Ranked { index: 0, similarity: 1.0 },
                Ranked { index: 1, similarity: 1.0 },
            ]
        );
    }

    #[test]
    fn rank_raising_threshold_never_grows_result() {
        let query = vec![1.0, 0.0];
        let candidates = vec![
            vec![1.0, 0.0],
            vec![1.0, 1.0],
            vec![1.0, 2.0],
            vec![0.0, 1.0],
        ];
        let mut previous = usize::MAX;
        for threshold in [0.0, 0.4, 0.6, 0.8, 1.0] {
            let retained = ranker(threshold, 10).rank(&query, &candidates).len();
            assert!(retained <= previous);
            previous = retained;
        }
    }

    #[test]
    fn rank_short_circuits_on_empty_input() {
        assert_eq!(ranker(0.6, 5).rank(&[], &[vec![1.0]]), Vec::new());
        assert_eq!(ranker(0.6, 5).rank(&[1.0], &[]), Vec::new());
    }
}
