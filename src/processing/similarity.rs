//! Cosine similarity over term-frequency vectors
//!
//! Deterministic and network-free. Backs the local analysis mode and serves as
//! a sanity check for remote scores.

use crate::processing::text_normalizer::{TermFrequencies, TextNormalizer};
use std::collections::BTreeSet;

pub struct LocalSimilarityScorer {
    normalizer: TextNormalizer,
}

impl Default for LocalSimilarityScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalSimilarityScorer {
    pub fn new() -> Self {
        Self {
            normalizer: TextNormalizer::new(),
        }
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    /// Cosine similarity of the two texts' term frequencies, in `[0.0, 1.0]`.
    ///
    /// Returns 0.0 when either text has no terms left after normalization.
    pub fn similarity(&self, text_a: &str, text_b: &str) -> f64 {
        let tf_a = self.normalizer.term_frequencies(text_a);
        let tf_b = self.normalizer.term_frequencies(text_b);
        cosine_similarity(&tf_a, &tf_b)
    }

    /// Similarity expressed as a rounded percentage.
    pub fn similarity_score(&self, text_a: &str, text_b: &str) -> u8 {
        to_percentage(self.similarity(text_a, text_b))
    }
}

pub fn cosine_similarity(tf_a: &TermFrequencies, tf_b: &TermFrequencies) -> f64 {
    // One ordered union drives both count sequences, keeping them aligned.
    let union: BTreeSet<&str> = tf_a.terms().chain(tf_b.terms()).collect();
    let dot: u64 = union
        .iter()
        .map(|term| tf_a.get(term) * tf_b.get(term))
        .sum();

    // Terms outside a vector count as zero, so its own magnitude is its norm over the union.
    let norm_a = tf_a.magnitude();
    let norm_b = tf_b.magnitude();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot as f64 / (norm_a * norm_b)).clamp(0.0, 1.0)
}

pub fn to_percentage(similarity: f64) -> u8 {
    (similarity.clamp(0.0, 1.0) * 100.0).round() as u8
}
