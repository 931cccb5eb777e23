//! Local text processing: normalization, similarity scoring and keyword diffing

pub mod text_normalizer;
pub mod similarity;
pub mod keywords;

pub use similarity::LocalSimilarityScorer;
pub use text_normalizer::{TermFrequencies, TextNormalizer};
