//! Tokenization and term-frequency counting

use regex::Regex;
use std::collections::HashMap;

/// Tokens of this many characters or fewer are treated as noise.
const MIN_TERM_CHARS: usize = 3;

/// Occurrence counts of normalized terms within a single document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermFrequencies {
    counts: HashMap<String, u64>,
}

impl TermFrequencies {
    pub fn get(&self, term: &str) -> u64 {
        self.counts.get(term).copied().unwrap_or(0)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.counts.contains_key(term)
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(term, count)| (term.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Euclidean norm of the count vector.
    pub fn magnitude(&self) -> f64 {
        let sum_sq: u64 = self.counts.values().map(|c| c * c).sum();
        (sum_sq as f64).sqrt()
    }
}

/// Lowercases text, splits it on runs of non-word characters and counts the
/// surviving terms.
///
/// Word characters are Unicode-aware: `Zoë` stays one token rather than
/// splitting at the `ë` as an ASCII-only `\W+` split would.
pub struct TextNormalizer {
    word_regex: Regex,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer {
    pub fn new() -> Self {
        // Maximal runs of letters, digits and underscore
        let word_regex = Regex::new(r"\w+").expect("Invalid word regex");
        Self { word_regex }
    }

    /// Normalized tokens in document order, short tokens removed.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.word_regex
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|token| token.chars().count() >= MIN_TERM_CHARS)
            .map(str::to_string)
            .collect()
    }

    pub fn term_frequencies(&self, text: &str) -> TermFrequencies {
        let mut counts = HashMap::new();
        for token in self.tokenize(text) {
            *counts.entry(token).or_insert(0) += 1;
        }
        TermFrequencies { counts }
    }
}
