//! Canonical analysis result shared by the remote and local paths

use crate::error::{MatcherError, Result};
use log::warn;
use serde::Serialize;
use std::collections::HashSet;

/// Outcome of matching one resume against one job description.
///
/// Values are validated on construction and cannot be changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    score: u8,
    matching_keywords: Vec<String>,
    missing_keywords: Vec<String>,
    suggestions: String,
    raw_response: Option<String>,
}

impl AnalysisResult {
    /// Build a result, rejecting scores above 100.
    ///
    /// Duplicate (case-sensitive) and blank keyword entries are dropped, keeping
    /// the first occurrence of each keyword in its original position.
    pub fn new(
        score: u8,
        matching_keywords: Vec<String>,
        missing_keywords: Vec<String>,
        suggestions: impl Into<String>,
    ) -> Result<Self> {
        if score > 100 {
            return Err(MatcherError::OutOfRange {
                score: i64::from(score),
            });
        }

        Ok(Self {
            score,
            matching_keywords: dedup_keywords("matchingKeywords", matching_keywords),
            missing_keywords: dedup_keywords("missingKeywords", missing_keywords),
            suggestions: suggestions.into(),
            raw_response: None,
        })
    }

    /// Attach the verbatim remote response body kept for diagnostics.
    pub fn with_raw_response(mut self, raw_response: impl Into<String>) -> Self {
        self.raw_response = Some(raw_response.into());
        self
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn matching_keywords(&self) -> &[String] {
        &self.matching_keywords
    }

    pub fn missing_keywords(&self) -> &[String] {
        &self.missing_keywords
    }

    pub fn suggestions(&self) -> &str {
        &self.suggestions
    }

    pub fn raw_response(&self) -> Option<&str> {
        self.raw_response.as_deref()
    }
}

fn dedup_keywords(field: &str, keywords: Vec<String>) -> Vec<String> {
    let original_len = keywords.len();
    let mut seen = HashSet::with_capacity(original_len);
    let kept: Vec<String> = keywords
        .into_iter()
        .filter(|k| !k.trim().is_empty())
        .filter(|k| seen.insert(k.clone()))
        .collect();

    if kept.len() != original_len {
        warn!(
            "Dropped {} duplicate or blank entries from {}",
            original_len - kept.len(),
            field
        );
    }

    kept
}
