//! Local keyword-diff heuristic used when no remote analysis is available

use crate::processing::text_normalizer::TextNormalizer;
use std::collections::HashSet;

pub const DEFAULT_MAX_MISSING: usize = 7;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordDiff {
    pub matching: Vec<String>,
    pub missing: Vec<String>,
}

pub struct KeywordAnalyzer {
    stop_words: HashSet<&'static str>,
}

impl Default for KeywordAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordAnalyzer {
    pub fn new() -> Self {
        Self {
            stop_words: STOP_WORDS.iter().copied().collect(),
        }
    }

    pub fn is_stop_word(&self, term: &str) -> bool {
        self.stop_words.contains(term)
    }

    /// Split the job description's terms into those the resume covers and
    /// those it lacks.
    ///
    /// Both lists are ordered by how often the term appears in the job
    /// description, ties broken alphabetically. `missing` is capped at
    /// `max_missing` entries.
    pub fn diff(
        &self,
        normalizer: &TextNormalizer,
        resume_text: &str,
        job_description: &str,
        max_missing: usize,
    ) -> KeywordDiff {
        let resume_tf = normalizer.term_frequencies(resume_text);
        let job_tf = normalizer.term_frequencies(job_description);

        let mut ranked: Vec<(&str, u64)> = job_tf
            .iter()
            .filter(|(term, _)| !self.is_stop_word(term))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        let (matching, missing): (Vec<_>, Vec<_>) = ranked
            .into_iter()
            .map(|(term, _)| term.to_string())
            .partition(|term| resume_tf.contains(term));

        KeywordDiff {
            matching,
            missing: missing.into_iter().take(max_missing).collect(),
        }
    }
}

/// Advice text for a locally scored result.
pub fn local_suggestions(score: u8, missing: &[String]) -> String {
    if score >= 100 {
        return String::new();
    }

    if missing.is_empty() {
        "Your resume already mentions the key terms of this job description. \
         Mirror its phrasing more closely and quantify the experience behind each term."
            .to_string()
    } else {
        format!(
            "Consider adding evidence of these job requirements to your resume: {}.",
            missing.join(", ")
        )
    }
}

// Function words and job-ad filler that never make useful keywords.
const STOP_WORDS: &[&str] = &[
    "about", "above", "across", "after", "again", "all", "also", "among", "and", "any",
    "are", "around", "been", "before", "being", "below", "between", "both", "but", "can",
    "could", "did", "does", "doing", "down", "during", "each", "etc", "every", "few",
    "for", "from", "further", "had", "has", "have", "having", "her", "here", "hers",
    "him", "his", "how", "into", "its", "itself", "just", "may", "more", "most",
    "must", "not", "now", "off", "once", "only", "other", "our", "ours", "out",
    "over", "own", "same", "she", "should", "some", "such", "than", "that", "the",
    "their", "them", "then", "there", "these", "they", "this", "those", "through", "too",
    "under", "until", "upon", "very", "was", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "within", "would", "you", "your",
    "yours",
    // job posting filler
    "ability", "able", "candidate", "candidates", "including", "join", "looking", "plus",
    "preferred", "required", "requirements", "responsibilities", "role", "seeking", "strong",
    "team", "work", "working", "years",
];

#[cfg(test)]
mod tests {
    use super::*;

    fn diff(resume: &str, job: &str, max_missing: usize) -> KeywordDiff {
        KeywordAnalyzer::new().diff(&TextNormalizer::new(), resume, job, max_missing)
    }

    #[test]
    fn test_matching_and_missing_split() {
        let result = diff(
            "Experienced Python developer with AWS and Docker skills",
            "Looking for a backend engineer skilled in Python, AWS, Kubernetes",
            DEFAULT_MAX_MISSING,
        );

        assert_eq!(result.matching, vec!["aws", "python"]);
        assert_eq!(result.missing, vec!["backend", "engineer", "kubernetes", "skilled"]);
    }

    #[test]
    fn test_ordered_by_job_frequency() {
        let result = diff(
            "rust",
            "kafka kafka kafka terraform terraform rust rust rust rust ansible",
            DEFAULT_MAX_MISSING,
        );

        assert_eq!(result.matching, vec!["rust"]);
        assert_eq!(result.missing, vec!["kafka", "terraform", "ansible"]);
    }

    #[test]
    fn test_missing_capped() {
        let result = diff("", "alpha bravo charlie delta echo foxtrot golf hotel india", 5);
        assert_eq!(result.missing.len(), 5);
        assert_eq!(result.missing, vec!["alpha", "bravo", "charlie", "delta", "echo"]);
        assert!(result.matching.is_empty());
    }

    #[test]
    fn test_stop_words_excluded() {
        let result = diff("", "The role requires strong work with the team", DEFAULT_MAX_MISSING);
        assert_eq!(result.missing, vec!["requires"]);
    }

    #[test]
    fn test_local_suggestions() {
        assert_eq!(local_suggestions(100, &["rust".to_string()]), "");

        let text = local_suggestions(40, &["kubernetes".to_string(), "terraform".to_string()]);
        assert!(text.contains("kubernetes, terraform"));

        let text = local_suggestions(80, &[]);
        assert!(!text.is_empty());
    }
}
