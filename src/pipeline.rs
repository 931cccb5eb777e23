//! Analysis pipeline: validate inputs, extract resume text, dispatch by mode
//!
//! The pipeline never switches modes on its own. Retry and fallback policy
//! belong to the caller (see [`crate::orchestrator`]).

use crate::error::{MatcherError, Result};
use crate::input::TextExtractor;
use crate::llm::RemoteAnalysisClient;
use crate::model::AnalysisResult;
use crate::processing::keywords::{self, KeywordAnalyzer, DEFAULT_MAX_MISSING};
use crate::processing::LocalSimilarityScorer;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    /// Score with the remote LLM service.
    Remote,
    /// Score with local cosine similarity and keyword diffing.
    Local,
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisMode::Remote => write!(f, "remote"),
            AnalysisMode::Local => write!(f, "local"),
        }
    }
}

impl FromStr for AnalysisMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "remote" => Ok(AnalysisMode::Remote),
            "local" => Ok(AnalysisMode::Local),
            other => Err(format!(
                "Invalid analysis mode: {}. Supported: remote, local",
                other
            )),
        }
    }
}

pub struct AnalysisPipeline {
    extractor: Box<dyn TextExtractor>,
    remote: Option<RemoteAnalysisClient>,
    scorer: LocalSimilarityScorer,
    keywords: KeywordAnalyzer,
    max_missing_keywords: usize,
}

impl AnalysisPipeline {
    /// A pipeline that can only run in local mode until a remote client is attached.
    pub fn new(extractor: Box<dyn TextExtractor>) -> Self {
        Self {
            extractor,
            remote: None,
            scorer: LocalSimilarityScorer::new(),
            keywords: KeywordAnalyzer::new(),
            max_missing_keywords: DEFAULT_MAX_MISSING,
        }
    }

    pub fn with_remote(mut self, client: RemoteAnalysisClient) -> Self {
        self.remote = Some(client);
        self
    }

    pub fn with_max_missing_keywords(mut self, max_missing_keywords: usize) -> Self {
        self.max_missing_keywords = max_missing_keywords;
        self
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Analyze a resume document against a job description.
    pub async fn run(
        &self,
        document_bytes: &[u8],
        job_description: &str,
        mode: AnalysisMode,
    ) -> Result<AnalysisResult> {
        let resume_text = self.prepare(document_bytes, job_description)?;
        self.analyze_text(&resume_text, job_description, mode).await
    }

    /// Validate the request and extract the resume text.
    pub fn prepare(&self, document_bytes: &[u8], job_description: &str) -> Result<String> {
        if document_bytes.is_empty() {
            return Err(MatcherError::InvalidInput(
                "resume document is empty".to_string(),
            ));
        }
        if job_description.trim().is_empty() {
            return Err(MatcherError::InvalidInput(
                "job description is empty".to_string(),
            ));
        }

        let resume_text = self.extractor.extract(document_bytes)?;
        if resume_text.trim().is_empty() {
            return Err(MatcherError::Extraction(
                "document contains no extractable text".to_string(),
            ));
        }

        debug!("Extracted {} chars of resume text", resume_text.len());
        Ok(resume_text)
    }

    /// Analyze already-extracted resume text.
    pub async fn analyze_text(
        &self,
        resume_text: &str,
        job_description: &str,
        mode: AnalysisMode,
    ) -> Result<AnalysisResult> {
        if resume_text.trim().is_empty() || job_description.trim().is_empty() {
            return Err(MatcherError::InvalidInput(
                "resume text and job description must both be non-empty".to_string(),
            ));
        }

        info!("Running {} analysis", mode);
        match mode {
            AnalysisMode::Remote => {
                let client = self.remote.as_ref().ok_or_else(|| {
                    MatcherError::Configuration(
                        "remote analysis requested but no remote client is configured".to_string(),
                    )
                })?;
                client.analyze(resume_text, job_description).await
            }
            AnalysisMode::Local => self.analyze_local(resume_text, job_description),
        }
    }

    fn analyze_local(&self, resume_text: &str, job_description: &str) -> Result<AnalysisResult> {
        let score = self.scorer.similarity_score(resume_text, job_description);
        let diff = self.keywords.diff(
            self.scorer.normalizer(),
            resume_text,
            job_description,
            self.max_missing_keywords,
        );
        let suggestions = keywords::local_suggestions(score, &diff.missing);

        debug!(
            "Local score {} ({} matching, {} missing)",
            score,
            diff.matching.len(),
            diff.missing.len()
        );
        AnalysisResult::new(score, diff.matching, diff.missing, suggestions)
    }
}
