//! Error handling for the resume matcher

use std::fmt;
use thiserror::Error;

/// Which decode layer of a remote response failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStage {
    /// The transport envelope (`candidates -> content -> parts -> text`).
    Envelope,
    /// The analysis JSON carried inside the envelope.
    Payload,
}

impl fmt::Display for ResponseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseStage::Envelope => write!(f, "envelope"),
            ResponseStage::Payload => write!(f, "payload"),
        }
    }
}

#[derive(Error, Debug)]
pub enum MatcherError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Text extraction error: {0}")]
    Extraction(String),

    #[error("Remote analysis service error ({}): {body}", status_label(.status_code))]
    RemoteService {
        status_code: Option<u16>,
        body: String,
    },

    #[error("Malformed analysis response at {stage} stage: {detail}")]
    MalformedResponse { stage: ResponseStage, detail: String },

    #[error("Score out of range: {score} (expected 0-100)")]
    OutOfRange { score: i64 },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, MatcherError>;

fn status_label(status_code: &Option<u16>) -> String {
    match status_code {
        Some(code) => format!("status {}", code),
        None => "no response".to_string(),
    }
}

impl MatcherError {
    pub fn malformed(stage: ResponseStage, detail: impl Into<String>) -> Self {
        MatcherError::MalformedResponse {
            stage,
            detail: detail.into(),
        }
    }

    /// Failures worth retrying unchanged: transport errors, timeouts, 429 and 5xx.
    pub fn is_transient(&self) -> bool {
        match self {
            MatcherError::RemoteService { status_code: None, .. } => true,
            MatcherError::RemoteService {
                status_code: Some(code),
                ..
            } => *code == 429 || *code >= 500,
            _ => false,
        }
    }

    /// Failures of the remote analysis path that a caller may answer by
    /// degrading to local scoring.
    pub fn is_remote_failure(&self) -> bool {
        matches!(
            self,
            MatcherError::RemoteService { .. }
                | MatcherError::MalformedResponse { .. }
                | MatcherError::OutOfRange { .. }
        )
    }
}
