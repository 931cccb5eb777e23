//! Caller-level policy around the pipeline: retry remote calls, then fall back to local scoring

use crate::error::{MatcherError, Result};
use crate::llm::RetryPolicy;
use crate::model::AnalysisResult;
use crate::pipeline::{AnalysisMode, AnalysisPipeline};
use log::{info, warn};
use serde::Serialize;

/// An analysis result together with how it was produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutcome {
    pub result: AnalysisResult,
    pub mode: AnalysisMode,
    /// Set when a remote analysis failed and the local scorer stood in.
    pub fallback_reason: Option<String>,
}

pub struct Orchestrator {
    pipeline: AnalysisPipeline,
    retry: RetryPolicy,
    fallback_to_local: bool,
}

impl Orchestrator {
    pub fn new(pipeline: AnalysisPipeline, retry: RetryPolicy, fallback_to_local: bool) -> Self {
        Self {
            pipeline,
            retry,
            fallback_to_local,
        }
    }

    pub async fn analyze(
        &self,
        document_bytes: &[u8],
        job_description: &str,
        preferred_mode: AnalysisMode,
    ) -> Result<AnalysisOutcome> {
        let resume_text = self.pipeline.prepare(document_bytes, job_description)?;

        if preferred_mode == AnalysisMode::Local {
            let result = self
                .pipeline
                .analyze_text(&resume_text, job_description, AnalysisMode::Local)
                .await?;
            return Ok(AnalysisOutcome {
                result,
                mode: AnalysisMode::Local,
                fallback_reason: None,
            });
        }

        let pipeline = &self.pipeline;
        let text = resume_text.as_str();
        let remote = self
            .retry
            .run(move || pipeline.analyze_text(text, job_description, AnalysisMode::Remote))
            .await;

        match remote {
            Ok(result) => Ok(AnalysisOutcome {
                result,
                mode: AnalysisMode::Remote,
                fallback_reason: None,
            }),
            Err(err) if self.fallback_to_local && self.can_fall_back(&err) => {
                warn!("Remote analysis failed, falling back to local scoring: {}", err);
                let result = self
                    .pipeline
                    .analyze_text(&resume_text, job_description, AnalysisMode::Local)
                    .await?;
                info!("Local fallback scored {}", result.score());
                Ok(AnalysisOutcome {
                    result,
                    mode: AnalysisMode::Local,
                    fallback_reason: Some(err.to_string()),
                })
            }
            Err(err) => Err(err),
        }
    }

    fn can_fall_back(&self, err: &MatcherError) -> bool {
        err.is_remote_failure()
            || (matches!(err, MatcherError::Configuration(_)) && !self.pipeline.has_remote())
    }
}
