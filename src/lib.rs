//! Resume matcher library
//!
//! Scores a resume against a job description, either through a remote LLM
//! service or locally with term-frequency cosine similarity.

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod llm;
pub mod model;
pub mod orchestrator;
pub mod output;
pub mod pipeline;
pub mod processing;

pub use config::Config;
pub use error::{MatcherError, Result};
pub use model::AnalysisResult;
pub use orchestrator::{AnalysisOutcome, Orchestrator};
pub use pipeline::{AnalysisMode, AnalysisPipeline};
