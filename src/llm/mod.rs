//! Remote LLM analysis: prompt, transport, response decoding and retry

pub mod prompts;
pub mod response;
pub mod client;
pub mod retry;

pub use client::RemoteAnalysisClient;
pub use retry::RetryPolicy;
