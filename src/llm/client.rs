//! HTTP client for the remote analysis model
//!
//! One call per analysis, no retries at this layer. Callers that want
//! resilience wrap [`RemoteAnalysisClient::analyze`] in a
//! [`RetryPolicy`](crate::llm::retry::RetryPolicy).

use crate::config::RemoteConfig;
use crate::error::{MatcherError, Result};
use crate::llm::{prompts, response};
use crate::model::AnalysisResult;
use log::{debug, info, warn};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// Longest slice of a response body carried inside an error.
const BODY_SNIPPET_CHARS: usize = 512;
const REDACTED: &str = "[REDACTED]";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Clone)]
pub struct RemoteAnalysisClient {
    client: Client,
    endpoint: String,
    api_key: String,
    timeout: Duration,
}

impl std::fmt::Debug for RemoteAnalysisClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteAnalysisClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &REDACTED)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl RemoteAnalysisClient {
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                MatcherError::Configuration(
                    "remote analysis requires an API key (set remote.api_key or RESUME_MATCHER_API_KEY)"
                        .to_string(),
                )
            })?
            .to_string();

        if config.endpoint.trim().is_empty() {
            return Err(MatcherError::Configuration(
                "remote.endpoint must not be empty".to_string(),
            ));
        }

        let timeout = Duration::from_secs(config.timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                MatcherError::Configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim().to_string(),
            api_key,
            timeout,
        })
    }

    /// Ask the remote model to score the resume against the job description.
    pub async fn analyze(&self, resume_text: &str, job_description: &str) -> Result<AnalysisResult> {
        let prompt = prompts::build_prompt(resume_text, job_description);
        let body = self.generate(&prompt).await?;
        response::parse(&body)
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };

        info!("Requesting remote analysis from {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            warn!("Remote analysis service returned {}", status);
            return Err(MatcherError::RemoteService {
                status_code: Some(status.as_u16()),
                body: self.snippet(&body),
            });
        }

        debug!("Remote analysis succeeded: {} byte response", body.len());
        Ok(body)
    }

    fn transport_error(&self, err: reqwest::Error) -> MatcherError {
        // The request URL carries the key as a query parameter
        let err = err.without_url();
        let detail = if err.is_timeout() {
            format!("request timed out after {}s", self.timeout.as_secs())
        } else {
            err.to_string()
        };
        warn!("Remote analysis request failed: {}", self.redact(&detail));

        MatcherError::RemoteService {
            status_code: None,
            body: self.redact(&detail),
        }
    }

    fn snippet(&self, body: &str) -> String {
        let redacted = self.redact(body);
        if redacted.chars().count() <= BODY_SNIPPET_CHARS {
            redacted
        } else {
            let truncated: String = redacted.chars().take(BODY_SNIPPET_CHARS).collect();
            format!("{}...", truncated)
        }
    }

    fn redact(&self, text: &str) -> String {
        text.replace(&self.api_key, REDACTED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResponseStage;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MODEL_PATH: &str = "/v1beta/models/test-model:generateContent";
    const API_KEY: &str = "test-secret-key";

    fn test_config(base_url: &str) -> RemoteConfig {
        RemoteConfig {
            endpoint: format!("{}{}", base_url, MODEL_PATH),
            api_key: Some(API_KEY.to_string()),
            timeout_secs: 5,
            ..RemoteConfig::default()
        }
    }

    fn success_body(score: i64) -> serde_json::Value {
        let inner = json!({
            "score": score,
            "matchingKeywords": ["Python", "AWS"],
            "missingKeywords": ["Kubernetes"],
            "suggestions": "Add Kubernetes experience."
        });
        json!({
            "candidates": [{ "content": { "parts": [{ "text": inner.to_string() }] } }]
        })
    }

    #[test]
    fn test_new_requires_api_key() {
        let mut config = test_config("http://localhost");
        config.api_key = None;
        assert!(matches!(
            RemoteAnalysisClient::new(&config),
            Err(MatcherError::Configuration(_))
        ));

        config.api_key = Some("   ".to_string());
        assert!(RemoteAnalysisClient::new(&config).is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let client = RemoteAnalysisClient::new(&test_config("http://localhost")).unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains(API_KEY));
        assert!(debug.contains(REDACTED));
    }

    #[tokio::test]
    async fn analyze_sends_contract_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .and(query_param("key", API_KEY))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(json!({
                "generationConfig": { "responseMimeType": "application/json" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body(78)))
            .expect(1)
            .mount(&server)
            .await;

        let client = RemoteAnalysisClient::new(&test_config(&server.uri())).unwrap();
        let result = client
            .analyze("Python developer on AWS", "Backend engineer: Python, AWS, Kubernetes")
            .await
            .unwrap();

        assert_eq!(result.score(), 78);
        assert_eq!(result.matching_keywords(), ["Python", "AWS"]);
        assert_eq!(result.missing_keywords(), ["Kubernetes"]);
        assert!(result.raw_response().unwrap().contains("candidates"));

        let requests = server.received_requests().await.unwrap();
        let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        let prompt = sent["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.contains("Applicant Tracking System"));
        assert!(prompt.contains("Backend engineer: Python, AWS, Kubernetes"));
        assert!(prompt.ends_with("Python developer on AWS"));
    }

    #[tokio::test]
    async fn server_error_is_not_parsed() {
        let server = MockServer::start().await;

        // A well-formed analysis body behind a 500 must still be an error
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_json(success_body(90)))
            .expect(1)
            .mount(&server)
            .await;

        let client = RemoteAnalysisClient::new(&test_config(&server.uri())).unwrap();
        let err = client.analyze("resume", "job").await.unwrap_err();

        match err {
            MatcherError::RemoteService { status_code, body } => {
                assert_eq!(status_code, Some(500));
                assert!(body.contains("candidates"));
            }
            other => panic!("expected RemoteService, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn client_error_body_is_redacted_and_truncated() {
        let server = MockServer::start().await;
        let body = format!("API key {} not valid. {}", API_KEY, "x".repeat(2000));

        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_string(body))
            .mount(&server)
            .await;

        let client = RemoteAnalysisClient::new(&test_config(&server.uri())).unwrap();
        let err = client.analyze("resume", "job").await.unwrap_err();

        assert!(!err.to_string().contains(API_KEY));
        match err {
            MatcherError::RemoteService { status_code, body } => {
                assert_eq!(status_code, Some(400));
                assert!(body.starts_with("API key [REDACTED] not valid."));
                assert!(body.ends_with("..."));
                assert_eq!(body.chars().count(), BODY_SNIPPET_CHARS + 3);
            }
            other => panic!("expected RemoteService, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_success_body_propagates_parser_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = RemoteAnalysisClient::new(&test_config(&server.uri())).unwrap();
        let err = client.analyze("resume", "job").await.unwrap_err();

        assert!(matches!(
            err,
            MatcherError::MalformedResponse {
                stage: ResponseStage::Envelope,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn timeout_is_transient_without_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(success_body(50))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let mut config = test_config(&server.uri());
        config.timeout_secs = 1;
        let client = RemoteAnalysisClient::new(&config).unwrap();
        let err = client.analyze("resume", "job").await.unwrap_err();

        assert!(err.is_transient());
        assert!(matches!(err, MatcherError::RemoteService { status_code: None, .. }));
        assert!(!err.to_string().contains(API_KEY));
    }

    #[tokio::test]
    async fn connection_failure_hides_key() {
        // Bind then release a port so nothing is listening on it
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let uri = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let client = RemoteAnalysisClient::new(&test_config(&uri)).unwrap();
        let err = client.analyze("resume", "job").await.unwrap_err();

        assert!(matches!(err, MatcherError::RemoteService { status_code: None, .. }));
        assert!(!err.to_string().contains(API_KEY));
    }
}
