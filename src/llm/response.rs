//! Decoding and validation of remote analysis responses
//!
//! The service wraps the model's answer in a transport envelope:
//!
//! ```text
//! {"candidates":[{"content":{"parts":[{"text":"<analysis json>"}]}}]}
//! ```
//!
//! All tolerance for model drift lives here, so a change in the response
//! contract only touches this module.

use crate::error::{MatcherError, Result, ResponseStage};
use crate::model::AnalysisResult;
use log::debug;
use serde::Deserialize;
use serde_json::{Number, Value};

/// Location of the model text inside the envelope.
const TEXT_PATH: [&str; 6] = ["candidates", "0", "content", "parts", "0", "text"];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisPayload {
    score: Number,
    matching_keywords: Vec<String>,
    missing_keywords: Vec<String>,
    suggestions: String,
}

/// Decode a raw response body into an [`AnalysisResult`].
///
/// Scores outside `0..=100` are reported as [`MatcherError::OutOfRange`]
/// rather than clamped. The body is kept verbatim as the raw response.
pub fn parse(raw_body: &str) -> Result<AnalysisResult> {
    let envelope: Value = serde_json::from_str(raw_body).map_err(|e| {
        MatcherError::malformed(ResponseStage::Envelope, format!("body is not JSON: {}", e))
    })?;

    let text = envelope_text(&envelope)?;
    debug!("Envelope decoded, payload text is {} chars", text.len());

    let payload: AnalysisPayload = serde_json::from_str(strip_json_fences(text))
        .map_err(|e| MatcherError::malformed(ResponseStage::Payload, e.to_string()))?;

    let score = integer_score(&payload.score)?;
    if !(0..=100).contains(&score) {
        return Err(MatcherError::OutOfRange { score });
    }

    let result = AnalysisResult::new(
        score as u8,
        payload.matching_keywords,
        payload.missing_keywords,
        payload.suggestions,
    )?;

    Ok(result.with_raw_response(raw_body))
}

/// Integer literals too large for `i64` decode as floats. Those saturate so
/// they still read as out of range; any other float is malformed.
fn integer_score(score: &Number) -> Result<i64> {
    if let Some(value) = score.as_i64() {
        return Ok(value);
    }
    if score.is_u64() {
        return Ok(i64::MAX);
    }
    match score.as_f64() {
        Some(value) if value.fract() == 0.0 && value.abs() >= i64::MAX as f64 => {
            Ok(value as i64)
        }
        _ => Err(MatcherError::malformed(
            ResponseStage::Payload,
            format!("score must be an integer, got {}", score),
        )),
    }
}

fn envelope_text(envelope: &Value) -> Result<&str> {
    let mut node = envelope;
    let mut path = String::new();

    for segment in TEXT_PATH {
        path.push('/');
        path.push_str(segment);

        let next = match segment.parse::<usize>() {
            Ok(index) => node.get(index),
            Err(_) => node.get(segment),
        };
        node = next.ok_or_else(|| {
            MatcherError::malformed(ResponseStage::Envelope, format!("missing {}", path))
        })?;
    }

    node.as_str().ok_or_else(|| {
        MatcherError::malformed(ResponseStage::Envelope, format!("{} is not a string", path))
    })
}

/// Strips ```json ... ``` or ``` ... ``` fences some models add despite the
/// JSON mime type.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));

    match inner {
        Some(stripped) => {
            let stripped = stripped.trim_start();
            stripped
                .strip_suffix("```")
                .map(str::trim)
                .unwrap_or(stripped)
        }
        None => text,
    }
}
