use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::GeminiConfig;
use crate::error::{ApiError, ApiResult};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// One question/answer pair as produced by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explanation {
    pub title: String,
    pub explanation: String,
}

/// Seam between handlers and the external generative-AI service, so tests
/// can substitute a stub the same way storage is substituted.
#[async_trait]
pub trait AiClient: Send + Sync {
    async fn generate_questions(&self, prompt: &str) -> ApiResult<Vec<GeneratedQuestion>>;
    async fn generate_explanation(&self, prompt: &str) -> ApiResult<Explanation>;
}

// --- Gemini wire format ---

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: String,
}

pub struct GeminiClient {
    config: GeminiConfig,
    http: Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    /// One synchronous call, no retry. Returns the raw text of the first
    /// candidate.
    async fn call(&self, prompt: &str) -> ApiResult<String> {
        let url = format!(
            "{}/{}:generateContent",
            GEMINI_BASE_URL, self.config.model
        );

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .http
            .post(&url)
            .header("X-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ApiError::Upstream(anyhow::anyhow!("gemini request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "gemini returned non-success");
            return Err(ApiError::Upstream(anyhow::anyhow!(
                "gemini returned {status}: {body}"
            )));
        }

        let parsed: GeminiResponse = response.json().await.map_err(|e| {
            ApiError::UpstreamParse(anyhow::anyhow!("gemini response not json: {e}"))
        })?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| {
                ApiError::UpstreamParse(anyhow::anyhow!("gemini response had no candidates"))
            })?;

        debug!(len = text.len(), "gemini reply received");
        Ok(text)
    }

    fn parse_reply<T: DeserializeOwned>(raw: &str) -> ApiResult<T> {
        let json = extract_json(raw).ok_or_else(|| {
            ApiError::UpstreamParse(anyhow::anyhow!("no JSON payload in model reply"))
        })?;
        serde_json::from_str(json)
            .map_err(|e| ApiError::UpstreamParse(anyhow::anyhow!("model reply not valid: {e}")))
    }
}

#[async_trait]
impl AiClient for GeminiClient {
    async fn generate_questions(&self, prompt: &str) -> ApiResult<Vec<GeneratedQuestion>> {
        let raw = self.call(prompt).await?;
        Self::parse_reply(&raw)
    }

    async fn generate_explanation(&self, prompt: &str) -> ApiResult<Explanation> {
        let raw = self.call(prompt).await?;
        Self::parse_reply(&raw)
    }
}

/// Pull the JSON payload out of a model reply that may be wrapped in code
/// fences or surrounded by prose.
pub(crate) fn extract_json(raw: &str) -> Option<&str> {
    let text = raw.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text).trim();

    // Prose around the payload can itself contain brackets, so try each
    // opening bracket until one starts a document that parses.
    for (start, ch) in text.char_indices().filter(|(_, c)| matches!(c, '[' | '{')) {
        let closer = if ch == '[' { ']' } else { '}' };
        let Some(end) = text.rfind(closer) else {
            continue;
        };
        if end < start {
            continue;
        }
        let candidate = &text[start..=end];
        if serde_json::from_str::<serde_json::Value>(candidate).is_ok() {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_json_plain_array() {
        let raw = r#"[{"question":"Q?","answer":"A."}]"#;
        assert_eq!(extract_json(raw), Some(raw));
    }

    #[test]
    fn extract_json_strips_code_fences() {
        let raw = "```json\n[{\"question\":\"Q?\",\"answer\":\"A.\"}]\n```";
        let json = extract_json(raw).expect("payload");
        let parsed: Vec<GeneratedQuestion> = serde_json::from_str(json).expect("parse");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].question, "Q?");
    }

    #[test]
    fn extract_json_tolerates_surrounding_prose() {
        let raw = "Sure! Here is your result:\n{\"title\":\"T\",\"explanation\":\"E\"}\nHope that helps.";
        let json = extract_json(raw).expect("payload");
        let parsed: Explanation = serde_json::from_str(json).expect("parse");
        assert_eq!(parsed.title, "T");
    }

    #[test]
    fn extract_json_skips_brackets_inside_prose() {
        let raw = "Here are [2] questions you asked for:\n[{\"question\":\"Q1?\",\"answer\":\"A1.\"},{\"question\":\"Q2?\",\"answer\":\"A2.\"}]";
        let json = extract_json(raw).expect("payload");
        let parsed: Vec<GeneratedQuestion> = serde_json::from_str(json).expect("parse");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].question, "Q2?");
    }

    #[test]
    fn extract_json_rejects_plain_prose() {
        assert_eq!(extract_json("I could not generate anything today."), None);
    }

    #[test]
    fn parse_reply_reports_parse_error_kind() {
        let err = GeminiClient::parse_reply::<Vec<GeneratedQuestion>>("not json at all")
            .expect_err("should fail");
        assert!(matches!(err, ApiError::UpstreamParse(_)));
    }

    #[test]
    fn parse_reply_accepts_fenced_array() {
        let raw = "```json\n[{\"question\":\"What is Rust?\",\"answer\":\"A language.\"}]\n```";
        let parsed: Vec<GeneratedQuestion> =
            GeminiClient::parse_reply(raw).expect("should parse");
        assert_eq!(parsed[0].answer, "A language.");
    }
}
