//! Language model client for summarisation.
//!
//! [`Summarizer`] is the seam the answer flow depends on; it is always
//! passed in explicitly. [`OpenAiCompatSummarizer`] talks to any server
//! implementing the OpenAI Chat Completions API (OpenAI itself, Ollama,
//! llama.cpp, vLLM, ...).
//!
//! # Examples
//!
//! ```rust,no_run
//! use webgist::config::LlmConfig;
//! use webgist::llm::{OpenAiCompatSummarizer, Summarizer};
//!
//! # async fn example() -> webgist::error::Result<()> {
//! let config = LlmConfig::default();
//! let summarizer = OpenAiCompatSummarizer::new(&config, config.resolve_api_key())?;
//! let summary = summarizer.summarize("You are terse.", "Summarise: giraffes are tall.").await?;
//! println!("{}", summary.summary);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::error::{Result, WebgistError};

/// A model's answer: a prose summary plus bullet-style key points.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Prose summary.
    pub summary: String,
    /// Key points, possibly empty.
    #[serde(default)]
    pub key_points: Vec<String>,
}

impl Summary {
    /// Interpret raw model output.
    ///
    /// Structured output is preferred; anything that does not decode as a
    /// [`Summary`] is taken verbatim as the summary text.
    pub fn from_model_output(text: &str) -> Self {
        let trimmed = strip_code_fence(text.trim());
        match serde_json::from_str::<Summary>(trimmed) {
            Ok(parsed) if !parsed.summary.trim().is_empty() => parsed,
            _ => Self {
                summary: text.trim().to_owned(),
                key_points: Vec::new(),
            },
        }
    }
}

/// Produces a [`Summary`] from a system prompt and a user prompt.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Model identifier, for logs.
    fn model(&self) -> &str;

    /// Run one completion.
    ///
    /// # Errors
    ///
    /// Returns [`WebgistError::Llm`] on transport, status or decoding failure.
    async fn summarize(&self, system: &str, user: &str) -> Result<Summary>;
}

/// Chat Completions client requesting JSON-schema structured output.
#[derive(Debug, Clone)]
pub struct OpenAiCompatSummarizer {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiCompatSummarizer {
    /// Build a client from `config`. `api_key` may be `None` for local servers.
    ///
    /// # Errors
    ///
    /// Returns [`WebgistError::Llm`] if the HTTP client cannot be built.
    pub fn new(config: &LlmConfig, api_key: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| WebgistError::Llm(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            endpoint: format!(
                "{}/v1/chat/completions",
                config.base_url.trim_end_matches('/')
            ),
            model: config.model.clone(),
            api_key,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    async fn send(&self, body: &serde_json::Value) -> Result<reqwest::Response> {
        let mut request = self.http.post(&self.endpoint).json(body);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }
        request
            .send()
            .await
            .map_err(|e| WebgistError::Llm(format!("request failed: {e}")))
    }
}

#[async_trait]
impl Summarizer for OpenAiCompatSummarizer {
    fn model(&self) -> &str {
        &self.model
    }

    async fn summarize(&self, system: &str, user: &str) -> Result<Summary> {
        let structured = build_request(
            &self.model,
            system,
            user,
            self.max_tokens,
            self.temperature,
            true,
        );
        let mut response = self.send(&structured).await?;

        // Servers without structured-output support reject the schema.
        if response.status() == reqwest::StatusCode::BAD_REQUEST {
            tracing::debug!(model = %self.model, "structured output rejected, retrying as plain text");
            let plain = build_request(
                &self.model,
                system,
                user,
                self.max_tokens,
                self.temperature,
                false,
            );
            response = self.send(&plain).await?;
        }

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(WebgistError::Llm(format!(
                "model API returned {status}: {}",
                detail.chars().take(200).collect::<String>()
            )));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| WebgistError::Llm(format!("invalid completion response: {e}")))?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| WebgistError::Llm("completion has no content".into()))?;

        Ok(Summary::from_model_output(&content))
    }
}

/// Build the JSON request body for the Chat Completions API.
pub fn build_request(
    model: &str,
    system: &str,
    user: &str,
    max_tokens: u32,
    temperature: f32,
    structured: bool,
) -> serde_json::Value {
    let mut body = serde_json::json!({
        "model": model,
        "messages": [
            {"role": "system", "content": system},
            {"role": "user", "content": user},
        ],
        "max_tokens": max_tokens,
        "temperature": temperature,
    });
    if structured {
        if let Some(obj) = body.as_object_mut() {
            obj.insert("response_format".into(), summary_response_format());
        }
    }
    body
}

fn summary_response_format() -> serde_json::Value {
    serde_json::json!({
        "type": "json_schema",
        "json_schema": {
            "name": "summary",
            "strict": true,
            "schema": {
                "type": "object",
                "properties": {
                    "summary": {"type": "string"},
                    "key_points": {"type": "array", "items": {"type": "string"}}
                },
                "required": ["summary", "key_points"],
                "additionalProperties": false
            }
        }
    })
}

fn strip_code_fence(text: &str) -> &str {
    text.strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(text)
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn completion(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        })
    }

    fn summarizer(server: &MockServer, key: Option<&str>) -> OpenAiCompatSummarizer {
        let config = LlmConfig {
            base_url: format!("{}/", server.uri()),
            model: "test-model".into(),
            ..Default::default()
        };
        OpenAiCompatSummarizer::new(&config, key.map(str::to_owned)).unwrap()
    }

    #[test]
    fn structured_output_parsed() {
        let summary = Summary::from_model_output(
            r#"{"summary": "Giraffes are tall.", "key_points": ["up to 5.7 m"]}"#,
        );
        assert_eq!(summary.summary, "Giraffes are tall.");
        assert_eq!(summary.key_points, vec!["up to 5.7 m".to_string()]);
    }

    #[test]
    fn fenced_json_parsed() {
        let summary =
            Summary::from_model_output("```json\n{\"summary\": \"Tall.\", \"key_points\": []}\n```");
        assert_eq!(summary.summary, "Tall.");
    }

    #[test]
    fn plain_text_becomes_summary() {
        let summary = Summary::from_model_output("  Giraffes are very tall animals.\n");
        assert_eq!(summary.summary, "Giraffes are very tall animals.");
        assert!(summary.key_points.is_empty());
    }

    #[test]
    fn json_without_summary_is_plain_text() {
        let summary = Summary::from_model_output(r#"{"answer": "x"}"#);
        assert_eq!(summary.summary, r#"{"answer": "x"}"#);
    }

    #[test]
    fn request_body_shape() {
        let body = build_request("m", "sys", "usr", 256, 0.5, true);
        assert_eq!(body["model"], "m");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "usr");
        assert_eq!(body["max_tokens"], 256);
        assert_eq!(body["response_format"]["type"], "json_schema");

        let plain = build_request("m", "sys", "usr", 256, 0.5, false);
        assert!(plain.get("response_format").is_none());
    }

    #[tokio::test]
    async fn summarize_sends_bearer_and_parses_structured_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(serde_json::json!({"model": "test-model"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(
                r#"{"summary": "Giraffes reach 5.7 m.", "key_points": ["tallest land animal"]}"#,
            )))
            .expect(1)
            .mount(&server)
            .await;

        let summary = summarizer(&server, Some("sk-test"))
            .summarize("sys", "usr")
            .await
            .unwrap();
        assert_eq!(summary.summary, "Giraffes reach 5.7 m.");
        assert_eq!(summary.key_points.len(), 1);
    }

    #[tokio::test]
    async fn schema_rejection_retries_without_response_format() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(
                serde_json::json!({"response_format": {"type": "json_schema"}}),
            ))
            .respond_with(ResponseTemplate::new(400).set_body_string("response_format unsupported"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(completion("Plain answer about giraffes.")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let summary = summarizer(&server, None).summarize("sys", "usr").await.unwrap();
        assert_eq!(summary.summary, "Plain answer about giraffes.");
    }

    #[tokio::test]
    async fn server_error_is_llm_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = summarizer(&server, None).summarize("sys", "usr").await.unwrap_err();
        assert!(matches!(err, WebgistError::Llm(_)));
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn empty_choices_is_llm_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
            .mount(&server)
            .await;

        let err = summarizer(&server, None).summarize("sys", "usr").await.unwrap_err();
        assert!(err.to_string().contains("no content"));
    }

    #[test]
    fn is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<OpenAiCompatSummarizer>();
    }
}
