use crate::domain::ports::{CompletionRequest, ConfigProvider, GenerativeBackend};
use crate::utils::error::{BackendError, EcosyncError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const API_KEY_ENV_ALT: &str = "OPENAI_API_KEY_ENV_VAR";

/// First non-blank key from the process environment.
pub fn api_key_from_env() -> Option<String> {
    [API_KEY_ENV, API_KEY_ENV_ALT]
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|key| !key.trim().is_empty())
}

/// Chat Completions client for OpenAI and compatible servers.
pub struct OpenAiBackend {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl OpenAiBackend {
    pub fn new(
        api_key: Option<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(EcosyncError::Http)?;

        Ok(Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(
            config.api_key().map(str::to_string),
            config.base_url(),
            config.model(),
            config.request_timeout(),
        )
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl GenerativeBackend for OpenAiBackend {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> std::result::Result<String, BackendError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            BackendError::auth_invalid(format!(
                "no API key configured; set {} or pass --api-key",
                API_KEY_ENV
            ))
        })?;

        let body = ChatCompletionsRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: request.json_output.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        };

        tracing::debug!("POST {} (model {})", self.endpoint(), self.model);
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        tracing::debug!("Backend response status: {}", status);

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &error_text));
        }

        let parsed: ChatCompletionsResponse = response.json().await.map_err(|e| {
            BackendError::malformed(format!("unexpected completion envelope: {}", e))
        })?;

        if let Some(usage) = &parsed.usage {
            tracing::debug!(
                "Token usage: prompt {}, completion {}, total {}",
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            );
        }

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| BackendError::malformed("completion has no message content"))
    }
}

/// Maps a non-success HTTP reply to a failure kind from its status and error code.
pub fn classify_status(status: StatusCode, body: &str) -> BackendError {
    let detail = serde_json::from_str::<ApiErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error);

    let message = detail
        .as_ref()
        .and_then(|d| d.message.clone())
        .unwrap_or_else(|| body.trim().to_string());
    let message = format!("{}: {}", status, message);

    let code = detail
        .as_ref()
        .map(|d| {
            format!(
                "{} {}",
                d.code.as_deref().unwrap_or_default(),
                d.error_type.as_deref().unwrap_or_default()
            )
        })
        .unwrap_or_default();

    let err = if status == StatusCode::TOO_MANY_REQUESTS
        || code.contains("insufficient_quota")
        || code.contains("rate_limit")
    {
        BackendError::quota_exceeded(message)
    } else if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        || code.contains("invalid_api_key")
    {
        BackendError::auth_invalid(message)
    } else {
        BackendError::unknown(message)
    };
    err.with_status(status.as_u16())
}

fn classify_transport_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        BackendError::timeout(err.to_string())
    } else {
        BackendError::unknown(format!("request failed: {}", err))
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionsRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionsResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u64,
    completion_tokens: u64,
    total_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: Option<String>,
    #[serde(default, rename = "type")]
    error_type: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::BackendErrorKind;
    use httpmock::prelude::*;
    use serde_json::json;

    fn request() -> CompletionRequest {
        CompletionRequest {
            system: "system text".to_string(),
            user: "user text".to_string(),
            json_output: true,
            temperature: 0.7,
            max_tokens: 3000,
        }
    }

    fn backend(server: &MockServer, api_key: Option<&str>) -> OpenAiBackend {
        OpenAiBackend::new(
            api_key.map(str::to_string),
            server.url("/v1/"),
            DEFAULT_MODEL,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice_content() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("authorization", "Bearer sk-test")
                .json_body_partial(
                    r#"{"model":"gpt-4o","max_tokens":3000,"response_format":{"type":"json_object"}}"#,
                );
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({
                    "id": "chatcmpl-1",
                    "choices": [{ "index": 0, "message": { "role": "assistant", "content": "{\"summary\":\"ok\"}" } }],
                    "usage": { "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15 }
                }));
        });

        let content = backend(&server, Some("sk-test"))
            .complete(&request())
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(content, "{\"summary\":\"ok\"}");
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_request() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200);
        });

        let backend = backend(&server, Some("   "));
        assert!(!backend.has_api_key());
        let err = backend.complete(&request()).await.unwrap_err();

        assert_eq!(err.kind, BackendErrorKind::AuthInvalid);
        api_mock.assert_hits(0);
    }

    #[tokio::test]
    async fn test_status_429_is_quota() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(429).json_body(json!({
                "error": { "message": "You exceeded your current quota", "type": "insufficient_quota", "code": "insufficient_quota" }
            }));
        });

        let err = backend(&server, Some("sk-test"))
            .complete(&request())
            .await
            .unwrap_err();
        assert_eq!(err.kind, BackendErrorKind::QuotaExceeded);
        assert!(err.message.contains("You exceeded your current quota"));
    }

    #[tokio::test]
    async fn test_status_401_is_auth_invalid() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(401).json_body(json!({
                "error": { "message": "Incorrect API key provided", "type": "invalid_request_error", "code": "invalid_api_key" }
            }));
        });

        let err = backend(&server, Some("sk-wrong"))
            .complete(&request())
            .await
            .unwrap_err();
        assert_eq!(err.kind, BackendErrorKind::AuthInvalid);
    }

    #[tokio::test]
    async fn test_server_error_is_unknown_with_message() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(500).body("upstream exploded");
        });

        let err = backend(&server, Some("sk-test"))
            .complete(&request())
            .await
            .unwrap_err();
        assert_eq!(err.kind, BackendErrorKind::Unknown);
        assert!(err.message.contains("upstream exploded"));
    }

    #[tokio::test]
    async fn test_context_length_error_keeps_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(400).json_body(json!({
                "error": {
                    "message": "This model's maximum context length is 4096 tokens, however you requested 4291 tokens.",
                    "type": "invalid_request_error",
                    "code": "context_length_exceeded"
                }
            }));
        });

        let err = backend(&server, Some("sk-test"))
            .complete(&request())
            .await
            .unwrap_err();
        assert_eq!(err.kind, BackendErrorKind::Unknown);
        assert_eq!(err.status, Some(400));
        assert_eq!(err.clone().reclassified(), err);
    }

    #[tokio::test]
    async fn test_slow_reply_is_timeout() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200)
                .delay(Duration::from_millis(500))
                .json_body(json!({ "choices": [] }));
        });

        let backend = OpenAiBackend::new(
            Some("sk-test".to_string()),
            server.url("/v1"),
            DEFAULT_MODEL,
            Duration::from_millis(50),
        )
        .unwrap();
        let err = backend.complete(&request()).await.unwrap_err();

        assert_eq!(err.kind, BackendErrorKind::Timeout);
        assert_eq!(err.status, None);
    }

    #[tokio::test]
    async fn test_empty_choices_is_malformed() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).json_body(json!({ "choices": [] }));
        });

        let err = backend(&server, Some("sk-test"))
            .complete(&request())
            .await
            .unwrap_err();
        assert_eq!(err.kind, BackendErrorKind::Malformed);
    }

    #[test]
    fn test_classify_status_uses_error_code() {
        let body = r#"{"error":{"message":"billing hard limit reached","type":"insufficient_quota","code":null}}"#;
        let err = classify_status(StatusCode::BAD_REQUEST, body);
        assert_eq!(err.kind, BackendErrorKind::QuotaExceeded);

        let err = classify_status(StatusCode::FORBIDDEN, "forbidden");
        assert_eq!(err.kind, BackendErrorKind::AuthInvalid);

        let body = r#"{"error":{"message":"model gpt-9 does not exist"}}"#;
        let err = classify_status(StatusCode::NOT_FOUND, body);
        assert_eq!(err.kind, BackendErrorKind::Unknown);
        assert_eq!(err.status, Some(404));
        assert!(err.message.contains("model gpt-9 does not exist"));
    }
}
