//! HTTP client for the generative service

use brainrot_protocol::api::{ApiErrorResponse, GenerateContentRequest, GenerateContentResponse};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;
use validator::Validate;

use crate::config::Config;
use crate::error::{BrainrotError, Result};

/// Anything that can answer a generateContent request
#[allow(async_fn_in_trait)]
pub trait GenerativeClient {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse>;
}

/// Gemini REST client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    config: Config,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let api_key = config.require_api_key()?.to_string();

        let mut client_builder = Client::builder().timeout(Duration::from_secs(config.timeout));

        if !config.use_proxy {
            client_builder = client_builder.no_proxy();
        }

        let client = client_builder.build()?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }
}

impl GenerativeClient for GeminiClient {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = self.config.endpoint_url(model);
        debug!(model, %url, "sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;
        let status = response.status();
        let response_text = response.text().await?;

        parse_response(status, &response_text)
    }
}

/// Map a status and body to a response or an API error
fn parse_response(status: StatusCode, body: &str) -> Result<GenerateContentResponse> {
    if !status.is_success() {
        let message = serde_json::from_str::<ApiErrorResponse>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| truncate(body, 200));
        return Err(BrainrotError::api(status.as_u16(), message));
    }

    serde_json::from_str::<GenerateContentResponse>(body).map_err(|e| {
        BrainrotError::invalid_response(format!(
            "Invalid generateContent response ({}): {}",
            e,
            truncate(body, 200)
        ))
    })
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_api_key() {
        let config = Config {
            api_key: None,
            ..Config::default()
        };
        let err = GeminiClient::new(config).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::MissingConfig);
    }

    #[test]
    fn test_new_with_key() {
        let config = Config {
            api_key: Some("key".to_string()),
            use_proxy: false,
            ..Config::default()
        };
        let client = GeminiClient::new(config).unwrap();
        assert_eq!(client.api_key, "key");
    }

    #[test]
    fn test_error_envelope_message_is_used() {
        let body = r#"{"error": {"code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED"}}"#;

        let err = parse_response(StatusCode::TOO_MANY_REQUESTS, body).unwrap_err();

        match &err {
            BrainrotError::Api { status, message, .. } => {
                assert_eq!(*status, 429);
                assert_eq!(message, "Resource has been exhausted");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.is_retryable());
    }

    #[test]
    fn test_raw_error_body_is_truncated() {
        let body = format!("<html>{}</html>", "x".repeat(500));

        let err = parse_response(StatusCode::BAD_GATEWAY, &body).unwrap_err();

        match err {
            BrainrotError::Api { code, status, message } => {
                assert_eq!(code, crate::error::ErrorCode::ApiError);
                assert_eq!(status, 502);
                assert!(message.starts_with("<html>"));
                assert!(message.ends_with("..."));
                assert_eq!(message.chars().count(), 203);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_success_with_bad_json_is_invalid_response() {
        let err = parse_response(StatusCode::OK, "not json at all").unwrap_err();

        assert_eq!(err.code(), crate::error::ErrorCode::InvalidResponse);
        assert!(err.to_string().contains("not json at all"));
    }

    #[test]
    fn test_success_body_is_parsed() {
        let body = r#"{"candidates": [{"content": {"parts": [{"text": "[]"}]}}]}"#;

        let response = parse_response(StatusCode::OK, body).unwrap();
        assert_eq!(response.text().as_deref(), Some("[]"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ñandú-ñandú", 5), "ñandú...");
    }
}
