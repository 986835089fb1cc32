//! Blocking HTTP client for the hosted model provider.
//!
//! Three remote operations back the board: vision description of the
//! encoded sketch, text generation (pack / story) grounded on a prior
//! description, and text-to-image enhancement. Each call is a single
//! attempt with a fixed timeout — no retry, no rate-limit handling; any
//! failure is reported to the caller and the session state is left alone.
//!
//! The credential is held by the client instance for the session only.
//! It is never written to disk and never installed into any global.

use crate::prompts;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Default provider endpoint. Overridable through [`ClientConfig::base_url`]
/// so tests can point at a local mock server.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-2";

/// Output resolution requested from the image endpoint.
pub const ENHANCED_IMAGE_SIZE: &str = "512x512";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Response-size ceilings, in provider tokens, per operation.
const DESCRIBE_MAX_TOKENS: u32 = 300;
const PACK_MAX_TOKENS: u32 = 400;
const STORY_MAX_TOKENS: u32 = 500;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("no API key configured")]
    MissingCredential,
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider returned {status}: {message}")]
    Provider { status: u16, message: String },
    #[error("provider response carried no usable content")]
    MissingContent,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub chat_model: String,
    pub image_model: String,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

// ---- provider response shapes ----------------------------------------------

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    /// Content of the first choice, rejecting blank text.
    fn into_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()?
            .message
            .content
            .filter(|content| !content.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    #[serde(default)]
    url: Option<String>,
}

impl ImagesResponse {
    fn into_url(self) -> Option<String> {
        self.data
            .into_iter()
            .next()?
            .url
            .filter(|url| !url.is_empty())
    }
}

// ---- client ------------------------------------------------------------------

pub struct ModelClient {
    config: ClientConfig,
    http: reqwest::blocking::Client,
}

impl ModelClient {
    /// Rejects an empty credential up front; a wrong-but-non-empty key is
    /// only detected by the provider, as an [`ApiError::Provider`].
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        if config.api_key.trim().is_empty() {
            return Err(ApiError::MissingCredential);
        }
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self { config, http })
    }

    /// Vision call: describe the sketch carried in `image_data_uri`.
    pub fn describe(&self, image_data_uri: &str) -> Result<String, ApiError> {
        let body = json!({
            "model": self.config.chat_model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": prompts::describe() },
                    { "type": "image_url", "image_url": { "url": image_data_uri } },
                ],
            }],
            "max_tokens": DESCRIBE_MAX_TOKENS,
        });
        let resp: ChatResponse = self.post_json("chat/completions", &body)?;
        resp.into_content().ok_or(ApiError::MissingContent)
    }

    /// Text call: turn a cached description into the multi-section pack.
    pub fn generate_pack(&self, description: &str) -> Result<String, ApiError> {
        self.chat_text(&prompts::creative_pack(description), PACK_MAX_TOKENS)
    }

    /// Text call: turn a cached description into a children's story.
    pub fn generate_story(&self, description: &str) -> Result<String, ApiError> {
        self.chat_text(&prompts::story(description), STORY_MAX_TOKENS)
    }

    /// Image call: generate an enhanced rendering; returns the hosted URL.
    pub fn enhance_image(&self, description: &str) -> Result<String, ApiError> {
        let body = json!({
            "model": self.config.image_model,
            "prompt": prompts::enhance(description),
            "n": 1,
            "size": ENHANCED_IMAGE_SIZE,
        });
        let resp: ImagesResponse = self.post_json("images/generations", &body)?;
        resp.into_url().ok_or(ApiError::MissingContent)
    }

    /// Download the bytes behind a generated-image URL for display.
    pub fn fetch_image(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let resp = self.http.get(url).send()?;
        let status = resp.status();
        let bytes = resp.bytes()?;
        if !status.is_success() {
            return Err(provider_error(
                status.as_u16(),
                &String::from_utf8_lossy(&bytes),
            ));
        }
        Ok(bytes.to_vec())
    }

    fn chat_text(&self, prompt: &str, max_tokens: u32) -> Result<String, ApiError> {
        let body = json!({
            "model": self.config.chat_model,
            "messages": [{ "role": "user", "content": prompt }],
            "max_tokens": max_tokens,
        });
        let resp: ChatResponse = self.post_json("chat/completions", &body)?;
        resp.into_content().ok_or(ApiError::MissingContent)
    }

    fn post_json<T: DeserializeOwned>(&self, path: &str, body: &Value) -> Result<T, ApiError> {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()?;
        let status = resp.status();
        let text = resp.text()?;
        if !status.is_success() {
            return Err(provider_error(status.as_u16(), &text));
        }
        serde_json::from_str(&text).map_err(|_| ApiError::MissingContent)
    }
}

/// Build an [`ApiError::Provider`], pulling `error.message` out of the body
/// when the provider sent its structured error JSON.
fn provider_error(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")?
                .get("message")?
                .as_str()
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            let mut snippet = body.trim().to_string();
            if snippet.len() > 200 {
                let mut cut = 200;
                while !snippet.is_char_boundary(cut) {
                    cut -= 1;
                }
                snippet.truncate(cut);
            }
            snippet
        });
    ApiError::Provider { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat_response(value: Value) -> ChatResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn empty_credential_is_rejected_locally() {
        for key in ["", "   "] {
            let result = ModelClient::new(ClientConfig::new(key));
            assert!(matches!(result, Err(ApiError::MissingCredential)));
        }
    }

    #[test]
    fn chat_content_comes_from_the_first_choice() {
        let resp = chat_response(json!({
            "choices": [
                { "message": { "role": "assistant", "content": "un sol amarillo" } },
                { "message": { "role": "assistant", "content": "ignored" } },
            ]
        }));
        assert_eq!(resp.into_content().as_deref(), Some("un sol amarillo"));
    }

    #[test]
    fn blank_or_missing_content_reads_as_none() {
        assert!(chat_response(json!({ "choices": [] }))
            .into_content()
            .is_none());
        assert!(
            chat_response(json!({ "choices": [{ "message": { "content": "  " } }] }))
                .into_content()
                .is_none()
        );
        assert!(chat_response(json!({})).into_content().is_none());
    }

    #[test]
    fn image_url_comes_from_the_first_datum() {
        let resp: ImagesResponse =
            serde_json::from_value(json!({ "data": [{ "url": "https://cdn.test/img.png" }] }))
                .unwrap();
        assert_eq!(resp.into_url().as_deref(), Some("https://cdn.test/img.png"));

        let empty: ImagesResponse = serde_json::from_value(json!({ "data": [] })).unwrap();
        assert!(empty.into_url().is_none());
    }

    #[test]
    fn provider_error_prefers_the_structured_message() {
        let err = provider_error(401, r#"{"error":{"message":"Incorrect API key"}}"#);
        match err {
            ApiError::Provider { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Incorrect API key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn provider_error_falls_back_to_a_body_snippet() {
        let err = provider_error(502, "Bad Gateway");
        match err {
            ApiError::Provider { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
