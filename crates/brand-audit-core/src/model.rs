//! Model service seam and the Gemini HTTP client.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::domain::ModelError;

/// A generative model service, called once per model identifier.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Return the model's text for `prompt`, or an error for this identifier.
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, ModelError>;

    fn provider_name(&self) -> &'static str;
}

/// Client for the `generateContent` REST API.
pub struct GeminiClient {
    endpoint: String,
    api_key: String,
    search_grounding: bool,
    http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(endpoint: &str, api_key: &str, search_grounding: bool) -> Result<Self, ModelError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("brand-audit/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            search_grounding,
            http,
        })
    }

    fn url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, model)
    }

    /// Request body. The JSON MIME constraint cannot be combined with the
    /// search tool, so grounded requests rely on the prompt alone.
    pub fn request_body(prompt: &str, search_grounding: bool) -> Value {
        let mut body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
        });
        if search_grounding {
            body["tools"] = json!([{ "google_search": {} }]);
        } else {
            body["generationConfig"] = json!({ "responseMimeType": "application/json" });
        }
        body
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, ModelError> {
        let resp = self
            .http
            .post(self.url(model))
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::request_body(prompt, self.search_grounding))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let json: Value = resp.json().await?;
        let text = extract_text(&json)?;
        if text.trim().is_empty() {
            return Err(ModelError::EmptyResponse {
                model: model.to_string(),
            });
        }
        Ok(text)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}

/// Concatenate `candidates[0].content.parts[*].text`.
pub fn extract_text(response: &Value) -> Result<String, ModelError> {
    let parts = response
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            let reason = response
                .pointer("/promptFeedback/blockReason")
                .and_then(Value::as_str)
                .map(|r| format!("prompt blocked: {r}"))
                .unwrap_or_else(|| "no candidate parts".to_string());
            ModelError::MissingContent(reason)
        })?;

    Ok(parts
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect::<Vec<_>>()
        .concat())
}
