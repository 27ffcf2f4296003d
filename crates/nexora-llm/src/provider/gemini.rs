//! Google Gemini provider implementation

use crate::cache::LLMCache;
use crate::client::{LLMClient, LLMRequest, LLMResponse};
use crate::error::{LLMError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Google Gemini provider (`models/{model}:generateContent`)
pub struct GeminiProvider {
    api_key: String,
    base_url: String,
    cache: Option<Arc<dyn LLMCache>>,
    client: Client,
}

impl GeminiProvider {
    /// Create a new Gemini provider
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            cache: None,
            client: Client::new(),
        }
    }

    /// Point the provider at another endpoint (proxies, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Attach a response cache
    pub fn with_cache(mut self, cache: Arc<dyn LLMCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    fn build_body(request: &LLMRequest) -> serde_json::Value {
        let mut body = json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": request.prompt}]
            }],
        });

        if let Some(system) = &request.system {
            body["systemInstruction"] = json!({ "parts": [{"text": system}] });
        }

        let mut generation_config = serde_json::Map::new();
        if let Some(max_tokens) = request.max_tokens {
            generation_config.insert("maxOutputTokens".to_string(), json!(max_tokens));
        }
        if let Some(temperature) = request.temperature {
            generation_config.insert("temperature".to_string(), json!(temperature));
        }
        if !generation_config.is_empty() {
            body["generationConfig"] = json!(generation_config);
        }

        body
    }
}

#[async_trait]
impl LLMClient for GeminiProvider {
    async fn call(&self, request: LLMRequest) -> Result<LLMResponse> {
        // Check cache first
        if let Some(ref cache) = self.cache {
            if let Some(cached) = cache.get(&request).await {
                debug!(model = %request.model, "gemini cache hit");
                return Ok(cached);
            }
        }

        let body = Self::build_body(&request);
        let url = format!("{}/models/{}:generateContent", self.base_url, request.model);

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LLMError::ApiCallFailed(format!("Gemini API call failed: {}", e)))?;

        let status = resp.status();
        let resp_text = resp
            .text()
            .await
            .map_err(|e| LLMError::ApiCallFailed(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(LLMError::ApiStatus {
                status: status.as_u16(),
                message: resp_text,
            });
        }

        let resp_json: serde_json::Value = serde_json::from_str(&resp_text)
            .map_err(|e| LLMError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        // A candidate may split its text across several parts
        let parts = resp_json["candidates"][0]["content"]["parts"]
            .as_array()
            .ok_or_else(|| LLMError::InvalidResponse("No content in response".to_string()))?;
        let content: String = parts
            .iter()
            .filter_map(|part| part["text"].as_str())
            .collect();

        let mut response = LLMResponse::new(content, request.model.clone());
        if let Some(reason) = resp_json["candidates"][0]["finishReason"].as_str() {
            response = response.with_finish_reason(reason);
        }
        if let Some(tokens) = resp_json["usageMetadata"]["totalTokenCount"].as_u64() {
            response = response.with_tokens(tokens as u32);
        }

        if let Some(ref cache) = self.cache {
            cache.set(request, response.clone()).await;
        }

        Ok(response)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
