//! Generation service boundary

use crate::error::Result;
use async_trait::async_trait;

/// One completion request
///
/// `system` carries the persona and compliance instructions; providers send
/// it through their dedicated channel (Gemini `systemInstruction`, OpenAI
/// `system` message) rather than inlining it into the prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct LLMRequest {
    pub system: Option<String>,
    pub prompt: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl LLMRequest {
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            model: model.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Apply optional sampling settings; `None` keeps the provider default
    pub fn with_sampling(mut self, temperature: Option<f32>, max_tokens: Option<u32>) -> Self {
        self.temperature = temperature.or(self.temperature);
        self.max_tokens = max_tokens.or(self.max_tokens);
        self
    }
}

/// A completion
#[derive(Debug, Clone, PartialEq)]
pub struct LLMResponse {
    pub content: String,
    pub model: String,
    /// Total tokens billed, when the provider reports it
    pub tokens_used: Option<u32>,
    /// Provider stop reason as sent (`STOP`, `MAX_TOKENS`, `length`, ...)
    pub finish_reason: Option<String>,
}

impl LLMResponse {
    pub fn new(content: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: model.into(),
            tokens_used: None,
            finish_reason: None,
        }
    }

    pub fn with_tokens(mut self, tokens: u32) -> Self {
        self.tokens_used = Some(tokens);
        self
    }

    pub fn with_finish_reason(mut self, reason: impl Into<String>) -> Self {
        self.finish_reason = Some(reason.into());
        self
    }

    /// The output stopped at the token limit and is likely cut mid-JSON
    pub fn is_truncated(&self) -> bool {
        matches!(
            self.finish_reason.as_deref(),
            Some("MAX_TOKENS") | Some("length")
        )
    }
}

/// Async client for a text generation service
///
/// One shared handle serves all requests, so implementations must be safe
/// for concurrent use.
#[async_trait]
pub trait LLMClient: Send + Sync {
    async fn call(&self, request: LLMRequest) -> Result<LLMResponse>;

    /// Provider name for logs
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampling_keeps_explicit_values() {
        let request = LLMRequest::new("Recommend a card", "gemini-2.5-flash")
            .with_system("You are a helpful Financial Advisor for a Bank.")
            .with_temperature(0.2)
            .with_sampling(None, Some(512));

        assert_eq!(request.temperature, Some(0.2));
        assert_eq!(request.max_tokens, Some(512));
        assert_eq!(
            request.system.as_deref(),
            Some("You are a helpful Financial Advisor for a Bank.")
        );
    }

    #[test]
    fn test_truncation_by_provider_reason() {
        let base = LLMResponse::new("{\"product_name\": \"Trav", "gemini-2.5-flash");
        assert!(!base.is_truncated());
        assert!(base.clone().with_finish_reason("MAX_TOKENS").is_truncated());
        assert!(base.clone().with_finish_reason("length").is_truncated());
        assert!(!base.with_finish_reason("STOP").is_truncated());
    }
}
