//! Configuration types for RecommendationEngine

use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};

/// Default model for recommendations and chat
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Main engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Excerpts retrieved per recommendation
    pub recommendation_k: usize,

    /// Excerpts retrieved per chat question
    pub chat_k: usize,

    /// Generation parameters
    pub llm: LLMSettings,

    /// Retry policy for retriever, LLM and SMS calls
    pub retry: RetryPolicy,

    /// Phone number accepted offers are sent to
    pub sms_destination: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            recommendation_k: 2,
            chat_k: 3,
            llm: LLMSettings::default(),
            retry: RetryPolicy::default(),
            sms_destination: None,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_recommendation_k(mut self, k: usize) -> Self {
        self.recommendation_k = k;
        self
    }

    pub fn with_chat_k(mut self, k: usize) -> Self {
        self.chat_k = k;
        self
    }

    /// Set LLM settings
    pub fn with_llm(mut self, llm: LLMSettings) -> Self {
        self.llm = llm;
        self
    }

    /// Set retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_sms_destination(mut self, destination: impl Into<String>) -> Self {
        self.sms_destination = Some(destination.into());
        self
    }
}

/// Generation parameters passed with every request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LLMSettings {
    /// Model identifier
    pub model: String,

    /// Sampling temperature; provider default when unset
    pub temperature: Option<f32>,

    /// Output token limit; provider default when unset
    pub max_tokens: Option<u32>,
}

impl Default for LLMSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: None,
            max_tokens: None,
        }
    }
}

impl LLMSettings {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}
