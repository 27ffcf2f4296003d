//! LLM provider implementations

use crate::cache::LLMCache;
use crate::client::LLMClient;
use crate::error::{LLMError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

mod gemini;
mod mock;
mod openai;

pub use gemini::GeminiProvider;
pub use mock::{MockProvider, MockReply};
pub use openai::OpenAIProvider;

/// Supported provider backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Gemini,
    OpenAI,
    Mock,
}

impl std::str::FromStr for ProviderKind {
    type Err = LLMError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "openai" => Ok(ProviderKind::OpenAI),
            "mock" => Ok(ProviderKind::Mock),
            other => Err(LLMError::InvalidConfiguration(format!(
                "unknown LLM provider '{}'",
                other
            ))),
        }
    }
}

/// Build a shared client for the given backend
pub fn create_provider(
    kind: ProviderKind,
    api_key: &str,
    base_url: Option<String>,
    cache: Option<Arc<dyn LLMCache>>,
) -> Result<Arc<dyn LLMClient>> {
    if kind != ProviderKind::Mock && api_key.trim().is_empty() {
        return Err(LLMError::InvalidConfiguration(format!(
            "{:?} provider requires an API key",
            kind
        )));
    }

    let client: Arc<dyn LLMClient> = match kind {
        ProviderKind::Gemini => {
            let mut provider = GeminiProvider::new(api_key);
            if let Some(url) = base_url {
                provider = provider.with_base_url(url);
            }
            if let Some(cache) = cache {
                provider = provider.with_cache(cache);
            }
            Arc::new(provider)
        }
        ProviderKind::OpenAI => {
            let mut provider = OpenAIProvider::new(api_key);
            if let Some(url) = base_url {
                provider = provider.with_base_url(url);
            }
            if let Some(cache) = cache {
                provider = provider.with_cache(cache);
            }
            Arc::new(provider)
        }
        ProviderKind::Mock => Arc::new(MockProvider::new()),
    };

    Ok(client)
}
