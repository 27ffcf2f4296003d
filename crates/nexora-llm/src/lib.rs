//! Nexora LLM Integration
//!
//! This crate is the boundary to the text generation service used by the
//! recommendation pipeline:
//! - A provider-neutral [`LLMClient`] trait with request/response types
//! - Google Gemini and OpenAI-compatible HTTP providers, plus a scripted mock
//! - An optional response cache shared by providers
//! - Extraction of fenced code blocks and JSON from raw completions
//!
//! **Note**: Providers perform exactly one HTTP call per request. Timeouts
//! and retries are applied by the caller.

// Re-export core types
pub use cache::{InMemoryLLMCache, LLMCache, DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL};
pub use client::{LLMClient, LLMRequest, LLMResponse};
pub use error::{LLMError, Result};
pub use extractor::{extract_fenced_block, extract_json, normalize_response};

// Re-export providers
pub use provider::{
    create_provider, GeminiProvider, MockProvider, MockReply, OpenAIProvider, ProviderKind,
};

pub mod cache;
pub mod client;
pub mod error;
pub mod extractor;
pub mod provider;
