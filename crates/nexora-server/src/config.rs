//! Server configuration

use nexora_llm::ProviderKind;
use nexora_sdk::{EngineConfig, LLMSettings, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Text generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: ProviderKind,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Override the provider endpoint
    pub base_url: Option<String>,
    /// Cache identical prompts in memory
    pub cache: bool,
    /// Most completions kept by the cache
    pub cache_capacity: usize,
    /// Seconds a cached completion stays valid
    pub cache_ttl_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Gemini,
            model: nexora_sdk::config::DEFAULT_MODEL.to_string(),
            temperature: None,
            max_tokens: None,
            base_url: None,
            cache: false,
            cache_capacity: nexora_llm::DEFAULT_CACHE_CAPACITY,
            cache_ttl_secs: nexora_llm::DEFAULT_CACHE_TTL.as_secs(),
        }
    }
}

/// Where product excerpts come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrieverBackend {
    #[default]
    Qdrant,
    Memory,
}

/// Knowledge retrieval settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub backend: RetrieverBackend,
    pub qdrant_url: String,
    pub collection: String,
    /// Payload key holding the chunk text
    pub text_key: String,
    pub embedding_model: String,
    pub embedding_base_url: String,
    /// Plain-text excerpts, one per paragraph, for the memory backend
    pub knowledge_path: Option<PathBuf>,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            backend: RetrieverBackend::Qdrant,
            qdrant_url: "http://localhost:6334".to_string(),
            collection: "bank_products".to_string(),
            text_key: nexora_retrieval::DEFAULT_TEXT_KEY.to_string(),
            embedding_model: nexora_retrieval::DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_base_url: "https://api.openai.com/v1".to_string(),
            knowledge_path: None,
        }
    }
}

/// Pipeline tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub recommendation_k: usize,
    pub chat_k: usize,
    pub retry: RetryPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let engine = EngineConfig::default();
        Self {
            recommendation_k: engine.recommendation_k,
            chat_k: engine.chat_k,
            retry: engine.retry,
        }
    }
}

/// SMS backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
    #[default]
    Twilio,
    Mock,
    Disabled,
}

/// Notification settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub provider: NotifierKind,
    /// Phone number accepted offers go to; falls back to `TARGET_PHONE`
    pub destination: Option<String>,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host
    pub host: String,

    /// Server port (HTTP)
    pub port: u16,

    pub log_format: LogFormat,

    /// Customer profiles (JSON or YAML)
    pub profiles_path: PathBuf,

    /// CSV interaction log; in-memory when unset
    pub interaction_log_path: Option<PathBuf>,

    pub llm: LlmConfig,
    pub retrieval: RetrievalConfig,
    pub engine: PipelineConfig,
    pub notification: NotificationConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            log_format: LogFormat::Pretty,
            profiles_path: PathBuf::from("mock_data.json"),
            interaction_log_path: Some(PathBuf::from("interaction_logs.csv")),
            llm: LlmConfig::default(),
            retrieval: RetrievalConfig::default(),
            engine: PipelineConfig::default(),
            notification: NotificationConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables and config file
    pub fn load() -> anyhow::Result<Self> {
        // Load .env file if exists
        dotenvy::dotenv().ok();

        let config_result = config::Config::builder()
            .add_source(config::File::with_name("config/server").required(false))
            .add_source(
                config::Environment::with_prefix("NEXORA")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build();

        match config_result {
            Ok(cfg) => cfg
                .try_deserialize()
                .map_err(|e| anyhow::anyhow!("Failed to deserialize config: {}", e)),
            Err(_) => {
                tracing::info!("No config file found, using default configuration");
                Ok(Self::default())
            }
        }
    }

    /// Engine configuration derived from the server settings
    ///
    /// `destination` is resolved by the caller so that secrets and phone
    /// numbers can come from the environment.
    pub fn engine_config(&self, destination: Option<String>) -> EngineConfig {
        let mut llm = LLMSettings::new(self.llm.model.clone());
        llm.temperature = self.llm.temperature;
        llm.max_tokens = self.llm.max_tokens;

        EngineConfig {
            recommendation_k: self.engine.recommendation_k,
            chat_k: self.engine.chat_k,
            llm,
            retry: self.engine.retry.clone(),
            sms_destination: destination,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
