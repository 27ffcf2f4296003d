//! Builder pattern for RecommendationEngine

use crate::config::EngineConfig;
use crate::engine::RecommendationEngine;
use crate::error::{Result, SdkError};
use crate::notification::Notifier;
use nexora_llm::LLMClient;
use nexora_repository::{InMemoryInteractionLog, InteractionLog, ProfileRepository};
use nexora_retrieval::KnowledgeRetriever;
use std::sync::Arc;
use tracing::info;

/// Builder for RecommendationEngine
///
/// # Example
///
/// ```rust,ignore
/// use nexora_sdk::{EngineConfig, RecommendationEngineBuilder};
///
/// let engine = RecommendationEngineBuilder::new()
///     .with_profiles(Arc::new(ProfileStore::load("mock_data.json").await?))
///     .with_retriever(retriever)
///     .with_llm(llm)
///     .with_notifier(Arc::new(twilio))
///     .with_interaction_log(Arc::new(CsvInteractionLog::new("interaction_logs.csv")))
///     .with_config(EngineConfig::default().with_sms_destination("+15551234567"))
///     .build()?;
/// ```
#[derive(Default)]
pub struct RecommendationEngineBuilder {
    config: EngineConfig,
    profiles: Option<Arc<dyn ProfileRepository>>,
    retriever: Option<Arc<dyn KnowledgeRetriever>>,
    llm: Option<Arc<dyn LLMClient>>,
    notifier: Option<Arc<dyn Notifier>>,
    interaction_log: Option<Arc<dyn InteractionLog>>,
}

impl RecommendationEngineBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the profile repository (required)
    pub fn with_profiles(mut self, profiles: Arc<dyn ProfileRepository>) -> Self {
        self.profiles = Some(profiles);
        self
    }

    /// Set the knowledge retriever (required)
    pub fn with_retriever(mut self, retriever: Arc<dyn KnowledgeRetriever>) -> Self {
        self.retriever = Some(retriever);
        self
    }

    /// Set the LLM client (required)
    pub fn with_llm(mut self, llm: Arc<dyn LLMClient>) -> Self {
        self.llm = Some(llm);
        self
    }

    /// Set the SMS notifier; without one `accept` fails with a configuration error
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Set the interaction log; defaults to an in-memory log
    pub fn with_interaction_log(mut self, log: Arc<dyn InteractionLog>) -> Self {
        self.interaction_log = Some(log);
        self
    }

    /// Set engine configuration
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the engine
    pub fn build(self) -> Result<RecommendationEngine> {
        let profiles = self
            .profiles
            .ok_or_else(|| SdkError::Configuration("profile repository is required".to_string()))?;
        let retriever = self
            .retriever
            .ok_or_else(|| SdkError::Configuration("knowledge retriever is required".to_string()))?;
        let llm = self
            .llm
            .ok_or_else(|| SdkError::Configuration("LLM client is required".to_string()))?;

        if self.config.recommendation_k == 0 || self.config.chat_k == 0 {
            return Err(SdkError::Configuration(
                "retrieval k must be at least 1".to_string(),
            ));
        }
        if self.config.llm.model.trim().is_empty() {
            return Err(SdkError::Configuration("LLM model is empty".to_string()));
        }

        let interaction_log = self
            .interaction_log
            .unwrap_or_else(|| Arc::new(InMemoryInteractionLog::new()));

        info!(
            llm = llm.name(),
            model = %self.config.llm.model,
            recommendation_k = self.config.recommendation_k,
            chat_k = self.config.chat_k,
            sms = self.notifier.is_some(),
            "recommendation engine ready"
        );

        Ok(RecommendationEngine {
            profiles,
            retriever,
            llm,
            notifier: self.notifier,
            interaction_log,
            config: self.config,
        })
    }
}
