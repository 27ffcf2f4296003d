//! Engine initialization from server configuration

use crate::config::{NotifierKind, RetrieverBackend, ServerConfig};
use anyhow::{anyhow, Context, Result};
use nexora_llm::{create_provider, InMemoryLLMCache, LLMCache, LLMClient, ProviderKind};
use nexora_repository::{CsvInteractionLog, InMemoryInteractionLog, InteractionLog, ProfileStore};
use nexora_retrieval::{
    Embedder, EmbeddingService, InMemoryRetriever, KnowledgeRetriever, QdrantRetriever,
};
use nexora_sdk::{
    MockNotifier, Notifier, RecommendationEngine, RecommendationEngineBuilder, TwilioNotifier,
    TwilioSender,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Build the engine and every collaborator it needs
pub async fn init_engine(config: &ServerConfig) -> Result<RecommendationEngine> {
    let profiles = ProfileStore::load(&config.profiles_path)
        .await
        .with_context(|| format!("loading profiles from {}", config.profiles_path.display()))?;

    let llm = init_llm(config)?;
    let retriever = init_retriever(config).await?;
    let notifier = init_notifier(config)?;

    let interaction_log: Arc<dyn InteractionLog> = match &config.interaction_log_path {
        Some(path) => {
            info!("Interaction log: {}", path.display());
            Arc::new(CsvInteractionLog::new(path))
        }
        None => {
            info!("Interaction log: in-memory");
            Arc::new(InMemoryInteractionLog::new())
        }
    };

    let destination = config
        .notification
        .destination
        .clone()
        .or_else(|| env_var("TARGET_PHONE"));

    let mut builder = RecommendationEngineBuilder::new()
        .with_profiles(Arc::new(profiles))
        .with_retriever(retriever)
        .with_llm(llm)
        .with_interaction_log(interaction_log)
        .with_config(config.engine_config(destination));
    if let Some(notifier) = notifier {
        builder = builder.with_notifier(notifier);
    }

    Ok(builder.build()?)
}

fn init_llm(config: &ServerConfig) -> Result<Arc<dyn LLMClient>> {
    let key_var = match config.llm.provider {
        ProviderKind::Gemini => "GEMINI_API_KEY",
        ProviderKind::OpenAI => "OPENAI_API_KEY",
        ProviderKind::Mock => "",
    };
    let api_key = if key_var.is_empty() {
        String::new()
    } else {
        env_var(key_var).ok_or_else(|| anyhow!("{} is not set", key_var))?
    };

    let cache: Option<Arc<dyn LLMCache>> = if config.llm.cache {
        Some(Arc::new(InMemoryLLMCache::with_limits(
            config.llm.cache_capacity,
            Duration::from_secs(config.llm.cache_ttl_secs),
        )))
    } else {
        None
    };

    let client = create_provider(
        config.llm.provider,
        &api_key,
        config.llm.base_url.clone(),
        cache,
    )?;
    info!(
        "LLM provider: {} (model {})",
        client.name(),
        config.llm.model
    );
    Ok(client)
}

async fn init_retriever(config: &ServerConfig) -> Result<Arc<dyn KnowledgeRetriever>> {
    let settings = &config.retrieval;
    let embedding_key = env_var("EMBEDDING_API_KEY")
        .or_else(|| env_var("OPENAI_API_KEY"))
        .unwrap_or_default();
    if embedding_key.is_empty() {
        warn!("No EMBEDDING_API_KEY or OPENAI_API_KEY set; similarity search will fail");
    }

    let embedder: Arc<dyn Embedder> = Arc::new(EmbeddingService::new_custom(
        embedding_key,
        settings.embedding_base_url.clone(),
        settings.embedding_model.clone(),
    ));

    match settings.backend {
        RetrieverBackend::Qdrant => {
            let retriever = QdrantRetriever::connect(
                &settings.qdrant_url,
                env_var("QDRANT_API_KEY"),
                settings.collection.clone(),
                embedder,
            )?
            .with_text_key(settings.text_key.clone());
            info!(
                "Knowledge retriever: qdrant {} / {}",
                settings.qdrant_url, settings.collection
            );
            Ok(Arc::new(retriever))
        }
        RetrieverBackend::Memory => {
            let retriever = InMemoryRetriever::new(embedder);
            if let Some(path) = &settings.knowledge_path {
                let texts = read_paragraphs(path).await?;
                let count = retriever.add_texts(texts).await?;
                info!("Knowledge retriever: in-memory, {} excerpts", count);
            } else {
                warn!("Knowledge retriever: in-memory with no excerpts");
            }
            Ok(Arc::new(retriever))
        }
    }
}

fn init_notifier(config: &ServerConfig) -> Result<Option<Arc<dyn Notifier>>> {
    match config.notification.provider {
        NotifierKind::Disabled => {
            info!("SMS notifications disabled");
            Ok(None)
        }
        NotifierKind::Mock => {
            info!("SMS notifications: mock");
            Ok(Some(Arc::new(MockNotifier::new())))
        }
        NotifierKind::Twilio => {
            let (Some(sid), Some(token)) =
                (env_var("TWILIO_ACCOUNT_SID"), env_var("TWILIO_AUTH_TOKEN"))
            else {
                warn!("TWILIO_ACCOUNT_SID / TWILIO_AUTH_TOKEN not set; accept will fail");
                return Ok(None);
            };

            let sender = match (
                env_var("TWILIO_MESSAGING_SERVICE_SID"),
                env_var("TWILIO_FROM_NUMBER"),
            ) {
                (Some(service), _) => TwilioSender::MessagingService(service),
                (None, Some(from)) => TwilioSender::From(from),
                (None, None) => {
                    return Err(anyhow!(
                        "set TWILIO_MESSAGING_SERVICE_SID or TWILIO_FROM_NUMBER"
                    ))
                }
            };

            info!("SMS notifications: twilio");
            Ok(Some(Arc::new(TwilioNotifier::new(sid, token, sender)?)))
        }
    }
}

/// Non-empty environment variable
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Blank-line separated paragraphs of a text file
async fn read_paragraphs(path: &Path) -> Result<Vec<String>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading knowledge file {}", path.display()))?;
    Ok(split_paragraphs(&content))
}

fn split_paragraphs(content: &str) -> Vec<String> {
    content
        .replace("\r\n", "\n")
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
