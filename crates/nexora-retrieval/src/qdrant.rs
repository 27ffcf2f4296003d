//! Qdrant-backed retriever

use crate::error::{RetrievalError, RetrievalResult};
use crate::traits::{check_k, Embedder, KnowledgeRetriever};
use async_trait::async_trait;
use nexora_core::DocumentExcerpt;
use qdrant_client::qdrant::{SearchPointsBuilder, Value};
use qdrant_client::Qdrant;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Payload key holding the chunk text
pub const DEFAULT_TEXT_KEY: &str = "page_content";

const SOURCE_KEY: &str = "source";

/// Similarity search over a Qdrant collection
///
/// Results keep the order returned by the service.
pub struct QdrantRetriever {
    client: Qdrant,
    collection: String,
    text_key: String,
    embedder: Arc<dyn Embedder>,
}

impl QdrantRetriever {
    /// Connect to Qdrant
    pub fn connect(
        url: &str,
        api_key: Option<String>,
        collection: impl Into<String>,
        embedder: Arc<dyn Embedder>,
    ) -> RetrievalResult<Self> {
        debug!("Connecting to Qdrant at {}", url);

        let client = Qdrant::from_url(url)
            .api_key(api_key)
            .build()
            .map_err(|e| {
                RetrievalError::StoreRejected(format!("Failed to create Qdrant client: {}", e))
            })?;

        Ok(Self {
            client,
            collection: collection.into(),
            text_key: DEFAULT_TEXT_KEY.to_string(),
            embedder,
        })
    }

    /// Read chunk text from another payload key
    pub fn with_text_key(mut self, key: impl Into<String>) -> Self {
        self.text_key = key.into();
        self
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }
}

#[async_trait]
impl KnowledgeRetriever for QdrantRetriever {
    async fn search(&self, query: &str, k: usize) -> RetrievalResult<Vec<DocumentExcerpt>> {
        check_k(k)?;

        let vector = self.embedder.embed_single(query).await?;

        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(self.collection.as_str(), vector, k as u64)
                    .with_payload(true),
            )
            .await?;

        let excerpts: Vec<DocumentExcerpt> = response
            .result
            .into_iter()
            .filter_map(|point| {
                let excerpt = excerpt_from_payload(&point.payload, &self.text_key, point.score);
                if excerpt.is_none() {
                    warn!(
                        collection = %self.collection,
                        key = %self.text_key,
                        "point without text payload skipped"
                    );
                }
                excerpt
            })
            .take(k)
            .collect();

        debug!(
            collection = %self.collection,
            found = excerpts.len(),
            "qdrant search complete"
        );
        Ok(excerpts)
    }
}

fn excerpt_from_payload(
    payload: &HashMap<String, Value>,
    text_key: &str,
    score: f32,
) -> Option<DocumentExcerpt> {
    let text = get_string(payload, text_key)?;
    let mut excerpt = DocumentExcerpt::new(text).with_score(score);
    if let Some(source) = get_string(payload, SOURCE_KEY) {
        excerpt = excerpt.with_source(source);
    }
    Some(excerpt)
}

fn get_string(payload: &HashMap<String, Value>, key: &str) -> Option<String> {
    payload.get(key).and_then(|v| v.as_str().map(|s| s.to_string()))
}
