//! In-memory retriever ranked by cosine similarity

use crate::error::{RetrievalError, RetrievalResult};
use crate::traits::{check_k, Embedder, KnowledgeRetriever};
use async_trait::async_trait;
use nexora_core::DocumentExcerpt;
use std::cmp::Ordering;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

struct Entry {
    excerpt: DocumentExcerpt,
    vector: Vec<f32>,
}

/// Vectors held in memory, ranked by cosine similarity
///
/// Ties keep insertion order.
pub struct InMemoryRetriever {
    embedder: Arc<dyn Embedder>,
    entries: RwLock<Vec<Entry>>,
}

impl InMemoryRetriever {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Add a pre-computed vector
    pub async fn insert(&self, excerpt: DocumentExcerpt, vector: Vec<f32>) {
        self.entries.write().await.push(Entry { excerpt, vector });
    }

    /// Embed and add texts; returns the number added
    pub async fn add_texts(&self, texts: Vec<String>) -> RetrievalResult<usize> {
        let vectors = self.embedder.embed(texts.clone()).await?;
        if vectors.len() != texts.len() {
            return Err(RetrievalError::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                vectors.len()
            )));
        }

        let mut entries = self.entries.write().await;
        for (text, vector) in texts.into_iter().zip(vectors) {
            entries.push(Entry {
                excerpt: DocumentExcerpt::new(text),
                vector,
            });
        }
        Ok(entries.len())
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KnowledgeRetriever for InMemoryRetriever {
    async fn search(&self, query: &str, k: usize) -> RetrievalResult<Vec<DocumentExcerpt>> {
        check_k(k)?;

        if self.is_empty().await {
            return Ok(Vec::new());
        }

        // The guard is never held across the embedding call
        let query_vector = self.embedder.embed_single(query).await?;
        let entries = self.entries.read().await;

        let mut scored: Vec<(f32, &Entry)> = entries
            .iter()
            .map(|entry| (cosine_similarity(&query_vector, &entry.vector), entry))
            .collect();

        // sort_by is stable
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

        let results: Vec<DocumentExcerpt> = scored
            .into_iter()
            .take(k)
            .map(|(score, entry)| entry.excerpt.clone().with_score(score))
            .collect();

        debug!(found = results.len(), k, "in-memory search complete");
        Ok(results)
    }
}

/// Cosine similarity; 0.0 for mismatched lengths or zero vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
