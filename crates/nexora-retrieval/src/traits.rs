//! Retrieval traits

use crate::error::{RetrievalError, RetrievalResult};
use async_trait::async_trait;
use nexora_core::DocumentExcerpt;

/// Similarity search over the bank's product documents
#[async_trait]
pub trait KnowledgeRetriever: Send + Sync {
    /// Return at most `k` excerpts, most similar first
    ///
    /// An empty result is valid. `k == 0` is rejected with
    /// [`RetrievalError::InvalidRequest`].
    async fn search(&self, query: &str, k: usize) -> RetrievalResult<Vec<DocumentExcerpt>>;
}

/// Turns text into vectors
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed several texts; output order matches input order
    async fn embed(&self, texts: Vec<String>) -> RetrievalResult<Vec<Vec<f32>>>;

    /// Embed a single text
    async fn embed_single(&self, text: &str) -> RetrievalResult<Vec<f32>> {
        self.embed(vec![text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RetrievalError::InvalidResponse("No embedding returned".to_string()))
    }
}

pub(crate) fn check_k(k: usize) -> RetrievalResult<()> {
    if k == 0 {
        return Err(RetrievalError::InvalidRequest(
            "k must be at least 1".to_string(),
        ));
    }
    Ok(())
}
