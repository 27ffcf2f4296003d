//! Nexora knowledge retrieval
//!
//! Finds the bank product excerpts most similar to a transaction
//! description or chat question. Two implementations of
//! [`KnowledgeRetriever`] are provided:
//!
//! - [`QdrantRetriever`]: similarity search against a Qdrant collection
//! - [`InMemoryRetriever`]: cosine ranking over vectors held in memory
//!
//! Both embed the query with an [`Embedder`], normally the HTTP
//! [`EmbeddingService`].

pub mod embeddings;
pub mod error;
pub mod memory;
pub mod qdrant;
pub mod traits;

pub use embeddings::{EmbeddingService, DEFAULT_EMBEDDING_MODEL};
pub use error::{RetrievalError, RetrievalResult};
pub use memory::{cosine_similarity, InMemoryRetriever};
pub use qdrant::{QdrantRetriever, DEFAULT_TEXT_KEY};
pub use traits::{Embedder, KnowledgeRetriever};
