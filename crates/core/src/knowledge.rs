//! KnowledgeStore trait — in-process semantic memory.
//!
//! A knowledge store keeps text fragments and hands back the one closest in
//! meaning to a query, provided it clears a similarity floor.

use async_trait::async_trait;
use crate::error::KnowledgeError;

/// Floor that accepts any match (cosine similarity never drops below -1).
pub const DEFAULT_MIN_SIMILARITY: f64 = -1.0;

/// Whether a store may return the same fragment more than once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RetrievalPolicy {
    /// Always return the best match (default).
    #[default]
    AllowRepeats,
    /// Never return a fragment that an earlier call already returned.
    AvoidRepeats,
}

/// The core KnowledgeStore trait.
///
/// Implementations: `EmbeddingVectorStore` (cosine similarity over embeddings).
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Add fragments to the store.
    ///
    /// Fails soft: if the fragments cannot be indexed the call stores nothing.
    async fn store(&mut self, knowledge: &[String]);

    /// The stored fragment most similar to `query`, or `None` when the best
    /// match scores below `min_similarity` or the query cannot be embedded.
    ///
    /// Retrieving from an empty store is a contract violation.
    async fn retrieve(
        &mut self,
        query: &str,
        min_similarity: f64,
    ) -> std::result::Result<Option<String>, KnowledgeError>;

    /// Number of stored fragments.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// [`KnowledgeStore::retrieve`] with no similarity floor.
    async fn retrieve_best(
        &mut self,
        query: &str,
    ) -> std::result::Result<Option<String>, KnowledgeError> {
        self.retrieve(query, DEFAULT_MIN_SIMILARITY).await
    }
}
