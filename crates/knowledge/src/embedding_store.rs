//! Embedding-backed knowledge store.

use async_trait::async_trait;
use pipewright_core::error::KnowledgeError;
use pipewright_core::knowledge::{KnowledgeStore, RetrievalPolicy};
use pipewright_core::provider::{Embedder, Embedding};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::vector::most_similar;

/// A stored fragment and its embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingVector {
    pub vector: Embedding,
    pub text: String,
}

/// A knowledge store that ranks fragments by cosine similarity of their
/// embeddings to the query embedding.
///
/// Retrieval scans every stored vector (O(n) per query).
pub struct EmbeddingVectorStore {
    embedder: Arc<dyn Embedder>,
    policy: RetrievalPolicy,
    vectors: Vec<EmbeddingVector>,
    /// Texts already handed out; consulted under `AvoidRepeats`.
    retrieval_history: HashSet<String>,
}

impl EmbeddingVectorStore {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            policy: RetrievalPolicy::default(),
            vectors: Vec::new(),
            retrieval_history: HashSet::new(),
        }
    }

    /// Set the repeat policy.
    pub fn with_policy(mut self, policy: RetrievalPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> RetrievalPolicy {
        self.policy
    }

    pub fn vectors(&self) -> &[EmbeddingVector] {
        &self.vectors
    }

    /// Dimensionality of the stored embeddings, if anything is stored.
    pub fn dimension(&self) -> Option<usize> {
        self.vectors.first().map(|v| v.vector.len())
    }

    /// Whether `text` has been returned by an earlier retrieval.
    pub fn was_retrieved(&self, text: &str) -> bool {
        self.retrieval_history.contains(text)
    }

    async fn embed_query(&self, query: &str) -> Option<Embedding> {
        match self.embedder.embed(&[query.to_string()]).await {
            Ok(mut vectors) if vectors.len() == 1 => vectors.pop(),
            Ok(vectors) => {
                warn!(
                    embedder = %self.embedder.name(),
                    returned = vectors.len(),
                    "Embedder returned the wrong number of vectors for a query"
                );
                None
            }
            Err(e) => {
                warn!(embedder = %self.embedder.name(), error = %e, "Query embedding failed");
                None
            }
        }
    }
}

fn is_finite(vector: &[f64]) -> bool {
    vector.iter().all(|x| x.is_finite())
}

#[async_trait]
impl KnowledgeStore for EmbeddingVectorStore {
    async fn store(&mut self, knowledge: &[String]) {
        if knowledge.is_empty() {
            return;
        }

        let vectors = match self.embedder.embed(knowledge).await {
            Ok(vectors) => vectors,
            Err(e) => {
                warn!(
                    embedder = %self.embedder.name(),
                    count = knowledge.len(),
                    error = %e,
                    "Embedding failed; nothing stored"
                );
                return;
            }
        };

        if vectors.len() != knowledge.len() {
            warn!(
                embedder = %self.embedder.name(),
                expected = knowledge.len(),
                returned = vectors.len(),
                "Embedder returned a mismatched batch; nothing stored"
            );
            return;
        }

        let expected = self.dimension().unwrap_or(vectors[0].len());
        if let Some(bad) = vectors.iter().find(|v| v.len() != expected) {
            warn!(
                embedder = %self.embedder.name(),
                expected,
                found = bad.len(),
                "Embedder returned vectors of another dimension; nothing stored"
            );
            return;
        }

        if vectors.iter().any(|v| !is_finite(v)) {
            warn!(
                embedder = %self.embedder.name(),
                "Embedder returned non-finite values; nothing stored"
            );
            return;
        }

        self.vectors.extend(
            vectors
                .into_iter()
                .zip(knowledge)
                .map(|(vector, text)| EmbeddingVector {
                    vector,
                    text: text.clone(),
                }),
        );

        debug!(added = knowledge.len(), total = self.vectors.len(), "Stored knowledge");
    }

    async fn retrieve(
        &mut self,
        query: &str,
        min_similarity: f64,
    ) -> Result<Option<String>, KnowledgeError> {
        let Some(expected) = self.dimension() else {
            return Err(KnowledgeError::EmptyStore);
        };

        let Some(query_vector) = self.embed_query(query).await else {
            return Ok(None);
        };

        if !is_finite(&query_vector) {
            warn!(embedder = %self.embedder.name(), "Query embedding has non-finite values");
            return Ok(None);
        }

        if query_vector.len() != expected {
            return Err(KnowledgeError::DimensionMismatch {
                expected,
                found: query_vector.len(),
            });
        }

        let Some((index, score)) = most_similar(
            &query_vector,
            self.vectors.iter().map(|v| v.vector.as_slice()),
        ) else {
            debug!("No stored vector could be scored against the query");
            return Ok(None);
        };

        let text = &self.vectors[index].text;

        if score < min_similarity {
            debug!(score, min_similarity, "Best match below similarity floor");
            return Ok(None);
        }

        if self.policy == RetrievalPolicy::AvoidRepeats && self.retrieval_history.contains(text) {
            debug!(score, "Best match already retrieved");
            return Ok(None);
        }

        debug!(score, index, "Retrieved knowledge");
        self.retrieval_history.insert(text.clone());
        Ok(Some(text.clone()))
    }

    fn len(&self) -> usize {
        self.vectors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipewright_core::error::ProviderError;
    use pipewright_core::knowledge::DEFAULT_MIN_SIMILARITY;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const PARIS: &str = "Paris is the capital of France.";
    const SKY: &str = "The sky is blue.";
    const QUESTION: &str = "What is the capital of France?";

    /// Looks texts up in a fixed table; unknown text fails the whole batch.
    struct TableEmbedder {
        table: HashMap<String, Embedding>,
        calls: AtomicUsize,
    }

    impl TableEmbedder {
        fn new(entries: &[(&str, Embedding)]) -> Self {
            Self {
                table: entries
                    .iter()
                    .map(|(text, v)| (text.to_string(), v.clone()))
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Embedder for TableEmbedder {
        fn name(&self) -> &str {
            "table"
        }

        async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            texts
                .iter()
                .map(|t| {
                    self.table
                        .get(t)
                        .cloned()
                        .ok_or_else(|| ProviderError::Network(format!("cannot embed {t:?}")))
                })
                .collect()
        }
    }

    /// Query embedding at similarity 0.92 to PARIS and ~0.39 to SKY.
    fn paris_embedder() -> Arc<TableEmbedder> {
        let y = (1.0f64 - 0.92 * 0.92).sqrt();
        Arc::new(TableEmbedder::new(&[
            (PARIS, vec![1.0, 0.0]),
            (SKY, vec![0.0, 1.0]),
            (QUESTION, vec![0.92, y]),
            ("What colour is the sky?", vec![0.1, 0.99]),
            ("3d query", vec![1.0, 0.0, 0.0]),
            ("3d fact", vec![0.0, 0.0, 1.0]),
            ("undefined", vec![f64::NAN, 0.0]),
            ("exact", vec![1.0, 0.0]),
        ]))
    }

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn store_keeps_input_order() {
        let mut store = EmbeddingVectorStore::new(paris_embedder());
        store.store(&texts(&[PARIS, SKY])).await;

        assert_eq!(store.len(), 2);
        assert_eq!(store.dimension(), Some(2));
        assert_eq!(store.vectors()[0].text, PARIS);
        assert_eq!(store.vectors()[1].vector, vec![0.0, 1.0]);
    }

    #[tokio::test]
    async fn store_fails_soft_when_embedding_fails() {
        let mut store = EmbeddingVectorStore::new(paris_embedder());
        store.store(&texts(&[PARIS, "not in the table"])).await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn store_of_nothing_skips_the_embedder() {
        let embedder = paris_embedder();
        let mut store = EmbeddingVectorStore::new(embedder.clone());
        store.store(&[]).await;
        assert_eq!(embedder.calls(), 0);
    }

    #[tokio::test]
    async fn retrieve_returns_best_match_above_floor() {
        let mut store = EmbeddingVectorStore::new(paris_embedder());
        store.store(&texts(&[PARIS, SKY])).await;

        let hit = store.retrieve(QUESTION, 0.8).await.unwrap();
        assert_eq!(hit.as_deref(), Some(PARIS));
    }

    #[tokio::test]
    async fn retrieve_rejects_match_below_floor() {
        let mut store = EmbeddingVectorStore::new(paris_embedder());
        store.store(&texts(&[PARIS, SKY])).await;

        assert_eq!(store.retrieve(QUESTION, 0.95).await.unwrap(), None);
    }

    #[tokio::test]
    async fn retrieve_never_returns_below_floor() {
        let mut store = EmbeddingVectorStore::new(paris_embedder());
        store.store(&texts(&[PARIS, SKY])).await;

        for floor in [-1.0, 0.0, 0.5, 0.91, 0.92 + 1e-9, 0.99, 1.0] {
            if let Some(text) = store.retrieve(QUESTION, floor).await.unwrap() {
                let v = &store.vectors().iter().find(|v| v.text == text).unwrap().vector;
                let q = vec![0.92, (1.0f64 - 0.92 * 0.92).sqrt()];
                assert!(crate::cosine_similarity(&q, v) >= floor);
            }
        }
    }

    #[tokio::test]
    async fn retrieve_from_empty_store_is_an_error() {
        let embedder = paris_embedder();
        let mut store = EmbeddingVectorStore::new(embedder.clone());
        let err = store.retrieve_best(QUESTION).await.unwrap_err();
        assert_eq!(err, KnowledgeError::EmptyStore);
        assert_eq!(embedder.calls(), 0);
    }

    #[tokio::test]
    async fn retrieve_is_none_when_query_cannot_be_embedded() {
        let mut store = EmbeddingVectorStore::new(paris_embedder());
        store.store(&texts(&[PARIS])).await;
        assert_eq!(store.retrieve_best("unknown query").await.unwrap(), None);
    }

    #[tokio::test]
    async fn retrieve_rejects_mismatched_dimensions() {
        let mut store = EmbeddingVectorStore::new(paris_embedder());
        store.store(&texts(&[PARIS])).await;
        let err = store.retrieve("3d query", DEFAULT_MIN_SIMILARITY).await.unwrap_err();
        assert_eq!(
            err,
            KnowledgeError::DimensionMismatch {
                expected: 2,
                found: 3
            }
        );
    }

    #[tokio::test]
    async fn allow_repeats_returns_same_text_again() {
        let mut store = EmbeddingVectorStore::new(paris_embedder());
        store.store(&texts(&[PARIS, SKY])).await;

        assert_eq!(store.retrieve_best(QUESTION).await.unwrap().as_deref(), Some(PARIS));
        assert_eq!(store.retrieve_best(QUESTION).await.unwrap().as_deref(), Some(PARIS));
        assert!(store.was_retrieved(PARIS));
    }

    #[tokio::test]
    async fn avoid_repeats_never_returns_same_text_twice() {
        let mut store =
            EmbeddingVectorStore::new(paris_embedder()).with_policy(RetrievalPolicy::AvoidRepeats);
        store.store(&texts(&[PARIS, SKY])).await;

        let queries = [QUESTION, QUESTION, "What colour is the sky?", QUESTION, "What colour is the sky?"];
        let mut returned = Vec::new();
        for query in queries {
            if let Some(text) = store.retrieve_best(query).await.unwrap() {
                assert!(!returned.contains(&text), "{text} returned twice");
                returned.push(text);
            }
        }
        assert_eq!(returned, vec![PARIS.to_string(), SKY.to_string()]);
    }

    #[tokio::test]
    async fn avoid_repeats_does_not_fall_back_to_runner_up() {
        let mut store =
            EmbeddingVectorStore::new(paris_embedder()).with_policy(RetrievalPolicy::AvoidRepeats);
        store.store(&texts(&[PARIS, SKY])).await;

        assert!(store.retrieve_best(QUESTION).await.unwrap().is_some());
        assert_eq!(store.retrieve_best(QUESTION).await.unwrap(), None);
        assert!(!store.was_retrieved(SKY));
    }

    #[tokio::test]
    async fn store_rejects_batch_with_mixed_dimensions() {
        let mut store = EmbeddingVectorStore::new(paris_embedder());
        store.store(&texts(&[PARIS, "3d fact"])).await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn store_rejects_later_batch_of_another_dimension() {
        let mut store = EmbeddingVectorStore::new(paris_embedder());
        store.store(&texts(&[PARIS])).await;
        store.store(&texts(&["3d fact"])).await;

        assert_eq!(store.len(), 1);
        assert_eq!(store.dimension(), Some(2));
        // Retrieval keeps working instead of tripping over the odd vector.
        assert_eq!(store.retrieve_best("exact").await.unwrap().as_deref(), Some(PARIS));
    }

    #[tokio::test]
    async fn store_rejects_non_finite_vectors() {
        let mut store = EmbeddingVectorStore::new(paris_embedder());
        store.store(&texts(&[PARIS])).await;
        store.store(&texts(&["undefined"])).await;

        assert_eq!(store.len(), 1);
        assert_eq!(store.retrieve("exact", 0.99).await.unwrap().as_deref(), Some(PARIS));
    }

    #[tokio::test]
    async fn non_finite_query_retrieves_nothing() {
        let mut store = EmbeddingVectorStore::new(paris_embedder());
        store.store(&texts(&[PARIS, SKY])).await;
        assert_eq!(store.retrieve_best("undefined").await.unwrap(), None);
    }
}
