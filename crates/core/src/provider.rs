//! Capability traits for external model backends.
//!
//! The orchestration core needs exactly two things from the outside world:
//! a text completion ([`LanguageModel`]) and batch embeddings ([`Embedder`]).
//! Implementations: OpenAI-compatible endpoints, Gemini, scripted test doubles.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::ProviderError;
use crate::pipe::Pipe;

/// A single embedding vector.
pub type Embedding = Vec<f64>;

/// Single-shot text completion.
///
/// Implementations never fail across this boundary: an upstream failure is
/// reported as a textual payload (conventionally `"Error: ..."`), which the
/// caller treats as ordinary output.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// A human-readable name for this model backend (e.g., "openai", "gemini").
    fn name(&self) -> &str;

    /// Complete `prompt` and return the generated text.
    async fn complete(&self, prompt: &str) -> String;
}

/// Batch text embedding.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// A human-readable name for this embedding backend.
    fn name(&self) -> &str;

    /// Embed every text, returning one vector per input in input order.
    ///
    /// An `Err` means the whole batch could not be embedded.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>, ProviderError>;
}

#[async_trait]
impl<T: LanguageModel + ?Sized> LanguageModel for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn complete(&self, prompt: &str) -> String {
        (**self).complete(prompt).await
    }
}

#[async_trait]
impl<T: Embedder + ?Sized> Embedder for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>, ProviderError> {
        (**self).embed(texts).await
    }
}

/// Render a provider failure the way completions report it.
pub fn error_text(error: &ProviderError) -> String {
    format!("Error: {error}")
}

/// A stateless language model used directly as a pipeline stage.
///
/// Unlike `ContextAwareLanguageModel` this keeps no history: the input is the
/// whole prompt.
pub struct Completion {
    model: Arc<dyn LanguageModel>,
}

impl Completion {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl Pipe<String> for Completion {
    type Output = String;

    async fn execute(&mut self, input: String) -> String {
        self.model.complete(&input).await
    }
}
