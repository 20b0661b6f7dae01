//! OpenAI-compatible provider implementation.
//!
//! Works with OpenAI and any endpoint that exposes `/chat/completions` and
//! `/embeddings` in the OpenAI wire format (OpenRouter, Ollama, vLLM, ...).

use async_trait::async_trait;
use pipewright_core::error::ProviderError;
use pipewright_core::provider::{Embedder, Embedding, LanguageModel, error_text};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::http;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4.1";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";

/// An OpenAI-compatible completion and embedding client.
pub struct OpenAiCompatProvider {
    name: String,
    base_url: String,
    api_key: String,
    model: String,
    embedding_model: String,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    /// Create a new OpenAI-compatible provider with the OpenAI default models.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.into(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.into(),
            client: http::client(),
        }
    }

    /// Create an OpenAI provider (convenience constructor).
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self::new("openai", DEFAULT_BASE_URL, api_key)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn try_complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        debug!(provider = %self.name, model = %self.model, "Sending completion request");

        let request = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body);
        let response: ChatResponse = http::send_json(&self.name, request).await?;
        response.into_text()
    }
}

#[async_trait]
impl LanguageModel for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, prompt: &str) -> String {
        match self.try_complete(prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!(provider = %self.name, error = %e, "Completion failed");
                error_text(&e)
            }
        }
    }
}

#[async_trait]
impl Embedder for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>, ProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/embeddings", self.base_url);
        let body = EmbeddingRequest {
            model: &self.embedding_model,
            input: texts,
            encoding_format: "float",
        };

        debug!(
            provider = %self.name,
            model = %self.embedding_model,
            count = texts.len(),
            "Sending embedding request"
        );

        let request = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body);
        let response: EmbeddingResponse = http::send_json(&self.name, request).await?;
        response.into_vectors(texts.len())
    }
}

// --- OpenAI API types (internal) ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl ChatResponse {
    fn into_text(self) -> Result<String, ProviderError> {
        self.choices
            .into_iter()
            .next()
            .map(|c| c.message.content.unwrap_or_default())
            .ok_or_else(|| ProviderError::MalformedResponse("No choices in response".into()))
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
    encoding_format: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f64>,
    #[serde(default)]
    index: Option<usize>,
}

impl EmbeddingResponse {
    /// Vectors in input order, checked against the number of inputs.
    fn into_vectors(mut self, expected: usize) -> Result<Vec<Embedding>, ProviderError> {
        if self.data.len() != expected {
            return Err(ProviderError::MalformedResponse(format!(
                "expected {expected} embeddings, got {}",
                self.data.len()
            )));
        }
        self.data.sort_by_key(|d| d.index.unwrap_or(0));
        Ok(self.data.into_iter().map(|d| d.embedding).collect())
    }
}
