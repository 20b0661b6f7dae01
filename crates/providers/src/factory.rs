//! Provider construction from configuration.

use pipewright_config::AppConfig;
use pipewright_core::error::ProviderError;
use pipewright_core::provider::{Embedder, LanguageModel};
use std::sync::Arc;
use tracing::info;

use crate::gemini::GeminiProvider;
use crate::openai_compat::OpenAiCompatProvider;

/// The completion and embedding handles for one configured backend.
#[derive(Clone)]
pub struct Backend {
    pub language_model: Arc<dyn LanguageModel>,
    pub embedder: Arc<dyn Embedder>,
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend")
            .field("language_model", &self.language_model.name())
            .field("embedder", &self.embedder.name())
            .finish()
    }
}

impl Backend {
    fn from_provider<P>(provider: P) -> Self
    where
        P: LanguageModel + Embedder + 'static,
    {
        let provider = Arc::new(provider);
        Self {
            language_model: provider.clone(),
            embedder: provider,
        }
    }
}

/// Build the backend named by `config.provider`.
pub fn build_from_config(config: &AppConfig) -> Result<Backend, ProviderError> {
    let Some(api_key) = config.api_key.clone() else {
        return Err(ProviderError::NotConfigured(format!(
            "no API key for provider '{}'",
            config.provider
        )));
    };

    let backend = match config.provider.as_str() {
        "openai" => {
            let mut provider = match &config.api_url {
                Some(url) => OpenAiCompatProvider::new("openai", url.as_str(), api_key),
                None => OpenAiCompatProvider::openai(api_key),
            };
            if let Some(model) = &config.model {
                provider = provider.with_model(model.as_str());
            }
            if let Some(model) = &config.embedding_model {
                provider = provider.with_embedding_model(model.as_str());
            }
            info!(model = %provider.model(), embedding_model = %provider.embedding_model(), "Using OpenAI backend");
            Backend::from_provider(provider)
        }
        "gemini" => {
            let mut provider = GeminiProvider::new(api_key);
            if let Some(url) = &config.api_url {
                provider = provider.with_base_url(url.as_str());
            }
            if let Some(model) = &config.model {
                provider = provider.with_model(model.as_str());
            }
            if let Some(model) = &config.embedding_model {
                provider = provider.with_embedding_model(model.as_str());
            }
            info!(model = %provider.model(), embedding_model = %provider.embedding_model(), "Using Gemini backend");
            Backend::from_provider(provider)
        }
        other => {
            return Err(ProviderError::NotConfigured(format!(
                "unknown provider '{other}'"
            )));
        }
    };

    Ok(backend)
}
