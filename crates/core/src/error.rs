//! Error types for the Pipewright domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.
//!
//! Only contract violations and collaborator failures live here. Conditions
//! that resolve locally (a match below the similarity floor, an unparseable
//! tool selection) are plain `None` values and never become errors.

use thiserror::Error;

/// The top-level error type for all Pipewright operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Knowledge errors ---
    #[error("Knowledge error: {0}")]
    Knowledge(#[from] KnowledgeError),

    // --- Tool errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum KnowledgeError {
    #[error("Cannot retrieve from an empty knowledge store")]
    EmptyStore,

    #[error("Embedding dimension mismatch: store holds {expected}-dimensional vectors, query has {found}")]
    DimensionMismatch { expected: usize, found: usize },
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Duplicate tool name: {0}")]
    DuplicateName(String),

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),

    #[error("Tool execution failed: {tool_name} — {reason}")]
    ExecutionFailed { tool_name: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn dimension_mismatch_names_both_sizes() {
        let err = Error::from(KnowledgeError::DimensionMismatch {
            expected: 3,
            found: 2,
        });
        let text = err.to_string();
        assert!(text.contains("3-dimensional"));
        assert!(text.contains("query has 2"));
    }

    #[test]
    fn tool_error_displays_correctly() {
        let err = Error::Tool(ToolError::ExecutionFailed {
            tool_name: "shell_read".into(),
            reason: "file not found".into(),
        });
        assert!(err.to_string().contains("shell_read"));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn every_variant_has_a_source() {
        let errors = [
            Error::from(ProviderError::Network("refused".into())),
            Error::from(KnowledgeError::EmptyStore),
            Error::from(ToolError::NotFound("shell_rm".into())),
            Error::Config {
                message: "no knowledge store attached".into(),
            },
        ];
        for err in errors {
            let prefix = match &err {
                Error::Provider(_) => "Provider error",
                Error::Knowledge(_) => "Knowledge error",
                Error::Tool(_) => "Tool error",
                Error::Config { .. } => "Configuration error",
            };
            assert!(err.to_string().starts_with(prefix), "{err}");
        }
    }
}
