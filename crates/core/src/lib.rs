//! # Pipewright Core
//!
//! Domain types, traits, and error definitions for the Pipewright LLM
//! orchestration toolkit. This crate has **zero framework dependencies** — it
//! defines the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every capability is defined as a trait here. Implementations live in their
//! respective crates. This enables:
//! - Swapping model backends via configuration
//! - Easy testing with scripted stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod knowledge;
pub mod message;
pub mod pipe;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, KnowledgeError, ProviderError, Result, ToolError};
pub use knowledge::{DEFAULT_MIN_SIMILARITY, KnowledgeStore, RetrievalPolicy};
pub use message::{Context, Message, Role, role_legend};
pub use pipe::{Chain, FnPipe, Identity, Pipe, from_fn};
pub use provider::{Completion, Embedder, Embedding, LanguageModel};
pub use tool::{Tool, ToolRegistry, parse_arguments};
