//! Model backends for Pipewright.
//!
//! Every client implements both `pipewright_core::LanguageModel` and
//! `pipewright_core::Embedder`. [`build_from_config`] picks one based on
//! configuration.

pub mod factory;
pub mod gemini;
mod http;
pub mod openai_compat;

pub use factory::{Backend, build_from_config};
pub use gemini::GeminiProvider;
pub use openai_compat::OpenAiCompatProvider;
