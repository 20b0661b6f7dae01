//! Knowledge retrieval for Pipewright.
//!
//! Fragments are embedded once when stored and compared to each query by
//! cosine similarity. The scan is exhaustive, which is exact and cheap for
//! the in-process, non-persistent collections this crate targets.

pub mod chunking;
pub mod embedding_store;
pub mod vector;

pub use chunking::split_paragraphs;
pub use embedding_store::{EmbeddingVector, EmbeddingVectorStore};
pub use vector::{cosine_similarity, most_similar};
