//! # w2vgrep Vector Store
//!
//! Static word embeddings loaded from word2vec-style binary files, plus
//! memoized cosine similarity between them.
//!
//! ## Formats
//!
//! - **`*.bin`**: text header, `f32` components (classic word2vec binary)
//! - **`*.8int.bin`**: binary header with a quantization range, `i8` components
//!
//! ## Architecture
//!
//! ```text
//! model file
//!     │
//!     ├──> ModelFormat (by suffix)
//!     │      └─> Format A / Format B reader
//!     │
//!     ├──> VectorStore (token -> Embedding, read-only)
//!     │
//!     └──> SimilarityEngine
//!            └─> SimilarityCache keyed by (query, candidate)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use w2vgrep_vector_store::{SimilarityEngine, VectorStore};
//!
//! fn main() -> w2vgrep_vector_store::Result<()> {
//!     let store = VectorStore::load("GoogleNews-vectors-negative300.bin")?;
//!     let mut engine = SimilarityEngine::new();
//!
//!     let king = store.get_embedding("king")?;
//!     let queen = store.get_embedding("queen")?;
//!     let score = engine.score("king", "queen", king, queen)?;
//!     println!("king ~ queen: {score:.4}");
//!
//!     Ok(())
//! }
//! ```

mod error;
mod format;
mod neighbors;
mod similarity;
mod store;
mod types;

pub use error::{Result, VectorStoreError};
pub use format::{ModelFormat, MAX_DIMENSION, QUANTIZED_SUFFIX, REAL_SUFFIX};
pub use neighbors::similar_words;
pub use similarity::{cosine_similarity, SimilarityCache, SimilarityEngine};
pub use store::{EmbeddingLookup, VectorStore};
pub use types::{Embedding, Neighbor, QuantRange, Representation};
