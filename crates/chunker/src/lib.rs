//! Recursive text chunking.
//!
//! Splits text into contiguous chunks that fit a token budget, descending
//! through an ordered set of rules (paragraphs, sentences, punctuation,
//! words, raw token windows) until every chunk fits.
//!
//! ```
//! use chonk_chunker::{ChunkerConfig, CharacterTokenizer, RecursiveChunker};
//! use std::sync::Arc;
//!
//! let config = ChunkerConfig {
//!     chunk_size: 16,
//!     ..Default::default()
//! };
//! let chunker = RecursiveChunker::new(Arc::new(CharacterTokenizer), config).unwrap();
//! let output = chunker.chunk("Hello world. This is a slightly longer sentence.").unwrap();
//! assert!(output.len() > 1);
//! ```

pub mod chunk;
pub mod config;
pub mod estimate;
pub mod tokenizer;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use chunk::RecursiveChunker;
pub use config::{load_config, save_config, ChunkerConfig};
pub use estimate::{CacheStats, TokenEstimate, TokenEstimator};
pub use tokenizer::{tokenizer_from_name, CharacterTokenizer, TokenCounter, WordTokenizer};
pub use types::{
    ChunkOutput, IncludeDelim, RecursiveChunk, RecursiveLevel, RecursiveRules, ReturnType,
};
