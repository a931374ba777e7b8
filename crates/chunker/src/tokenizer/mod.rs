//! Token counter implementations.
//!
//! The chunker only needs three things from a tokenizer: a token count, an
//! encoding into ids, and batch decoding of id windows back into text.

mod character;
#[cfg(feature = "tiktoken")]
mod tiktoken;
mod word;

pub use character::CharacterTokenizer;
#[cfg(feature = "tiktoken")]
pub use self::tiktoken::TiktokenTokenizer;
pub use word::WordTokenizer;

use chonk_core::{ChunkError, ChunkResult};
use std::sync::Arc;

/// Trait for token counters used to size chunks.
pub trait TokenCounter: Send + Sync {
    /// Short identifier used in logs and config files.
    fn name(&self) -> &str;

    /// Exact number of tokens in `text`.
    fn count_tokens(&self, text: &str) -> usize;

    /// Encode `text` into token ids.
    fn encode(&self, text: &str) -> ChunkResult<Vec<u32>>;

    /// Decode each window of token ids back into text.
    fn decode_batch(&self, batch: &[Vec<u32>]) -> ChunkResult<Vec<String>>;
}

/// Resolve a tokenizer by its configured name.
pub fn tokenizer_from_name(name: &str) -> ChunkResult<Arc<dyn TokenCounter>> {
    match name {
        "character" => Ok(Arc::new(CharacterTokenizer)),
        "word" => Ok(Arc::new(WordTokenizer::new())),
        #[cfg(feature = "tiktoken")]
        "cl100k_base" | "o200k_base" | "p50k_base" | "r50k_base" => {
            Ok(Arc::new(TiktokenTokenizer::from_encoding(name)?))
        }
        #[cfg(not(feature = "tiktoken"))]
        "cl100k_base" | "o200k_base" | "p50k_base" | "r50k_base" => Err(ChunkError::Config(
            format!("Tokenizer '{}' requires the `tiktoken` feature", name),
        )),
        other => Err(ChunkError::Config(format!("Unknown tokenizer: {}", other))),
    }
}
