//! One token per Unicode scalar value.

use super::TokenCounter;
use chonk_core::{ChunkError, ChunkResult};

/// Character-level token counter.
///
/// Token ids are the scalar values themselves, so decoding any window of an
/// encoding reproduces the exact source substring.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharacterTokenizer;

impl TokenCounter for CharacterTokenizer {
    fn name(&self) -> &str {
        "character"
    }

    fn count_tokens(&self, text: &str) -> usize {
        text.chars().count()
    }

    fn encode(&self, text: &str) -> ChunkResult<Vec<u32>> {
        Ok(text.chars().map(u32::from).collect())
    }

    fn decode_batch(&self, batch: &[Vec<u32>]) -> ChunkResult<Vec<String>> {
        batch
            .iter()
            .map(|ids| {
                ids.iter()
                    .map(|&id| {
                        char::from_u32(id).ok_or_else(|| {
                            ChunkError::Tokenizer(format!("invalid character token id {}", id))
                        })
                    })
                    .collect::<ChunkResult<String>>()
            })
            .collect()
    }
}
