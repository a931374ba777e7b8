//! BPE token counts backed by `tiktoken-rs`.

use super::TokenCounter;
use chonk_core::{ChunkError, ChunkResult};
use tiktoken_rs::CoreBPE;

/// OpenAI BPE tokenizer.
pub struct TiktokenTokenizer {
    name: String,
    bpe: CoreBPE,
}

impl TiktokenTokenizer {
    /// Load one of the bundled encodings by name.
    pub fn from_encoding(name: &str) -> ChunkResult<Self> {
        let bpe = match name {
            "cl100k_base" => tiktoken_rs::cl100k_base(),
            "o200k_base" => tiktoken_rs::o200k_base(),
            "p50k_base" => tiktoken_rs::p50k_base(),
            "r50k_base" => tiktoken_rs::r50k_base(),
            other => {
                return Err(ChunkError::Config(format!(
                    "Unknown tiktoken encoding: {}",
                    other
                )))
            }
        }
        .map_err(|e| ChunkError::Tokenizer(format!("Failed to load {}: {}", name, e)))?;

        Ok(Self {
            name: name.to_string(),
            bpe,
        })
    }
}

impl TokenCounter for TiktokenTokenizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn count_tokens(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    fn encode(&self, text: &str) -> ChunkResult<Vec<u32>> {
        Ok(self.bpe.encode_ordinary(text))
    }

    /// Windows that cut a multi-byte character in half decode with U+FFFD
    /// in place of the partial bytes.
    fn decode_batch(&self, batch: &[Vec<u32>]) -> ChunkResult<Vec<String>> {
        Ok(batch
            .iter()
            .map(|ids| {
                let bytes: Vec<u8> = self
                    .bpe
                    ._decode_native_and_split(ids.clone())
                    .flatten()
                    .collect();
                String::from_utf8_lossy(&bytes).into_owned()
            })
            .collect())
    }
}
