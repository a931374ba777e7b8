//! Space-separated word tokens with a vocabulary grown on demand.

use super::TokenCounter;
use chonk_core::{ChunkError, ChunkResult};
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Debug, Default)]
struct Vocab {
    ids: HashMap<String, u32>,
    words: Vec<String>,
}

/// Word-level token counter.
///
/// A token is whatever lies between single spaces, so empty words count.
/// Ids are assigned the first time a word is encoded.
///
/// The vocabulary is never pruned: a tokenizer shared across `chunk` calls
/// keeps every distinct word it has encoded for as long as it lives. Create
/// a fresh tokenizer per corpus when that matters.
#[derive(Debug, Default)]
pub struct WordTokenizer {
    vocab: RwLock<Vocab>,
}

impl WordTokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct words seen so far.
    pub fn vocab_size(&self) -> usize {
        self.vocab.read().map(|v| v.words.len()).unwrap_or(0)
    }
}

impl TokenCounter for WordTokenizer {
    fn name(&self) -> &str {
        "word"
    }

    fn count_tokens(&self, text: &str) -> usize {
        text.split(' ').count()
    }

    fn encode(&self, text: &str) -> ChunkResult<Vec<u32>> {
        let mut vocab = self
            .vocab
            .write()
            .map_err(|_| ChunkError::Tokenizer("word vocabulary lock poisoned".to_string()))?;

        let mut encoded = Vec::new();
        for word in text.split(' ') {
            let id = match vocab.ids.get(word) {
                Some(&id) => id,
                None => {
                    let id = vocab.words.len() as u32;
                    vocab.ids.insert(word.to_string(), id);
                    vocab.words.push(word.to_string());
                    id
                }
            };
            encoded.push(id);
        }
        Ok(encoded)
    }

    fn decode_batch(&self, batch: &[Vec<u32>]) -> ChunkResult<Vec<String>> {
        let vocab = self
            .vocab
            .read()
            .map_err(|_| ChunkError::Tokenizer("word vocabulary lock poisoned".to_string()))?;

        batch
            .iter()
            .map(|ids| {
                let words = ids
                    .iter()
                    .map(|&id| {
                        vocab.words.get(id as usize).map(String::as_str).ok_or_else(|| {
                            ChunkError::Tokenizer(format!("unknown word token id {}", id))
                        })
                    })
                    .collect::<ChunkResult<Vec<&str>>>()?;
                Ok(words.join(" "))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_includes_empty_words() {
        let tokenizer = WordTokenizer::new();
        assert_eq!(tokenizer.count_tokens("a  b"), 3);
        assert_eq!(tokenizer.count_tokens("hello"), 1);
    }

    #[test]
    fn test_repeated_words_share_ids() {
        let tokenizer = WordTokenizer::new();
        let ids = tokenizer.encode("the cat the hat").unwrap();
        assert_eq!(ids, vec![0, 1, 0, 2]);
        assert_eq!(tokenizer.vocab_size(), 3);
    }

    #[test]
    fn test_vocab_grows_only_with_new_words() {
        let tokenizer = WordTokenizer::new();
        tokenizer.encode("alpha beta").unwrap();
        tokenizer.encode("beta alpha alpha").unwrap();
        assert_eq!(tokenizer.vocab_size(), 2);

        tokenizer.encode("gamma").unwrap();
        assert_eq!(tokenizer.vocab_size(), 3);
    }

    #[test]
    fn test_decode_windows_rejoin_with_space() {
        let tokenizer = WordTokenizer::new();
        let ids = tokenizer.encode("one two three four five").unwrap();
        let windows: Vec<Vec<u32>> = ids.chunks(2).map(<[u32]>::to_vec).collect();
        let decoded = tokenizer.decode_batch(&windows).unwrap();
        assert_eq!(decoded, vec!["one two", "three four", "five"]);
    }

    #[test]
    fn test_decode_unknown_id() {
        let tokenizer = WordTokenizer::new();
        assert!(tokenizer.decode_batch(&[vec![42]]).is_err());
    }
}
