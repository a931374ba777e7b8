//! Splitting a span into raw pieces for one rule level.

use crate::tokenizer::TokenCounter;
use crate::types::{IncludeDelim, RecursiveLevel};
use chonk_core::ChunkResult;

/// Internal separator spliced in around delimiters before splitting.
/// Built from private-use code points so it cannot collide with real text
/// or with delimiter literals.
const SEPARATOR: &str = "\u{E000}chonk-sep\u{E001}";

/// Splits text according to a single rule level.
pub struct LevelSplitter<'a> {
    tokenizer: &'a dyn TokenCounter,
    chunk_size: usize,
    min_characters_per_chunk: usize,
}

impl<'a> LevelSplitter<'a> {
    pub fn new(
        tokenizer: &'a dyn TokenCounter,
        chunk_size: usize,
        min_characters_per_chunk: usize,
    ) -> Self {
        Self {
            tokenizer,
            chunk_size,
            min_characters_per_chunk,
        }
    }

    /// Split `text` into ordered pieces. Pieces are not size-checked here.
    pub fn split(&self, text: &str, level: &RecursiveLevel) -> ChunkResult<Vec<String>> {
        match level {
            RecursiveLevel::Whitespace => Ok(text.split(' ').map(str::to_string).collect()),
            RecursiveLevel::Delimiters {
                delimiters,
                include_delim,
            } => {
                let pieces = split_on_delimiters(text, delimiters, *include_delim);
                Ok(absorb_short_pieces(pieces, self.min_characters_per_chunk))
            }
            RecursiveLevel::TokenWindow => self.split_token_windows(text),
        }
    }

    fn split_token_windows(&self, text: &str) -> ChunkResult<Vec<String>> {
        let encoded = self.tokenizer.encode(text)?;
        let windows: Vec<Vec<u32>> = encoded
            .chunks(self.chunk_size)
            .map(<[u32]>::to_vec)
            .collect();
        self.tokenizer.decode_batch(&windows)
    }
}

/// Rewrite each delimiter per placement policy, in declaration order, then
/// split on the separator and drop empty pieces.
fn split_on_delimiters(
    text: &str,
    delimiters: &[String],
    include_delim: IncludeDelim,
) -> Vec<String> {
    let mut marked = text.to_string();
    for delimiter in delimiters {
        let replacement = match include_delim {
            IncludeDelim::Prev => format!("{}{}", delimiter, SEPARATOR),
            IncludeDelim::Next => format!("{}{}", SEPARATOR, delimiter),
            IncludeDelim::None => SEPARATOR.to_string(),
        };
        marked = marked.replace(delimiter.as_str(), &replacement);
    }

    marked
        .split(SEPARATOR)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

/// Fold pieces shorter than `min_chars` characters into a buffer that is
/// flushed once it reaches `min_chars` or the input ends.
fn absorb_short_pieces(pieces: Vec<String>, min_chars: usize) -> Vec<String> {
    let mut merged = Vec::with_capacity(pieces.len());
    let mut current = String::new();

    for piece in pieces {
        if piece.chars().count() < min_chars {
            current.push_str(&piece);
        } else if !current.is_empty() {
            current.push_str(&piece);
            merged.push(std::mem::take(&mut current));
        } else {
            merged.push(piece);
        }

        if !current.is_empty() && current.chars().count() >= min_chars {
            merged.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        merged.push(current);
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::CharacterTokenizer;

    fn sentences(include_delim: IncludeDelim) -> RecursiveLevel {
        RecursiveLevel::delimiters([". "], include_delim).unwrap()
    }

    #[test]
    fn test_whitespace_keeps_empty_pieces() {
        let splitter = LevelSplitter::new(&CharacterTokenizer, 10, 1);
        let pieces = splitter.split("a  b", &RecursiveLevel::Whitespace).unwrap();
        assert_eq!(pieces, vec!["a", "", "b"]);
    }

    #[test]
    fn test_delimiter_attached_to_previous() {
        let splitter = LevelSplitter::new(&CharacterTokenizer, 10, 1);
        let pieces = splitter
            .split("One. Two. Three", &sentences(IncludeDelim::Prev))
            .unwrap();
        assert_eq!(pieces, vec!["One. ", "Two. ", "Three"]);
    }

    #[test]
    fn test_delimiter_attached_to_next() {
        let splitter = LevelSplitter::new(&CharacterTokenizer, 10, 1);
        let pieces = splitter
            .split("One. Two. Three", &sentences(IncludeDelim::Next))
            .unwrap();
        assert_eq!(pieces, vec!["One", ". Two", ". Three"]);
    }

    #[test]
    fn test_delimiter_discarded() {
        let splitter = LevelSplitter::new(&CharacterTokenizer, 10, 1);
        let pieces = splitter
            .split("One. Two. Three", &sentences(IncludeDelim::None))
            .unwrap();
        assert_eq!(pieces, vec!["One", "Two", "Three"]);
    }

    #[test]
    fn test_delimiters_applied_in_declared_order() {
        let splitter = LevelSplitter::new(&CharacterTokenizer, 10, 1);
        let level = RecursiveLevel::delimiters(["\n\n", "\n"], IncludeDelim::Prev).unwrap();
        let pieces = splitter.split("a\n\nb\nc", &level).unwrap();
        // "\n" also matches inside the "\n\n" already marked
        assert_eq!(pieces, vec!["a\n", "\n", "b\n", "c"]);
    }

    #[test]
    fn test_short_pieces_are_absorbed() {
        let splitter = LevelSplitter::new(&CharacterTokenizer, 100, 6);
        let pieces = splitter
            .split("Hi. Yo. A longer sentence. Ok", &sentences(IncludeDelim::Prev))
            .unwrap();
        assert_eq!(pieces, vec!["Hi. Yo. ", "A longer sentence. ", "Ok"]);
        assert_eq!(pieces.concat(), "Hi. Yo. A longer sentence. Ok");
    }

    #[test]
    fn test_short_buffer_joins_next_long_piece() {
        let merged = absorb_short_pieces(
            vec!["ab".to_string(), "long enough".to_string(), "c".to_string()],
            5,
        );
        assert_eq!(merged, vec!["ablong enough", "c"]);
    }

    #[test]
    fn test_token_windows() {
        let splitter = LevelSplitter::new(&CharacterTokenizer, 4, 1);
        let pieces = splitter
            .split("abcdefghij", &RecursiveLevel::TokenWindow)
            .unwrap();
        assert_eq!(pieces, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_token_windows_empty_text() {
        let splitter = LevelSplitter::new(&CharacterTokenizer, 4, 1);
        let pieces = splitter.split("", &RecursiveLevel::TokenWindow).unwrap();
        assert!(pieces.is_empty());
    }
}
