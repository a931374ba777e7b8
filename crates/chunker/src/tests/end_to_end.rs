//! End-to-end chunking scenarios.

use crate::{
    CharacterTokenizer, ChunkOutput, ChunkerConfig, IncludeDelim, RecursiveChunk,
    RecursiveChunker, RecursiveLevel, RecursiveRules, ReturnType, TokenCounter, WordTokenizer,
};
use std::sync::Arc;

fn chunks(chunker: &RecursiveChunker, text: &str) -> Vec<RecursiveChunk> {
    chunker
        .chunk(text)
        .unwrap()
        .as_chunks()
        .expect("structured output")
        .to_vec()
}

fn paragraph_text() -> String {
    let paragraph = "Rust is a systems programming language. It runs blazingly fast, \
                     prevents segfaults, and guarantees thread safety! Does it? Yes.";
    [paragraph; 6].join("\n\n")
}

#[test]
fn test_default_rules_respect_budget() {
    let config = ChunkerConfig {
        chunk_size: 32,
        ..Default::default()
    };
    let chunker = RecursiveChunker::new(Arc::new(CharacterTokenizer), config).unwrap();
    let text = paragraph_text();

    let chunks = chunks(&chunker, &text);
    assert!(chunks.len() > 6);
    for chunk in &chunks {
        assert!(chunk.token_count <= 32, "{}", chunk);
        assert!(chunk.is_resolved(), "{}", chunk);
        assert_eq!(&text[chunk.start_index..chunk.end_index], chunk.text);
    }

    // Offsets never move backwards
    for pair in chunks.windows(2) {
        assert!(pair[1].start_index >= pair[0].end_index);
    }
}

#[test]
fn test_short_paragraphs_stay_at_first_level() {
    let config = ChunkerConfig {
        chunk_size: 512,
        ..Default::default()
    };
    let chunker = RecursiveChunker::new(Arc::new(CharacterTokenizer), config).unwrap();
    let text = "First paragraph is here.\n\nSecond paragraph is here.";

    let chunks = chunks(&chunker, text);
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, text);
    assert_eq!(chunks[0].level, 0);
    assert_eq!((chunks[0].start_index, chunks[0].end_index), (0, text.len()));
}

#[test]
fn test_word_tokenizer_levels_descend() {
    let config = ChunkerConfig {
        chunk_size: 5,
        min_characters_per_chunk: 1,
        rules: RecursiveRules::new(vec![
            RecursiveLevel::delimiters([". "], IncludeDelim::Prev).unwrap(),
            RecursiveLevel::Whitespace,
            RecursiveLevel::TokenWindow,
        ])
        .unwrap(),
        ..Default::default()
    };
    let chunker = RecursiveChunker::new(Arc::new(WordTokenizer::new()), config).unwrap();
    let text = "one two three four five six seven eight nine ten. Done.";

    let chunks = chunks(&chunker, text);
    assert!(chunks.iter().any(|c| c.level == 1));
    for chunk in &chunks {
        assert!(chunk.token_count <= 5);
        assert_eq!(&text[chunk.start_index..chunk.end_index], chunk.text);
    }
    assert_eq!(chunks.last().unwrap().text, "Done.");
}

#[test]
fn test_long_unbroken_word_falls_to_token_windows() {
    let config = ChunkerConfig {
        chunk_size: 7,
        ..Default::default()
    };
    let chunker = RecursiveChunker::new(Arc::new(CharacterTokenizer), config).unwrap();
    let text = "x".repeat(100);

    let chunks = chunks(&chunker, &text);
    assert_eq!(chunks.len(), 100usize.div_ceil(7));
    assert!(chunks.iter().all(|c| c.level == 4));
    assert_eq!(chunks.concat_texts(), text);

    // Identical windows still resolve to successive positions
    for (i, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.start_index, i * 7);
    }
}

#[test]
fn test_long_words_with_word_tokenizer_stay_within_rules() {
    let config = ChunkerConfig {
        chunk_size: 2,
        ..Default::default()
    };
    let rules_len = config.rules.len();
    let chunker = RecursiveChunker::new(Arc::new(WordTokenizer::new()), config).unwrap();
    let words = ["abcdefghijklmnopqrst", "uvwxyzabcdefghijklmn", "opqrstuvwxyzabcdefgh"];
    let text = words.join(" ");

    let chunks = chunks(&chunker, &text);
    assert_eq!(chunks.len(), words.len());
    for (chunk, word) in chunks.iter().zip(words) {
        assert_eq!(chunk.text, word);
        assert_eq!(chunk.level, rules_len - 1);
        assert_eq!(chunk.token_count, 1);
        assert!(chunk.is_resolved());
    }
}

#[cfg(feature = "tiktoken")]
#[test]
fn test_tiktoken_windows_split_inside_characters() {
    use crate::tokenizer::TiktokenTokenizer;

    let tokenizer = TiktokenTokenizer::from_encoding("cl100k_base").unwrap();
    let config = ChunkerConfig {
        chunk_size: 2,
        ..Default::default()
    };
    let rules_len = config.rules.len();
    let chunker = RecursiveChunker::new(Arc::new(tokenizer), config).unwrap();

    let chunks = chunks(&chunker, &"🎮".repeat(20));
    assert!(!chunks.is_empty());
    assert!(chunks.iter().all(|c| c.level < rules_len));
}

#[test]
fn test_texts_mode_matches_chunk_texts() {
    let text = paragraph_text();
    let structured = RecursiveChunker::new(
        Arc::new(CharacterTokenizer),
        ChunkerConfig {
            chunk_size: 40,
            ..Default::default()
        },
    )
    .unwrap();
    let plain = RecursiveChunker::new(
        Arc::new(CharacterTokenizer),
        ChunkerConfig {
            chunk_size: 40,
            return_type: ReturnType::Texts,
            ..Default::default()
        },
    )
    .unwrap();

    let from_chunks = structured.chunk(&text).unwrap().into_texts();
    match plain.chunk(&text).unwrap() {
        ChunkOutput::Texts(texts) => assert_eq!(texts, from_chunks),
        ChunkOutput::Chunks(_) => panic!("expected texts"),
    }
}

#[test]
fn test_shared_chunker_across_threads() {
    let tokenizer: Arc<dyn TokenCounter> = Arc::new(CharacterTokenizer);
    let chunker = RecursiveChunker::new(
        tokenizer,
        ChunkerConfig {
            chunk_size: 24,
            ..Default::default()
        },
    )
    .unwrap();
    let text = paragraph_text();
    let expected = chunker.chunk(&text).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| chunker.chunk(&text).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

trait ConcatTexts {
    fn concat_texts(&self) -> String;
}

impl ConcatTexts for [RecursiveChunk] {
    fn concat_texts(&self) -> String {
        self.iter().map(|c| c.text.as_str()).collect()
    }
}
