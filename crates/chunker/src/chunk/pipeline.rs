//! Recursive chunking driver.

use super::{materialize::ChunkMaterializer, merging::merge_splits, splitter::LevelSplitter};
use crate::config::ChunkerConfig;
use crate::estimate::{CacheStats, TokenEstimator};
use crate::tokenizer::TokenCounter;
use crate::types::{ChunkOutput, RecursiveChunk, RecursiveLevel, ReturnType};
use chonk_core::{ChunkError, ChunkResult};
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Splits text recursively by the configured rule levels until every chunk
/// fits within `chunk_size` tokens.
///
/// The chunker is immutable apart from its token-count cache, which is
/// internally synchronized, so one instance can be shared across threads.
pub struct RecursiveChunker {
    config: ChunkerConfig,
    estimator: TokenEstimator,
}

impl RecursiveChunker {
    /// Create a chunker, validating the configuration eagerly.
    pub fn new(tokenizer: Arc<dyn TokenCounter>, config: ChunkerConfig) -> ChunkResult<Self> {
        config.validate()?;
        let capacity = NonZeroUsize::new(config.cache_capacity).ok_or_else(|| {
            ChunkError::Config("cache_capacity must be greater than 0".to_string())
        })?;
        let estimator = TokenEstimator::new(tokenizer, config.chunk_size, capacity);
        Self::with_estimator(config, estimator)
    }

    /// Create a chunker around an existing estimator, e.g. to share or
    /// inspect its cache.
    pub fn with_estimator(config: ChunkerConfig, estimator: TokenEstimator) -> ChunkResult<Self> {
        config.validate()?;
        if estimator.chunk_size() != config.chunk_size {
            return Err(ChunkError::Config(format!(
                "estimator chunk_size {} does not match chunk_size {}",
                estimator.chunk_size(),
                config.chunk_size
            )));
        }

        if !config.rules.is_bounded() {
            tracing::warn!(
                "Last rule level is not token-window; oversized spans will be emitted whole once rules run out"
            );
        }

        tracing::debug!(
            tokenizer = estimator.tokenizer().name(),
            levels = config.rules.len(),
            chunk_size = config.chunk_size,
            "Created recursive chunker"
        );

        Ok(Self { config, estimator })
    }

    /// Chunk `text` into pieces of at most `chunk_size` tokens.
    pub fn chunk(&self, text: &str) -> ChunkResult<ChunkOutput> {
        let _span = tracing::debug_span!("chunk", bytes = text.len()).entered();

        let mut sink = match self.config.return_type {
            ReturnType::Chunks => ChunkSink::Chunks {
                materializer: ChunkMaterializer::new(text),
                chunks: Vec::new(),
            },
            ReturnType::Texts => ChunkSink::Texts(Vec::new()),
        };

        self.descend(text, 0, &mut sink)?;

        if let ChunkSink::Chunks { materializer, .. } = &sink {
            if materializer.unresolved() > 0 {
                tracing::debug!(
                    "{} chunk(s) could not be located in the original text",
                    materializer.unresolved()
                );
            }
        }

        let output = sink.finish();
        tracing::debug!(
            "Chunking complete: {} chunks created from {} bytes",
            output.len(),
            text.len()
        );

        Ok(output)
    }

    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    pub fn estimator(&self) -> &TokenEstimator {
        &self.estimator
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.estimator.stats()
    }

    pub fn clear_cache(&self) {
        self.estimator.clear();
    }

    fn descend(&self, text: &str, level: usize, sink: &mut ChunkSink<'_>) -> ChunkResult<()> {
        if text.is_empty() {
            return Ok(());
        }

        let chunk_size = self.config.chunk_size;

        let Some(rule) = self.config.rules.get(level) else {
            tracing::debug!(level, "Rules exhausted; emitting remaining span whole");
            let token_count = if sink.wants_counts() {
                self.estimator.count_exact(text)
            } else {
                0
            };
            sink.emit(text.to_string(), token_count, level);
            return Ok(());
        };

        let splitter = LevelSplitter::new(
            self.estimator.tokenizer().as_ref(),
            chunk_size,
            self.config.min_characters_per_chunk,
        );
        let splits = splitter.split(text, rule)?;

        tracing::trace!(level, rule = %rule, pieces = splits.len(), "Split span");

        let combine_whitespace = match rule {
            RecursiveLevel::Whitespace => true,
            RecursiveLevel::Delimiters { .. } => false,
            // Windows hold at most chunk_size tokens; the character heuristic
            // must not send them further down.
            RecursiveLevel::TokenWindow => {
                for window in splits {
                    let token_count = if sink.wants_counts() {
                        self.estimator.count_exact(&window)
                    } else {
                        0
                    };
                    sink.emit(window, token_count, level);
                }
                return Ok(());
            }
        };

        let token_counts: Vec<usize> = splits
            .iter()
            .map(|split| self.estimator.estimate(split).bounded(chunk_size))
            .collect();
        let merged = merge_splits(splits, token_counts, chunk_size, combine_whitespace)?;

        for (span, token_count) in merged.texts.into_iter().zip(merged.token_counts) {
            if token_count > chunk_size {
                self.descend(&span, level + 1, sink)?;
            } else {
                sink.emit(span, token_count, level);
            }
        }

        Ok(())
    }
}

impl fmt::Debug for RecursiveChunker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecursiveChunker")
            .field("tokenizer", &self.estimator.tokenizer().name())
            .field("rules", &self.config.rules)
            .field("chunk_size", &self.config.chunk_size)
            .field("min_characters_per_chunk", &self.config.min_characters_per_chunk)
            .field("return_type", &self.config.return_type)
            .finish()
    }
}

/// Collects output for one `chunk` call in the configured shape.
enum ChunkSink<'a> {
    Chunks {
        materializer: ChunkMaterializer<'a>,
        chunks: Vec<RecursiveChunk>,
    },
    Texts(Vec<String>),
}

impl ChunkSink<'_> {
    fn wants_counts(&self) -> bool {
        matches!(self, ChunkSink::Chunks { .. })
    }

    fn emit(&mut self, text: String, token_count: usize, level: usize) {
        match self {
            ChunkSink::Chunks {
                materializer,
                chunks,
            } => chunks.push(materializer.materialize(text, token_count, level)),
            ChunkSink::Texts(texts) => texts.push(text),
        }
    }

    fn finish(self) -> ChunkOutput {
        match self {
            ChunkSink::Chunks { chunks, .. } => ChunkOutput::Chunks(chunks),
            ChunkSink::Texts(texts) => ChunkOutput::Texts(texts),
        }
    }
}
