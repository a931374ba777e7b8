//! Chunk command handler.

use super::chunker_config;
use anyhow::Context;
use chonk_chunker::{tokenizer_from_name, ChunkOutput, RecursiveChunker, ReturnType};
use chonk_core::config::AppConfig;
use clap::Args;
use std::io::Read;
use std::path::PathBuf;

/// Chunk a file or stdin
#[derive(Args, Debug)]
pub struct ChunkCommand {
    /// Input file (reads stdin when omitted or "-")
    pub input: Option<PathBuf>,

    /// Maximum tokens per chunk
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Minimum characters per delimiter piece
    #[arg(long)]
    pub min_chars: Option<usize>,

    /// Output shape: chunks or texts
    #[arg(long)]
    pub return_type: Option<ReturnType>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ChunkCommand {
    pub fn execute(&self, config: &AppConfig) -> anyhow::Result<()> {
        tracing::info!("Executing chunk command");
        tracing::debug!("Chunk options: {:?}", self);

        let mut chunker_config = chunker_config(config)?;
        if let Some(chunk_size) = self.chunk_size {
            chunker_config.chunk_size = chunk_size;
        }
        if let Some(min_chars) = self.min_chars {
            chunker_config.min_characters_per_chunk = min_chars;
        }
        if let Some(return_type) = self.return_type {
            chunker_config.return_type = return_type;
        }

        let tokenizer = tokenizer_from_name(&config.tokenizer)?;
        let chunker = RecursiveChunker::new(tokenizer, chunker_config)?;

        let text = self.read_input()?;
        let output = chunker.chunk(&text)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        match output {
            ChunkOutput::Chunks(chunks) => {
                for chunk in chunks {
                    println!(
                        "[{}..{}] level={} tokens={} {:?}",
                        chunk.start_index,
                        chunk.end_index,
                        chunk.level,
                        chunk.token_count,
                        chunk.text
                    );
                }
            }
            ChunkOutput::Texts(texts) => {
                for text in texts {
                    println!("{:?}", text);
                }
            }
        }

        let stats = chunker.cache_stats();
        tracing::debug!(
            hits = stats.hits,
            misses = stats.misses,
            "Token estimate cache"
        );

        Ok(())
    }

    fn read_input(&self) -> anyhow::Result<String> {
        match &self.input {
            Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read input file {:?}", path)),
            _ => {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .context("Failed to read stdin")?;
                Ok(text)
            }
        }
    }
}
