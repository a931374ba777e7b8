//! Chunker configuration management.
//!
//! Chunking parameters live under the `chunker:` key of the YAML config
//! file shared with `chonk-core`:
//!
//! ```yaml
//! tokenizer: word
//! chunker:
//!   chunk_size: 256
//!   min_characters_per_chunk: 24
//!   return_type: chunks
//!   rules:
//!     - delimiters: ["\n\n", "\n"]
//!     - delimiters: [". ", "! ", "? "]
//!       include_delim: prev
//!     - whitespace: true
//!     - {}
//! ```

use crate::estimate::DEFAULT_CACHE_CAPACITY;
use crate::types::{RecursiveRules, ReturnType};
use chonk_core::{ChunkError, ChunkResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Construction options for `RecursiveChunker`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkerConfig {
    /// Maximum tokens per chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Pieces shorter than this many characters are folded together
    /// during delimiter splitting
    #[serde(default = "default_min_characters_per_chunk")]
    pub min_characters_per_chunk: usize,

    /// Structured chunks or plain strings
    #[serde(default)]
    pub return_type: ReturnType,

    /// Ordered splitting levels
    #[serde(default)]
    pub rules: RecursiveRules,

    /// Memoized token estimates kept per chunker
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_chunk_size() -> usize {
    512
}

fn default_min_characters_per_chunk() -> usize {
    24
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            min_characters_per_chunk: default_min_characters_per_chunk(),
            return_type: ReturnType::default(),
            rules: RecursiveRules::default(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl ChunkerConfig {
    /// Reject options the chunker cannot run with.
    pub fn validate(&self) -> ChunkResult<()> {
        if self.chunk_size == 0 {
            return Err(ChunkError::Config(
                "chunk_size must be greater than 0".to_string(),
            ));
        }
        if self.min_characters_per_chunk == 0 {
            return Err(ChunkError::Config(
                "min_characters_per_chunk must be greater than 0".to_string(),
            ));
        }
        if self.cache_capacity == 0 {
            return Err(ChunkError::Config(
                "cache_capacity must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse the `chunker:` section of a YAML document.
    pub fn from_yaml_str(contents: &str) -> ChunkResult<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let file: ConfigFile = serde_yaml::from_str(contents)?;
        let config = file.chunker.unwrap_or_default();
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    chunker: Option<ChunkerConfig>,
}

/// Load chunker configuration from a YAML file.
///
/// A file without a `chunker:` section yields the defaults.
pub fn load_config(path: &Path) -> ChunkResult<ChunkerConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        ChunkError::Config(format!("Failed to read config at {:?}: {}", path, e))
    })?;

    let config = ChunkerConfig::from_yaml_str(&content).map_err(|e| {
        ChunkError::Config(format!("Failed to parse config at {:?}: {}", path, e))
    })?;

    tracing::debug!(
        "Loaded chunker config from {:?} ({} rule levels)",
        path,
        config.rules.len()
    );
    Ok(config)
}

/// Save chunker configuration as the `chunker:` section of a YAML file.
pub fn save_config(path: &Path, config: &ChunkerConfig) -> ChunkResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = ConfigFile {
        chunker: Some(config.clone()),
    };
    let yaml = serde_yaml::to_string(&file)?;

    fs::write(path, yaml).map_err(|e| {
        ChunkError::Config(format!("Failed to write config to {:?}: {}", path, e))
    })?;

    tracing::debug!("Saved chunker config to {:?}", path);
    Ok(())
}
