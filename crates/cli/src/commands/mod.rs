//! Command handlers for the chonk CLI.

pub mod chunk;
pub mod rules;

pub use chunk::ChunkCommand;
pub use rules::RulesCommand;

use chonk_chunker::{load_config, ChunkerConfig};
use chonk_core::{config::AppConfig, ChunkResult};

/// Chunker settings from the config file, or the defaults without one.
pub(crate) fn chunker_config(config: &AppConfig) -> ChunkResult<ChunkerConfig> {
    match &config.config_file {
        Some(path) => load_config(path),
        None => Ok(ChunkerConfig::default()),
    }
}
