//! Rules command handler.
//!
//! Prints the chunker configuration that `chunk` would use, as a starting
//! point for a custom config file.

use super::chunker_config;
use chonk_core::config::AppConfig;
use clap::Args;

/// Print the effective chunker configuration
#[derive(Args, Debug)]
pub struct RulesCommand {
    /// Output as JSON instead of YAML
    #[arg(long)]
    pub json: bool,
}

impl RulesCommand {
    pub fn execute(&self, config: &AppConfig) -> anyhow::Result<()> {
        let chunker_config = chunker_config(config)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&chunker_config)?);
        } else {
            let document = serde_json::json!({
                "tokenizer": config.tokenizer,
                "chunker": chunker_config,
            });
            print!("{}", serde_yaml::to_string(&document)?);
        }

        Ok(())
    }
}
