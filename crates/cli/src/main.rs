//! Chonk CLI
//!
//! Command-line front end for the recursive chunker.
//! Chunk output goes to stdout; logs go to stderr.

mod commands;

use anyhow::Context;
use chonk_core::{config::AppConfig, logging};
use clap::{Parser, Subcommand};
use commands::{ChunkCommand, RulesCommand};
use std::path::PathBuf;

/// Chonk - split text into token-bounded chunks
#[derive(Parser, Debug)]
#[command(name = "chonk")]
#[command(about = "Split text into token-bounded chunks", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file (YAML)
    #[arg(short, long, global = true, env = "CHONK_CONFIG")]
    config: Option<PathBuf>,

    /// Token counter (character, word, cl100k_base, ...)
    #[arg(short, long, global = true, env = "CHONK_TOKENIZER")]
    tokenizer: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Chunk a file or stdin
    Chunk(ChunkCommand),

    /// Print the effective chunker configuration
    Rules(RulesCommand),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load().context("Failed to load configuration")?;

    // A file given on the command line also carries tokenizer/logging settings
    if let Some(path) = &cli.config {
        if config.config_file.as_ref() != Some(path) {
            config = config
                .merge_yaml(path)
                .with_context(|| format!("Failed to load config file {:?}", path))?;
        }
    }

    let config = config.with_overrides(
        cli.config,
        cli.tokenizer,
        cli.log_level,
        cli.log_json,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color, config.log_format)
        .context("Failed to initialize logging")?;

    config.validate()?;

    tracing::debug!("Config file: {:?}", config.config_file);
    tracing::debug!("Tokenizer: {}", config.tokenizer);

    let command_name = match &cli.command {
        Commands::Chunk(_) => "chunk",
        Commands::Rules(_) => "rules",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Chunk(cmd) => cmd.execute(&config),
        Commands::Rules(cmd) => cmd.execute(&config),
    };

    if let Err(e) = &result {
        tracing::error!("Command failed: {:#}", e);
    }

    result
}
