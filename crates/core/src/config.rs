//! Application configuration for chonk.
//!
//! Configuration is merged from several sources, later ones winning:
//! - Defaults
//! - Config file (`chonk.yaml` in the working directory, or `CHONK_CONFIG`)
//! - Environment variables
//! - Command-line flags
//!
//! Chunking parameters themselves live in the `chunker:` section of the same
//! file and are loaded by `chonk-chunker`; this module only owns the
//! process-level settings.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ChunkError, ChunkResult};
use crate::logging::LogFormat;

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "chonk.yaml";

/// Tokenizer names understood by the chunker crate.
pub const KNOWN_TOKENIZERS: &[&str] = &[
    "character",
    "word",
    "cl100k_base",
    "o200k_base",
    "p50k_base",
    "r50k_base",
];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Token counter used to size chunks (e.g., "character", "word")
    pub tokenizer: String,

    /// Log level override
    pub log_level: Option<String>,

    /// Log line format
    pub log_format: LogFormat,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Process-level subset of the config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    tokenizer: Option<String>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
    format: Option<LogFormat>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            tokenizer: "character".to_string(),
            log_level: None,
            log_format: LogFormat::Pretty,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file, environment variables and defaults.
    ///
    /// Environment variables:
    /// - `CHONK_CONFIG`: Path to config file
    /// - `CHONK_TOKENIZER`: Token counter name
    /// - `CHONK_LOG_FORMAT`: `pretty` or `json`
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> ChunkResult<Self> {
        let mut config = Self::default();

        if let Ok(config_file) = std::env::var("CHONK_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        let config_path = match config.config_file {
            Some(ref cf) => {
                if !cf.exists() {
                    return Err(ChunkError::Config(format!(
                        "Config file does not exist: {:?}",
                        cf
                    )));
                }
                Some(cf.clone())
            }
            None => {
                let candidate = PathBuf::from(DEFAULT_CONFIG_FILE);
                candidate.exists().then_some(candidate)
            }
        };

        if let Some(path) = config_path {
            config = config.merge_yaml(&path)?;
            config.config_file = Some(path);
        }

        // Environment variables override the YAML config
        if let Ok(tokenizer) = std::env::var("CHONK_TOKENIZER") {
            config.tokenizer = tokenizer;
        }

        if let Ok(format) = std::env::var("CHONK_LOG_FORMAT") {
            config.log_format = format.parse()?;
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into a copy of this config.
    pub fn merge_yaml(&self, path: &Path) -> ChunkResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ChunkError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = if contents.trim().is_empty() {
            ConfigFile::default()
        } else {
            serde_yaml::from_str(&contents).map_err(|e| {
                ChunkError::Config(format!("Failed to parse config file {:?}: {}", path, e))
            })?
        };

        let mut result = self.clone();

        if let Some(tokenizer) = config_file.tokenizer {
            result.tokenizer = tokenizer;
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
            if let Some(format) = logging.format {
                result.log_format = format;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over environment variables and
    /// the config file.
    pub fn with_overrides(
        mut self,
        config_file: Option<PathBuf>,
        tokenizer: Option<String>,
        log_level: Option<String>,
        log_json: bool,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(tokenizer) = tokenizer {
            self.tokenizer = tokenizer;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if log_json {
            self.log_format = LogFormat::Json;
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Validate the process-level settings.
    pub fn validate(&self) -> ChunkResult<()> {
        if !KNOWN_TOKENIZERS.contains(&self.tokenizer.as_str()) {
            return Err(ChunkError::Config(format!(
                "Unknown tokenizer: {}. Supported: {}",
                self.tokenizer,
                KNOWN_TOKENIZERS.join(", ")
            )));
        }

        Ok(())
    }
}
