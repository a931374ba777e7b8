//! Chonk Core Library
//!
//! This crate provides the foundational utilities shared by the chonk crates:
//! - Error handling (`ChunkError`, `ChunkResult`)
//! - Logging infrastructure
//! - Application configuration

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{ChunkError, ChunkResult};
pub use logging::LogFormat;
