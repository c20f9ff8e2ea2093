//! Configuration management for the fighter-rank engine
//!
//! This module handles configuration loading from TOML files and environment
//! variables, validation, and default values for a ranking run.

pub mod app;
pub mod ranking;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, ServiceSettings};
pub use ranking::RankingSettings;
