//! Main application configuration
//!
//! This module defines the primary configuration structures for a ranking
//! run, including TOML file loading, environment variable overrides and
//! validation.

use crate::config::RankingSettings;
use crate::pipeline::PipelineConfig;
use crate::rating::{BayesianSettings, EloSettings};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub elo: EloSettings,
    pub bayesian: BayesianSettings,
    pub ranking: RankingSettings,
}

/// Service-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Name used in report headers and logs
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "fighter-rank".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;

        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Overlay any set environment variables onto this configuration
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Elo settings
        if let Some(k_factor) = parse_env("ELO_K_FACTOR")? {
            self.elo.k_factor = k_factor;
        }
        if let Some(initial) = parse_env("ELO_INITIAL_RATING")? {
            self.elo.initial_rating = initial;
        }

        // Ranking settings
        if let Some(source) = parse_env("RATING_SOURCE")? {
            self.ranking.rating_source = source;
        }
        if let Some(enable) = parse_env("ENABLE_BAYESIAN")? {
            self.ranking.enable_bayesian = enable;
        }
        if let Some(weight) = parse_env("COMPOSITE_WEIGHT_RATING")? {
            self.ranking.composite_weights.rating = weight;
        }
        if let Some(weight) = parse_env("COMPOSITE_WEIGHT_STRIKES")? {
            self.ranking.composite_weights.strike_differential = weight;
        }
        if let Some(weight) = parse_env("COMPOSITE_WEIGHT_TAKEDOWNS")? {
            self.ranking.composite_weights.takedown_differential = weight;
        }
        if let Some(weight) = parse_env("COMPOSITE_WEIGHT_METHOD")? {
            self.ranking.composite_weights.method = weight;
        }

        Ok(())
    }

    /// Engine settings for one pipeline run
    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            elo: self.elo,
            bayesian: self.bayesian,
            ranking: self.ranking.clone(),
        }
    }
}

fn parse_env<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| anyhow!("Invalid {} value: {}", name, value)),
        Err(_) => Ok(None),
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.name.is_empty() {
        return Err(anyhow!("Service name cannot be empty"));
    }

    config.elo.validate()?;
    config.bayesian.validate()?;
    config.ranking.validate()?;

    Ok(())
}
