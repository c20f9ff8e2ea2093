//! Fighter Rank - rating and ranking engine for head-to-head match results
//!
//! This crate folds a chronological stream of match records into Elo and
//! TrueSkill ratings, accumulates per-competitor performance differentials,
//! and combines them into a composite ranking.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod ranking;
pub mod rating;
pub mod stats;
pub mod types;

// Re-export commonly used types and traits
pub use error::{RankingError, Result};
pub use types::*;

// Re-export key components
pub use pipeline::{run, PipelineConfig, RankingPipeline, RankingSnapshot};
pub use ranking::{CompositeRanker, CompositeWeights, RankingEntry};
pub use rating::{BayesianEngine, EloEngine, RatingSource, RatingSourceKind};
pub use stats::{AccumulatedStats, MethodWeights, StatsAccumulator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
