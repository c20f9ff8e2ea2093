//! Composite ranking and report rendering

pub mod composite;
pub mod report;

pub use composite::{CompositeRanker, CompositeWeights, RankingEntry};
pub use report::{render_bayesian, render_rankings};
