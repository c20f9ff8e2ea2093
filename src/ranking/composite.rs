//! Composite ranking calculator
//!
//! Blends a rating with accumulated performance statistics into one score:
//!
//! `score = w_rating * rating + w_strikes * strike_diff + w_takedowns * takedown_diff + w_method * method_score`
//!
//! The weights are configuration, not derived; the defaults are 1.5, 0.05,
//! 0.1 and 0.15. Ties on score are broken by competitor id ascending.

use crate::error::{RankingError, Result};
use crate::rating::RatingSource;
use crate::stats::{AccumulatedStats, StatsAccumulator};
use crate::types::CompetitorId;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Weights of the composite score terms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeWeights {
    pub rating: f64,
    pub strike_differential: f64,
    pub takedown_differential: f64,
    pub method: f64,
}

impl Default for CompositeWeights {
    fn default() -> Self {
        Self {
            rating: 1.5,
            strike_differential: 0.05,
            takedown_differential: 0.1,
            method: 0.15,
        }
    }
}

impl CompositeWeights {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        let all = [
            self.rating,
            self.strike_differential,
            self.takedown_differential,
            self.method,
        ];
        if all.iter().any(|weight| !weight.is_finite()) {
            return Err(RankingError::ConfigurationError {
                message: "Composite weights must be finite".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// One row of the final ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    /// 1-based position
    pub rank: usize,
    pub competitor: CompetitorId,
    pub composite_score: f64,
    pub rating: f64,
    pub strike_differential_sum: f64,
    pub takedown_differential_sum: f64,
    pub weighted_method_score: f64,
    /// Informational, not part of the score
    pub control_time_differential_sum: f64,
    /// Informational, not part of the score
    pub knockdown_differential_sum: f64,
}

/// Produces a total order over every competitor in the accumulator
#[derive(Debug, Clone, Copy, Default)]
pub struct CompositeRanker {
    weights: CompositeWeights,
}

impl CompositeRanker {
    pub fn new(weights: CompositeWeights) -> Result<Self> {
        weights.validate()?;
        Ok(Self { weights })
    }

    /// Composite score for one competitor
    pub fn score(&self, rating: f64, stats: &AccumulatedStats) -> f64 {
        self.weights.rating * rating
            + self.weights.strike_differential * stats.strike_differential_sum
            + self.weights.takedown_differential * stats.takedown_differential_sum
            + self.weights.method * stats.weighted_method_score
    }

    /// Rank every competitor that appeared in the stream, best first
    pub fn rank<R>(&self, ratings: &R, stats: &StatsAccumulator) -> Vec<RankingEntry>
    where
        R: RatingSource + ?Sized,
    {
        let mut entries: Vec<RankingEntry> = stats
            .iter()
            .map(|(competitor, totals)| {
                let rating = ratings.rating(competitor);
                RankingEntry {
                    rank: 0,
                    competitor: competitor.clone(),
                    composite_score: self.score(rating, totals),
                    rating,
                    strike_differential_sum: totals.strike_differential_sum,
                    takedown_differential_sum: totals.takedown_differential_sum,
                    weighted_method_score: totals.weighted_method_score,
                    control_time_differential_sum: totals.control_time_differential_sum,
                    knockdown_differential_sum: totals.knockdown_differential_sum,
                }
            })
            .collect();

        entries.sort_by(|a, b| {
            b.composite_score
                .total_cmp(&a.composite_score)
                .then_with(|| a.competitor.cmp(&b.competitor))
        });

        for (position, entry) in entries.iter_mut().enumerate() {
            entry.rank = position + 1;
        }

        debug!(
            "Ranked {} competitors using {} ratings",
            entries.len(),
            ratings.source_name()
        );

        entries
    }
}
