//! Elo rating engine
//!
//! Logistic pairwise update from the skillratings crate, folded over the match
//! stream in chronological order. Ratings are order-dependent: feeding the same
//! matches in a different order generally produces different final ratings.

use crate::error::{RankingError, Result};
use crate::rating::RatingSource;
use crate::types::{CompetitorId, MatchOutcome, MatchRecord, Side};
use serde::{Deserialize, Serialize};
use skillratings::elo::{elo, EloConfig, EloRating};
use skillratings::Outcomes;
use std::collections::HashMap;
use tracing::debug;

/// Elo engine parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EloSettings {
    /// Maximum rating change per match
    pub k_factor: f64,
    /// Rating assigned on a competitor's first appearance
    pub initial_rating: f64,
}

impl Default for EloSettings {
    fn default() -> Self {
        Self {
            k_factor: 32.0,
            initial_rating: 1500.0,
        }
    }
}

impl EloSettings {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if !self.k_factor.is_finite() || self.k_factor <= 0.0 {
            return Err(RankingError::ConfigurationError {
                message: "Elo K-factor must be positive".to_string(),
            }
            .into());
        }

        if !self.initial_rating.is_finite() {
            return Err(RankingError::ConfigurationError {
                message: "Elo initial rating must be finite".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Expected scores `(E_a, E_b)` with `E_b = 1 - E_a`
pub fn expected_scores(a_rating: f64, b_rating: f64) -> (f64, f64) {
    skillratings::elo::expected_score(
        &EloRating { rating: a_rating },
        &EloRating { rating: b_rating },
    )
}

/// Apply one decisive result to a pair of ratings.
///
/// Both new ratings are computed from the pre-match ratings, so equal ratings
/// move by exactly `k_factor / 2` in opposite directions.
pub fn update(a_rating: f64, b_rating: f64, winner: Side, k_factor: f64) -> (f64, f64) {
    let outcome = match winner {
        Side::A => Outcomes::WIN,
        Side::B => Outcomes::LOSS,
    };

    let (new_a, new_b) = elo(
        &EloRating { rating: a_rating },
        &EloRating { rating: b_rating },
        &outcome,
        &EloConfig { k: k_factor },
    );

    (new_a.rating, new_b.rating)
}

/// Ratings of both sides before and after an applied match
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EloUpdate {
    pub a_before: f64,
    pub a_after: f64,
    pub b_before: f64,
    pub b_after: f64,
}

/// Owns the competitor → rating map for one run
#[derive(Debug, Clone)]
pub struct EloEngine {
    settings: EloSettings,
    ratings: HashMap<CompetitorId, f64>,
}

impl EloEngine {
    /// Create a new Elo engine
    pub fn new(settings: EloSettings) -> Result<Self> {
        settings.validate()?;

        Ok(Self {
            settings,
            ratings: HashMap::new(),
        })
    }

    /// Fold one record into the rating map.
    ///
    /// Both competitors are registered at the initial rating even when the
    /// record is a no-contest; only decisive results change ratings.
    pub fn feed(&mut self, record: &MatchRecord) -> Option<EloUpdate> {
        let a_before = self.register(&record.competitor_a);
        let b_before = self.register(&record.competitor_b);

        let winner = match record.outcome {
            MatchOutcome::Winner(side) => side,
            MatchOutcome::NoContest => {
                debug!(
                    "No-contest between {} and {}, Elo unchanged",
                    record.competitor_a, record.competitor_b
                );
                return None;
            }
        };

        let (a_after, b_after) = update(a_before, b_before, winner, self.settings.k_factor);
        self.ratings.insert(record.competitor_a.clone(), a_after);
        self.ratings.insert(record.competitor_b.clone(), b_after);

        debug!(
            "Elo {} {:.2} -> {:.2}, {} {:.2} -> {:.2}",
            record.competitor_a, a_before, a_after, record.competitor_b, b_before, b_after
        );

        Some(EloUpdate {
            a_before,
            a_after,
            b_before,
            b_after,
        })
    }

    /// Current ratings of every competitor seen so far
    pub fn ratings(&self) -> &HashMap<CompetitorId, f64> {
        &self.ratings
    }

    fn register(&mut self, competitor: &CompetitorId) -> f64 {
        *self
            .ratings
            .entry(competitor.clone())
            .or_insert(self.settings.initial_rating)
    }
}

impl RatingSource for EloEngine {
    fn rating(&self, competitor: &str) -> f64 {
        self.ratings
            .get(competitor)
            .copied()
            .unwrap_or(self.settings.initial_rating)
    }

    fn source_name(&self) -> &'static str {
        "elo"
    }
}
