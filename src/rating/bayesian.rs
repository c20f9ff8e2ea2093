//! TrueSkill (Bayesian) rating engine
//!
//! Each competitor's skill is a Gaussian belief `(mean, uncertainty)`. A
//! decisive result moves the winner's mean up and the loser's mean down while
//! shrinking both uncertainties, floored at [`BayesianSettings::min_uncertainty`].
//! The output is informational and independent from the Elo-based composite.

use crate::error::{RankingError, Result};
use crate::rating::RatingSource;
use crate::types::{CompetitorId, MatchRecord};
use serde::{Deserialize, Serialize};
use skillratings::trueskill::{trueskill, TrueSkillConfig, TrueSkillRating};
use skillratings::Outcomes;
use std::collections::HashMap;
use tracing::debug;

/// Configuration for the TrueSkill engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BayesianSettings {
    /// Mean assigned to unseen competitors
    pub initial_mean: f64,
    /// Uncertainty assigned to unseen competitors
    pub initial_uncertainty: f64,
    /// Performance spread; skill gap giving roughly 76% win chance
    pub beta: f64,
    /// Additive dynamics applied to uncertainty before every update
    pub dynamics: f64,
    /// Prior probability of a draw
    pub draw_probability: f64,
    /// Uncertainty never drops below this value
    pub min_uncertainty: f64,
}

impl Default for BayesianSettings {
    fn default() -> Self {
        Self {
            initial_mean: 25.0,
            initial_uncertainty: 25.0 / 3.0,
            beta: 25.0 / 6.0,
            dynamics: 25.0 / 300.0,
            draw_probability: 0.1,
            min_uncertainty: 1.0,
        }
    }
}

impl BayesianSettings {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if !self.initial_mean.is_finite() {
            return Err(config_error("Initial mean must be finite"));
        }

        if self.initial_uncertainty <= 0.0 || !self.initial_uncertainty.is_finite() {
            return Err(config_error("Initial uncertainty must be positive"));
        }

        if self.beta <= 0.0 || !self.beta.is_finite() {
            return Err(config_error("Beta must be positive"));
        }

        if self.dynamics < 0.0 || !self.dynamics.is_finite() {
            return Err(config_error("Dynamics must be non-negative"));
        }

        if !(0.0..1.0).contains(&self.draw_probability) {
            return Err(config_error("Draw probability must be in [0, 1)"));
        }

        if self.min_uncertainty < 0.0
            || !self.min_uncertainty.is_finite()
            || self.min_uncertainty > self.initial_uncertainty
        {
            return Err(config_error(
                "Minimum uncertainty must be between 0 and the initial uncertainty",
            ));
        }

        Ok(())
    }

    fn trueskill_config(&self) -> TrueSkillConfig {
        TrueSkillConfig {
            draw_probability: self.draw_probability,
            beta: self.beta,
            default_dynamics: self.dynamics,
        }
    }
}

fn config_error(message: &str) -> anyhow::Error {
    RankingError::ConfigurationError {
        message: message.to_string(),
    }
    .into()
}

/// Gaussian skill belief for one competitor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillEstimate {
    pub mean: f64,
    pub uncertainty: f64,
}

impl SkillEstimate {
    /// Lower bound of the ~99% interval, `mean - 3 * uncertainty`
    pub fn conservative(&self) -> f64 {
        self.mean - 3.0 * self.uncertainty
    }
}

impl From<TrueSkillRating> for SkillEstimate {
    fn from(rating: TrueSkillRating) -> Self {
        Self {
            mean: rating.rating,
            uncertainty: rating.uncertainty,
        }
    }
}

impl From<SkillEstimate> for TrueSkillRating {
    fn from(estimate: SkillEstimate) -> Self {
        Self {
            rating: estimate.mean,
            uncertainty: estimate.uncertainty,
        }
    }
}

/// Apply one decisive result, returning `(new_winner, new_loser)`
pub fn update(
    winner: SkillEstimate,
    loser: SkillEstimate,
    settings: &BayesianSettings,
) -> (SkillEstimate, SkillEstimate) {
    let (new_winner, new_loser) = trueskill(
        &winner.into(),
        &loser.into(),
        &Outcomes::WIN,
        &settings.trueskill_config(),
    );

    let floor = |rating: TrueSkillRating| {
        let mut estimate = SkillEstimate::from(rating);
        estimate.uncertainty = estimate.uncertainty.max(settings.min_uncertainty);
        estimate
    };

    (floor(new_winner), floor(new_loser))
}

/// One row of the Bayesian report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BayesianStanding {
    pub competitor: CompetitorId,
    pub mean: f64,
    pub uncertainty: f64,
    pub conservative: f64,
}

/// Owns the competitor → skill belief map for one run
#[derive(Debug, Clone)]
pub struct BayesianEngine {
    settings: BayesianSettings,
    estimates: HashMap<CompetitorId, SkillEstimate>,
}

impl BayesianEngine {
    /// Create a new TrueSkill engine
    pub fn new(settings: BayesianSettings) -> Result<Self> {
        settings.validate()?;

        Ok(Self {
            settings,
            estimates: HashMap::new(),
        })
    }

    /// Default belief for new competitors
    pub fn default_estimate(&self) -> SkillEstimate {
        SkillEstimate {
            mean: self.settings.initial_mean,
            uncertainty: self.settings.initial_uncertainty,
        }
    }

    /// Current belief, or the default for unseen competitors
    pub fn estimate(&self, competitor: &str) -> SkillEstimate {
        self.estimates
            .get(competitor)
            .copied()
            .unwrap_or_else(|| self.default_estimate())
    }

    /// Fold one record into the estimate map; no-contests only register
    /// the participants.
    pub fn feed(&mut self, record: &MatchRecord) -> Option<(SkillEstimate, SkillEstimate)> {
        let default = self.default_estimate();
        for competitor in [&record.competitor_a, &record.competitor_b] {
            self.estimates.entry(competitor.clone()).or_insert(default);
        }

        let (winner, loser) = record.winner_and_loser()?;
        let (new_winner, new_loser) =
            update(self.estimate(winner), self.estimate(loser), &self.settings);

        debug!(
            "TrueSkill {} -> ({:.3}, {:.3}), {} -> ({:.3}, {:.3})",
            winner,
            new_winner.mean,
            new_winner.uncertainty,
            loser,
            new_loser.mean,
            new_loser.uncertainty
        );

        self.estimates.insert(winner.clone(), new_winner);
        self.estimates.insert(loser.clone(), new_loser);

        Some((new_winner, new_loser))
    }

    /// Probability that `a` beats `b` under the current beliefs
    pub fn win_probability(&self, a: &str, b: &str) -> f64 {
        let (expected_a, _) = skillratings::trueskill::expected_score(
            &self.estimate(a).into(),
            &self.estimate(b).into(),
            &self.settings.trueskill_config(),
        );
        expected_a
    }

    /// All competitors sorted by mean descending, ties by competitor id
    pub fn standings(&self) -> Vec<BayesianStanding> {
        let mut standings: Vec<BayesianStanding> = self
            .estimates
            .iter()
            .map(|(competitor, estimate)| BayesianStanding {
                competitor: competitor.clone(),
                mean: estimate.mean,
                uncertainty: estimate.uncertainty,
                conservative: estimate.conservative(),
            })
            .collect();

        standings.sort_by(|a, b| {
            b.mean
                .total_cmp(&a.mean)
                .then_with(|| a.competitor.cmp(&b.competitor))
        });
        standings
    }

    pub fn len(&self) -> usize {
        self.estimates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.estimates.is_empty()
    }
}

impl RatingSource for BayesianEngine {
    fn rating(&self, competitor: &str) -> f64 {
        self.estimate(competitor).mean
    }

    fn source_name(&self) -> &'static str {
        "bayesian"
    }
}
