//! Rating systems for pairwise match results
//!
//! This module provides the Elo engine used by the composite ranking, the
//! TrueSkill engine offered as an informational alternative, and the
//! [`RatingSource`] seam that lets the composite calculator use either.

pub mod bayesian;
pub mod elo;

// Re-export commonly used types
pub use bayesian::{BayesianEngine, BayesianSettings, BayesianStanding, SkillEstimate};
pub use elo::{EloEngine, EloSettings};

use serde::{Deserialize, Serialize};

/// Read access to a scalar rating per competitor
#[cfg_attr(test, mockall::automock)]
pub trait RatingSource {
    /// Current rating, or the engine's initial rating for unseen competitors
    fn rating(&self, competitor: &str) -> f64;

    /// Short name used in logs and reports
    fn source_name(&self) -> &'static str;
}

/// Which rating engine feeds the composite score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingSourceKind {
    #[default]
    Elo,
    Bayesian,
}

impl std::str::FromStr for RatingSourceKind {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "elo" => Ok(RatingSourceKind::Elo),
            "bayesian" | "trueskill" => Ok(RatingSourceKind::Bayesian),
            other => Err(format!("unknown rating source '{}'", other)),
        }
    }
}

impl std::fmt::Display for RatingSourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RatingSourceKind::Elo => write!(f, "elo"),
            RatingSourceKind::Bayesian => write!(f, "bayesian"),
        }
    }
}
