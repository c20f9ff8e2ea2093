//! Ranking configuration

use crate::error::Result;
use crate::ranking::CompositeWeights;
use crate::rating::RatingSourceKind;
use crate::stats::MethodWeights;
use serde::{Deserialize, Serialize};

/// How the final ranking is assembled
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingSettings {
    /// Rating engine feeding the composite score
    pub rating_source: RatingSourceKind,
    /// Run the TrueSkill engine and report its table
    pub enable_bayesian: bool,
    pub composite_weights: CompositeWeights,
    pub method_weights: MethodWeights,
}

impl RankingSettings {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        self.composite_weights.validate()?;
        self.method_weights.validate()
    }
}
