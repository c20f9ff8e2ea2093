//! Common types used throughout the ranking engine

use crate::error::{RankingError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Unique identifier for competitors
pub type CompetitorId = String;

/// Which side of a match record a competitor occupied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Declared result of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Winner(Side),
    /// Draws and no-contests; neither rating engine updates on these
    NoContest,
}

/// How a match was won
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VictoryMethod {
    KoTko,
    Submission,
    DecisionUnanimous,
    DecisionSplit,
    Other,
}

impl VictoryMethod {
    /// Parse a method label as written by the results feed.
    ///
    /// Spacing, punctuation and case are ignored, so `"Decision - Unanimous"`,
    /// `"decision_unanimous"` and `"DecisionUnanimous"` are equivalent. Labels
    /// that are known but carry no scoring weight map to [`VictoryMethod::Other`].
    pub fn parse(label: &str) -> Option<Self> {
        let key: String = label
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        match key.as_str() {
            "kotko" | "ko" | "tko" => Some(VictoryMethod::KoTko),
            "submission" | "sub" => Some(VictoryMethod::Submission),
            "decisionunanimous" => Some(VictoryMethod::DecisionUnanimous),
            "decisionsplit" => Some(VictoryMethod::DecisionSplit),
            "other" | "tkodoctorsstoppage" | "dq" | "overturned" | "couldnotcontinue"
            | "decisionmajority" => Some(VictoryMethod::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for VictoryMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VictoryMethod::KoTko => write!(f, "KO/TKO"),
            VictoryMethod::Submission => write!(f, "Submission"),
            VictoryMethod::DecisionUnanimous => write!(f, "Decision - Unanimous"),
            VictoryMethod::DecisionSplit => write!(f, "Decision - Split"),
            VictoryMethod::Other => write!(f, "Other"),
        }
    }
}

/// Numeric performance statistics for one side of a match
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SideStats {
    pub significant_strikes: f64,
    pub takedowns: f64,
    pub control_seconds: f64,
    pub knockdowns: f64,
}

/// A validated, chronologically ordered match result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub date: Option<NaiveDate>,
    pub competitor_a: CompetitorId,
    pub competitor_b: CompetitorId,
    pub outcome: MatchOutcome,
    pub method: VictoryMethod,
    pub stats_a: SideStats,
    pub stats_b: SideStats,
}

impl MatchRecord {
    /// Competitor occupying the given side
    pub fn competitor(&self, side: Side) -> &CompetitorId {
        match side {
            Side::A => &self.competitor_a,
            Side::B => &self.competitor_b,
        }
    }

    /// Statistics recorded for the given side
    pub fn stats(&self, side: Side) -> &SideStats {
        match side {
            Side::A => &self.stats_a,
            Side::B => &self.stats_b,
        }
    }

    /// Winner and loser ids, or `None` for a no-contest
    pub fn winner_and_loser(&self) -> Option<(&CompetitorId, &CompetitorId)> {
        match self.outcome {
            MatchOutcome::Winner(side) => {
                Some((self.competitor(side), self.competitor(side.opponent())))
            }
            MatchOutcome::NoContest => None,
        }
    }

    /// Validate a raw record from the ingestion feed.
    ///
    /// `index` is the record's position in the stream and is carried in any error.
    pub fn from_raw(index: usize, raw: RawMatchRecord) -> Result<Self> {
        let malformed = |reason: String| RankingError::MalformedRecord { index, reason };

        let competitor_a = required_name(raw.competitor_a, "competitor_a").map_err(malformed)?;
        let competitor_b = required_name(raw.competitor_b, "competitor_b").map_err(malformed)?;
        if competitor_a == competitor_b {
            return Err(malformed(format!(
                "competitor '{}' cannot fight themselves",
                competitor_a
            ))
            .into());
        }

        let winner = raw
            .winner
            .ok_or_else(|| malformed("missing winner".to_string()))?;
        let outcome = parse_outcome(&winner, &competitor_a, &competitor_b).map_err(malformed)?;

        let method = match raw.method {
            Some(label) => VictoryMethod::parse(&label)
                .ok_or_else(|| malformed(format!("unrecognized method of victory '{}'", label)))?,
            None => VictoryMethod::Other,
        };

        let stats_a = validate_stats(raw.stats_a, "stats_a").map_err(malformed)?;
        let stats_b = validate_stats(raw.stats_b, "stats_b").map_err(malformed)?;

        Ok(Self {
            date: raw.date,
            competitor_a,
            competitor_b,
            outcome,
            method,
            stats_a,
            stats_b,
        })
    }
}

/// Match record as delivered by the ingestion collaborator, before validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawMatchRecord {
    pub date: Option<NaiveDate>,
    pub competitor_a: Option<String>,
    pub competitor_b: Option<String>,
    pub winner: Option<String>,
    pub method: Option<String>,
    pub stats_a: Option<RawSideStats>,
    pub stats_b: Option<RawSideStats>,
}

/// Per-side statistics before validation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSideStats {
    pub significant_strikes: Option<f64>,
    pub takedowns: Option<f64>,
    pub control_seconds: Option<f64>,
    pub knockdowns: Option<f64>,
}

fn required_name(value: Option<String>, field: &str) -> std::result::Result<String, String> {
    match value.map(|name| name.trim().to_string()) {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(format!("missing {}", field)),
    }
}

/// Resolve the declared winner against the two competitor ids.
///
/// An exact id match wins over everything else, then a case-insensitive id
/// match, then the `A`/`Red`, `B`/`Blue` and no-contest labels. A winner that
/// matches both ids ignoring case is rejected rather than guessed.
fn parse_outcome(
    winner: &str,
    competitor_a: &str,
    competitor_b: &str,
) -> std::result::Result<MatchOutcome, String> {
    let winner = winner.trim();

    if winner == competitor_a {
        return Ok(MatchOutcome::Winner(Side::A));
    }
    if winner == competitor_b {
        return Ok(MatchOutcome::Winner(Side::B));
    }

    match (
        winner.eq_ignore_ascii_case(competitor_a),
        winner.eq_ignore_ascii_case(competitor_b),
    ) {
        (true, true) => {
            return Err(format!(
                "ambiguous winner '{}' matches both '{}' and '{}'",
                winner, competitor_a, competitor_b
            ))
        }
        (true, false) => return Ok(MatchOutcome::Winner(Side::A)),
        (false, true) => return Ok(MatchOutcome::Winner(Side::B)),
        (false, false) => {}
    }

    match winner.to_ascii_lowercase().as_str() {
        "a" | "red" => Ok(MatchOutcome::Winner(Side::A)),
        "b" | "blue" => Ok(MatchOutcome::Winner(Side::B)),
        "draw" | "nc" | "no contest" | "no-contest" | "nocontest" => Ok(MatchOutcome::NoContest),
        _ => Err(format!("unrecognized winner '{}'", winner)),
    }
}

fn validate_stats(raw: Option<RawSideStats>, field: &str) -> std::result::Result<SideStats, String> {
    let raw = raw.ok_or_else(|| format!("missing {}", field))?;

    let required = |value: Option<f64>, name: &str| -> std::result::Result<f64, String> {
        let value = value.ok_or_else(|| format!("missing {}.{}", field, name))?;
        check_count(value, field, name)
    };
    let optional = |value: Option<f64>, name: &str| -> std::result::Result<f64, String> {
        check_count(value.unwrap_or(0.0), field, name)
    };

    Ok(SideStats {
        significant_strikes: required(raw.significant_strikes, "significant_strikes")?,
        takedowns: required(raw.takedowns, "takedowns")?,
        control_seconds: optional(raw.control_seconds, "control_seconds")?,
        knockdowns: optional(raw.knockdowns, "knockdowns")?,
    })
}

fn check_count(value: f64, field: &str, name: &str) -> std::result::Result<f64, String> {
    if !value.is_finite() || value < 0.0 {
        return Err(format!(
            "{}.{} must be a finite non-negative number, got {}",
            field, name, value
        ));
    }
    Ok(value)
}
