//! Aggregate statistics accumulator
//!
//! Every record is attributed to both participants from their own
//! perspective, so a competitor's differentials do not depend on whether the
//! feed listed them as side A or side B.

use crate::error::{RankingError, Result};
use crate::types::{CompetitorId, MatchOutcome, MatchRecord, Side, VictoryMethod};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Score credited to the winner for each method of victory
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MethodWeights {
    pub ko_tko: f64,
    pub submission: f64,
    pub decision_unanimous: f64,
    pub decision_split: f64,
    pub other: f64,
}

impl Default for MethodWeights {
    fn default() -> Self {
        Self {
            ko_tko: 4.0,
            submission: 3.5,
            decision_unanimous: 3.0,
            decision_split: 1.0,
            other: 0.0,
        }
    }
}

impl MethodWeights {
    pub fn weight(&self, method: VictoryMethod) -> f64 {
        match method {
            VictoryMethod::KoTko => self.ko_tko,
            VictoryMethod::Submission => self.submission,
            VictoryMethod::DecisionUnanimous => self.decision_unanimous,
            VictoryMethod::DecisionSplit => self.decision_split,
            VictoryMethod::Other => self.other,
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        let all = [
            self.ko_tko,
            self.submission,
            self.decision_unanimous,
            self.decision_split,
            self.other,
        ];
        if all.iter().any(|weight| !weight.is_finite()) {
            return Err(RankingError::ConfigurationError {
                message: "Method weights must be finite".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Running totals for one competitor
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AccumulatedStats {
    /// Σ own significant strikes − opponent significant strikes
    pub strike_differential_sum: f64,
    /// Σ own takedowns − opponent takedowns
    pub takedown_differential_sum: f64,
    /// Σ method weight over wins
    pub weighted_method_score: f64,
    /// Σ own control seconds − opponent control seconds
    pub control_time_differential_sum: f64,
    /// Σ own knockdowns − opponent knockdowns
    pub knockdown_differential_sum: f64,
    pub matches: u32,
    pub wins: u32,
    pub losses: u32,
    pub no_contests: u32,
}

/// Owns the competitor → statistics map for one run
#[derive(Debug, Clone, Default)]
pub struct StatsAccumulator {
    method_weights: MethodWeights,
    stats: HashMap<CompetitorId, AccumulatedStats>,
}

impl StatsAccumulator {
    pub fn new(method_weights: MethodWeights) -> Self {
        Self {
            method_weights,
            stats: HashMap::new(),
        }
    }

    /// Accumulate a whole ordered stream in one pass
    pub fn from_records<'a>(
        method_weights: MethodWeights,
        records: impl IntoIterator<Item = &'a MatchRecord>,
    ) -> Self {
        let mut accumulator = Self::new(method_weights);
        for record in records {
            accumulator.feed(record);
        }
        accumulator
    }

    /// Attribute one record to both participants
    pub fn feed(&mut self, record: &MatchRecord) {
        for side in [Side::A, Side::B] {
            let own = record.stats(side);
            let opponent = record.stats(side.opponent());
            let weight = self.method_weights.weight(record.method);

            let entry = self
                .stats
                .entry(record.competitor(side).clone())
                .or_default();

            entry.strike_differential_sum += own.significant_strikes - opponent.significant_strikes;
            entry.takedown_differential_sum += own.takedowns - opponent.takedowns;
            entry.control_time_differential_sum += own.control_seconds - opponent.control_seconds;
            entry.knockdown_differential_sum += own.knockdowns - opponent.knockdowns;
            entry.matches += 1;

            match record.outcome {
                MatchOutcome::Winner(winner) if winner == side => {
                    entry.wins += 1;
                    entry.weighted_method_score += weight;
                }
                MatchOutcome::Winner(_) => entry.losses += 1,
                MatchOutcome::NoContest => entry.no_contests += 1,
            }
        }
    }

    pub fn get(&self, competitor: &str) -> Option<&AccumulatedStats> {
        self.stats.get(competitor)
    }

    /// Every competitor that appeared in at least one record
    pub fn iter(&self) -> impl Iterator<Item = (&CompetitorId, &AccumulatedStats)> {
        self.stats.iter()
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SideStats;
    use proptest::prelude::*;

    fn side(strikes: f64, takedowns: f64) -> SideStats {
        SideStats {
            significant_strikes: strikes,
            takedowns,
            ..Default::default()
        }
    }

    fn grappling(strikes: f64, takedowns: f64, control_seconds: f64, knockdowns: f64) -> SideStats {
        SideStats {
            significant_strikes: strikes,
            takedowns,
            control_seconds,
            knockdowns,
        }
    }

    fn record(
        a: &str,
        b: &str,
        outcome: MatchOutcome,
        method: VictoryMethod,
        stats_a: SideStats,
        stats_b: SideStats,
    ) -> MatchRecord {
        MatchRecord {
            date: None,
            competitor_a: a.to_string(),
            competitor_b: b.to_string(),
            outcome,
            method,
            stats_a,
            stats_b,
        }
    }

    #[test]
    fn test_differentials_from_both_sides() {
        let mut accumulator = StatsAccumulator::default();
        accumulator.feed(&record(
            "x",
            "y",
            MatchOutcome::Winner(Side::A),
            VictoryMethod::KoTko,
            grappling(20.0, 5.0, 180.0, 1.0),
            grappling(10.0, 2.0, 45.0, 0.0),
        ));
        accumulator.feed(&record(
            "z",
            "x",
            MatchOutcome::Winner(Side::A),
            VictoryMethod::DecisionUnanimous,
            grappling(15.0, 1.0, 300.0, 0.0),
            grappling(12.0, 0.0, 60.0, 2.0),
        ));

        let x = accumulator.get("x").unwrap();
        assert_eq!(x.strike_differential_sum, 7.0);
        assert_eq!(x.takedown_differential_sum, 2.0);
        assert_eq!(x.weighted_method_score, 4.0);
        assert_eq!(x.control_time_differential_sum, 135.0 - 240.0);
        assert_eq!(x.knockdown_differential_sum, 3.0);
        assert_eq!((x.matches, x.wins, x.losses), (2, 1, 1));

        let y = accumulator.get("y").unwrap();
        assert_eq!(y.strike_differential_sum, -10.0);
        assert_eq!(y.takedown_differential_sum, -3.0);
        assert_eq!(y.control_time_differential_sum, -135.0);
        assert_eq!(y.knockdown_differential_sum, -1.0);
        assert_eq!(y.weighted_method_score, 0.0);

        let z = accumulator.get("z").unwrap();
        assert_eq!(z.weighted_method_score, 3.0);
        assert_eq!(z.control_time_differential_sum, 240.0);
        assert_eq!(z.knockdown_differential_sum, -2.0);
        assert_eq!(accumulator.len(), 3);
    }

    #[test]
    fn test_weighted_method_score_sums_wins_only() {
        let records = [
            record(
                "champ",
                "a",
                MatchOutcome::Winner(Side::A),
                VictoryMethod::KoTko,
                side(0.0, 0.0),
                side(0.0, 0.0),
            ),
            record(
                "b",
                "champ",
                MatchOutcome::Winner(Side::B),
                VictoryMethod::DecisionSplit,
                side(0.0, 0.0),
                side(0.0, 0.0),
            ),
            record(
                "c",
                "champ",
                MatchOutcome::Winner(Side::A),
                VictoryMethod::Submission,
                side(0.0, 0.0),
                side(0.0, 0.0),
            ),
        ];

        let accumulator = StatsAccumulator::from_records(MethodWeights::default(), &records);
        let champ = accumulator.get("champ").unwrap();
        assert_eq!(champ.weighted_method_score, 5.0);
        assert_eq!(champ.losses, 1);
        assert_eq!(accumulator.get("c").unwrap().weighted_method_score, 3.5);
    }

    #[test]
    fn test_no_contest_counts_stats_but_no_method_score() {
        let mut accumulator = StatsAccumulator::default();
        accumulator.feed(&record(
            "x",
            "y",
            MatchOutcome::NoContest,
            VictoryMethod::Other,
            side(8.0, 1.0),
            side(3.0, 0.0),
        ));

        let x = accumulator.get("x").unwrap();
        assert_eq!(x.strike_differential_sum, 5.0);
        assert_eq!(x.weighted_method_score, 0.0);
        assert_eq!(x.no_contests, 1);
        assert_eq!(x.wins + x.losses, 0);
    }

    #[test]
    fn test_custom_method_weights() {
        let weights = MethodWeights {
            other: 0.5,
            ..Default::default()
        };
        assert!(weights.validate().is_ok());
        assert_eq!(weights.weight(VictoryMethod::Other), 0.5);

        let broken = MethodWeights {
            ko_tko: f64::INFINITY,
            ..Default::default()
        };
        assert!(broken.validate().is_err());
    }

    /// Own and opponent columns of one bout
    fn bout_stats() -> impl Strategy<Value = (SideStats, SideStats)> {
        let column = (0u16..300, 0u16..20, 0u16..900, 0u16..4).prop_map(|(s, t, c, k)| {
            grappling(s as f64, t as f64, c as f64, k as f64)
        });
        (column.clone(), column)
    }

    proptest! {
        #[test]
        fn prop_mirrored_side_yields_negated_differentials(
            bouts in proptest::collection::vec(bout_stats(), 5),
        ) {
            // "p" always occupies side A; "q" occupies side B of the same
            // statistics columns.
            let as_side_a: Vec<_> = bouts
                .iter()
                .enumerate()
                .map(|(i, &(stats_a, stats_b))| record(
                    "p",
                    &format!("opp{}", i),
                    MatchOutcome::Winner(Side::A),
                    VictoryMethod::KoTko,
                    stats_a,
                    stats_b,
                ))
                .collect();
            let as_side_b: Vec<_> = bouts
                .iter()
                .enumerate()
                .map(|(i, &(stats_a, stats_b))| record(
                    &format!("opp{}", i),
                    "q",
                    MatchOutcome::Winner(Side::A),
                    VictoryMethod::KoTko,
                    stats_a,
                    stats_b,
                ))
                .collect();

            let first = StatsAccumulator::from_records(MethodWeights::default(), &as_side_a);
            let second = StatsAccumulator::from_records(MethodWeights::default(), &as_side_b);
            let p = first.get("p").unwrap();
            let q = second.get("q").unwrap();

            prop_assert_eq!(p.strike_differential_sum, -q.strike_differential_sum);
            prop_assert_eq!(p.takedown_differential_sum, -q.takedown_differential_sum);
            prop_assert_eq!(p.control_time_differential_sum, -q.control_time_differential_sum);
            prop_assert_eq!(p.knockdown_differential_sum, -q.knockdown_differential_sum);
            prop_assert_eq!(p.matches, 5);
            prop_assert_eq!(q.matches, 5);
        }

        #[test]
        fn prop_side_assignment_does_not_change_attribution(
            bouts in proptest::collection::vec(bout_stats(), 1..8),
        ) {
            let as_a: Vec<_> = bouts
                .iter()
                .map(|&(own, opp)| record(
                    "p",
                    "opp",
                    MatchOutcome::Winner(Side::A),
                    VictoryMethod::Submission,
                    own,
                    opp,
                ))
                .collect();
            let as_b: Vec<_> = bouts
                .iter()
                .map(|&(own, opp)| record(
                    "opp",
                    "p",
                    MatchOutcome::Winner(Side::B),
                    VictoryMethod::Submission,
                    opp,
                    own,
                ))
                .collect();

            let first = StatsAccumulator::from_records(MethodWeights::default(), &as_a);
            let second = StatsAccumulator::from_records(MethodWeights::default(), &as_b);

            prop_assert_eq!(first.get("p"), second.get("p"));
            prop_assert_eq!(first.get("opp"), second.get("opp"));
        }
    }
}
