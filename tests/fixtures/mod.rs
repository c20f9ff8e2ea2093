//! Test fixtures: builders for raw match records

#![allow(dead_code)]

use fighter_rank::types::{RawMatchRecord, RawSideStats};

/// Per-side statistics with only the required fields set
pub fn side(significant_strikes: f64, takedowns: f64) -> RawSideStats {
    RawSideStats {
        significant_strikes: Some(significant_strikes),
        takedowns: Some(takedowns),
        ..Default::default()
    }
}

/// Builder for raw records as the ingestion collaborator would emit them
#[derive(Debug, Clone)]
pub struct BoutBuilder {
    record: RawMatchRecord,
}

impl BoutBuilder {
    pub fn new(competitor_a: &str, competitor_b: &str) -> Self {
        Self {
            record: RawMatchRecord {
                date: None,
                competitor_a: Some(competitor_a.to_string()),
                competitor_b: Some(competitor_b.to_string()),
                winner: None,
                method: None,
                stats_a: Some(side(0.0, 0.0)),
                stats_b: Some(side(0.0, 0.0)),
            },
        }
    }

    pub fn on(mut self, date: &str) -> Self {
        self.record.date = Some(date.parse().expect("valid ISO date"));
        self
    }

    pub fn winner(mut self, winner: &str) -> Self {
        self.record.winner = Some(winner.to_string());
        self
    }

    pub fn method(mut self, method: &str) -> Self {
        self.record.method = Some(method.to_string());
        self
    }

    pub fn stats(mut self, a: (f64, f64), b: (f64, f64)) -> Self {
        self.record.stats_a = Some(side(a.0, a.1));
        self.record.stats_b = Some(side(b.0, b.1));
        self
    }

    pub fn build(self) -> RawMatchRecord {
        self.record
    }
}

/// A decisive result won by side A with zeroed statistics
pub fn a_beats_b(winner: &str, loser: &str) -> RawMatchRecord {
    BoutBuilder::new(winner, loser)
        .winner("A")
        .method("Decision - Unanimous")
        .build()
}

/// X beats Y by KO/TKO, then Z beats X by unanimous decision
pub fn three_fighter_card() -> Vec<RawMatchRecord> {
    vec![
        BoutBuilder::new("X", "Y")
            .on("2019-06-01")
            .winner("X")
            .method("KO/TKO")
            .stats((20.0, 5.0), (10.0, 2.0))
            .build(),
        BoutBuilder::new("Z", "X")
            .on("2019-09-14")
            .winner("Red")
            .method("Decision - Unanimous")
            .stats((15.0, 1.0), (12.0, 0.0))
            .build(),
    ]
}
