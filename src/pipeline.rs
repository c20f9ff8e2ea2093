//! Ranking run lifecycle
//!
//! A [`RankingPipeline`] owns every piece of state for one run and follows a
//! `new -> feed -> snapshot` lifecycle. Each record is folded into the Elo
//! engine, the optional TrueSkill engine and the statistics accumulator before
//! the next one is accepted. Any error aborts the run: later ratings depend on
//! every earlier update, so a skipped or guessed record would corrupt them.

use crate::config::RankingSettings;
use crate::error::{RankingError, Result};
use crate::ranking::{CompositeRanker, RankingEntry};
use crate::rating::{
    BayesianEngine, BayesianSettings, BayesianStanding, EloEngine, EloSettings, RatingSource,
    RatingSourceKind,
};
use crate::stats::StatsAccumulator;
use crate::types::{MatchOutcome, MatchRecord, RawMatchRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Everything needed to build a pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub elo: EloSettings,
    pub bayesian: BayesianSettings,
    pub ranking: RankingSettings,
}

/// Read-only result of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingSnapshot {
    pub rating_source: RatingSourceKind,
    pub rankings: Vec<RankingEntry>,
    /// Present when the TrueSkill engine ran
    pub bayesian: Option<Vec<BayesianStanding>>,
    pub records_processed: usize,
    pub no_contests: usize,
}

/// Owns the rating and statistics state of one ranking run
#[derive(Debug, Clone)]
pub struct RankingPipeline {
    elo: EloEngine,
    bayesian: Option<BayesianEngine>,
    accumulator: StatsAccumulator,
    ranker: CompositeRanker,
    rating_source: RatingSourceKind,
    last_date: Option<NaiveDate>,
    records_processed: usize,
    no_contests: usize,
}

impl RankingPipeline {
    /// Create a new pipeline, validating every engine's settings
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        config.ranking.validate()?;

        let needs_bayesian = config.ranking.enable_bayesian
            || config.ranking.rating_source == RatingSourceKind::Bayesian;
        let bayesian = if needs_bayesian {
            Some(BayesianEngine::new(config.bayesian)?)
        } else {
            None
        };

        Ok(Self {
            elo: EloEngine::new(config.elo)?,
            bayesian,
            accumulator: StatsAccumulator::new(config.ranking.method_weights),
            ranker: CompositeRanker::new(config.ranking.composite_weights)?,
            rating_source: config.ranking.rating_source,
            last_date: None,
            records_processed: 0,
            no_contests: 0,
        })
    }

    /// Validate and fold one raw record from the ingestion feed
    pub fn feed(&mut self, raw: RawMatchRecord) -> Result<()> {
        let record = MatchRecord::from_raw(self.records_processed, raw)?;
        self.feed_record(&record)
    }

    /// Fold one validated record into every engine
    pub fn feed_record(&mut self, record: &MatchRecord) -> Result<()> {
        let index = self.records_processed;

        if let Some(date) = record.date {
            if let Some(previous) = self.last_date {
                if date < previous {
                    return Err(RankingError::OutOfOrder {
                        index,
                        date,
                        previous,
                    }
                    .into());
                }
            }
            self.last_date = Some(date);
        }

        self.elo.feed(record);
        if let Some(bayesian) = self.bayesian.as_mut() {
            bayesian.feed(record);
        }
        self.accumulator.feed(record);

        if record.outcome == MatchOutcome::NoContest {
            self.no_contests += 1;
        }
        self.records_processed += 1;

        debug!(
            "Processed record #{}: {} vs {}",
            index, record.competitor_a, record.competitor_b
        );

        Ok(())
    }

    /// Feed an entire ordered stream, stopping at the first error
    pub fn feed_all(&mut self, records: impl IntoIterator<Item = RawMatchRecord>) -> Result<()> {
        for raw in records {
            self.feed(raw)?;
        }
        Ok(())
    }

    pub fn elo(&self) -> &EloEngine {
        &self.elo
    }

    pub fn bayesian(&self) -> Option<&BayesianEngine> {
        self.bayesian.as_ref()
    }

    pub fn accumulator(&self) -> &StatsAccumulator {
        &self.accumulator
    }

    pub fn records_processed(&self) -> usize {
        self.records_processed
    }

    /// Rating engine selected as the composite input
    fn composite_source(&self) -> &dyn RatingSource {
        match (self.rating_source, self.bayesian.as_ref()) {
            (RatingSourceKind::Bayesian, Some(bayesian)) => bayesian as &dyn RatingSource,
            _ => &self.elo,
        }
    }

    /// Produce the rankings from the current state
    pub fn snapshot(&self) -> RankingSnapshot {
        let rankings = self.ranker.rank(self.composite_source(), &self.accumulator);

        info!(
            "Ranked {} competitors from {} records ({} no-contests)",
            rankings.len(),
            self.records_processed,
            self.no_contests
        );

        RankingSnapshot {
            rating_source: self.rating_source,
            rankings,
            bayesian: self.bayesian.as_ref().map(BayesianEngine::standings),
            records_processed: self.records_processed,
            no_contests: self.no_contests,
        }
    }
}

/// Run a complete ranking over an ordered stream
pub fn run(
    config: &PipelineConfig,
    records: impl IntoIterator<Item = RawMatchRecord>,
) -> Result<RankingSnapshot> {
    let mut pipeline = RankingPipeline::new(config)?;
    pipeline.feed_all(records)?;
    Ok(pipeline.snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawSideStats;

    fn raw(date: Option<&str>, a: &str, b: &str, winner: &str, method: &str) -> RawMatchRecord {
        let stats = Some(RawSideStats {
            significant_strikes: Some(10.0),
            takedowns: Some(1.0),
            ..Default::default()
        });
        RawMatchRecord {
            date: date.map(|d| d.parse().unwrap()),
            competitor_a: Some(a.to_string()),
            competitor_b: Some(b.to_string()),
            winner: Some(winner.to_string()),
            method: Some(method.to_string()),
            stats_a: stats,
            stats_b: stats,
        }
    }

    #[test]
    fn test_default_pipeline_skips_bayesian() {
        let pipeline = RankingPipeline::new(&PipelineConfig::default()).unwrap();
        assert!(pipeline.bayesian().is_none());

        let snapshot = pipeline.snapshot();
        assert!(snapshot.rankings.is_empty());
        assert!(snapshot.bayesian.is_none());
        assert_eq!(snapshot.rating_source, RatingSourceKind::Elo);
    }

    #[test]
    fn test_feed_updates_every_engine() {
        let mut config = PipelineConfig::default();
        config.ranking.enable_bayesian = true;
        let mut pipeline = RankingPipeline::new(&config).unwrap();

        pipeline
            .feed(raw(Some("2021-01-01"), "x", "y", "A", "KO/TKO"))
            .unwrap();

        assert_eq!(pipeline.records_processed(), 1);
        assert_eq!(pipeline.elo().rating("x"), 1516.0);
        assert!(pipeline.bayesian().unwrap().rating("x") > 25.0);
        assert_eq!(
            pipeline.accumulator().get("x").unwrap().weighted_method_score,
            4.0
        );
    }

    #[test]
    fn test_out_of_order_dates_abort() {
        let mut pipeline = RankingPipeline::new(&PipelineConfig::default()).unwrap();
        pipeline
            .feed(raw(Some("2021-05-01"), "x", "y", "A", "KO/TKO"))
            .unwrap();
        pipeline.feed(raw(None, "x", "z", "B", "Submission")).unwrap();

        let err = pipeline
            .feed(raw(Some("2021-04-30"), "y", "z", "A", "KO/TKO"))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RankingError>(),
            Some(RankingError::OutOfOrder { index: 2, .. })
        ));
    }

    #[test]
    fn test_same_day_records_are_in_order() {
        let records = vec![
            raw(Some("2021-05-01"), "x", "y", "A", "KO/TKO"),
            raw(Some("2021-05-01"), "z", "w", "B", "KO/TKO"),
        ];
        assert!(run(&PipelineConfig::default(), records).is_ok());
    }

    #[test]
    fn test_malformed_record_aborts_run_with_index() {
        let mut bad = raw(None, "x", "y", "A", "KO/TKO");
        bad.winner = None;
        let records = vec![raw(None, "a", "b", "A", "KO/TKO"), bad];

        let err = run(&PipelineConfig::default(), records).unwrap_err();
        assert_eq!(
            err.downcast_ref::<RankingError>().and_then(|e| e.record_index()),
            Some(1)
        );
    }

    #[test]
    fn test_no_contests_are_counted_and_ranked() {
        let records = vec![raw(None, "x", "y", "NC", "Overturned")];
        let snapshot = run(&PipelineConfig::default(), records).unwrap();

        assert_eq!(snapshot.no_contests, 1);
        assert_eq!(snapshot.records_processed, 1);
        assert_eq!(snapshot.rankings.len(), 2);
        assert!(snapshot.rankings.iter().all(|entry| entry.rating == 1500.0));
    }

    #[test]
    fn test_bayesian_rating_source_swaps_composite_input() {
        let mut config = PipelineConfig::default();
        config.ranking.rating_source = RatingSourceKind::Bayesian;

        let snapshot = run(&config, vec![raw(None, "x", "y", "A", "KO/TKO")]).unwrap();
        assert_eq!(snapshot.rating_source, RatingSourceKind::Bayesian);
        assert!(snapshot.bayesian.is_some());
        assert_eq!(snapshot.rankings[0].competitor, "x");
        assert!(snapshot.rankings[0].rating < 40.0);
    }
}
