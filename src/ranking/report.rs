//! Line-oriented text reports
//!
//! The composite ranking renders as `"rank. name: score"` lines, and the
//! Bayesian table as one row per competitor with mean and uncertainty.

use crate::ranking::composite::RankingEntry;
use crate::rating::BayesianStanding;
use std::fmt::Write;

/// Render the composite ranking, optionally truncated to the first `top` rows
pub fn render_rankings(title: &str, entries: &[RankingEntry], top: Option<usize>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", title);

    let limit = top.unwrap_or(entries.len());
    for entry in entries.iter().take(limit) {
        let _ = writeln!(
            out,
            "{}. {}: {:.2}",
            entry.rank, entry.competitor, entry.composite_score
        );
    }

    out
}

/// Render the Bayesian skill table, sorted as given
pub fn render_bayesian(standings: &[BayesianStanding], top: Option<usize>) -> String {
    let width = standings
        .iter()
        .map(|standing| standing.competitor.chars().count())
        .max()
        .unwrap_or(0)
        .max("Competitor".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<width$}  {:>8}  {:>8}  {:>8}",
        "Competitor",
        "mu",
        "sigma",
        "mu-3s",
        width = width
    );

    let limit = top.unwrap_or(standings.len());
    for standing in standings.iter().take(limit) {
        let _ = writeln!(
            out,
            "{:<width$}  {:>8.3}  {:>8.3}  {:>8.3}",
            standing.competitor,
            standing.mean,
            standing.uncertainty,
            standing.conservative,
            width = width
        );
    }

    out
}
