//! Per-competitor performance statistics
//!
//! Accumulates strike and takedown differentials and win-method weighted
//! counts over the match stream, independently of the rating folds.

pub mod accumulator;

pub use accumulator::{AccumulatedStats, MethodWeights, StatsAccumulator};
