// Analyzer module: one submodule per market signal plus the report that combines them.

pub mod education;
pub mod experience;
pub mod market_report;
pub mod salary;
pub mod technologies;

use crate::model::JobRecord;

/// A pass over a whole job batch producing one summary.
///
/// Implementations hold no mutable state, so the same batch always yields the
/// same output and analyzers can run in any order.
pub trait JobAnalyzer {
    type Output;

    fn analyze(&self, jobs: &[JobRecord]) -> Self::Output;
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// Re-export the orchestrator for ease of use.
pub use market_report::{MarketAnalyzer, MarketReport};
