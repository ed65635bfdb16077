//! Derived analytics over a merged series
//!
//! Per-region summaries of the historical window, forecast-horizon
//! summaries, and the regional comparison rows.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use echboard_types::{ForecastSummary, RegionComparison, RegionId, RegionSummary, SimulationResult};

use crate::align::MergedSeries;

pub mod comparison;
pub mod summary;

#[cfg(test)]
mod tests;

pub use comparison::{compare_regions, forecast_summaries, resolve_summaries, resolve_summary};
pub use summary::{summarize, summarize_forecast};

/// Complete analytics for one simulation result and region filter
#[derive(Debug, Clone)]
pub struct AnalyticsData {
    /// Historical summaries per visible region
    pub summaries: BTreeMap<RegionId, RegionSummary>,
    /// Forecast summaries (regions without forecast points omitted)
    pub forecasts: BTreeMap<RegionId, ForecastSummary>,
    /// Comparison rows in canonical region order
    pub comparison: Vec<RegionComparison>,
    /// Timestamp of computation
    pub computed_at: DateTime<Utc>,
}

impl AnalyticsData {
    /// Compute analytics for `regions` from a result and its merged series
    pub fn compute(result: &SimulationResult, series: &MergedSeries, regions: &[RegionId]) -> Self {
        let records = &series.records;
        let comparison = compare_regions(result, records, regions);

        Self {
            summaries: comparison.iter().map(|c| (c.region, c.summary)).collect(),
            forecasts: forecast_summaries(records, regions),
            comparison,
            computed_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.comparison.is_empty()
    }
}
