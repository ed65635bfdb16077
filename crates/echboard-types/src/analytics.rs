//! Derived summary types for the comparison and stats views

use serde::{Deserialize, Serialize};

use crate::models::{RegionId, RegionMetrics};

/// Aggregate metrics for one region over the historical window
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionSummary {
    pub baseline_avg: f64,
    pub simulated_avg: f64,
    pub change_percent: f64,
    pub min_price: f64,
    pub max_price: f64,
}

impl From<RegionMetrics> for RegionSummary {
    fn from(m: RegionMetrics) -> Self {
        Self {
            baseline_avg: m.baseline_avg,
            simulated_avg: m.simulated_avg,
            change_percent: m.change_percent,
            min_price: m.min_price,
            max_price: m.max_price,
        }
    }
}

/// Aggregate metrics for one region over the forecast horizon
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    /// `(last - first) / first * 100`
    pub trend_percent: f64,
}

/// Where a region summary came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummarySource {
    /// Supplied by the simulation result's `metrics`
    Precomputed,
    /// Recomputed from the merged series
    Computed,
}

/// One row of the regional comparison view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionComparison {
    pub region: RegionId,
    pub summary: RegionSummary,
    pub source: SummarySource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast: Option<ForecastSummary>,
    /// Scenario price effect in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_effect: Option<f64>,
}
