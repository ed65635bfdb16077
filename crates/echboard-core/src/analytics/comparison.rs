//! Regional comparison: precomputed metrics when available, local otherwise

use std::collections::BTreeMap;

use echboard_types::{
    ForecastSummary, MergedRecord, RegionComparison, RegionId, RegionMetrics, RegionSummary,
    SimulationResult, SummarySource,
};

use super::summary::{summarize, summarize_forecast};

/// Summary for `region`, preferring the payload's precomputed metrics
pub fn resolve_summary(
    region: RegionId,
    metrics: Option<&BTreeMap<RegionId, RegionMetrics>>,
    records: &[MergedRecord],
) -> (RegionSummary, SummarySource) {
    match metrics.and_then(|m| m.get(&region)) {
        Some(m) => (RegionSummary::from(*m), SummarySource::Precomputed),
        None => (summarize(region, records), SummarySource::Computed),
    }
}

pub fn resolve_summaries(
    metrics: Option<&BTreeMap<RegionId, RegionMetrics>>,
    records: &[MergedRecord],
    regions: &[RegionId],
) -> BTreeMap<RegionId, RegionSummary> {
    regions
        .iter()
        .map(|&r| (r, resolve_summary(r, metrics, records).0))
        .collect()
}

/// Forecast summaries; regions without forecast points are omitted
pub fn forecast_summaries(
    records: &[MergedRecord],
    regions: &[RegionId],
) -> BTreeMap<RegionId, ForecastSummary> {
    regions
        .iter()
        .filter_map(|&r| summarize_forecast(r, records).map(|s| (r, s)))
        .collect()
}

/// One comparison row per region in `regions`, in the given order
pub fn compare_regions(
    result: &SimulationResult,
    records: &[MergedRecord],
    regions: &[RegionId],
) -> Vec<RegionComparison> {
    regions
        .iter()
        .map(|&region| {
            let (summary, source) = resolve_summary(region, result.metrics.as_ref(), records);
            RegionComparison {
                region,
                summary,
                source,
                forecast: summarize_forecast(region, records),
                price_effect: result.price_effects.get(&region).copied(),
            }
        })
        .collect()
}
