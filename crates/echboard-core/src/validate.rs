//! Non-fatal diagnostics for an incoming simulation result

use echboard_types::SimulationResult;

use crate::align::{historical_len, MergedSeries};
use crate::error::{DegradedState, LoadReport};
use crate::forecast;

/// Inspect a result without changing how it is merged.
///
/// Length mismatches are reported here; alignment still truncates silently.
pub fn validate_result(result: &SimulationResult, series: &MergedSeries) -> LoadReport {
    let mut report = LoadReport::new();
    report.records_aligned = series.historical().count();
    report.forecast_records = series.forecast().count();

    if result.dates.is_empty() {
        report.add_warning("dates", "Simulation result has no dates");
        return report;
    }

    let expected = result.dates.len();
    for (label, table) in [
        ("baseline_prices", &result.baseline_prices),
        ("simulated_prices", &result.simulated_prices),
    ] {
        for (region, values) in table {
            if values.len() != expected {
                report.truncated_regions += 1;
                report.add_warning(
                    label,
                    format!(
                        "{} has {} values for {} dates",
                        region,
                        values.len(),
                        expected
                    ),
                );
            }
        }
    }

    let kept = historical_len(&result.dates, &result.baseline_prices);
    if kept < expected {
        tracing::warn!("History truncated to {} of {} dates", kept, expected);
    }

    let stats = series.stats;
    report.dropped_months = stats.dropped();
    if stats.duplicate_months > 0 {
        report.add_warning(
            "dates",
            format!(
                "{} historical dates share a month with an earlier date and were dropped",
                stats.duplicate_months
            ),
        );
    }
    if stats.overlapping_forecast_months > 0 {
        report.add_warning(
            "forecast",
            format!(
                "{} forecast months overlap the history and were dropped",
                stats.overlapping_forecast_months
            ),
        );
    }

    match &result.forecast {
        None => report.add_warning("forecast", "No forecast in result"),
        Some(bundle) if bundle.is_empty() => {
            report.add_warning("forecast", "Forecast has no dates or regions")
        }
        Some(bundle) => {
            if forecast::has_legacy_series(bundle) {
                report.add_warning(
                    "forecast",
                    "Legacy forecast shape: confidence intervals unavailable",
                );
            }
        }
    }

    if result.metrics.is_none() {
        report.add_warning("metrics", "No precomputed metrics, summaries computed locally");
    }

    report
}

/// Collapse a report into the view's degraded state
pub fn degraded_state(report: &LoadReport) -> DegradedState {
    let missing: Vec<String> = report.warnings().map(|w| w.source.clone()).collect();
    if missing.is_empty() {
        DegradedState::Healthy
    } else {
        let reason = report
            .warnings()
            .map(|w| w.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        DegradedState::PartialData { missing, reason }
    }
}
