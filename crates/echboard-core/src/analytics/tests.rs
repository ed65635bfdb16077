//! Unit tests for analytics module

use super::*;
use echboard_types::{MergedRecord, RegionMetrics, SeriesKind, SummarySource};

/// Build records from (baseline, simulated) pairs for one region, then
/// append forecast points
fn records(region: RegionId, history: &[(f64, Option<f64>)], forecast: &[f64]) -> Vec<MergedRecord> {
    let mut out = Vec::new();
    for (i, (baseline, simulated)) in history.iter().enumerate() {
        let mut r = MergedRecord::new(format!("2023-{:02}", i + 1), i, false);
        r.insert(region, SeriesKind::Baseline, *baseline);
        if let Some(s) = simulated {
            r.insert(region, SeriesKind::Simulated, *s);
        }
        out.push(r);
    }
    for (j, point) in forecast.iter().enumerate() {
        let ordinal = history.len() + j;
        let mut r = MergedRecord::new(format!("2024-{:02}", j + 1), ordinal, true);
        r.insert(region, SeriesKind::ForecastPoint, *point);
        out.push(r);
    }
    out
}

// ============================================================================
// Historical summary
// ============================================================================

#[test]
fn test_summarize_two_month_scenario() {
    let recs = records(RegionId::Us, &[(10.0, Some(11.0)), (12.0, Some(13.0))], &[]);
    let s = summarize(RegionId::Us, &recs);

    assert_eq!(s.baseline_avg, 11.0);
    assert_eq!(s.simulated_avg, 12.0);
    assert!((s.change_percent - 9.0909).abs() < 1e-3);
    assert_eq!(s.min_price, 11.0);
    assert_eq!(s.max_price, 13.0);
}

#[test]
fn test_summarize_unaffected_region_reports_zero_change() {
    let recs = records(RegionId::Eu, &[(2.0, None), (4.0, None)], &[]);
    let s = summarize(RegionId::Eu, &recs);

    assert_eq!(s.simulated_avg, 3.0);
    assert_eq!(s.change_percent, 0.0);
    assert_eq!(s.min_price, 2.0);
    assert_eq!(s.max_price, 4.0);
}

#[test]
fn test_summarize_zero_baseline_guard() {
    let recs = records(RegionId::Asia, &[(0.0, Some(5.0)), (0.0, Some(7.0))], &[]);
    let s = summarize(RegionId::Asia, &recs);

    assert_eq!(s.baseline_avg, 0.0);
    assert_eq!(s.change_percent, 0.0);
    assert!(s.change_percent.is_finite());
}

#[test]
fn test_summarize_ignores_forecast_records() {
    let recs = records(RegionId::Us, &[(10.0, Some(10.0))], &[1000.0]);
    let s = summarize(RegionId::Us, &recs);
    assert_eq!(s.max_price, 10.0);
}

#[test]
fn test_summarize_missing_region_is_all_zero() {
    let recs = records(RegionId::Us, &[(10.0, Some(10.0))], &[]);
    assert_eq!(summarize(RegionId::China, &recs), RegionSummary::default());
}

// ============================================================================
// Forecast summary
// ============================================================================

#[test]
fn test_summarize_forecast() {
    let recs = records(RegionId::Us, &[(10.0, None)], &[10.0, 14.0, 12.0]);
    let f = summarize_forecast(RegionId::Us, &recs).unwrap();

    assert_eq!(f.avg, 12.0);
    assert_eq!(f.min, 10.0);
    assert_eq!(f.max, 14.0);
    assert!((f.trend_percent - 20.0).abs() < 1e-9);
}

#[test]
fn test_summarize_forecast_absent_without_points() {
    let recs = records(RegionId::Us, &[(10.0, None)], &[]);
    assert!(summarize_forecast(RegionId::Us, &recs).is_none());
    assert!(forecast_summaries(&recs, &RegionId::ALL).is_empty());
}

#[test]
fn test_forecast_trend_zero_first_point() {
    let recs = records(RegionId::Us, &[], &[0.0, 3.0]);
    let f = summarize_forecast(RegionId::Us, &recs).unwrap();
    assert_eq!(f.trend_percent, 0.0);
}

// ============================================================================
// Comparison
// ============================================================================

#[test]
fn test_precomputed_metrics_agree_with_local_summary() {
    let history = [(1.2, Some(1.3)), (1.4, Some(1.5)), (1.1, Some(1.25)), (1.6, Some(1.55))];
    let recs = records(RegionId::Eu, &history, &[]);

    let base: Vec<f64> = history.iter().map(|h| h.0).collect();
    let sim: Vec<f64> = history.iter().map(|h| h.1.unwrap()).collect();
    let base_avg = base.iter().sum::<f64>() / base.len() as f64;
    let sim_avg = sim.iter().sum::<f64>() / sim.len() as f64;
    let metrics = BTreeMap::from([(
        RegionId::Eu,
        RegionMetrics {
            baseline_avg: base_avg,
            simulated_avg: sim_avg,
            change_percent: (sim_avg - base_avg) / base_avg * 100.0,
            min_price: 1.25,
            max_price: 1.55,
        },
    )]);

    let (precomputed, source) = resolve_summary(RegionId::Eu, Some(&metrics), &recs);
    assert_eq!(source, SummarySource::Precomputed);
    let local = summarize(RegionId::Eu, &recs);

    assert!((precomputed.baseline_avg - local.baseline_avg).abs() < 1e-6);
    assert!((precomputed.simulated_avg - local.simulated_avg).abs() < 1e-6);
    assert!((precomputed.change_percent - local.change_percent).abs() < 1e-6);
    assert_eq!(precomputed.min_price, local.min_price);
    assert_eq!(precomputed.max_price, local.max_price);
}

#[test]
fn test_resolve_falls_back_to_local_per_region() {
    let recs = records(RegionId::Us, &[(10.0, Some(12.0))], &[]);
    let metrics = BTreeMap::from([(RegionId::Eu, RegionMetrics::default())]);

    let (summary, source) = resolve_summary(RegionId::Us, Some(&metrics), &recs);
    assert_eq!(source, SummarySource::Computed);
    assert_eq!(summary.simulated_avg, 12.0);

    let all = resolve_summaries(Some(&metrics), &recs, &[RegionId::Us, RegionId::Eu]);
    assert_eq!(all.len(), 2);
}

#[test]
fn test_compare_regions_carries_price_effect_and_forecast() {
    let recs = records(RegionId::Us, &[(10.0, Some(11.0))], &[11.5, 12.0]);
    let result = SimulationResult {
        price_effects: BTreeMap::from([(RegionId::Us, 10.0)]),
        ..Default::default()
    };

    let rows = compare_regions(&result, &recs, &[RegionId::Us, RegionId::China]);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].price_effect, Some(10.0));
    assert!(rows[0].forecast.is_some());
    assert!(rows[1].forecast.is_none());
    assert!(rows[1].price_effect.is_none());
}

#[test]
fn test_analytics_data_compute() {
    let result = SimulationResult {
        dates: vec!["2023-01-01".into(), "2023-02-01".into()],
        baseline_prices: BTreeMap::from([(RegionId::Us, vec![10.0, 12.0])]),
        simulated_prices: BTreeMap::from([(RegionId::Us, vec![11.0, 13.0])]),
        ..Default::default()
    };
    let series = MergedSeries::build(&result, true);

    let data = AnalyticsData::compute(&result, &series, &[RegionId::Us]);
    assert!(!data.is_empty());
    assert_eq!(data.summaries[&RegionId::Us].baseline_avg, 11.0);
    assert!(data.forecasts.is_empty());
}
