//! Per-region aggregate metrics over a merged series

use echboard_types::models::percent_change;
use echboard_types::{ForecastSummary, MergedRecord, RegionId, RegionSummary};

/// Running mean/min/max accumulator
#[derive(Debug, Clone, Copy)]
struct Extent {
    count: usize,
    sum: f64,
    min: f64,
    max: f64,
}

impl Extent {
    fn new() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }

    fn min_or_zero(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.min
        }
    }

    fn max_or_zero(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.max
        }
    }
}

/// Summarize `region` over the historical records of `records`.
///
/// A point without a simulated value counts as its baseline value, so a
/// region the scenario does not touch reports a 0% change. Empty history
/// yields an all-zero summary.
pub fn summarize(region: RegionId, records: &[MergedRecord]) -> RegionSummary {
    let mut baseline = Extent::new();
    let mut simulated = Extent::new();

    for values in records
        .iter()
        .filter(|r| !r.is_forecast)
        .filter_map(|r| r.region(region))
    {
        if let Some(b) = values.baseline {
            baseline.push(b);
        }
        if let Some(s) = values.effective_simulated() {
            simulated.push(s);
        }
    }

    let baseline_avg = baseline.mean();
    let simulated_avg = simulated.mean();

    RegionSummary {
        baseline_avg,
        simulated_avg,
        change_percent: percent_change(baseline_avg, simulated_avg),
        min_price: simulated.min_or_zero(),
        max_price: simulated.max_or_zero(),
    }
}

/// Summarize `region` over the forecast records of `records`.
///
/// Returns `None` when the region has no forecast points.
pub fn summarize_forecast(region: RegionId, records: &[MergedRecord]) -> Option<ForecastSummary> {
    let points: Vec<f64> = records
        .iter()
        .filter(|r| r.is_forecast)
        .filter_map(|r| r.region(region)?.forecast_point)
        .collect();

    let (&first, &last) = (points.first()?, points.last()?);

    let mut extent = Extent::new();
    points.iter().for_each(|&p| extent.push(p));

    Some(ForecastSummary {
        avg: extent.mean(),
        min: extent.min,
        max: extent.max,
        trend_percent: percent_change(first, last),
    })
}
