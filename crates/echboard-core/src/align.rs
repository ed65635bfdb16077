//! Series alignment
//!
//! Merges the historical baseline, the simulated overlay and the forecast
//! horizon into one ordered sequence of [`MergedRecord`]s: all historical
//! months ascending, then all forecast months ascending.

use std::collections::HashSet;

use echboard_types::models::month_label;
use echboard_types::{ForecastBundle, MergedRecord, PriceTable, RegionId, SeriesKind, SimulationResult};

use crate::forecast::{self, ForecastKind};

/// Number of historical records `align` will emit.
///
/// Region arrays shorter than `dates` truncate the history to the shortest one.
pub fn historical_len(dates: &[String], baseline: &PriceTable) -> usize {
    baseline
        .values()
        .map(Vec::len)
        .fold(dates.len(), usize::min)
}

/// Align baseline, simulated and forecast series by ordinal date index.
///
/// Index `i` of `dates` pairs with index `i` of every region array. Forecast
/// dates whose month already appears in the history are dropped so that no
/// two records share a date.
pub fn align(
    dates: &[String],
    baseline: &PriceTable,
    simulated: Option<&PriceTable>,
    forecast: Option<&ForecastBundle>,
) -> Vec<MergedRecord> {
    align_with_stats(dates, baseline, simulated, forecast).0
}

/// Months `align` dropped to keep record dates unique
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlignStats {
    /// Historical dates whose month was already taken by an earlier date
    pub duplicate_months: usize,
    /// Forecast dates whose month already appears in the history
    pub overlapping_forecast_months: usize,
}

impl AlignStats {
    pub fn dropped(&self) -> usize {
        self.duplicate_months + self.overlapping_forecast_months
    }
}

/// [`align`], also counting the dates that were dropped
pub fn align_with_stats(
    dates: &[String],
    baseline: &PriceTable,
    simulated: Option<&PriceTable>,
    forecast: Option<&ForecastBundle>,
) -> (Vec<MergedRecord>, AlignStats) {
    let mut stats = AlignStats::default();
    let n = historical_len(dates, baseline);
    if n < dates.len() {
        tracing::debug!(
            "Truncating history from {} to {} dates (short region array)",
            dates.len(),
            n
        );
    }

    let mut records = Vec::with_capacity(n + forecast.map_or(0, |f| f.dates.len()));
    let mut seen: HashSet<String> = HashSet::with_capacity(records.capacity());

    for (i, date) in dates.iter().take(n).enumerate() {
        let label = month_label(date);
        if !seen.insert(label.clone()) {
            tracing::debug!("Duplicate historical month {}, keeping first", label);
            stats.duplicate_months += 1;
            continue;
        }

        let mut record = MergedRecord::new(label, records.len(), false);
        for region in RegionId::ALL {
            if let Some(&value) = baseline.get(&region).and_then(|s| s.get(i)) {
                record.insert(region, SeriesKind::Baseline, value);
            }
            if let Some(&value) = simulated.and_then(|t| t.get(&region)).and_then(|s| s.get(i)) {
                record.insert(region, SeriesKind::Simulated, value);
            }
        }
        records.push(record);
    }

    let Some(bundle) = forecast else {
        return (records, stats);
    };

    for (i, date) in bundle.dates.iter().enumerate() {
        let label = month_label(date);
        if !seen.insert(label.clone()) {
            tracing::debug!("Forecast month {} overlaps history, skipping", label);
            stats.overlapping_forecast_months += 1;
            continue;
        }

        let mut record = MergedRecord::new(label, records.len(), true);
        for region in RegionId::ALL {
            let kinds = [
                (ForecastKind::Point, SeriesKind::ForecastPoint),
                (ForecastKind::Lower, SeriesKind::CiLower),
                (ForecastKind::Upper, SeriesKind::CiUpper),
            ];
            for (forecast_kind, series_kind) in kinds {
                if let Some(value) = forecast::value_at(bundle, region, i, forecast_kind) {
                    record.insert(region, series_kind, value);
                }
            }
        }
        records.push(record);
    }

    (records, stats)
}

/// Aligned records plus the metadata the chart and tables need
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedSeries {
    pub records: Vec<MergedRecord>,
    /// Month of the last historical record (history/forecast boundary marker)
    pub last_historical_date: Option<String>,
    /// True if forecast records carry 95% bounds for at least one region
    pub has_confidence_intervals: bool,
    /// Forecaster name, when a forecast was merged
    pub forecast_model: Option<String>,
    /// Confidence label (e.g. `95%`), when a forecast was merged
    pub confidence_label: Option<String>,
    /// Dates dropped during alignment
    pub stats: AlignStats,
}

impl MergedSeries {
    /// Merge a simulation result. The forecast is ignored when `forecast_enabled` is false.
    pub fn build(result: &SimulationResult, forecast_enabled: bool) -> Self {
        let bundle = result.forecast.as_ref().filter(|_| forecast_enabled);
        let (records, stats) = align_with_stats(
            &result.dates,
            &result.baseline_prices,
            Some(&result.simulated_prices),
            bundle,
        );

        let last_historical_date = records
            .iter()
            .take_while(|r| !r.is_forecast)
            .last()
            .map(|r| r.date.clone());

        Self {
            records,
            last_historical_date,
            has_confidence_intervals: bundle.is_some_and(forecast::has_confidence_intervals),
            forecast_model: bundle.and_then(|b| b.model.clone()),
            confidence_label: bundle.and_then(|b| b.confidence_interval.clone()),
            stats,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// No data available (a user-visible state, not an error)
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn historical(&self) -> impl Iterator<Item = &MergedRecord> {
        self.records.iter().filter(|r| !r.is_forecast)
    }

    pub fn forecast(&self) -> impl Iterator<Item = &MergedRecord> {
        self.records.iter().filter(|r| r.is_forecast)
    }

    pub fn historical_records(&self) -> Vec<MergedRecord> {
        self.historical().cloned().collect()
    }

    pub fn forecast_records(&self) -> Vec<MergedRecord> {
        self.forecast().cloned().collect()
    }

    pub fn get(&self, ordinal: usize) -> Option<&MergedRecord> {
        self.records.get(ordinal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use echboard_types::{ForecastSeries, StructuredForecast};
    use std::collections::BTreeMap;

    fn table(entries: &[(RegionId, &[f64])]) -> PriceTable {
        entries.iter().map(|(r, v)| (*r, v.to_vec())).collect()
    }

    fn dates(list: &[&str]) -> Vec<String> {
        list.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn test_align_historical_only() {
        let d = dates(&["2023-01-01", "2023-02-01"]);
        let baseline = table(&[(RegionId::Us, &[10.0, 12.0])]);
        let simulated = table(&[(RegionId::Us, &[11.0, 13.0])]);

        let records = align(&d, &baseline, Some(&simulated), None);

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| !r.is_forecast));
        assert_eq!(records[0].date, "2023-01");
        assert_eq!(records[1].value(RegionId::Us, SeriesKind::Simulated), Some(13.0));
        assert_eq!(records[1].value(RegionId::Eu, SeriesKind::Baseline), None);
    }

    #[test]
    fn test_align_empty_dates() {
        let records = align(&[], &PriceTable::new(), None, None);
        assert!(records.is_empty());
    }

    #[test]
    fn test_align_truncates_to_shortest_baseline() {
        let d = dates(&["2023-01-01", "2023-02-01", "2023-03-01"]);
        let baseline = table(&[(RegionId::Us, &[1.0, 2.0, 3.0]), (RegionId::Eu, &[4.0, 5.0])]);

        let records = align(&d, &baseline, None, None);
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_align_short_simulated_leaves_values_absent() {
        let d = dates(&["2023-01-01", "2023-02-01"]);
        let baseline = table(&[(RegionId::Us, &[1.0, 2.0])]);
        let simulated = table(&[(RegionId::Us, &[1.5])]);

        let records = align(&d, &baseline, Some(&simulated), None);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].value(RegionId::Us, SeriesKind::Simulated), None);
        assert_eq!(records[1].value(RegionId::Us, SeriesKind::Baseline), Some(2.0));
    }

    #[test]
    fn test_sub_month_dates_are_counted_when_dropped() {
        let d = dates(&["2023-01-01", "2023-01-15", "2023-02-01"]);
        let baseline = table(&[(RegionId::Us, &[1.0, 2.0, 3.0])]);

        let (records, stats) = align_with_stats(&d, &baseline, None, None);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].value(RegionId::Us, SeriesKind::Baseline), Some(1.0));
        assert_eq!(records[1].value(RegionId::Us, SeriesKind::Baseline), Some(3.0));
        assert_eq!(stats.duplicate_months, 1);
        assert_eq!(stats.dropped(), 1);
    }

    #[test]
    fn test_align_appends_forecast_after_history() {
        let d = dates(&["2023-01-01", "2023-02-01"]);
        let baseline = table(&[(RegionId::Us, &[10.0, 12.0])]);
        let mut series = BTreeMap::new();
        series.insert(
            RegionId::Us,
            ForecastSeries::Structured(StructuredForecast {
                point: vec![14.0, 15.0],
                lower_95: Some(vec![12.0, 13.0]),
                upper_95: Some(vec![16.0, 17.0]),
                ..Default::default()
            }),
        );
        series.insert(RegionId::Eu, ForecastSeries::Legacy(vec![30.0, 31.0]));
        let bundle = ForecastBundle {
            dates: dates(&["2023-03-01", "2023-04-01"]),
            series,
            ..Default::default()
        };

        let records = align(&d, &baseline, None, Some(&bundle));

        assert_eq!(records.len(), 4);
        assert!(!records[1].is_forecast);
        assert!(records[2].is_forecast && records[3].is_forecast);
        assert_eq!(records[2].ordinal, 2);
        assert_eq!(records[3].value(RegionId::Us, SeriesKind::CiUpper), Some(17.0));
        assert_eq!(records[3].value(RegionId::Eu, SeriesKind::ForecastPoint), Some(31.0));
        assert_eq!(records[3].value(RegionId::Eu, SeriesKind::CiLower), None);
    }

    #[test]
    fn test_forecast_month_overlapping_history_is_dropped() {
        let d = dates(&["2023-01-01", "2023-02-01"]);
        let baseline = table(&[(RegionId::Us, &[10.0, 12.0])]);
        let mut series = BTreeMap::new();
        series.insert(RegionId::Us, ForecastSeries::Legacy(vec![12.5, 14.0]));
        let bundle = ForecastBundle {
            dates: dates(&["2023-02-28", "2023-03-31"]),
            series,
            ..Default::default()
        };

        let (records, stats) = align_with_stats(&d, &baseline, None, Some(&bundle));
        assert_eq!(stats.overlapping_forecast_months, 1);
        assert_eq!(stats.duplicate_months, 0);
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].date, "2023-02");
        assert!(!records[1].is_forecast);
        // Index 1 of the forecast lands on the first appended record
        assert_eq!(records[2].value(RegionId::Us, SeriesKind::ForecastPoint), Some(14.0));
    }

    #[test]
    fn test_merged_series_respects_forecast_toggle() {
        let mut series = BTreeMap::new();
        series.insert(RegionId::Us, ForecastSeries::Legacy(vec![14.0]));
        let result = SimulationResult {
            dates: dates(&["2023-01-01", "2023-02-01"]),
            baseline_prices: table(&[(RegionId::Us, &[10.0, 12.0])]),
            simulated_prices: table(&[(RegionId::Us, &[11.0, 13.0])]),
            forecast: Some(ForecastBundle {
                dates: dates(&["2023-03-01"]),
                model: Some("simple_fallback".into()),
                series,
                ..Default::default()
            }),
            ..Default::default()
        };

        let with = MergedSeries::build(&result, true);
        assert_eq!(with.records.len(), 3);
        assert_eq!(with.last_historical_date.as_deref(), Some("2023-02"));
        assert_eq!(with.forecast_model.as_deref(), Some("simple_fallback"));
        assert!(!with.has_confidence_intervals);

        let without = MergedSeries::build(&result, false);
        assert_eq!(without.records.len(), 2);
        assert!(without.forecast().next().is_none());
        assert!(without.forecast_model.is_none());
    }
}
