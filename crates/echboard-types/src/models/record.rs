//! Date-aligned record combining every series for one month

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::region::RegionId;

/// Kind of value stored for a region in a merged record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    Baseline,
    Simulated,
    ForecastPoint,
    CiLower,
    CiUpper,
}

/// Values one region contributes to a record (absent, not zero, when missing)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionValues {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulated: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast_point: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ci_lower: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ci_upper: Option<f64>,
}

impl RegionValues {
    pub fn get(&self, kind: SeriesKind) -> Option<f64> {
        match kind {
            SeriesKind::Baseline => self.baseline,
            SeriesKind::Simulated => self.simulated,
            SeriesKind::ForecastPoint => self.forecast_point,
            SeriesKind::CiLower => self.ci_lower,
            SeriesKind::CiUpper => self.ci_upper,
        }
    }

    pub fn set(&mut self, kind: SeriesKind, value: f64) {
        let slot = match kind {
            SeriesKind::Baseline => &mut self.baseline,
            SeriesKind::Simulated => &mut self.simulated,
            SeriesKind::ForecastPoint => &mut self.forecast_point,
            SeriesKind::CiLower => &mut self.ci_lower,
            SeriesKind::CiUpper => &mut self.ci_upper,
        };
        *slot = Some(value);
    }

    pub fn is_empty(&self) -> bool {
        *self == RegionValues::default()
    }

    /// Simulated value, or the baseline when the scenario left this point alone
    pub fn effective_simulated(&self) -> Option<f64> {
        self.simulated.or(self.baseline)
    }

    /// Scenario change at this point in percent (0 when baseline is 0)
    pub fn change_percent(&self) -> Option<f64> {
        let baseline = self.baseline?;
        let simulated = self.effective_simulated()?;
        Some(percent_change(baseline, simulated))
    }
}

/// `(to - from) / from * 100`, guarded to 0 when `from` is 0
pub fn percent_change(from: f64, to: f64) -> f64 {
    if from == 0.0 {
        0.0
    } else {
        (to - from) / from * 100.0
    }
}

/// One month of combined baseline, simulated and forecast values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergedRecord {
    /// Month label (`YYYY-MM`)
    pub date: String,
    /// Chronological position in the merged sequence
    pub ordinal: usize,
    pub is_forecast: bool,
    /// Regions with at least one value at this date
    pub regions: BTreeMap<RegionId, RegionValues>,
}

impl MergedRecord {
    pub fn new(date: impl Into<String>, ordinal: usize, is_forecast: bool) -> Self {
        Self {
            date: date.into(),
            ordinal,
            is_forecast,
            regions: BTreeMap::new(),
        }
    }

    /// Value for `(region, kind)`, if present
    pub fn value(&self, region: RegionId, kind: SeriesKind) -> Option<f64> {
        self.regions.get(&region)?.get(kind)
    }

    pub fn region(&self, region: RegionId) -> Option<&RegionValues> {
        self.regions.get(&region)
    }

    pub fn insert(&mut self, region: RegionId, kind: SeriesKind, value: f64) {
        self.regions.entry(region).or_default().set(kind, value);
    }
}

/// Truncate an ISO date to its `YYYY-MM` month label
pub fn month_label(date: &str) -> String {
    date.chars().take(7).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_values_are_absent() {
        let mut record = MergedRecord::new("2023-01", 0, false);
        record.insert(RegionId::Us, SeriesKind::Baseline, 10.0);

        assert_eq!(record.value(RegionId::Us, SeriesKind::Baseline), Some(10.0));
        assert_eq!(record.value(RegionId::Us, SeriesKind::Simulated), None);
        assert_eq!(record.value(RegionId::Eu, SeriesKind::Baseline), None);
    }

    #[test]
    fn test_change_percent_falls_back_to_baseline() {
        let values = RegionValues {
            baseline: Some(10.0),
            ..Default::default()
        };
        assert_eq!(values.change_percent(), Some(0.0));

        let values = RegionValues {
            baseline: Some(10.0),
            simulated: Some(11.0),
            ..Default::default()
        };
        assert!((values.change_percent().unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_percent_change_zero_guard() {
        assert_eq!(percent_change(0.0, 5.0), 0.0);
    }

    #[test]
    fn test_month_label() {
        assert_eq!(month_label("2023-01-31"), "2023-01");
        assert_eq!(month_label("2023"), "2023");
    }
}
