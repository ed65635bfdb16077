//! Forecast payload as returned by the simulation endpoint
//!
//! The `forecast` object is flat on the wire: metadata keys (`dates`, `model`,
//! `confidence_interval`) sit next to one key per region. A region entry is
//! either a bare array of points (older servers) or an object with
//! `point` / `lower_95` / `upper_95` sequences.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::region::RegionId;

/// Forecast values for a single region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ForecastSeries {
    /// Bare point sequence, no confidence interval
    Legacy(Vec<f64>),
    /// Point forecast with optional 95% bounds
    Structured(StructuredForecast),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredForecast {
    #[serde(default)]
    pub point: Vec<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower_95: Option<Vec<f64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_95: Option<Vec<f64>>,

    /// Trend component (Prophet forecaster only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<Vec<f64>>,

    /// Yearly seasonality component (Prophet forecaster only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seasonality: Option<Vec<f64>>,
}

impl ForecastSeries {
    /// Point sequence regardless of shape
    pub fn points(&self) -> &[f64] {
        match self {
            ForecastSeries::Legacy(points) => points,
            ForecastSeries::Structured(s) => &s.point,
        }
    }

    /// Lower and upper bound sequences, when both are present
    pub fn bounds(&self) -> Option<(&[f64], &[f64])> {
        match self {
            ForecastSeries::Legacy(_) => None,
            ForecastSeries::Structured(s) => match (&s.lower_95, &s.upper_95) {
                (Some(lower), Some(upper)) => Some((lower, upper)),
                _ => None,
            },
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, ForecastSeries::Legacy(_))
    }
}

/// Forecast for all regions plus metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawForecastBundle", into = "RawForecastBundle")]
pub struct ForecastBundle {
    /// Forecast horizon dates (ISO `YYYY-MM-DD`)
    pub dates: Vec<String>,
    /// Forecaster name (`prophet`, `simple_fallback`)
    pub model: Option<String>,
    /// Interval label, e.g. `95%`
    pub confidence_interval: Option<String>,
    pub series: BTreeMap<RegionId, ForecastSeries>,
}

impl ForecastBundle {
    pub fn get(&self, region: RegionId) -> Option<&ForecastSeries> {
        self.series.get(&region)
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() || self.series.is_empty()
    }
}

#[derive(Serialize, Deserialize)]
struct RawForecastBundle {
    #[serde(default)]
    dates: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    confidence_interval: Option<String>,
    #[serde(flatten)]
    rest: serde_json::Map<String, serde_json::Value>,
}

impl From<RawForecastBundle> for ForecastBundle {
    fn from(raw: RawForecastBundle) -> Self {
        let mut series = BTreeMap::new();

        for (key, value) in raw.rest {
            let Ok(region) = key.parse::<RegionId>() else {
                tracing::debug!("Ignoring non-region forecast key '{}'", key);
                continue;
            };
            match serde_json::from_value::<ForecastSeries>(value) {
                Ok(s) => {
                    series.insert(region, s);
                }
                Err(e) => {
                    tracing::warn!("Skipping undecodable forecast for {}: {}", region, e);
                }
            }
        }

        Self {
            dates: raw.dates,
            model: raw.model,
            confidence_interval: raw.confidence_interval,
            series,
        }
    }
}

impl From<ForecastBundle> for RawForecastBundle {
    fn from(bundle: ForecastBundle) -> Self {
        let rest = bundle
            .series
            .into_iter()
            .filter_map(|(region, s)| {
                serde_json::to_value(s)
                    .ok()
                    .map(|v| (region.as_str().to_string(), v))
            })
            .collect();

        Self {
            dates: bundle.dates,
            model: bundle.model,
            confidence_interval: bundle.confidence_interval,
            rest,
        }
    }
}
