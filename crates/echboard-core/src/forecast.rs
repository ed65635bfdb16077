//! Uniform access to forecast values across both payload shapes
//!
//! Legacy payloads carry a bare point array per region; current payloads
//! carry `point` / `lower_95` / `upper_95`. Callers go through [`value_at`]
//! and never inspect the shape themselves.

use echboard_types::{ForecastBundle, ForecastSeries, RegionId};

/// Which forecast value to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForecastKind {
    Point,
    Lower,
    Upper,
}

/// Forecast value for `region` at horizon `index`.
///
/// Bounds are only defined for the structured shape; legacy data yields
/// `None` for [`ForecastKind::Lower`] and [`ForecastKind::Upper`].
pub fn value_at(
    bundle: &ForecastBundle,
    region: RegionId,
    index: usize,
    kind: ForecastKind,
) -> Option<f64> {
    match (bundle.get(region)?, kind) {
        (ForecastSeries::Legacy(points), ForecastKind::Point) => points.get(index).copied(),
        (ForecastSeries::Legacy(_), _) => None,
        (ForecastSeries::Structured(s), ForecastKind::Point) => s.point.get(index).copied(),
        (ForecastSeries::Structured(s), ForecastKind::Lower) => {
            s.lower_95.as_ref()?.get(index).copied()
        }
        (ForecastSeries::Structured(s), ForecastKind::Upper) => {
            s.upper_95.as_ref()?.get(index).copied()
        }
    }
}

/// True if at least one region carries both 95% bound sequences
pub fn has_confidence_intervals(bundle: &ForecastBundle) -> bool {
    bundle.series.values().any(|s| s.bounds().is_some())
}

/// True if any region still uses the bare-array shape
pub fn has_legacy_series(bundle: &ForecastBundle) -> bool {
    bundle.series.values().any(ForecastSeries::is_legacy)
}

/// Human-readable forecaster name for headers
pub fn model_label(bundle: &ForecastBundle) -> &str {
    match bundle.model.as_deref() {
        Some("prophet") => "Prophet",
        Some("simple_fallback") => "Mean reversion (fallback)",
        Some(other) => other,
        None => "Unknown model",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use echboard_types::StructuredForecast;
    use std::collections::BTreeMap;

    fn bundle() -> ForecastBundle {
        let mut series = BTreeMap::new();
        series.insert(
            RegionId::Us,
            ForecastSeries::Structured(StructuredForecast {
                point: vec![14.0, 15.0],
                lower_95: Some(vec![12.0, 12.5]),
                upper_95: Some(vec![16.0, 17.5]),
                ..Default::default()
            }),
        );
        series.insert(RegionId::Eu, ForecastSeries::Legacy(vec![20.0, 21.0]));
        ForecastBundle {
            dates: vec!["2023-03-01".into(), "2023-04-01".into()],
            model: Some("prophet".into()),
            confidence_interval: Some("95%".into()),
            series,
        }
    }

    #[test]
    fn test_structured_values() {
        let b = bundle();
        assert_eq!(value_at(&b, RegionId::Us, 0, ForecastKind::Point), Some(14.0));
        assert_eq!(value_at(&b, RegionId::Us, 1, ForecastKind::Lower), Some(12.5));
        assert_eq!(value_at(&b, RegionId::Us, 1, ForecastKind::Upper), Some(17.5));
        assert_eq!(value_at(&b, RegionId::Us, 2, ForecastKind::Point), None);
    }

    #[test]
    fn test_legacy_has_points_but_no_bounds() {
        let b = bundle();
        assert_eq!(value_at(&b, RegionId::Eu, 1, ForecastKind::Point), Some(21.0));
        assert_eq!(value_at(&b, RegionId::Eu, 1, ForecastKind::Lower), None);
        assert_eq!(value_at(&b, RegionId::Eu, 1, ForecastKind::Upper), None);
        assert_eq!(value_at(&b, RegionId::Asia, 0, ForecastKind::Point), None);
    }

    #[test]
    fn test_confidence_intervals_need_one_region_only() {
        let b = bundle();
        assert!(has_confidence_intervals(&b));
        assert!(has_legacy_series(&b));

        let mut legacy_only = b.clone();
        legacy_only.series.remove(&RegionId::Us);
        assert!(!has_confidence_intervals(&legacy_only));
    }

    #[test]
    fn test_single_bound_is_not_an_interval() {
        let mut series = BTreeMap::new();
        series.insert(
            RegionId::China,
            ForecastSeries::Structured(StructuredForecast {
                point: vec![1.0],
                lower_95: Some(vec![0.5]),
                ..Default::default()
            }),
        );
        let b = ForecastBundle {
            series,
            ..Default::default()
        };
        assert!(!has_confidence_intervals(&b));
        assert_eq!(value_at(&b, RegionId::China, 0, ForecastKind::Lower), Some(0.5));
    }

    #[test]
    fn test_model_label() {
        let b = bundle();
        assert_eq!(model_label(&b), "Prophet");
        assert_eq!(model_label(&ForecastBundle::default()), "Unknown model");
    }
}
