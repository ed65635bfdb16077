//! Hover tooltip regrouping
//!
//! The chart layer reports a hovered point as flat `<region>_<kind>` entries
//! (`us_ech_baseline`, `eu_ech_ci_lower`, ...). Region ids contain an
//! underscore themselves, so the region is the first two tokens.

use std::collections::{BTreeMap, BTreeSet};

use echboard_types::{MergedRecord, RegionId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TooltipValue {
    Number(f64),
    /// Precomputed `[lower, upper]` band
    Range(f64, f64),
}

/// One raw key/value pair from the chart
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipEntry {
    pub key: String,
    pub value: TooltipValue,
}

impl TooltipEntry {
    pub fn number(region: RegionId, kind: EntryKind, value: f64) -> Self {
        Self {
            key: format!("{}_{}", region, kind.suffix()),
            value: TooltipValue::Number(value),
        }
    }
}

/// Value kind encoded in the key suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Baseline,
    Simulated,
    Forecast,
    CiLower,
    CiUpper,
    Ci,
}

impl EntryKind {
    pub fn suffix(&self) -> &'static str {
        match self {
            EntryKind::Baseline => "baseline",
            EntryKind::Simulated => "simulated",
            EntryKind::Forecast => "forecast",
            EntryKind::CiLower => "ci_lower",
            EntryKind::CiUpper => "ci_upper",
            EntryKind::Ci => "ci",
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "baseline" => Some(EntryKind::Baseline),
            "simulated" => Some(EntryKind::Simulated),
            "forecast" => Some(EntryKind::Forecast),
            "ci_lower" => Some(EntryKind::CiLower),
            "ci_upper" => Some(EntryKind::CiUpper),
            "ci" => Some(EntryKind::Ci),
            _ => None,
        }
    }
}

/// Split `us_ech_ci_lower` into (`us_ech`, `ci_lower`)
pub fn parse_key(key: &str) -> Option<(RegionId, EntryKind)> {
    let mut parts = key.splitn(3, '_');
    let (first, second, rest) = (parts.next()?, parts.next()?, parts.next()?);
    let region = format!("{}_{}", first, second).parse().ok()?;
    Some((region, EntryKind::from_suffix(rest)?))
}

/// Display values for one region
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RegionTooltip {
    pub baseline: Option<f64>,
    pub simulated: Option<f64>,
    pub forecast: Option<f64>,
    /// Interval attached to the forecast value
    pub ci: Option<(f64, f64)>,
}

#[derive(Default)]
struct Partial {
    shown: RegionTooltip,
    has_lower: bool,
    has_upper: bool,
    band: Option<(f64, f64)>,
}

/// Regroup raw entries by region, dropping regions that are not visible.
///
/// Interval entries never appear as their own lines; the `_ci` band is
/// attached to the forecast value when the lower and upper series are both
/// present too. An empty map means "render nothing".
pub fn aggregate(
    entries: &[TooltipEntry],
    visible: &BTreeSet<RegionId>,
) -> BTreeMap<RegionId, RegionTooltip> {
    let mut partials: BTreeMap<RegionId, Partial> = BTreeMap::new();

    for entry in entries {
        let Some((region, kind)) = parse_key(&entry.key) else {
            tracing::debug!("Ignoring tooltip key '{}'", entry.key);
            continue;
        };
        if !visible.contains(&region) {
            continue;
        }

        let partial = partials.entry(region).or_default();
        match (kind, entry.value) {
            (EntryKind::Baseline, TooltipValue::Number(v)) => partial.shown.baseline = Some(v),
            (EntryKind::Simulated, TooltipValue::Number(v)) => partial.shown.simulated = Some(v),
            (EntryKind::Forecast, TooltipValue::Number(v)) => partial.shown.forecast = Some(v),
            (EntryKind::CiLower, _) => partial.has_lower = true,
            (EntryKind::CiUpper, _) => partial.has_upper = true,
            (EntryKind::Ci, TooltipValue::Range(lo, hi)) => partial.band = Some((lo, hi)),
            (kind, value) => {
                tracing::debug!("Unexpected {:?} value for {:?}", value, kind);
            }
        }
    }

    partials
        .into_iter()
        .filter_map(|(region, p)| {
            let mut shown = p.shown;
            if shown.baseline.is_none() && shown.simulated.is_none() && shown.forecast.is_none() {
                return None;
            }
            if shown.forecast.is_some() && p.has_lower && p.has_upper {
                shown.ci = p.band;
            }
            Some((region, shown))
        })
        .collect()
}

/// Flat chart entries for a merged record, as the chart layer keys them
pub fn chart_entries(record: &MergedRecord) -> Vec<TooltipEntry> {
    let mut entries = Vec::new();

    for (&region, values) in &record.regions {
        let singles = [
            (EntryKind::Baseline, values.baseline),
            (EntryKind::Simulated, values.simulated),
            (EntryKind::Forecast, values.forecast_point),
            (EntryKind::CiLower, values.ci_lower),
            (EntryKind::CiUpper, values.ci_upper),
        ];
        for (kind, value) in singles {
            if let Some(v) = value {
                entries.push(TooltipEntry::number(region, kind, v));
            }
        }
        if let (Some(lo), Some(hi)) = (values.ci_lower, values.ci_upper) {
            entries.push(TooltipEntry {
                key: format!("{}_{}", region, EntryKind::Ci.suffix()),
                value: TooltipValue::Range(lo, hi),
            });
        }
    }

    entries
}
