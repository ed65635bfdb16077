//! Multi-scenario endpoints: `POST /api/compare`, `POST /api/sensitivity`
//! and `GET /api/baseline`

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::region::RegionId;
use super::simulation::{PriceTable, RegionMetrics, SimulationResult};

/// The API rejects comparisons of more scenarios than this
pub const MAX_COMPARED_SCENARIOS: usize = 5;

// ============================================================================
// Comparison
// ============================================================================

/// Body of `POST /api/compare`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRequest {
    pub scenario_ids: Vec<u32>,
}

/// Settled results of several scenarios, one per requested id
///
/// Decodes from a bare list, from `{"results": [...]}` (alias `scenarios`),
/// or from an object keyed by scenario id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "ComparisonWire")]
pub struct ScenarioComparison {
    pub results: Vec<SimulationResult>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ComparisonWire {
    List(Vec<SimulationResult>),
    Wrapped {
        #[serde(alias = "scenarios")]
        results: Vec<SimulationResult>,
    },
    Keyed(BTreeMap<String, SimulationResult>),
}

impl From<ComparisonWire> for ScenarioComparison {
    fn from(wire: ComparisonWire) -> Self {
        let results = match wire {
            ComparisonWire::List(results) | ComparisonWire::Wrapped { results } => results,
            ComparisonWire::Keyed(map) => {
                let mut results: Vec<SimulationResult> = map
                    .into_iter()
                    .map(|(key, mut result)| {
                        if result.scenario_id == 0 {
                            result.scenario_id = key.parse().unwrap_or(0);
                        }
                        result
                    })
                    .collect();
                // String keys sort "10" before "2"
                results.sort_by_key(|r| r.scenario_id);
                results
            }
        };
        Self { results }
    }
}

impl ScenarioComparison {
    pub fn get(&self, scenario_id: u32) -> Option<&SimulationResult> {
        self.results.iter().find(|r| r.scenario_id == scenario_id)
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

// ============================================================================
// Sensitivity
// ============================================================================

/// Body of `POST /api/sensitivity`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensitivityRequest {
    pub scenario_id: u32,
    pub parameter: String,
    pub values: Vec<f64>,
}

/// Outcome of one tested parameter value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensitivityPoint {
    pub value: f64,
    #[serde(default)]
    pub price_effects: BTreeMap<RegionId, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<BTreeMap<RegionId, RegionMetrics>>,
}

impl SensitivityPoint {
    /// Change of `region` in percent: the metric when present, else the price effect
    pub fn change_percent(&self, region: RegionId) -> Option<f64> {
        self.metrics
            .as_ref()
            .and_then(|m| m.get(&region))
            .map(|m| m.change_percent)
            .or_else(|| self.price_effects.get(&region).copied())
    }
}

/// Response of `POST /api/sensitivity`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensitivityAnalysis {
    #[serde(default)]
    pub scenario_id: u32,
    #[serde(default)]
    pub parameter: String,
    #[serde(default)]
    pub results: Vec<SensitivityPoint>,
}

// ============================================================================
// Baseline
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaselineMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub periods: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Response of `GET /api/baseline`: the historical dataset
///
/// `prices` mixes the four ECH regions with feedstock series
/// (`glycerin`, `propylene`), so keys stay strings on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaselineData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BaselineMetadata>,
    #[serde(default)]
    pub dates: Vec<String>,
    #[serde(default)]
    pub prices: BTreeMap<String, Vec<f64>>,
}

impl BaselineData {
    /// Series whose key names an ECH region
    pub fn region_prices(&self) -> PriceTable {
        self.prices
            .iter()
            .filter_map(|(key, values)| Some((key.parse::<RegionId>().ok()?, values.clone())))
            .collect()
    }

    /// Series that are not ECH regions, in key order
    pub fn feedstocks(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.prices
            .iter()
            .filter(|(key, _)| key.parse::<RegionId>().is_err())
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }
}
