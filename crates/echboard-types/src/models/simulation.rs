//! Simulation request/response shapes for `POST /api/simulate/{id}`

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::forecast::ForecastBundle;
use super::region::RegionId;

/// Price series per region, positionally aligned with a date list
pub type PriceTable = BTreeMap<RegionId, Vec<f64>>;

/// Precomputed per-region metrics from the simulation endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionMetrics {
    pub baseline_avg: f64,
    pub simulated_avg: f64,
    pub change_percent: f64,
    pub min_price: f64,
    pub max_price: f64,
}

/// Body of a simulation request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    /// Parameter overrides; keys the scenario does not define are ignored server-side
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_params: Option<BTreeMap<String, f64>>,
}

impl SimulationRequest {
    pub fn with_overrides(overrides: BTreeMap<String, f64>) -> Self {
        Self {
            custom_params: (!overrides.is_empty()).then_some(overrides),
        }
    }
}

/// Settled result of a scenario simulation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    #[serde(default)]
    pub scenario_id: u32,
    #[serde(default)]
    pub scenario_name: String,
    #[serde(default)]
    pub scenario_category: String,
    #[serde(default)]
    pub scenario_description: String,
    #[serde(default)]
    pub affected_regions: Vec<String>,
    /// Effective parameters after overrides
    #[serde(default)]
    pub parameters_used: BTreeMap<String, f64>,
    /// Scenario price effect per region, in percent
    #[serde(default)]
    pub price_effects: BTreeMap<RegionId, f64>,
    #[serde(default)]
    pub simulated_prices: PriceTable,
    #[serde(default)]
    pub baseline_prices: PriceTable,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<BTreeMap<RegionId, RegionMetrics>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast: Option<ForecastBundle>,
    /// Historical dates (ISO `YYYY-MM-DD`)
    #[serde(default)]
    pub dates: Vec<String>,
}

impl SimulationResult {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
