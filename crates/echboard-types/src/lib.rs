//! echboard-types - Shared data types for echboard
//!
//! This crate contains pure data structures without heavy dependencies.
//! No tokio, no async runtime - just serde-serializable types.
//!
//! Used by:
//! - echboard-core (synthesis logic, API client)
//! - echboard (command-line frontend)

pub mod analytics;
pub mod models;

// Re-export analytics types
pub use analytics::{ForecastSummary, RegionComparison, RegionSummary, SummarySource};

// Re-export model types
pub use models::{
    BaselineData, BaselineMetadata, CategoryCounts, ComparisonRequest, ForecastBundle,
    ForecastSeries, MergedRecord, PriceTable, RegionId, RegionInfo, RegionMetrics, RegionValues,
    Scenario, ScenarioCatalog, ScenarioComparison, SensitivityAnalysis, SensitivityPoint,
    SensitivityRequest, SeriesKind, SimulationRequest, SimulationResult, StructuredForecast,
    MAX_COMPARED_SCENARIOS, REGIONS,
};
