//! Wire and view models

pub mod analysis;
pub mod forecast;
pub mod record;
pub mod region;
pub mod scenario;
pub mod simulation;

pub use analysis::{
    BaselineData, BaselineMetadata, ComparisonRequest, ScenarioComparison, SensitivityAnalysis,
    SensitivityPoint, SensitivityRequest, MAX_COMPARED_SCENARIOS,
};
pub use forecast::{ForecastBundle, ForecastSeries, StructuredForecast};
pub use record::{month_label, percent_change, MergedRecord, RegionValues, SeriesKind};
pub use region::{RegionId, RegionInfo, UnknownRegion, REGIONS};
pub use scenario::{affected_set, CategoryCounts, Scenario, ScenarioCatalog};
pub use simulation::{PriceTable, RegionMetrics, SimulationRequest, SimulationResult};
