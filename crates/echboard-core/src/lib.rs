//! echboard-core - Core library for echboard
//!
//! Aligns simulation results with their forecasts, derives summaries and
//! table projections, and talks to the scenario simulation backend.

pub mod align;
pub mod analytics;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod forecast;
pub mod memo;
pub mod results;
pub mod selection;
pub mod table;
pub mod tooltip;
pub mod validate;
pub mod view;

pub use align::{align, MergedSeries};
pub use analytics::AnalyticsData;
pub use client::ApiClient;
pub use config::DashboardConfig;
pub use error::{CoreError, DegradedState, LoadError, LoadReport};
pub use export::{
    export_comparison_table, export_csv, export_data_table, export_forecast_table, write_csv,
};
pub use results::{load_result, save_result};
pub use selection::{RegionSelection, SelectionEvent, SelectionMode};
pub use table::{SortDirection, SortKey, SortSpec, TableRow};
pub use validate::validate_result;
pub use view::{DashboardView, SimulationState, TableView};
