//! Session view-model
//!
//! Holds the user's choices (scenario, parameter overrides, region filter,
//! forecast toggle) and the latest settled simulation result, and derives
//! everything the chart, tables and comparison render from. Derivations are
//! memoized on an input revision that changes whenever the result does.

use std::collections::BTreeMap;
use std::sync::Arc;

use echboard_types::{
    MergedRecord, RegionComparison, RegionId, Scenario, ScenarioCatalog, SimulationResult,
};

use crate::align::MergedSeries;
use crate::analytics::AnalyticsData;
use crate::config::DashboardConfig;
use crate::error::{CoreError, DegradedState, LoadReport};
use crate::export;
use crate::selection::{RegionSelection, SelectionEvent};
use crate::table::{
    clamp_page, data_columns, forecast_columns, project, total_pages, Column, ComparisonField,
    SortSpec, TableRow,
};
use crate::tooltip::{self, RegionTooltip};
use crate::validate::{degraded_state, validate_result};

/// Lifecycle of the remote simulation call
#[derive(Debug, Clone, Default)]
pub enum SimulationState {
    #[default]
    Idle,
    Loading,
    Ready(Arc<SimulationResult>),
    Failed(String),
}

impl SimulationState {
    pub fn result(&self) -> Option<&Arc<SimulationResult>> {
        match self {
            SimulationState::Ready(result) => Some(result),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SimulationState::Loading)
    }
}

/// One rendered page of a table
#[derive(Debug, Clone)]
pub struct TableView<T, F> {
    pub columns: Vec<F>,
    pub rows: Vec<T>,
    /// Clamped 1-based page
    pub page: usize,
    pub total_pages: usize,
    pub total_rows: usize,
}

type AnalyticsKey = (u64, bool, Vec<RegionId>);

#[derive(Debug, Default)]
pub struct DashboardView {
    config: DashboardConfig,
    catalog: ScenarioCatalog,
    selected_scenario: Option<u32>,
    overrides: BTreeMap<String, f64>,
    state: SimulationState,
    selection: RegionSelection,
    /// Bumped on every change to `state`
    revision: u64,
    merged: crate::memo::Memo<(u64, bool), MergedSeries>,
    analytics: crate::memo::Memo<AnalyticsKey, AnalyticsData>,
}

impl DashboardView {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Scenario and parameters
    // ------------------------------------------------------------------

    pub fn set_catalog(&mut self, catalog: ScenarioCatalog) {
        self.catalog = catalog;
    }

    pub fn catalog(&self) -> &ScenarioCatalog {
        &self.catalog
    }

    pub fn selected_scenario(&self) -> Option<&Scenario> {
        self.catalog.get(self.selected_scenario?)
    }

    pub fn selected_scenario_id(&self) -> Option<u32> {
        self.selected_scenario
    }

    /// Switch scenario. A different scenario resets the region filter, the
    /// overrides and the previous result. Returns false if `id` is already selected.
    pub fn select_scenario(&mut self, id: u32) -> bool {
        if self.selected_scenario == Some(id) {
            return false;
        }
        self.selected_scenario = Some(id);
        self.selection = self.selection.apply(SelectionEvent::NewScenarioSelected);
        self.overrides.clear();
        self.set_state(SimulationState::Idle);
        true
    }

    /// Override a scenario parameter. Unknown names are rejected when the
    /// scenario definition is available.
    pub fn set_override(&mut self, name: &str, value: f64) -> bool {
        if let Some(scenario) = self.selected_scenario() {
            if !scenario.parameters.contains_key(name) {
                tracing::debug!("Scenario {} has no parameter '{}'", scenario.id, name);
                return false;
            }
        }
        self.overrides.insert(name.to_string(), value);
        true
    }

    pub fn overrides(&self) -> &BTreeMap<String, f64> {
        &self.overrides
    }

    /// Effective parameters: scenario defaults with overrides applied
    pub fn effective_parameters(&self) -> BTreeMap<String, f64> {
        let mut params = self
            .selected_scenario()
            .map(|s| s.parameters.clone())
            .unwrap_or_default();
        params.extend(self.overrides.iter().map(|(k, v)| (k.clone(), *v)));
        params
    }

    // ------------------------------------------------------------------
    // Simulation lifecycle
    // ------------------------------------------------------------------

    fn set_state(&mut self, state: SimulationState) {
        if state.result().is_none() {
            // Nothing to derive until the next result; release the old one
            self.merged.invalidate();
            self.analytics.invalidate();
        }
        self.state = state;
        self.revision += 1;
    }

    /// Healthy, or which parts of the current result are missing
    pub fn degraded_state(&self) -> Option<DegradedState> {
        self.report().map(|report| degraded_state(&report))
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn begin_simulation(&mut self) {
        self.set_state(SimulationState::Loading);
    }

    /// Settle the in-flight simulation; the latest call wins
    pub fn finish_simulation(&mut self, outcome: Result<SimulationResult, CoreError>) {
        match outcome {
            Ok(result) => self.set_result(result),
            Err(e) => {
                tracing::warn!("Simulation failed: {}", e);
                self.set_state(SimulationState::Failed(e.to_string()));
            }
        }
    }

    /// Store a settled result. A result for another scenario switches to it
    /// first, with the same resets as `select_scenario`.
    pub fn set_result(&mut self, result: SimulationResult) {
        if result.scenario_id != 0 {
            self.select_scenario(result.scenario_id);
        }
        self.set_state(SimulationState::Ready(Arc::new(result)));
    }

    pub fn result(&self) -> Option<&Arc<SimulationResult>> {
        self.state.result()
    }

    pub fn set_forecast_enabled(&mut self, enabled: bool) {
        self.config.forecast_enabled = enabled;
    }

    // ------------------------------------------------------------------
    // Region filter
    // ------------------------------------------------------------------

    pub fn handle(&mut self, event: SelectionEvent) {
        self.selection = self.selection.apply(event);
    }

    pub fn selection(&self) -> &RegionSelection {
        &self.selection
    }

    pub fn visible_regions(&self) -> Vec<RegionId> {
        self.selection.visible_ordered()
    }

    // ------------------------------------------------------------------
    // Derived data
    // ------------------------------------------------------------------

    /// Merged series for the current result (empty while idle/loading/failed)
    pub fn merged(&self) -> Arc<MergedSeries> {
        let key = (self.revision, self.config.forecast_enabled);
        self.merged.get_or_compute(&key, || match self.state.result() {
            Some(result) => MergedSeries::build(result, self.config.forecast_enabled),
            None => MergedSeries::empty(),
        })
    }

    /// Summaries, forecast summaries and comparison rows for the visible regions
    pub fn analytics(&self) -> Option<Arc<AnalyticsData>> {
        let result = self.state.result()?;
        let regions = self.visible_regions();
        let key = (self.revision, self.config.forecast_enabled, regions.clone());
        let merged = self.merged();
        Some(
            self.analytics
                .get_or_compute(&key, || AnalyticsData::compute(result, &merged, &regions)),
        )
    }

    pub fn comparison(&self) -> Vec<RegionComparison> {
        self.analytics()
            .map(|a| a.comparison.clone())
            .unwrap_or_default()
    }

    pub fn report(&self) -> Option<LoadReport> {
        let result = self.state.result()?;
        Some(validate_result(result, &self.merged()))
    }

    fn paged<T: TableRow + Clone>(
        &self,
        rows: &[T],
        columns: Vec<T::Field>,
        sort: SortSpec<T::Field>,
        page: usize,
    ) -> TableView<T, T::Field> {
        let page_size = self.config.page_size;
        let page = clamp_page(page, total_pages(rows.len(), page_size));
        let projected = project(rows, sort, page, page_size);

        TableView {
            columns,
            rows: projected.rows.into_iter().cloned().collect(),
            page,
            total_pages: projected.total_pages,
            total_rows: projected.total_rows,
        }
    }

    /// Historical data table page (baseline, simulated, change%)
    pub fn data_table(&self, sort: SortSpec<Column>, page: usize) -> TableView<MergedRecord, Column> {
        let merged = self.merged();
        let rows = merged.historical_records();
        self.paged(&rows, data_columns(&self.visible_regions()), sort, page)
    }

    /// Forecast table page; bound columns only when intervals exist
    pub fn forecast_table(
        &self,
        sort: SortSpec<Column>,
        page: usize,
    ) -> TableView<MergedRecord, Column> {
        let merged = self.merged();
        let rows = merged.forecast_records();
        let columns = forecast_columns(&self.visible_regions(), merged.has_confidence_intervals);
        self.paged(&rows, columns, sort, page)
    }

    /// Regional comparison, all visible regions on one page
    pub fn comparison_table(
        &self,
        sort: SortSpec<ComparisonField>,
    ) -> TableView<RegionComparison, ComparisonField> {
        let rows = self.comparison();
        let page_size = rows.len().max(1);
        let projected = project(&rows, sort, 1, page_size);

        TableView {
            columns: ComparisonField::ALL.to_vec(),
            rows: projected.rows.into_iter().cloned().collect(),
            page: 1,
            total_pages: projected.total_pages,
            total_rows: projected.total_rows,
        }
    }

    /// Tooltip for the record at `ordinal`, grouped by visible region
    pub fn tooltip(&self, ordinal: usize) -> BTreeMap<RegionId, RegionTooltip> {
        let merged = self.merged();
        let Some(record) = merged.get(ordinal) else {
            return BTreeMap::new();
        };
        tooltip::aggregate(&tooltip::chart_entries(record), &self.selection.visible())
    }

    pub fn export_data_csv(&self) -> String {
        export::export_data_table(&self.merged().records, &self.visible_regions())
    }

    pub fn export_forecast_csv(&self) -> String {
        let merged = self.merged();
        export::export_forecast_table(
            &merged.records,
            &self.visible_regions(),
            merged.has_confidence_intervals,
        )
    }

    pub fn export_comparison_csv(&self) -> String {
        export::export_comparison_table(&self.comparison())
    }
}
