//! CLI helpers: argument parsing and table rendering
//!
//! Keeps `main.rs` to command dispatch; everything here is synchronous and
//! testable without a running simulation API.

use std::collections::BTreeMap;

use comfy_table::{Cell, Color, ContentArrangement, Row, Table};
use echboard_core::align::MergedSeries;
use echboard_core::forecast;
use echboard_core::table::{Column, ColumnKind, ComparisonField, SortDirection, SortKey};
use echboard_core::{DashboardView, DegradedState, LoadReport, TableRow, TableView};
use echboard_types::{
    BaselineData, CategoryCounts, RegionComparison, RegionId, Scenario, ScenarioCatalog,
    ScenarioComparison, SensitivityAnalysis, SimulationResult,
};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug)]
pub enum CliError {
    InvalidParam {
        input: String,
    },
    UnknownParam {
        name: String,
        scenario_id: u32,
        known: String,
    },
    InvalidSort {
        input: String,
        expected: &'static str,
    },
    UnknownRegion(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::InvalidParam { input } => {
                write!(f, "Invalid parameter '{}' (expected NAME=VALUE)", input)
            }
            CliError::UnknownParam {
                name,
                scenario_id,
                known,
            } => {
                write!(
                    f,
                    "Scenario {} has no parameter '{}'\nKnown parameters: {}",
                    scenario_id, name, known
                )
            }
            CliError::InvalidSort { input, expected } => {
                write!(f, "Invalid sort key '{}' (expected: {})", input, expected)
            }
            CliError::UnknownRegion(input) => {
                write!(
                    f,
                    "Unknown region '{}' (expected: us_ech, eu_ech, asia_ech, china_ech)",
                    input
                )
            }
        }
    }
}

impl std::error::Error for CliError {}

// ============================================================================
// Argument Parsing
// ============================================================================

/// Parse `NAME=VALUE` parameter overrides
pub fn parse_params(inputs: &[String]) -> Result<BTreeMap<String, f64>, CliError> {
    let mut params = BTreeMap::new();
    for input in inputs {
        let (name, value) = input
            .split_once('=')
            .ok_or_else(|| CliError::InvalidParam {
                input: input.clone(),
            })?;
        let name = name.trim();
        let value: f64 = value.trim().parse().map_err(|_| CliError::InvalidParam {
            input: input.clone(),
        })?;
        if name.is_empty() {
            return Err(CliError::InvalidParam {
                input: input.clone(),
            });
        }
        params.insert(name.to_string(), value);
    }
    Ok(params)
}

/// Parse region filters; wire names (`eu_ech`) and short tags (`eu`) both work
pub fn parse_regions(inputs: &[String]) -> Result<Vec<RegionId>, CliError> {
    let mut regions = Vec::new();
    for input in inputs {
        let region = input
            .parse::<RegionId>()
            .ok()
            .or_else(|| RegionId::from_short_tag(input))
            .ok_or_else(|| CliError::UnknownRegion(input.clone()))?;
        if !regions.contains(&region) {
            regions.push(region);
        }
    }
    Ok(regions)
}

const COLUMN_SORT_KEYS: &str =
    "date, or REGION:KIND with KIND in baseline|simulated|change|forecast|lower|upper";

/// Parse a data/forecast table sort key: `date` or `us_ech:change`
pub fn parse_column_sort(input: &str) -> Result<SortKey<Column>, CliError> {
    let invalid = || CliError::InvalidSort {
        input: input.to_string(),
        expected: COLUMN_SORT_KEYS,
    };

    if input == "date" {
        return Ok(SortKey::Date);
    }

    let (region, kind) = input.split_once(':').ok_or_else(invalid)?;
    let region = parse_regions(&[region.to_string()])?[0];
    let kind = match kind {
        "baseline" => ColumnKind::Baseline,
        "simulated" => ColumnKind::Simulated,
        "change" => ColumnKind::ChangePercent,
        "forecast" => ColumnKind::Forecast,
        "lower" => ColumnKind::Lower95,
        "upper" => ColumnKind::Upper95,
        _ => return Err(invalid()),
    };
    Ok(SortKey::Field(Column::new(region, kind)))
}

const COMPARISON_SORT_KEYS: &str =
    "region, baseline, simulated, change, min, max, forecast, trend, effect";

/// Parse a comparison table sort key
pub fn parse_comparison_sort(input: &str) -> Result<SortKey<ComparisonField>, CliError> {
    let field = match input {
        "region" => return Ok(SortKey::Date),
        "baseline" => ComparisonField::BaselineAvg,
        "simulated" => ComparisonField::SimulatedAvg,
        "change" => ComparisonField::ChangePercent,
        "min" => ComparisonField::MinPrice,
        "max" => ComparisonField::MaxPrice,
        "forecast" => ComparisonField::ForecastAvg,
        "trend" => ComparisonField::TrendPercent,
        "effect" => ComparisonField::PriceEffect,
        _ => {
            return Err(CliError::InvalidSort {
                input: input.to_string(),
                expected: COMPARISON_SORT_KEYS,
            })
        }
    };
    Ok(SortKey::Field(field))
}

pub fn direction(desc: bool) -> SortDirection {
    if desc {
        SortDirection::Desc
    } else {
        SortDirection::Asc
    }
}

/// Narrow the view to `regions` (no-op when empty)
pub fn apply_region_filter(view: &mut DashboardView, regions: &[RegionId]) {
    for &region in regions {
        view.handle(echboard_core::SelectionEvent::ClickRegion(region));
    }
}

// ============================================================================
// Formatters
// ============================================================================

fn header_row(table: &mut Table, headers: Vec<String>, no_color: bool) {
    if no_color {
        table.set_header(headers);
    } else {
        table.set_header(
            headers
                .into_iter()
                .map(|h| Cell::new(h).fg(Color::Cyan))
                .collect::<Vec<_>>(),
        );
    }
}

/// Chart color of `region` as a terminal color
pub fn region_color(region: RegionId) -> Color {
    let hex = region.color().trim_start_matches('#');
    let channel = |i: usize| hex.get(i..i + 2).and_then(|c| u8::from_str_radix(c, 16).ok());
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb { r, g, b },
        _ => Color::White,
    }
}

fn region_cell(text: String, region: RegionId, no_color: bool) -> Cell {
    if no_color {
        Cell::new(text)
    } else {
        Cell::new(text).fg(region_color(region))
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn format_cell(value: Option<f64>, percent: bool) -> String {
    match value {
        Some(v) if percent => format!("{:+.2}%", v),
        Some(v) => format!("{:.4}", v),
        None => "-".to_string(),
    }
}

/// Format the scenario catalog as table (human) or JSON
pub fn format_scenarios(catalog: &ScenarioCatalog, json: bool, no_color: bool) -> String {
    if json {
        return serde_json::to_string_pretty(catalog).unwrap_or_else(|_| "{}".to_string());
    }

    if catalog.scenarios.is_empty() {
        return "No scenarios found.".to_string();
    }

    let mut table = new_table();
    header_row(
        &mut table,
        ["ID", "Name", "Category", "Regions", "Parameters"]
            .map(String::from)
            .to_vec(),
        no_color,
    );

    for scenario in &catalog.scenarios {
        let regions = scenario
            .affected()
            .iter()
            .map(|r| r.label())
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(Row::from(vec![
            scenario.id.to_string(),
            scenario.name.clone(),
            scenario.category.clone(),
            regions,
            scenario.parameters.len().to_string(),
        ]));
    }

    table.to_string()
}

pub fn format_categories(categories: &CategoryCounts, json: bool, no_color: bool) -> String {
    if json {
        return serde_json::to_string_pretty(categories).unwrap_or_else(|_| "{}".to_string());
    }

    let mut table = new_table();
    header_row(&mut table, vec!["Category".into(), "Scenarios".into()], no_color);
    for category in &categories.categories {
        let count = categories.counts.get(category).copied().unwrap_or(0);
        table.add_row(Row::from(vec![category.clone(), count.to_string()]));
    }
    table.to_string()
}

/// Format a single scenario definition (human or JSON)
pub fn format_scenario_info(scenario: &Scenario, json: bool) -> String {
    if json {
        return serde_json::to_string_pretty(scenario).unwrap_or_else(|_| "{}".to_string());
    }

    let mut lines = vec![];
    lines.push(format!("Scenario:     {} (#{})", scenario.name, scenario.id));
    lines.push(format!("Category:     {}", scenario.category));
    lines.push(format!(
        "Regions:      {}",
        scenario
            .affected()
            .iter()
            .map(|r| r.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    ));
    if let Some(logic) = &scenario.logic {
        lines.push(format!("Model:        {}", logic));
    }
    lines.push(format!("Description:  {}", scenario.description));
    if !scenario.parameters.is_empty() {
        lines.push("Parameters:".to_string());
        for (name, value) in &scenario.parameters {
            lines.push(format!("  {:<24} {}", name, value));
        }
    }
    lines.join("\n")
}

/// One-paragraph header above a rendered result
pub fn format_result_header(result: &SimulationResult, series: &MergedSeries) -> String {
    let mut lines = vec![];
    let name = if result.scenario_name.is_empty() {
        format!("Scenario #{}", result.scenario_id)
    } else {
        result.scenario_name.clone()
    };
    lines.push(name);

    if let (Some(first), Some(last)) = (series.historical().next(), &series.last_historical_date) {
        lines.push(format!("History:   {} .. {}", first.date, last));
    }
    match &result.forecast {
        Some(bundle) if series.forecast().next().is_some() => {
            let intervals = if series.has_confidence_intervals {
                series.confidence_label.as_deref().unwrap_or("95%")
            } else {
                "none"
            };
            lines.push(format!(
                "Forecast:  {} months, {} (intervals: {})",
                series.forecast().count(),
                forecast::model_label(bundle),
                intervals
            ));
        }
        _ => lines.push("Forecast:  -".to_string()),
    }
    lines.join("\n")
}

/// Render a data or forecast table page
pub fn format_record_table<T: TableRow<Field = Column>>(
    view: &TableView<T, Column>,
    no_color: bool,
) -> String {
    if view.rows.is_empty() {
        return "No data available.".to_string();
    }

    let mut table = new_table();
    let date_header = if no_color {
        Cell::new("Date")
    } else {
        Cell::new("Date").fg(Color::Cyan)
    };
    let headers = std::iter::once(date_header)
        .chain(
            view.columns
                .iter()
                .map(|c| region_cell(c.header(), c.region, no_color)),
        )
        .collect::<Vec<_>>();
    table.set_header(headers);

    for row in &view.rows {
        let cells = std::iter::once(row.label()).chain(view.columns.iter().map(|&c| {
            format_cell(row.cell(c), c.kind == ColumnKind::ChangePercent)
        }));
        table.add_row(Row::from(cells.collect::<Vec<_>>()));
    }

    format!(
        "{}\nPage {} of {} ({} rows)",
        table, view.page, view.total_pages, view.total_rows
    )
}

/// Render the regional comparison
pub fn format_comparison_table(
    view: &TableView<RegionComparison, ComparisonField>,
    no_color: bool,
) -> String {
    if view.rows.is_empty() {
        return "No data available.".to_string();
    }

    let mut table = new_table();
    let headers = std::iter::once("Region".to_string())
        .chain(view.columns.iter().map(|f| f.header().to_string()))
        .collect();
    header_row(&mut table, headers, no_color);

    for row in &view.rows {
        let label = region_cell(row.label(), row.region, no_color);
        let cells = std::iter::once(label).chain(view.columns.iter().map(|&f| {
            let percent = matches!(
                f,
                ComparisonField::ChangePercent
                    | ComparisonField::TrendPercent
                    | ComparisonField::PriceEffect
            );
            Cell::new(format_cell(row.cell(f), percent))
        }));
        table.add_row(Row::from(cells.collect::<Vec<_>>()));
    }

    table.to_string()
}

// ============================================================================
// Multi-scenario Views
// ============================================================================

/// Regions to show: the filter, or all four when it is empty
fn shown_regions(regions: &[RegionId]) -> Vec<RegionId> {
    if regions.is_empty() {
        RegionId::ALL.to_vec()
    } else {
        regions.to_vec()
    }
}

/// Leading plain headers followed by one `<Region> Change%` header per region
fn change_headers(leading: &[&str], regions: &[RegionId], no_color: bool) -> Vec<Cell> {
    leading
        .iter()
        .map(|h| {
            if no_color {
                Cell::new(h)
            } else {
                Cell::new(h).fg(Color::Cyan)
            }
        })
        .chain(
            regions
                .iter()
                .map(|&r| region_cell(format!("{} Change%", r.label()), r, no_color)),
        )
        .collect()
}

/// Change of `region` in a settled result: the metric when present, else the price effect
fn result_change(result: &SimulationResult, region: RegionId) -> Option<f64> {
    result
        .metrics
        .as_ref()
        .and_then(|m| m.get(&region))
        .map(|m| m.change_percent)
        .or_else(|| result.price_effects.get(&region).copied())
}

/// Side-by-side price change of several scenarios
pub fn format_scenario_comparison(
    comparison: &ScenarioComparison,
    regions: &[RegionId],
    json: bool,
    no_color: bool,
) -> String {
    if json {
        return serde_json::to_string_pretty(comparison).unwrap_or_else(|_| "{}".to_string());
    }
    if comparison.is_empty() {
        return "No scenarios compared.".to_string();
    }

    let regions = shown_regions(regions);
    let mut table = new_table();
    table.set_header(change_headers(&["ID", "Scenario"], &regions, no_color));

    for result in &comparison.results {
        let cells = [result.scenario_id.to_string(), result.scenario_name.clone()]
            .into_iter()
            .chain(regions.iter().map(|&r| format_cell(result_change(result, r), true)));
        table.add_row(Row::from(cells.collect::<Vec<_>>()));
    }

    table.to_string()
}

/// Price change per tested parameter value
pub fn format_sensitivity(
    analysis: &SensitivityAnalysis,
    regions: &[RegionId],
    json: bool,
    no_color: bool,
) -> String {
    if json {
        return serde_json::to_string_pretty(analysis).unwrap_or_else(|_| "{}".to_string());
    }
    if analysis.results.is_empty() {
        return "No sensitivity results.".to_string();
    }

    let regions = shown_regions(regions);
    let value_header = if analysis.parameter.is_empty() {
        "Value"
    } else {
        analysis.parameter.as_str()
    };
    let mut table = new_table();
    table.set_header(change_headers(&[value_header], &regions, no_color));

    for point in &analysis.results {
        let cells = std::iter::once(point.value.to_string())
            .chain(regions.iter().map(|&r| format_cell(point.change_percent(r), true)));
        table.add_row(Row::from(cells.collect::<Vec<_>>()));
    }

    format!(
        "Sensitivity of scenario {} to {}\n{}",
        analysis.scenario_id, value_header, table
    )
}

/// `(min, avg, max, last)` over the finite values of a series
fn series_stats(values: &[f64]) -> Option<(f64, f64, f64, f64)> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let last = *finite.last()?;
    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let avg = finite.iter().sum::<f64>() / finite.len() as f64;
    Some((min, avg, max, last))
}

fn stats_cells(values: &[f64]) -> Vec<Cell> {
    let stats = series_stats(values);
    let mut cells = vec![Cell::new(values.len())];
    cells.extend(
        [
            stats.map(|s| s.0),
            stats.map(|s| s.1),
            stats.map(|s| s.2),
            stats.map(|s| s.3),
        ]
        .map(|v| Cell::new(format_cell(v, false))),
    );
    cells
}

/// Summary of the historical dataset: ECH regions first, then feedstocks
pub fn format_baseline(baseline: &BaselineData, json: bool, no_color: bool) -> String {
    if json {
        return serde_json::to_string_pretty(baseline).unwrap_or_else(|_| "{}".to_string());
    }
    if baseline.prices.is_empty() {
        return "No baseline data.".to_string();
    }

    let mut lines = vec![];
    match (baseline.dates.first(), baseline.dates.last()) {
        (Some(first), Some(last)) => lines.push(format!(
            "Dates:  {} .. {} ({} points)",
            first,
            last,
            baseline.dates.len()
        )),
        _ => lines.push("Dates:  -".to_string()),
    }
    if let Some(unit) = baseline.metadata.as_ref().and_then(|m| m.unit.as_deref()) {
        lines.push(format!("Unit:   {}", unit));
    }

    let mut table = new_table();
    header_row(
        &mut table,
        ["Series", "Points", "Min", "Avg", "Max", "Last"]
            .map(String::from)
            .to_vec(),
        no_color,
    );
    for (region, values) in baseline.region_prices() {
        let mut cells = vec![region_cell(region.label().to_string(), region, no_color)];
        cells.extend(stats_cells(&values));
        table.add_row(Row::from(cells));
    }
    for (name, values) in baseline.feedstocks() {
        let mut cells = vec![Cell::new(name)];
        cells.extend(stats_cells(values));
        table.add_row(Row::from(cells));
    }

    lines.push(table.to_string());
    lines.join("\n")
}

/// One-line summary of what the current result is missing
pub fn format_degraded(state: &DegradedState) -> Option<String> {
    match state {
        DegradedState::Healthy => None,
        DegradedState::PartialData { missing, .. } => {
            let mut parts: Vec<&str> = Vec::new();
            for source in missing {
                if !parts.contains(&source.as_str()) {
                    parts.push(source);
                }
            }
            Some(format!("Partial data: {}", parts.join(", ")))
        }
    }
}

/// Warnings from payload validation, one per line
pub fn format_report(report: &LoadReport) -> Option<String> {
    if !report.has_errors() {
        return None;
    }
    let lines: Vec<String> = report
        .errors
        .iter()
        .map(|e| format!("  - {}: {}", e.source, e.message))
        .collect();
    Some(format!("Warnings:\n{}", lines.join("\n")))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use echboard_core::table::SortSpec;
    use echboard_core::DashboardConfig;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_params() {
        let params = parse_params(&strings(&["duration_months=24", "capacity_loss = 0.3"])).unwrap();
        assert_eq!(params["duration_months"], 24.0);
        assert_eq!(params["capacity_loss"], 0.3);
    }

    #[test]
    fn test_parse_params_invalid() {
        assert!(matches!(
            parse_params(&strings(&["duration_months"])),
            Err(CliError::InvalidParam { .. })
        ));
        assert!(parse_params(&strings(&["x=abc"])).is_err());
        assert!(parse_params(&strings(&["=1"])).is_err());
    }

    #[test]
    fn test_parse_regions_accepts_both_forms() {
        let regions = parse_regions(&strings(&["eu_ech", "asia", "eu"])).unwrap();
        assert_eq!(regions, vec![RegionId::Eu, RegionId::Asia]);
        assert!(matches!(
            parse_regions(&strings(&["mars"])),
            Err(CliError::UnknownRegion(_))
        ));
    }

    #[test]
    fn test_parse_column_sort() {
        assert_eq!(parse_column_sort("date").unwrap(), SortKey::Date);
        assert_eq!(
            parse_column_sort("us:change").unwrap(),
            SortKey::Field(Column::new(RegionId::Us, ColumnKind::ChangePercent))
        );
        assert!(parse_column_sort("us").is_err());
        assert!(parse_column_sort("us:volume").is_err());
    }

    #[test]
    fn test_parse_comparison_sort() {
        assert_eq!(parse_comparison_sort("region").unwrap(), SortKey::Date);
        assert_eq!(
            parse_comparison_sort("trend").unwrap(),
            SortKey::Field(ComparisonField::TrendPercent)
        );
        assert!(parse_comparison_sort("volume").is_err());
    }

    #[test]
    fn test_format_cell() {
        assert_eq!(format_cell(Some(1.23456), false), "1.2346");
        assert_eq!(format_cell(Some(9.0909), true), "+9.09%");
        assert_eq!(format_cell(None, false), "-");
    }

    fn sample_result() -> SimulationResult {
        serde_json::from_str(
            r#"{
                "scenario_id": 2,
                "scenario_name": "US tariff",
                "dates": ["2023-01-01", "2023-02-01"],
                "baseline_prices": {"us_ech": [10, 12], "eu_ech": [5, 5]},
                "simulated_prices": {"us_ech": [11, 13]},
                "forecast": {"dates": ["2023-03-01"], "model": "prophet", "us_ech": [14]}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_format_record_table() {
        let mut view = DashboardView::new(DashboardConfig::default());
        view.set_result(sample_result());
        apply_region_filter(&mut view, &[RegionId::Us]);

        let output = format_record_table(&view.data_table(SortSpec::chronological(), 1), true);
        assert!(output.contains("US Change%"));
        assert!(output.contains("2023-02"));
        assert!(output.contains("+10.00%"));
        assert!(output.contains("Page 1 of 1"));
        assert!(!output.contains("EU"));
    }

    #[test]
    fn test_format_comparison_table_untouched_region() {
        let mut view = DashboardView::new(DashboardConfig::default());
        view.set_result(sample_result());

        let output = format_comparison_table(&view.comparison_table(SortSpec::chronological()), true);
        assert!(output.contains("EU"));
        assert!(output.contains("+0.00%"));
    }

    #[test]
    fn test_format_result_header() {
        let result = sample_result();
        let series = MergedSeries::build(&result, true);
        let header = format_result_header(&result, &series);
        assert!(header.starts_with("US tariff"));
        assert!(header.contains("2023-01 .. 2023-02"));
        assert!(header.contains("Prophet"));
        assert!(header.contains("intervals: none"));
    }

    #[test]
    fn test_format_scenarios_empty_and_json() {
        let catalog = ScenarioCatalog::default();
        assert!(format_scenarios(&catalog, false, false).contains("No scenarios"));

        let catalog = ScenarioCatalog {
            count: 1,
            scenarios: vec![Scenario {
                id: 4,
                name: "China export ban".into(),
                affected_regions: vec!["china".into()],
                ..Default::default()
            }],
        };
        let output = format_scenarios(&catalog, true, false);
        assert!(output.starts_with('{'));
        assert!(output.contains("China export ban"));
        assert!(format_scenarios(&catalog, false, true).contains("China"));
    }

    #[test]
    fn test_region_color_from_hex() {
        assert_eq!(
            region_color(RegionId::Us),
            Color::Rgb {
                r: 0x3b,
                g: 0x82,
                b: 0xf6
            }
        );
    }

    #[test]
    fn test_format_degraded() {
        assert!(format_degraded(&DegradedState::Healthy).is_none());
        let state = DegradedState::PartialData {
            missing: vec!["forecast".into(), "metrics".into(), "forecast".into()],
            reason: "no forecast; no metrics".into(),
        };
        assert_eq!(
            format_degraded(&state).as_deref(),
            Some("Partial data: forecast, metrics")
        );
    }

    #[test]
    fn test_format_scenario_comparison_falls_back_to_price_effect() {
        let with_metrics = sample_result();
        let effects_only = SimulationResult {
            scenario_id: 7,
            scenario_name: "EU regulatory".into(),
            price_effects: [(RegionId::Us, 2.5)].into_iter().collect(),
            ..Default::default()
        };
        let comparison = ScenarioComparison {
            results: vec![with_metrics, effects_only],
        };

        let output = format_scenario_comparison(&comparison, &[RegionId::Us], false, true);
        assert!(output.contains("US Change%"));
        assert!(output.contains("EU regulatory"));
        assert!(output.contains("+2.50%"));
        assert!(!output.contains("China"));

        let empty = ScenarioComparison::default();
        assert_eq!(
            format_scenario_comparison(&empty, &[], false, true),
            "No scenarios compared."
        );
    }

    #[test]
    fn test_format_sensitivity_rows_per_value() {
        let analysis: SensitivityAnalysis = serde_json::from_str(
            r#"{"scenario_id": 5, "parameter": "capacity_loss", "results": [
                {"value": 0.1, "price_effects": {"eu_ech": 4.0}},
                {"value": 0.3, "price_effects": {"eu_ech": 12.0}}
            ]}"#,
        )
        .unwrap();

        let output = format_sensitivity(&analysis, &[RegionId::Eu], false, true);
        assert!(output.starts_with("Sensitivity of scenario 5 to capacity_loss"));
        assert!(output.contains("0.3"));
        assert!(output.contains("+12.00%"));
        assert!(format_sensitivity(&analysis, &[], true, true).contains("\"parameter\""));
    }

    #[test]
    fn test_format_baseline_lists_regions_then_feedstocks() {
        let baseline: BaselineData = serde_json::from_str(
            r#"{"metadata": {"unit": "USD/lb"},
                "dates": ["2020-01-31", "2020-02-29"],
                "prices": {"glycerin": [0.36, 0.34], "eu_ech": [0.9, 1.0]}}"#,
        )
        .unwrap();

        let output = format_baseline(&baseline, false, true);
        assert!(output.contains("2020-01-31 .. 2020-02-29 (2 points)"));
        assert!(output.contains("USD/lb"));
        assert!(output.contains("0.9500"));
        let eu = output.find("EU").unwrap();
        let glycerin = output.find("glycerin").unwrap();
        assert!(eu < glycerin);

        assert_eq!(
            format_baseline(&BaselineData::default(), false, true),
            "No baseline data."
        );
    }

    #[test]
    fn test_series_stats_ignores_non_finite() {
        assert_eq!(
            series_stats(&[1.0, f64::NAN, 3.0]),
            Some((1.0, 2.0, 3.0, 3.0))
        );
        assert_eq!(series_stats(&[f64::NAN]), None);
    }

    #[test]
    fn test_format_report_empty() {
        assert!(format_report(&LoadReport::new()).is_none());
    }
}
