//! CSV export for the data, forecast and comparison tables
//!
//! Fields are comma-joined without quoting: every cell is a month label, a
//! region label or a number, none of which contain commas.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use echboard_types::{MergedRecord, RegionComparison, RegionId};

use crate::table::{data_columns, forecast_columns, Column, ComparisonField, TableRow};

/// Source of one CSV column
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CsvSource<F> {
    /// The row's leading label (month or region)
    Label,
    Value(F),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CsvColumn<F> {
    pub header: String,
    pub source: CsvSource<F>,
}

impl<F> CsvColumn<F> {
    pub fn label(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            source: CsvSource::Label,
        }
    }

    pub fn value(header: impl Into<String>, field: F) -> Self {
        Self {
            header: header.into(),
            source: CsvSource::Value(field),
        }
    }
}

/// Serialize `rows` as CSV: header line, then one line per row.
///
/// Numbers are fixed to 4 decimals; absent values become empty fields.
pub fn export_csv<T: TableRow>(rows: &[T], columns: &[CsvColumn<T::Field>]) -> String {
    let mut csv = String::new();

    let headers: Vec<&str> = columns.iter().map(|c| c.header.as_str()).collect();
    csv.push_str(&headers.join(","));
    csv.push('\n');

    for row in rows {
        let fields: Vec<String> = columns
            .iter()
            .map(|c| match c.source {
                CsvSource::Label => row.label(),
                CsvSource::Value(field) => row
                    .cell(field)
                    .map(|v| format!("{:.4}", v))
                    .unwrap_or_default(),
            })
            .collect();
        csv.push_str(&fields.join(","));
        csv.push('\n');
    }

    csv
}

/// `Date, <Region> Baseline, <Region> Simulated, <Region> Change%` per region
pub fn data_table_spec(regions: &[RegionId]) -> Vec<CsvColumn<Column>> {
    with_date_column(data_columns(regions))
}

/// `Date, <Region> Forecast[, <Region> Lower 95%, <Region> Upper 95%]` per region
pub fn forecast_table_spec(regions: &[RegionId], with_intervals: bool) -> Vec<CsvColumn<Column>> {
    with_date_column(forecast_columns(regions, with_intervals))
}

fn with_date_column(columns: Vec<Column>) -> Vec<CsvColumn<Column>> {
    std::iter::once(CsvColumn::label("Date"))
        .chain(columns.into_iter().map(|c| CsvColumn::value(c.header(), c)))
        .collect()
}

/// `Region, Baseline Avg, Simulated Avg, ...`
pub fn comparison_table_spec() -> Vec<CsvColumn<ComparisonField>> {
    std::iter::once(CsvColumn::label("Region"))
        .chain(
            ComparisonField::ALL
                .into_iter()
                .map(|f| CsvColumn::value(f.header(), f)),
        )
        .collect()
}

/// Data table CSV over the historical records
pub fn export_data_table(records: &[MergedRecord], regions: &[RegionId]) -> String {
    let historical: Vec<MergedRecord> = records.iter().filter(|r| !r.is_forecast).cloned().collect();
    export_csv(&historical, &data_table_spec(regions))
}

/// Forecast table CSV over the forecast records
pub fn export_forecast_table(
    records: &[MergedRecord],
    regions: &[RegionId],
    with_intervals: bool,
) -> String {
    let forecast: Vec<MergedRecord> = records.iter().filter(|r| r.is_forecast).cloned().collect();
    export_csv(&forecast, &forecast_table_spec(regions, with_intervals))
}

pub fn export_comparison_table(rows: &[RegionComparison]) -> String {
    export_csv(rows, &comparison_table_spec())
}

/// Default export filename, e.g. `data-table-20260203-101500.csv`
pub fn default_filename(kind: &str, now: DateTime<Utc>) -> String {
    format!("{}-{}.csv", kind, now.format("%Y%m%d-%H%M%S"))
}

/// Write CSV text to `path`, creating parent directories as needed
///
/// # Errors
/// Returns error if directory creation, file creation or writing fails
pub fn write_csv(csv: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

    let mut writer = BufWriter::new(file);
    writer
        .write_all(csv.as_bytes())
        .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
    writer.flush().context("Failed to flush CSV writer")?;

    tracing::debug!("Wrote {} bytes of CSV to {}", csv.len(), path.display());

    Ok(())
}
