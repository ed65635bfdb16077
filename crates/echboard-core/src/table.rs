//! Sort + paginate projection shared by the data, forecast and comparison tables

use std::cmp::Ordering;
use std::fmt;

use echboard_types::{MergedRecord, RegionComparison, RegionId};

/// Rows per page in every table view
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// A row that can be sorted, paginated and exported
pub trait TableRow {
    /// Numeric column selector
    type Field: Copy + PartialEq + fmt::Debug;

    /// Natural (chronological) position of the row
    fn ordinal(&self) -> usize;

    /// Text of the leading column (month, or region label)
    fn label(&self) -> String;

    /// Numeric value of `field`, `None` when absent
    fn cell(&self, field: Self::Field) -> Option<f64>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Sort column
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortKey<F> {
    /// Natural order (`ordinal`), not the label text
    Date,
    Field(F),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SortSpec<F> {
    pub key: SortKey<F>,
    pub direction: SortDirection,
}

impl<F: Copy + PartialEq> SortSpec<F> {
    pub fn new(key: SortKey<F>, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Chronological, oldest first
    pub fn chronological() -> Self {
        Self::new(SortKey::Date, SortDirection::Asc)
    }

    /// Header click: same column flips direction, a new column starts descending
    pub fn toggle(self, key: SortKey<F>) -> Self {
        if self.key == key {
            Self::new(key, self.direction.reversed())
        } else {
            Self::new(key, SortDirection::Desc)
        }
    }
}

impl<F: Copy + PartialEq> Default for SortSpec<F> {
    fn default() -> Self {
        Self::chronological()
    }
}

/// One page of a projected table
#[derive(Debug, Clone)]
pub struct TablePage<'a, T> {
    pub rows: Vec<&'a T>,
    /// 1-based page that was requested
    pub page: usize,
    pub total_pages: usize,
    pub total_rows: usize,
}

/// Stable sort of `rows` by `sort`. Absent numeric values sort as 0.
pub fn sort_rows<'a, T: TableRow>(rows: &'a [T], sort: SortSpec<T::Field>) -> Vec<&'a T> {
    let mut sorted: Vec<&T> = rows.iter().collect();
    match sort.key {
        SortKey::Date => {
            sorted.sort_by(|a, b| sort.direction.apply(a.ordinal().cmp(&b.ordinal())));
        }
        SortKey::Field(field) => {
            sorted.sort_by(|a, b| {
                let x = a.cell(field).unwrap_or(0.0);
                let y = b.cell(field).unwrap_or(0.0);
                sort.direction.apply(x.total_cmp(&y))
            });
        }
    }
    sorted
}

/// Page count for `len` rows (at least 1, so "page 1 of 1" shows for empty tables)
pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// Clamp a requested page into `[1, total_pages]`; callers do this before `project`
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Sort, then cut out 1-based `page`.
///
/// Out-of-range pages are not clamped here and produce an empty row list.
pub fn project<'a, T: TableRow>(
    rows: &'a [T],
    sort: SortSpec<T::Field>,
    page: usize,
    page_size: usize,
) -> TablePage<'a, T> {
    let page_size = page_size.max(1);
    let sorted = sort_rows(rows, sort);
    let start = page.saturating_sub(1).saturating_mul(page_size);

    TablePage {
        rows: sorted.into_iter().skip(start).take(page_size).collect(),
        page,
        total_pages: total_pages(rows.len(), page_size),
        total_rows: rows.len(),
    }
}

// ============================================================================
// Merged-record tables (data + forecast)
// ============================================================================

/// Per-region column of the data and forecast tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Baseline,
    Simulated,
    ChangePercent,
    Forecast,
    Lower95,
    Upper95,
}

impl ColumnKind {
    pub fn header_suffix(&self) -> &'static str {
        match self {
            ColumnKind::Baseline => "Baseline",
            ColumnKind::Simulated => "Simulated",
            ColumnKind::ChangePercent => "Change%",
            ColumnKind::Forecast => "Forecast",
            ColumnKind::Lower95 => "Lower 95%",
            ColumnKind::Upper95 => "Upper 95%",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub region: RegionId,
    pub kind: ColumnKind,
}

impl Column {
    pub fn new(region: RegionId, kind: ColumnKind) -> Self {
        Self { region, kind }
    }

    /// `<Region> <Kind>`, e.g. `EU Change%`
    pub fn header(&self) -> String {
        format!("{} {}", self.region.label(), self.kind.header_suffix())
    }
}

impl TableRow for MergedRecord {
    type Field = Column;

    fn ordinal(&self) -> usize {
        self.ordinal
    }

    fn label(&self) -> String {
        self.date.clone()
    }

    fn cell(&self, field: Column) -> Option<f64> {
        let values = self.region(field.region)?;
        match field.kind {
            ColumnKind::Baseline => values.baseline,
            ColumnKind::Simulated => values.simulated,
            ColumnKind::ChangePercent => values.change_percent(),
            ColumnKind::Forecast => values.forecast_point,
            ColumnKind::Lower95 => values.ci_lower,
            ColumnKind::Upper95 => values.ci_upper,
        }
    }
}

/// Data table columns: baseline, simulated, change% for each region
pub fn data_columns(regions: &[RegionId]) -> Vec<Column> {
    regions
        .iter()
        .flat_map(|&r| {
            [ColumnKind::Baseline, ColumnKind::Simulated, ColumnKind::ChangePercent]
                .map(|kind| Column::new(r, kind))
        })
        .collect()
}

/// Forecast table columns: point, plus bounds when intervals exist
pub fn forecast_columns(regions: &[RegionId], with_intervals: bool) -> Vec<Column> {
    regions
        .iter()
        .flat_map(|&r| {
            let mut cols = vec![Column::new(r, ColumnKind::Forecast)];
            if with_intervals {
                cols.push(Column::new(r, ColumnKind::Lower95));
                cols.push(Column::new(r, ColumnKind::Upper95));
            }
            cols
        })
        .collect()
}

// ============================================================================
// Comparison table
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonField {
    BaselineAvg,
    SimulatedAvg,
    ChangePercent,
    MinPrice,
    MaxPrice,
    ForecastAvg,
    TrendPercent,
    PriceEffect,
}

impl ComparisonField {
    pub const ALL: [ComparisonField; 8] = [
        ComparisonField::BaselineAvg,
        ComparisonField::SimulatedAvg,
        ComparisonField::ChangePercent,
        ComparisonField::MinPrice,
        ComparisonField::MaxPrice,
        ComparisonField::ForecastAvg,
        ComparisonField::TrendPercent,
        ComparisonField::PriceEffect,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            ComparisonField::BaselineAvg => "Baseline Avg",
            ComparisonField::SimulatedAvg => "Simulated Avg",
            ComparisonField::ChangePercent => "Change%",
            ComparisonField::MinPrice => "Min",
            ComparisonField::MaxPrice => "Max",
            ComparisonField::ForecastAvg => "Forecast Avg",
            ComparisonField::TrendPercent => "Trend%",
            ComparisonField::PriceEffect => "Effect%",
        }
    }
}

impl TableRow for RegionComparison {
    type Field = ComparisonField;

    fn ordinal(&self) -> usize {
        self.region.index()
    }

    fn label(&self) -> String {
        self.region.label().to_string()
    }

    fn cell(&self, field: ComparisonField) -> Option<f64> {
        match field {
            ComparisonField::BaselineAvg => Some(self.summary.baseline_avg),
            ComparisonField::SimulatedAvg => Some(self.summary.simulated_avg),
            ComparisonField::ChangePercent => Some(self.summary.change_percent),
            ComparisonField::MinPrice => Some(self.summary.min_price),
            ComparisonField::MaxPrice => Some(self.summary.max_price),
            ComparisonField::ForecastAvg => self.forecast.map(|f| f.avg),
            ComparisonField::TrendPercent => self.forecast.map(|f| f.trend_percent),
            ComparisonField::PriceEffect => self.price_effect,
        }
    }
}
