//! Category pivot engine.
//!
//! Cross-tabulates raw records into (primary value x metric x category)
//! average cells, then reshapes the same cells into chart series: one
//! series per primary value, one data point per category.

use tracing::debug;

use crate::models::{CategoryKey, ExperimentRecord, MetricKey};

/// The field whose distinct values become the pivot rows and chart series.
/// Values are discovered from the data, never enumerated up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryFilter {
    Model,
    Preprocessor,
}

impl PrimaryFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            PrimaryFilter::Model => "model",
            PrimaryFilter::Preprocessor => "preprocessor",
        }
    }

    pub fn parse(name: &str) -> Option<PrimaryFilter> {
        match name {
            "model" => Some(PrimaryFilter::Model),
            "preprocessor" => Some(PrimaryFilter::Preprocessor),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PrimaryFilter::Model => "Model",
            PrimaryFilter::Preprocessor => "Preprocessor",
        }
    }

    fn value_of<'a>(self, record: &'a ExperimentRecord) -> &'a str {
        match self {
            PrimaryFilter::Model => &record.model,
            PrimaryFilter::Preprocessor => &record.preprocessor,
        }
    }
}

/// Tuning knobs for the pivot averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PivotOptions {
    /// The upstream dashboard filters metric values by truthiness, so an
    /// exact 0 is dropped from the average as if it were missing. That
    /// behavior is the default; set this to average over every present
    /// value instead.
    pub include_zero: bool,
}

/// Sentinel cell for an empty (primary value, category, metric) slice.
pub const NOT_AVAILABLE: &str = "N/A";

/// One table row: a primary value with one formatted cell per
/// (metric, category) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotRow {
    pub primary_value: String,
    /// Outer order follows the requested metrics, inner the categories.
    pub cells: Vec<PivotMetricCells>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PivotMetricCells {
    pub metric: MetricKey,
    /// Two-decimal averages, or [`NOT_AVAILABLE`]; parallel to
    /// [`PivotTable::categories`].
    pub cells: Vec<String>,
}

/// The cross-tab table layout.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotTable {
    pub primary: PrimaryFilter,
    pub categories: Vec<CategoryKey>,
    /// Records with the category flag set, across every primary value;
    /// parallel to `categories`. Used as the column-header annotation.
    pub counts: Vec<usize>,
    pub rows: Vec<PivotRow>,
}

impl PivotTable {
    /// Cell lookup by wire names, mostly for tests and the CLI.
    pub fn cell(&self, primary_value: &str, metric: MetricKey, category: CategoryKey) -> Option<&str> {
        let col = self.categories.iter().position(|c| *c == category)?;
        let row = self.rows.iter().find(|r| r.primary_value == primary_value)?;
        let cells = row.cells.iter().find(|c| c.metric == metric)?;
        cells.cells.get(col).map(|s| s.as_str())
    }
}

/// One chart data point: a category with one value per series.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    /// The category display label.
    pub label: String,
    /// Parallel to [`MetricChart::series`]; `None` where the table says
    /// [`NOT_AVAILABLE`].
    pub values: Vec<Option<f64>>,
}

/// Chart-ready series layout for one metric.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricChart {
    pub metric: MetricKey,
    /// One series per discovered primary value, in row order.
    pub series: Vec<String>,
    pub points: Vec<ChartPoint>,
}

/// Table plus chart reshape of the same cells.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotSummary {
    pub table: PivotTable,
    pub charts: Vec<MetricChart>,
}

/// Count of records carrying the category flag, independent of the primary
/// filter and the metric selection.
pub fn count_experiments(records: &[ExperimentRecord], category: CategoryKey) -> usize {
    records.iter().filter(|r| r.categories.get(category)).count()
}

/// Average of `metric` over records matching the primary value and the
/// category flag, formatted to two decimals; [`NOT_AVAILABLE`] when the
/// filtered set is empty.
fn average_cell(
    records: &[ExperimentRecord],
    primary: PrimaryFilter,
    primary_value: &str,
    category: CategoryKey,
    metric: MetricKey,
    options: PivotOptions,
) -> String {
    let keep = |v: f64| options.include_zero || v != 0.0;
    let values: Vec<f64> = records
        .iter()
        .filter(|r| primary.value_of(r) == primary_value && r.categories.get(category))
        .filter_map(|r| r.metrics.get(metric).filter(|v| keep(*v)))
        .collect();

    if values.is_empty() {
        return NOT_AVAILABLE.to_string();
    }
    let avg = values.iter().sum::<f64>() / values.len() as f64;
    format!("{avg:.2}")
}

/// Build the full pivot: table layout plus per-metric chart series.
pub fn pivot(
    records: &[ExperimentRecord],
    metrics: &[MetricKey],
    categories: &[CategoryKey],
    primary: PrimaryFilter,
    options: PivotOptions,
) -> PivotSummary {
    // Distinct primary values, first-appearance order.
    let mut primary_values: Vec<String> = Vec::new();
    for record in records {
        let value = primary.value_of(record);
        if !primary_values.iter().any(|v| v == value) {
            primary_values.push(value.to_string());
        }
    }
    debug!(
        primary = primary.as_str(),
        rows = primary_values.len(),
        metrics = metrics.len(),
        categories = categories.len(),
        "building pivot"
    );

    let counts = categories
        .iter()
        .map(|&c| count_experiments(records, c))
        .collect();

    let rows: Vec<PivotRow> = primary_values
        .iter()
        .map(|value| PivotRow {
            primary_value: value.clone(),
            cells: metrics
                .iter()
                .map(|&metric| PivotMetricCells {
                    metric,
                    cells: categories
                        .iter()
                        .map(|&category| {
                            average_cell(records, primary, value, category, metric, options)
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect();

    let table = PivotTable {
        primary,
        categories: categories.to_vec(),
        counts,
        rows,
    };
    let charts = chart_series(&table, metrics);

    PivotSummary { table, charts }
}

/// Reshape table cells into chart series, parsing the formatted strings
/// back to numbers (`N/A` becomes a gap).
fn chart_series(table: &PivotTable, metrics: &[MetricKey]) -> Vec<MetricChart> {
    let series: Vec<String> = table.rows.iter().map(|r| r.primary_value.clone()).collect();

    metrics
        .iter()
        .map(|&metric| {
            let points = table
                .categories
                .iter()
                .enumerate()
                .map(|(col, category)| ChartPoint {
                    label: category.label().to_string(),
                    values: table
                        .rows
                        .iter()
                        .map(|row| {
                            row.cells
                                .iter()
                                .find(|c| c.metric == metric)
                                .and_then(|c| c.cells.get(col))
                                .and_then(|cell| cell.parse::<f64>().ok())
                        })
                        .collect(),
                })
                .collect();
            MetricChart {
                metric,
                series: series.clone(),
                points,
            }
        })
        .collect()
}
