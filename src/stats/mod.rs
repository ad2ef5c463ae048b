//! Descriptive statistics for record tables
//!
//! Provides the numbers behind the report:
//! - Per-column count, mean, sample standard deviation
//! - Min, max and linearly interpolated quartiles
//! - Structural info (dtypes, non-null counts, memory usage)

use crate::storage::RecordTable;
use crate::{Error, Result};
use arrow::array::Array;
use arrow::datatypes::DataType;
use std::collections::BTreeMap;

/// Summary statistics for one numeric column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSummary {
    /// Number of non-missing values
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator)
    pub std: f64,
    /// Minimum value
    pub min: f64,
    /// 25th percentile
    pub q25: f64,
    /// 50th percentile
    pub median: f64,
    /// 75th percentile
    pub q75: f64,
    /// Maximum value
    pub max: f64,
}

impl ColumnSummary {
    /// Compute summary statistics, ignoring non-finite values
    #[must_use]
    pub fn from_data(data: &[f64]) -> Self {
        let mut sorted: Vec<f64> = data.iter().copied().filter(|x| x.is_finite()).collect();
        sorted.sort_by(f64::total_cmp);

        if sorted.is_empty() {
            return Self::empty();
        }

        Self {
            count: sorted.len(),
            mean: mean(&sorted),
            std: sample_std(&sorted),
            min: sorted[0],
            q25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        }
    }

    fn empty() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q25: f64::NAN,
            median: f64::NAN,
            q75: f64::NAN,
            max: f64::NAN,
        }
    }

    /// Statistic values in report order: count, mean, std, min, 25%, 50%, 75%, max
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn values(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.median,
            self.q75,
            self.max,
        ]
    }
}

/// Row labels matching [`ColumnSummary::values`]
pub const STATISTIC_LABELS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Summary statistics of every numeric column of a table
#[derive(Debug, Clone, PartialEq)]
pub struct Describe {
    /// `(column name, summary)` in schema order
    pub columns: Vec<(String, ColumnSummary)>,
}

impl Describe {
    /// Summary for a named column
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&ColumnSummary> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, summary)| summary)
    }
}

/// Describe every numeric column of the table
///
/// # Errors
///
/// Returns error if a numeric column cannot be read
pub fn describe(table: &RecordTable) -> Result<Describe> {
    let columns = table
        .numeric_columns()
        .into_iter()
        .map(|name| {
            let values = table.numeric_values(&name)?;
            Ok((name, ColumnSummary::from_data(&values)))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Describe { columns })
}

/// Arithmetic mean (NaN for empty input)
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Sample standard deviation (NaN for fewer than two values)
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn sample_std(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return f64::NAN;
    }
    let m = mean(data);
    let ss: f64 = data.iter().map(|x| (x - m).powi(2)).sum();
    (ss / (data.len() - 1) as f64).sqrt()
}

/// Quantile of sorted data by linear interpolation
///
/// The quantile sits at fractional position `(n - 1) * q`; values at the
/// neighbouring ranks are blended by the fractional part.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let q = q.clamp(0.0, 1.0);
    let position = (sorted.len() - 1) as f64 * q;
    let lower = position.floor() as usize;
    let upper = (lower + 1).min(sorted.len() - 1);
    let fraction = position - lower as f64;
    sorted[lower] + fraction * (sorted[upper] - sorted[lower])
}

/// Per-column structural information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Column name
    pub name: String,
    /// Non-missing value count
    pub non_null: usize,
    /// Display name of the column type
    pub dtype: &'static str,
}

/// Structural summary of a table (the dataframe `info()` view)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    /// Number of rows
    pub rows: usize,
    /// Column details in schema order
    pub columns: Vec<ColumnInfo>,
    /// Number of columns per dtype, sorted by dtype name
    pub dtype_counts: BTreeMap<&'static str, usize>,
    /// Bytes held by the table buffers
    pub memory_bytes: usize,
}

impl TableInfo {
    /// Gather structural info from a table
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if a column type has no display name
    pub fn from_table(table: &RecordTable) -> Result<Self> {
        let batch = table.batch();
        let mut columns = Vec::with_capacity(table.num_columns());
        let mut dtype_counts = BTreeMap::new();

        for (field, array) in batch.schema().fields().iter().zip(batch.columns()) {
            let dtype = dtype_name(field.data_type()).ok_or_else(|| {
                Error::InvalidInput(format!(
                    "Unsupported column type for '{}': {:?}",
                    field.name(),
                    field.data_type()
                ))
            })?;
            *dtype_counts.entry(dtype).or_insert(0) += 1;
            columns.push(ColumnInfo {
                name: field.name().clone(),
                non_null: array.len() - array.null_count(),
                dtype,
            });
        }

        Ok(Self {
            rows: table.num_rows(),
            columns,
            dtype_counts,
            memory_bytes: table.memory_usage(),
        })
    }
}

/// Lowercase dtype name for report output
#[must_use]
pub fn dtype_name(data_type: &DataType) -> Option<&'static str> {
    match data_type {
        DataType::Float32 => Some("float32"),
        DataType::Float64 => Some("float64"),
        DataType::Int32 => Some("int32"),
        DataType::Int64 => Some("int64"),
        DataType::Utf8 => Some("string"),
        DataType::Boolean => Some("bool"),
        _ => None,
    }
}
