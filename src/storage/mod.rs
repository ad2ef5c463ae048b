//! Record table storage (Arrow)
//!
//! **Read-Only Design**:
//! - The table is built once from typed records and never mutated
//! - Derived views (`head`, `deep_copy`, sorted columns) are new values
//! - Column access is by name, with type checks at the Arrow boundary

use crate::dataset::{IrisRecord, FEATURE_COLUMNS, TARGET};
use crate::{Error, Result};
use arrow::array::{Array, ArrayRef, Float64Array, Int32Array, UInt32Array};
use arrow::compute::{self, SortOptions};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use std::sync::Arc;

/// Sort order for column extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Smallest value first
    Ascending,
    /// Largest value first
    Descending,
}

impl From<SortOrder> for SortOptions {
    fn from(order: SortOrder) -> Self {
        Self {
            descending: matches!(order, SortOrder::Descending),
            nulls_first: false,
        }
    }
}

/// Arrow schema of the Iris record table
///
/// Fields are nullable so missing-value accounting is meaningful, even
/// though the embedded dataset has none.
#[must_use]
pub fn iris_schema() -> SchemaRef {
    let mut fields: Vec<Field> = FEATURE_COLUMNS
        .iter()
        .map(|name| Field::new(*name, DataType::Float64, true))
        .collect();
    fields.push(Field::new(TARGET, DataType::Int32, true));
    Arc::new(Schema::new(fields))
}

/// Immutable in-memory table backed by a single Arrow record batch
#[derive(Debug, Clone)]
pub struct RecordTable {
    batch: RecordBatch,
}

impl RecordTable {
    /// Wrap an existing record batch
    ///
    /// # Errors
    ///
    /// Returns `Error::StorageError` if the batch has no columns
    pub fn try_new(batch: RecordBatch) -> Result<Self> {
        if batch.num_columns() == 0 {
            return Err(Error::StorageError(
                "Record table requires at least one column".to_string(),
            ));
        }
        Ok(Self { batch })
    }

    /// Build the Iris table from typed records
    ///
    /// # Errors
    ///
    /// Returns error if Arrow rejects the assembled columns
    pub fn from_records(records: &[IrisRecord]) -> Result<Self> {
        let columns: Vec<ArrayRef> = vec![
            Arc::new(Float64Array::from_iter_values(
                records.iter().map(|r| r.sepal_length),
            )),
            Arc::new(Float64Array::from_iter_values(
                records.iter().map(|r| r.sepal_width),
            )),
            Arc::new(Float64Array::from_iter_values(
                records.iter().map(|r| r.petal_length),
            )),
            Arc::new(Float64Array::from_iter_values(
                records.iter().map(|r| r.petal_width),
            )),
            Arc::new(Int32Array::from_iter_values(
                records.iter().map(|r| r.species.id()),
            )),
        ];

        let batch = RecordBatch::try_new(iris_schema(), columns)
            .map_err(|e| Error::StorageError(format!("Failed to build record table: {e}")))?;
        Self::try_new(batch)
    }

    /// Underlying record batch
    #[must_use]
    pub const fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Table schema
    #[must_use]
    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    /// Number of rows
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    /// Number of columns
    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    /// Column names in schema order
    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    /// Names of numeric (integer or floating point) columns
    #[must_use]
    pub fn numeric_columns(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .filter(|f| f.data_type().is_numeric())
            .map(|f| f.name().clone())
            .collect()
    }

    /// Look up a column by name
    ///
    /// # Errors
    ///
    /// Returns `Error::ColumnNotFound` if the schema has no such column
    pub fn column(&self, name: &str) -> Result<&ArrayRef> {
        self.batch
            .column_by_name(name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    /// Look up a `Float64` column
    ///
    /// # Errors
    ///
    /// Returns error if the column is missing or not `Float64`
    pub fn f64_column(&self, name: &str) -> Result<&Float64Array> {
        let column = self.column(name)?;
        column
            .as_any()
            .downcast_ref::<Float64Array>()
            .ok_or_else(|| type_mismatch(name, &DataType::Float64, column.data_type()))
    }

    /// Look up an `Int32` column
    ///
    /// # Errors
    ///
    /// Returns error if the column is missing or not `Int32`
    pub fn i32_column(&self, name: &str) -> Result<&Int32Array> {
        let column = self.column(name)?;
        column
            .as_any()
            .downcast_ref::<Int32Array>()
            .ok_or_else(|| type_mismatch(name, &DataType::Int32, column.data_type()))
    }

    /// Non-null values of a numeric column widened to `f64`
    ///
    /// # Errors
    ///
    /// Returns error if the column is missing or not `Float64`/`Int32`
    pub fn numeric_values(&self, name: &str) -> Result<Vec<f64>> {
        let column = self.column(name)?;
        match column.data_type() {
            DataType::Float64 => Ok(self.f64_column(name)?.iter().flatten().collect()),
            DataType::Int32 => Ok(self
                .i32_column(name)?
                .iter()
                .flatten()
                .map(f64::from)
                .collect()),
            other => Err(type_mismatch(name, &DataType::Float64, other)),
        }
    }

    /// First `n` rows (zero-copy slice, clamped to the table length)
    #[must_use]
    pub fn head(&self, n: usize) -> Self {
        Self {
            batch: self.batch.slice(0, n.min(self.num_rows())),
        }
    }

    /// Missing-value count per column, in schema order
    #[must_use]
    pub fn null_counts(&self) -> Vec<(String, usize)> {
        self.column_names()
            .into_iter()
            .zip(self.batch.columns().iter().map(|c| c.null_count()))
            .collect()
    }

    /// Total number of missing values across all columns
    #[must_use]
    pub fn total_nulls(&self) -> usize {
        self.batch.columns().iter().map(|c| c.null_count()).sum()
    }

    /// Bytes held by the table's Arrow buffers
    #[must_use]
    pub fn memory_usage(&self) -> usize {
        self.batch.get_array_memory_size()
    }

    /// Full copy of the table into freshly allocated buffers
    ///
    /// This is the "cleaning" step of the analysis. The embedded dataset
    /// has no missing values, so the copy carries every row unchanged.
    ///
    /// # Errors
    ///
    /// Returns error if Arrow fails to materialize a column
    pub fn deep_copy(&self) -> Result<Self> {
        let len = u32::try_from(self.num_rows())
            .map_err(|_| Error::StorageError("Table too large to copy".to_string()))?;
        let indices = UInt32Array::from_iter_values(0..len);

        let columns = self
            .batch
            .columns()
            .iter()
            .map(|c| compute::take(c.as_ref(), &indices, None))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let batch = RecordBatch::try_new(self.batch.schema(), columns)?;
        Self::try_new(batch)
    }

    /// Values of a `Float64` column in sorted order (nulls dropped)
    ///
    /// # Errors
    ///
    /// Returns error if the column is missing or not `Float64`
    pub fn sorted_values(&self, name: &str, order: SortOrder) -> Result<Vec<f64>> {
        let column = self.f64_column(name)?;
        let sorted = compute::sort(column, Some(order.into()))?;
        let sorted = sorted
            .as_any()
            .downcast_ref::<Float64Array>()
            .ok_or_else(|| type_mismatch(name, &DataType::Float64, sorted.data_type()))?;
        Ok(sorted.iter().flatten().collect())
    }
}

fn type_mismatch(column: &str, expected: &DataType, found: &DataType) -> Error {
    Error::TypeMismatch {
        column: column.to_string(),
        expected: format!("{expected:?}"),
        found: format!("{found:?}"),
    }
}
