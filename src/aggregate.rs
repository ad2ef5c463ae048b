//! GROUP BY mean aggregation
//!
//! Groups rows by an integer key column and averages every other numeric
//! column per group. Keys come out in ascending order; only keys present in
//! the table produce rows, so no group is ever empty.

use crate::storage::RecordTable;
use crate::{Error, Result};
use arrow::array::{Array, ArrayRef, Float64Array, Int32Array, RecordBatch};
use arrow::datatypes::{DataType, Field, Schema};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Per-group arithmetic means, one row per distinct key
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMeanTable {
    key_column: String,
    keys: Vec<i32>,
    columns: Vec<String>,
    /// Row-major: `means[row][column]`
    means: Vec<Vec<f64>>,
}

impl GroupMeanTable {
    /// Name of the grouping column (the table index)
    #[must_use]
    pub fn key_column(&self) -> &str {
        &self.key_column
    }

    /// Group keys in ascending order
    #[must_use]
    pub fn keys(&self) -> &[i32] {
        &self.keys
    }

    /// Aggregated column names
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of groups
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.keys.len()
    }

    /// Number of aggregated columns
    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    fn row_index(&self, key: i32) -> Option<usize> {
        self.keys.binary_search(&key).ok()
    }

    fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Mean of `column` within group `key`
    #[must_use]
    pub fn mean(&self, key: i32, column: &str) -> Option<f64> {
        let row = self.row_index(key)?;
        let col = self.column_index(column)?;
        Some(self.means[row][col])
    }

    /// One column's means, in key order
    ///
    /// # Errors
    ///
    /// Returns `Error::ColumnNotFound` if the column was not aggregated
    pub fn column_values(&self, column: &str) -> Result<Vec<f64>> {
        let col = self
            .column_index(column)
            .ok_or_else(|| Error::ColumnNotFound(column.to_string()))?;
        Ok(self.means.iter().map(|row| row[col]).collect())
    }

    /// Key of the group with the largest mean in `column`
    ///
    /// # Errors
    ///
    /// Returns `Error::ColumnNotFound` if the column was not aggregated
    pub fn argmax(&self, column: &str) -> Result<Option<i32>> {
        self.extreme_key(column, |candidate, best| candidate > best)
    }

    /// Key of the group with the smallest mean in `column`
    ///
    /// # Errors
    ///
    /// Returns `Error::ColumnNotFound` if the column was not aggregated
    pub fn argmin(&self, column: &str) -> Result<Option<i32>> {
        self.extreme_key(column, |candidate, best| candidate < best)
    }

    fn extreme_key(&self, column: &str, better: impl Fn(f64, f64) -> bool) -> Result<Option<i32>> {
        let values = self.column_values(column)?;
        let mut best: Option<(i32, f64)> = None;
        for (&key, &value) in self.keys.iter().zip(&values) {
            match best {
                Some((_, current)) if !better(value, current) => {}
                _ => best = Some((key, value)),
            }
        }
        Ok(best.map(|(key, _)| key))
    }

    /// Convert to an Arrow batch: key column first, then one `Float64` per mean
    ///
    /// # Errors
    ///
    /// Returns error if Arrow rejects the assembled columns
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let mut fields = vec![Field::new(&self.key_column, DataType::Int32, false)];
        let mut arrays: Vec<ArrayRef> = vec![Arc::new(Int32Array::from(self.keys.clone()))];

        for (col, name) in self.columns.iter().enumerate() {
            fields.push(Field::new(name, DataType::Float64, false));
            arrays.push(Arc::new(Float64Array::from_iter_values(
                self.means.iter().map(|row| row[col]),
            )));
        }

        RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)
            .map_err(|e| Error::StorageError(format!("Failed to create result batch: {e}")))
    }
}

/// Running sum and count for one aggregated column
#[derive(Debug, Clone, Copy, Default)]
struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    #[allow(clippy::cast_precision_loss)]
    fn finish(self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Group rows by `key_column` and average every other numeric column
///
/// # Errors
///
/// Returns error if:
/// - `key_column` is not in the schema
/// - `key_column` is not `Int32`
/// - an aggregated column cannot be read
pub fn group_by_mean(table: &RecordTable, key_column: &str) -> Result<GroupMeanTable> {
    let keys = table.i32_column(key_column)?;

    let columns: Vec<String> = table
        .numeric_columns()
        .into_iter()
        .filter(|name| name != key_column)
        .collect();

    let arrays = columns
        .iter()
        .map(|name| numeric_array(table, name))
        .collect::<Result<Vec<_>>>()?;

    let mut groups: BTreeMap<i32, Vec<MeanAccumulator>> = BTreeMap::new();
    for row in 0..keys.len() {
        if keys.is_null(row) {
            continue;
        }
        let accumulators = groups
            .entry(keys.value(row))
            .or_insert_with(|| vec![MeanAccumulator::default(); columns.len()]);

        for (acc, array) in accumulators.iter_mut().zip(&arrays) {
            if let Some(value) = array.get(row) {
                acc.sum += value;
                acc.count += 1;
            }
        }
    }

    tracing::debug!(
        key_column,
        groups = groups.len(),
        columns = columns.len(),
        "computed group means"
    );

    let (keys, means): (Vec<i32>, Vec<Vec<f64>>) = groups
        .into_iter()
        .map(|(key, accs)| {
            let row = accs.into_iter().map(MeanAccumulator::finish).collect::<Vec<_>>();
            (key, row)
        })
        .unzip();

    Ok(GroupMeanTable {
        key_column: key_column.to_string(),
        keys,
        columns,
        means,
    })
}

/// Numeric column view that yields `f64` regardless of the stored width
enum NumericArray<'a> {
    Float(&'a Float64Array),
    Int(&'a Int32Array),
}

impl NumericArray<'_> {
    fn get(&self, row: usize) -> Option<f64> {
        match self {
            Self::Float(a) => (!a.is_null(row)).then(|| a.value(row)),
            Self::Int(a) => (!a.is_null(row)).then(|| f64::from(a.value(row))),
        }
    }
}

fn numeric_array<'a>(table: &'a RecordTable, name: &str) -> Result<NumericArray<'a>> {
    match table.column(name)?.data_type() {
        DataType::Int32 => Ok(NumericArray::Int(table.i32_column(name)?)),
        _ => Ok(NumericArray::Float(table.f64_column(name)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{load_iris, PETAL_LENGTH, SEPAL_LENGTH, TARGET};

    fn create_test_table() -> RecordTable {
        let schema = Arc::new(Schema::new(vec![
            Field::new("value", DataType::Float64, true),
            Field::new("group", DataType::Int32, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Float64Array::from(vec![
                    Some(1.0),
                    Some(3.0),
                    Some(10.0),
                    None,
                    Some(20.0),
                    Some(7.0),
                ])),
                Arc::new(Int32Array::from(vec![
                    Some(5),
                    Some(5),
                    Some(2),
                    Some(2),
                    Some(2),
                    None,
                ])),
            ],
        )
        .unwrap();
        RecordTable::try_new(batch).unwrap()
    }

    #[test]
    fn test_groups_sorted_ascending() {
        let table = create_test_table();
        let means = group_by_mean(&table, "group").unwrap();
        assert_eq!(means.keys(), &[2, 5]);
        assert_eq!(means.columns(), &["value".to_string()]);
    }

    #[test]
    fn test_means_skip_nulls() {
        let table = create_test_table();
        let means = group_by_mean(&table, "group").unwrap();
        assert_eq!(means.mean(2, "value"), Some(15.0));
        assert_eq!(means.mean(5, "value"), Some(2.0));
        assert_eq!(means.mean(9, "value"), None);
        assert_eq!(means.mean(2, "missing"), None);
    }

    #[test]
    fn test_missing_key_column() {
        let table = create_test_table();
        let err = group_by_mean(&table, "species").unwrap_err();
        assert!(matches!(err, Error::ColumnNotFound(_)));
    }

    #[test]
    fn test_non_integer_key_column() {
        let table = create_test_table();
        let err = group_by_mean(&table, "value").unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn test_iris_group_means() {
        let table = load_iris().unwrap();
        let means = group_by_mean(&table, TARGET).unwrap();

        assert_eq!(means.num_rows(), 3);
        assert_eq!(means.num_columns(), 4);
        assert_eq!(means.keys(), &[0, 1, 2]);
        assert_eq!(means.key_column(), TARGET);

        let petal = means.column_values(PETAL_LENGTH).unwrap();
        assert!((petal[0] - 1.462).abs() < 1e-9);
        assert!((petal[1] - 4.260).abs() < 1e-9);
        assert!((petal[2] - 5.552).abs() < 1e-9);
        assert!((means.mean(1, SEPAL_LENGTH).unwrap() - 5.936).abs() < 1e-9);
    }

    #[test]
    fn test_argmax_argmin() {
        let table = load_iris().unwrap();
        let means = group_by_mean(&table, TARGET).unwrap();
        assert_eq!(means.argmax(PETAL_LENGTH).unwrap(), Some(2));
        assert_eq!(means.argmin(PETAL_LENGTH).unwrap(), Some(0));
        assert!(means.argmax("nope").is_err());
    }

    #[test]
    fn test_to_record_batch() {
        let table = load_iris().unwrap();
        let batch = group_by_mean(&table, TARGET)
            .unwrap()
            .to_record_batch()
            .unwrap();
        assert_eq!(batch.num_rows(), 3);
        assert_eq!(batch.num_columns(), 5);
        assert_eq!(batch.schema().field(0).name(), TARGET);
    }
}
