//! Property-based tests for iris-eda
//!
//! - Test mathematical invariants of statistics and binning
//! - Test data integrity of sorting and grouping
//! - Run with ProptestConfig::with_cases(100)

use arrow::array::{Float64Array, Int32Array, RecordBatch};
use arrow::datatypes::{DataType, Field, Schema};
use iris_eda::aggregate::group_by_mean;
use iris_eda::chart::Histogram;
use iris_eda::stats::ColumnSummary;
use iris_eda::storage::{RecordTable, SortOrder};
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;

const EPS: f64 = 1e-9;

// ============================================================================
// Property Test Generators (Strategies)
// ============================================================================

/// Generate a `(key, value)` table with keys in `0..groups`
fn arb_keyed_table(max_rows: usize, groups: i32) -> impl Strategy<Value = (Vec<i32>, Vec<f64>)> {
    (1..=max_rows).prop_flat_map(move |rows| {
        (
            proptest::collection::vec(0..groups, rows),
            proptest::collection::vec(-1000.0f64..1000.0, rows),
        )
    })
}

fn value_table(values: Vec<f64>) -> RecordTable {
    let schema = Arc::new(Schema::new(vec![Field::new("value", DataType::Float64, false)]));
    let batch = RecordBatch::try_new(schema, vec![Arc::new(Float64Array::from(values))]).unwrap();
    RecordTable::try_new(batch).unwrap()
}

fn keyed_table(keys: Vec<i32>, values: Vec<f64>) -> RecordTable {
    let schema = Arc::new(Schema::new(vec![
        Field::new("key", DataType::Int32, false),
        Field::new("value", DataType::Float64, false),
    ]));
    let batch = RecordBatch::try_new(
        schema,
        vec![Arc::new(Int32Array::from(keys)), Arc::new(Float64Array::from(values))],
    )
    .unwrap();
    RecordTable::try_new(batch).unwrap()
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: min <= q25 <= median <= q75 <= max
    #[test]
    fn prop_quantiles_ordered(data in proptest::collection::vec(-1e6f64..1e6, 1..200)) {
        let s = ColumnSummary::from_data(&data);
        let tol = EPS * (s.max.abs() + s.min.abs() + 1.0);

        prop_assert_eq!(s.count, data.len());
        prop_assert!(s.min <= s.q25 + tol);
        prop_assert!(s.q25 <= s.median + tol);
        prop_assert!(s.median <= s.q75 + tol);
        prop_assert!(s.q75 <= s.max + tol);
        prop_assert!(s.min - tol <= s.mean && s.mean <= s.max + tol);
    }

    /// Property: every value lands in exactly one bin
    #[test]
    fn prop_histogram_conserves_count(
        data in proptest::collection::vec(-100.0f64..100.0, 0..300),
        bins in 1usize..40
    ) {
        let histogram = Histogram::from_values(&data, bins).unwrap();

        prop_assert_eq!(histogram.bins(), bins);
        prop_assert_eq!(histogram.counts().len(), bins);
        prop_assert_eq!(histogram.edges().len(), bins + 1);
        prop_assert_eq!(histogram.total(), data.len() as u64);
    }

    /// Property: histogram edges are strictly increasing
    #[test]
    fn prop_histogram_edges_increasing(
        data in proptest::collection::vec(-100.0f64..100.0, 1..100),
        bins in 1usize..40
    ) {
        let histogram = Histogram::from_values(&data, bins).unwrap();
        prop_assert!(histogram.edges().windows(2).all(|w| w[0] < w[1]));
    }

    /// Property: ascending sort is non-decreasing and keeps every value
    #[test]
    fn prop_sorted_non_decreasing(data in proptest::collection::vec(-1e3f64..1e3, 1..200)) {
        let table = value_table(data.clone());
        let sorted = table.sorted_values("value", SortOrder::Ascending).unwrap();

        prop_assert_eq!(sorted.len(), data.len());
        prop_assert!(sorted.windows(2).all(|w| w[0] <= w[1]));
    }

    /// Property: sorting an already sorted column changes nothing
    #[test]
    fn prop_sort_idempotent(data in proptest::collection::vec(-1e3f64..1e3, 1..200)) {
        let once = value_table(data)
            .sorted_values("value", SortOrder::Ascending)
            .unwrap();
        let twice = value_table(once.clone())
            .sorted_values("value", SortOrder::Ascending)
            .unwrap();

        prop_assert_eq!(once, twice);
    }

    /// Property: descending sort is the reverse of ascending
    #[test]
    fn prop_descending_reverses_ascending(data in proptest::collection::vec(-1e3f64..1e3, 1..100)) {
        let table = value_table(data);
        let mut ascending = table.sorted_values("value", SortOrder::Ascending).unwrap();
        let descending = table.sorted_values("value", SortOrder::Descending).unwrap();

        ascending.reverse();
        prop_assert_eq!(ascending, descending);
    }

    /// Property: each group mean lies within that group's min and max
    #[test]
    fn prop_group_means_bounded((keys, values) in arb_keyed_table(200, 5)) {
        let mut groups: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
        for (&k, &v) in keys.iter().zip(&values) {
            groups.entry(k).or_default().push(v);
        }

        let means = group_by_mean(&keyed_table(keys, values), "key").unwrap();

        prop_assert_eq!(means.keys().iter().copied().collect::<Vec<_>>(), groups.keys().copied().collect::<Vec<_>>());
        for (key, group) in &groups {
            let lo = group.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = group.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let mean = means.mean(*key, "value").unwrap();
            prop_assert!(lo - EPS * 1e3 <= mean && mean <= hi + EPS * 1e3);
        }
    }
}
