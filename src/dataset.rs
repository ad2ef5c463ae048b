//! Embedded Iris dataset
//!
//! 150 flowers, 50 per species, four measurements in centimeters. The CSV is
//! compiled into the binary, so loading never touches the filesystem.

use crate::storage::RecordTable;
use crate::{Error, Result};
use serde::Deserialize;
use std::fmt;

/// Sepal length column name
pub const SEPAL_LENGTH: &str = "sepal length (cm)";
/// Sepal width column name
pub const SEPAL_WIDTH: &str = "sepal width (cm)";
/// Petal length column name
pub const PETAL_LENGTH: &str = "petal length (cm)";
/// Petal width column name
pub const PETAL_WIDTH: &str = "petal width (cm)";
/// Species id column name
pub const TARGET: &str = "target";

/// Measurement columns in table order
pub const FEATURE_COLUMNS: [&str; 4] = [SEPAL_LENGTH, SEPAL_WIDTH, PETAL_LENGTH, PETAL_WIDTH];

/// Human-readable species names, indexed by species id
pub const SPECIES_NAMES: [&str; 3] = ["setosa", "versicolor", "virginica"];

const IRIS_CSV: &str = include_str!("../data/iris.csv");

/// Iris species (the categorical label)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Species {
    /// Iris setosa (id 0)
    Setosa,
    /// Iris versicolor (id 1)
    Versicolor,
    /// Iris virginica (id 2)
    Virginica,
}

impl Species {
    /// All species in id order
    pub const ALL: [Self; 3] = [Self::Setosa, Self::Versicolor, Self::Virginica];

    /// Resolve a species from its integer id
    ///
    /// # Errors
    ///
    /// Returns `Error::Dataset` if `id` is not 0, 1 or 2
    pub fn from_id(id: i32) -> Result<Self> {
        match id {
            0 => Ok(Self::Setosa),
            1 => Ok(Self::Versicolor),
            2 => Ok(Self::Virginica),
            other => Err(Error::Dataset(format!("Unknown species id: {other}"))),
        }
    }

    /// Integer id stored in the `target` column
    #[must_use]
    pub const fn id(self) -> i32 {
        match self {
            Self::Setosa => 0,
            Self::Versicolor => 1,
            Self::Virginica => 2,
        }
    }

    /// Position in [`Species::ALL`] and [`SPECIES_NAMES`]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Setosa => 0,
            Self::Versicolor => 1,
            Self::Virginica => 2,
        }
    }

    /// Lowercase species name
    #[must_use]
    pub const fn name(self) -> &'static str {
        SPECIES_NAMES[self.index()]
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One flower
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IrisRecord {
    /// Sepal length (cm)
    pub sepal_length: f64,
    /// Sepal width (cm)
    pub sepal_width: f64,
    /// Petal length (cm)
    pub petal_length: f64,
    /// Petal width (cm)
    pub petal_width: f64,
    /// Species label
    pub species: Species,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    sepal_length: f64,
    sepal_width: f64,
    petal_length: f64,
    petal_width: f64,
    target: i32,
}

impl TryFrom<CsvRow> for IrisRecord {
    type Error = Error;

    fn try_from(row: CsvRow) -> Result<Self> {
        Ok(Self {
            sepal_length: row.sepal_length,
            sepal_width: row.sepal_width,
            petal_length: row.petal_length,
            petal_width: row.petal_width,
            species: Species::from_id(row.target)?,
        })
    }
}

/// Parse records from CSV text with a header row
///
/// # Errors
///
/// Returns `Error::Dataset` on malformed rows or unknown species ids
pub fn parse_records(text: &str) -> Result<Vec<IrisRecord>> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let mut records = Vec::new();

    for (line, row) in reader.deserialize::<CsvRow>().enumerate() {
        let row = row.map_err(|e| Error::Dataset(format!("Row {}: {e}", line + 1)))?;
        records.push(IrisRecord::try_from(row)?);
    }

    Ok(records)
}

/// Typed view of the embedded dataset
///
/// # Errors
///
/// Returns `Error::Dataset` if the embedded CSV is corrupt
pub fn iris_records() -> Result<Vec<IrisRecord>> {
    parse_records(IRIS_CSV)
}

/// Load the embedded dataset into a record table
///
/// # Errors
///
/// Returns error if the embedded CSV is corrupt or the Arrow batch
/// cannot be built
pub fn load_iris() -> Result<RecordTable> {
    let records = iris_records()?;
    tracing::debug!(rows = records.len(), "parsed embedded iris dataset");
    RecordTable::from_records(&records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_species_round_trip_ids() {
        for species in Species::ALL {
            assert_eq!(Species::from_id(species.id()).unwrap(), species);
        }
        assert_eq!(Species::Virginica.name(), "virginica");
        assert_eq!(Species::Setosa.to_string(), "setosa");
    }

    #[test]
    fn test_unknown_species_id_rejected() {
        let err = Species::from_id(3).unwrap_err();
        assert!(err.to_string().contains("Unknown species id: 3"));
    }

    #[test]
    fn test_embedded_dataset_shape() {
        let records = iris_records().unwrap();
        assert_eq!(records.len(), 150);

        for species in Species::ALL {
            let count = records.iter().filter(|r| r.species == species).count();
            assert_eq!(count, 50, "{species} should have 50 rows");
        }
    }

    #[test]
    fn test_first_record() {
        let records = iris_records().unwrap();
        assert_eq!(
            records[0],
            IrisRecord {
                sepal_length: 5.1,
                sepal_width: 3.5,
                petal_length: 1.4,
                petal_width: 0.2,
                species: Species::Setosa,
            }
        );
    }

    #[test]
    fn test_parse_records_bad_species() {
        let text = "sepal_length,sepal_width,petal_length,petal_width,target\n5.0,3.0,1.0,0.1,7\n";
        assert!(matches!(parse_records(text), Err(Error::Dataset(_))));
    }

    #[test]
    fn test_parse_records_malformed_row() {
        let text = "sepal_length,sepal_width,petal_length,petal_width,target\n5.0,abc,1.0,0.1,0\n";
        let err = parse_records(text).unwrap_err();
        assert!(err.to_string().contains("Row 1"));
    }
}
