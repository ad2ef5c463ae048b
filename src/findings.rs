//! Observations derived from the group-mean table
//!
//! Each finding states a pattern and records whether the data supports it.

use crate::aggregate::GroupMeanTable;
use crate::dataset::{Species, PETAL_LENGTH, PETAL_WIDTH, SEPAL_LENGTH, SEPAL_WIDTH};
use crate::{Error, Result};
use std::fmt;

/// One observation about the dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Sentence shown in the report
    pub statement: String,
    /// Whether the group means support the statement
    pub holds: bool,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.holds {
            write!(f, "- {}", self.statement)
        } else {
            write!(f, "- {} (not supported by this data)", self.statement)
        }
    }
}

/// Derive the standard findings from per-species means
///
/// # Errors
///
/// Returns error if the table is empty or a measurement column is missing
pub fn derive(means: &GroupMeanTable) -> Result<Vec<Finding>> {
    if means.num_rows() == 0 {
        return Err(Error::InvalidInput(
            "Cannot derive findings from an empty group-mean table".to_string(),
        ));
    }

    let sepal_length = means.column_values(SEPAL_LENGTH)?;
    let sepal_width = means.column_values(SEPAL_WIDTH)?;
    let sepal_dominates = sepal_length
        .iter()
        .zip(&sepal_width)
        .all(|(length, width)| length > width);

    let setosa = Species::Setosa.id();
    let virginica = Species::Virginica.id();
    let setosa_smallest =
        means.argmin(PETAL_LENGTH)? == Some(setosa) && means.argmin(PETAL_WIDTH)? == Some(setosa);
    let virginica_largest = means.argmax(PETAL_LENGTH)? == Some(virginica)
        && means.argmax(PETAL_WIDTH)? == Some(virginica);

    Ok(vec![
        Finding {
            statement: "Sepal length appears to be generally larger than sepal width across all species."
                .to_string(),
            holds: sepal_dominates,
        },
        Finding {
            statement: "Setosa species tends to have smaller petal length and petal width compared to versicolor and virginica."
                .to_string(),
            holds: setosa_smallest,
        },
        Finding {
            statement: "Virginica generally has the largest petal length and petal width.".to_string(),
            holds: virginica_largest,
        },
    ])
}
