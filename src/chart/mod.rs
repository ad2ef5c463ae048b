//! Chart specifications and display
//!
//! Charts are plain data ([`ChartSpec`]) built from the record table and the
//! group means. A [`ChartViewer`] turns a spec into pixels; every viewer
//! draws through [`render::draw`], so what tests see in an off-screen buffer
//! is what the terminal shows.
//!
//! ## Standard charts
//!
//! 1. Line: sepal length sorted ascending against its rank
//! 2. Bar: mean petal length per species
//! 3. Histogram: sepal width distribution
//! 4. Scatter: sepal length vs petal length, colored by species

pub mod histogram;
pub mod render;
pub mod viewer;

pub use histogram::Histogram;
pub use viewer::{HeadlessViewer, TerminalViewer};

use crate::aggregate::GroupMeanTable;
use crate::dataset::{Species, PETAL_LENGTH, SEPAL_LENGTH, SEPAL_WIDTH, TARGET};
use crate::storage::{RecordTable, SortOrder};
use crate::{Error, Result};

/// Title and axis labels shared by every chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartLabels {
    /// Chart title
    pub title: String,
    /// Horizontal axis label
    pub x_label: String,
    /// Vertical axis label
    pub y_label: String,
}

impl ChartLabels {
    fn new(title: &str, x_label: &str, y_label: &str) -> Self {
        Self {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
        }
    }
}

/// Single series drawn as a connected line
#[derive(Debug, Clone, PartialEq)]
pub struct LinePlot {
    /// Title and axis labels
    pub labels: ChartLabels,
    /// Legend entry for the series
    pub series_label: String,
    /// `(x, y)` points in drawing order
    pub points: Vec<(f64, f64)>,
}

/// One bar per category
#[derive(Debug, Clone, PartialEq)]
pub struct BarPlot {
    /// Title and axis labels
    pub labels: ChartLabels,
    /// `(category, height)` in display order
    pub bars: Vec<(String, f64)>,
}

/// Frequency distribution of one column
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramPlot {
    /// Title and axis labels
    pub labels: ChartLabels,
    /// Binned counts
    pub histogram: Histogram,
}

/// Points of one category in a scatter plot
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    /// Legend entry
    pub label: String,
    /// `(x, y)` points
    pub points: Vec<(f64, f64)>,
}

/// Point cloud with one colored series per category
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPlot {
    /// Title and axis labels
    pub labels: ChartLabels,
    /// Legend heading
    pub legend_title: String,
    /// Series in legend order
    pub series: Vec<ScatterSeries>,
}

/// A static chart ready to display
#[derive(Debug, Clone, PartialEq)]
pub enum ChartSpec {
    /// Line chart
    Line(LinePlot),
    /// Bar chart
    Bar(BarPlot),
    /// Histogram
    Histogram(HistogramPlot),
    /// Scatter plot
    Scatter(ScatterPlot),
}

impl ChartSpec {
    /// Title and axis labels
    #[must_use]
    pub const fn labels(&self) -> &ChartLabels {
        match self {
            Self::Line(plot) => &plot.labels,
            Self::Bar(plot) => &plot.labels,
            Self::Histogram(plot) => &plot.labels,
            Self::Scatter(plot) => &plot.labels,
        }
    }

    /// Chart title
    #[must_use]
    pub fn title(&self) -> &str {
        &self.labels().title
    }

    /// Short chart kind name for logs
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Line(_) => "line",
            Self::Bar(_) => "bar",
            Self::Histogram(_) => "histogram",
            Self::Scatter(_) => "scatter",
        }
    }
}

/// Something that can display a chart
///
/// `show` returns only once the chart has been dismissed, so a sequence of
/// calls displays charts strictly one after another.
pub trait ChartViewer {
    /// Display `chart` and block until it is dismissed
    ///
    /// # Errors
    ///
    /// Returns error if the display backend fails
    fn show(&mut self, chart: &ChartSpec) -> Result<()>;
}

/// Sepal length sorted ascending, plotted against rank
///
/// The dataset has no time dimension; ranking by value gives a
/// hypothetical trend.
///
/// # Errors
///
/// Returns error if the sepal length column is missing or not `Float64`
#[allow(clippy::cast_precision_loss)]
pub fn sepal_length_trend(table: &RecordTable) -> Result<ChartSpec> {
    let sorted = table.sorted_values(SEPAL_LENGTH, SortOrder::Ascending)?;
    let points = sorted
        .into_iter()
        .enumerate()
        .map(|(i, v)| (i as f64, v))
        .collect();

    Ok(ChartSpec::Line(LinePlot {
        labels: ChartLabels::new(
            "Hypothetical Trend of Sepal Length",
            "Data Point Index (Sorted by Sepal Length)",
            "Sepal Length (cm)",
        ),
        series_label: "Sepal Length".to_string(),
        points,
    }))
}

/// Mean petal length per species, one bar each
///
/// `names` maps group key (species id) to its display name.
///
/// # Errors
///
/// Returns error if petal length was not aggregated or a key has no name
pub fn petal_length_by_species(means: &GroupMeanTable, names: &[&str]) -> Result<ChartSpec> {
    let heights = means.column_values(PETAL_LENGTH)?;
    let bars = means
        .keys()
        .iter()
        .zip(heights)
        .map(|(&key, height)| {
            let name = usize::try_from(key)
                .ok()
                .and_then(|i| names.get(i))
                .ok_or_else(|| Error::InvalidInput(format!("No name for group key {key}")))?;
            Ok(((*name).to_string(), height))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ChartSpec::Bar(BarPlot {
        labels: ChartLabels::new(
            "Average Petal Length per Iris Species",
            "Iris Species",
            "Average Petal Length (cm)",
        ),
        bars,
    }))
}

/// Sepal width distribution over `bins` equal-width bins
///
/// # Errors
///
/// Returns error if the column is missing or `bins` is zero
pub fn sepal_width_distribution(table: &RecordTable, bins: usize) -> Result<ChartSpec> {
    let values = table.numeric_values(SEPAL_WIDTH)?;
    let histogram = Histogram::from_values(&values, bins)?;

    Ok(ChartSpec::Histogram(HistogramPlot {
        labels: ChartLabels::new("Distribution of Sepal Width", "Sepal Width (cm)", "Frequency"),
        histogram,
    }))
}

/// Sepal length against petal length, one series per species
///
/// # Errors
///
/// Returns error if a column is missing or a species id is unknown
pub fn sepal_vs_petal_length(table: &RecordTable) -> Result<ChartSpec> {
    let x = table.f64_column(SEPAL_LENGTH)?;
    let y = table.f64_column(PETAL_LENGTH)?;
    let species = table.i32_column(TARGET)?;

    let mut series: Vec<ScatterSeries> = Species::ALL
        .iter()
        .map(|s| ScatterSeries {
            label: s.name().to_string(),
            points: Vec::new(),
        })
        .collect();

    for ((x, y), id) in x.iter().zip(y.iter()).zip(species.iter()) {
        let (Some(x), Some(y), Some(id)) = (x, y, id) else {
            continue;
        };
        series[Species::from_id(id)?.index()].points.push((x, y));
    }

    Ok(ChartSpec::Scatter(ScatterPlot {
        labels: ChartLabels::new(
            "Relationship between Sepal Length and Petal Length",
            "Sepal Length (cm)",
            "Petal Length (cm)",
        ),
        legend_title: "Species".to_string(),
        series,
    }))
}

/// The four standard charts, in display order
///
/// # Errors
///
/// Returns error if any chart cannot be built
pub fn standard_charts(
    table: &RecordTable,
    means: &GroupMeanTable,
    names: &[&str],
    bins: usize,
) -> Result<Vec<ChartSpec>> {
    Ok(vec![
        sepal_length_trend(table)?,
        petal_length_by_species(means, names)?,
        sepal_width_distribution(table, bins)?,
        sepal_vs_petal_length(table)?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::group_by_mean;
    use crate::dataset::{load_iris, SPECIES_NAMES};

    #[test]
    fn test_trend_is_sorted_and_indexed() {
        let table = load_iris().unwrap();
        let ChartSpec::Line(plot) = sepal_length_trend(&table).unwrap() else {
            panic!("expected line chart");
        };

        assert_eq!(plot.points.len(), 150);
        assert_eq!(plot.points[0], (0.0, 4.3));
        assert_eq!(plot.points[149], (149.0, 7.9));
        assert!(plot.points.windows(2).all(|w| w[0].1 <= w[1].1));
        assert_eq!(plot.series_label, "Sepal Length");
    }

    #[test]
    fn test_bar_heights_from_group_means() {
        let table = load_iris().unwrap();
        let means = group_by_mean(&table, TARGET).unwrap();
        let ChartSpec::Bar(plot) = petal_length_by_species(&means, &SPECIES_NAMES).unwrap() else {
            panic!("expected bar chart");
        };

        let names: Vec<&str> = plot.bars.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["setosa", "versicolor", "virginica"]);
        assert!((plot.bars[2].1 - 5.552).abs() < 1e-9);
    }

    #[test]
    fn test_bar_missing_name() {
        let table = load_iris().unwrap();
        let means = group_by_mean(&table, TARGET).unwrap();
        let err = petal_length_by_species(&means, &["setosa"]).unwrap_err();
        assert!(err.to_string().contains("No name for group key 1"));
    }

    #[test]
    fn test_histogram_reference_counts() {
        let table = load_iris().unwrap();
        let ChartSpec::Histogram(plot) = sepal_width_distribution(&table, 15).unwrap() else {
            panic!("expected histogram");
        };

        assert_eq!(plot.histogram.bins(), 15);
        assert_eq!(plot.histogram.total(), 150);
        assert_eq!(
            plot.histogram.counts(),
            &[1, 7, 3, 13, 23, 10, 37, 13, 18, 10, 3, 8, 1, 2, 1]
        );
    }

    #[test]
    fn test_scatter_series_per_species() {
        let table = load_iris().unwrap();
        let ChartSpec::Scatter(plot) = sepal_vs_petal_length(&table).unwrap() else {
            panic!("expected scatter plot");
        };

        assert_eq!(plot.legend_title, "Species");
        assert_eq!(plot.series.len(), 3);
        for (series, name) in plot.series.iter().zip(SPECIES_NAMES) {
            assert_eq!(series.label, name);
            assert_eq!(series.points.len(), 50);
        }
        assert_eq!(plot.series[0].points[0], (5.1, 1.4));
    }

    #[test]
    fn test_standard_chart_order() {
        let table = load_iris().unwrap();
        let means = group_by_mean(&table, TARGET).unwrap();
        let charts = standard_charts(&table, &means, &SPECIES_NAMES, 15).unwrap();
        let kinds: Vec<&str> = charts.iter().map(ChartSpec::kind).collect();
        assert_eq!(kinds, vec!["line", "bar", "histogram", "scatter"]);
        assert_eq!(charts[2].labels().y_label, "Frequency");
    }
}
