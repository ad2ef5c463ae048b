//! End-to-end analysis run
//!
//! Stages run strictly in order: load, inspect, clean, describe, aggregate,
//! findings, then the four charts. Output written before a chart is flushed
//! before the chart is shown.

use crate::aggregate::{group_by_mean, GroupMeanTable};
use crate::chart::{standard_charts, ChartSpec, ChartViewer};
use crate::config::AnalysisConfig;
use crate::dataset::{load_iris, SPECIES_NAMES};
use crate::findings::{self, Finding};
use crate::report::Reporter;
use crate::stats::{describe, TableInfo};
use crate::storage::RecordTable;
use crate::Result;
use std::io::Write;

/// Last line of the report
pub const END_MESSAGE: &str = "--- End of Analysis and Visualizations ---";

/// What a run produced
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    /// Rows in the loaded table
    pub rows: usize,
    /// Per-group means of the numeric columns
    pub group_means: GroupMeanTable,
    /// Findings with their support flags
    pub findings: Vec<Finding>,
    /// Titles of charts shown, in display order
    pub charts_shown: Vec<String>,
}

/// Caption printed after a chart is dismissed
#[must_use]
pub const fn caption(chart: &ChartSpec) -> &'static str {
    match chart {
        ChartSpec::Line(_) => "(Line chart showing a hypothetical trend)",
        ChartSpec::Bar(_) => "(Bar chart comparing average petal length across species)",
        ChartSpec::Histogram(_) => "(Histogram showing the distribution of sepal width)",
        ChartSpec::Scatter(_) => {
            "(Scatter plot showing the relationship between sepal and petal length)"
        }
    }
}

/// Run the whole analysis, writing the report to `out` and charts to `viewer`
///
/// # Errors
///
/// Returns the first error from any stage; later stages do not run
pub fn run<W, V>(config: &AnalysisConfig, out: &mut W, viewer: &mut V) -> Result<AnalysisOutcome>
where
    W: Write,
    V: ChartViewer + ?Sized,
{
    let mut reporter = Reporter::new(out, config.rule_width());

    let table = load_iris()?;
    tracing::info!(rows = table.num_rows(), columns = table.num_columns(), "dataset loaded");

    let cleaned = inspect(&mut reporter, &table, config)?;

    reporter.line("Basic statistics of numerical columns:")?;
    reporter.describe(&describe(&cleaned)?)?;
    reporter.rule()?;
    tracing::info!("summary statistics reported");

    let group_means = group_by_mean(&cleaned, config.group_column())?;
    reporter.line("Mean measurements per Iris species:")?;
    reporter.group_means(&group_means)?;
    reporter.rule()?;
    tracing::info!(groups = group_means.num_rows(), "group means reported");

    let findings = findings::derive(&group_means)?;
    reporter.line("Interesting Findings:")?;
    reporter.findings(&findings)?;
    reporter.rule()?;

    let charts = standard_charts(&cleaned, &group_means, &SPECIES_NAMES, config.histogram_bins())?;
    let charts_shown = visualize(&mut reporter, viewer, &charts)?;

    reporter.line(&format!("\n{END_MESSAGE}"))?;
    reporter.flush()?;
    tracing::info!("analysis complete");

    Ok(AnalysisOutcome {
        rows: table.num_rows(),
        group_means,
        findings,
        charts_shown,
    })
}

/// Head, structure and missing values; returns the cleaned copy
fn inspect<W: Write>(
    reporter: &mut Reporter<W>,
    table: &RecordTable,
    config: &AnalysisConfig,
) -> Result<RecordTable> {
    reporter.line(&format!("First {} rows of the dataset:", config.head_rows()))?;
    reporter.head(table, config.head_rows())?;
    reporter.rule()?;

    reporter.line("Dataset information:")?;
    reporter.info(&TableInfo::from_table(table)?)?;
    reporter.rule()?;

    reporter.line("Missing values:")?;
    reporter.missing_values(table)?;
    reporter.rule()?;

    let nulls = table.total_nulls();
    if nulls > 0 {
        tracing::warn!(nulls, "dataset has missing values; they are skipped by statistics");
    }

    // No rows are dropped; the copy keeps later stages off the loaded table.
    let cleaned = table.deep_copy()?;
    reporter.line("Cleaned dataset information:")?;
    reporter.info(&TableInfo::from_table(&cleaned)?)?;
    reporter.rule()?;
    tracing::info!("inspection reported");

    Ok(cleaned)
}

fn visualize<W, V>(
    reporter: &mut Reporter<W>,
    viewer: &mut V,
    charts: &[ChartSpec],
) -> Result<Vec<String>>
where
    W: Write,
    V: ChartViewer + ?Sized,
{
    let mut shown = Vec::with_capacity(charts.len());
    for chart in charts {
        reporter.flush()?;
        viewer.show(chart)?;
        reporter.line(&format!("\n{}\n", caption(chart)))?;
        shown.push(chart.title().to_string());
    }
    Ok(shown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::HeadlessViewer;
    use crate::Error;

    struct FailingViewer;

    impl ChartViewer for FailingViewer {
        fn show(&mut self, _chart: &ChartSpec) -> Result<()> {
            Err(Error::Render("no display".to_string()))
        }
    }

    #[test]
    fn test_run_headless() {
        let mut out = Vec::new();
        let mut viewer = HeadlessViewer::default();
        let outcome = run(&AnalysisConfig::default(), &mut out, &mut viewer).unwrap();

        assert_eq!(outcome.rows, 150);
        assert_eq!(outcome.charts_shown.len(), 4);
        assert_eq!(viewer.shown(), outcome.charts_shown.as_slice());
        assert!(outcome.findings.iter().all(|f| f.holds));

        let text = String::from_utf8(out).unwrap();
        assert!(text.trim_end().ends_with(END_MESSAGE));
    }

    #[test]
    fn test_viewer_failure_stops_run() {
        let mut out = Vec::new();
        let err = run(&AnalysisConfig::default(), &mut out, &mut FailingViewer).unwrap_err();
        assert!(matches!(err, Error::Render(_)));

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Interesting Findings:"));
        assert!(!text.contains("(Line chart showing a hypothetical trend)"));
        assert!(!text.contains(END_MESSAGE));
    }

    struct AbortingViewer {
        shown: usize,
    }

    impl ChartViewer for AbortingViewer {
        fn show(&mut self, _chart: &ChartSpec) -> Result<()> {
            self.shown += 1;
            if self.shown == 2 {
                return Err(Error::Interrupted);
            }
            Ok(())
        }
    }

    #[test]
    fn test_interrupt_stops_remaining_charts() {
        let mut out = Vec::new();
        let mut viewer = AbortingViewer { shown: 0 };
        let err = run(&AnalysisConfig::default(), &mut out, &mut viewer).unwrap_err();

        assert!(matches!(err, Error::Interrupted));
        assert_eq!(viewer.shown, 2);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("(Line chart showing a hypothetical trend)"));
        assert!(!text.contains("(Bar chart comparing average petal length across species)"));
        assert!(!text.contains(END_MESSAGE));
    }

    #[test]
    fn test_unknown_group_column() {
        let config = AnalysisConfig::builder()
            .group_column("species")
            .build()
            .unwrap();
        let mut out = Vec::new();
        let err = run(&config, &mut out, &mut HeadlessViewer::default()).unwrap_err();
        assert!(matches!(err, Error::ColumnNotFound(_)));
    }

    #[test]
    fn test_captions_match_kinds() {
        let table = load_iris().unwrap();
        let means = group_by_mean(&table, "target").unwrap();
        let charts = standard_charts(&table, &means, &SPECIES_NAMES, 15).unwrap();
        let captions: Vec<&str> = charts.iter().map(caption).collect();
        assert_eq!(captions[1], "(Bar chart comparing average petal length across species)");
        assert_eq!(
            captions[3],
            "(Scatter plot showing the relationship between sepal and petal length)"
        );
    }
}
