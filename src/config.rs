//! Analysis configuration
//!
//! The binary always runs with the defaults; the builder exists so tests
//! and embedders can switch to headless display or change layout knobs.

use crate::dataset::TARGET;
use crate::{Error, Result};

/// Rows shown in the head section
pub const DEFAULT_HEAD_ROWS: usize = 5;
/// Equal-width bins in the sepal-width histogram
pub const DEFAULT_HISTOGRAM_BINS: usize = 15;
/// Width of the `=` rule between report sections
pub const DEFAULT_RULE_WIDTH: usize = 50;

/// How charts are displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Full-screen terminal window per chart, dismissed by a key press
    #[default]
    Terminal,
    /// Render into an off-screen buffer without user interaction
    Headless,
}

/// Validated analysis settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    head_rows: usize,
    histogram_bins: usize,
    rule_width: usize,
    display: DisplayMode,
    group_column: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            head_rows: DEFAULT_HEAD_ROWS,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            rule_width: DEFAULT_RULE_WIDTH,
            display: DisplayMode::default(),
            group_column: TARGET.to_string(),
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder
    #[must_use]
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Rows shown in the head section
    #[must_use]
    pub const fn head_rows(&self) -> usize {
        self.head_rows
    }

    /// Histogram bin count
    #[must_use]
    pub const fn histogram_bins(&self) -> usize {
        self.histogram_bins
    }

    /// Separator rule width
    #[must_use]
    pub const fn rule_width(&self) -> usize {
        self.rule_width
    }

    /// Chart display mode
    #[must_use]
    pub const fn display(&self) -> DisplayMode {
        self.display
    }

    /// Categorical column used for grouping
    #[must_use]
    pub fn group_column(&self) -> &str {
        &self.group_column
    }
}

/// Builder for [`AnalysisConfig`]
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    /// Set the number of rows in the head section
    #[must_use]
    pub fn head_rows(mut self, rows: usize) -> Self {
        self.config.head_rows = rows;
        self
    }

    /// Set the histogram bin count
    #[must_use]
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.config.histogram_bins = bins;
        self
    }

    /// Set the separator rule width
    #[must_use]
    pub fn rule_width(mut self, width: usize) -> Self {
        self.config.rule_width = width;
        self
    }

    /// Set the chart display mode
    #[must_use]
    pub fn display(mut self, display: DisplayMode) -> Self {
        self.config.display = display;
        self
    }

    /// Set the grouping column
    #[must_use]
    pub fn group_column(mut self, column: impl Into<String>) -> Self {
        self.config.group_column = column.into();
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if `head_rows` or `histogram_bins` is zero
    pub fn build(self) -> Result<AnalysisConfig> {
        if self.config.head_rows == 0 {
            return Err(Error::InvalidInput("head_rows must be greater than 0".to_string()));
        }
        if self.config.histogram_bins == 0 {
            return Err(Error::InvalidInput(
                "histogram_bins must be greater than 0".to_string(),
            ));
        }
        Ok(self.config)
    }
}
