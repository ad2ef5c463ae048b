//! # iris-eda: Exploratory Analysis of the Iris Dataset
//!
//! Loads the embedded 150-flower Iris table into an Arrow `RecordBatch`,
//! prints a structural and statistical report, and shows four static charts
//! one after another.
//!
//! ## Pipeline
//!
//! - **Load**: embedded CSV parsed into [`storage::RecordTable`]
//! - **Report**: head, structure, missing values, summary statistics
//! - **Aggregate**: per-species means ([`aggregate::group_by_mean`])
//! - **Visualize**: line, bar, histogram and scatter charts
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use iris_eda::chart::HeadlessViewer;
//! use iris_eda::config::{AnalysisConfig, DisplayMode};
//!
//! let config = AnalysisConfig::builder()
//!     .display(DisplayMode::Headless)
//!     .build()?;
//!
//! let mut out = std::io::stdout().lock();
//! let outcome = iris_eda::pipeline::run(&config, &mut out, &mut HeadlessViewer::default())?;
//! assert_eq!(outcome.rows, 150);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod aggregate;
pub mod chart;
pub mod config;
pub mod dataset;
pub mod error;
pub mod findings;
pub mod pipeline;
pub mod report;
pub mod stats;
pub mod storage;

pub use error::{Error, Result};
