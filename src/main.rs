use anyhow::Result;
use iris_eda::chart::{ChartViewer, HeadlessViewer, TerminalViewer};
use iris_eda::config::{AnalysisConfig, DisplayMode};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Diagnostics go to stderr; stdout carries the report.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = AnalysisConfig::default();
    let mut viewer: Box<dyn ChartViewer> = match config.display() {
        DisplayMode::Terminal => Box::new(TerminalViewer::new()),
        DisplayMode::Headless => Box::new(HeadlessViewer::default()),
    };

    let mut out = std::io::stdout().lock();
    let outcome = iris_eda::pipeline::run(&config, &mut out, viewer.as_mut())?;

    tracing::info!(
        rows = outcome.rows,
        charts = outcome.charts_shown.len(),
        "done"
    );
    Ok(())
}
