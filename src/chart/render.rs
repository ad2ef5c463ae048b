//! Chart drawing with ratatui widgets
//!
//! Line and scatter plots use the `Chart` widget on a braille/dot canvas.
//! Bar plots and histograms use `BarChart`; their axis labels go into the
//! block border since `BarChart` has no axes of its own.

use super::{BarPlot, ChartLabels, ChartSpec, HistogramPlot, LinePlot, ScatterPlot};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::symbols::Marker;
use ratatui::text::Line;
use ratatui::widgets::{
    Axis, Bar, BarChart as BarWidget, BarGroup, Block, Chart, Dataset, GraphType, LegendPosition,
};
use ratatui::Frame;

/// Footer shown under every chart
pub const DISMISS_HINT: &str = "Press q, Esc or Enter to continue";

/// Bar heights are integers; means are scaled by this factor before drawing
const BAR_SCALE: f64 = 1000.0;

/// Series colors for categorical plots (viridis, three classes)
const PALETTE: [Color; 3] = [
    Color::Rgb(68, 1, 84),
    Color::Rgb(33, 145, 140),
    Color::Rgb(253, 231, 37),
];

/// Draw a chart into the whole frame, with the dismiss hint on the last line
pub fn draw(frame: &mut Frame, chart: &ChartSpec) {
    let [body, footer] = Layout::vertical([Constraint::Min(3), Constraint::Length(1)])
        .areas(frame.area());

    match chart {
        ChartSpec::Line(plot) => draw_line(frame, body, plot),
        ChartSpec::Bar(plot) => draw_bars(frame, body, plot),
        ChartSpec::Histogram(plot) => draw_histogram(frame, body, plot),
        ChartSpec::Scatter(plot) => draw_scatter(frame, body, plot),
    }

    frame.render_widget(Line::from(DISMISS_HINT).centered(), footer);
}

fn draw_line(frame: &mut Frame, area: Rect, plot: &LinePlot) {
    let x_bounds = bounds(plot.points.iter().map(|p| p.0));
    let y_bounds = bounds(plot.points.iter().map(|p| p.1));

    let dataset = Dataset::default()
        .name(plot.series_label.as_str())
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&plot.points);

    let chart = Chart::new(vec![dataset])
        .block(chart_block(&plot.labels))
        .x_axis(axis(&plot.labels.x_label, x_bounds))
        .y_axis(axis(&plot.labels.y_label, y_bounds))
        .legend_position(Some(LegendPosition::TopLeft));

    frame.render_widget(chart, area);
}

fn draw_scatter(frame: &mut Frame, area: Rect, plot: &ScatterPlot) {
    let all_points = || plot.series.iter().flat_map(|s| s.points.iter());
    let x_bounds = bounds(all_points().map(|p| p.0));
    let y_bounds = bounds(all_points().map(|p| p.1));

    // The first legend entry has no points and serves as the legend title.
    let heading = Dataset::default()
        .name(Line::from(plot.legend_title.as_str()).bold())
        .data(&[]);
    let series = plot
        .series
        .iter()
        .zip(PALETTE.iter().cycle())
        .map(|(series, color)| {
            Dataset::default()
                .name(series.label.as_str())
                .marker(Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(*color))
                .data(&series.points)
        });
    let datasets: Vec<Dataset> = std::iter::once(heading).chain(series).collect();

    let chart = Chart::new(datasets)
        .block(chart_block(&plot.labels))
        .x_axis(axis(&plot.labels.x_label, x_bounds))
        .y_axis(axis(&plot.labels.y_label, y_bounds))
        .legend_position(Some(LegendPosition::TopLeft))
        .hidden_legend_constraints((Constraint::Percentage(50), Constraint::Percentage(50)));

    frame.render_widget(chart, area);
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn draw_bars(frame: &mut Frame, area: Rect, plot: &BarPlot) {
    let bars: Vec<Bar> = plot
        .bars
        .iter()
        .zip(PALETTE.iter().cycle())
        .map(|((label, height), color)| {
            Bar::default()
                .value((height * BAR_SCALE).round().max(0.0) as u64)
                .text_value(format!("{height:.3}"))
                .label(Line::from(label.as_str()))
                .style(Style::default().fg(*color))
        })
        .collect();

    let chart = BarWidget::default()
        .block(bar_block(&plot.labels))
        .data(BarGroup::default().bars(&bars))
        .bar_width(12)
        .bar_gap(4)
        .value_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));

    frame.render_widget(chart, area);
}

fn draw_histogram(frame: &mut Frame, area: Rect, plot: &HistogramPlot) {
    let histogram = &plot.histogram;
    let block = bar_block(&plot.labels);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (bar_width, gap) = bar_layout(inner.width, histogram.bins());
    let starts: Vec<String> = (0..histogram.bins())
        .filter_map(|i| histogram.bin_range(i))
        .map(|(start, _)| format!("{start:.2}"))
        .collect();
    let labelled = starts.iter().all(|s| s.len() <= usize::from(bar_width));

    let bars: Vec<Bar> = histogram
        .counts()
        .iter()
        .zip(&starts)
        .map(|(&count, start)| {
            let bar = Bar::default().value(count);
            if labelled {
                bar.label(Line::from(start.as_str()))
            } else {
                bar
            }
        })
        .collect();

    let [bars_area, ticks_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(u16::from(!labelled))])
            .areas(inner);

    let chart = BarWidget::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(gap)
        .bar_style(Style::default().fg(Color::LightBlue))
        .value_style(Style::default().fg(Color::Black).bg(Color::LightBlue));
    frame.render_widget(chart, bars_area);

    // Too narrow for per-bar labels: mark the first and last bin starts.
    if let (false, Some(first), Some(last)) = (labelled, starts.first(), starts.last()) {
        let ticks = Rect {
            width: bars_span(bar_width, gap, histogram.bins()).min(ticks_area.width),
            ..ticks_area
        };
        frame.render_widget(Line::from(first.as_str()).left_aligned(), ticks);
        frame.render_widget(Line::from(last.as_str()).right_aligned(), ticks);
    }
}

/// Bar width and gap that fit `bins` bars into `width` columns
fn bar_layout(width: u16, bins: usize) -> (u16, u16) {
    let bins = u16::try_from(bins.max(1)).unwrap_or(u16::MAX);
    let slot = width / bins;
    if slot >= 2 {
        (slot - 1, 1)
    } else {
        (1, 0)
    }
}

/// Columns covered by `bins` bars
fn bars_span(bar_width: u16, gap: u16, bins: usize) -> u16 {
    let bins = u16::try_from(bins).unwrap_or(u16::MAX);
    bins.saturating_mul(bar_width + gap).saturating_sub(gap)
}

fn chart_block(labels: &ChartLabels) -> Block<'_> {
    Block::bordered().title(Line::from(labels.title.as_str()).bold().centered())
}

fn bar_block(labels: &ChartLabels) -> Block<'_> {
    chart_block(labels)
        .title(Line::from(format!("y: {}", labels.y_label)).left_aligned())
        .title_bottom(Line::from(format!("x: {}", labels.x_label)).centered())
}

fn axis(title: &str, bounds: [f64; 2]) -> Axis<'_> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    Axis::default()
        .title(title.gray())
        .bounds(bounds)
        .labels([bounds[0], mid, bounds[1]].map(|v| format!("{v:.1}")))
}

/// Axis range covering all values with 5% padding on each side
fn bounds(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if lo > hi {
        return [0.0, 1.0];
    }
    let pad = if hi > lo { (hi - lo) * 0.05 } else { 0.5 };
    [lo - pad, hi + pad]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_padding() {
        let [lo, hi] = bounds([0.0, 10.0].into_iter());
        assert!((lo + 0.5).abs() < 1e-12);
        assert!((hi - 10.5).abs() < 1e-12);
    }

    #[test]
    fn test_bar_layout_fits_width() {
        for width in 15..=200u16 {
            let (bar_width, gap) = bar_layout(width, 15);
            assert!(bar_width >= 1);
            assert!(
                bars_span(bar_width, gap, 15) <= width,
                "15 bars overflow {width} columns"
            );
        }
    }

    #[test]
    fn test_bar_layout_narrow_drops_gap() {
        assert_eq!(bar_layout(58, 15), (2, 1));
        assert_eq!(bar_layout(20, 15), (1, 0));
        assert_eq!(bar_layout(98, 15), (5, 1));
    }

    #[test]
    fn test_bars_span() {
        assert_eq!(bars_span(2, 1, 15), 44);
        assert_eq!(bars_span(1, 0, 15), 15);
    }

    #[test]
    fn test_bounds_degenerate() {
        assert_eq!(bounds(std::iter::empty()), [0.0, 1.0]);
        assert_eq!(bounds([2.0].into_iter()), [1.5, 2.5]);
        assert_eq!(bounds([f64::NAN].into_iter()), [0.0, 1.0]);
    }
}
