//! Presentation seam: the orchestrator talks to a `Presenter`, the binary
//! plugs in a terminal one.

use std::io::Write;

use crate::view::{ChartSeries, DashboardView};

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

pub trait Presenter: Send + 'static {
    /// Show the spinner; hide the main and error panels.
    fn show_loading(&mut self);

    /// Hide the spinner and main panel; show `message` in the error panel.
    fn show_error(&mut self, message: &str);

    /// Hide the spinner; show the main panel with `view`.
    fn render(&mut self, view: &DashboardView);
}

/// A drawn temperature chart. Owned by whoever rendered it and released
/// before the next one is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureChart {
    labels: Vec<String>,
    line: String,
}

impl TemperatureChart {
    pub fn new(series: &ChartSeries) -> Self {
        let (min, max) = series
            .highs
            .iter()
            .flatten()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(*v), hi.max(*v))
            });
        let span = max - min;

        let line = series
            .highs
            .iter()
            .map(|high| {
                let Some(v) = high else {
                    return ' ';
                };
                let level = if span > 0.0 {
                    (((v - min) / span) * (SPARK_LEVELS.len() - 1) as f64).round() as usize
                } else {
                    SPARK_LEVELS.len() / 2
                };
                SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
            })
            .collect();

        Self {
            labels: series.labels.clone(),
            line,
        }
    }

    pub fn line(&self) -> &str {
        &self.line
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Release the chart.
    pub fn destroy(self) {
        tracing::trace!("Released chart with {} points", self.labels.len());
    }
}

/// Writes the dashboard as text.
pub struct TerminalPresenter<W: Write + Send + 'static> {
    out: W,
    chart: Option<TemperatureChart>,
}

impl<W: Write + Send + 'static> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out, chart: None }
    }

    pub fn chart(&self) -> Option<&TemperatureChart> {
        self.chart.as_ref()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Replace the current chart: the old instance is released first.
    fn replace_chart(&mut self, series: &ChartSeries) -> &TemperatureChart {
        if let Some(previous) = self.chart.take() {
            previous.destroy();
        }
        self.chart.insert(TemperatureChart::new(series))
    }

    fn write_dashboard(&mut self, view: &DashboardView) -> std::io::Result<()> {
        let chart = self.replace_chart(&view.chart).clone();
        let out = &mut self.out;

        writeln!(out, "{}", view.location_name)?;
        writeln!(out, "{}", view.date_label)?;
        writeln!(out)?;
        writeln!(out, "  {}  {}", view.temperature, view.description)?;
        writeln!(out, "  {}", view.humidity)?;
        writeln!(out, "  {}", view.wind)?;
        writeln!(out, "  {}", view.icon_url)?;
        writeln!(out)?;
        writeln!(out, "  Highs: {}  ({})", chart.line(), chart.labels().join(" "))?;
        writeln!(out)?;
        for row in &view.forecast {
            writeln!(out, "  {:<4} {:<12} {}", row.day, row.range, row.icon_url)?;
        }
        out.flush()
    }
}

impl<W: Write + Send + 'static> Presenter for TerminalPresenter<W> {
    fn show_loading(&mut self) {
        if let Err(e) = writeln!(self.out, "Loading...") {
            tracing::warn!("Failed to write loading indicator: {}", e);
        }
    }

    fn show_error(&mut self, message: &str) {
        if let Err(e) = writeln!(self.out, "Error: {}", message) {
            tracing::warn!("Failed to write error: {}", e);
        }
    }

    fn render(&mut self, view: &DashboardView) {
        if let Err(e) = self.write_dashboard(view) {
            tracing::warn!("Failed to write dashboard: {}", e);
        }
    }
}
