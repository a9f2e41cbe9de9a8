//! Chart state shared between the result view and the dashboard.

use crate::ChartData;

/// Holds the chart currently on screen, its summary sentence, and the
/// charts pinned to the dashboard.
#[derive(Debug, Default)]
pub struct ChartDataStore {
    chart: Option<ChartData>,
    summary: Option<String>,
    dashboard: Vec<ChartData>,
}

impl ChartDataStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            chart: None,
            summary: None,
            dashboard: Vec::new(),
        }
    }

    /// Replaces the current chart.
    pub fn set_chart(&mut self, chart: ChartData) {
        self.chart = Some(chart);
    }

    /// The current chart.
    #[must_use]
    pub const fn chart(&self) -> Option<&ChartData> {
        self.chart.as_ref()
    }

    /// Replaces the summary text.
    pub fn set_summary(&mut self, summary: impl Into<String>) {
        self.summary = Some(summary.into());
    }

    /// The summary text.
    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Appends a chart to the dashboard.
    pub fn push_dashboard(&mut self, chart: ChartData) {
        log::debug!("Dashboard now holds {} charts", self.dashboard.len() + 1);
        self.dashboard.push(chart);
    }

    /// Dashboard charts in insertion order.
    #[must_use]
    pub fn dashboard(&self) -> &[ChartData] {
        &self.dashboard
    }
}
