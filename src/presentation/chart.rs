// =============================================================================
// Chart specifications — renderer-neutral description of one figure
// =============================================================================

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Which y-axis a trace is drawn against.  `Secondary` is a lower panel
/// sharing the x-axis (e.g. volume under price).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Primary,
    Secondary,
}

/// One series within a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trace {
    Candlestick {
        name: String,
        x: Vec<DateTime<Utc>>,
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
    },
    /// Undefined points serialise as `null` and render as gaps.
    Line {
        name: String,
        x: Vec<DateTime<Utc>>,
        y: Vec<Option<f64>>,
        axis: Axis,
    },
    Bar {
        name: String,
        x: Vec<DateTime<Utc>>,
        y: Vec<f64>,
        axis: Axis,
    },
}

#[cfg(test)]
impl Trace {
    pub fn name(&self) -> &str {
        match self {
            Self::Candlestick { name, .. } | Self::Line { name, .. } | Self::Bar { name, .. } => name,
        }
    }

    pub fn x(&self) -> &[DateTime<Utc>] {
        match self {
            Self::Candlestick { x, .. } | Self::Line { x, .. } | Self::Bar { x, .. } => x,
        }
    }
}

/// A complete figure: title, axis labels and traces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Label of the secondary panel, when any trace uses it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y2_label: Option<String>,
    pub traces: Vec<Trace>,
}

impl ChartSpec {
    pub fn new(title: impl Into<String>, y_label: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_label: "Date".to_string(),
            y_label: y_label.into(),
            y2_label: None,
            traces: Vec::new(),
        }
    }

    pub fn with_secondary(mut self, label: impl Into<String>) -> Self {
        self.y2_label = Some(label.into());
        self
    }

    pub fn push(&mut self, trace: Trace) {
        self.traces.push(trace);
    }

    #[cfg(test)]
    pub fn trace(&self, name: &str) -> Option<&Trace> {
        self.traces.iter().find(|t| t.name() == name)
    }
}

/// Last `tail` elements of a slice (all of it when shorter).
pub fn tail<T: Clone>(values: &[T], tail: usize) -> Vec<T> {
    values[values.len().saturating_sub(tail)..].to_vec()
}
