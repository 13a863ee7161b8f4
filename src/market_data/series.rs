use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SeriesError;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A single OHLCV bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Time-ordered OHLCV bars for one symbol.
///
/// Timestamps are strictly increasing.  The series is immutable once built;
/// indicator code only ever borrows it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OhlcvSeries {
    bars: Vec<Bar>,
}

impl OhlcvSeries {
    /// Build a series, rejecting out-of-order or duplicate timestamps.
    pub fn new(bars: Vec<Bar>) -> Result<Self, SeriesError> {
        for (index, pair) in bars.windows(2).enumerate() {
            let (prev, cur) = (&pair[0], &pair[1]);
            let timestamp = cur.timestamp.timestamp();
            if cur.timestamp == prev.timestamp {
                return Err(SeriesError::DuplicateTimestamp { index: index + 1, timestamp });
            }
            if cur.timestamp < prev.timestamp {
                return Err(SeriesError::OutOfOrder { index: index + 1, timestamp });
            }
        }
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.bars.iter().map(|b| b.timestamp).collect()
    }

    pub fn opens(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.open).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }
}

// ---------------------------------------------------------------------------
// SeriesBuilder -- tolerant assembly of provider rows
// ---------------------------------------------------------------------------

/// Accumulates provider rows into a valid [`OhlcvSeries`].
///
/// * A row with the same timestamp as the last accepted bar replaces it
///   (providers re-send the in-progress bar with updated values).
/// * A row older than the last accepted bar is dropped and counted.
#[derive(Debug, Default)]
pub struct SeriesBuilder {
    bars: Vec<Bar>,
    dropped: usize,
}

impl SeriesBuilder {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bars: Vec::with_capacity(capacity),
            dropped: 0,
        }
    }

    pub fn push(&mut self, bar: Bar) {
        if let Some(last) = self.bars.last() {
            if bar.timestamp == last.timestamp {
                self.bars.pop();
            } else if bar.timestamp < last.timestamp {
                self.dropped += 1;
                return;
            }
        }
        self.bars.push(bar);
    }

    /// Number of rows rejected for going backwards in time.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn build(self) -> Result<OhlcvSeries, SeriesError> {
        OhlcvSeries::new(self.bars)
    }
}
