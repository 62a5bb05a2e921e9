//! Bounded, newest-first history of completed predictions.
//!
//! The store backs both the recent-predictions read path and the lag
//! features of the zone-variant encoder. It is a plain owned value; callers
//! that share it across requests wrap it in a lock (see
//! [`crate::pipeline::PredictionService`]).

use std::collections::VecDeque;

use serde::{Serialize, Serializer};

use crate::features::FeatureLayout;
use crate::types::{InputSummary, Timestamp};

/// Default number of entries retained.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Lag value used when the requested position has no entry.
pub const LAG_DEFAULT: f64 = 30.0;

/// Display format for entry timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One completed prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: Timestamp,
    pub prediction: f64,
    pub zone: String,
    pub input_summary: InputSummary,
    /// Regressor that produced the prediction. Only zone entries feed lags.
    #[serde(skip)]
    pub layout: FeatureLayout,
}

impl HistoryEntry {
    pub fn new(
        timestamp: Timestamp,
        prediction: f64,
        zone: impl Into<String>,
        input_summary: InputSummary,
    ) -> Self {
        Self {
            timestamp,
            prediction,
            zone: zone.into(),
            input_summary,
            layout: FeatureLayout::Zone,
        }
    }

    pub fn with_layout(mut self, layout: FeatureLayout) -> Self {
        self.layout = layout;
        self
    }
}

fn serialize_timestamp<S: Serializer>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&ts.format(TIMESTAMP_FORMAT))
}

/// Ring of the most recent predictions, newest at index 0.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl HistoryStore {
    /// Create an empty store. A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert at the head, evicting the oldest entries beyond capacity.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    /// Zone prediction `k` steps back (1 = most recent), or [`LAG_DEFAULT`].
    ///
    /// Geo entries are skipped; they come from a different regressor.
    pub fn lag(&self, k: usize) -> f64 {
        k.checked_sub(1)
            .and_then(|i| {
                self.entries
                    .iter()
                    .filter(|e| e.layout == FeatureLayout::Zone)
                    .nth(i)
            })
            .map_or(LAG_DEFAULT, |e| e.prediction)
    }

    /// Copy of all entries, newest first.
    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }
}
