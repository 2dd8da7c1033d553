//! Aggregated run statistics

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Longest example message retained per status
const EXAMPLE_LIMIT: usize = 200;

/// Pseudo-status for outcomes with no HTTP response
pub const STATUS_TRANSPORT_FAILURE: u16 = 0;

/// Per-status aggregation of a bulk run
///
/// Accounting is closed-world: every issued request lands in exactly one
/// status bucket, with transport and encoding failures grouped under
/// [`STATUS_TRANSPORT_FAILURE`]. The example message for a status is the
/// snippet of the first request (in completion order) that produced it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// Outcome count per status code
    pub total_per_status: HashMap<u16, usize>,

    /// First observed snippet or error text per status, truncated
    pub example_message: HashMap<u16, String>,
}

impl RunStats {
    /// Create empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed HTTP response
    pub fn record_response(&mut self, status: u16, snippet: &str) {
        *self.total_per_status.entry(status).or_default() += 1;
        self.example_message
            .entry(status)
            .or_insert_with(|| truncate_example(snippet));
    }

    /// Record one transport or encoding failure
    pub fn record_failure(&mut self, reason: &str) {
        *self
            .total_per_status
            .entry(STATUS_TRANSPORT_FAILURE)
            .or_default() += 1;
        self.example_message
            .entry(STATUS_TRANSPORT_FAILURE)
            .or_insert_with(|| truncate_example(reason));
    }

    /// Total outcomes across all statuses
    pub fn total(&self) -> usize {
        self.total_per_status.values().sum()
    }

    /// Outcomes with a 2xx status
    pub fn success_total(&self) -> usize {
        self.total_per_status
            .iter()
            .filter(|(status, _)| (200..300).contains(*status))
            .map(|(_, count)| count)
            .sum()
    }

    /// Outcomes outside 2xx, pseudo-status 0 included
    pub fn failure_total(&self) -> usize {
        self.total() - self.success_total()
    }
}

// Char-based so a multibyte snippet can never split a code point.
fn truncate_example(text: &str) -> String {
    if text.chars().count() > EXAMPLE_LIMIT {
        let mut truncated: String = text.chars().take(EXAMPLE_LIMIT).collect();
        truncated.push_str("...");
        truncated
    } else {
        text.to_string()
    }
}
