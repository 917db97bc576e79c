// =====================================================================================
// MONITORING CELL MODELS
// =====================================================================================

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub service: String,
    pub status: String,
    pub endpoints: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Point-in-time copy of the metrics store.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub requests: BTreeMap<String, BTreeMap<u16, u64>>,
    pub boundaries: Vec<f64>,
    /// Per-slot (non-cumulative) counts, one longer than `boundaries`.
    pub bucket_counts: Vec<u64>,
    pub sum: f64,
    pub count: u64,
}

impl MetricsSnapshot {
    pub fn requests_for(&self, route: &str, status: u16) -> u64 {
        self.requests
            .get(route)
            .and_then(|statuses| statuses.get(&status))
            .copied()
            .unwrap_or(0)
    }

    /// Running totals across the boundaries, ending with the `+Inf` bucket.
    pub fn cumulative_buckets(&self) -> Vec<u64> {
        self.bucket_counts
            .iter()
            .scan(0, |total, slot| {
                *total += slot;
                Some(*total)
            })
            .collect()
    }
}
