// =====================================================================================
// METRICS STORE - REQUEST COUNTERS & LATENCY HISTOGRAM
// =====================================================================================

use std::collections::BTreeMap;
use std::fmt::Write as _;

use parking_lot::Mutex;
use tracing::debug;

use crate::models::MetricsSnapshot;

pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Latency histogram boundaries in seconds.
pub const DEFAULT_BUCKETS: [f64; 9] = [0.05, 0.1, 0.2, 0.3, 0.5, 0.75, 1.0, 2.0, 5.0];

#[derive(Debug)]
struct MetricsState {
    counts: BTreeMap<String, BTreeMap<u16, u64>>,
    bucket_counts: Vec<u64>,
    sum: f64,
    count: u64,
}

/// Process-wide request counter plus one shared latency histogram.
///
/// `observe` and `render` take the same lock, so a render never sees a
/// half-applied observation. Each observation lands in exactly one bucket
/// slot; the cumulative view is computed while rendering.
#[derive(Debug)]
pub struct MetricsStore {
    boundaries: Vec<f64>,
    state: Mutex<MetricsState>,
}

impl Default for MetricsStore {
    fn default() -> Self {
        Self::new(DEFAULT_BUCKETS.to_vec())
    }
}

impl MetricsStore {
    pub fn new(mut boundaries: Vec<f64>) -> Self {
        boundaries.retain(|b| b.is_finite());
        boundaries.sort_by(f64::total_cmp);
        boundaries.dedup();

        // last slot is +Inf
        let bucket_counts = vec![0; boundaries.len() + 1];

        Self {
            boundaries,
            state: Mutex::new(MetricsState {
                counts: BTreeMap::new(),
                bucket_counts,
                sum: 0.0,
                count: 0,
            }),
        }
    }

    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    pub fn observe(&self, route: &str, status: u16, duration_seconds: f64) {
        let slot = self
            .boundaries
            .iter()
            .position(|boundary| duration_seconds <= *boundary)
            .unwrap_or(self.boundaries.len());

        let mut state = self.state.lock();
        *state
            .counts
            .entry(route.to_string())
            .or_default()
            .entry(status)
            .or_insert(0) += 1;
        state.sum += duration_seconds;
        state.count += 1;
        state.bucket_counts[slot] += 1;
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let state = self.state.lock();
        MetricsSnapshot {
            requests: state.counts.clone(),
            boundaries: self.boundaries.clone(),
            bucket_counts: state.bucket_counts.clone(),
            sum: state.sum,
            count: state.count,
        }
    }

    /// Prometheus text exposition of every counter and the histogram.
    pub fn render(&self) -> String {
        let state = self.state.lock();
        let mut out = String::new();

        out.push_str("# HELP http_requests_total Total HTTP requests\n");
        out.push_str("# TYPE http_requests_total counter\n");
        for (route, statuses) in &state.counts {
            for (status, value) in statuses {
                let _ = writeln!(
                    out,
                    "http_requests_total{{route=\"{}\",status=\"{}\"}} {}",
                    escape_label(route),
                    status,
                    value
                );
            }
        }

        out.push_str("# HELP http_request_duration_seconds Request latency in seconds\n");
        out.push_str("# TYPE http_request_duration_seconds histogram\n");
        let mut cumulative = 0;
        for (boundary, slot) in self.boundaries.iter().zip(&state.bucket_counts) {
            cumulative += slot;
            let _ = writeln!(
                out,
                "http_request_duration_seconds_bucket{{le=\"{}\"}} {}",
                boundary, cumulative
            );
        }
        cumulative += state.bucket_counts[self.boundaries.len()];
        let _ = writeln!(
            out,
            "http_request_duration_seconds_bucket{{le=\"+Inf\"}} {}",
            cumulative
        );
        let _ = writeln!(out, "http_request_duration_seconds_sum {:.6}", state.sum);
        let _ = writeln!(out, "http_request_duration_seconds_count {}", state.count);

        debug!("Rendered metrics for {} observations", state.count);
        out
    }
}

fn escape_label(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_slot_count_matches_boundaries() {
        let store = MetricsStore::new(vec![0.5, 0.1, 1.0, 0.1]);
        assert_eq!(store.boundaries(), &[0.1, 0.5, 1.0]);
        assert_eq!(store.snapshot().bucket_counts.len(), 4);
    }

    #[test]
    fn test_observe_hits_single_slot() {
        let store = MetricsStore::new(vec![0.1, 0.5, 1.0]);

        store.observe("/a", 200, 0.1);
        assert_eq!(store.snapshot().bucket_counts, vec![1, 0, 0, 0]);

        store.observe("/a", 200, 0.3);
        assert_eq!(store.snapshot().bucket_counts, vec![1, 1, 0, 0]);

        store.observe("/a", 500, 7.0);
        assert_eq!(store.snapshot().bucket_counts, vec![1, 1, 0, 1]);
    }

    #[test]
    fn test_escape_label() {
        assert_eq!(escape_label(r#"/a"b\c"#), r#"/a\"b\\c"#);
        assert_eq!(escape_label("x\ny"), "x\\ny");
    }

    #[test]
    fn test_render_empty_store() {
        let store = MetricsStore::default();
        let text = store.render();
        assert!(text.contains("# TYPE http_requests_total counter"));
        assert!(text.contains("http_request_duration_seconds_bucket{le=\"0.05\"} 0"));
        assert!(text.contains("http_request_duration_seconds_bucket{le=\"1\"} 0"));
        assert!(text.contains("http_request_duration_seconds_bucket{le=\"+Inf\"} 0"));
        assert!(text.contains("http_request_duration_seconds_sum 0.000000"));
        assert!(text.contains("http_request_duration_seconds_count 0"));
    }
}
