use std::sync::Arc;
use std::time::Duration;

use shared_config::AppConfig;

/// Builder for configurations used across cell tests. Defaults disable fault
/// injection and extra latency so responses are predictable.
pub struct TestConfig {
    pub service_name: String,
    pub error_rate: f64,
    pub extra_latency_ms: u64,
    pub route_prefix: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            service_name: "available-schedules-test".to_string(),
            error_rate: 0.0,
            extra_latency_ms: 0,
            route_prefix: "/v2".to_string(),
        }
    }
}

impl TestConfig {
    pub fn failing() -> Self {
        Self {
            error_rate: 1.0,
            ..Self::default()
        }
    }

    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        self.extra_latency_ms = latency_ms;
        self
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.route_prefix = prefix.to_string();
        self
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            service_name: self.service_name.clone(),
            error_rate: self.error_rate,
            extra_latency: Duration::from_millis(self.extra_latency_ms),
            route_prefix: self.route_prefix.clone(),
            ..AppConfig::default()
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}
