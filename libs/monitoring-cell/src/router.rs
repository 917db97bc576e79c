// =====================================================================================
// MONITORING CELL ROUTER
// =====================================================================================

use axum::{routing::get, Router};
use std::sync::Arc;

use crate::handlers::{get_health, get_metrics, get_service_info, MonitoringHandlers};
use crate::services::metrics::MetricsStore;
use shared_config::AppConfig;

/// Identity, health and metrics routes, mounted both with and without the
/// ingress prefix. None of them are instrumented.
pub fn create_monitoring_router(config: Arc<AppConfig>, metrics: Arc<MetricsStore>) -> Router {
    let handlers = Arc::new(MonitoringHandlers::new(config.clone(), metrics));

    let mut router = Router::new()
        .route("/", get(get_service_info))
        .route("/healthz", get(get_health))
        .route("/metrics", get(get_metrics));

    if config.has_prefix() {
        router = router
            .route(&config.route_prefix, get(get_service_info))
            .route(&config.prefixed("/healthz"), get(get_health))
            .route(&config.prefixed("/metrics"), get(get_metrics));
    }

    router.with_state(handlers)
}
