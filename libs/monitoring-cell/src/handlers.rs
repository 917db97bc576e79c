// =====================================================================================
// MONITORING CELL HANDLERS
// =====================================================================================

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::models::{HealthResponse, ServiceInfo};
use crate::services::metrics::{MetricsStore, CONTENT_TYPE};
use shared_config::AppConfig;
use shared_models::AppError;

pub struct MonitoringHandlers {
    config: Arc<AppConfig>,
    metrics: Arc<MetricsStore>,
}

impl MonitoringHandlers {
    pub fn new(config: Arc<AppConfig>, metrics: Arc<MetricsStore>) -> Self {
        Self { config, metrics }
    }

    /// Endpoints advertised on the identity page, using the ingress prefix.
    pub fn advertised_endpoints(&self) -> Vec<String> {
        ["/appoints/available-schedule", "/healthz", "/metrics"]
            .iter()
            .map(|path| self.config.prefixed(path))
            .collect()
    }
}

pub async fn get_service_info(
    State(handlers): State<Arc<MonitoringHandlers>>,
) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: handlers.config.service_name.clone(),
        status: "ok".to_string(),
        endpoints: handlers.advertised_endpoints(),
    })
}

pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

pub async fn get_metrics(State(handlers): State<Arc<MonitoringHandlers>>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, CONTENT_TYPE)], handlers.metrics.render())
}

pub async fn not_found() -> AppError {
    AppError::NotFound
}
