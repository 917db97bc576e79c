// =====================================================================================
// MONITORING CELL - METRICS, FAULT INJECTION & SERVICE IDENTITY
// =====================================================================================
//
// This cell provides:
// - A process-wide request counter and latency histogram
// - Prometheus text exposition of those metrics
// - Instrumentation middleware adding latency and synthetic failures
// - Identity and health endpoints
//
// =====================================================================================

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{HealthResponse, MetricsSnapshot, ServiceInfo};
pub use services::{Instrumentation, MetricsStore};

pub use router::create_monitoring_router;
pub use handlers::MonitoringHandlers;
