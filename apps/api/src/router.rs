use std::sync::Arc;

use axum::Router;

use monitoring_cell::{create_monitoring_router, handlers::not_found, Instrumentation, MetricsStore};
use schedule_cell::{create_schedule_router, handlers::ScheduleHandlers, ScheduleGenerator};
use shared_config::AppConfig;
use shared_utils::{RandomSource, ThreadRandom};

pub fn create_router(config: Arc<AppConfig>) -> Router {
    create_router_with_random(config, Arc::new(ThreadRandom))
}

/// Assembles the whole service around one metrics store and one random
/// source, shared by the fault injector and the slot generator.
pub fn create_router_with_random(config: Arc<AppConfig>, random: Arc<dyn RandomSource>) -> Router {
    let metrics = Arc::new(MetricsStore::default());
    let instrumentation = Arc::new(Instrumentation::new(&config, metrics.clone(), random.clone()));
    let schedule_handlers = Arc::new(ScheduleHandlers::new(ScheduleGenerator::default(), random));

    Router::new()
        .merge(create_monitoring_router(config.clone(), metrics))
        .merge(create_schedule_router(config, instrumentation, schedule_handlers))
        .fallback(not_found)
}
