use std::sync::Arc;

use axum::{routing::get, Router};

use monitoring_cell::Instrumentation;
use shared_config::AppConfig;

use crate::handlers::{self, ScheduleHandlers};

pub const AVAILABLE_SCHEDULE_PATH: &str = "/appoints/available-schedule";

/// Mounts the schedule endpoint at the plain path and, when configured, under
/// the ingress prefix. Each mount is instrumented with its own route label.
pub fn create_schedule_router(
    config: Arc<AppConfig>,
    instrumentation: Arc<Instrumentation>,
    handlers: Arc<ScheduleHandlers>,
) -> Router {
    let mut router = Router::new().route(
        AVAILABLE_SCHEDULE_PATH,
        instrumentation.wrap(AVAILABLE_SCHEDULE_PATH, get(handlers::get_available_schedule)),
    );

    if config.has_prefix() {
        let prefixed = config.prefixed(AVAILABLE_SCHEDULE_PATH);
        router = router.route(
            &prefixed,
            instrumentation.wrap(prefixed.as_str(), get(handlers::get_available_schedule)),
        );
    }

    router.with_state(handlers)
}
