// =====================================================================================
// REQUEST INSTRUMENTATION - LATENCY, FAULT INJECTION & METRICS
// =====================================================================================

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::MethodRouter,
};
use tracing::{error, field, info, info_span, Instrument, Span};

use shared_config::AppConfig;
use shared_models::AppError;
use shared_utils::RandomSource;

use crate::services::metrics::MetricsStore;

/// Cross-cutting behaviour shared by every instrumented route.
pub struct Instrumentation {
    service_name: String,
    error_rate: f64,
    extra_delay: Duration,
    metrics: Arc<MetricsStore>,
    random: Arc<dyn RandomSource>,
}

impl Instrumentation {
    pub fn new(
        config: &AppConfig,
        metrics: Arc<MetricsStore>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            service_name: config.service_name.clone(),
            error_rate: config.error_rate,
            extra_delay: config.extra_latency,
            metrics,
            random,
        }
    }

    pub fn metrics(&self) -> Arc<MetricsStore> {
        self.metrics.clone()
    }

    /// Wraps `method_router` so each request through it is delayed, possibly
    /// failed on purpose, logged, and observed once under `route`.
    pub fn wrap<S>(self: &Arc<Self>, route: impl Into<String>, method_router: MethodRouter<S>) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let target = InstrumentedRoute {
            instrumentation: self.clone(),
            route: Arc::from(route.into()),
        };
        method_router.layer(middleware::from_fn_with_state(target, instrument))
    }
}

#[derive(Clone)]
pub struct InstrumentedRoute {
    instrumentation: Arc<Instrumentation>,
    route: Arc<str>,
}

pub async fn instrument(
    State(target): State<InstrumentedRoute>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let span = info_span!(
        "request",
        service = %target.instrumentation.service_name,
        route = &*target.route,
        "error.type" = field::Empty
    );
    observe_request(target, request, next).instrument(span).await
}

async fn observe_request(target: InstrumentedRoute, request: Request<Body>, next: Next) -> Response {
    let inst = &target.instrumentation;
    let route = &*target.route;
    let start = Instant::now();

    if !inst.extra_delay.is_zero() {
        tokio::time::sleep(inst.extra_delay).await;
    }

    let simulated = inst.random.chance(inst.error_rate);
    let response = if simulated {
        Span::current().record("error.type", "simulated_failure");
        AppError::SimulatedFailure.into_response()
    } else {
        next.run(request).await
    };

    let status = response.status().as_u16();
    let elapsed = start.elapsed();
    let latency_ms = elapsed.as_secs_f64() * 1000.0;

    if simulated {
        error!(
            service = %inst.service_name,
            route,
            status,
            latency_ms,
            note = "simulated failure",
            "request failed"
        );
    } else {
        info!(
            service = %inst.service_name,
            route,
            status,
            latency_ms,
            "request completed"
        );
    }

    inst.metrics.observe(route, status, elapsed.as_secs_f64());
    response
}
