use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use tracing::debug;

use shared_utils::RandomSource;

use crate::models::{AvailableScheduleQuery, AvailableScheduleResponse, ScheduleFilters};
use crate::services::generator::{normalize_start_date, ScheduleGenerator};

pub struct ScheduleHandlers {
    generator: ScheduleGenerator,
    random: Arc<dyn RandomSource>,
}

impl ScheduleHandlers {
    pub fn new(generator: ScheduleGenerator, random: Arc<dyn RandomSource>) -> Self {
        Self { generator, random }
    }

    /// Builds the full response for `query` as seen at `now`.
    pub fn available_schedule(
        &self,
        query: &AvailableScheduleQuery,
        now: DateTime<Utc>,
    ) -> AvailableScheduleResponse {
        let policy = self.generator.policy();
        let days_requested = query.days.unwrap_or(i64::from(policy.default_days));
        let days_returned = policy.clamp_days(days_requested);

        let requested_start = query
            .start_date
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|midnight| Utc.from_utc_datetime(&midnight))
            .unwrap_or(now);

        debug!(
            "Generating {} days for professional {} at unit {}",
            days_returned, query.professional_id, query.unit_id
        );

        let days = self.generator.generate(
            query.professional_id,
            query.unit_id,
            i64::from(days_returned),
            requested_start,
            now,
            self.random.as_ref(),
        );

        AvailableScheduleResponse {
            success: true,
            filters: ScheduleFilters {
                generated_at: now.to_rfc3339_opts(SecondsFormat::Secs, true),
                professional_id: query.professional_id,
                unit_id: query.unit_id,
                days_requested,
                days_returned,
                start_date_requested: query.start_date_raw.clone(),
                start_date_applied: normalize_start_date(requested_start, now),
            },
            days,
        }
    }
}

pub async fn get_available_schedule(
    State(handlers): State<Arc<ScheduleHandlers>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<AvailableScheduleResponse> {
    let query = AvailableScheduleQuery::from_params(&params);
    Json(handlers.available_schedule(&query, Utc::now()))
}
