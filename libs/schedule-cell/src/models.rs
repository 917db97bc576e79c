use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PROFESSIONAL_ID: i64 = 4102;
pub const DEFAULT_UNIT_ID: i64 = 108;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specialty {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Professional {
    pub id: i64,
    pub name: String,
    pub specialty: Specialty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: i64,
    pub name: String,
    pub room: Room,
}

/// Display copy of a directory entry embedded in each day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: i64,
    pub name: String,
}

impl From<&Professional> for EntityRef {
    fn from(professional: &Professional) -> Self {
        Self {
            id: professional.id,
            name: professional.name.clone(),
        }
    }
}

impl From<&Unit> for EntityRef {
    fn from(unit: &Unit) -> Self {
        Self {
            id: unit.id,
            name: unit.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    #[serde(with = "hour_minute")]
    pub start: NaiveTime,
    #[serde(with = "hour_minute")]
    pub end: NaiveTime,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDay {
    pub professional: EntityRef,
    pub unit: EntityRef,
    pub room: Room,
    pub specialty: Specialty,
    pub date: NaiveDate,
    pub slots: Vec<Slot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleFilters {
    pub generated_at: String,
    pub professional_id: i64,
    pub unit_id: i64,
    pub days_requested: i64,
    pub days_returned: u32,
    pub start_date_requested: Option<String>,
    pub start_date_applied: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableScheduleResponse {
    pub success: bool,
    pub filters: ScheduleFilters,
    #[serde(rename = "response")]
    pub days: Vec<ScheduleDay>,
}

/// Query parameters after lenient coercion. Nothing here can reject a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableScheduleQuery {
    pub professional_id: i64,
    pub unit_id: i64,
    /// `None` when absent, unparsable or not positive.
    pub days: Option<i64>,
    pub start_date: Option<NaiveDate>,
    /// Raw `start_date` as sent, echoed back in the filters.
    pub start_date_raw: Option<String>,
}

impl AvailableScheduleQuery {
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let int_param = |key: &str| {
            params
                .get(key)
                .and_then(|raw| raw.trim().parse::<i64>().ok())
        };
        let non_zero_or = |key: &str, fallback: i64| {
            int_param(key).filter(|id| *id != 0).unwrap_or(fallback)
        };

        let start_date_raw = params
            .get("start_date")
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty());
        let start_date = start_date_raw
            .as_deref()
            .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok());

        Self {
            professional_id: non_zero_or("professional_id", DEFAULT_PROFESSIONAL_ID),
            unit_id: non_zero_or("unit_id", DEFAULT_UNIT_ID),
            days: int_param("days").filter(|days| *days > 0),
            start_date,
            start_date_raw,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("Directory table '{0}' must have at least one entry")]
    EmptyDirectory(&'static str),

    #[error("Invalid schedule policy: {0}")]
    InvalidPolicy(String),
}

mod hour_minute {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_query_defaults() {
        let query = AvailableScheduleQuery::from_params(&params(&[]));
        assert_eq!(query.professional_id, DEFAULT_PROFESSIONAL_ID);
        assert_eq!(query.unit_id, DEFAULT_UNIT_ID);
        assert_eq!(query.days, None);
        assert_eq!(query.start_date, None);
        assert_eq!(query.start_date_raw, None);
    }

    #[test]
    fn test_query_coerces_garbage() {
        let query = AvailableScheduleQuery::from_params(&params(&[
            ("professional_id", "abc"),
            ("unit_id", "0"),
            ("days", "-3"),
            ("start_date", "15-01-2024"),
        ]));
        assert_eq!(query.professional_id, DEFAULT_PROFESSIONAL_ID);
        assert_eq!(query.unit_id, DEFAULT_UNIT_ID);
        assert_eq!(query.days, None);
        assert_eq!(query.start_date, None);
        assert_eq!(query.start_date_raw.as_deref(), Some("15-01-2024"));
    }

    #[test]
    fn test_query_parses_valid_values() {
        let query = AvailableScheduleQuery::from_params(&params(&[
            ("professional_id", "2684"),
            ("unit_id", "901"),
            ("days", "20"),
            ("start_date", "2024-01-15"),
        ]));
        assert_eq!(query.professional_id, 2684);
        assert_eq!(query.unit_id, 901);
        assert_eq!(query.days, Some(20));
        assert_eq!(query.start_date, NaiveDate::from_ymd_opt(2024, 1, 15));
    }

    #[test]
    fn test_invalid_calendar_date_is_ignored() {
        let query = AvailableScheduleQuery::from_params(&params(&[("start_date", "2024-13-45")]));
        assert_eq!(query.start_date, None);
    }

    #[test]
    fn test_slot_serializes_as_hour_minute() {
        let slot = Slot {
            start: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            end: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            available: true,
        };
        let json = serde_json::to_value(&slot).unwrap();
        assert_eq!(json, serde_json::json!({"start": "09:30", "end": "10:00", "available": true}));

        let back: Slot = serde_json::from_value(json).unwrap();
        assert_eq!(back, slot);
    }
}
