use std::sync::Arc;

use chrono::{DateTime, Days, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use tracing::debug;

use shared_utils::RandomSource;

use crate::models::{EntityRef, ScheduleDay, ScheduleError, Slot};
use crate::services::directory::Directory;

/// Business rules for synthesized calendars. All times are UTC.
#[derive(Debug, Clone)]
pub struct SchedulePolicy {
    pub min_days: u32,
    pub max_days: u32,
    pub default_days: u32,
    pub business_open: NaiveTime,
    pub business_close: NaiveTime,
    pub slot_interval: Duration,
    pub max_slots_per_day: usize,
    /// Minimum notice before the first bookable slot of the current day.
    pub lead_time: Duration,
    pub availability_ratio: f64,
}

impl Default for SchedulePolicy {
    fn default() -> Self {
        Self {
            min_days: 15,
            max_days: 30,
            default_days: 15,
            business_open: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
            business_close: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or_default(),
            slot_interval: Duration::minutes(30),
            max_slots_per_day: 8,
            lead_time: Duration::minutes(15),
            availability_ratio: 0.8,
        }
    }
}

impl SchedulePolicy {
    pub fn clamp_days(&self, requested: i64) -> u32 {
        requested
            .max(i64::from(self.min_days))
            .min(i64::from(self.max_days)) as u32
    }

    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.min_days > self.max_days {
            return Err(ScheduleError::InvalidPolicy(format!(
                "min_days {} exceeds max_days {}",
                self.min_days, self.max_days
            )));
        }
        if !(self.min_days..=self.max_days).contains(&self.default_days) {
            return Err(ScheduleError::InvalidPolicy(format!(
                "default_days {} outside {}..={}",
                self.default_days, self.min_days, self.max_days
            )));
        }
        if self.business_open > self.business_close {
            return Err(ScheduleError::InvalidPolicy(format!(
                "business_open {} is after business_close {}",
                self.business_open, self.business_close
            )));
        }
        if self.slot_interval <= Duration::zero() {
            return Err(ScheduleError::InvalidPolicy(
                "slot_interval must be positive".to_string(),
            ));
        }
        if self.max_slots_per_day == 0 {
            return Err(ScheduleError::InvalidPolicy(
                "max_slots_per_day must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.availability_ratio) {
            return Err(ScheduleError::InvalidPolicy(format!(
                "availability_ratio {} outside 0..=1",
                self.availability_ratio
            )));
        }
        Ok(())
    }
}

/// Past dates move up to today; anything else keeps only its calendar day.
pub fn normalize_start_date(requested: DateTime<Utc>, now: DateTime<Utc>) -> NaiveDate {
    let today = now.date_naive();
    let requested = requested.date_naive();
    if requested < today {
        today
    } else {
        requested
    }
}

/// Rounds up to the next `:00` or `:30` and drops seconds. Already aligned
/// minutes are left alone.
pub fn align_to_half_hour(t: DateTime<Utc>) -> DateTime<Utc> {
    let remainder = t.minute() % 30;
    let advanced = if remainder != 0 {
        t + Duration::minutes(i64::from(30 - remainder))
    } else {
        t
    };
    advanced
        .with_second(0)
        .and_then(|d| d.with_nanosecond(0))
        .unwrap_or(advanced)
}

#[derive(Debug)]
pub struct ScheduleGenerator {
    policy: SchedulePolicy,
    directory: Arc<Directory>,
}

impl Default for ScheduleGenerator {
    fn default() -> Self {
        Self {
            policy: SchedulePolicy::default(),
            directory: Arc::new(Directory::default()),
        }
    }
}

impl ScheduleGenerator {
    pub fn new(policy: SchedulePolicy, directory: Arc<Directory>) -> Result<Self, ScheduleError> {
        policy.validate()?;
        Ok(Self { policy, directory })
    }

    pub fn policy(&self) -> &SchedulePolicy {
        &self.policy
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Builds up to `requested_days` (after clamping) days of slots starting
    /// at `requested_start`. Days with no room left before closing are
    /// skipped, so fewer entries than requested may come back.
    ///
    /// Only slot availability consumes `random`; with a fixed source and a
    /// fixed `now` the output is fully deterministic.
    pub fn generate(
        &self,
        professional_id: i64,
        unit_id: i64,
        requested_days: i64,
        requested_start: DateTime<Utc>,
        now: DateTime<Utc>,
        random: &dyn RandomSource,
    ) -> Vec<ScheduleDay> {
        let policy = &self.policy;
        let days = policy.clamp_days(requested_days);

        let professional = self.directory.resolve_professional(professional_id);
        let unit = self.directory.resolve_unit(unit_id);

        let today = now.date_naive();
        let base_date = normalize_start_date(requested_start, now);

        let mut schedule = Vec::with_capacity(days as usize);
        for offset in 0..days {
            let Some(date) = base_date.checked_add_days(Days::new(u64::from(offset))) else {
                break;
            };

            let open = Utc.from_utc_datetime(&date.and_time(policy.business_open));
            let close = Utc.from_utc_datetime(&date.and_time(policy.business_close));

            let mut start = if offset == 0 && date == today {
                align_to_half_hour(now + policy.lead_time)
            } else {
                open
            };
            if start < open {
                start = open;
            }
            if start > close {
                debug!("Skipping {}: first slot {} is past closing", date, start.format("%H:%M"));
                continue;
            }

            let mut slots = Vec::with_capacity(policy.max_slots_per_day);
            while slots.len() < policy.max_slots_per_day && start <= close {
                let end = start + policy.slot_interval;
                slots.push(Slot {
                    start: start.time(),
                    end: end.time(),
                    available: random.chance(policy.availability_ratio),
                });
                start = end;
            }

            schedule.push(ScheduleDay {
                professional: EntityRef::from(professional),
                unit: EntityRef::from(unit),
                room: unit.room.clone(),
                specialty: professional.specialty.clone(),
                date,
                slots,
            });
        }

        schedule
    }
}
