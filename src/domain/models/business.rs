use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use sqlx::FromRow;
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Business {
    pub id: String,
    pub name: String,
    pub timezone: String,
    pub created_at: DateTime<Utc>,
}

impl Business {
    pub fn new(name: String, timezone: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            timezone,
            created_at: Utc::now(),
        }
    }

    /// Zone of a stored business. Names are checked on creation, so a row
    /// that no longer parses is a server-side fault.
    pub fn zone(&self) -> Result<Tz, AppError> {
        self.timezone.parse::<Tz>()
            .map_err(|_| AppError::Internal(format!("Business {} has an invalid stored timezone '{}'", self.id, self.timezone)))
    }
}

/// Weekly opening window. A weekday without a row is closed.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct BusinessHours {
    pub id: String,
    pub business_id: String,
    pub weekday: String,
    pub open_time: String,
    pub close_time: String,
}

impl BusinessHours {
    pub fn new(business_id: String, weekday: Weekday, open_time: String, close_time: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            business_id,
            weekday: weekday_key(weekday).to_string(),
            open_time,
            close_time,
        }
    }
}

/// Date-specific replacement for the weekly hours.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ScheduleException {
    pub id: String,
    pub business_id: String,
    pub date: NaiveDate,
    pub is_day_off: bool,
    pub open_time: Option<String>,
    pub close_time: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ScheduleException {
    pub fn new(business_id: String, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            business_id,
            date,
            is_day_off: false,
            open_time: None,
            close_time: None,
            created_at: Utc::now(),
        }
    }
}

pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu,
    Weekday::Fri, Weekday::Sat, Weekday::Sun,
];

pub fn weekday_key(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MONDAY",
        Weekday::Tue => "TUESDAY",
        Weekday::Wed => "WEDNESDAY",
        Weekday::Thu => "THURSDAY",
        Weekday::Fri => "FRIDAY",
        Weekday::Sat => "SATURDAY",
        Weekday::Sun => "SUNDAY",
    }
}

pub fn parse_weekday(key: &str) -> Option<Weekday> {
    WEEKDAYS.iter().copied().find(|d| weekday_key(*d).eq_ignore_ascii_case(key.trim()))
}

/// Display name used in availability payloads.
pub fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
