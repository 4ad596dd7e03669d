use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use crate::domain::models::business::{
    parse_weekday, weekday_key, weekday_label, BusinessHours, ScheduleException, WEEKDAYS,
};
use crate::error::AppError;

pub const MINUTES_PER_DAY: u32 = 1440;

/// Opening window of a single calendar day, in minutes since local midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub open_min: u32,
    pub close_min: u32,
}

impl DayWindow {
    pub fn new(open: NaiveTime, close: NaiveTime) -> Option<Self> {
        let open_min = open.hour() * 60 + open.minute();
        let mut close_min = close.hour() * 60 + close.minute();
        // "23:59" closes at midnight
        if close_min == MINUTES_PER_DAY - 1 {
            close_min = MINUTES_PER_DAY;
        }
        if open_min >= close_min {
            return None;
        }
        Some(Self { open_min, close_min })
    }

    pub fn fits(&self, start_min: u32, duration_min: u32) -> bool {
        start_min >= self.open_min && start_min + duration_min <= self.close_min
    }
}

pub fn parse_clock(value: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| AppError::Validation(format!("Invalid time '{}', expected HH:MM", value)))
}

fn window_from_strings(open: &str, close: &str) -> Option<DayWindow> {
    match (parse_clock(open), parse_clock(close)) {
        (Ok(o), Ok(c)) => DayWindow::new(o, c),
        _ => None,
    }
}

/// Opening window for `date`. An exception for that date wins over the weekly
/// hours; a day-off exception closes the day.
pub fn resolve_day_window(
    date: NaiveDate,
    hours: &[BusinessHours],
    exceptions: &[ScheduleException],
) -> Option<DayWindow> {
    let weekly = || {
        hours.iter()
            .find(|h| parse_weekday(&h.weekday) == Some(date.weekday()))
            .and_then(|h| window_from_strings(&h.open_time, &h.close_time))
    };

    if let Some(exception) = exceptions.iter().find(|e| e.date == date) {
        if exception.is_day_off {
            return None;
        }
        return match (&exception.open_time, &exception.close_time) {
            (Some(open), Some(close)) => window_from_strings(open, close),
            _ => weekly(),
        };
    }

    weekly()
}

/// Combines a calendar day and a wall-clock time in the business zone.
/// Returns `None` for local times skipped or repeated by a DST transition.
pub fn local_instant(tz: &Tz, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&date.and_time(time))
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parses a booking request's `date` + `time` pair. `time` may be `HH:MM` or a
/// full RFC 3339 timestamp, in which case only its wall-clock part in the
/// business zone is used.
pub fn parse_requested_start(tz: &Tz, date: &str, time: &str) -> Result<DateTime<Utc>, AppError> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format (YYYY-MM-DD)".into()))?;

    let time = if time.contains('T') {
        let dt = DateTime::parse_from_rfc3339(time.trim())
            .map_err(|_| AppError::Validation("Invalid ISO time format".into()))?;
        dt.with_timezone(tz).time()
    } else {
        parse_clock(time)?
    };

    local_instant(tz, date, time)
        .ok_or(AppError::Validation("Invalid local time (ambiguous or skipped due to DST)".into()))
}

pub fn parse_timezone(name: &str) -> Result<Tz, AppError> {
    name.parse::<Tz>()
        .map_err(|_| AppError::Validation(format!("Invalid timezone '{}'", name)))
}

/// Human-readable summary of the weekly hours, e.g.
/// "Monday to Friday 09:00-17:00 and Saturday 10:00-14:00".
pub fn describe_hours(hours: &[BusinessHours]) -> String {
    let mut groups: Vec<(String, Vec<usize>)> = Vec::new();

    for (idx, day) in WEEKDAYS.iter().enumerate() {
        let Some(h) = hours.iter().find(|h| parse_weekday(&h.weekday) == Some(*day)) else {
            continue;
        };
        let range = format!("{}-{}", h.open_time, h.close_time);
        match groups.iter_mut().find(|(r, _)| *r == range) {
            Some((_, days)) => days.push(idx),
            None => groups.push((range, vec![idx])),
        }
    }

    if groups.is_empty() {
        return "No opening hours configured.".to_string();
    }

    let phrases: Vec<String> = groups.iter().map(|(range, days)| {
        let consecutive = days.windows(2).all(|w| w[1] == w[0] + 1);
        let first = weekday_label(WEEKDAYS[days[0]]);
        let last = weekday_label(WEEKDAYS[days[days.len() - 1]]);
        if days.len() > 2 && consecutive {
            format!("{} to {} {}", first, last, range)
        } else {
            let names: Vec<&str> = days.iter().map(|d| weekday_label(WEEKDAYS[*d])).collect();
            format!("{} {}", names.join(", "), range)
        }
    }).collect();

    format!("Our opening hours are {}.", phrases.join(" and "))
}

/// Validates a weekly hours row before it is stored.
pub fn validate_hours_row(weekday: &str, open: &str, close: &str) -> Result<(), AppError> {
    let day = parse_weekday(weekday)
        .ok_or_else(|| AppError::Validation(format!("Unknown weekday '{}'", weekday)))?;
    let window = DayWindow::new(parse_clock(open)?, parse_clock(close)?);
    if window.is_none() {
        return Err(AppError::Validation(format!("{}: opening time must be before closing time", weekday_key(day))));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn hours(day: Weekday, open: &str, close: &str) -> BusinessHours {
        BusinessHours::new("b1".into(), day, open.into(), close.into())
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 1, 7).unwrap()
    }

    #[test]
    fn test_weekly_window_is_resolved_by_weekday() {
        let h = vec![hours(Weekday::Mon, "09:00", "12:00")];
        let window = resolve_day_window(monday(), &h, &[]).unwrap();
        assert_eq!(window, DayWindow { open_min: 540, close_min: 720 });
        assert!(resolve_day_window(monday().succ_opt().unwrap(), &h, &[]).is_none());
    }

    #[test]
    fn test_exception_overrides_and_closes_days() {
        let h = vec![hours(Weekday::Mon, "09:00", "12:00")];

        let mut off = ScheduleException::new("b1".into(), monday());
        off.is_day_off = true;
        assert!(resolve_day_window(monday(), &h, &[off]).is_none());

        let mut short = ScheduleException::new("b1".into(), monday());
        short.open_time = Some("10:00".into());
        short.close_time = Some("11:00".into());
        assert_eq!(resolve_day_window(monday(), &h, &[short]), Some(DayWindow { open_min: 600, close_min: 660 }));

        // exception without its own times keeps the weekly window
        let plain = ScheduleException::new("b1".into(), monday());
        assert_eq!(resolve_day_window(monday(), &h, &[plain]), Some(DayWindow { open_min: 540, close_min: 720 }));
    }

    #[test]
    fn test_end_of_day_and_inverted_windows() {
        let late = DayWindow::new(parse_clock("22:00").unwrap(), parse_clock("23:59").unwrap()).unwrap();
        assert_eq!(late.close_min, MINUTES_PER_DAY);
        assert!(late.fits(23 * 60, 60));
        assert!(DayWindow::new(parse_clock("12:00").unwrap(), parse_clock("09:00").unwrap()).is_none());
        assert!(validate_hours_row("MONDAY", "12:00", "09:00").is_err());
        assert!(validate_hours_row("FUNDAY", "09:00", "12:00").is_err());
    }

    #[test]
    fn test_requested_start_keeps_the_local_day() {
        let tz: Tz = "America/Mexico_City".parse().unwrap();
        let start = parse_requested_start(&tz, "2030-01-07", "23:30").unwrap();
        // 23:30 in Mexico City is the next day in UTC; the local day must survive
        assert_eq!(start.with_timezone(&tz).date_naive(), monday());
        assert_eq!(start.with_timezone(&tz).time(), NaiveTime::from_hms_opt(23, 30, 0).unwrap());
        assert!(parse_requested_start(&tz, "07/01/2030", "10:00").is_err());
        assert!(parse_requested_start(&tz, "2030-01-07", "10h").is_err());
    }

    #[test]
    fn test_describe_groups_consecutive_days() {
        let h = vec![
            hours(Weekday::Mon, "09:00", "17:00"),
            hours(Weekday::Tue, "09:00", "17:00"),
            hours(Weekday::Wed, "09:00", "17:00"),
            hours(Weekday::Sat, "10:00", "14:00"),
        ];
        assert_eq!(
            describe_hours(&h),
            "Our opening hours are Monday to Wednesday 09:00-17:00 and Saturday 10:00-14:00."
        );

        let split = vec![hours(Weekday::Mon, "09:00", "12:00"), hours(Weekday::Wed, "09:00", "12:00")];
        assert_eq!(describe_hours(&split), "Our opening hours are Monday, Wednesday 09:00-12:00.");
        assert_eq!(describe_hours(&[]), "No opening hours configured.");
    }
}
