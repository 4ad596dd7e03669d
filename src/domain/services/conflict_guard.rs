use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;
use crate::domain::models::{
    business::{BusinessHours, ScheduleException},
    offer::AppointmentType,
};
use crate::domain::services::business_hours::resolve_day_window;
use crate::error::AppError;

/// Rejects when `pending` entries already fill the slot. A missing limit is
/// unlimited.
pub fn check_capacity(limit: Option<i32>, pending: i64) -> Result<(), AppError> {
    match limit {
        Some(max) if pending >= max as i64 => Err(AppError::CapacityExceeded(
            "That time slot is already fully booked. Please choose another one.".into(),
        )),
        _ => Ok(()),
    }
}

/// Checks that run before the transactional capacity check: the type is
/// bookable, the start is in the future, lies on the slot grid, and the whole
/// appointment fits inside the business hours of its local day.
pub fn validate_slot(
    appointment_type: &AppointmentType,
    start: DateTime<Utc>,
    tz: &Tz,
    hours: &[BusinessHours],
    exceptions: &[ScheduleException],
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    if !appointment_type.active {
        return Err(AppError::Validation(format!("Appointment type '{}' is not active", appointment_type.name)));
    }

    let duration = appointment_type.duration_min
        .filter(|d| *d > 0)
        .ok_or_else(|| AppError::Validation(format!("Appointment type '{}' has no defined duration", appointment_type.name)))?;

    if start <= now {
        return Err(AppError::Validation("Cannot book in the past".into()));
    }

    let local = start.with_timezone(tz);
    let window = resolve_day_window(local.date_naive(), hours, exceptions)
        .ok_or_else(|| AppError::Validation("The business is closed on that day".into()))?;

    let start_min = local.hour() * 60 + local.minute();
    if local.second() != 0 || !window.fits(start_min, duration as u32) {
        return Err(AppError::Validation("Requested time is outside business hours".into()));
    }
    // bookings sit on the slot grid so exact-instant capacity counts hold
    if (start_min - window.open_min) % duration as u32 != 0 {
        return Err(AppError::Validation("Requested time does not match an available slot".into()));
    }

    Ok(())
}
