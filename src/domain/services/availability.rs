use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use std::collections::HashMap;
use crate::domain::models::{
    appointment::Appointment,
    business::{weekday_label, Business, BusinessHours, ScheduleException},
    offer::{AppointmentType, Offer},
};
use crate::domain::services::business_hours::{local_instant, resolve_day_window, DayWindow};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SlotView {
    #[serde(rename = "hora")]
    pub label: String,
    #[serde(rename = "fechaCompletaISO")]
    pub iso: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayAvailability {
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "nombreDia")]
    pub day_name: String,
    #[serde(rename = "horarios")]
    pub slots: Vec<SlotView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TypeAvailability {
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "duracionMinutos")]
    pub duration_min: i32,
    #[serde(rename = "diasDisponibles")]
    pub days: Vec<DayAvailability>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OfferAvailability {
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "tiposDeCita")]
    pub appointment_types: Vec<TypeAvailability>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BusinessRef {
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityData {
    #[serde(rename = "negocio")]
    pub business: BusinessRef,
    #[serde(rename = "ofertas")]
    pub offers: Vec<OfferAvailability>,
}

/// Everything the calculator reads, loaded fresh for each request.
pub struct AvailabilityInput<'a> {
    pub business: &'a Business,
    pub hours: &'a [BusinessHours],
    pub exceptions: &'a [ScheduleException],
    pub offers: &'a [Offer],
    pub appointment_types: &'a [AppointmentType],
    pub pending: &'a [Appointment],
}

/// Open slots of one appointment type on one day.
///
/// Candidates step by `duration_min` from the opening minute while the whole
/// appointment still fits before closing. A candidate is dropped when it is not
/// after `now`, or when `pending_at` already holds `limit` entries for that
/// exact instant.
pub fn calculate_slots(
    tz: &Tz,
    date: NaiveDate,
    window: &DayWindow,
    duration_min: u32,
    limit: Option<i32>,
    pending_at: &HashMap<DateTime<Utc>, i64>,
    now: DateTime<Utc>,
) -> Vec<SlotView> {
    let mut slots = Vec::new();
    if duration_min == 0 {
        return slots;
    }

    let mut cursor = window.open_min;
    while window.fits(cursor, duration_min) {
        let Some(time) = NaiveTime::from_hms_opt(cursor / 60, cursor % 60, 0) else {
            break;
        };

        if let Some(slot_utc) = local_instant(tz, date, time) {
            let taken = pending_at.get(&slot_utc).copied().unwrap_or(0);
            let has_room = limit.is_none_or(|max| taken < max as i64);

            if slot_utc > now && has_room {
                slots.push(SlotView {
                    label: time.format("%H:%M").to_string(),
                    iso: slot_utc.with_timezone(tz).to_rfc3339(),
                });
            }
        }

        cursor += duration_min;
    }

    slots
}

/// Builds the offer → type → day → slots tree for `days` days starting today
/// in the business zone. Days without slots are omitted; types without a
/// duration and inactive offers/types are skipped.
pub fn build_availability(input: &AvailabilityInput<'_>, tz: &Tz, days: u32, now: DateTime<Utc>) -> AvailabilityData {
    let today = now.with_timezone(tz).date_naive();

    let mut pending_by_type: HashMap<&str, HashMap<DateTime<Utc>, i64>> = HashMap::new();
    for appt in input.pending.iter().filter(|a| a.is_pending()) {
        *pending_by_type
            .entry(appt.appointment_type_id.as_str())
            .or_default()
            .entry(appt.start_time)
            .or_insert(0) += 1;
    }
    let no_pending = HashMap::new();

    let windows: Vec<(NaiveDate, DayWindow)> = (0..days)
        .filter_map(|offset| {
            let date = today + Duration::days(offset as i64);
            resolve_day_window(date, input.hours, input.exceptions).map(|w| (date, w))
        })
        .collect();

    let offers = input.offers.iter()
        .filter(|o| o.active)
        .map(|offer| {
            let appointment_types = input.appointment_types.iter()
                .filter(|t| t.offer_id == offer.id && t.active)
                .filter_map(|t| {
                    let duration = t.duration_min.filter(|d| *d > 0)?;
                    let pending_at = pending_by_type.get(t.id.as_str()).unwrap_or(&no_pending);

                    let days = windows.iter()
                        .filter_map(|(date, window)| {
                            let slots = calculate_slots(tz, *date, window, duration as u32, t.concurrency_limit, pending_at, now);
                            if slots.is_empty() {
                                return None;
                            }
                            Some(DayAvailability {
                                date: date.format("%Y-%m-%d").to_string(),
                                day_name: weekday_label(date.weekday()).to_string(),
                                slots,
                            })
                        })
                        .collect();

                    Some(TypeAvailability {
                        id: t.id.clone(),
                        name: t.name.clone(),
                        duration_min: duration,
                        days,
                    })
                })
                .collect();

            OfferAvailability {
                id: offer.id.clone(),
                name: offer.name.clone(),
                appointment_types,
            }
        })
        .collect();

    AvailabilityData {
        business: BusinessRef {
            id: input.business.id.clone(),
            name: input.business.name.clone(),
        },
        offers,
    }
}
