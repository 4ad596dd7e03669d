use axum::{extract::{Query, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{
    requests::{CreateBusinessRequest, ExceptionRangeQuery, ReplaceHoursRequest, UpsertExceptionRequest},
    responses::HoursResponse,
};
use crate::api::extractors::business::BusinessId;
use crate::domain::models::business::{parse_weekday, Business, BusinessHours, ScheduleException};
use crate::domain::services::business_hours::{describe_hours, parse_clock, parse_timezone, validate_hours_row, DayWindow};
use crate::error::AppError;
use std::collections::HashSet;
use std::sync::Arc;
use chrono::{Duration, Utc};
use tracing::info;
use validator::Validate;

pub async fn create_business(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateBusinessRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let timezone = payload.timezone
        .map(|tz| tz.trim().to_string())
        .filter(|tz| !tz.is_empty())
        .unwrap_or_else(|| "UTC".to_string());
    parse_timezone(&timezone)?;

    let business = Business::new(payload.name.trim().to_string(), timezone);
    let created = state.business_repo.create(&business).await?;

    info!("Business created: {} ({})", created.id, created.timezone);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_business(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
) -> Result<impl IntoResponse, AppError> {
    let business = state.business_repo.find_by_id(&business_id).await?
        .ok_or(AppError::NotFound("Business not found".into()))?;
    Ok(Json(business))
}

pub async fn replace_hours(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Json(payload): Json<ReplaceHoursRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut seen = HashSet::new();
    let mut rows = Vec::with_capacity(payload.hours.len());

    for entry in payload.hours {
        validate_hours_row(&entry.weekday, &entry.open_time, &entry.close_time)?;
        let day = parse_weekday(&entry.weekday)
            .ok_or_else(|| AppError::Validation(format!("Unknown weekday '{}'", entry.weekday)))?;
        if !seen.insert(day) {
            return Err(AppError::Validation(format!("Weekday '{}' appears more than once", entry.weekday)));
        }
        // normalised to HH:MM so the summary groups identical ranges
        let open = parse_clock(&entry.open_time)?.format("%H:%M").to_string();
        let close = parse_clock(&entry.close_time)?.format("%H:%M").to_string();
        rows.push(BusinessHours::new(business_id.clone(), day, open, close));
    }

    let saved = state.business_repo.replace_hours(&business_id, &rows).await?;
    info!("Replaced weekly hours for business {} ({} days open)", business_id, saved.len());

    Ok(Json(HoursResponse {
        summary: describe_hours(&saved),
        hours: saved,
    }))
}

pub async fn get_hours(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
) -> Result<impl IntoResponse, AppError> {
    let hours = state.business_repo.list_hours(&business_id).await?;
    Ok(Json(HoursResponse {
        summary: describe_hours(&hours),
        hours,
    }))
}

pub async fn upsert_exception(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Json(payload): Json<UpsertExceptionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut exception = ScheduleException::new(business_id, payload.date);
    exception.is_day_off = payload.is_day_off;

    if !payload.is_day_off {
        let (Some(open), Some(close)) = (payload.open_time.as_deref(), payload.close_time.as_deref()) else {
            return Err(AppError::Validation("open_time and close_time are required unless is_day_off is set".into()));
        };
        let (open, close) = (parse_clock(open)?, parse_clock(close)?);
        if DayWindow::new(open, close).is_none() {
            return Err(AppError::Validation("Opening time must be before closing time".into()));
        }
        exception.open_time = Some(open.format("%H:%M").to_string());
        exception.close_time = Some(close.format("%H:%M").to_string());
    }

    let saved = state.business_repo.upsert_exception(&exception).await?;
    info!("Schedule exception for {} on {} (day off: {})", saved.business_id, saved.date, saved.is_day_off);
    Ok(Json(saved))
}

pub async fn list_exceptions(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Query(range): Query<ExceptionRangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let from = range.from.unwrap_or_else(|| Utc::now().date_naive());
    let to = range.to.unwrap_or(from + Duration::days(365));
    if to < from {
        return Err(AppError::Validation("'to' must not be before 'from'".into()));
    }

    let exceptions = state.business_repo.list_exceptions(&business_id, from, to).await?;
    Ok(Json(exceptions))
}
