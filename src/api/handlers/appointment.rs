use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{resolve_actor, BookAppointmentRequest, RescheduleRequest, UpdateStatusRequest};
use crate::api::extractors::business::BusinessId;
use crate::domain::models::appointment::{Actor, AppointmentStatus};
use crate::domain::services::{
    business_hours::parse_requested_start,
    scheduling_service::{BookingCommand, RescheduleCommand},
};
use crate::error::AppError;
use std::sync::Arc;
use chrono::{DateTime, Utc};
use tracing::info;
use validator::Validate;

/// A full RFC 3339 timestamp wins; otherwise `fecha` + `hora` are read as
/// wall-clock time in the business zone.
async fn requested_start(
    state: &AppState,
    business_id: &str,
    instant: Option<&str>,
    date: Option<&str>,
    time: Option<&str>,
) -> Result<DateTime<Utc>, AppError> {
    if let Some(raw) = instant.map(str::trim).filter(|s| !s.is_empty()) {
        return DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| AppError::Validation(format!("Invalid timestamp '{}', expected RFC 3339", raw)));
    }

    let (Some(date), Some(time)) = (date, time) else {
        return Err(AppError::Validation("A start time is required (RFC 3339 timestamp or date + time)".into()));
    };

    let business = state.business_repo.find_by_id(business_id).await?
        .ok_or(AppError::NotFound("Business not found".into()))?;
    let tz = business.zone()?;
    parse_requested_start(&tz, date, time)
}

pub async fn book_appointment(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Json(payload): Json<BookAppointmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let start = requested_start(&state, &business_id, payload.start.as_deref(), payload.date.as_deref(), payload.time.as_deref()).await?;
    let actor = resolve_actor(payload.assistant_id.as_deref(), payload.agent_id.as_deref(), &payload.lead_id);

    info!("book_appointment: type {} at {} by {}", payload.appointment_type_id, start, actor.kind.as_str());

    let created = state.scheduling.book(&business_id, BookingCommand {
        lead_id: payload.lead_id,
        appointment_type_id: payload.appointment_type_id,
        start,
        subject: payload.subject,
        actor,
    }, Utc::now()).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn reschedule_appointment(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Path((_, appointment_id)): Path<(String, String)>,
    Json(payload): Json<RescheduleRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let new_start = requested_start(&state, &business_id, payload.start.as_deref(), payload.date.as_deref(), payload.time.as_deref()).await?;
    let actor = resolve_actor(payload.assistant_id.as_deref(), payload.agent_id.as_deref(), &payload.lead_id);

    let moved = state.scheduling.reschedule(&business_id, RescheduleCommand {
        appointment_id,
        lead_id: payload.lead_id,
        new_start,
        actor,
        reason: payload.reason,
    }, Utc::now()).await?;

    Ok(Json(moved))
}

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Path((_, appointment_id)): Path<(String, String)>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let status: AppointmentStatus = payload.status.trim().parse()
        .map_err(AppError::Validation)?;

    let updated = state.scheduling.close(&business_id, &appointment_id, status, Actor::agent(payload.agent_id)).await?;
    info!("Appointment {} closed as {}", updated.id, updated.status);
    Ok(Json(updated))
}

pub async fn get_history(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Path((_, appointment_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let history = state.scheduling.history(&business_id, &appointment_id).await?;
    Ok(Json(history))
}
