use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{CreateAppointmentTypeRequest, CreateOfferRequest};
use crate::api::extractors::business::BusinessId;
use crate::domain::models::offer::{AppointmentType, NewAppointmentTypeParams, Offer};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

pub async fn create_offer(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Json(payload): Json<CreateOfferRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let offer = Offer::new(business_id, payload.name.trim().to_string());
    let created = state.offer_repo.create_offer(&offer).await?;

    info!("Offer created: {} for business {}", created.id, created.business_id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_offers(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
) -> Result<impl IntoResponse, AppError> {
    let offers = state.offer_repo.list_offers(&business_id).await?;
    Ok(Json(offers))
}

pub async fn create_appointment_type(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Path((_, offer_id)): Path<(String, String)>,
    Json(payload): Json<CreateAppointmentTypeRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let offer = state.offer_repo.find_offer(&business_id, &offer_id).await?
        .ok_or(AppError::NotFound("Offer not found".into()))?;

    let mut appointment_type = AppointmentType::new(NewAppointmentTypeParams {
        business_id,
        offer_id: offer.id,
        name: payload.name.trim().to_string(),
        duration_min: payload.duration_min,
        concurrency_limit: payload.concurrency_limit,
    });
    if let Some(active) = payload.active {
        appointment_type.active = active;
    }

    let created = state.offer_repo.create_type(&appointment_type).await?;
    info!(
        "Appointment type created: {} (duration {:?}, limit {:?})",
        created.id, created.duration_min, created.concurrency_limit
    );
    Ok((StatusCode::CREATED, Json(created)))
}
