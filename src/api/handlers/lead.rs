use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::CreateLeadRequest;
use crate::api::extractors::business::BusinessId;
use crate::domain::models::lead::Lead;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

pub async fn create_lead(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Json(payload): Json<CreateLeadRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let lead = Lead::new(business_id, payload.name.trim().to_string(), payload.email, payload.phone);
    let created = state.lead_repo.create(&lead).await?;

    info!("Lead created: {} for business {}", created.id, created.business_id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_lead_appointments(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Path((_, lead_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let appointments = state.scheduling.lead_appointments(&business_id, &lead_id).await?;
    Ok(Json(appointments))
}
