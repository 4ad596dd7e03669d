use axum::{extract::{Query, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{requests::AvailabilityQuery, responses::AvailabilityResponse};
use crate::api::extractors::business::BusinessId;
use crate::error::AppError;
use std::sync::Arc;
use chrono::Utc;

pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Query(query): Query<AvailabilityQuery>,
) -> Result<impl IntoResponse, AppError> {
    let requested = match query.days.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<i64>()
            .map_err(|_| AppError::Validation("diasAConsultar must be a positive integer".into()))?),
    };

    let days = state.scheduling.horizon_days(requested)?;
    let data = state.scheduling.availability(&business_id, Some(days as i64), Utc::now()).await?;

    Ok(Json(AvailabilityResponse {
        message: format!("Availability for the next {} days", days),
        data,
    }))
}
