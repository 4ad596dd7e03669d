use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{resolve_actor, CancelAppointmentRequest};
use crate::api::extractors::business::BusinessId;
use crate::domain::services::cancellation_service::{CancellationRequest, CancellationResponse};
use crate::error::AppError;
use std::sync::Arc;
use chrono::Utc;
use tracing::info;
use validator::Validate;

/// Conversational cancellation. Every resolver outcome is a 200 with a
/// user-facing message; only bad input and store failures are errors.
pub async fn cancel_appointment(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Json(payload): Json<CancelAppointmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let actor = resolve_actor(payload.assistant_id.as_deref(), payload.agent_id.as_deref(), &payload.lead_id);
    let request = CancellationRequest {
        appointment_id: payload.cita_id_cancelar,
        description: payload.detalle_cita_para_cancelar,
        confirmation: payload.confirmacion_usuario_cancelar,
        reason: payload.motivo_cancelacion,
        lead_id: payload.lead_id,
        actor,
    };

    let outcome = state.cancellation.resolve(&business_id, request, Utc::now()).await?;
    info!("cancel_appointment outcome for business {}: {:?}", business_id, outcome);

    Ok(Json(CancellationResponse::from(outcome)))
}
