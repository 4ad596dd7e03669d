use crate::domain::models::appointment::Actor;
use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

#[derive(Deserialize, Validate)]
pub struct CreateBusinessRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    /// IANA zone name; `UTC` when absent.
    pub timezone: Option<String>,
}

#[derive(Deserialize)]
pub struct HoursEntry {
    pub weekday: String,
    pub open_time: String,
    pub close_time: String,
}

#[derive(Deserialize)]
pub struct ReplaceHoursRequest {
    pub hours: Vec<HoursEntry>,
}

#[derive(Deserialize)]
pub struct UpsertExceptionRequest {
    pub date: NaiveDate,
    #[serde(default)]
    pub is_day_off: bool,
    pub open_time: Option<String>,
    pub close_time: Option<String>,
}

#[derive(Deserialize)]
pub struct ExceptionRangeQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Deserialize, Validate)]
pub struct CreateOfferRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
}

#[derive(Deserialize, Validate)]
pub struct CreateAppointmentTypeRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(range(min = 1, message = "duration_min must be positive"))]
    pub duration_min: Option<i32>,
    #[validate(range(min = 1, message = "concurrency_limit must be at least 1"))]
    pub concurrency_limit: Option<i32>,
    pub active: Option<bool>,
}

#[derive(Deserialize, Validate)]
pub struct CreateLeadRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(email(message = "email is not a valid address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Deserialize)]
pub struct AvailabilityQuery {
    #[serde(rename = "diasAConsultar")]
    pub days: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct BookAppointmentRequest {
    #[serde(rename = "leadId")]
    #[validate(length(min = 1, message = "leadId is required"))]
    pub lead_id: String,
    #[serde(rename = "tipoDeCitaId")]
    #[validate(length(min = 1, message = "tipoDeCitaId is required"))]
    pub appointment_type_id: String,
    #[serde(rename = "fechaHora")]
    pub start: Option<String>,
    #[serde(rename = "fecha")]
    pub date: Option<String>,
    #[serde(rename = "hora")]
    pub time: Option<String>,
    #[serde(rename = "asunto")]
    pub subject: Option<String>,
    #[serde(rename = "asistenteVirtualId")]
    pub assistant_id: Option<String>,
    #[serde(rename = "agenteId")]
    pub agent_id: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct RescheduleRequest {
    #[serde(rename = "leadId")]
    #[validate(length(min = 1, message = "leadId is required"))]
    pub lead_id: String,
    #[serde(rename = "nuevaFechaHora")]
    pub start: Option<String>,
    #[serde(rename = "fecha")]
    pub date: Option<String>,
    #[serde(rename = "hora")]
    pub time: Option<String>,
    #[serde(rename = "motivo")]
    pub reason: Option<String>,
    #[serde(rename = "asistenteVirtualId")]
    pub assistant_id: Option<String>,
    #[serde(rename = "agenteId")]
    pub agent_id: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
    #[serde(rename = "agenteId")]
    pub agent_id: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct CancelAppointmentRequest {
    pub cita_id_cancelar: Option<String>,
    pub detalle_cita_para_cancelar: Option<String>,
    pub confirmacion_usuario_cancelar: Option<bool>,
    pub motivo_cancelacion: Option<String>,
    #[serde(rename = "leadId")]
    #[validate(length(min = 1, message = "leadId is required"))]
    pub lead_id: String,
    #[serde(rename = "asistenteVirtualId")]
    pub assistant_id: Option<String>,
    #[serde(rename = "agenteId")]
    pub agent_id: Option<String>,
}

/// Assistant beats agent beats the lead itself.
pub fn resolve_actor(assistant_id: Option<&str>, agent_id: Option<&str>, lead_id: &str) -> Actor {
    let present = |v: Option<&str>| v.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
    if let Some(id) = present(assistant_id) {
        Actor::assistant(id)
    } else if let Some(id) = present(agent_id) {
        Actor::agent(Some(id))
    } else {
        Actor::lead(lead_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::appointment::ActorType;

    #[test]
    fn test_actor_attribution() {
        assert_eq!(resolve_actor(Some("bot-1"), Some("ag"), "l1").kind, ActorType::Assistant);
        assert_eq!(resolve_actor(Some("  "), Some("ag"), "l1").kind, ActorType::Agent);
        let lead = resolve_actor(None, None, "l1");
        assert_eq!(lead.kind, ActorType::Lead);
        assert_eq!(lead.id.as_deref(), Some("l1"));
    }
}
