use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Pending,
    Completed,
    Cancelled,
    Rescheduled,
    NoShow,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "PENDING",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Cancelled => "CANCELLED",
            AppointmentStatus::Rescheduled => "RESCHEDULED",
            AppointmentStatus::NoShow => "NO_SHOW",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(AppointmentStatus::Pending),
            "COMPLETED" => Ok(AppointmentStatus::Completed),
            "CANCELLED" => Ok(AppointmentStatus::Cancelled),
            "RESCHEDULED" => Ok(AppointmentStatus::Rescheduled),
            "NO_SHOW" => Ok(AppointmentStatus::NoShow),
            other => Err(format!("Unknown appointment status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActorType {
    Lead,
    Agent,
    Assistant,
}

impl ActorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActorType::Lead => "LEAD",
            ActorType::Agent => "AGENT",
            ActorType::Assistant => "ASSISTANT",
        }
    }
}

/// Who performed a mutation on the agenda.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub kind: ActorType,
    pub id: Option<String>,
}

impl Actor {
    pub fn lead(id: impl Into<String>) -> Self {
        Self { kind: ActorType::Lead, id: Some(id.into()) }
    }

    pub fn agent(id: Option<String>) -> Self {
        Self { kind: ActorType::Agent, id }
    }

    pub fn assistant(id: impl Into<String>) -> Self {
        Self { kind: ActorType::Assistant, id: Some(id.into()) }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Appointment {
    pub id: String,
    pub business_id: String,
    pub lead_id: String,
    pub appointment_type_id: String,
    pub start_time: DateTime<Utc>,
    pub subject: String,
    pub status: String,
    pub actor_type: String,
    pub actor_id: Option<String>,
    pub rescheduled_from: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct NewAppointmentParams {
    pub business_id: String,
    pub lead_id: String,
    pub appointment_type_id: String,
    pub start: DateTime<Utc>,
    pub subject: String,
    pub actor: Actor,
}

impl Appointment {
    pub fn new(params: NewAppointmentParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            business_id: params.business_id,
            lead_id: params.lead_id,
            appointment_type_id: params.appointment_type_id,
            start_time: params.start,
            subject: params.subject,
            status: AppointmentStatus::Pending.to_string(),
            actor_type: params.actor.kind.as_str().to_string(),
            actor_id: params.actor.id,
            rescheduled_from: None,
            created_at: Utc::now(),
        }
    }

    pub fn status(&self) -> Option<AppointmentStatus> {
        self.status.parse().ok()
    }

    pub fn is_pending(&self) -> bool {
        self.status() == Some(AppointmentStatus::Pending)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryAction {
    Created,
    Rescheduled,
    Canceled,
    StatusChanged,
}

impl HistoryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryAction::Created => "CREATED",
            HistoryAction::Rescheduled => "RESCHEDULED",
            HistoryAction::Canceled => "CANCELED",
            HistoryAction::StatusChanged => "STATUS_CHANGED",
        }
    }
}

/// Append-only audit trail for agenda entries.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct AppointmentHistory {
    pub id: String,
    pub appointment_id: String,
    pub action: String,
    pub actor_type: String,
    pub actor_id: Option<String>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AppointmentHistory {
    pub fn new(appointment_id: String, action: HistoryAction, actor: &Actor, reason: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            appointment_id,
            action: action.as_str().to_string(),
            actor_type: actor.kind.as_str().to_string(),
            actor_id: actor.id.clone(),
            reason,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_storage_form() {
        for status in [
            AppointmentStatus::Pending,
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
            AppointmentStatus::Rescheduled,
            AppointmentStatus::NoShow,
        ] {
            assert_eq!(status.as_str().parse::<AppointmentStatus>(), Ok(status));
        }
        assert!("CANCELADA".parse::<AppointmentStatus>().is_err());
    }

    #[test]
    fn test_new_appointment_is_pending_and_attributed() {
        let appt = Appointment::new(NewAppointmentParams {
            business_id: "b".into(),
            lead_id: "l".into(),
            appointment_type_id: "t".into(),
            start: Utc::now(),
            subject: "Consulta".into(),
            actor: Actor::assistant("bot-1"),
        });
        assert!(appt.is_pending());
        assert_eq!(appt.actor_type, "ASSISTANT");
        assert_eq!(appt.actor_id.as_deref(), Some("bot-1"));
        assert!(appt.rescheduled_from.is_none());
    }
}
