use std::collections::HashMap;
use std::sync::Arc;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::info;
use crate::domain::{
    models::appointment::{Actor, Appointment, AppointmentHistory, AppointmentStatus, HistoryAction},
    ports::{AppointmentRepository, BusinessRepository, LeadRepository, OfferRepository},
    services::{
        matching::{best_match, MatchOutcome, MatchProfile},
    },
};
use crate::error::AppError;

const DEFAULT_REASON: &str = "Appointment cancelled at the lead's request.";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AppointmentSummary {
    pub id: String,
    #[serde(rename = "fechaHora")]
    pub when: String,
    #[serde(rename = "asunto")]
    pub subject: String,
    #[serde(rename = "tipoDeCitaId")]
    pub appointment_type_id: String,
    /// 1-based place in the lead's upcoming list; a numeric reply to a
    /// choose-one prompt is scored against this same list.
    #[serde(rename = "numero", skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
}

pub struct CancellationRequest {
    pub appointment_id: Option<String>,
    pub description: Option<String>,
    pub confirmation: Option<bool>,
    pub reason: Option<String>,
    pub lead_id: String,
    pub actor: Actor,
}

/// Where a cancellation attempt ended up.
#[derive(Debug, Clone, PartialEq)]
pub enum CancellationOutcome {
    NoUpcoming,
    UnknownLead,
    NotFound { reference: String },
    ChooseOne(Vec<AppointmentSummary>),
    Confirm(AppointmentSummary),
    Cancelled(AppointmentSummary),
    Aborted(AppointmentSummary),
    AlreadyCancelled(AppointmentSummary),
    AlreadyPassed(AppointmentSummary),
    NotCancellable { summary: AppointmentSummary, status: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct CancellationResponse {
    #[serde(rename = "mensajeParaUsuario")]
    pub message: String,
    #[serde(rename = "cancelacionRealizada")]
    pub cancelled: bool,
    #[serde(rename = "citaCanceladaId", skip_serializing_if = "Option::is_none")]
    pub cancelled_id: Option<String>,
    #[serde(rename = "requiereConfirmacion", skip_serializing_if = "Option::is_none")]
    pub requires_confirmation: Option<bool>,
    #[serde(rename = "citaParaConfirmar", skip_serializing_if = "Option::is_none")]
    pub to_confirm: Option<AppointmentSummary>,
    #[serde(rename = "listaCitasParaElegir", skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<AppointmentSummary>>,
}

impl CancellationResponse {
    fn message(message: String) -> Self {
        Self {
            message,
            cancelled: false,
            cancelled_id: None,
            requires_confirmation: None,
            to_confirm: None,
            choices: None,
        }
    }
}

impl From<CancellationOutcome> for CancellationResponse {
    fn from(outcome: CancellationOutcome) -> Self {
        match outcome {
            CancellationOutcome::NoUpcoming => Self::message(
                "You don't have any upcoming appointments to cancel.".into(),
            ),
            CancellationOutcome::UnknownLead => Self::message(
                "Sorry, I could not identify you, so I cannot look up your appointments.".into(),
            ),
            CancellationOutcome::NotFound { reference } => Self::message(format!(
                "I couldn't find an upcoming appointment matching \"{}\". Could you give me more details, such as the date, time or service?",
                reference
            )),
            CancellationOutcome::ChooseOne(choices) => {
                let mut message = "I found several upcoming appointments. Which one would you like to cancel? Reply with its number or id:\n".to_string();
                for (idx, c) in choices.iter().enumerate() {
                    let number = c.position.unwrap_or(idx + 1);
                    message.push_str(&format!("{}. \"{}\" - {} (id: {})\n", number, c.subject, c.when, c.id));
                }
                Self { choices: Some(choices), ..Self::message(message) }
            }
            CancellationOutcome::Confirm(summary) => {
                let message = format!(
                    "I found this appointment: \"{}\" on {}. Do you confirm you want to cancel it (yes/no)?",
                    summary.subject, summary.when
                );
                Self {
                    requires_confirmation: Some(true),
                    to_confirm: Some(summary),
                    ..Self::message(message)
                }
            }
            CancellationOutcome::Cancelled(summary) => Self {
                cancelled: true,
                cancelled_id: Some(summary.id.clone()),
                ..Self::message(format!(
                    "Done! Your appointment \"{}\" on {} has been cancelled.",
                    summary.subject, summary.when
                ))
            },
            CancellationOutcome::Aborted(_) => Self::message(
                "Understood, the appointment has not been cancelled. Is there anything else I can help you with?".into(),
            ),
            CancellationOutcome::AlreadyCancelled(summary) => Self {
                cancelled: true,
                cancelled_id: Some(summary.id.clone()),
                ..Self::message(format!(
                    "The appointment \"{}\" on {} is already cancelled.",
                    summary.subject, summary.when
                ))
            },
            CancellationOutcome::AlreadyPassed(_) => Self::message(
                "Sorry, an appointment that has already passed cannot be cancelled.".into(),
            ),
            CancellationOutcome::NotCancellable { summary, status } => Self::message(format!(
                "The appointment \"{}\" on {} is {} and can no longer be cancelled.",
                summary.subject, summary.when, status
            )),
        }
    }
}

pub struct CancellationService {
    businesses: Arc<dyn BusinessRepository>,
    offers: Arc<dyn OfferRepository>,
    leads: Arc<dyn LeadRepository>,
    appointments: Arc<dyn AppointmentRepository>,
}

impl CancellationService {
    pub fn new(
        businesses: Arc<dyn BusinessRepository>,
        offers: Arc<dyn OfferRepository>,
        leads: Arc<dyn LeadRepository>,
        appointments: Arc<dyn AppointmentRepository>,
    ) -> Self {
        Self { businesses, offers, leads, appointments }
    }

    /// Identify → (choose-one | confirm) → cancel/abort. Only store failures
    /// are returned as errors; every other path is an outcome.
    pub async fn resolve(&self, business_id: &str, req: CancellationRequest, now: DateTime<Utc>) -> Result<CancellationOutcome, AppError> {
        let business = self.businesses.find_by_id(business_id).await?
            .ok_or(AppError::NotFound("Business not found".into()))?;
        let tz = business.zone()?;

        if self.leads.find_by_id(business_id, &req.lead_id).await?.is_none() {
            return Ok(CancellationOutcome::UnknownLead);
        }

        let type_names: HashMap<String, String> = self.offers.list_types(business_id).await?
            .into_iter()
            .map(|t| (t.id, t.name))
            .collect();
        let summary_of = |a: &Appointment| summarize(a, &tz, &type_names);

        let target = if let Some(id) = req.appointment_id.as_deref().filter(|s| !s.trim().is_empty()) {
            let Some(appointment) = self.appointments.find_for_lead(&req.lead_id, id.trim()).await?
                .filter(|a| a.business_id == business.id)
            else {
                return Ok(CancellationOutcome::NotFound { reference: id.to_string() });
            };

            match appointment.status() {
                Some(AppointmentStatus::Pending) => {}
                Some(AppointmentStatus::Cancelled) => return Ok(CancellationOutcome::AlreadyCancelled(summary_of(&appointment))),
                _ => return Ok(CancellationOutcome::NotCancellable {
                    summary: summary_of(&appointment),
                    status: appointment.status.clone(),
                }),
            }
            if appointment.start_time <= now {
                return Ok(CancellationOutcome::AlreadyPassed(summary_of(&appointment)));
            }
            appointment
        } else {
            let upcoming = self.appointments.list_upcoming_pending_for_lead(&req.lead_id, now).await?;
            let numbered = |a: &Appointment| {
                let position = upcoming.iter().position(|u| u.id == a.id).map(|idx| idx + 1);
                AppointmentSummary { position, ..summary_of(a) }
            };

            match req.description.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                Some(description) => {
                    if let Some(exact) = upcoming.iter().find(|a| a.id == description) {
                        exact.clone()
                    } else {
                        let candidates: Vec<(Appointment, MatchProfile)> = upcoming.iter()
                            .map(|a| {
                                let type_name = type_names.get(&a.appointment_type_id).map(String::as_str).unwrap_or("");
                                let profile = MatchProfile::new(a.start_time.with_timezone(&tz).naive_local(), &a.subject, type_name);
                                (a.clone(), profile)
                            })
                            .collect();

                        match best_match(description, &candidates) {
                            MatchOutcome::NoMatch => return Ok(CancellationOutcome::NotFound { reference: description.to_string() }),
                            MatchOutcome::Ambiguous(list) => {
                                info!("Cancellation for lead {} is ambiguous between {} appointments", req.lead_id, list.len());
                                return Ok(CancellationOutcome::ChooseOne(list.iter().map(&numbered).collect()));
                            }
                            MatchOutcome::Unique(appointment) => appointment,
                        }
                    }
                }
                // nothing to go on: offer the lead's upcoming entries
                None => match upcoming.len() {
                    0 => return Ok(CancellationOutcome::NoUpcoming),
                    1 => upcoming[0].clone(),
                    _ => return Ok(CancellationOutcome::ChooseOne(upcoming.iter().map(&numbered).collect())),
                },
            }
        };

        let summary = summary_of(&target);
        match req.confirmation {
            None => Ok(CancellationOutcome::Confirm(summary)),
            Some(false) => {
                info!("Lead {} declined to cancel appointment {}", req.lead_id, target.id);
                Ok(CancellationOutcome::Aborted(summary))
            }
            Some(true) => {
                let reason = req.reason.filter(|r| !r.trim().is_empty()).unwrap_or_else(|| DEFAULT_REASON.to_string());
                let history = AppointmentHistory::new(target.id.clone(), HistoryAction::Canceled, &req.actor, Some(reason));
                let cancelled = self.appointments.cancel(&target, &history).await?;
                info!("Appointment {} cancelled by {} {:?}", cancelled.id, req.actor.kind.as_str(), req.actor.id);
                Ok(CancellationOutcome::Cancelled(summary_of(&cancelled)))
            }
        }
    }
}

fn summarize(appointment: &Appointment, tz: &Tz, type_names: &HashMap<String, String>) -> AppointmentSummary {
    let subject = if appointment.subject.trim().is_empty() {
        type_names.get(&appointment.appointment_type_id).cloned().unwrap_or_else(|| "Appointment".to_string())
    } else {
        appointment.subject.clone()
    };

    AppointmentSummary {
        id: appointment.id.clone(),
        when: appointment.start_time.with_timezone(tz).format("%A %-d %B %Y at %H:%M").to_string(),
        subject,
        appointment_type_id: appointment.appointment_type_id.clone(),
        position: None,
    }
}
