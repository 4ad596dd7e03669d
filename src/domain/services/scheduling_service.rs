use std::sync::Arc;
use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};
use crate::domain::{
    models::{
        appointment::{Actor, Appointment, AppointmentHistory, AppointmentStatus, HistoryAction, NewAppointmentParams},
        business::Business,
        offer::AppointmentType,
    },
    ports::{AppointmentRepository, BusinessRepository, LeadRepository, OfferRepository},
    services::{
        availability::{build_availability, AvailabilityData, AvailabilityInput},
        conflict_guard::validate_slot,
    },
};
use crate::error::AppError;

pub struct BookingCommand {
    pub lead_id: String,
    pub appointment_type_id: String,
    pub start: DateTime<Utc>,
    pub subject: Option<String>,
    pub actor: Actor,
}

pub struct RescheduleCommand {
    pub appointment_id: String,
    pub lead_id: String,
    pub new_start: DateTime<Utc>,
    pub actor: Actor,
    pub reason: Option<String>,
}

pub struct SchedulingService {
    businesses: Arc<dyn BusinessRepository>,
    offers: Arc<dyn OfferRepository>,
    leads: Arc<dyn LeadRepository>,
    appointments: Arc<dyn AppointmentRepository>,
    default_horizon_days: u32,
    max_horizon_days: u32,
}

impl SchedulingService {
    pub fn new(
        businesses: Arc<dyn BusinessRepository>,
        offers: Arc<dyn OfferRepository>,
        leads: Arc<dyn LeadRepository>,
        appointments: Arc<dyn AppointmentRepository>,
        default_horizon_days: u32,
        max_horizon_days: u32,
    ) -> Self {
        Self { businesses, offers, leads, appointments, default_horizon_days, max_horizon_days }
    }

    async fn load_business(&self, business_id: &str) -> Result<Business, AppError> {
        self.businesses.find_by_id(business_id).await?
            .ok_or(AppError::NotFound("Business not found".into()))
    }

    /// Resolves the horizon parameter. Absent means the configured default.
    pub fn horizon_days(&self, requested: Option<i64>) -> Result<u32, AppError> {
        match requested {
            None => Ok(self.default_horizon_days),
            Some(days) if days < 1 => Err(AppError::Validation("diasAConsultar must be a positive integer".into())),
            Some(days) if days > self.max_horizon_days as i64 => Err(AppError::Validation(
                format!("diasAConsultar cannot exceed {}", self.max_horizon_days),
            )),
            Some(days) => Ok(days as u32),
        }
    }

    pub async fn availability(&self, business_id: &str, requested_days: Option<i64>, now: DateTime<Utc>) -> Result<AvailabilityData, AppError> {
        let days = self.horizon_days(requested_days)?;
        let business = self.load_business(business_id).await?;
        let tz = business.zone()?;

        let today = now.with_timezone(&tz).date_naive();
        let last_day = today + Duration::days(days as i64 - 1);

        let hours = self.businesses.list_hours(business_id).await?;
        let exceptions = self.businesses.list_exceptions(business_id, today, last_day).await?;
        let offers = self.offers.list_offers(business_id).await?;
        let appointment_types = self.offers.list_types(business_id).await?;
        // one extra day on each side covers zone offsets
        let pending = self.appointments
            .list_pending_by_range(business_id, now - Duration::days(1), now + Duration::days(days as i64 + 1))
            .await?;

        let input = AvailabilityInput {
            business: &business,
            hours: &hours,
            exceptions: &exceptions,
            offers: &offers,
            appointment_types: &appointment_types,
            pending: &pending,
        };

        let data = build_availability(&input, &tz, days, now);
        info!("Computed availability for business {} over {} days ({} offers)", business_id, days, data.offers.len());
        Ok(data)
    }

    /// Loads the type and runs the non-transactional checks for `start`.
    async fn guard_slot(&self, business: &Business, appointment_type_id: &str, start: DateTime<Utc>, now: DateTime<Utc>) -> Result<AppointmentType, AppError> {
        let appointment_type = self.offers.find_type(&business.id, appointment_type_id).await?
            .ok_or(AppError::NotFound("Appointment type not found".into()))?;

        let tz = business.zone()?;
        let local_day = start.with_timezone(&tz).date_naive();
        let hours = self.businesses.list_hours(&business.id).await?;
        let exceptions = self.businesses.list_exceptions(&business.id, local_day, local_day).await?;

        validate_slot(&appointment_type, start, &tz, &hours, &exceptions, now)?;
        Ok(appointment_type)
    }

    pub async fn book(&self, business_id: &str, cmd: BookingCommand, now: DateTime<Utc>) -> Result<Appointment, AppError> {
        let business = self.load_business(business_id).await?;
        self.leads.find_by_id(business_id, &cmd.lead_id).await?
            .ok_or(AppError::NotFound("Lead not found".into()))?;

        let appointment_type = self.guard_slot(&business, &cmd.appointment_type_id, cmd.start, now).await?;

        let appointment = Appointment::new(NewAppointmentParams {
            business_id: business.id.clone(),
            lead_id: cmd.lead_id,
            appointment_type_id: appointment_type.id.clone(),
            start: cmd.start,
            subject: cmd.subject.filter(|s| !s.trim().is_empty()).unwrap_or_else(|| appointment_type.name.clone()),
            actor: cmd.actor.clone(),
        });
        let history = AppointmentHistory::new(appointment.id.clone(), HistoryAction::Created, &cmd.actor, None);

        let created = self.appointments.book(&appointment, appointment_type.concurrency_limit, &history).await?;
        info!("Appointment {} booked for lead {} at {}", created.id, created.lead_id, created.start_time);
        Ok(created)
    }

    /// Moves a pending entry: the original becomes RESCHEDULED and a new
    /// PENDING entry pointing back at it takes the new slot.
    pub async fn reschedule(&self, business_id: &str, cmd: RescheduleCommand, now: DateTime<Utc>) -> Result<Appointment, AppError> {
        let business = self.load_business(business_id).await?;

        let original = self.appointments.find_for_lead(&cmd.lead_id, &cmd.appointment_id).await?
            .filter(|a| a.business_id == business.id)
            .ok_or(AppError::NotFound("Appointment not found".into()))?;

        if !original.is_pending() {
            return Err(AppError::Validation(format!("Only pending appointments can be rescheduled (current status: {})", original.status)));
        }
        if original.start_time <= now {
            return Err(AppError::Validation("Cannot reschedule an appointment that has already passed".into()));
        }
        if original.start_time == cmd.new_start {
            return Err(AppError::Validation("The new time is the same as the current one".into()));
        }

        let appointment_type = self.guard_slot(&business, &original.appointment_type_id, cmd.new_start, now).await?;

        let mut replacement = Appointment::new(NewAppointmentParams {
            business_id: business.id.clone(),
            lead_id: original.lead_id.clone(),
            appointment_type_id: original.appointment_type_id.clone(),
            start: cmd.new_start,
            subject: original.subject.clone(),
            actor: cmd.actor.clone(),
        });
        replacement.rescheduled_from = Some(original.id.clone());

        let history = AppointmentHistory::new(original.id.clone(), HistoryAction::Rescheduled, &cmd.actor, cmd.reason);
        let moved = self.appointments.reschedule(&original, &replacement, appointment_type.concurrency_limit, &history).await?;

        info!("Appointment {} rescheduled to {} as {}", original.id, moved.start_time, moved.id);
        Ok(moved)
    }

    /// Closes a pending entry as COMPLETED or NO_SHOW.
    pub async fn close(&self, business_id: &str, appointment_id: &str, status: AppointmentStatus, actor: Actor) -> Result<Appointment, AppError> {
        if !matches!(status, AppointmentStatus::Completed | AppointmentStatus::NoShow) {
            return Err(AppError::Validation("Status must be COMPLETED or NO_SHOW".into()));
        }

        let appointment = self.appointments.find_by_id(business_id, appointment_id).await?
            .ok_or(AppError::NotFound("Appointment not found".into()))?;

        if !appointment.is_pending() {
            warn!("Refusing to close appointment {} in status {}", appointment.id, appointment.status);
            return Err(AppError::Validation(format!("Only pending appointments can be closed (current status: {})", appointment.status)));
        }

        let history = AppointmentHistory::new(appointment.id.clone(), HistoryAction::StatusChanged, &actor, Some(status.to_string()));
        self.appointments.set_status(&appointment, status, &history).await
    }

    pub async fn lead_appointments(&self, business_id: &str, lead_id: &str) -> Result<Vec<Appointment>, AppError> {
        self.leads.find_by_id(business_id, lead_id).await?
            .ok_or(AppError::NotFound("Lead not found".into()))?;
        self.appointments.list_by_lead(lead_id).await
    }

    pub async fn history(&self, business_id: &str, appointment_id: &str) -> Result<Vec<AppointmentHistory>, AppError> {
        self.appointments.find_by_id(business_id, appointment_id).await?
            .ok_or(AppError::NotFound("Appointment not found".into()))?;
        self.appointments.list_history(appointment_id).await
    }
}
