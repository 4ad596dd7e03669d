use crate::domain::models::{
    business::{Business, BusinessHours, ScheduleException},
    offer::{Offer, AppointmentType},
    lead::Lead,
    appointment::{Appointment, AppointmentHistory, AppointmentStatus},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

#[async_trait]
pub trait BusinessRepository: Send + Sync {
    async fn create(&self, business: &Business) -> Result<Business, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Business>, AppError>;
    async fn replace_hours(&self, business_id: &str, hours: &[BusinessHours]) -> Result<Vec<BusinessHours>, AppError>;
    async fn list_hours(&self, business_id: &str) -> Result<Vec<BusinessHours>, AppError>;
    async fn upsert_exception(&self, exception: &ScheduleException) -> Result<ScheduleException, AppError>;
    async fn list_exceptions(&self, business_id: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<ScheduleException>, AppError>;
}

#[async_trait]
pub trait OfferRepository: Send + Sync {
    async fn create_offer(&self, offer: &Offer) -> Result<Offer, AppError>;
    async fn find_offer(&self, business_id: &str, id: &str) -> Result<Option<Offer>, AppError>;
    async fn list_offers(&self, business_id: &str) -> Result<Vec<Offer>, AppError>;
    async fn create_type(&self, appointment_type: &AppointmentType) -> Result<AppointmentType, AppError>;
    async fn find_type(&self, business_id: &str, id: &str) -> Result<Option<AppointmentType>, AppError>;
    async fn list_types(&self, business_id: &str) -> Result<Vec<AppointmentType>, AppError>;
}

#[async_trait]
pub trait LeadRepository: Send + Sync {
    async fn create(&self, lead: &Lead) -> Result<Lead, AppError>;
    async fn find_by_id(&self, business_id: &str, id: &str) -> Result<Option<Lead>, AppError>;
}

/// Agenda storage. `book` and `reschedule` must run the capacity check and the
/// insert inside one transaction holding a write lock scoped to the
/// appointment type.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn book(&self, appointment: &Appointment, limit: Option<i32>, history: &AppointmentHistory) -> Result<Appointment, AppError>;
    async fn reschedule(&self, original: &Appointment, replacement: &Appointment, limit: Option<i32>, history: &AppointmentHistory) -> Result<Appointment, AppError>;
    async fn cancel(&self, appointment: &Appointment, history: &AppointmentHistory) -> Result<Appointment, AppError>;
    async fn set_status(&self, appointment: &Appointment, status: AppointmentStatus, history: &AppointmentHistory) -> Result<Appointment, AppError>;
    async fn find_by_id(&self, business_id: &str, id: &str) -> Result<Option<Appointment>, AppError>;
    async fn find_for_lead(&self, lead_id: &str, id: &str) -> Result<Option<Appointment>, AppError>;
    async fn list_by_lead(&self, lead_id: &str) -> Result<Vec<Appointment>, AppError>;
    async fn list_upcoming_pending_for_lead(&self, lead_id: &str, after: DateTime<Utc>) -> Result<Vec<Appointment>, AppError>;
    async fn list_pending_by_range(&self, business_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Appointment>, AppError>;
    async fn list_history(&self, appointment_id: &str) -> Result<Vec<AppointmentHistory>, AppError>;
}
