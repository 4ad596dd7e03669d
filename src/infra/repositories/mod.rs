pub mod sqlite_business_repo;
pub mod sqlite_offer_repo;
pub mod sqlite_lead_repo;
pub mod sqlite_appointment_repo;

pub mod postgres_business_repo;
pub mod postgres_offer_repo;
pub mod postgres_lead_repo;
pub mod postgres_appointment_repo;
