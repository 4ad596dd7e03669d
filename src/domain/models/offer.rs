use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Offer {
    pub id: String,
    pub business_id: String,
    pub name: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Offer {
    pub fn new(business_id: String, name: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            business_id,
            name,
            active: true,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct AppointmentType {
    pub id: String,
    pub business_id: String,
    pub offer_id: String,
    pub name: String,
    /// `None` means the type cannot be slotted.
    pub duration_min: Option<i32>,
    /// `None` means unlimited.
    pub concurrency_limit: Option<i32>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

pub struct NewAppointmentTypeParams {
    pub business_id: String,
    pub offer_id: String,
    pub name: String,
    pub duration_min: Option<i32>,
    pub concurrency_limit: Option<i32>,
}

impl AppointmentType {
    pub fn new(params: NewAppointmentTypeParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            business_id: params.business_id,
            offer_id: params.offer_id,
            name: params.name,
            duration_min: params.duration_min,
            concurrency_limit: params.concurrency_limit,
            active: true,
            created_at: Utc::now(),
        }
    }
}
