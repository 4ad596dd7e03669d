use crate::domain::models::business::BusinessHours;
use crate::domain::services::availability::AvailabilityData;
use serde::Serialize;

#[derive(Serialize)]
pub struct HoursResponse {
    pub hours: Vec<BusinessHours>,
    pub summary: String,
}

#[derive(Serialize)]
pub struct AvailabilityResponse {
    pub message: String,
    pub data: AvailabilityData,
}
