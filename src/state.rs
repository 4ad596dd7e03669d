use std::sync::Arc;
use crate::domain::ports::{AppointmentRepository, BusinessRepository, LeadRepository, OfferRepository};
use crate::domain::services::{cancellation_service::CancellationService, scheduling_service::SchedulingService};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub business_repo: Arc<dyn BusinessRepository>,
    pub offer_repo: Arc<dyn OfferRepository>,
    pub lead_repo: Arc<dyn LeadRepository>,
    pub appointment_repo: Arc<dyn AppointmentRepository>,
    pub scheduling: Arc<SchedulingService>,
    pub cancellation: Arc<CancellationService>,
}

impl AppState {
    pub fn new(
        config: Config,
        business_repo: Arc<dyn BusinessRepository>,
        offer_repo: Arc<dyn OfferRepository>,
        lead_repo: Arc<dyn LeadRepository>,
        appointment_repo: Arc<dyn AppointmentRepository>,
    ) -> Self {
        let scheduling = Arc::new(SchedulingService::new(
            business_repo.clone(),
            offer_repo.clone(),
            lead_repo.clone(),
            appointment_repo.clone(),
            config.default_horizon_days,
            config.max_horizon_days,
        ));
        let cancellation = Arc::new(CancellationService::new(
            business_repo.clone(),
            offer_repo.clone(),
            lead_repo.clone(),
            appointment_repo.clone(),
        ));

        Self { config, business_repo, offer_repo, lead_repo, appointment_repo, scheduling, cancellation }
    }
}
