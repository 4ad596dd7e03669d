use axum::{
    body::Body,
    extract::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{health, business, offer, lead, availability, appointment, cancellation};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Business setup
        .route("/api/v1/businesses", post(business::create_business))
        .route("/api/v1/{business_id}", get(business::get_business))
        .route("/api/v1/{business_id}/hours", get(business::get_hours).put(business::replace_hours))
        .route("/api/v1/{business_id}/exceptions", get(business::list_exceptions).post(business::upsert_exception))

        // Catalogue
        .route("/api/v1/{business_id}/offers", get(offer::list_offers).post(offer::create_offer))
        .route("/api/v1/{business_id}/offers/{offer_id}/appointment-types", post(offer::create_appointment_type))

        // Leads
        .route("/api/v1/{business_id}/leads", post(lead::create_lead))
        .route("/api/v1/{business_id}/leads/{lead_id}/appointments", get(lead::list_lead_appointments))

        // Agenda
        .route("/api/v1/{business_id}/availability", get(availability::get_availability))
        .route("/api/v1/{business_id}/appointments", post(appointment::book_appointment))
        .route("/api/v1/{business_id}/appointments/cancel", post(cancellation::cancel_appointment))
        .route("/api/v1/{business_id}/appointments/{appointment_id}/reschedule", post(appointment::reschedule_appointment))
        .route("/api/v1/{business_id}/appointments/{appointment_id}/status", post(appointment::update_status))
        .route("/api/v1/{business_id}/appointments/{appointment_id}/history", get(appointment::get_history))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
