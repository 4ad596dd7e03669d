pub mod appointment;
pub mod availability;
pub mod business;
pub mod cancellation;
pub mod lead;
pub mod offer;

pub mod health {
    use axum::Json;
    use serde_json::{json, Value};

    pub async fn health_check() -> Json<Value> {
        Json(json!({ "status": "ok" }))
    }
}
