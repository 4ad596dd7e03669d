use agenda_backend::{
    api::router::create_router,
    config::Config,
    infra::factory::sqlite_state,
    state::AppState,
};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{Duration, NaiveDate, Utc};
use serde_json::{json, Value};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

/// Ids of a business seeded with one offer and one appointment type.
#[allow(dead_code)]
pub struct Seeded {
    pub business_id: String,
    pub offer_id: String,
    pub type_id: String,
    pub lead_id: String,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            default_horizon_days: 7,
            max_horizon_days: 60,
        };

        let state = Arc::new(sqlite_state(&config, pool.clone()));
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(payload) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        (status, parse_body(response).await)
    }

    pub async fn create_business(&self, timezone: &str) -> String {
        let (status, body) = self.send("POST", "/api/v1/businesses", Some(json!({
            "name": "Clinica Central",
            "timezone": timezone,
        }))).await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["id"].as_str().unwrap().to_string()
    }

    /// Same opening window on all seven days.
    pub async fn open_every_day(&self, business_id: &str, open: &str, close: &str) {
        let days = ["MONDAY", "TUESDAY", "WEDNESDAY", "THURSDAY", "FRIDAY", "SATURDAY", "SUNDAY"];
        let hours: Vec<Value> = days.iter()
            .map(|d| json!({"weekday": d, "open_time": open, "close_time": close}))
            .collect();
        let (status, body) = self.send("PUT", &format!("/api/v1/{}/hours", business_id), Some(json!({"hours": hours}))).await;
        assert_eq!(status, StatusCode::OK, "{}", body);
    }

    pub async fn create_type(&self, business_id: &str, offer_id: &str, name: &str, duration: Option<i32>, limit: Option<i32>) -> String {
        let (status, body) = self.send(
            "POST",
            &format!("/api/v1/{}/offers/{}/appointment-types", business_id, offer_id),
            Some(json!({"name": name, "duration_min": duration, "concurrency_limit": limit})),
        ).await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn create_lead(&self, business_id: &str, name: &str) -> String {
        let (status, body) = self.send("POST", &format!("/api/v1/{}/leads", business_id), Some(json!({
            "name": name,
            "email": format!("{}@example.com", name.to_lowercase()),
        }))).await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["id"].as_str().unwrap().to_string()
    }

    /// Business in `timezone` open 09:00-12:00 daily, with a 30 minute type.
    pub async fn seed(&self, timezone: &str, limit: Option<i32>) -> Seeded {
        let business_id = self.create_business(timezone).await;
        self.open_every_day(&business_id, "09:00", "12:00").await;

        let (status, offer) = self.send("POST", &format!("/api/v1/{}/offers", business_id), Some(json!({"name": "Consultas"}))).await;
        assert_eq!(status, StatusCode::CREATED, "{}", offer);
        let offer_id = offer["id"].as_str().unwrap().to_string();

        let type_id = self.create_type(&business_id, &offer_id, "Consulta", Some(30), limit).await;
        let lead_id = self.create_lead(&business_id, "Ana").await;

        Seeded { business_id, offer_id, type_id, lead_id }
    }

    pub async fn book(&self, seeded: &Seeded, lead_id: &str, date: NaiveDate, time: &str) -> (StatusCode, Value) {
        self.send("POST", &format!("/api/v1/{}/appointments", seeded.business_id), Some(json!({
            "leadId": lead_id,
            "tipoDeCitaId": seeded.type_id,
            "fecha": date.format("%Y-%m-%d").to_string(),
            "hora": time,
        }))).await
    }
}

#[allow(dead_code)]
pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

/// A UTC calendar day `offset` days from today.
#[allow(dead_code)]
pub fn day_from_today(offset: i64) -> NaiveDate {
    Utc::now().date_naive() + Duration::days(offset)
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
