mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use chrono_tz::Tz;
use common::{day_from_today, TestApp};
use serde_json::{json, Value};

fn slots_on(body: &Value, date: &str) -> Option<Vec<String>> {
    let days = body["data"]["ofertas"][0]["tiposDeCita"][0]["diasDisponibles"].as_array()?;
    let day = days.iter().find(|d| d["fecha"] == date)?;
    Some(day["horarios"].as_array()?.iter().map(|s| s["hora"].as_str().unwrap().to_string()).collect())
}

#[tokio::test]
async fn test_half_hour_slots_across_morning() {
    let app = TestApp::new().await;
    let seeded = app.seed("UTC", Some(1)).await;
    let tomorrow = day_from_today(1).format("%Y-%m-%d").to_string();

    let (status, body) = app.send("GET", &format!("/api/v1/{}/availability?diasAConsultar=3", seeded.business_id), None).await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    assert_eq!(body["data"]["negocio"]["id"], seeded.business_id);
    assert_eq!(body["data"]["negocio"]["nombre"], "Clinica Central");
    let kind = &body["data"]["ofertas"][0]["tiposDeCita"][0];
    assert_eq!(kind["nombre"], "Consulta");
    assert_eq!(kind["duracionMinutos"], 30);

    let slots = slots_on(&body, &tomorrow).expect("tomorrow should be listed");
    assert_eq!(slots, vec!["09:00", "09:30", "10:00", "10:30", "11:00", "11:30"]);

    let first_iso = kind["diasDisponibles"].as_array().unwrap().iter()
        .find(|d| d["fecha"] == tomorrow.as_str()).unwrap()["horarios"][0]["fechaCompletaISO"]
        .as_str().unwrap().to_string();
    assert_eq!(first_iso, format!("{}T09:00:00+00:00", tomorrow));
}

#[tokio::test]
async fn test_full_slot_is_hidden() {
    let app = TestApp::new().await;
    let seeded = app.seed("UTC", Some(1)).await;
    let tomorrow = day_from_today(1);

    let (status, _) = app.book(&seeded, &seeded.lead_id, tomorrow, "09:00").await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = app.send("GET", &format!("/api/v1/{}/availability?diasAConsultar=3", seeded.business_id), None).await;
    let slots = slots_on(&body, &tomorrow.format("%Y-%m-%d").to_string()).unwrap();
    assert_eq!(slots.len(), 5);
    assert_eq!(slots[0], "09:30");
}

#[tokio::test]
async fn test_unlimited_type_keeps_booked_slot() {
    let app = TestApp::new().await;
    let seeded = app.seed("UTC", None).await;
    let tomorrow = day_from_today(1);

    app.book(&seeded, &seeded.lead_id, tomorrow, "09:00").await;

    let (_, body) = app.send("GET", &format!("/api/v1/{}/availability", seeded.business_id), None).await;
    assert_eq!(slots_on(&body, &tomorrow.format("%Y-%m-%d").to_string()).unwrap().len(), 6);
}

#[tokio::test]
async fn test_day_off_exception_omits_day() {
    let app = TestApp::new().await;
    let seeded = app.seed("UTC", Some(1)).await;
    let tomorrow = day_from_today(1).format("%Y-%m-%d").to_string();

    let (status, body) = app.send("POST", &format!("/api/v1/{}/exceptions", seeded.business_id), Some(json!({
        "date": tomorrow,
        "is_day_off": true,
    }))).await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let (_, body) = app.send("GET", &format!("/api/v1/{}/availability?diasAConsultar=3", seeded.business_id), None).await;
    assert!(slots_on(&body, &tomorrow).is_none());
}

#[tokio::test]
async fn test_exception_hours_replace_weekly_hours() {
    let app = TestApp::new().await;
    let seeded = app.seed("UTC", Some(1)).await;
    let tomorrow = day_from_today(1).format("%Y-%m-%d").to_string();

    app.send("POST", &format!("/api/v1/{}/exceptions", seeded.business_id), Some(json!({
        "date": tomorrow,
        "open_time": "14:00",
        "close_time": "15:00",
    }))).await;

    let (_, body) = app.send("GET", &format!("/api/v1/{}/availability?diasAConsultar=3", seeded.business_id), None).await;
    assert_eq!(slots_on(&body, &tomorrow).unwrap(), vec!["14:00", "14:30"]);

    let (_, listed) = app.send("GET", &format!("/api/v1/{}/exceptions", seeded.business_id), None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_slots_use_business_zone() {
    let app = TestApp::new().await;
    let seeded = app.seed("America/Mexico_City", Some(1)).await;
    let tz: Tz = "America/Mexico_City".parse().unwrap();
    let local_tomorrow = (Utc::now().with_timezone(&tz).date_naive() + Duration::days(1)).format("%Y-%m-%d").to_string();

    let (_, body) = app.send("GET", &format!("/api/v1/{}/availability?diasAConsultar=3", seeded.business_id), None).await;
    let day = body["data"]["ofertas"][0]["tiposDeCita"][0]["diasDisponibles"].as_array().unwrap().iter()
        .find(|d| d["fecha"] == local_tomorrow.as_str())
        .cloned()
        .expect("local tomorrow should be listed");

    assert_eq!(day["horarios"][0]["hora"], "09:00");
    assert_eq!(day["horarios"][0]["fechaCompletaISO"], format!("{}T09:00:00-06:00", local_tomorrow));
}

#[tokio::test]
async fn test_invalid_horizon_is_rejected() {
    let app = TestApp::new().await;
    let seeded = app.seed("UTC", Some(1)).await;

    for bad in ["0", "-3", "abc", "61"] {
        let (status, body) = app.send("GET", &format!("/api/v1/{}/availability?diasAConsultar={}", seeded.business_id, bad), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "diasAConsultar={}", bad);
        assert_eq!(body["error"], "Validation");
    }
}

#[tokio::test]
async fn test_unknown_business_is_not_found() {
    let app = TestApp::new().await;
    let (status, body) = app.send("GET", "/api/v1/does-not-exist/availability", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NotFound");
}

#[tokio::test]
async fn test_type_without_duration_is_not_offered() {
    let app = TestApp::new().await;
    let seeded = app.seed("UTC", Some(1)).await;
    app.create_type(&seeded.business_id, &seeded.offer_id, "Llamada", None, None).await;

    let (_, body) = app.send("GET", &format!("/api/v1/{}/availability", seeded.business_id), None).await;
    let types = body["data"]["ofertas"][0]["tiposDeCita"].as_array().unwrap();
    assert_eq!(types.len(), 1);
    assert_eq!(types[0]["nombre"], "Consulta");
}

#[tokio::test]
async fn test_hours_summary_and_validation() {
    let app = TestApp::new().await;
    let business_id = app.create_business("UTC").await;

    let weekdays: Vec<Value> = ["MONDAY", "TUESDAY", "WEDNESDAY", "THURSDAY", "FRIDAY"].iter()
        .map(|d| json!({"weekday": d, "open_time": "09:00", "close_time": "17:00"}))
        .collect();
    let (status, body) = app.send("PUT", &format!("/api/v1/{}/hours", business_id), Some(json!({"hours": weekdays}))).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["summary"], "Our opening hours are Monday to Friday 09:00-17:00.");

    let (_, body) = app.send("GET", &format!("/api/v1/{}/hours", business_id), None).await;
    assert_eq!(body["hours"].as_array().unwrap().len(), 5);

    let (status, _) = app.send("PUT", &format!("/api/v1/{}/hours", business_id), Some(json!({
        "hours": [{"weekday": "MONDAY", "open_time": "17:00", "close_time": "09:00"}]
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.send("PUT", &format!("/api/v1/{}/hours", business_id), Some(json!({
        "hours": [{"weekday": "FUNDAY", "open_time": "09:00", "close_time": "17:00"}]
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_business_requires_valid_timezone() {
    let app = TestApp::new().await;
    let (status, body) = app.send("POST", "/api/v1/businesses", Some(json!({"name": "X", "timezone": "Mars/Olympus"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation");

    let (status, body) = app.send("POST", "/api/v1/businesses", Some(json!({"name": "", "timezone": "UTC"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["name"].is_array());
}

#[tokio::test]
async fn test_business_timezone_defaults_to_utc() {
    let app = TestApp::new().await;
    let (status, body) = app.send("POST", "/api/v1/businesses", Some(json!({"name": "Sin zona"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["timezone"], "UTC");

    let (status, fetched) = app.send("GET", &format!("/api/v1/{}", body["id"].as_str().unwrap()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Sin zona");
}
