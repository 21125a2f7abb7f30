//! HTTP surface tests
//!
//! Drives the router in-process with `tower::ServiceExt::oneshot`. Domain
//! failures on `/predict` come back as `200 OK` with an `error` field.

mod common;

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use crop_advisor::{create_app, AppState, Config};
use serde_json::Value;
use shared::AreaUnits;
use tower::ServiceExt;

fn app() -> (Router, Arc<common::StubWeather>) {
    let weather = common::StubWeather::new(common::lucknow_weather());
    let state = AppState {
        service: Arc::new(common::service(weather.clone(), AreaUnits::Consistent)),
        config: Arc::new(Config::defaults().unwrap()),
        district_count: common::DISTRICTS.len(),
    };
    (create_app(state), weather)
}

fn form_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_root_banner() {
    let (app, _) = app();
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health() {
    let (app, _) = app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model"], "fixture-gbr");
    assert_eq!(body["districts"], 4);
    assert_eq!(body["environment"], "development");
}

#[tokio::test]
async fn test_crop_table() {
    let (app, _) = app();
    let response = app
        .oneshot(Request::builder().uri("/api/v1/crops").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let body = json_body(response).await;
    let crops = body.as_array().unwrap();
    assert_eq!(crops.len(), 22);
    assert_eq!(crops[0]["name"], "Rice");
    assert_eq!(crops[1]["msp_per_quintal"], 2275.0);
    assert_eq!(crops[1]["water_req_mm"], 550.0);
}

#[tokio::test]
async fn test_predict_success() {
    let (app, weather) = app();
    let response = app
        .oneshot(form_request("district=Lucknow&crop=Wheat&year=2024&area=2.0"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body.get("error").is_none());
    assert_eq!(body["district"], "Lucknow");
    assert_eq!(body["crop"], "Wheat");
    assert_eq!(body["year"], 2024);
    assert_eq!(body["area"], 2.0);
    assert_eq!(body["irrigation_needed"], 470.0);
    assert_eq!(body["weather"]["source"], "openweather");
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 3);
    assert_eq!(body["explanations"].as_array().unwrap().len(), 3);
    assert_eq!(weather.calls(), 1);
}

#[tokio::test]
async fn test_predict_defaults_year_and_area() {
    let (app, _) = app();
    let response = app
        .oneshot(form_request("district=agra&crop=rice"))
        .await
        .unwrap();

    let body = json_body(response).await;
    assert_eq!(body["year"], 2025);
    assert_eq!(body["area"], 1.0);
    assert_eq!(body["district"], "Agra");
}

#[tokio::test]
async fn test_predict_blank_year_and_area_take_defaults() {
    let (app, weather) = app();
    let response = app
        .oneshot(form_request("district=Lucknow&crop=Wheat&year=&area="))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body.get("error").is_none(), "unexpected error: {}", body);
    assert_eq!(body["year"], 2025);
    assert_eq!(body["area"], 1.0);
    assert_eq!(weather.calls(), 1);
}

#[tokio::test]
async fn test_predict_invalid_district() {
    let (app, weather) = app();
    let response = app
        .oneshot(form_request("district=Narnia&crop=Wheat"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body, serde_json::json!({"error": "Enter a valid district"}));
    assert_eq!(weather.calls(), 0);
}

#[tokio::test]
async fn test_predict_invalid_year() {
    let (app, weather) = app();
    let response = app
        .oneshot(form_request("district=Lucknow&crop=Wheat&year=next"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("Invalid year"));
    assert_eq!(weather.calls(), 0);
}

#[tokio::test]
async fn test_predict_invalid_area() {
    let (app, _) = app();
    let response = app
        .oneshot(form_request("district=Lucknow&crop=Wheat&area=lots"))
        .await
        .unwrap();

    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("Invalid area"));
}

#[tokio::test]
async fn test_predict_without_form_body_is_payload_error() {
    let (app, _) = app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/predict")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body.get("error").is_some());
}
