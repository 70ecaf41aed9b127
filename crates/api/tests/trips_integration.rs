//! Integration tests for closing a trip and computing its fare.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

async fn setup() -> axum::Router {
    let pool = common::create_test_pool().await;
    common::run_migrations(&pool).await;
    common::cleanup_all_test_data(&pool).await;
    common::create_test_app(common::test_config(), pool)
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Drives a ride all the way to an ongoing trip and returns its id.
async fn open_trip(app: &axum::Router, driver_id: i64) -> i64 {
    let location = Request::builder()
        .method(Method::POST)
        .uri(format!("/v1/drivers/{driver_id}/location"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"lat": 12.9716, "lon": 77.5946}).to_string()))
        .unwrap();
    assert_eq!(app.clone().oneshot(location).await.unwrap().status(), StatusCode::OK);

    let create = Request::builder()
        .method(Method::POST)
        .uri("/v1/rides")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "pickup": {"lat": 12.9716, "lon": 77.5946},
                "destination": {"lat": 12.975, "lon": 77.599}
            })
            .to_string(),
        ))
        .unwrap();
    let ride = json_body(app.clone().oneshot(create).await.unwrap()).await;
    let ride_id = ride["id"].as_i64().unwrap();

    let get_request = Request::builder()
        .method(Method::GET)
        .uri(format!("/v1/rides/{ride_id}"))
        .body(Body::empty())
        .unwrap();
    let fetched = json_body(app.clone().oneshot(get_request).await.unwrap()).await;
    let assignment_id = fetched["assignment"]["id"].as_i64().unwrap();

    let accept = Request::builder()
        .method(Method::POST)
        .uri(format!("/v1/drivers/{driver_id}/accept"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"assignmentId": assignment_id}).to_string()))
        .unwrap();
    let accepted = json_body(app.clone().oneshot(accept).await.unwrap()).await;
    accepted["tripId"].as_i64().unwrap()
}

#[tokio::test]
async fn ending_a_trip_computes_fare_and_marks_it_completed() {
    let app = setup().await;
    let trip_id = open_trip(&app, 1).await;

    let end = Request::builder()
        .method(Method::POST)
        .uri(format!("/v1/trips/{trip_id}/end"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"endLat": 12.975, "endLon": 77.599}).to_string()))
        .unwrap();
    let response = app.oneshot(end).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;

    assert_eq!(body["tripId"], trip_id);
    assert_eq!(body["status"], "completed");
    // Flat rate of 2.0 plus a positive distance/duration contribution.
    let fare = body["fare"].as_f64().unwrap();
    assert!(fare >= 2.0, "fare {fare} should be at least the flat rate");
}

#[tokio::test]
async fn ending_a_trip_twice_fails_on_the_second_call() {
    let app = setup().await;
    let trip_id = open_trip(&app, 2).await;

    let end_once = Request::builder()
        .method(Method::POST)
        .uri(format!("/v1/trips/{trip_id}/end"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({}).to_string()))
        .unwrap();
    assert_eq!(app.clone().oneshot(end_once).await.unwrap().status(), StatusCode::OK);

    let end_twice = Request::builder()
        .method(Method::POST)
        .uri(format!("/v1/trips/{trip_id}/end"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({}).to_string()))
        .unwrap();
    let response = app.oneshot(end_twice).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn ending_a_trip_with_a_negative_id_is_unprocessable() {
    let app = setup().await;

    let end = Request::builder()
        .method(Method::POST)
        .uri("/v1/trips/-5/end")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({}).to_string()))
        .unwrap();
    let response = app.oneshot(end).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn ending_unknown_trip_is_404() {
    let app = setup().await;

    let end = Request::builder()
        .method(Method::POST)
        .uri("/v1/trips/999999999/end")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({}).to_string()))
        .unwrap();
    let response = app.oneshot(end).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
