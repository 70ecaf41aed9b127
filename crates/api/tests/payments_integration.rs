//! Integration tests for payment receipt lookup and settlement retries.

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

async fn completed_trip(app: &axum::Router, driver_id: i64) -> i64 {
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
                "destination": {"lat": 12.975, "lon": 77.599},
                "paymentMethod": "card"
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
    let trip_id = accepted["tripId"].as_i64().unwrap();

    let end = Request::builder()
        .method(Method::POST)
        .uri(format!("/v1/trips/{trip_id}/end"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({}).to_string()))
        .unwrap();
    assert_eq!(app.clone().oneshot(end).await.unwrap().status(), StatusCode::OK);

    trip_id
}

#[tokio::test]
async fn triggering_payment_returns_a_receipt_in_pending_or_success() {
    let app = setup().await;
    let trip_id = completed_trip(&app, 11).await;

    let trigger = Request::builder()
        .method(Method::POST)
        .uri("/v1/payments")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"tripId": trip_id}).to_string()))
        .unwrap();
    let response = app.oneshot(trigger).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let receipt = json_body(response).await;

    assert_eq!(receipt["tripId"], trip_id);
    assert_eq!(receipt["paymentMethod"], "card");
    let status = receipt["status"].as_str().unwrap();
    assert!(
        status == "pending" || status == "success",
        "unexpected payment status {status}"
    );
}

#[tokio::test]
async fn repeated_trigger_returns_the_same_payment_and_re_enqueues_while_pending() {
    let app = setup().await;
    let trip_id = completed_trip(&app, 12).await;

    let trigger_once = Request::builder()
        .method(Method::POST)
        .uri("/v1/payments")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"tripId": trip_id}).to_string()))
        .unwrap();
    let first = json_body(app.clone().oneshot(trigger_once).await.unwrap()).await;

    let trigger_again = Request::builder()
        .method(Method::POST)
        .uri("/v1/payments")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"tripId": trip_id}).to_string()))
        .unwrap();
    let second = json_body(app.oneshot(trigger_again).await.unwrap()).await;

    assert_eq!(first["paymentId"], second["paymentId"]);
}

#[tokio::test]
async fn triggering_payment_with_a_negative_trip_id_is_unprocessable() {
    let app = setup().await;

    let trigger = Request::builder()
        .method(Method::POST)
        .uri("/v1/payments")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"tripId": -1}).to_string()))
        .unwrap();
    let response = app.oneshot(trigger).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn triggering_payment_for_unknown_trip_is_404() {
    let app = setup().await;

    let trigger = Request::builder()
        .method(Method::POST)
        .uri("/v1/payments")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"tripId": 999999999}).to_string()))
        .unwrap();
    let response = app.oneshot(trigger).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
