// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request submission validation tests.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

mod common;

const CLOSED_REGION: &str = r#"{"type":"Polygon","coordinates":[[[-96.3,30.6],[-96.3,30.7],[-96.2,30.7],[-96.3,30.6]]]}"#;
const OPEN_REGION: &str = r#"{"type":"Polygon","coordinates":[[[-96.3,30.6],[-96.3,30.7],[-96.2,30.7],[-96.25,30.65]]]}"#;

fn submission(email: &str, geo_json: &str) -> String {
    json!({
        "username": "Jordan",
        "email": email,
        "companyName": "City of Bryan",
        "phoneNumber": "555-0100",
        "geoJson": geo_json,
        "message": "Please survey our district"
    })
    .to_string()
}

async fn post_request(body: String) -> axum::http::Response<axum::body::Body> {
    let (app, _state) = common::create_test_app();
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/v1/requests")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn test_invalid_email_is_rejected() {
    let response = post_request(submission("not-an-email", CLOSED_REGION)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_open_region_ring_is_rejected() {
    let response = post_request(submission("jordan@example.com", OPEN_REGION)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_polygon_region_is_rejected() {
    let line = r#"{"type":"LineString","coordinates":[[-96.3,30.6],[-96.2,30.7]]}"#;
    let response = post_request(submission("jordan@example.com", line)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_valid_submission_reaches_the_database() {
    // The offline mock has no backing store, so a submission that passes
    // validation surfaces as a database error rather than a 400.
    let response = post_request(submission("jordan@example.com", CLOSED_REGION)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_malformed_request_id_is_rejected() {
    let (app, _state) = common::create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/requests/not-a-uuid")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_endpoint_is_public() {
    let (app, _state) = common::create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
