// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Job callback security and acknowledgement tests.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

mod common;

async fn post_callback(
    token: Option<&str>,
    body: serde_json::Value,
) -> axum::http::Response<axum::body::Body> {
    let (app, _state) = common::create_test_app();
    let mut builder = Request::builder()
        .method("POST")
        .uri("/callback/jobs")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header("x-callback-token", token);
    }

    app.oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_missing_token_is_forbidden() {
    let response = post_callback(None, json!({"job_id": "irrelevant"})).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_wrong_token_is_forbidden() {
    let response = post_callback(Some("wrong"), json!({"job_id": "irrelevant"})).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unparseable_report_is_acknowledged() {
    // The config default carries the test token. A payload that passes
    // the secret check but not the schema is logged and acked with 200
    // so the worker does not retry it.
    let response = post_callback(
        Some("test_callback_token"),
        json!({"unexpected": "shape"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_valid_report_with_offline_db_is_still_acknowledged() {
    let response = post_callback(
        Some("test_callback_token"),
        json!({
            "correlation_id": "6f3e9f34-58c8-4f14-9be1-4c0b8e0ddc5a",
            "job_id": "a2e8a6a2-7a34-4d0e-8b6a-3f8f0f8f8f8f",
            "job_status": "COMPLETED",
            "result_geojson_url": "http://worker:9090/results/abc.geojson"
        }),
    )
    .await;
    // Processing fails against the offline mock, but the report is acked.
    assert_eq!(response.status(), StatusCode::OK);
}
