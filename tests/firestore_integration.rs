// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running; they skip
//! themselves when FIRESTORE_EMULATOR_HOST is not set.

use paveinsight::models::job::{Job, JobStatus};
use paveinsight::models::request::{AnalysisRequest, RequestStatus};
use uuid::Uuid;

mod common;
use common::test_db;

const REGION: &str = r#"{"type":"Polygon","coordinates":[[[-96.3,30.6],[-96.3,30.7],[-96.2,30.7],[-96.3,30.6]]]}"#;

fn test_request() -> AnalysisRequest {
    AnalysisRequest {
        id: Uuid::new_v4(),
        username: "Test User".to_string(),
        email: "test@example.com".to_string(),
        company_name: Some("Test Co".to_string()),
        phone_number: "555-0100".to_string(),
        geo_json: REGION.to_string(),
        message: None,
        status: RequestStatus::Pending,
        created_at: "2024-01-15T10:00:00Z".to_string(),
        updated_at: "2024-01-15T10:00:00Z".to_string(),
    }
}

fn test_job(request_id: Uuid, created_at: &str) -> Job {
    Job {
        id: Uuid::new_v4(),
        request_id,
        status: JobStatus::Pending,
        result_data: None,
        result_geojson: None,
        satellite_image_url: None,
        super_resolution: None,
        finalized: false,
        created_at: created_at.to_string(),
        updated_at: created_at.to_string(),
    }
}

#[tokio::test]
async fn test_request_round_trip() {
    require_emulator!();

    let db = test_db().await;
    let request = test_request();

    assert!(db.get_request(request.id).await.unwrap().is_none());

    db.upsert_request(&request).await.unwrap();
    let stored = db.get_request(request.id).await.unwrap().unwrap();
    assert_eq!(stored.email, "test@example.com");
    assert_eq!(stored.status, RequestStatus::Pending);

    // Status update shows up in the by-status counts
    let mut updated = stored;
    updated.status = RequestStatus::Completed;
    db.upsert_request(&updated).await.unwrap();
    let completed = db
        .count_requests_by_status(RequestStatus::Completed)
        .await
        .unwrap();
    assert!(completed >= 1);

    db.delete_request(request.id).await.unwrap();
    assert!(db.get_request(request.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_jobs_are_scoped_to_their_request() {
    require_emulator!();

    let db = test_db().await;
    let request = test_request();
    db.upsert_request(&request).await.unwrap();

    let first = test_job(request.id, "2024-01-15T11:00:00Z");
    let second = test_job(request.id, "2024-01-15T12:00:00Z");
    db.upsert_job(&first).await.unwrap();
    db.upsert_job(&second).await.unwrap();

    // Unrelated request's job must not appear in the listing
    let other_request = test_request();
    db.upsert_request(&other_request).await.unwrap();
    db.upsert_job(&test_job(other_request.id, "2024-01-15T13:00:00Z"))
        .await
        .unwrap();

    let jobs = db.jobs_for_request(request.id).await.unwrap();
    assert_eq!(jobs.len(), 2);
    // Oldest first
    assert_eq!(jobs[0].id, first.id);
    assert_eq!(jobs[1].id, second.id);

    db.delete_jobs_for_request(request.id).await.unwrap();
    assert!(db.jobs_for_request(request.id).await.unwrap().is_empty());
}
