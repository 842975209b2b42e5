// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Analysis request routes: submission, admin CRUD, counts, job
//! submission, and the requester-facing finalized-job flow.

use crate::error::{AppError, Result};
use crate::models::job::{Job, JobStatus};
use crate::models::request::{AnalysisRequest, RequestStatus};
use crate::services::region;
use crate::time_utils::now_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;
use validator::Validate;

/// Request routes. The submission endpoint is public (the map page posts
/// to it); everything else is reached from the admin dashboard.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/v1/requests",
            get(list_requests).post(create_request),
        )
        .route("/api/v1/requests/count/total", get(count_total))
        .route("/api/v1/requests/count/pending", get(count_pending))
        .route("/api/v1/requests/count/completed", get(count_completed))
        .route(
            "/api/v1/requests/{id}",
            get(get_request)
                .put(update_request)
                .delete(delete_request),
        )
        .route("/api/v1/requests/{id}/submit-job", post(submit_job))
        .route("/api/v1/requests/{id}/jobs-results", get(jobs_results))
        .route("/api/v1/requests/{id}/finalized-job", post(finalized_job))
        .route("/api/v1/requests/{id}/send-email", post(send_email))
}

// ─── DTOs ────────────────────────────────────────────────────

/// Request submitted from the public map page.
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequestPayload {
    #[validate(length(min = 1, max = 120))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    pub company_name: Option<String>,
    #[validate(length(min = 1, max = 40))]
    pub phone_number: String,
    /// The drawn region as a GeoJSON string
    pub geo_json: String,
    pub message: Option<String>,
}

/// Partial update from the dashboard; only provided fields change.
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequestPayload {
    #[validate(length(min = 1, max = 120))]
    pub username: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub company_name: Option<String>,
    pub phone_number: Option<String>,
    pub geo_json: Option<String>,
    pub message: Option<String>,
    pub status: Option<RequestStatus>,
}

/// Request with its jobs, as the dashboard renders it.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RequestResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub company_name: Option<String>,
    pub phone_number: String,
    pub geo_json: String,
    pub message: Option<String>,
    pub status: RequestStatus,
    pub created_at: String,
    pub updated_at: String,
    pub jobs: Vec<JobResponse>,
}

/// Job as embedded in request views. Carries the owning request's region
/// so the dashboard can draw job results in context.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct JobResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub id: Uuid,
    pub status: JobStatus,
    pub result_data: Option<String>,
    pub result_geojson: Option<String>,
    pub satellite_image_url: Option<String>,
    pub finalized: bool,
    pub created_at: String,
    pub updated_at: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub request_id: Uuid,
    pub geo_json: String,
}

/// Body of the requester's finalized-job lookup.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizedJobPayload {
    pub email_id: String,
}

/// Body of the send-email call; the dashboard supplies the results link.
#[derive(Deserialize)]
pub struct SendEmailPayload {
    pub link: String,
}

/// Simple acknowledgement body.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MessageResponse {
    pub message: String,
}

pub(crate) fn job_response(request: &AnalysisRequest, job: Job) -> JobResponse {
    JobResponse {
        id: job.id,
        status: job.status,
        result_data: job.result_data,
        result_geojson: job.result_geojson,
        satellite_image_url: job.satellite_image_url,
        finalized: job.finalized,
        created_at: job.created_at,
        updated_at: job.updated_at,
        request_id: request.id,
        geo_json: request.geo_json.clone(),
    }
}

fn request_response(request: AnalysisRequest, jobs: Vec<Job>) -> RequestResponse {
    let jobs = jobs
        .into_iter()
        .map(|j| job_response(&request, j))
        .collect();
    RequestResponse {
        id: request.id,
        username: request.username,
        email: request.email,
        company_name: request.company_name,
        phone_number: request.phone_number,
        geo_json: request.geo_json,
        message: request.message,
        status: request.status,
        created_at: request.created_at,
        updated_at: request.updated_at,
        jobs,
    }
}

/// Fetch a request or 404.
pub(crate) async fn require_request(
    state: &AppState,
    id: Uuid,
) -> Result<AnalysisRequest> {
    state
        .db
        .get_request(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Request {} not found", id)))
}

// ─── Handlers ────────────────────────────────────────────────

/// List all requests with their jobs.
async fn list_requests(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RequestResponse>>> {
    let requests = state.db.list_requests().await?;

    let mut responses = Vec::with_capacity(requests.len());
    for request in requests {
        let jobs = state.db.jobs_for_request(request.id).await?;
        responses.push(request_response(request, jobs));
    }

    Ok(Json(responses))
}

/// Submit a new analysis request from the public map page.
async fn create_request(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SubmitRequestPayload>,
) -> Result<(StatusCode, Json<RequestResponse>)> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    region::validate_region(&payload.geo_json)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let now = now_rfc3339();
    let request = AnalysisRequest {
        id: Uuid::new_v4(),
        username: payload.username,
        email: payload.email,
        company_name: payload.company_name,
        phone_number: payload.phone_number,
        geo_json: payload.geo_json,
        message: payload.message,
        status: RequestStatus::Pending,
        created_at: now.clone(),
        updated_at: now,
    };

    state.db.upsert_request(&request).await?;

    tracing::info!(request_id = %request.id, "Analysis request created");

    Ok((
        StatusCode::CREATED,
        Json(request_response(request, Vec::new())),
    ))
}

/// Get one request with its jobs.
async fn get_request(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<RequestResponse>> {
    let request = require_request(&state, id).await?;
    let jobs = state.db.jobs_for_request(id).await?;
    Ok(Json(request_response(request, jobs)))
}

/// Update a request; only fields present in the payload change.
async fn update_request(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRequestPayload>,
) -> Result<Json<RequestResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let mut request = require_request(&state, id).await?;

    if let Some(username) = payload.username {
        request.username = username;
    }
    if let Some(email) = payload.email {
        request.email = email;
    }
    if let Some(company_name) = payload.company_name {
        request.company_name = Some(company_name);
    }
    if let Some(phone_number) = payload.phone_number {
        request.phone_number = phone_number;
    }
    if let Some(geo_json) = payload.geo_json {
        region::validate_region(&geo_json).map_err(|e| AppError::BadRequest(e.to_string()))?;
        request.geo_json = geo_json;
    }
    if let Some(message) = payload.message {
        request.message = Some(message);
    }
    if let Some(status) = payload.status {
        request.status = status;
    }
    request.updated_at = now_rfc3339();

    state.db.upsert_request(&request).await?;

    let jobs = state.db.jobs_for_request(id).await?;
    Ok(Json(request_response(request, jobs)))
}

/// Delete a request and every job attached to it.
async fn delete_request(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    require_request(&state, id).await?;

    state.db.delete_jobs_for_request(id).await?;
    state.db.delete_request(id).await?;

    tracing::info!(request_id = %id, "Request deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ─── Dashboard Counts ────────────────────────────────────────

async fn count_total(State(state): State<Arc<AppState>>) -> Result<Json<u64>> {
    Ok(Json(state.db.count_requests().await?))
}

async fn count_pending(State(state): State<Arc<AppState>>) -> Result<Json<u64>> {
    Ok(Json(
        state
            .db
            .count_requests_by_status(RequestStatus::Pending)
            .await?,
    ))
}

async fn count_completed(State(state): State<Arc<AppState>>) -> Result<Json<u64>> {
    Ok(Json(
        state
            .db
            .count_requests_by_status(RequestStatus::Completed)
            .await?,
    ))
}

// ─── Job Submission ──────────────────────────────────────────

/// Create a job for a request and dispatch it to the analysis worker.
async fn submit_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<RequestResponse>> {
    let request = require_request(&state, id).await?;

    let now = now_rfc3339();
    let mut job = Job {
        id: Uuid::new_v4(),
        request_id: request.id,
        status: JobStatus::Pending,
        result_data: None,
        result_geojson: None,
        satellite_image_url: None,
        super_resolution: None,
        finalized: false,
        created_at: now.clone(),
        updated_at: now,
    };
    state.db.upsert_job(&job).await?;

    let callback_url = format!("{}/callback/jobs", state.config.api_url);
    match state
        .analysis_service
        .dispatch_job(job.id, request.id, &request.geo_json, &callback_url)
        .await
    {
        Ok(correlation_id) => {
            tracing::info!(
                request_id = %request.id,
                job_id = %job.id,
                %correlation_id,
                "Job submitted"
            );
        }
        Err(e) => {
            // The worker never saw the job; record the failure instead of
            // leaving a forever-pending record.
            job.status = JobStatus::Failed;
            job.updated_at = now_rfc3339();
            state.db.upsert_job(&job).await?;
            return Err(e);
        }
    }

    let jobs = state.db.jobs_for_request(id).await?;
    Ok(Json(request_response(request, jobs)))
}

/// Jobs for a request, for the requester-facing results page.
async fn jobs_results(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<JobResponse>>> {
    let request = require_request(&state, id).await?;
    let jobs = state.db.jobs_for_request(id).await?;

    if jobs.is_empty() {
        return Err(AppError::NotFound(
            "No jobs found for this request ID yet.".to_string(),
        ));
    }

    Ok(Json(
        jobs.into_iter().map(|j| job_response(&request, j)).collect(),
    ))
}

/// Look up the finalized job for a request, gated on the requester's
/// email matching the one on file.
async fn finalized_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FinalizedJobPayload>,
) -> Result<Json<JobResponse>> {
    let request = require_request(&state, id).await?;

    if !request.email.eq_ignore_ascii_case(payload.email_id.trim()) {
        tracing::warn!(request_id = %id, "Finalized-job lookup with mismatched email");
        return Err(AppError::BadRequest(
            "Email ID does not match the request ID.".to_string(),
        ));
    }

    let jobs = state.db.jobs_for_request(id).await?;
    let finalized = jobs
        .into_iter()
        .find(|j| j.finalized)
        .ok_or_else(|| {
            AppError::NotFound("No finalized job found for the given ID.".to_string())
        })?;

    Ok(Json(job_response(&request, finalized)))
}

// ─── Email ───────────────────────────────────────────────────

/// Send the results-ready email to the requester.
async fn send_email(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SendEmailPayload>,
) -> Result<Json<MessageResponse>> {
    let request = require_request(&state, id).await?;

    state
        .mail_service
        .send_results_ready(&request.email, request.id, &payload.link)
        .await?;

    Ok(Json(MessageResponse {
        message: "Email sent successfully!".to_string(),
    }))
}
