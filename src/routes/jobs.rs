// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-job routes: finalization, deletion, and the result views.

use crate::error::{AppError, Result};
use crate::models::results::ResultData;
use crate::models::Job;
use crate::routes::requests::{require_request, MessageResponse};
use crate::services::results;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;

/// Job routes, all scoped under their owning request.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/v1/requests/{id}/job/{job_id}/finalize",
            post(finalize_job),
        )
        .route(
            "/api/v1/requests/{id}/job/{job_id}/reset-finalize",
            post(reset_finalize),
        )
        .route(
            "/api/v1/requests/{id}/job/{job_id}/delete",
            delete(delete_job),
        )
        .route(
            "/api/v1/requests/{id}/job/{job_id}/geojson-result",
            get(geojson_result),
        )
        .route(
            "/api/v1/requests/{id}/job/{job_id}/result",
            get(job_result),
        )
        .route(
            "/api/v1/requests/{id}/job/{job_id}/sri-result",
            get(sri_result),
        )
}

/// Super-resolution imagery response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SuperResolutionResponse {
    pub image_url: String,
    pub bounds: Option<String>,
}

/// Fetch a job and verify it belongs to the request.
async fn require_owned_job(
    state: &AppState,
    request_id: Uuid,
    job_id: Uuid,
) -> Result<Job> {
    // The request must exist even when only the job is touched, so stale
    // links to deleted requests 404 rather than leak job data.
    require_request(state, request_id).await?;

    let job = state
        .db
        .get_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", job_id)))?;

    if job.request_id != request_id {
        return Err(AppError::BadRequest(
            "Job does not belong to the specified request".to_string(),
        ));
    }

    Ok(job)
}

/// Mark a job's result as the finalized one for its request.
///
/// Only one job per request can be finalized at a time.
async fn finalize_job(
    State(state): State<Arc<AppState>>,
    Path((request_id, job_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MessageResponse>> {
    let mut job = require_owned_job(&state, request_id, job_id).await?;

    let already_finalized = state
        .db
        .jobs_for_request(request_id)
        .await?
        .iter()
        .any(|j| j.finalized);
    if already_finalized {
        return Err(AppError::Forbidden(
            "Another job is already finalized. Only one job can be finalized at a time."
                .to_string(),
        ));
    }

    job.finalized = true;
    job.updated_at = crate::time_utils::now_rfc3339();
    state.db.upsert_job(&job).await?;

    tracing::info!(%request_id, %job_id, "Job finalized");
    Ok(Json(MessageResponse {
        message: "Job result successfully finalized!".to_string(),
    }))
}

/// Clear a job's finalized flag.
async fn reset_finalize(
    State(state): State<Arc<AppState>>,
    Path((request_id, job_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MessageResponse>> {
    let mut job = require_owned_job(&state, request_id, job_id).await?;

    job.finalized = false;
    job.updated_at = crate::time_utils::now_rfc3339();
    state.db.upsert_job(&job).await?;

    tracing::info!(%request_id, %job_id, "Job finalization reset");
    Ok(Json(MessageResponse {
        message: "Reset Success!".to_string(),
    }))
}

/// Delete a job.
async fn delete_job(
    State(state): State<Arc<AppState>>,
    Path((request_id, job_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MessageResponse>> {
    require_owned_job(&state, request_id, job_id).await?;
    state.db.delete_job(job_id).await?;

    tracing::info!(%request_id, %job_id, "Job deleted");
    Ok(Json(MessageResponse {
        message: format!("Job Id: {} deleted successfully", job_id),
    }))
}

/// Raw result GeoJSON, exactly as stored from the worker.
async fn geojson_result(
    State(state): State<Arc<AppState>>,
    Path((request_id, job_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse> {
    let job = require_owned_job(&state, request_id, job_id).await?;

    let geojson = job.result_geojson.ok_or_else(|| {
        AppError::NotFound(format!("Job {} has no result yet", job_id))
    })?;

    // The stored document is already JSON; pass it through untouched.
    Ok(([(header::CONTENT_TYPE, "application/json")], geojson))
}

/// Classified result data: map features with condition colors, the PCI
/// distribution, and the per-segment summary.
async fn job_result(
    State(state): State<Arc<AppState>>,
    Path((request_id, job_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ResultData>> {
    let job = require_owned_job(&state, request_id, job_id).await?;

    let geojson = job.result_geojson.ok_or_else(|| {
        AppError::NotFound(format!("Job {} has no result yet", job_id))
    })?;

    let data = results::extract_result_json(&geojson)?;
    Ok(Json(data))
}

/// Super-resolution imagery for a job.
async fn sri_result(
    State(state): State<Arc<AppState>>,
    Path((request_id, job_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<SuperResolutionResponse>> {
    let job = require_owned_job(&state, request_id, job_id).await?;

    let sr = job.super_resolution.ok_or_else(|| {
        AppError::NotFound(format!("Job {} has no super-resolution result", job_id))
    })?;

    Ok(Json(SuperResolutionResponse {
        image_url: sr.image_url,
        bounds: sr.bounds,
    }))
}
