// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Callback route the analysis worker posts completion reports to.

use crate::models::job::{JobStatus, SuperResolution};
use crate::time_utils::now_rfc3339;
use crate::AppState;
use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

/// Header carrying the shared callback secret.
const CALLBACK_TOKEN_HEADER: &str = "x-callback-token";

/// Callback routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/callback/jobs", post(handle_job_reply))
}

/// Completion report posted by the analysis worker.
#[derive(Deserialize, Debug)]
struct JobReply {
    correlation_id: Option<Uuid>,
    job_id: Uuid,
    /// "COMPLETED" or "FAILED"
    job_status: String,
    #[serde(default)]
    result_geojson_url: Option<String>,
    #[serde(default)]
    satellite_image_url: Option<String>,
    #[serde(default)]
    super_resolution_image_url: Option<String>,
    #[serde(default)]
    bounds: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Handle a job completion report (POST).
///
/// The secret check is the only hard rejection. After that, failures are
/// logged and acknowledged with 200 so the worker does not retry a report
/// we cannot process any better the second time.
async fn handle_job_reply(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<serde_json::Value>,
) -> StatusCode {
    let presented = headers
        .get(CALLBACK_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if presented != state.config.callback_token {
        tracing::warn!("Security Alert: Job callback with bad or missing token");
        return StatusCode::FORBIDDEN;
    }

    let reply: JobReply = match serde_json::from_value(payload.clone()) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(error = %e, "Failed to parse job callback");
            return StatusCode::OK;
        }
    };

    tracing::info!(
        job_id = %reply.job_id,
        correlation_id = ?reply.correlation_id,
        status = %reply.job_status,
        "Job callback received"
    );

    if let Err(e) = apply_job_reply(&state, &reply, &payload).await {
        tracing::error!(job_id = %reply.job_id, error = %e, "Failed to apply job callback");
    }

    StatusCode::OK
}

/// Update the job record from a completion report.
async fn apply_job_reply(
    state: &AppState,
    reply: &JobReply,
    raw_payload: &serde_json::Value,
) -> crate::error::Result<()> {
    // Cross-check against the dispatch record when we still have one.
    // Unknown correlation IDs can be legitimate (service restart), so
    // they only downgrade to a warning.
    if let Some(correlation_id) = reply.correlation_id {
        match state.analysis_service.take_pending(correlation_id) {
            Some(dispatch) if dispatch.job_id != reply.job_id => {
                tracing::warn!(
                    %correlation_id,
                    dispatched_job = %dispatch.job_id,
                    reported_job = %reply.job_id,
                    "Callback job ID does not match its dispatch record"
                );
            }
            Some(_) => {}
            None => {
                tracing::warn!(%correlation_id, "Callback for unknown correlation ID");
            }
        }
    }

    let mut job = state
        .db
        .get_job(reply.job_id)
        .await?
        .ok_or_else(|| {
            crate::error::AppError::NotFound(format!("Job {} not found", reply.job_id))
        })?;

    // Keep the full report for the dashboard's job detail view.
    job.result_data = Some(raw_payload.to_string());
    if let Some(url) = &reply.satellite_image_url {
        job.satellite_image_url = Some(url.clone());
    }

    if reply.job_status == "COMPLETED" {
        if let Some(url) = &reply.result_geojson_url {
            let geojson = state.analysis_service.fetch_result_payload(url).await?;
            job.result_geojson = Some(geojson);
        } else {
            tracing::warn!(job_id = %reply.job_id, "Completed job carries no result URL");
        }

        if let Some(image_url) = &reply.super_resolution_image_url {
            job.super_resolution = Some(SuperResolution {
                image_url: image_url.clone(),
                bounds: reply.bounds.clone(),
            });
        }

        job.status = JobStatus::Completed;
    } else {
        tracing::warn!(
            job_id = %reply.job_id,
            error = ?reply.error,
            "Analysis worker reported job failure"
        );
        job.status = JobStatus::Failed;
    }

    job.updated_at = now_rfc3339();
    state.db.upsert_job(&job).await?;

    tracing::info!(job_id = %job.id, status = ?job.status, "Job updated from callback");
    Ok(())
}
