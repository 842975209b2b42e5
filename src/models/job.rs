// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Analysis job model for storage and API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;

/// Stored analysis job record in Firestore.
///
/// A request can accumulate several jobs (re-runs); at most one of them
/// may be finalized at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Job ID (also used as document ID)
    pub id: Uuid,
    /// Owning request
    pub request_id: Uuid,
    /// Processing status
    pub status: JobStatus,
    /// Completion report from the analysis worker, stored verbatim as JSON
    pub result_data: Option<String>,
    /// Result segment GeoJSON, pulled from the worker's storage on completion
    pub result_geojson: Option<String>,
    /// Source satellite image URL
    pub satellite_image_url: Option<String>,
    /// Super-resolution output, when the worker produced one
    pub super_resolution: Option<SuperResolution>,
    /// Whether this job's result is the one shown to the requester
    pub finalized: bool,
    /// Creation timestamp (RFC3339)
    pub created_at: String,
    /// Last modification timestamp (RFC3339)
    pub updated_at: String,
}

/// Job processing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum JobStatus {
    #[serde(rename = "PENDING")]
    Pending,
    #[serde(rename = "COMPLETED")]
    Completed,
    #[serde(rename = "FAILED")]
    Failed,
}

/// Super-resolution imagery produced alongside the condition results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuperResolution {
    /// URL of the enhanced image
    pub image_url: String,
    /// Image bounds, as reported by the worker
    pub bounds: Option<String>,
}
