// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Analysis request model for storage and API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;

/// Stored analysis request record in Firestore.
///
/// One record per region a visitor submitted from the public map page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Request ID (also used as document ID)
    pub id: Uuid,
    /// Requester's display name
    pub username: String,
    /// Requester's email; results access is verified against it
    pub email: String,
    /// Company name, if given
    pub company_name: Option<String>,
    /// Contact phone number
    pub phone_number: String,
    /// The drawn region as a GeoJSON string (Polygon feature)
    pub geo_json: String,
    /// Free-form message from the requester
    pub message: Option<String>,
    /// Lifecycle status, admin-driven
    pub status: RequestStatus,
    /// Creation timestamp (RFC3339)
    pub created_at: String,
    /// Last modification timestamp (RFC3339)
    pub updated_at: String,
}

/// Request lifecycle status.
///
/// Wire strings match what the dashboard filters on, including the
/// space in "IN PROGRESS".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum RequestStatus {
    #[serde(rename = "PENDING")]
    Pending,
    #[serde(rename = "IN PROGRESS")]
    InProgress,
    #[serde(rename = "COMPLETED")]
    Completed,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "PENDING",
            RequestStatus::InProgress => "IN PROGRESS",
            RequestStatus::Completed => "COMPLETED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_strings_round_trip() {
        for status in [
            RequestStatus::Pending,
            RequestStatus::InProgress,
            RequestStatus::Completed,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
            let back: RequestStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn test_in_progress_keeps_the_space() {
        let status: RequestStatus = serde_json::from_str("\"IN PROGRESS\"").unwrap();
        assert_eq!(status, RequestStatus::InProgress);
    }
}
