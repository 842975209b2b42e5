// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP client for the external analysis worker.
//!
//! Handles:
//! - Job dispatch with a correlation ID and callback address
//! - Tracking of in-flight dispatches until the callback arrives
//! - Pulling the produced result GeoJSON once a job completes

use crate::error::AppError;
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Upper bound on a fetched result document. Result GeoJSON for a city
/// district runs to a few megabytes; anything near this limit is wrong.
const MAX_RESULT_BYTES: u64 = 32 * 1024 * 1024;

/// Client for the analysis worker.
#[derive(Clone)]
pub struct AnalysisService {
    http: reqwest::Client,
    base_url: String,
    /// Dispatches awaiting a completion callback, keyed by correlation ID.
    pending: Arc<DashMap<Uuid, PendingDispatch>>,
}

/// A dispatched job we have not yet heard back about.
#[derive(Debug, Clone, Copy)]
pub struct PendingDispatch {
    pub job_id: Uuid,
    pub request_id: Uuid,
}

/// Payload posted to the worker's submit endpoint.
#[derive(Serialize)]
struct JobSubmission<'a> {
    correlation_id: Uuid,
    job_id: Uuid,
    request_id: Uuid,
    /// The region polygon to analyze, as submitted by the requester
    geo_json: &'a str,
    /// Where the worker should POST its completion report
    reply_to: &'a str,
}

impl AnalysisService {
    /// Create a new client against the worker's base URL.
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            pending: Arc::new(DashMap::new()),
        }
    }

    /// Dispatch a job for processing.
    ///
    /// Generates a fresh correlation ID, records the dispatch as pending,
    /// and posts the region to the worker. Returns the correlation ID the
    /// completion callback will carry.
    pub async fn dispatch_job(
        &self,
        job_id: Uuid,
        request_id: Uuid,
        region_geojson: &str,
        callback_url: &str,
    ) -> Result<Uuid, AppError> {
        let correlation_id = Uuid::new_v4();

        let submission = JobSubmission {
            correlation_id,
            job_id,
            request_id,
            geo_json: region_geojson,
            reply_to: callback_url,
        };

        let url = format!("{}/jobs", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&submission)
            .send()
            .await
            .map_err(|e| AppError::AnalysisApi(format!("Job dispatch failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::AnalysisApi(format!(
                "Worker rejected job: {} {}",
                status, body
            )));
        }

        self.pending
            .insert(correlation_id, PendingDispatch { job_id, request_id });

        tracing::info!(
            %correlation_id,
            %job_id,
            %request_id,
            "Job dispatched to analysis worker"
        );

        Ok(correlation_id)
    }

    /// Resolve and consume a pending dispatch by correlation ID.
    ///
    /// Returns `None` when the ID is unknown; a callback can still be
    /// processed in that case (e.g. after a restart), it just cannot be
    /// cross-checked against the dispatch record.
    pub fn take_pending(&self, correlation_id: Uuid) -> Option<PendingDispatch> {
        self.pending.remove(&correlation_id).map(|(_, v)| v)
    }

    /// Number of dispatches still awaiting a callback.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Fetch a completed result GeoJSON document by URL.
    pub async fn fetch_result_payload(&self, url: &str) -> Result<String, AppError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::AnalysisApi(format!("Result fetch failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::AnalysisApi(format!(
                "Result fetch returned {}",
                response.status()
            )));
        }

        if let Some(length) = response.content_length() {
            if length > MAX_RESULT_BYTES {
                return Err(AppError::AnalysisApi(format!(
                    "Result document too large: {} bytes",
                    length
                )));
            }
        }

        response
            .text()
            .await
            .map_err(|e| AppError::AnalysisApi(format!("Result body read failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let service = AnalysisService::new("http://worker:9090/");
        assert_eq!(service.base_url, "http://worker:9090");
    }

    #[test]
    fn test_take_pending_consumes_the_entry() {
        let service = AnalysisService::new("http://worker:9090");
        let correlation_id = Uuid::new_v4();
        let job_id = Uuid::new_v4();
        let request_id = Uuid::new_v4();

        service
            .pending
            .insert(correlation_id, PendingDispatch { job_id, request_id });

        let resolved = service.take_pending(correlation_id).unwrap();
        assert_eq!(resolved.job_id, job_id);
        assert_eq!(resolved.request_id, request_id);
        assert!(service.take_pending(correlation_id).is_none());
        assert_eq!(service.pending_count(), 0);
    }
}
