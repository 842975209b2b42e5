// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Analysis requests (submitted regions + contact details)
//! - Jobs (dispatched analyses and their results)

use crate::db::collections;
use crate::error::AppError;
use crate::models::request::RequestStatus;
use crate::models::{AnalysisRequest, Job};
use futures_util::{stream, StreamExt};
use uuid::Uuid;

const MAX_CONCURRENT_DB_OPS: usize = 50;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // Use ExternalJwtFunctionSource to provide a dummy token without needing async-trait
        // or a custom TokenSource implementation struct.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Request Operations ──────────────────────────────────────

    /// Get a request by ID.
    pub async fn get_request(&self, id: Uuid) -> Result<Option<AnalysisRequest>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::REQUESTS)
            .obj()
            .one(&id.to_string())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a request.
    pub async fn upsert_request(&self, request: &AnalysisRequest) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::REQUESTS)
            .document_id(request.id.to_string())
            .object(request)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List all requests, newest first.
    pub async fn list_requests(&self) -> Result<Vec<AnalysisRequest>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::REQUESTS)
            .order_by([(
                "created_at",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a request document (jobs are cascaded separately).
    pub async fn delete_request(&self, id: Uuid) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::REQUESTS)
            .document_id(id.to_string())
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count all requests.
    pub async fn count_requests(&self) -> Result<u64, AppError> {
        let requests: Vec<AnalysisRequest> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::REQUESTS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(requests.len() as u64)
    }

    /// Count requests in a given status.
    pub async fn count_requests_by_status(&self, status: RequestStatus) -> Result<u64, AppError> {
        let status_str = status.as_str().to_string();
        let requests: Vec<AnalysisRequest> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::REQUESTS)
            .filter(move |q| q.field("status").eq(status_str.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(requests.len() as u64)
    }

    // ─── Job Operations ──────────────────────────────────────────

    /// Get a job by ID.
    pub async fn get_job(&self, id: Uuid) -> Result<Option<Job>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::JOBS)
            .obj()
            .one(&id.to_string())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a job.
    pub async fn upsert_job(&self, job: &Job) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::JOBS)
            .document_id(job.id.to_string())
            .object(job)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a job document.
    pub async fn delete_job(&self, id: Uuid) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::JOBS)
            .document_id(id.to_string())
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get all jobs for a request, oldest first.
    pub async fn jobs_for_request(&self, request_id: Uuid) -> Result<Vec<Job>, AppError> {
        let request_id = request_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::JOBS)
            .filter(move |q| q.field("request_id").eq(request_id.clone()))
            .order_by([("created_at", firestore::FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete every job belonging to a request.
    ///
    /// Uses concurrent deletes with a limit to avoid overloading Firestore.
    pub async fn delete_jobs_for_request(&self, request_id: Uuid) -> Result<(), AppError> {
        let jobs = self.jobs_for_request(request_id).await?;
        let client = self.get_client()?;

        stream::iter(jobs)
            .map(|job| async move {
                client
                    .fluent()
                    .delete()
                    .from(collections::JOBS)
                    .document_id(job.id.to_string())
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok::<_, AppError>(())
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<(), AppError>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<()>, AppError>>()?;

        Ok(())
    }
}
