// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! PaveInsight API Server
//!
//! Collects pavement-analysis requests for drawn map regions, dispatches
//! jobs to the external analysis worker, and serves classified
//! pavement-condition results to the portal.

use paveinsight::{
    config::Config,
    db::FirestoreDb,
    services::{AnalysisService, MailService},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting PaveInsight API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Initialize the analysis worker client
    let analysis_service = AnalysisService::new(&config.analysis_api_url);
    tracing::info!(
        worker = %config.analysis_api_url,
        "Analysis worker client initialized"
    );

    // Initialize mail delivery
    let mail_service = MailService::from_config(&config);
    if config.mail_api_url.is_empty() {
        tracing::warn!("MAIL_API_URL not set; results-ready emails are disabled");
    }

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        analysis_service,
        mail_service,
    });

    // Build router
    let app = paveinsight::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("paveinsight=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
