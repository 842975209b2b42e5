// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! PaveInsight: pavement-condition analysis request portal
//!
//! This crate provides the backend API for collecting analysis requests
//! (map regions drawn by visitors), dispatching analysis jobs to the
//! external worker, and serving classified pavement-condition results.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{AnalysisService, MailService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub analysis_service: AnalysisService,
    pub mail_service: MailService,
}
