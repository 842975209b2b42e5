// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod analysis;
pub mod mail;
pub mod region;
pub mod results;

pub use analysis::AnalysisService;
pub use mail::MailService;
pub use region::validate_region;
pub use results::{extract_result_data, extract_result_json};
