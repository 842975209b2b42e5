// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod job;
pub mod request;
pub mod results;

pub use job::{Job, JobStatus, SuperResolution};
pub use request::{AnalysisRequest, RequestStatus};
pub use results::{RawPayload, ResultData};
