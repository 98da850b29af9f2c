//! Request and response bodies for the HTTP API.
//!
//! Snapshot and result types are served as-is; only the shapes that exist
//! purely for transport live here.

use serde::{Deserialize, Serialize};

use crate::models::{CourseSchedule, EnrollmentStatus, MilestoneTimes, UnixTimestamp};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Chain reader status
    pub chain: String,
}

/// Body of `POST /v1/eligibility`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityRequest {
    #[serde(default)]
    pub schedule: Option<CourseSchedule>,
    pub milestone_times: MilestoneTimes,
    pub status: EnrollmentStatus,
    /// Evaluation instant; the server clock when absent.
    #[serde(default)]
    pub now: Option<UnixTimestamp>,
}

/// `?user=0x…` query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserQuery {
    pub user: String,
}

/// `?until=<unix seconds>` query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownQuery {
    pub until: u64,
}

/// Body of `POST /v1/certificates/decode`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodeCertificateRequest {
    pub token_uri: String,
}

/// A milestone that passed the completion pre-check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResponse {
    pub index: u8,
}
