//! Client for the external timetable solver.
//!
//! The solver is a separate HTTP service exposing `POST /generate`. It takes
//! the subjects to place and answers with a bare JSON array of entries, or a
//! non-2xx status with an `{"error": "..."}` body.

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::Entry;
use crate::services::validation::SubjectRequest;

/// Body forwarded to the solver.
///
/// `subjects` is the caller's list unchanged; `days` and `slots` describe the
/// grid the answer must land on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverRequest {
    pub subjects: Vec<SubjectRequest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub days: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slots: Vec<String>,
}

/// Why a solver round trip produced no usable entries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SolverError {
    #[error("solver answered {status}: {message}")]
    Status { status: u16, message: String },

    #[error("solver response is not an entry list: {0}")]
    Malformed(String),

    #[error("solver unreachable: {0}")]
    Transport(String),

    #[error("solver did not answer within {0:?}")]
    Timeout(Duration),
}

impl SolverError {
    /// Upstream HTTP status, when the solver answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// One round trip to a timetable solver.
#[async_trait]
pub trait SolverClient: Send + Sync {
    async fn generate(&self, request: &SolverRequest) -> Result<Vec<Entry>, SolverError>;
}

#[derive(Debug, Deserialize)]
struct SolverErrorBody {
    error: String,
}

/// `SolverClient` speaking JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSolverClient {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpSolverClient {
    /// Build a client for the solver at `base_url`; `timeout` bounds the whole request.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SolverError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SolverError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}/generate", base_url.trim_end_matches('/')),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SolverClient for HttpSolverClient {
    async fn generate(&self, request: &SolverRequest) -> Result<Vec<Entry>, SolverError> {
        debug!(
            "POST {} with {} subjects",
            self.endpoint,
            request.subjects.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SolverError::Timeout(self.timeout)
                } else {
                    SolverError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<empty response>".to_string());

        if !status.is_success() {
            let message = serde_json::from_str::<SolverErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or_else(|_| body.trim().to_string());
            return Err(SolverError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str::<Vec<Entry>>(&body).map_err(|e| SolverError::Malformed(e.to_string()))
    }
}
