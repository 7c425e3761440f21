//! Shared error types for the services crate.

use thiserror::Error;

use storage::kv::StorageError;
use trilha_core::ScheduleError;

/// Errors emitted by `ProgressStore`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("progress document could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors emitted by `SchedulePlanner`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlannerError {
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
}

/// Errors emitted by `ApiClient`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("the platform API is not configured")]
    Disabled,
    #[error("platform API request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
