use thiserror::Error;

pub const NETWORK_UNAVAILABLE_MESSAGE: &str =
    "Could not reach the simulation service. Check your connection and try again.";
pub const REJECTED_FALLBACK_MESSAGE: &str =
    "Request failed. Please check your inputs and try again.";
pub const EMPTY_RESULT_MESSAGE: &str = "Backend returned an empty schedule.";
pub const AUDIT_FALLBACK_MESSAGE: &str = "Could not fetch the audit status.";

/// Failure kinds of the simulation service. The first three end a submission
/// in `Failed`; `AuditFetchFailed` only ever reaches the notification channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{}", NETWORK_UNAVAILABLE_MESSAGE)]
    NetworkUnavailable,

    #[error("{detail}")]
    ServerRejected { status: u16, detail: String },

    #[error("{}", EMPTY_RESULT_MESSAGE)]
    EmptyResult,

    #[error("{detail}")]
    AuditFetchFailed { status: Option<u16>, detail: String },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
