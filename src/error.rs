//! Error types the sync pipeline needs to tell apart.
//!
//! Most code paths use `anyhow::Result`; these variants exist for the cases
//! where callers branch on the kind of failure (retry on quota, abort on schema).

use thiserror::Error;

/// Errors that drive control flow in the sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A required catalog column is absent from the header row.
    #[error("Required column not found: {0}")]
    MissingColumn(String),

    /// The remote API signalled a rate limit.
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Non-success HTTP response that is not a rate limit.
    #[error("Request failed with status {status}: {body}")]
    Http { status: u16, body: String },
}

impl SyncError {
    /// Classifies a failed HTTP response.
    ///
    /// Status 429 and any body carrying Google's "Quota exceeded" text are
    /// treated as rate limits.
    pub fn from_response(status: u16, body: String) -> Self {
        if status == 429 || body.contains("Quota exceeded") {
            SyncError::QuotaExceeded(format!("status {}", status))
        } else {
            SyncError::Http { status, body }
        }
    }
}

/// Returns true if the error (or anything in its chain) is a rate limit.
pub fn is_quota_exceeded(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        matches!(cause.downcast_ref::<SyncError>(), Some(SyncError::QuotaExceeded(_)))
            || cause.to_string().contains("Quota exceeded")
    })
}
