use devmart_core::draft::DraftError;

use crate::gateway::ApiError;

/// Top-level error type for client operations.
///
/// Wraps [`ApiError`] for anything that reached (or failed to reach) the
/// network, [`DraftError`] for validation caught before a call was
/// issued, and IO errors from the durable session file.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The gateway rejected or failed the call.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Client-side validation failed; no network call was issued.
    #[error(transparent)]
    Draft(#[from] DraftError),

    /// Reading or writing the persisted session failed.
    #[error("Session storage error: {0}")]
    Storage(#[from] std::io::Error),
}

/// Convenience type alias for client operation results.
pub type ClientResult<T> = Result<T, ClientError>;
