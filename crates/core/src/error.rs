use crate::request::RequestStatus;

/// Domain-level error type.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A value failed a domain rule (not a form-field problem; those are
    /// collected in [`crate::draft::DraftError`]).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A request status change that the lifecycle does not permit.
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: RequestStatus,
        to: RequestStatus,
    },

    /// An index into an ordered draft field that does not exist.
    #[error("Index {index} out of bounds for {field} (len {len})")]
    IndexOutOfBounds {
        field: &'static str,
        index: usize,
        len: usize,
    },
}
