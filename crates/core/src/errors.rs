use thiserror::Error;

/// Failure taxonomy shared by the three booking operations.
///
/// Operations return these as tagged values instead of raising raw store
/// faults across the boundary to the orchestration layer.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum OperationError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("invalid datetime `{0}` (expected YYYY-MM-DD HH:MM)")]
    InvalidDateTime(String),
    #[error("invalid room_id: {0} not found")]
    InvalidRoom(i64),
    #[error("duplicate phone exists: {0}")]
    DuplicatePhone(String),
    #[error("storage failure: {0}")]
    Storage(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller-supplied input failed a precondition; recoverable by
    /// re-prompting for corrected input.
    Validation,
    /// A concurrent-write race the store's conflict resolution could not
    /// absorb; recoverable by retry or re-read.
    Conflict,
    /// Any other persistence-layer failure; non-recoverable at this layer.
    Storage,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Conflict => "conflict",
            Self::Storage => "storage",
        }
    }
}

impl OperationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::InvalidDateTime(_) | Self::InvalidRoom(_) => {
                ErrorKind::Validation
            }
            Self::DuplicatePhone(_) => ErrorKind::Conflict,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }

    pub fn storage(error: impl std::fmt::Display) -> Self {
        Self::Storage(error.to_string())
    }
}
