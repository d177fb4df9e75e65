//! Faults that are not specific to any one phase.

use std::error::Error;
use std::fmt;

use crate::ErrorCode;

/// Raised when a `CancellationToken` reports that the caller gave up.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct CancellationError {
    /// Optional description of who requested cancellation.
    pub maybe_reason: Option<String>,
}

impl CancellationError {
    pub fn new(reason: impl Into<String>) -> Self {
        CancellationError {
            maybe_reason: Some(reason.into()),
        }
    }
}

impl fmt::Display for CancellationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.maybe_reason {
            Some(reason) => write!(f, "operation cancelled: {reason}"),
            None => f.write_str("operation cancelled"),
        }
    }
}

impl Error for CancellationError {}

/// A violated structural assumption. Always a bug, never user input.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct InvariantError {
    /// What was assumed.
    pub description: String,
    /// Optional supporting detail (ids, counts).
    pub maybe_details: Option<String>,
}

impl InvariantError {
    #[cold]
    pub fn new(description: impl Into<String>) -> Self {
        InvariantError {
            description: description.into(),
            maybe_details: None,
        }
    }

    #[cold]
    pub fn with_details(description: impl Into<String>, details: impl Into<String>) -> Self {
        InvariantError {
            description: description.into(),
            maybe_details: Some(details.into()),
        }
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.maybe_details {
            Some(details) => write!(f, "invariant violated: {} ({details})", self.description),
            None => write!(f, "invariant violated: {}", self.description),
        }
    }
}

impl Error for InvariantError {}

/// The closed set of cross-cutting faults.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum CommonError {
    Cancellation(CancellationError),
    Invariant(InvariantError),
    /// Anything that does not fit the taxonomy, wrapped for uniformity.
    Unknown(String),
}

impl CommonError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CommonError::Cancellation(_) => ErrorCode::C0001,
            CommonError::Invariant(_) => ErrorCode::C0002,
            CommonError::Unknown(_) => ErrorCode::C0003,
        }
    }

    #[cold]
    pub fn invariant(description: impl Into<String>) -> Self {
        CommonError::Invariant(InvariantError::new(description))
    }
}

impl fmt::Display for CommonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommonError::Cancellation(inner) => write!(f, "[{}] {inner}", self.code()),
            CommonError::Invariant(inner) => write!(f, "[{}] {inner}", self.code()),
            CommonError::Unknown(message) => write!(f, "[{}] {message}", self.code()),
        }
    }
}

impl Error for CommonError {}

impl From<CancellationError> for CommonError {
    fn from(inner: CancellationError) -> Self {
        CommonError::Cancellation(inner)
    }
}

impl From<InvariantError> for CommonError {
    fn from(inner: InvariantError) -> Self {
        CommonError::Invariant(inner)
    }
}
