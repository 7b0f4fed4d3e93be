//! Shared error taxonomy and result alias
//!
//! Every failure in the pipeline falls into one of four classes. All of them
//! are caught at the action/view boundary and converted to a transient
//! notification; none propagate as unhandled failures.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FurrowError>;

/// Error classes for gateway calls and action handling
#[derive(Debug, Error)]
pub enum FurrowError {
    /// The request never reached the backend, or the response never arrived
    /// (connection refused, DNS failure, malformed body).
    #[error("network error: {0}")]
    Network(String),

    /// An id-scoped GET returned a non-2xx status.
    #[error("not found: {0}")]
    NotFound(String),

    /// A POST was rejected by the backend with an application-level message.
    #[error("{0}")]
    Application(String),

    /// Client-side required-field validation failed before any request was
    /// issued.
    #[error("missing required field: {field}")]
    Validation { field: &'static str },
}

impl FurrowError {
    pub fn validation(field: &'static str) -> Self {
        FurrowError::Validation { field }
    }

    /// Message suitable for a user-facing notification.
    ///
    /// Application errors carry the server's own message; the other classes
    /// get a short generic framing.
    pub fn user_message(&self) -> String {
        match self {
            FurrowError::Network(_) => "Could not reach the supply-chain backend".to_string(),
            FurrowError::NotFound(what) => format!("{} was not found", what),
            FurrowError::Application(msg) => msg.clone(),
            FurrowError::Validation { field } => format!("Please fill in the '{}' field", field),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, FurrowError::Validation { .. })
    }
}

impl From<reqwest::Error> for FurrowError {
    fn from(e: reqwest::Error) -> Self {
        FurrowError::Network(e.to_string())
    }
}
