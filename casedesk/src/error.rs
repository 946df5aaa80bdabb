//! Errors raised by the data services

use thiserror::Error;

/// Errors that can occur in the client and case data services
///
/// Effects turn every variant into the slice's failure action using its
/// `Display` text, which is what ends up in `state.error`.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The backend could not be reached; the message is shown as-is
    #[error("{0}")]
    Unavailable(String),

    /// No record with this id
    #[error("{entity} {id} not found")]
    NotFound {
        /// Kind of record (`"client"`, `"case"`)
        entity: &'static str,
        /// Id that was looked up
        id: String,
    },

    /// The submitted draft is incomplete or out of range
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Seed data could not be parsed
    #[error("Malformed fixture data: {0}")]
    Fixture(#[from] serde_json::Error),

    /// Anything else
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Not-found error for a client id
    #[must_use]
    pub fn client_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            entity: "client",
            id: id.to_string(),
        }
    }

    /// Not-found error for a case id
    #[must_use]
    pub fn case_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            entity: "case",
            id: id.to_string(),
        }
    }
}
