//! Error types for the cars service.

use currency_rates::CurrencyCode;

use crate::domain::CarId;

/// Domain-level errors (business rule violations).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Car not found: {0}")]
    CarNotFound(CarId),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Repository-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Car not found")]
    NotFound,
}

/// A currency conversion could not be performed for the current request.
///
/// None of these are retried and none leave anything in the rate cache.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RateError {
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    #[error(
        "Unable to get rate from currency server, base and destination currencies can not be the same base: {base}, destination: {destination}"
    )]
    InvalidPair {
        base: CurrencyCode,
        destination: CurrencyCode,
    },

    #[error("Unable to get rate from currency server, base: {base}, destination: {destination}")]
    Upstream {
        base: CurrencyCode,
        destination: CurrencyCode,
        reason: String,
    },
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Rate(#[from] RateError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::CarNotFound(id) => AppError::NotFound(format!("Car not found: {}", id)),
            DomainError::ValidationError(msg) => AppError::Validation(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Domain(e) => e.into(),
            RepoError::NotFound => AppError::NotFound("Car not found".into()),
            RepoError::Storage(e) => AppError::Internal(e),
        }
    }
}
