//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every operation surfaces one of these kinds to the caller; none are
/// swallowed. `Persistence` also covers a failure in the middle of a
/// multi-row sequence — the caller re-issues the whole operation rather
/// than assuming partial success.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// No valid identity was presented.
    #[error("unauthorized")]
    Unauthorized,

    /// Valid identity, but the role is insufficient or the actor is not a
    /// party to the order.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A requested order/offer/assembly/part does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// A value or transition payload failed validation (e.g. missing
    /// shipping data, duplicate part assignment, incomplete assembly).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A conflicting concurrent mutation was detected (e.g. two offers
    /// racing for acceptance).
    #[error("conflict: {0}")]
    Conflict(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The store was unavailable or a write failed.
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl DomainError {
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }
}
