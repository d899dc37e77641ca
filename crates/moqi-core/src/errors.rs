//! Cross-cutting error types for MoQi.
//!
//! `CoreError` covers domain rule violations raised by any crate. `StoreError`
//! is the error surface of the `MatchStore` trait; each backend maps its own
//! errors into it (see `DatabaseError` in `moqi-db`). A unified error is
//! deferred to `moqi-cli` where all crate errors converge.

use thiserror::Error;

use crate::enums::EntityType;

/// Errors that can be raised by any MoQi crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: EntityType, id: String },

    /// A state machine transition was attempted that is not allowed.
    #[error("Invalid state transition: from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors surfaced by a `MatchStore` backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backend call did not complete.
    #[error("Backend unavailable: {0}")]
    Network(String),

    /// An interaction row for this (swiper, startup) pair already exists.
    #[error("Interaction already exists for swiper {swiper_id} and startup {startup_id}")]
    Conflict {
        swiper_id: String,
        startup_id: String,
    },

    /// The referenced row does not exist.
    #[error("{entity_type} {id} not found")]
    NotFound { entity_type: EntityType, id: String },

    /// The backend rejected or returned malformed data.
    #[error("Invalid data: {0}")]
    Invalid(String),
}

impl StoreError {
    /// Whether a retry of the same call may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    #[must_use]
    pub fn not_found(entity_type: EntityType, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }
}
