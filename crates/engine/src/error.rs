//! The module contains the errors the engine can throw.
//!
//! The taxonomy is deliberately small:
//!
//! - [`NotFound`] for ids that do not resolve to a stored record.
//! - [`InvalidRequest`] for intents rejected before any mutation.
//! - [`Database`] for storage failures, kept transparent.
//!
//! [`NotFound`]: EngineError::NotFound
//! [`InvalidRequest`]: EngineError::InvalidRequest
//! [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The named entity/id pair does not exist.
    #[error("{0} not found")]
    NotFound(String),
    /// The intent is structurally invalid for its transaction type.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::InvalidRequest(a), Self::InvalidRequest(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
