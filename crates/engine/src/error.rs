//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`KeyNotFound`] thrown when a goal or a user is missing, or not visible
//!   from the caller's scope.
//! - [`ExistingKey`] thrown when a username is already registered.
//! - [`Unauthorized`] thrown when a password does not match.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`ExistingKey`]: EngineError::ExistingKey
//!  [`Unauthorized`]: EngineError::Unauthorized
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0} not found")]
    KeyNotFound(String),
    #[error("{0}")]
    ExistingKey(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Invalid password: {0}")]
    InvalidPassword(String),
    #[error("Invalid credentials: {0}")]
    Unauthorized(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::InvalidPassword(a), Self::InvalidPassword(b)) => a == b,
            (Self::Unauthorized(a), Self::Unauthorized(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::PasswordHash(a), Self::PasswordHash(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
