//! Shared error types

use thiserror::Error;

/// Errors raised while validating user input before it reaches the platform API
#[derive(Error, Debug, PartialEq)]
pub enum CoreError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("unknown competition type: {0}")]
    UnknownKind(String),

    #[error("unknown tab: {0}")]
    UnknownTab(String),
}
