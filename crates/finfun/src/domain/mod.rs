mod listing;
mod preferences;

pub use listing::*;
pub use preferences::*;

use finfun_core::CoreError;
use thiserror::Error;

use crate::infra::platform::Error as PlatformError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("item not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("problem querying db: {0}")]
    DbError(#[from] sqlx::Error),
    #[error("{0}")]
    PlatformFailed(#[from] PlatformError),
    #[error("{0}")]
    Validation(#[from] CoreError),
    #[error("background task stopped: {0}")]
    Thread(String),
}

impl Error {
    /// Message rendered next to the control that triggered the failure
    pub fn user_message(&self) -> String {
        match self {
            Error::PlatformFailed(e) => e.user_message(),
            Error::Validation(e) => capitalize(&e.to_string()),
            Error::NotFound(msg) | Error::BadRequest(msg) => msg.clone(),
            Error::DbError(_) | Error::Thread(_) => {
                String::from("Something went wrong, please try again.")
            }
        }
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
