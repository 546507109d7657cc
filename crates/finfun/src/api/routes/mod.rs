mod pages;
mod system;

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use hyper::StatusCode;
use serde_json::json;
use std::borrow::Borrow;

use crate::{domain::Error, infra::platform::Error as PlatformError};

pub use pages::*;
pub use system::*;

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self.borrow() {
            Error::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            Error::BadRequest(_) | Error::Validation(_) => {
                (StatusCode::BAD_REQUEST, self.user_message())
            }
            Error::PlatformFailed(PlatformError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, self.user_message())
            }
            Error::PlatformFailed(PlatformError::BadRequest(_)) => {
                (StatusCode::BAD_REQUEST, self.user_message())
            }
            Error::PlatformFailed(PlatformError::Unauthorized(_)) => {
                (StatusCode::UNAUTHORIZED, self.user_message())
            }
            Error::PlatformFailed(_) => (StatusCode::BAD_GATEWAY, self.user_message()),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                String::from("internal server error"),
            ),
        };
        let body = Json(json!({
            "error": error_message,
        }));
        (status, body).into_response()
    }
}
