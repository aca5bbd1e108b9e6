pub mod caller;
pub use self::caller::require_calling_service;

pub mod health;
pub use self::health::health;

pub mod login;
pub use self::login::login;

pub mod team;
pub use self::team::get_team;

// common functions for the handlers
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of every error response.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = StatusResponse {
        status: "error".to_string(),
        message: message.into(),
    };
    (status, Json(body)).into_response()
}

pub(crate) fn now_unix_seconds() -> i64 {
    Utc::now().timestamp()
}
