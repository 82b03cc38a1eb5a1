//! Error envelope for REST handlers.
//!
//! Every failure is reported with HTTP 200 and `{"success": false, "message": ...}`. Clients
//! branch on `success`, never on the status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use carebook_core::CareError;

use crate::dto::MessageRes;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Care(#[from] CareError),
    #[error("Not Authorized Login Again")]
    NotAuthorized,
    #[error("{0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("request failed: {}", self);
        (
            StatusCode::OK,
            Json(MessageRes {
                success: false,
                message: self.to_string(),
            }),
        )
            .into_response()
    }
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;
