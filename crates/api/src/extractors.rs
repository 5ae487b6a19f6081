//! Extractors whose rejections use the API's JSON error body.

use axum::{
    extract::{
        FromRequest, FromRequestParts,
        rejection::{JsonRejection, PathRejection},
    },
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::routes::error_response;

/// `axum::Json` with `{error, message}` rejections.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiRejection))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Path` with `{error, message}` rejections.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiRejection))]
pub struct ApiPath<T>(pub T);

/// A request body or path segment that could not be read.
#[derive(Debug)]
pub enum ApiRejection {
    /// Missing, malformed, or mistyped JSON body.
    Body(JsonRejection),
    /// Path segment of the wrong type.
    Path(PathRejection),
}

impl From<JsonRejection> for ApiRejection {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection)
    }
}

impl From<PathRejection> for ApiRejection {
    fn from(rejection: PathRejection) -> Self {
        Self::Path(rejection)
    }
}

impl IntoResponse for ApiRejection {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::Body(r) => (r.status(), "INVALID_BODY", r.body_text()),
            Self::Path(r) => (r.status(), "INVALID_PATH", r.body_text()),
        };
        debug!(%status, code, message = %message, "Request rejected");
        error_response(status, code, message)
    }
}
