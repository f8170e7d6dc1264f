//! HTTP mapping for the moderation error taxonomy.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domains::moderation::ModerationError;

/// Wire shape: `{"error": {"code": "...", "message": "..."}}`
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

/// Route-level error wrapper implementing `IntoResponse`.
pub struct ApiError(pub ModerationError);

impl From<ModerationError> for ApiError {
    fn from(err: ModerationError) -> Self {
        Self(err)
    }
}

impl From<crate::common::AuthError> for ApiError {
    fn from(err: crate::common::AuthError) -> Self {
        Self(err.into())
    }
}

// Model-layer failures reaching a route are storage problems; anything that
// is not already a sqlx error is treated as a decode-level violation.
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<sqlx::Error>() {
            Ok(sql) => Self(ModerationError::Storage(sql)),
            Err(other) => Self(ModerationError::Storage(sqlx::Error::Decode(other.into()))),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ModerationError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ModerationError::Forbidden(_) => StatusCode::FORBIDDEN,
            ModerationError::InvalidId(_) => StatusCode::BAD_REQUEST,
            ModerationError::NotFound(_) => StatusCode::NOT_FOUND,
            ModerationError::AlreadyApproved
            | ModerationError::InvestigatorNotEligible
            | ModerationError::InvalidTransition(_) => StatusCode::CONFLICT,
            ModerationError::Storage(e) => {
                // Log the detail server-side, keep the wire message opaque
                tracing::error!(error = %e, "Storage error while handling request");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: self.0.code(),
                message: self.0.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}
