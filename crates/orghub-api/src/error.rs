//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use orghub_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// An [`AppError`] on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

/// HTTP status for an error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NoCredential | ErrorKind::InvalidCredential => StatusCode::UNAUTHORIZED,
        ErrorKind::ProviderUnreachable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::ForbiddenNotMember
        | ErrorKind::ForbiddenNotAdmin
        | ErrorKind::ForbiddenNotOwner
        | ErrorKind::ForbiddenOwnerRemoval
        | ErrorKind::ForbiddenOwnerDemotion
        | ErrorKind::ForbiddenOrganizationCreation => StatusCode::FORBIDDEN,
        ErrorKind::UserNotFound
        | ErrorKind::OrganizationNotFound
        | ErrorKind::MemberNotFound
        | ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::InvalidRole | ErrorKind::InvalidOrgType | ErrorKind::Validation => {
            StatusCode::BAD_REQUEST
        }
        ErrorKind::AlreadyMember | ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::ExternalService => StatusCode::BAD_GATEWAY,
        ErrorKind::StorageFailure
        | ErrorKind::Configuration
        | ErrorKind::Serialization
        | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn opaque_message(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::ProviderUnreachable => "Identity service is temporarily unavailable",
        ErrorKind::ExternalService => "An upstream service returned an unexpected response",
        _ => "An internal error occurred",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = status_for(err.kind);

        let message = if err.kind.is_server_side() {
            tracing::error!(
                code = err.kind.code(),
                error = %err.message,
                source = ?err.source,
                "Request failed"
            );
            opaque_message(err.kind).to_string()
        } else {
            err.message
        };

        let body = ApiErrorResponse {
            error: err.kind.code().to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}
