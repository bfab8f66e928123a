use crate::api::schemas::contact::{ContactFailure, ErrorBody};
use crate::domain::submission::FieldError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Stable error codes clients can branch on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    ValidationError,
    RateLimitExceeded,
    InternalError,
    ServiceUnavailable,
    ConfigurationError,
    MethodNotAllowed,
}

impl ErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::ConfigurationError => "CONFIGURATION_ERROR",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
        }
    }

    #[must_use]
    pub const fn user_message(self) -> &'static str {
        match self {
            Self::ValidationError => "Please check your input and try again.",
            Self::RateLimitExceeded => "Too many requests. Please try again later.",
            Self::InternalError => "Failed to send message. Please try again.",
            Self::ServiceUnavailable => "Service temporarily unavailable. Please try again later.",
            Self::ConfigurationError => "Service configuration error. Please contact support.",
            Self::MethodNotAllowed => "Method not allowed",
        }
    }

    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            Self::ValidationError => StatusCode::BAD_REQUEST,
            Self::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::InternalError | Self::ConfigurationError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Builds the standard error envelope with the status implied by the code.
///
/// `details` entries are attached only when the list is non-empty.
pub fn error_response(
    code: ErrorCode,
    message: impl Into<String>,
    details: Option<Vec<FieldError>>,
) -> Response {
    let details = details.filter(|d| !d.is_empty());
    let body = ContactFailure {
        success: false,
        error: ErrorBody { code: code.as_str(), message: message.into(), details },
    };

    (code.status(), Json(body)).into_response()
}
