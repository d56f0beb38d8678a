//! Uniform JSON error responses.

use salvo::{
    http::StatusCode,
    oapi::{self, Components, Content, EndpointOutRegister, Operation, ToSchema},
    prelude::{Json, Response},
    writing::Scribe,
};
use serde::{Deserialize, Serialize};

/// Machine readable error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum ErrorCode {
    Unauthorized,
    NotFound,
    InsufficientStock,
    ValidationError,
    RateLimitExceeded,
    Conflict,
    InternalError,
}

impl ErrorCode {
    pub(crate) fn status(self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InsufficientStock | Self::Conflict => StatusCode::CONFLICT,
            Self::ValidationError => StatusCode::BAD_REQUEST,
            Self::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ErrorBody {
    /// Human readable description
    pub error: String,

    /// Error code
    pub code: ErrorCode,
}

/// An error rendered as `{ "error": ..., "code": ... }` with the matching status.
#[derive(Debug)]
pub(crate) struct ApiError {
    code: ErrorCode,
    message: String,
}

impl ApiError {
    pub(crate) fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub(crate) fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub(crate) fn rate_limited() -> Self {
        Self::new(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please try again later",
        )
    }

    /// Details stay in the logs; callers only see a generic message.
    pub(crate) fn internal() -> Self {
        Self::new(ErrorCode::InternalError, "Internal server error")
    }
}

impl Scribe for ApiError {
    fn render(self, res: &mut Response) {
        res.status_code(self.code.status());
        res.render(Json(ErrorBody {
            error: self.message,
            code: self.code,
        }));
    }
}

impl EndpointOutRegister for ApiError {
    fn register(components: &mut Components, operation: &mut Operation) {
        for (status, description) in [
            (StatusCode::BAD_REQUEST, "Invalid request"),
            (StatusCode::UNAUTHORIZED, "Missing or invalid session"),
            (StatusCode::NOT_FOUND, "Not found"),
            (StatusCode::CONFLICT, "Insufficient stock or concurrent update"),
            (StatusCode::TOO_MANY_REQUESTS, "Rate limit exceeded"),
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        ] {
            operation.responses.insert(
                status.as_str(),
                oapi::Response::new(description)
                    .add_content("application/json", Content::new(ErrorBody::to_schema(components))),
            );
        }
    }
}
