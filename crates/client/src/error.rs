//! Errors

use std::{fmt, str::FromStr};

use pantry::guest::{GuestCartError, StorageError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Machine-readable failure codes shared with the JSON API, plus the client-only ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Missing, invalid or expired session.
    Unauthorized,

    /// Product or cart line does not exist.
    NotFound,

    /// Requested quantity exceeds available stock.
    InsufficientStock,

    /// Request was malformed or out of range.
    ValidationError,

    /// Per-operation budget for the current window is spent.
    RateLimitExceeded,

    /// Cart changed underneath the request.
    Conflict,

    /// Server-side failure.
    InternalError,

    /// The request never produced a response.
    NetworkError,

    /// A guest cart add without the product's display details.
    MissingProductDetails,

    /// Local storage could not be used.
    StorageUnavailable,
}

impl ErrorCode {
    /// Wire representation of the code.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::NotFound => "NOT_FOUND",
            Self::InsufficientStock => "INSUFFICIENT_STOCK",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            Self::Conflict => "CONFLICT",
            Self::InternalError => "INTERNAL_ERROR",
            Self::NetworkError => "NETWORK_ERROR",
            Self::MissingProductDetails => "MISSING_PRODUCT_DETAILS",
            Self::StorageUnavailable => "STORAGE_UNAVAILABLE",
        }
    }

    /// Whether repeating the same call later can succeed.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::RateLimitExceeded | Self::Conflict | Self::NetworkError
        )
    }

    /// Best guess for a response whose body carried no usable code.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 | 422 => Self::ValidationError,
            401 | 403 => Self::Unauthorized,
            404 => Self::NotFound,
            409 => Self::Conflict,
            429 => Self::RateLimitExceeded,
            _ => Self::InternalError,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The code was not one the client knows about.
#[derive(Debug, Error)]
#[error("unknown error code: {0}")]
pub struct UnknownErrorCode(String);

impl FromStr for ErrorCode {
    type Err = UnknownErrorCode;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code {
            "UNAUTHORIZED" => Ok(Self::Unauthorized),
            "NOT_FOUND" => Ok(Self::NotFound),
            "INSUFFICIENT_STOCK" => Ok(Self::InsufficientStock),
            "VALIDATION_ERROR" => Ok(Self::ValidationError),
            "RATE_LIMIT_EXCEEDED" => Ok(Self::RateLimitExceeded),
            "CONFLICT" => Ok(Self::Conflict),
            "INTERNAL_ERROR" => Ok(Self::InternalError),
            "NETWORK_ERROR" => Ok(Self::NetworkError),
            "MISSING_PRODUCT_DETAILS" => Ok(Self::MissingProductDetails),
            "STORAGE_UNAVAILABLE" => Ok(Self::StorageUnavailable),
            other => Err(UnknownErrorCode(other.to_string())),
        }
    }
}

/// Failure of a cart operation, whichever backend served it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} ({code})")]
pub struct CartError {
    /// What went wrong, for programs.
    pub code: ErrorCode,

    /// What went wrong, for people.
    pub message: String,
}

impl CartError {
    /// Create an error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Transport failure talking to the API.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NetworkError, message)
    }
}

impl From<GuestCartError> for CartError {
    fn from(error: GuestCartError) -> Self {
        let code = match &error {
            GuestCartError::Storage(_) | GuestCartError::Encode(_) => ErrorCode::StorageUnavailable,
            GuestCartError::MissingProductDetails => ErrorCode::MissingProductDetails,
            GuestCartError::Quantity(_) => ErrorCode::ValidationError,
        };

        Self::new(code, error.to_string())
    }
}

impl From<StorageError> for CartError {
    fn from(error: StorageError) -> Self {
        Self::new(ErrorCode::StorageUnavailable, error.to_string())
    }
}

impl From<reqwest::Error> for CartError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            return Self::network("request timed out");
        }

        Self::network(error.to_string())
    }
}

/// Flat result shape handed to presentation code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartOutcome<T> {
    /// Whether the operation succeeded.
    pub success: bool,

    /// Operation result on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Failure code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
}

impl<T> From<Result<T, CartError>> for CartOutcome<T> {
    fn from(result: Result<T, CartError>) -> Self {
        match result {
            Ok(data) => Self {
                success: true,
                data: Some(data),
                error: None,
                code: None,
            },
            Err(CartError { code, message }) => Self {
                success: false,
                data: None,
                error: Some(message),
                code: Some(code),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use pantry::items::QuantityError;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn codes_use_the_wire_spelling() -> TestResult {
        for code in [
            ErrorCode::Unauthorized,
            ErrorCode::InsufficientStock,
            ErrorCode::RateLimitExceeded,
            ErrorCode::NetworkError,
            ErrorCode::StorageUnavailable,
        ] {
            let json = serde_json::to_value(code)?;

            assert_eq!(json, serde_json::json!(code.as_str()));
            assert_eq!(code.as_str().parse::<ErrorCode>()?, code);
        }

        Ok(())
    }

    #[test]
    fn unknown_codes_fail_to_parse() {
        assert!("TEAPOT".parse::<ErrorCode>().is_err(), "expected an error");
    }

    #[test]
    fn status_fallbacks() {
        assert_eq!(ErrorCode::from_status(401), ErrorCode::Unauthorized);
        assert_eq!(ErrorCode::from_status(409), ErrorCode::Conflict);
        assert_eq!(ErrorCode::from_status(429), ErrorCode::RateLimitExceeded);
        assert_eq!(ErrorCode::from_status(502), ErrorCode::InternalError);
    }

    #[test]
    fn guest_errors_map_to_client_codes() {
        let missing = CartError::from(GuestCartError::MissingProductDetails);
        let storage = CartError::from(GuestCartError::Storage(StorageError::Unavailable));
        let quantity = CartError::from(GuestCartError::Quantity(QuantityError::Zero));

        assert_eq!(missing.code, ErrorCode::MissingProductDetails);
        assert_eq!(storage.code, ErrorCode::StorageUnavailable);
        assert_eq!(quantity.code, ErrorCode::ValidationError);
    }

    #[test]
    fn outcome_flattens_results() -> TestResult {
        let ok = CartOutcome::from(Ok::<u32, CartError>(3));
        let failed = CartOutcome::<u32>::from(Err(CartError::new(
            ErrorCode::Conflict,
            "Cart was modified concurrently",
        )));

        assert_eq!(
            serde_json::to_value(&ok)?,
            serde_json::json!({ "success": true, "data": 3 })
        );
        assert_eq!(
            serde_json::to_value(&failed)?,
            serde_json::json!({
                "success": false,
                "error": "Cart was modified concurrently",
                "code": "CONFLICT"
            })
        );

        Ok(())
    }
}
