//! Errors

use tracing::error;

use pantry_app::domain::carts::CartsServiceError;

use crate::errors::{ApiError, ErrorCode};

pub(crate) fn into_api_error(error: CartsServiceError) -> ApiError {
    match error {
        CartsServiceError::NotFound => ApiError::not_found("Cart not found"),
        CartsServiceError::ProductNotFound => ApiError::not_found("Product not found"),
        CartsServiceError::ItemNotFound => ApiError::not_found("Item not found in cart"),
        CartsServiceError::InsufficientStock { .. } => {
            ApiError::new(ErrorCode::InsufficientStock, error.to_string())
        }
        CartsServiceError::InvalidQuantity(source) => ApiError::validation(source.to_string()),
        CartsServiceError::Conflict | CartsServiceError::AlreadyExists => ApiError::new(
            ErrorCode::Conflict,
            "Cart was modified by another request, please retry",
        ),
        CartsServiceError::InvalidExpiry(source) => {
            error!("failed to compute cart expiry: {source}");

            ApiError::internal()
        }
        CartsServiceError::Sql(source) => {
            error!("cart storage failure: {source}");

            ApiError::internal()
        }
    }
}
