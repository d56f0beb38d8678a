//! Carts service errors.

use pantry::items::QuantityError;
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("cart not found")]
    NotFound,

    #[error("product not found")]
    ProductNotFound,

    #[error("item not found in cart")]
    ItemNotFound,

    #[error("insufficient stock: only {available} available")]
    InsufficientStock { available: u32 },

    #[error("invalid quantity")]
    InvalidQuantity(#[from] QuantityError),

    #[error("cart was modified by another request")]
    Conflict,

    #[error("cart already exists")]
    AlreadyExists,

    #[error("cart expiry is out of range")]
    InvalidExpiry(#[source] jiff::Error),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CartsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(_) | None => Self::Sql(error),
        }
    }
}
