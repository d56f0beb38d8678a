//! Get Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    carts::{errors::into_api_error, models::CartResponse},
    errors::ApiError,
    extensions::*,
    state::State,
};

/// Get Cart Handler
///
/// Returns the caller's cart, creating an empty one when none exists. Lines whose
/// product is no longer sold are dropped.
#[endpoint(
    tags("carts"),
    summary = "Get Cart",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    name = "carts.get",
    skip(depot),
    fields(account_uuid = tracing::field::Empty)
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let account = depot.account_uuid_or_401()?;

    tracing::Span::current().record("account_uuid", tracing::field::display(account));

    let cart = state
        .app
        .carts
        .get_cart(account)
        .await
        .map_err(into_api_error)?;

    Ok(Json(CartResponse::new(cart, state.currency)))
}
