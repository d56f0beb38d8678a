//! Update Cart Item Handler

use std::sync::Arc;

use pantry_app::domain::products::records::ProductUuid;
use salvo::prelude::*;

use crate::{
    carts::{
        errors::into_api_error,
        models::{CartItemRequest, CartResponse},
    },
    errors::ApiError,
    extensions::*,
    state::State,
};

/// Update Cart Item Handler
///
/// Sets the absolute quantity of a line already in the cart. Zero removes it.
#[endpoint(
    tags("carts"),
    summary = "Update Cart Item Quantity",
    security(("bearer_auth" = [])),
    request_body = CartItemRequest
)]
#[tracing::instrument(
    name = "carts.update_item",
    skip(req, depot),
    fields(
        account_uuid = tracing::field::Empty,
        product_uuid = tracing::field::Empty
    )
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let account = depot.account_uuid_or_401()?;

    let request = req
        .parse_json::<CartItemRequest>()
        .await
        .map_err(|error| ApiError::validation(format!("invalid cart item: {error}")))?;

    let quantity = request.checked_quantity(0)?;

    let span = tracing::Span::current();

    span.record("account_uuid", tracing::field::display(account));
    span.record("product_uuid", tracing::field::display(request.product_id));

    let cart = state
        .app
        .carts
        .update_item(account, ProductUuid::from_uuid(request.product_id), quantity)
        .await
        .map_err(into_api_error)?;

    Ok(Json(CartResponse::new(cart, state.currency)))
}
