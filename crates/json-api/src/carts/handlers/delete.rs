//! Delete Cart Items Handler

use std::sync::Arc;

use pantry_app::domain::products::records::ProductUuid;
use salvo::prelude::*;
use uuid::Uuid;

use crate::{
    carts::{errors::into_api_error, models::CartResponse},
    errors::ApiError,
    extensions::*,
    state::State,
};

/// What a delete request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Removal {
    Item(Uuid),
    All,
}

fn removal(req: &Request) -> Result<Removal, ApiError> {
    if let Some(product) = req.query::<String>("productId") {
        return product
            .parse::<Uuid>()
            .map(Removal::Item)
            .map_err(|_ignored| ApiError::validation("productId must be a UUID"));
    }

    if req
        .query::<String>("clearAll")
        .is_some_and(|value| value == "true")
    {
        return Ok(Removal::All);
    }

    Err(ApiError::validation(
        "either productId or clearAll=true is required",
    ))
}

/// Delete Cart Items Handler
///
/// `?productId=` removes one line, `?clearAll=true` empties the cart.
#[endpoint(
    tags("carts"),
    summary = "Remove Cart Items",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    name = "carts.delete",
    skip(req, depot),
    fields(account_uuid = tracing::field::Empty)
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let account = depot.account_uuid_or_401()?;
    let removal = removal(req)?;

    tracing::Span::current().record("account_uuid", tracing::field::display(account));

    let cart = match removal {
        Removal::Item(product) => {
            state
                .app
                .carts
                .remove_item(account, ProductUuid::from_uuid(product))
                .await
        }
        Removal::All => state.app.carts.clear_cart(account).await,
    }
    .map_err(into_api_error)?;

    Ok(Json(CartResponse::new(cart, state.currency)))
}
