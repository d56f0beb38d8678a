//! Merge Guest Cart Handler

use std::sync::Arc;

use pantry_app::domain::carts::data::GuestCartItem;
use salvo::prelude::*;

use crate::{
    carts::{
        errors::into_api_error,
        models::{CartResponse, MergeGuestCartRequest},
    },
    errors::ApiError,
    extensions::*,
    state::State,
};

/// Merge Guest Cart Handler
///
/// Folds the lines of a guest cart into the caller's cart, summing quantities for
/// products already present. Guest price snapshots are kept for new lines.
#[endpoint(
    tags("carts"),
    summary = "Merge Guest Cart",
    security(("bearer_auth" = [])),
    request_body = MergeGuestCartRequest
)]
#[tracing::instrument(
    name = "carts.merge_guest",
    skip(req, depot),
    fields(
        account_uuid = tracing::field::Empty,
        guest_items = tracing::field::Empty
    )
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let account = depot.account_uuid_or_401()?;

    let request = req
        .parse_json::<MergeGuestCartRequest>()
        .await
        .map_err(|error| ApiError::validation(format!("invalid guest cart: {error}")))?;

    let items = request
        .guest_cart_items
        .into_iter()
        .map(GuestCartItem::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    let span = tracing::Span::current();

    span.record("account_uuid", tracing::field::display(account));
    span.record("guest_items", items.len());

    let cart = state
        .app
        .carts
        .merge_guest_items(account, items)
        .await
        .map_err(into_api_error)?;

    Ok(Json(CartResponse::new(cart, state.currency)))
}

#[cfg(test)]
mod tests {
    use pantry_app::domain::{carts::MockCartsService, products::records::ProductUuid};
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::{
        errors::{ErrorBody, ErrorCode},
        test_helpers::{TEST_ACCOUNT_UUID, carts_service, make_cart, make_product},
    };

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(
            carts,
            Router::with_path("cart/merge-guest").post(handler),
        )
    }

    #[tokio::test]
    async fn test_merge_forwards_guest_snapshots() -> TestResult {
        let mut carts = MockCartsService::new();
        let product = make_product(ProductUuid::new(), 50);
        let uuid = product.uuid;
        let cart = make_cart(&product, 5);

        carts
            .expect_merge_guest_items()
            .once()
            .withf(move |account, items| {
                *account == TEST_ACCOUNT_UUID
                    && items.len() == 1
                    && items.first().is_some_and(|item| {
                        item.product_uuid == uuid
                            && item.quantity == 2
                            && item.price == 2_50
                            && item.name == "Sourdough loaf"
                    })
            })
            .return_once(move |_, _| Ok(cart));

        let mut res = TestClient::post("http://example.com/cart/merge-guest")
            .json(&json!({
                "guestCartItems": [{
                    "product": uuid.into_uuid(),
                    "quantity": 2,
                    "price": 2_50,
                    "unit": "800g",
                    "name": "Sourdough loaf",
                    "image": "sourdough.png"
                }]
            }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: CartResponse = res.take_json().await?;

        assert_eq!(body.total_items, 5);

        Ok(())
    }

    #[tokio::test]
    async fn test_merge_rejects_missing_item_list() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_merge_guest_items().never();

        let mut res = TestClient::post("http://example.com/cart/merge-guest")
            .json(&json!({ "items": [] }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        let body: ErrorBody = res.take_json().await?;

        assert_eq!(body.code, ErrorCode::ValidationError);

        Ok(())
    }

    #[tokio::test]
    async fn test_merge_rejects_non_positive_quantities() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_merge_guest_items().never();

        let res = TestClient::post("http://example.com/cart/merge-guest")
            .json(&json!({
                "guestCartItems": [{
                    "product": ProductUuid::new().into_uuid(),
                    "quantity": 0,
                    "price": 1_00,
                    "unit": "each",
                    "name": "Lemon",
                    "image": "lemon.png"
                }]
            }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
