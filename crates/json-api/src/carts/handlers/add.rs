//! Add Cart Item Handler

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

/// Add Cart Item Handler
///
/// Adds a product to the caller's cart, combining with an existing line. The combined
/// quantity may not exceed the product's stock.
#[endpoint(
    tags("carts"),
    summary = "Add Item to Cart",
    security(("bearer_auth" = [])),
    request_body = CartItemRequest
)]
#[tracing::instrument(
    name = "carts.add_item",
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

    let quantity = request.checked_quantity(1)?;

    let span = tracing::Span::current();

    span.record("account_uuid", tracing::field::display(account));
    span.record("product_uuid", tracing::field::display(request.product_id));

    let cart = state
        .app
        .carts
        .add_item(account, ProductUuid::from_uuid(request.product_id), quantity)
        .await
        .map_err(into_api_error)?;

    tracing::info!(product_uuid = %request.product_id, quantity, "added item to cart");

    Ok(Json(CartResponse::new(cart, state.currency)))
}

#[cfg(test)]
mod tests {
    use pantry_app::domain::carts::{CartsServiceError, MockCartsService};
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;
    use uuid::Uuid;

    use crate::{
        errors::{ErrorBody, ErrorCode},
        test_helpers::{TEST_ACCOUNT_UUID, carts_service, make_cart, make_product},
    };

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(carts, Router::with_path("cart").post(handler))
    }

    #[tokio::test]
    async fn test_add_returns_updated_cart() -> TestResult {
        let mut carts = MockCartsService::new();
        let product = make_product(ProductUuid::new(), 10);
        let uuid = product.uuid;
        let cart = make_cart(&product, 3);

        carts
            .expect_add_item()
            .once()
            .withf(move |account, p, quantity| {
                *account == TEST_ACCOUNT_UUID && *p == uuid && *quantity == 3
            })
            .return_once(move |_, _, _| Ok(cart));

        let mut res = TestClient::post("http://example.com/cart")
            .json(&json!({ "productId": uuid.into_uuid(), "quantity": 3 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: CartResponse = res.take_json().await?;

        assert_eq!(body.total_items, 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_add_rejects_out_of_range_quantities() -> TestResult {
        for quantity in [json!(0), json!(1_001), json!(-2), json!(1.5), json!("2")] {
            let mut carts = MockCartsService::new();

            carts.expect_add_item().never();

            let mut res = TestClient::post("http://example.com/cart")
                .json(&json!({ "productId": Uuid::now_v7(), "quantity": quantity }))
                .send(&make_service(carts))
                .await;

            assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

            let body: ErrorBody = res.take_json().await?;

            assert_eq!(body.code, ErrorCode::ValidationError);
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_add_beyond_stock_returns_409_with_availability() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .return_once(|_, _, _| Err(CartsServiceError::InsufficientStock { available: 4 }));

        let mut res = TestClient::post("http://example.com/cart")
            .json(&json!({ "productId": Uuid::now_v7(), "quantity": 5 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        let body: ErrorBody = res.take_json().await?;

        assert_eq!(body.code, ErrorCode::InsufficientStock);
        assert!(body.error.contains('4'), "message should state availability");

        Ok(())
    }

    #[tokio::test]
    async fn test_add_unknown_product_returns_404() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .return_once(|_, _, _| Err(CartsServiceError::ProductNotFound));

        let res = TestClient::post("http://example.com/cart")
            .json(&json!({ "productId": Uuid::now_v7(), "quantity": 1 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
