//! App Router

use salvo::Router;

use crate::{
    auth, carts, healthcheck, observability, products,
    rate_limit::{CartOperation, limit},
};

/// Every route served by the API, without documentation routes or process-level hoops.
pub(crate) fn app_router() -> Router {
    Router::new()
        .hoop(observability::request_logging)
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(observability::metrics_handler))
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .push(Router::with_path("{uuid}").get(products::get::handler)),
        )
        .push(cart_router())
}

/// Cart routes. Each operation is rate limited before the session is checked.
fn cart_router() -> Router {
    let guarded = |operation: CartOperation| {
        Router::new()
            .hoop(limit(operation))
            .hoop(auth::middleware::handler)
    };

    Router::with_path("cart")
        .push(
            Router::with_path("merge-guest")
                .hoop(limit(CartOperation::Merge))
                .hoop(auth::middleware::handler)
                .post(carts::merge::handler),
        )
        .push(guarded(CartOperation::Read).get(carts::get::handler))
        .push(guarded(CartOperation::Add).post(carts::add::handler))
        .push(guarded(CartOperation::Update).put(carts::update::handler))
        .push(guarded(CartOperation::Remove).delete(carts::delete::handler))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pantry_app::{
        auth::MockAuthService,
        context::AppContext,
        domain::{carts::MockCartsService, products::records::ProductUuid},
    };
    use salvo::{
        affix_state::inject,
        http::header::AUTHORIZATION,
        prelude::*,
        test::{ResponseExt, TestClient},
    };
    use serde_json::json;
    use testresult::TestResult;

    use crate::{
        errors::{ErrorBody, ErrorCode},
        rate_limit::RateLimits,
        test_helpers::{TEST_ACCOUNT_UUID, make_cart, make_product, state_with, strict_app},
    };

    use super::*;

    fn accepting_auth() -> MockAuthService {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer()
            .returning(|_| Ok(TEST_ACCOUNT_UUID));

        auth
    }

    fn service(carts: MockCartsService, limits: RateLimits) -> Service {
        let app = AppContext {
            carts: Arc::new(carts),
            auth: Arc::new(accepting_auth()),
            ..strict_app()
        };

        Service::new(
            Router::new()
                .hoop(inject(state_with(app, limits)))
                .push(app_router()),
        )
    }

    #[tokio::test]
    async fn cart_requires_a_session() -> TestResult {
        let mut res = TestClient::get("http://example.com/cart")
            .send(&service(MockCartsService::new(), RateLimits::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        let body: ErrorBody = res.take_json().await?;

        assert_eq!(body.code, ErrorCode::Unauthorized);

        Ok(())
    }

    #[tokio::test]
    async fn exhausted_add_budget_skips_the_service() -> TestResult {
        let product = make_product(ProductUuid::new(), 100);
        let cart = make_cart(&product, 1);
        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .times(2)
            .returning(move |_, _, _| Ok(cart.clone()));

        let limits = RateLimits {
            add: 2,
            ..RateLimits::default()
        };

        let service = service(carts, limits);
        let body = json!({ "productId": product.uuid.into_uuid(), "quantity": 1 });

        for _ in 0..2 {
            let res = TestClient::post("http://example.com/cart")
                .add_header(AUTHORIZATION, "Bearer token", true)
                .json(&body)
                .send(&service)
                .await;

            assert_eq!(res.status_code, Some(StatusCode::OK));
        }

        let mut res = TestClient::post("http://example.com/cart")
            .add_header(AUTHORIZATION, "Bearer token", true)
            .json(&body)
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::TOO_MANY_REQUESTS));

        let error: ErrorBody = res.take_json().await?;

        assert_eq!(error.code, ErrorCode::RateLimitExceeded);

        Ok(())
    }

    #[tokio::test]
    async fn operations_have_independent_budgets() -> TestResult {
        let product = make_product(ProductUuid::new(), 100);
        let cart = make_cart(&product, 1);
        let mut carts = MockCartsService::new();

        carts
            .expect_get_cart()
            .once()
            .return_once(move |_| Ok(cart));

        let limits = RateLimits {
            add: 0,
            ..RateLimits::default()
        };

        let service = service(carts, limits);

        let res = TestClient::post("http://example.com/cart")
            .add_header(AUTHORIZATION, "Bearer token", true)
            .json(&json!({ "productId": product.uuid.into_uuid(), "quantity": 1 }))
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::TOO_MANY_REQUESTS));

        let res = TestClient::get("http://example.com/cart")
            .add_header(AUTHORIZATION, "Bearer token", true)
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }
}
