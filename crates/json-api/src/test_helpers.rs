//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use pantry::{pricing::calculate_totals, receipt::CurrencyCode};
use pantry_app::{
    auth::MockAuthService,
    context::AppContext,
    domain::{
        accounts::records::AccountUuid,
        carts::{
            MockCartsService,
            models::{Cart, CartLine},
            records::CartUuid,
        },
        products::{
            MockProductsService,
            records::{ProductRecord, ProductUuid},
        },
    },
};
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, rate_limit::RateLimits, state::State};

pub(crate) const TEST_ACCOUNT_UUID: AccountUuid = AccountUuid::from_uuid(Uuid::nil());

#[salvo::handler]
pub(crate) async fn inject_account(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_account_uuid(TEST_ACCOUNT_UUID);
    ctrl.call_next(req, depot, res).await;
}

fn strict_auth_mock() -> MockAuthService {
    let mut auth = MockAuthService::new();

    auth.expect_authenticate_bearer().never();

    auth
}

fn strict_carts_mock() -> MockCartsService {
    let mut carts = MockCartsService::new();

    carts.expect_get_cart().never();
    carts.expect_add_item().never();
    carts.expect_update_item().never();
    carts.expect_remove_item().never();
    carts.expect_clear_cart().never();
    carts.expect_merge_guest_items().never();

    carts
}

fn strict_products_mock() -> MockProductsService {
    let mut products = MockProductsService::new();

    products.expect_list_products().never();
    products.expect_get_product().never();
    products.expect_upsert_product().never();

    products
}

pub(crate) fn strict_app() -> AppContext {
    AppContext {
        carts: Arc::new(strict_carts_mock()),
        products: Arc::new(strict_products_mock()),
        auth: Arc::new(strict_auth_mock()),
    }
}

pub(crate) fn state_with(app: AppContext, limits: RateLimits) -> Arc<State> {
    State::from_app_context(app, limits, CurrencyCode::Gbp)
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    state_with(
        AppContext {
            auth: Arc::new(auth),
            ..strict_app()
        },
        RateLimits::default(),
    )
}

pub(crate) fn carts_service(carts: MockCartsService, route: Router) -> Service {
    let app = AppContext {
        carts: Arc::new(carts),
        ..strict_app()
    };

    Service::new(
        Router::new()
            .hoop(inject(state_with(app, RateLimits::default())))
            .hoop(inject_account)
            .push(route),
    )
}

pub(crate) fn products_service(products: MockProductsService, route: Router) -> Service {
    let app = AppContext {
        products: Arc::new(products),
        ..strict_app()
    };

    Service::new(
        Router::new()
            .hoop(inject(state_with(app, RateLimits::default())))
            .push(route),
    )
}

pub(crate) fn make_product(uuid: ProductUuid, stock: u32) -> ProductRecord {
    ProductRecord {
        uuid,
        name: "Sourdough loaf".to_string(),
        price: 2_75,
        original_price: Some(3_20),
        unit: "800g".to_string(),
        image: "sourdough.png".to_string(),
        stock,
        is_active: true,
        category: Some("Bakery".to_string()),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

/// A cart holding `quantity` of one product, with a 3.50 delivery fee.
pub(crate) fn make_cart(product: &ProductRecord, quantity: u32) -> Cart {
    let item = product
        .snapshot()
        .into_line_item(quantity, Timestamp::UNIX_EPOCH);

    let totals = calculate_totals(std::slice::from_ref(&item), 3_50, None);

    Cart {
        uuid: CartUuid::from_uuid(Uuid::nil()),
        lines: vec![CartLine {
            item,
            product: product.clone(),
        }],
        totals,
        discount: None,
        is_active: true,
        expires_at: Timestamp::UNIX_EPOCH,
        version: 1,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
