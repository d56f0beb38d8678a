//! Remote Backend

use std::time::Duration;

use async_trait::async_trait;
use jiff::Timestamp;
use pantry::{
    items::{ItemSnapshot, LineItem},
    pricing::Totals,
};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    backend::{AccountBackend, CartBackend},
    error::CartError,
    http,
    view::CartView,
};

/// Where the API lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Base URL of the JSON API, without a trailing path.
    pub base_url: String,

    /// Per-request timeout.
    pub timeout: Duration,
}

/// Cart of a signed-in account, served by the JSON API.
#[derive(Debug, Clone)]
pub struct RemoteBackend {
    client: Client,
    base_url: String,
    token: String,
}

impl RemoteBackend {
    /// Talk to the API at `config.base_url` as the holder of `token`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &RemoteConfig, token: impl Into<String>) -> Result<Self, CartError> {
        Ok(Self {
            client: http::client(config.timeout)?,
            base_url: config.base_url.clone(),
            token: token.into(),
        })
    }

    fn cart_url(&self) -> String {
        http::join(&self.base_url, "cart")
    }

    async fn send(&self, operation: &str, request: RequestBuilder) -> Result<CartView, CartError> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|source| {
                warn!(operation, error = %source, "cart request failed");

                CartError::from(source)
            })?;

        debug!(operation, status = %response.status(), "cart response");

        let cart: CartBody = http::read_json(response).await?;

        Ok(cart.into())
    }
}

#[async_trait]
impl CartBackend for RemoteBackend {
    async fn get(&self) -> Result<CartView, CartError> {
        self.send("read", self.client.get(self.cart_url())).await
    }

    async fn add(&self, snapshot: ItemSnapshot, quantity: u32) -> Result<CartView, CartError> {
        let body = ItemRequest {
            product_id: snapshot.product_uuid,
            quantity,
        };

        self.send("add", self.client.post(self.cart_url()).json(&body)).await
    }

    async fn update(&self, product: Uuid, quantity: u32) -> Result<CartView, CartError> {
        let body = ItemRequest {
            product_id: product,
            quantity,
        };

        self.send("update", self.client.put(self.cart_url()).json(&body)).await
    }

    async fn remove(&self, product: Uuid) -> Result<CartView, CartError> {
        let request = self
            .client
            .delete(self.cart_url())
            .query(&[("productId", product.to_string())]);

        self.send("remove", request).await
    }

    async fn clear(&self) -> Result<CartView, CartError> {
        let request = self
            .client
            .delete(self.cart_url())
            .query(&[("clearAll", "true")]);

        self.send("clear", request).await
    }
}

#[async_trait]
impl AccountBackend for RemoteBackend {
    async fn merge_guest(&self, items: &[LineItem]) -> Result<CartView, CartError> {
        let body = MergeRequest {
            guest_cart_items: items.iter().map(GuestItemRequest::from).collect(),
        };

        let url = http::join(&self.base_url, "cart/merge-guest");

        self.send("merge", self.client.post(url).json(&body)).await
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ItemRequest {
    product_id: Uuid,
    quantity: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MergeRequest<'a> {
    guest_cart_items: Vec<GuestItemRequest<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GuestItemRequest<'a> {
    product: Uuid,
    quantity: u32,
    price: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    original_price: Option<u64>,
    unit: &'a str,
    name: &'a str,
    image: &'a str,
}

impl<'a> From<&'a LineItem> for GuestItemRequest<'a> {
    fn from(item: &'a LineItem) -> Self {
        Self {
            product: item.product_uuid,
            quantity: item.quantity,
            price: item.price,
            original_price: item.original_price,
            unit: &item.unit,
            name: &item.name,
            image: &item.image,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartBody {
    items: Vec<CartItemBody>,
    total_items: u64,
    total_amount: u64,
    delivery_fee: u64,
    #[serde(default)]
    discount_amount: u64,
    subtotal: u64,
    #[serde(default)]
    discount: Option<DiscountBody>,
    version: i64,
    updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartItemBody {
    product: ProductRef,
    quantity: u32,
    price: u64,
    #[serde(default)]
    original_price: Option<u64>,
    unit: String,
    name: String,
    image: String,
    added_at: Timestamp,
}

#[derive(Debug, Deserialize)]
struct ProductRef {
    id: Uuid,
}

#[derive(Debug, Deserialize)]
struct DiscountBody {
    #[serde(default)]
    code: Option<String>,
}

impl From<CartBody> for CartView {
    fn from(body: CartBody) -> Self {
        Self {
            items: body
                .items
                .into_iter()
                .map(|item| LineItem {
                    product_uuid: item.product.id,
                    name: item.name,
                    price: item.price,
                    original_price: item.original_price,
                    unit: item.unit,
                    image: item.image,
                    quantity: item.quantity,
                    added_at: item.added_at,
                })
                .collect(),
            totals: Totals {
                total_items: body.total_items,
                total_amount: body.total_amount,
                delivery_fee: body.delivery_fee,
                discount_amount: body.discount_amount,
                subtotal: body.subtotal,
            },
            discount_code: body.discount.and_then(|discount| discount.code),
            version: Some(body.version),
            updated_at: body.updated_at,
        }
    }
}
