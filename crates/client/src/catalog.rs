//! Catalog
//!
//! Read-only access to the public product endpoints, used to fill in the details a
//! guest cart needs when adding a product by id.

use pantry::items::ItemSnapshot;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::{backend::RemoteConfig, error::CartError, http};

/// A product as listed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Catalog identifier.
    pub id: Uuid,

    /// Display name.
    pub name: String,

    /// Unit price in minor units.
    pub price: u64,

    /// Price before any markdown, in minor units.
    #[serde(default)]
    pub original_price: Option<u64>,

    /// Unit label.
    pub unit: String,

    /// Image reference.
    pub image: String,

    /// Units available.
    pub stock: u32,

    /// Human-readable availability.
    pub stock_label: String,

    /// Aisle the product is shelved in.
    #[serde(default)]
    pub category: Option<String>,
}

impl From<Product> for ItemSnapshot {
    fn from(product: Product) -> Self {
        Self {
            product_uuid: product.id,
            name: product.name,
            price: product.price,
            original_price: product.original_price,
            unit: product.unit,
            image: product.image,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProductsBody {
    products: Vec<Product>,
}

/// Client for the public product endpoints.
#[derive(Debug, Clone)]
pub struct Catalog {
    client: Client,
    base_url: String,
}

impl Catalog {
    /// Browse the catalog served at `config.base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &RemoteConfig) -> Result<Self, CartError> {
        Ok(Self {
            client: http::client(config.timeout)?,
            base_url: config.base_url.clone(),
        })
    }

    /// Every active product.
    ///
    /// # Errors
    ///
    /// Returns the API's error, or `NETWORK_ERROR` when it cannot be reached.
    pub async fn products(&self) -> Result<Vec<Product>, CartError> {
        let response = self
            .client
            .get(http::join(&self.base_url, "products"))
            .send()
            .await?;

        let body: ProductsBody = http::read_json(response).await?;

        debug!(count = body.products.len(), "listed products");

        Ok(body.products)
    }

    /// One active product.
    ///
    /// # Errors
    ///
    /// Returns `NOT_FOUND` for unknown or inactive products, or `NETWORK_ERROR` when
    /// the API cannot be reached.
    pub async fn product(&self, product: Uuid) -> Result<Product, CartError> {
        let response = self
            .client
            .get(http::join(&self.base_url, &format!("products/{product}")))
            .send()
            .await?;

        http::read_json(response).await
    }
}
