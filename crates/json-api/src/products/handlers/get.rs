//! Get Product Handler

use std::sync::Arc;

use pantry_app::domain::products::{
    ProductsServiceError,
    records::{ProductRecord, ProductUuid},
};
use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{errors::ApiError, extensions::*, state::State};

/// Product Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductResponse {
    /// The unique identifier of the product
    pub id: Uuid,

    pub name: String,

    /// Unit price in minor units
    pub price: u64,

    /// Price before any markdown, in minor units
    pub original_price: Option<u64>,

    pub unit: String,

    pub image: String,

    pub stock: u32,

    /// "In stock", "Only N left" or "Out of stock"
    pub stock_label: String,

    pub category: Option<String>,

    pub updated_at: String,
}

impl From<ProductRecord> for ProductResponse {
    fn from(product: ProductRecord) -> Self {
        Self {
            id: product.uuid.into_uuid(),
            stock_label: product.stock_label(),
            name: product.name,
            price: product.price,
            original_price: product.original_price,
            unit: product.unit,
            image: product.image,
            stock: product.stock,
            category: product.category,
            updated_at: product.updated_at.to_string(),
        }
    }
}

/// Get Product Handler
///
/// Returns a single product on sale.
#[endpoint(tags("products"), summary = "Get Product")]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let product = state
        .app
        .products
        .get_product(ProductUuid::from_uuid(uuid.into_inner()))
        .await
        .map_err(|error| match error {
            ProductsServiceError::NotFound => ApiError::not_found("Product not found"),
            error => {
                tracing::error!("failed to fetch product: {error}");

                ApiError::internal()
            }
        })?;

    Ok(Json(product.into()))
}
