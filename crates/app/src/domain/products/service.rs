//! Products service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::products::{
        data::ProductUpsert,
        errors::ProductsServiceError,
        records::{ProductRecord, ProductUuid},
        repository::{PgProductsRepository, ProductsRepository},
    },
};

#[derive(Clone)]
pub struct PgProductsService {
    repository: Arc<dyn ProductsRepository>,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: &Db) -> Self {
        Self::with_repository(Arc::new(PgProductsRepository::new(db.pool())))
    }

    #[must_use]
    pub fn with_repository(repository: Arc<dyn ProductsRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn list_products(&self) -> Result<Vec<ProductRecord>, ProductsServiceError> {
        Ok(self.repository.list_active_products().await?)
    }

    async fn get_product(
        &self,
        product: ProductUuid,
    ) -> Result<ProductRecord, ProductsServiceError> {
        self.repository
            .find_product(product)
            .await?
            .filter(|record| record.is_active)
            .ok_or(ProductsServiceError::NotFound)
    }

    async fn upsert_product(
        &self,
        product: ProductUpsert,
    ) -> Result<ProductRecord, ProductsServiceError> {
        if product.name.trim().is_empty() || product.unit.trim().is_empty() {
            return Err(ProductsServiceError::MissingRequiredData);
        }

        let record = self.repository.upsert_product(&product).await?;

        info!(product = %record.uuid, stock = record.stock, "upserted product");

        Ok(record)
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieves all active products.
    async fn list_products(&self) -> Result<Vec<ProductRecord>, ProductsServiceError>;

    /// Retrieve a single active product.
    async fn get_product(
        &self,
        product: ProductUuid,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Creates or replaces a catalog entry.
    async fn upsert_product(
        &self,
        product: ProductUpsert,
    ) -> Result<ProductRecord, ProductsServiceError>;
}
