//! Products Repository

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use mockall::automock;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::{
    database::{decode_u32, decode_u64, encode_u32, encode_u64},
    domain::products::{
        data::ProductUpsert,
        records::{ProductRecord, ProductUuid},
    },
};

const LIST_ACTIVE_PRODUCTS_SQL: &str = include_str!("sql/list_active_products.sql");
const FIND_PRODUCT_SQL: &str = include_str!("sql/find_product.sql");
const FIND_PRODUCTS_SQL: &str = include_str!("sql/find_products.sql");
const UPSERT_PRODUCT_SQL: &str = include_str!("sql/upsert_product.sql");

/// Catalog persistence.
#[automock]
#[async_trait]
pub trait ProductsRepository: Send + Sync {
    /// Active products ordered by name.
    async fn list_active_products(&self) -> Result<Vec<ProductRecord>, sqlx::Error>;

    /// A single product regardless of its active flag.
    async fn find_product(
        &self,
        product: ProductUuid,
    ) -> Result<Option<ProductRecord>, sqlx::Error>;

    /// Every product among `products` that exists, active or not.
    async fn find_products(
        &self,
        products: &[ProductUuid],
    ) -> Result<Vec<ProductRecord>, sqlx::Error>;

    /// Insert a product or replace the existing one with the same UUID.
    async fn upsert_product(&self, product: &ProductUpsert) -> Result<ProductRecord, sqlx::Error>;
}

#[derive(Debug, Clone)]
pub struct PgProductsRepository {
    pool: PgPool,
}

impl PgProductsRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductsRepository for PgProductsRepository {
    async fn list_active_products(&self) -> Result<Vec<ProductRecord>, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(LIST_ACTIVE_PRODUCTS_SQL)
            .fetch_all(&self.pool)
            .await
    }

    async fn find_product(
        &self,
        product: ProductUuid,
    ) -> Result<Option<ProductRecord>, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(FIND_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_products(
        &self,
        products: &[ProductUuid],
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        let uuids: Vec<Uuid> = products.iter().map(|uuid| uuid.into_uuid()).collect();

        query_as::<Postgres, ProductRecord>(FIND_PRODUCTS_SQL)
            .bind(uuids)
            .fetch_all(&self.pool)
            .await
    }

    async fn upsert_product(&self, product: &ProductUpsert) -> Result<ProductRecord, sqlx::Error> {
        let original_price = product
            .original_price
            .map(|price| encode_u64(price, "original_price"))
            .transpose()?;

        query_as::<Postgres, ProductRecord>(UPSERT_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(&product.name)
            .bind(encode_u64(product.price, "price")?)
            .bind(original_price)
            .bind(&product.unit)
            .bind(&product.image)
            .bind(encode_u32(product.stock, "stock")?)
            .bind(product.is_active)
            .bind(product.category.as_deref())
            .fetch_one(&self.pool)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            price: decode_u64(row.try_get("price")?, "price")?,
            original_price: row
                .try_get::<Option<i64>, _>("original_price")?
                .map(|price| decode_u64(price, "original_price"))
                .transpose()?,
            unit: row.try_get("unit")?,
            image: row.try_get("image")?,
            stock: decode_u32(row.try_get("stock")?, "stock")?,
            is_active: row.try_get("is_active")?,
            category: row.try_get("category")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
