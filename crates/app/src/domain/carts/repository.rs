//! Carts Repository

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use mockall::automock;
use pantry::{discounts::Discount, items::LineItem};
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query, query_as, types::Json};

use crate::{
    database::{decode_u64, encode_u64},
    domain::{
        accounts::records::AccountUuid,
        carts::{
            data::NewCart,
            records::{CartRecord, CartUuid},
        },
    },
};

const FIND_ACTIVE_CART_SQL: &str = include_str!("sql/find_active_cart.sql");
const CREATE_CART_SQL: &str = include_str!("sql/create_cart.sql");
const SAVE_CART_SQL: &str = include_str!("sql/save_cart.sql");
const DEACTIVATE_CART_SQL: &str = include_str!("sql/deactivate_cart.sql");

/// Cart document persistence.
#[automock]
#[async_trait]
pub trait CartsRepository: Send + Sync {
    /// The account's active cart, if it has one.
    async fn find_active_cart(
        &self,
        account: AccountUuid,
    ) -> Result<Option<CartRecord>, sqlx::Error>;

    /// Insert an empty cart. When the account already has an active cart, that cart is
    /// returned instead.
    async fn create_cart(&self, cart: &NewCart) -> Result<CartRecord, sqlx::Error>;

    /// Write the cart if its stored version still equals `cart.version`.
    ///
    /// Returns `None` when another write got there first.
    async fn save_cart(&self, cart: &CartRecord) -> Result<Option<CartRecord>, sqlx::Error>;

    /// Mark a cart inactive so a fresh one can be created.
    async fn deactivate_cart(&self, cart: CartUuid) -> Result<(), sqlx::Error>;
}

#[derive(Debug, Clone)]
pub struct PgCartsRepository {
    pool: PgPool,
}

impl PgCartsRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartsRepository for PgCartsRepository {
    async fn find_active_cart(
        &self,
        account: AccountUuid,
    ) -> Result<Option<CartRecord>, sqlx::Error> {
        query_as::<Postgres, CartRecord>(FIND_ACTIVE_CART_SQL)
            .bind(account.into_uuid())
            .fetch_optional(&self.pool)
            .await
    }

    async fn create_cart(&self, cart: &NewCart) -> Result<CartRecord, sqlx::Error> {
        let created = query_as::<Postgres, CartRecord>(CREATE_CART_SQL)
            .bind(cart.uuid.into_uuid())
            .bind(cart.account_uuid.into_uuid())
            .bind(encode_u64(cart.delivery_fee, "delivery_fee")?)
            .bind(SqlxTimestamp::from(cart.expires_at))
            .fetch_optional(&self.pool)
            .await?;

        match created {
            Some(created) => Ok(created),
            None => self
                .find_active_cart(cart.account_uuid)
                .await?
                .ok_or(sqlx::Error::RowNotFound),
        }
    }

    async fn save_cart(&self, cart: &CartRecord) -> Result<Option<CartRecord>, sqlx::Error> {
        let totals = cart.totals();

        query_as::<Postgres, CartRecord>(SAVE_CART_SQL)
            .bind(cart.uuid.into_uuid())
            .bind(cart.version)
            .bind(Json(&cart.items))
            .bind(encode_u64(cart.delivery_fee, "delivery_fee")?)
            .bind(cart.discount.as_ref().map(Json))
            .bind(encode_u64(totals.total_items, "total_items")?)
            .bind(encode_u64(totals.total_amount, "total_amount")?)
            .bind(encode_u64(totals.subtotal, "subtotal")?)
            .bind(SqlxTimestamp::from(cart.expires_at))
            .fetch_optional(&self.pool)
            .await
    }

    async fn deactivate_cart(&self, cart: CartUuid) -> Result<(), sqlx::Error> {
        query(DEACTIVATE_CART_SQL)
            .bind(cart.into_uuid())
            .execute(&self.pool)
            .await
            .map(|_| ())
    }
}

impl<'r> FromRow<'r, PgRow> for CartRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartUuid::from_uuid(row.try_get("uuid")?),
            account_uuid: AccountUuid::from_uuid(row.try_get("account_uuid")?),
            items: row.try_get::<Json<Vec<LineItem>>, _>("items")?.0,
            delivery_fee: decode_u64(row.try_get("delivery_fee")?, "delivery_fee")?,
            discount: row
                .try_get::<Option<Json<Discount>>, _>("discount")?
                .map(|discount| discount.0),
            is_active: row.try_get("is_active")?,
            expires_at: row.try_get::<SqlxTimestamp, _>("expires_at")?.to_jiff(),
            version: row.try_get("version")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
