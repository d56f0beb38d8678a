//! Product Data

use crate::domain::products::records::ProductUuid;

/// Catalog entry to insert or replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductUpsert {
    pub uuid: ProductUuid,
    pub name: String,
    pub price: u64,
    pub original_price: Option<u64>,
    pub unit: String,
    pub image: String,
    pub stock: u32,
    pub is_active: bool,
    pub category: Option<String>,
}
