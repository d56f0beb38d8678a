//! Cart Models

use jiff::Timestamp;
use pantry::{discounts::Discount, items::LineItem, pricing::Totals};
use rustc_hash::FxHashMap;

use crate::domain::{
    carts::records::{CartRecord, CartUuid},
    products::records::{ProductRecord, ProductUuid},
};

/// A cart with each line joined to its live catalog product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    pub uuid: CartUuid,
    pub lines: Vec<CartLine>,
    pub totals: Totals,
    pub discount: Option<Discount>,
    pub is_active: bool,
    pub expires_at: Timestamp,
    pub version: i64,
    pub updated_at: Timestamp,
}

/// Stored line item plus the product it refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub item: LineItem,
    pub product: ProductRecord,
}

impl Cart {
    /// Join `record` to `products`. Lines without a known product are left out.
    #[must_use]
    pub fn assemble(record: CartRecord, products: &FxHashMap<ProductUuid, ProductRecord>) -> Self {
        let totals = record.totals();

        let lines = record
            .items
            .into_iter()
            .filter_map(|item| {
                products
                    .get(&ProductUuid::from_uuid(item.product_uuid))
                    .map(|product| CartLine {
                        item,
                        product: product.clone(),
                    })
            })
            .collect();

        Self {
            uuid: record.uuid,
            lines,
            totals,
            discount: record.discount,
            is_active: record.is_active,
            expires_at: record.expires_at,
            version: record.version,
            updated_at: record.updated_at,
        }
    }

    /// Quantity of `product` in the cart, zero when absent.
    #[must_use]
    pub fn quantity_of(&self, product: ProductUuid) -> u32 {
        self.lines
            .iter()
            .find(|line| line.product.uuid == product)
            .map_or(0, |line| line.item.quantity)
    }
}
