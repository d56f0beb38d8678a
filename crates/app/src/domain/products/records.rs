//! Product Records

use jiff::Timestamp;
use pantry::items::ItemSnapshot;

use crate::uuids::TypedUuid;

/// Stock level below which the storefront warns about scarcity.
pub const LOW_STOCK_THRESHOLD: u32 = 10;

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Product Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub name: String,
    pub price: u64,
    pub original_price: Option<u64>,
    pub unit: String,
    pub image: String,
    pub stock: u32,
    pub is_active: bool,
    pub category: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProductRecord {
    /// Human readable stock availability.
    #[must_use]
    pub fn stock_label(&self) -> String {
        match self.stock {
            0 => "Out of stock".to_string(),
            stock if stock < LOW_STOCK_THRESHOLD => format!("Only {stock} left"),
            _ => "In stock".to_string(),
        }
    }

    /// Display fields copied onto a line item when it is first added.
    #[must_use]
    pub fn snapshot(&self) -> ItemSnapshot {
        ItemSnapshot {
            product_uuid: self.uuid.into_uuid(),
            name: self.name.clone(),
            price: self.price,
            original_price: self.original_price,
            unit: self.unit.clone(),
            image: self.image.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_with_stock(stock: u32) -> ProductRecord {
        ProductRecord {
            uuid: ProductUuid::new(),
            name: "Apples".to_string(),
            price: 2_00,
            original_price: None,
            unit: "6 pack".to_string(),
            image: "apples.png".to_string(),
            stock,
            is_active: true,
            category: Some("Fruit".to_string()),
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn stock_label_reflects_availability() {
        assert_eq!(product_with_stock(0).stock_label(), "Out of stock");
        assert_eq!(product_with_stock(1).stock_label(), "Only 1 left");
        assert_eq!(product_with_stock(9).stock_label(), "Only 9 left");
        assert_eq!(product_with_stock(10).stock_label(), "In stock");
    }

    #[test]
    fn snapshot_copies_display_fields() {
        let product = product_with_stock(5);
        let snapshot = product.snapshot();

        assert_eq!(snapshot.product_uuid, product.uuid.into_uuid());
        assert_eq!(snapshot.name, product.name);
        assert_eq!(snapshot.price, product.price);
        assert_eq!(snapshot.unit, product.unit);
    }
}
