//! Items

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Largest quantity a single line item may hold.
pub const MAX_QUANTITY: u32 = 1000;

/// Errors raised when changing line item quantities.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuantityError {
    /// Quantity was zero where a positive quantity is required.
    #[error("quantity must be at least 1")]
    Zero,

    /// Quantity exceeded [`MAX_QUANTITY`].
    #[error("quantity {0} exceeds the maximum of {MAX_QUANTITY}")]
    TooLarge(u64),
}

/// A product, its quantity and the price snapshot taken when it was first added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Catalog product this item refers to.
    #[serde(rename = "productId")]
    pub product_uuid: Uuid,

    /// Display name at the time of adding.
    pub name: String,

    /// Unit price in minor units at the time of adding.
    pub price: u64,

    /// Pre-discount unit price in minor units, when the product was on offer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<u64>,

    /// Unit label, e.g. "500g" or "each".
    pub unit: String,

    /// Image reference.
    pub image: String,

    /// Always at least 1 while the item exists.
    pub quantity: u32,

    /// When the item first entered the cart.
    pub added_at: Timestamp,
}

impl LineItem {
    /// Price multiplied by quantity, in minor units.
    pub fn line_total(&self) -> u64 {
        self.price.saturating_mul(u64::from(self.quantity))
    }
}

/// Product details captured when a line item is first created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSnapshot {
    /// Catalog product.
    #[serde(rename = "productId")]
    pub product_uuid: Uuid,

    /// Display name.
    pub name: String,

    /// Unit price in minor units.
    pub price: u64,

    /// Pre-discount unit price in minor units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<u64>,

    /// Unit label.
    pub unit: String,

    /// Image reference.
    pub image: String,
}

impl ItemSnapshot {
    /// Build a line item from this snapshot.
    pub fn into_line_item(self, quantity: u32, added_at: Timestamp) -> LineItem {
        LineItem {
            product_uuid: self.product_uuid,
            name: self.name,
            price: self.price,
            original_price: self.original_price,
            unit: self.unit,
            image: self.image,
            quantity,
            added_at,
        }
    }
}

/// Check a quantity requested for a line item that must keep existing.
///
/// # Errors
///
/// Returns [`QuantityError::Zero`] for zero and [`QuantityError::TooLarge`] above
/// [`MAX_QUANTITY`].
pub fn validate_quantity(quantity: u64) -> Result<u32, QuantityError> {
    if quantity == 0 {
        return Err(QuantityError::Zero);
    }

    u32::try_from(quantity)
        .ok()
        .filter(|quantity| *quantity <= MAX_QUANTITY)
        .ok_or(QuantityError::TooLarge(quantity))
}

/// Add `extra` to an existing quantity, keeping the result within bounds.
///
/// # Errors
///
/// Returns [`QuantityError::TooLarge`] when the combined quantity exceeds [`MAX_QUANTITY`].
pub fn combine_quantities(current: u32, extra: u32) -> Result<u32, QuantityError> {
    validate_quantity(u64::from(current) + u64::from(extra))
}

/// Position of the line item for `product` in `items`.
pub fn position_of(items: &[LineItem], product: Uuid) -> Option<usize> {
    items.iter().position(|item| item.product_uuid == product)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: u64, quantity: u32) -> LineItem {
        ItemSnapshot {
            product_uuid: Uuid::now_v7(),
            name: "Oat milk".to_string(),
            price,
            original_price: None,
            unit: "1l".to_string(),
            image: "oat-milk.png".to_string(),
        }
        .into_line_item(quantity, Timestamp::UNIX_EPOCH)
    }

    #[test]
    fn line_total_multiplies_price_by_quantity() {
        assert_eq!(item(1_25, 4).line_total(), 5_00);
    }

    #[test]
    fn validate_quantity_bounds() {
        assert_eq!(validate_quantity(0), Err(QuantityError::Zero));
        assert_eq!(validate_quantity(1), Ok(1));
        assert_eq!(validate_quantity(1000), Ok(1000));
        assert_eq!(validate_quantity(1001), Err(QuantityError::TooLarge(1001)));
        assert_eq!(
            validate_quantity(u64::MAX),
            Err(QuantityError::TooLarge(u64::MAX))
        );
    }

    #[test]
    fn combine_quantities_rejects_overflowing_totals() {
        assert_eq!(combine_quantities(999, 1), Ok(1000));
        assert_eq!(combine_quantities(999, 2), Err(QuantityError::TooLarge(1001)));
    }

    #[test]
    fn line_item_serializes_with_camel_case_keys() -> Result<(), serde_json::Error> {
        let json = serde_json::to_value(item(100, 1))?;

        assert!(json.get("productId").is_some(), "expected productId key");
        assert!(json.get("addedAt").is_some(), "expected addedAt key");
        assert!(
            json.get("originalPrice").is_none(),
            "originalPrice should be omitted when absent"
        );

        Ok(())
    }
}
