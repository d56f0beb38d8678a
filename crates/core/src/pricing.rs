//! Pricing

use serde::{Deserialize, Serialize};

use crate::{discounts::Discount, items::LineItem};

/// Totals derived from a cart's line items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// Sum of quantities.
    pub total_items: u64,

    /// Sum of price × quantity, in minor units.
    pub total_amount: u64,

    /// Flat delivery fee, in minor units.
    pub delivery_fee: u64,

    /// Amount the discount took off, in minor units.
    pub discount_amount: u64,

    /// `total_amount + delivery_fee - discount_amount`, floored at zero.
    pub subtotal: u64,
}

/// Recompute totals from line items.
///
/// This is the only way totals are produced; they are never adjusted in place.
pub fn calculate_totals(
    items: &[LineItem],
    delivery_fee: u64,
    discount: Option<&Discount>,
) -> Totals {
    let total_items = items
        .iter()
        .map(|item| u64::from(item.quantity))
        .fold(0_u64, u64::saturating_add);

    let total_amount = items
        .iter()
        .map(LineItem::line_total)
        .fold(0_u64, u64::saturating_add);

    let discount_amount = discount.map_or(0, |discount| discount.amount_off(total_amount));

    let subtotal = total_amount
        .saturating_add(delivery_fee)
        .saturating_sub(discount_amount);

    Totals {
        total_items,
        total_amount,
        delivery_fee,
        discount_amount,
        subtotal,
    }
}
