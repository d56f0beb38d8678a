//! Cart View

use jiff::Timestamp;
use pantry::{guest::GuestCart, items::LineItem, pricing::Totals};
use serde::Serialize;
use uuid::Uuid;

/// The cart as presented to the user, whichever backend produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    /// Line items in insertion order.
    pub items: Vec<LineItem>,

    /// Totals as computed by the backend.
    pub totals: Totals,

    /// Promotion code applied to the cart, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_code: Option<String>,

    /// Write counter of a server-side cart. Guest carts have none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,

    /// Last time the backend wrote the cart.
    pub updated_at: Timestamp,
}

impl CartView {
    /// An empty guest view charging `delivery_fee`.
    pub fn empty(delivery_fee: u64) -> Self {
        Self::from(GuestCart::empty(delivery_fee))
    }

    /// Whether the cart has no line items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Quantity held for `product`, zero when absent.
    pub fn quantity_of(&self, product: Uuid) -> u32 {
        self.items
            .iter()
            .find(|item| item.product_uuid == product)
            .map_or(0, |item| item.quantity)
    }
}

impl From<GuestCart> for CartView {
    fn from(cart: GuestCart) -> Self {
        Self {
            totals: cart.totals(),
            items: cart.items,
            discount_code: None,
            version: None,
            updated_at: cart.last_updated,
        }
    }
}
