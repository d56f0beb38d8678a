//! Cart Records

use jiff::Timestamp;
use pantry::{
    discounts::Discount,
    items::LineItem,
    pricing::{Totals, calculate_totals},
};

use crate::{domain::accounts::records::AccountUuid, uuids::TypedUuid};

/// Cart UUID
pub type CartUuid = TypedUuid<CartRecord>;

/// Cart Record
///
/// The whole line item list is stored as one document and rewritten on every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartRecord {
    pub uuid: CartUuid,
    pub account_uuid: AccountUuid,
    pub items: Vec<LineItem>,
    pub delivery_fee: u64,
    pub discount: Option<Discount>,
    pub is_active: bool,
    pub expires_at: Timestamp,

    /// Incremented by every successful write.
    pub version: i64,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CartRecord {
    /// Totals recomputed from the current line items.
    #[must_use]
    pub fn totals(&self) -> Totals {
        calculate_totals(&self.items, self.delivery_fee, self.discount.as_ref())
    }

    #[must_use]
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at <= now
    }
}
