//! Cart Data

use jiff::Timestamp;

use crate::domain::{
    accounts::records::AccountUuid,
    carts::records::CartUuid,
    products::records::ProductUuid,
};

/// Empty cart to create for an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCart {
    pub uuid: CartUuid,
    pub account_uuid: AccountUuid,
    pub delivery_fee: u64,
    pub expires_at: Timestamp,
}

/// A line carried over from a guest cart at sign-in, with the guest's snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestCartItem {
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub price: u64,
    pub original_price: Option<u64>,
    pub unit: String,
    pub name: String,
    pub image: String,
}
