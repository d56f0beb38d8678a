//! Pantry
//!
//! Grocery cart domain shared by the storefront server and its clients: line items,
//! totals, discounts and the guest cart kept in local storage.

pub mod discounts;
pub mod guest;
pub mod items;
pub mod pricing;
pub mod receipt;
