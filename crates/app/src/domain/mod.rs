//! Pantry Domain Concerns

pub mod accounts;
pub mod carts;
pub mod products;
