//! Guest cart
//!
//! The cart kept in local storage for visitors who have not signed in. It has no owner
//! and is created the first time something is written to it.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    items::{ItemSnapshot, LineItem, QuantityError, combine_quantities, validate_quantity},
    pricing::{Totals, calculate_totals},
};

mod storage;

pub use storage::{CartStorage, FileStorage, MemoryStorage, StorageError};

/// Storage key holding the guest cart.
pub const GUEST_CART_KEY: &str = "pantry.guest_cart";

/// Errors raised by the guest cart store.
#[derive(Debug, Error)]
pub enum GuestCartError {
    /// Storage could not be read or written.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Name or unit missing from the item being added.
    #[error("missing product details")]
    MissingProductDetails,

    /// Quantity outside the allowed range.
    #[error(transparent)]
    Quantity(#[from] QuantityError),

    /// Cart could not be serialized for storage.
    #[error("failed to encode guest cart")]
    Encode(#[source] serde_json::Error),
}

/// Stored guest cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestCart {
    /// Line items in insertion order.
    pub items: Vec<LineItem>,

    /// Sum of quantities.
    #[serde(default)]
    pub total_items: u64,

    /// Sum of price × quantity.
    #[serde(default)]
    pub total_amount: u64,

    /// Flat delivery fee.
    #[serde(default)]
    pub delivery_fee: u64,

    /// Item total plus delivery fee.
    #[serde(default)]
    pub subtotal: u64,

    /// Last time the cart was written.
    #[serde(default)]
    pub last_updated: Timestamp,
}

impl GuestCart {
    /// An empty cart charging `delivery_fee`.
    pub fn empty(delivery_fee: u64) -> Self {
        let mut cart = Self {
            items: Vec::new(),
            total_items: 0,
            total_amount: 0,
            delivery_fee,
            subtotal: 0,
            last_updated: Timestamp::now(),
        };

        cart.refresh_totals();

        cart
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

    /// Current totals. Guest carts never carry a discount.
    pub fn totals(&self) -> Totals {
        calculate_totals(&self.items, self.delivery_fee, None)
    }

    fn refresh_totals(&mut self) {
        let totals = self.totals();

        self.total_items = totals.total_items;
        self.total_amount = totals.total_amount;
        self.subtotal = totals.subtotal;
    }
}

/// Reads and writes the guest cart through a [`CartStorage`] backend.
#[derive(Debug)]
pub struct GuestCartStore<S> {
    storage: S,
    delivery_fee: u64,
}

impl<S: CartStorage> GuestCartStore<S> {
    /// Create a store over `storage` charging `delivery_fee` on every cart.
    pub fn new(storage: S, delivery_fee: u64) -> Self {
        Self {
            storage,
            delivery_fee,
        }
    }

    /// Configured delivery fee.
    pub fn delivery_fee(&self) -> u64 {
        self.delivery_fee
    }

    /// Read the stored cart.
    ///
    /// Missing or malformed data yields an empty cart; malformed data is logged and
    /// otherwise ignored.
    ///
    /// # Errors
    ///
    /// Returns [`GuestCartError::Storage`] when the storage backend fails.
    pub fn read(&self) -> Result<GuestCart, GuestCartError> {
        let Some(raw) = self.storage.get(GUEST_CART_KEY)? else {
            return Ok(GuestCart::empty(self.delivery_fee));
        };

        Ok(self.decode(&raw).unwrap_or_else(|| {
            warn!("stored guest cart is malformed, resetting to an empty cart");

            GuestCart::empty(self.delivery_fee)
        }))
    }

    /// Add `quantity` of a product. An existing line keeps its snapshot and gains the
    /// quantity; otherwise a new line is appended.
    ///
    /// # Errors
    ///
    /// Returns an error for missing product details, an out-of-range quantity, or a
    /// storage failure.
    pub fn add(&self, snapshot: ItemSnapshot, quantity: u32) -> Result<GuestCart, GuestCartError> {
        if snapshot.name.trim().is_empty() || snapshot.unit.trim().is_empty() {
            return Err(GuestCartError::MissingProductDetails);
        }

        let quantity = validate_quantity(u64::from(quantity))?;
        let mut cart = self.read()?;

        match cart
            .items
            .iter_mut()
            .find(|item| item.product_uuid == snapshot.product_uuid)
        {
            Some(existing) => {
                existing.quantity = combine_quantities(existing.quantity, quantity)?;
            }
            None => cart
                .items
                .push(snapshot.into_line_item(quantity, Timestamp::now())),
        }

        self.save(cart)
    }

    /// Set the quantity of a product. Zero removes it; absent products are left alone.
    ///
    /// # Errors
    ///
    /// Returns an error for a quantity above the maximum or a storage failure.
    pub fn update(&self, product: Uuid, quantity: u32) -> Result<GuestCart, GuestCartError> {
        if quantity == 0 {
            return self.remove(product);
        }

        let quantity = validate_quantity(u64::from(quantity))?;
        let mut cart = self.read()?;

        if let Some(existing) = cart
            .items
            .iter_mut()
            .find(|item| item.product_uuid == product)
        {
            existing.quantity = quantity;
        }

        self.save(cart)
    }

    /// Remove a product from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error when storage fails.
    pub fn remove(&self, product: Uuid) -> Result<GuestCart, GuestCartError> {
        let mut cart = self.read()?;

        cart.items.retain(|item| item.product_uuid != product);

        self.save(cart)
    }

    /// Empty the cart, keeping the delivery fee.
    ///
    /// # Errors
    ///
    /// Returns an error when storage fails.
    pub fn clear(&self) -> Result<GuestCart, GuestCartError> {
        self.save(GuestCart::empty(self.delivery_fee))
    }

    fn decode(&self, raw: &str) -> Option<GuestCart> {
        let value: Value = serde_json::from_str(raw).ok()?;

        if !value.get("items").is_some_and(Value::is_array) {
            return None;
        }

        let mut cart: GuestCart = serde_json::from_value(value).ok()?;

        cart.items.retain(|item| item.quantity > 0);
        cart.delivery_fee = self.delivery_fee;
        cart.refresh_totals();

        Some(cart)
    }

    fn save(&self, mut cart: GuestCart) -> Result<GuestCart, GuestCartError> {
        cart.refresh_totals();
        cart.last_updated = Timestamp::now();

        let encoded = serde_json::to_string(&cart).map_err(GuestCartError::Encode)?;

        self.storage.set(GUEST_CART_KEY, &encoded)?;

        debug!(
            total_items = cart.total_items,
            subtotal = cart.subtotal,
            "guest cart saved"
        );

        Ok(cart)
    }
}
