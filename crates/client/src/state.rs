//! Cart State
//!
//! In-memory mirror of the authoritative cart. It is constructed by the caller and
//! passed to whatever needs it; there is no global instance.

use std::{
    future::Future,
    sync::{Mutex, MutexGuard, PoisonError},
};

use jiff::Timestamp;
use pantry::items::LineItem;
use tracing::debug;
use uuid::Uuid;

use crate::{
    error::{CartError, CartOutcome},
    view::CartView,
};

/// Point-in-time copy of the container's contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartSnapshot {
    /// Last cart a backend returned.
    pub cart: Option<CartView>,

    /// Whether any operation is still in flight.
    pub loading: bool,

    /// Error from the most recent failed operation, cleared by the next success.
    pub last_error: Option<CartError>,

    /// When the cart was last replaced.
    pub last_updated: Option<Timestamp>,
}

#[derive(Debug, Default)]
struct Inner {
    snapshot: CartSnapshot,
    in_flight: usize,
}

/// Cached cart plus loading and error flags.
#[derive(Debug, Default)]
pub struct CartState {
    inner: Mutex<Inner>,
}

impl CartState {
    /// An empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a backend operation through the container.
    ///
    /// Marks the container as loading, awaits the full round trip and then either
    /// replaces the cached cart wholesale or records the error. Operations are not
    /// queued; whichever completes last wins.
    ///
    /// # Errors
    ///
    /// Returns the operation's own error after recording it.
    pub async fn dispatch<F>(&self, operation: F) -> Result<CartView, CartError>
    where
        F: Future<Output = Result<CartView, CartError>>,
    {
        {
            let mut inner = self.lock();

            inner.in_flight += 1;
            inner.snapshot.loading = true;
        }

        let result = operation.await;

        let mut inner = self.lock();

        inner.in_flight = inner.in_flight.saturating_sub(1);
        inner.snapshot.loading = inner.in_flight > 0;

        match &result {
            Ok(cart) => {
                debug!(total_items = cart.totals.total_items, "cart replaced");

                inner.snapshot.cart = Some(cart.clone());
                inner.snapshot.last_error = None;
                inner.snapshot.last_updated = Some(Timestamp::now());
            }
            Err(error) => {
                debug!(code = %error.code, "cart operation failed");

                inner.snapshot.last_error = Some(error.clone());
            }
        }

        result
    }

    /// Like [`dispatch`](Self::dispatch), flattened into the presentation result shape.
    pub async fn dispatch_outcome<F>(&self, operation: F) -> CartOutcome<CartView>
    where
        F: Future<Output = Result<CartView, CartError>>,
    {
        self.dispatch(operation).await.into()
    }

    /// Copy of everything the container holds.
    pub fn snapshot(&self) -> CartSnapshot {
        self.lock().snapshot.clone()
    }

    /// Forget the cached cart and error.
    pub fn reset(&self) {
        let mut inner = self.lock();

        inner.snapshot = CartSnapshot {
            loading: inner.snapshot.loading,
            ..CartSnapshot::default()
        };
    }

    /// Whether any operation is still in flight.
    pub fn is_loading(&self) -> bool {
        self.lock().snapshot.loading
    }

    /// Error from the most recent failed operation.
    pub fn last_error(&self) -> Option<CartError> {
        self.lock().snapshot.last_error.clone()
    }

    /// When the cart was last replaced.
    pub fn last_updated(&self) -> Option<Timestamp> {
        self.lock().snapshot.last_updated
    }

    /// Cached line items, empty before the first load.
    pub fn items(&self) -> Vec<LineItem> {
        self.select(|cart| cart.items.clone())
    }

    /// Sum of quantities in the cached cart.
    pub fn total_items(&self) -> u64 {
        self.select(|cart| cart.totals.total_items)
    }

    /// Sum of line totals in the cached cart, in minor units.
    pub fn total_amount(&self) -> u64 {
        self.select(|cart| cart.totals.total_amount)
    }

    /// Amount payable for the cached cart, in minor units.
    pub fn subtotal(&self) -> u64 {
        self.select(|cart| cart.totals.subtotal)
    }

    /// Quantity held for `product`, zero when absent or before the first load.
    pub fn quantity_of(&self, product: Uuid) -> u32 {
        self.select(|cart| cart.quantity_of(product))
    }

    fn select<T: Default>(&self, select: impl FnOnce(&CartView) -> T) -> T {
        self.lock()
            .snapshot
            .cart
            .as_ref()
            .map(select)
            .unwrap_or_default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
