//! Cart Backends
//!
//! One [`CartBackend`] is chosen per session: [`GuestBackend`] for visitors,
//! [`RemoteBackend`] once signed in. Callers never branch on which one they hold.

use async_trait::async_trait;
use mockall::automock;
use pantry::items::{ItemSnapshot, LineItem};
use uuid::Uuid;

use crate::{
    error::{CartError, ErrorCode},
    view::CartView,
};

mod guest;
mod remote;

pub use guest::GuestBackend;
pub use remote::{RemoteBackend, RemoteConfig};

/// Cart operations shared by the guest and remote backends.
#[automock]
#[async_trait]
pub trait CartBackend: Send + Sync {
    /// Current cart.
    async fn get(&self) -> Result<CartView, CartError>;

    /// Add `quantity` of a product, summing with an existing line.
    async fn add(&self, snapshot: ItemSnapshot, quantity: u32) -> Result<CartView, CartError>;

    /// Set the absolute quantity of a line. Zero removes it.
    async fn update(&self, product: Uuid, quantity: u32) -> Result<CartView, CartError>;

    /// Remove a line.
    async fn remove(&self, product: Uuid) -> Result<CartView, CartError>;

    /// Remove every line.
    async fn clear(&self) -> Result<CartView, CartError>;

    /// Raise the quantity of a line already in the cart by one.
    async fn increment(&self, product: Uuid) -> Result<CartView, CartError> {
        let current = self.get().await?.quantity_of(product);

        if current == 0 {
            return Err(CartError::new(ErrorCode::NotFound, "Item not found in cart"));
        }

        self.update(product, current.saturating_add(1)).await
    }

    /// Lower the quantity of a line by one, removing it at zero.
    async fn decrement(&self, product: Uuid) -> Result<CartView, CartError> {
        let cart = self.get().await?;
        let current = cart.quantity_of(product);

        if current == 0 {
            return Ok(cart);
        }

        self.update(product, current - 1).await
    }
}

/// A backend owned by a signed-in account, able to absorb a guest cart.
#[async_trait]
pub trait AccountBackend: CartBackend {
    /// Fold guest lines into the account's cart in a single request.
    async fn merge_guest(&self, items: &[LineItem]) -> Result<CartView, CartError>;
}
