//! Guest Backend

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use pantry::{
    guest::{CartStorage, GuestCart, GuestCartError, GuestCartStore, MemoryStorage},
    items::ItemSnapshot,
};
use tracing::warn;
use uuid::Uuid;

use crate::{backend::CartBackend, error::CartError, view::CartView};

type Store = GuestCartStore<Arc<dyn CartStorage>>;

/// Guest cart kept in local storage.
///
/// A storage failure only affects the call that hit it. That call runs against a
/// throwaway in-memory cart, so a read sees an empty cart and a write is not persisted.
/// The next call goes back to real storage.
pub struct GuestBackend {
    store: Store,
    degraded: AtomicBool,
}

impl GuestBackend {
    /// Back the guest cart with `storage`.
    pub fn new(storage: Arc<dyn CartStorage>, delivery_fee: u64) -> Self {
        Self {
            store: GuestCartStore::new(storage, delivery_fee),
            degraded: AtomicBool::new(false),
        }
    }

    /// Whether the most recent call fell back to memory.
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }

    fn run(
        &self,
        operation: &str,
        apply: impl Fn(&Store) -> Result<GuestCart, GuestCartError>,
    ) -> Result<CartView, CartError> {
        let result = match apply(&self.store) {
            Err(GuestCartError::Storage(source)) => {
                warn!(
                    operation,
                    error = %source,
                    "guest cart storage failed, serving this call from memory"
                );

                self.degraded.store(true, Ordering::Relaxed);

                let memory: Arc<dyn CartStorage> = Arc::new(MemoryStorage::new());

                apply(&GuestCartStore::new(memory, self.store.delivery_fee()))
            }
            result => {
                self.degraded.store(false, Ordering::Relaxed);

                result
            }
        };

        result.map(CartView::from).map_err(CartError::from)
    }
}

impl fmt::Debug for GuestBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuestBackend")
            .field("delivery_fee", &self.store.delivery_fee())
            .field("degraded", &self.is_degraded())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CartBackend for GuestBackend {
    async fn get(&self) -> Result<CartView, CartError> {
        self.run("read", Store::read)
    }

    async fn add(&self, snapshot: ItemSnapshot, quantity: u32) -> Result<CartView, CartError> {
        self.run("add", |store| store.add(snapshot.clone(), quantity))
    }

    async fn update(&self, product: Uuid, quantity: u32) -> Result<CartView, CartError> {
        self.run("update", |store| store.update(product, quantity))
    }

    async fn remove(&self, product: Uuid) -> Result<CartView, CartError> {
        self.run("remove", |store| store.remove(product))
    }

    async fn clear(&self) -> Result<CartView, CartError> {
        self.run("clear", Store::clear)
    }
}
