//! Carts service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use mockall::automock;
use pantry::items::{LineItem, MAX_QUANTITY, combine_quantities, position_of, validate_quantity};
use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use crate::{
    database::Db,
    domain::{
        accounts::records::AccountUuid,
        carts::{
            data::{GuestCartItem, NewCart},
            errors::CartsServiceError,
            models::Cart,
            records::{CartRecord, CartUuid},
            repository::{CartsRepository, PgCartsRepository},
        },
        products::{
            records::{ProductRecord, ProductUuid},
            repository::{PgProductsRepository, ProductsRepository},
        },
    },
};

/// Days an untouched cart stays active.
pub const DEFAULT_CART_TTL_DAYS: i64 = 30;

/// Settings applied to every account cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartsConfig {
    /// Flat delivery fee in minor units.
    pub delivery_fee: u64,

    /// How long a cart lives after its last write.
    pub ttl: SignedDuration,
}

impl Default for CartsConfig {
    fn default() -> Self {
        Self {
            delivery_fee: 0,
            ttl: SignedDuration::from_hours(DEFAULT_CART_TTL_DAYS * 24),
        }
    }
}

#[derive(Clone)]
pub struct PgCartsService {
    carts: Arc<dyn CartsRepository>,
    products: Arc<dyn ProductsRepository>,
    config: CartsConfig,
}

/// Cart record plus the products its lines refer to.
struct LoadedCart {
    record: CartRecord,
    products: FxHashMap<ProductUuid, ProductRecord>,
}

impl LoadedCart {
    fn into_cart(self) -> Cart {
        Cart::assemble(self.record, &self.products)
    }
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: &Db, config: CartsConfig) -> Self {
        Self::with_repositories(
            Arc::new(PgCartsRepository::new(db.pool())),
            Arc::new(PgProductsRepository::new(db.pool())),
            config,
        )
    }

    #[must_use]
    pub fn with_repositories(
        carts: Arc<dyn CartsRepository>,
        products: Arc<dyn ProductsRepository>,
        config: CartsConfig,
    ) -> Self {
        Self {
            carts,
            products,
            config,
        }
    }

    fn expires_at(&self, now: Timestamp) -> Result<Timestamp, CartsServiceError> {
        now.checked_add(self.config.ttl)
            .map_err(CartsServiceError::InvalidExpiry)
    }

    async fn create(&self, account: AccountUuid) -> Result<CartRecord, CartsServiceError> {
        let record = self
            .carts
            .create_cart(&NewCart {
                uuid: CartUuid::new(),
                account_uuid: account,
                delivery_fee: self.config.delivery_fee,
                expires_at: self.expires_at(Timestamp::now())?,
            })
            .await?;

        debug!(%account, cart = %record.uuid, "opened cart");

        Ok(record)
    }

    /// Load the account's cart, creating one when needed, and drop lines whose product
    /// is missing or inactive. A pruned cart is written back straight away.
    async fn load(&self, account: AccountUuid) -> Result<LoadedCart, CartsServiceError> {
        let mut record = match self.carts.find_active_cart(account).await? {
            Some(record) if record.is_expired(Timestamp::now()) => {
                info!(%account, cart = %record.uuid, "cart expired, starting a new one");

                self.carts.deactivate_cart(record.uuid).await?;
                self.create(account).await?
            }
            Some(record) => record,
            None => self.create(account).await?,
        };

        record.delivery_fee = self.config.delivery_fee;

        let uuids: Vec<ProductUuid> = record
            .items
            .iter()
            .map(|item| ProductUuid::from_uuid(item.product_uuid))
            .collect();

        let products = self.find_products(&uuids).await?;
        let before = record.items.len();

        record.items.retain(|item| {
            products
                .get(&ProductUuid::from_uuid(item.product_uuid))
                .is_some_and(|product| product.is_active)
        });

        if record.items.len() != before {
            info!(
                %account,
                removed = before - record.items.len(),
                "removed unavailable products from cart"
            );

            record = self.save(record).await?;
        }

        Ok(LoadedCart { record, products })
    }

    async fn find_products(
        &self,
        uuids: &[ProductUuid],
    ) -> Result<FxHashMap<ProductUuid, ProductRecord>, CartsServiceError> {
        if uuids.is_empty() {
            return Ok(FxHashMap::default());
        }

        Ok(self
            .products
            .find_products(uuids)
            .await?
            .into_iter()
            .map(|product| (product.uuid, product))
            .collect())
    }

    async fn save(&self, mut record: CartRecord) -> Result<CartRecord, CartsServiceError> {
        record.expires_at = self.expires_at(Timestamp::now())?;

        let cart = record.uuid;
        let version = record.version;

        self.carts.save_cart(&record).await?.ok_or_else(|| {
            warn!(%cart, version, "cart write lost to a concurrent update");
            CartsServiceError::Conflict
        })
    }

    async fn persist(&self, loaded: LoadedCart) -> Result<Cart, CartsServiceError> {
        let record = self.save(loaded.record).await?;

        Ok(Cart::assemble(record, &loaded.products))
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_cart(&self, account: AccountUuid) -> Result<Cart, CartsServiceError> {
        Ok(self.load(account).await?.into_cart())
    }

    async fn add_item(
        &self,
        account: AccountUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError> {
        let quantity = validate_quantity(u64::from(quantity))?;
        let mut loaded = self.load(account).await?;

        let product = match loaded.products.get(&product) {
            Some(known) => known.clone(),
            None => self
                .products
                .find_product(product)
                .await?
                .ok_or(CartsServiceError::ProductNotFound)?,
        };

        if !product.is_active {
            return Err(CartsServiceError::ProductNotFound);
        }

        let uuid = product.uuid.into_uuid();
        let items = &mut loaded.record.items;

        let combined = match items.iter().find(|item| item.product_uuid == uuid) {
            Some(item) => combine_quantities(item.quantity, quantity)?,
            None => quantity,
        };

        if combined > product.stock {
            return Err(CartsServiceError::InsufficientStock {
                available: product.stock,
            });
        }

        match items.iter_mut().find(|item| item.product_uuid == uuid) {
            Some(item) => item.quantity = combined,
            None => items.push(product.snapshot().into_line_item(quantity, Timestamp::now())),
        }

        loaded.products.insert(product.uuid, product);

        self.persist(loaded).await
    }

    async fn update_item(
        &self,
        account: AccountUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError> {
        if quantity == 0 {
            return self.remove_item(account, product).await;
        }

        let quantity = validate_quantity(u64::from(quantity))?;
        let mut loaded = self.load(account).await?;

        let item = loaded
            .record
            .items
            .iter_mut()
            .find(|item| item.product_uuid == product.into_uuid())
            .ok_or(CartsServiceError::ItemNotFound)?;

        let stock = loaded
            .products
            .get(&product)
            .map(|record| record.stock)
            .ok_or(CartsServiceError::ItemNotFound)?;

        if quantity > stock {
            return Err(CartsServiceError::InsufficientStock { available: stock });
        }

        item.quantity = quantity;

        self.persist(loaded).await
    }

    async fn remove_item(
        &self,
        account: AccountUuid,
        product: ProductUuid,
    ) -> Result<Cart, CartsServiceError> {
        let mut loaded = self.load(account).await?;

        let index = position_of(&loaded.record.items, product.into_uuid())
            .ok_or(CartsServiceError::ItemNotFound)?;

        loaded.record.items.remove(index);

        self.persist(loaded).await
    }

    async fn clear_cart(&self, account: AccountUuid) -> Result<Cart, CartsServiceError> {
        let mut loaded = self.load(account).await?;

        loaded.record.items.clear();

        self.persist(loaded).await
    }

    async fn merge_guest_items(
        &self,
        account: AccountUuid,
        guest_items: Vec<GuestCartItem>,
    ) -> Result<Cart, CartsServiceError> {
        if guest_items.is_empty() {
            return self.get_cart(account).await;
        }

        let mut loaded = self.load(account).await?;

        let unknown: Vec<ProductUuid> = guest_items
            .iter()
            .map(|item| item.product_uuid)
            .filter(|uuid| !loaded.products.contains_key(uuid))
            .collect();

        let fetched = self.find_products(&unknown).await?;
        loaded.products.extend(fetched);

        let now = Timestamp::now();
        let mut merged = 0_usize;

        for guest in guest_items {
            if guest.quantity == 0 {
                continue;
            }

            if !loaded
                .products
                .get(&guest.product_uuid)
                .is_some_and(|product| product.is_active)
            {
                warn!(
                    %account,
                    product = %guest.product_uuid,
                    "skipping unavailable product in guest cart"
                );
                continue;
            }

            let uuid = guest.product_uuid.into_uuid();
            let items = &mut loaded.record.items;

            match items.iter_mut().find(|item| item.product_uuid == uuid) {
                Some(existing) => {
                    existing.quantity = existing
                        .quantity
                        .saturating_add(guest.quantity)
                        .min(MAX_QUANTITY);
                }
                None => items.push(LineItem {
                    product_uuid: uuid,
                    name: guest.name,
                    price: guest.price,
                    original_price: guest.original_price,
                    unit: guest.unit,
                    image: guest.image,
                    quantity: guest.quantity.min(MAX_QUANTITY),
                    added_at: now,
                }),
            }

            merged += 1;
        }

        if merged == 0 {
            return Ok(loaded.into_cart());
        }

        info!(%account, merged, "merged guest cart");

        self.persist(loaded).await
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// The account's cart, created empty when it has none.
    async fn get_cart(&self, account: AccountUuid) -> Result<Cart, CartsServiceError>;

    /// Add `quantity` of a product, combining with an existing line.
    async fn add_item(
        &self,
        account: AccountUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError>;

    /// Set the quantity of a line. Zero removes it.
    async fn update_item(
        &self,
        account: AccountUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError>;

    /// Remove a line.
    async fn remove_item(
        &self,
        account: AccountUuid,
        product: ProductUuid,
    ) -> Result<Cart, CartsServiceError>;

    /// Remove every line.
    async fn clear_cart(&self, account: AccountUuid) -> Result<Cart, CartsServiceError>;

    /// Fold a guest cart into the account cart.
    async fn merge_guest_items(
        &self,
        account: AccountUuid,
        guest_items: Vec<GuestCartItem>,
    ) -> Result<Cart, CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use rustc_hash::FxHashMap;
    use testresult::TestResult;

    use crate::{
        domain::carts::repository::MockCartsRepository,
        test::{
            fakes::{MemoryCartsRepository, MemoryProductsRepository},
            fixtures::{guest_item, product},
        },
    };

    use super::*;

    const DELIVERY_FEE: u64 = 2_50;

    struct Harness {
        carts: Arc<MemoryCartsRepository>,
        products: Arc<MemoryProductsRepository>,
        service: PgCartsService,
    }

    fn harness(catalog: &[ProductRecord]) -> Harness {
        let carts = Arc::new(MemoryCartsRepository::default());
        let products = Arc::new(MemoryProductsRepository::with_products(
            catalog.iter().cloned(),
        ));

        let service = PgCartsService::with_repositories(
            carts.clone(),
            products.clone(),
            CartsConfig {
                delivery_fee: DELIVERY_FEE,
                ..CartsConfig::default()
            },
        );

        Harness {
            carts,
            products,
            service,
        }
    }

    #[tokio::test]
    async fn get_cart_creates_an_empty_cart() -> TestResult {
        let h = harness(&[]);
        let account = AccountUuid::new();

        let cart = h.service.get_cart(account).await?;

        assert!(cart.lines.is_empty());
        assert!(cart.is_active);
        assert_eq!(cart.totals.total_items, 0);
        assert_eq!(cart.totals.subtotal, DELIVERY_FEE);
        let nearly_a_month = Timestamp::now().checked_add(SignedDuration::from_hours(29 * 24))?;

        assert!(cart.expires_at > nearly_a_month);

        let again = h.service.get_cart(account).await?;

        assert_eq!(again.uuid, cart.uuid, "one cart per account");

        Ok(())
    }

    #[tokio::test]
    async fn totals_follow_a_sequence_of_adds() -> TestResult {
        let apples = product("Apples", 30, 100);
        let bread = product("Bread", 1_20, 100);
        let cheese = product("Cheese", 3_75, 100);
        let h = harness(&[apples.clone(), bread.clone(), cheese.clone()]);
        let account = AccountUuid::new();

        let mut expected: FxHashMap<ProductUuid, u32> = FxHashMap::default();
        let mut cart = h.service.get_cart(account).await?;

        for (record, quantity) in [
            (&apples, 3),
            (&bread, 1),
            (&apples, 2),
            (&cheese, 4),
            (&bread, 6),
        ] {
            cart = h.service.add_item(account, record.uuid, quantity).await?;
            *expected.entry(record.uuid).or_default() += quantity;
        }

        let total: u32 = expected.values().sum();

        assert_eq!(cart.totals.total_items, u64::from(total));
        assert_eq!(cart.totals.total_amount, 5 * 30 + 7 * 1_20 + 4 * 3_75);
        assert_eq!(
            cart.totals.subtotal,
            cart.totals.total_amount + DELIVERY_FEE
        );

        for (uuid, quantity) in expected {
            assert_eq!(cart.quantity_of(uuid), quantity);
        }

        let order: Vec<ProductUuid> = cart.lines.iter().map(|line| line.product.uuid).collect();

        assert_eq!(order, vec![apples.uuid, bread.uuid, cheese.uuid]);

        Ok(())
    }

    #[tokio::test]
    async fn add_item_snapshots_the_catalog_entry() -> TestResult {
        let mut milk = product("Milk", 95, 10);
        milk.original_price = Some(1_10);

        let h = harness(&[milk.clone()]);

        let cart = h.service.add_item(AccountUuid::new(), milk.uuid, 2).await?;
        let line = cart.lines.first().ok_or("missing line")?;

        assert_eq!(line.item.name, "Milk");
        assert_eq!(line.item.price, 95);
        assert_eq!(line.item.original_price, Some(1_10));
        assert_eq!(line.product.stock_label(), "In stock");

        Ok(())
    }

    #[tokio::test]
    async fn add_item_allows_exactly_the_available_stock() -> TestResult {
        let eggs = product("Eggs", 2_10, 6);
        let h = harness(&[eggs.clone()]);
        let account = AccountUuid::new();

        let cart = h.service.add_item(account, eggs.uuid, 6).await?;

        assert_eq!(cart.quantity_of(eggs.uuid), 6);

        let result = h.service.add_item(account, eggs.uuid, 1).await;

        assert!(
            matches!(
                result,
                Err(CartsServiceError::InsufficientStock { available: 6 })
            ),
            "expected InsufficientStock, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn add_item_rejects_stock_plus_one() -> TestResult {
        let eggs = product("Eggs", 2_10, 6);
        let h = harness(&[eggs.clone()]);

        let result = h.service.add_item(AccountUuid::new(), eggs.uuid, 7).await;

        assert!(matches!(
            result,
            Err(CartsServiceError::InsufficientStock { available: 6 })
        ));

        Ok(())
    }

    #[tokio::test]
    async fn add_item_requires_an_active_product() -> TestResult {
        let retired = product("Retired", 1_00, 5);
        let h = harness(&[retired.clone()]);

        h.products.set_active(retired.uuid, false);

        let inactive = h.service.add_item(AccountUuid::new(), retired.uuid, 1).await;
        let missing = h
            .service
            .add_item(AccountUuid::new(), ProductUuid::new(), 1)
            .await;

        assert!(matches!(inactive, Err(CartsServiceError::ProductNotFound)));
        assert!(matches!(missing, Err(CartsServiceError::ProductNotFound)));

        Ok(())
    }

    #[tokio::test]
    async fn add_item_rejects_out_of_range_quantities() -> TestResult {
        let rice = product("Rice", 1_80, 5_000);
        let h = harness(&[rice.clone()]);

        let zero = h.service.add_item(AccountUuid::new(), rice.uuid, 0).await;
        let huge = h
            .service
            .add_item(AccountUuid::new(), rice.uuid, MAX_QUANTITY + 1)
            .await;

        assert!(matches!(zero, Err(CartsServiceError::InvalidQuantity(_))));
        assert!(matches!(huge, Err(CartsServiceError::InvalidQuantity(_))));

        Ok(())
    }

    #[tokio::test]
    async fn update_item_is_idempotent() -> TestResult {
        let pasta = product("Pasta", 89, 50);
        let h = harness(&[pasta.clone()]);
        let account = AccountUuid::new();

        h.service.add_item(account, pasta.uuid, 1).await?;

        let once = h.service.update_item(account, pasta.uuid, 4).await?;
        let twice = h.service.update_item(account, pasta.uuid, 4).await?;

        assert_eq!(once.quantity_of(pasta.uuid), 4);
        assert_eq!(twice.quantity_of(pasta.uuid), 4);
        assert_eq!(once.totals, twice.totals);

        Ok(())
    }

    #[tokio::test]
    async fn update_item_to_zero_removes_the_line() -> TestResult {
        let pasta = product("Pasta", 89, 50);
        let h = harness(&[pasta.clone()]);
        let account = AccountUuid::new();

        h.service.add_item(account, pasta.uuid, 3).await?;

        let cart = h.service.update_item(account, pasta.uuid, 0).await?;

        assert!(cart.lines.is_empty());
        assert_eq!(cart.totals.subtotal, DELIVERY_FEE);

        Ok(())
    }

    #[tokio::test]
    async fn update_item_checks_presence_and_stock() -> TestResult {
        let pasta = product("Pasta", 89, 5);
        let h = harness(&[pasta.clone()]);
        let account = AccountUuid::new();

        let absent = h.service.update_item(account, pasta.uuid, 2).await;

        assert!(matches!(absent, Err(CartsServiceError::ItemNotFound)));

        h.service.add_item(account, pasta.uuid, 1).await?;

        let over = h.service.update_item(account, pasta.uuid, 6).await;

        assert!(matches!(
            over,
            Err(CartsServiceError::InsufficientStock { available: 5 })
        ));
        assert_eq!(h.service.get_cart(account).await?.quantity_of(pasta.uuid), 1);

        Ok(())
    }

    #[tokio::test]
    async fn remove_item_requires_the_line() -> TestResult {
        let h = harness(&[]);

        let result = h
            .service
            .remove_item(AccountUuid::new(), ProductUuid::new())
            .await;

        assert!(matches!(result, Err(CartsServiceError::ItemNotFound)));

        Ok(())
    }

    #[tokio::test]
    async fn clear_cart_keeps_the_delivery_fee() -> TestResult {
        let tea = product("Tea", 2_40, 20);
        let coffee = product("Coffee", 4_50, 20);
        let h = harness(&[tea.clone(), coffee.clone()]);
        let account = AccountUuid::new();

        h.service.add_item(account, tea.uuid, 2).await?;
        h.service.add_item(account, coffee.uuid, 1).await?;

        let cart = h.service.clear_cart(account).await?;

        assert!(cart.lines.is_empty());
        assert_eq!(cart.totals.total_amount, 0);
        assert_eq!(cart.totals.subtotal, DELIVERY_FEE);

        Ok(())
    }

    #[tokio::test]
    async fn get_cart_drops_and_persists_unavailable_products() -> TestResult {
        let kept = product("Kept", 1_00, 10);
        let retired = product("Retired", 2_00, 10);
        let deleted = product("Deleted", 3_00, 10);
        let h = harness(&[kept.clone(), retired.clone(), deleted.clone()]);
        let account = AccountUuid::new();

        for record in [&kept, &retired, &deleted] {
            h.service.add_item(account, record.uuid, 1).await?;
        }

        h.products.set_active(retired.uuid, false);
        h.products.remove(deleted.uuid);

        let writes = h.carts.writes();
        let cart = h.service.get_cart(account).await?;

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.quantity_of(kept.uuid), 1);
        assert_eq!(cart.totals.total_amount, 1_00);
        assert_eq!(h.carts.writes(), writes + 1, "pruning is persisted");

        let stored = h.carts.active_cart(account).ok_or("missing cart")?;

        assert_eq!(stored.items.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn merge_sums_existing_lines_and_appends_new_ones() -> TestResult {
        let a = product("A", 1_00, 3);
        let b = product("B", 2_00, 10);
        let h = harness(&[a.clone(), b.clone()]);
        let account = AccountUuid::new();

        h.service.add_item(account, a.uuid, 3).await?;

        // Stock is not re-validated on merge.
        let cart = h
            .service
            .merge_guest_items(account, vec![guest_item(&a, 2), guest_item(&b, 1)])
            .await?;

        assert_eq!(cart.quantity_of(a.uuid), 5);
        assert_eq!(cart.quantity_of(b.uuid), 1);
        assert_eq!(cart.totals.total_items, 6);

        Ok(())
    }

    #[tokio::test]
    async fn merge_keeps_the_guest_snapshot_for_new_lines() -> TestResult {
        let b = product("B", 2_00, 10);
        let h = harness(&[b.clone()]);

        let mut guest = guest_item(&b, 1);
        guest.price = 1_75;

        let cart = h
            .service
            .merge_guest_items(AccountUuid::new(), vec![guest])
            .await?;

        let line = cart.lines.first().ok_or("missing line")?;

        assert_eq!(line.item.price, 1_75);
        assert_eq!(line.product.price, 2_00);

        Ok(())
    }

    #[tokio::test]
    async fn merge_with_no_items_does_not_write() -> TestResult {
        let a = product("A", 1_00, 10);
        let h = harness(&[a.clone()]);
        let account = AccountUuid::new();

        let before = h.service.add_item(account, a.uuid, 3).await?;
        let writes = h.carts.writes();

        let after = h.service.merge_guest_items(account, Vec::new()).await?;

        assert_eq!(h.carts.writes(), writes);
        assert_eq!(after.version, before.version);
        assert_eq!(after.quantity_of(a.uuid), 3);

        Ok(())
    }

    #[tokio::test]
    async fn merge_caps_quantities() -> TestResult {
        let a = product("A", 1_00, 5_000);
        let h = harness(&[a.clone()]);
        let account = AccountUuid::new();

        h.service.add_item(account, a.uuid, 900).await?;

        let cart = h
            .service
            .merge_guest_items(account, vec![guest_item(&a, 400)])
            .await?;

        assert_eq!(cart.quantity_of(a.uuid), MAX_QUANTITY);

        Ok(())
    }

    #[tokio::test]
    async fn merge_skips_unknown_products() -> TestResult {
        let a = product("A", 1_00, 5);
        let ghost = product("Ghost", 9_99, 5);
        let h = harness(&[a.clone()]);

        let cart = h
            .service
            .merge_guest_items(
                AccountUuid::new(),
                vec![guest_item(&ghost, 2), guest_item(&a, 1)],
            )
            .await?;

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.quantity_of(a.uuid), 1);

        Ok(())
    }

    #[tokio::test]
    async fn expired_carts_are_replaced() -> TestResult {
        let a = product("A", 1_00, 5);
        let h = harness(&[a.clone()]);
        let account = AccountUuid::new();

        let first = h.service.add_item(account, a.uuid, 1).await?;

        let mut stale = h.carts.active_cart(account).ok_or("missing cart")?;
        stale.expires_at = Timestamp::now().checked_sub(1.second())?;
        h.carts.insert(stale);

        let second = h.service.get_cart(account).await?;

        assert_ne!(second.uuid, first.uuid);
        assert!(second.lines.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn stale_writes_surface_as_conflicts() -> TestResult {
        let a = product("A", 1_00, 5);
        let account = AccountUuid::new();
        let now = Timestamp::now();

        let record = CartRecord {
            uuid: CartUuid::new(),
            account_uuid: account,
            items: Vec::new(),
            delivery_fee: DELIVERY_FEE,
            discount: None,
            is_active: true,
            expires_at: now.checked_add(1.hour())?,
            version: 3,
            created_at: now,
            updated_at: now,
        };

        let mut carts = MockCartsRepository::new();

        carts
            .expect_find_active_cart()
            .returning(move |_| Ok(Some(record.clone())));
        carts.expect_save_cart().times(1).returning(|_| Ok(None));

        let service = PgCartsService::with_repositories(
            Arc::new(carts),
            Arc::new(MemoryProductsRepository::with_products([a.clone()])),
            CartsConfig::default(),
        );

        let result = service.add_item(account, a.uuid, 1).await;

        assert!(matches!(result, Err(CartsServiceError::Conflict)));

        Ok(())
    }
}
