//! Guest cart persistence through the file storage backend.

use std::fs;

use pantry::{
    guest::{FileStorage, GUEST_CART_KEY, GuestCartStore},
    items::ItemSnapshot,
};
use testresult::TestResult;
use uuid::Uuid;

fn milk(product: Uuid) -> ItemSnapshot {
    ItemSnapshot {
        product_uuid: product,
        name: "Whole milk".to_string(),
        price: 1_45,
        original_price: None,
        unit: "2 pints".to_string(),
        image: "milk.png".to_string(),
    }
}

#[test]
fn cart_survives_reopening_the_store() -> TestResult {
    let dir = tempfile::tempdir()?;
    let product = Uuid::now_v7();

    let saved = GuestCartStore::new(FileStorage::new(dir.path()), 3_50).add(milk(product), 3)?;

    let reopened = GuestCartStore::new(FileStorage::new(dir.path()), 3_50).read()?;

    assert_eq!(reopened, saved);
    assert_eq!(reopened.quantity_of(product), 3);
    assert_eq!(reopened.subtotal, 3 * 1_45 + 3_50);

    Ok(())
}

#[test]
fn stored_document_uses_the_documented_shape() -> TestResult {
    let dir = tempfile::tempdir()?;
    let store = GuestCartStore::new(FileStorage::new(dir.path()), 0);

    store.add(milk(Uuid::now_v7()), 1)?;

    let raw = fs::read_to_string(dir.path().join(format!("{GUEST_CART_KEY}.json")))?;
    let json: serde_json::Value = serde_json::from_str(&raw)?;

    for key in [
        "items",
        "totalItems",
        "totalAmount",
        "deliveryFee",
        "subtotal",
        "lastUpdated",
    ] {
        assert!(json.get(key).is_some(), "missing key {key}");
    }

    Ok(())
}

#[test]
fn delivery_fee_follows_configuration_on_read() -> TestResult {
    let dir = tempfile::tempdir()?;

    GuestCartStore::new(FileStorage::new(dir.path()), 1_00).add(milk(Uuid::now_v7()), 2)?;

    let cart = GuestCartStore::new(FileStorage::new(dir.path()), 4_00).read()?;

    assert_eq!(cart.delivery_fee, 4_00);
    assert_eq!(cart.subtotal, 2 * 1_45 + 4_00);

    Ok(())
}
