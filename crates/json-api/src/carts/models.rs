//! Cart request and response bodies.

use pantry::{
    discounts::{Discount, DiscountKind},
    items::MAX_QUANTITY,
    receipt::CurrencyCode,
};
use pantry_app::domain::{
    carts::{
        data::GuestCartItem,
        models::{Cart, CartLine},
    },
    products::records::ProductUuid,
};
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ApiError;

/// Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartItemRequest {
    /// The product to add or update
    pub product_id: Uuid,

    /// Quantity to add, or the absolute quantity when updating
    pub quantity: i64,
}

impl CartItemRequest {
    /// Quantity within `minimum..=MAX_QUANTITY`.
    pub(crate) fn checked_quantity(&self, minimum: u32) -> Result<u32, ApiError> {
        u32::try_from(self.quantity)
            .ok()
            .filter(|quantity| (minimum..=MAX_QUANTITY).contains(quantity))
            .ok_or_else(|| {
                ApiError::validation(format!(
                    "quantity must be an integer between {minimum} and {MAX_QUANTITY}"
                ))
            })
    }
}

/// Merge Guest Cart Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MergeGuestCartRequest {
    /// Lines held in the guest cart
    pub guest_cart_items: Vec<GuestCartItemRequest>,
}

/// A line from a guest cart, with the snapshot taken when it was added.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GuestCartItemRequest {
    /// The product this line refers to
    pub product: Uuid,

    /// Quantity held by the guest
    pub quantity: i64,

    /// Unit price snapshot in minor units
    pub price: u64,

    /// Pre-discount unit price snapshot in minor units
    #[serde(default)]
    pub original_price: Option<u64>,

    /// Unit label
    pub unit: String,

    /// Display name
    pub name: String,

    /// Image reference
    pub image: String,
}

impl TryFrom<GuestCartItemRequest> for GuestCartItem {
    type Error = ApiError;

    fn try_from(request: GuestCartItemRequest) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(request.quantity)
            .ok()
            .filter(|quantity| (1..=MAX_QUANTITY).contains(quantity))
            .ok_or_else(|| {
                ApiError::validation(format!(
                    "guest cart quantity for {} must be between 1 and {MAX_QUANTITY}",
                    request.product
                ))
            })?;

        Ok(GuestCartItem {
            product_uuid: ProductUuid::from_uuid(request.product),
            quantity,
            price: request.price,
            original_price: request.original_price,
            unit: request.unit,
            name: request.name,
            image: request.image,
        })
    }
}

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartResponse {
    /// The unique identifier of the cart
    pub id: Uuid,

    /// Lines in insertion order
    pub items: Vec<CartItemResponse>,

    /// Sum of line quantities
    pub total_items: u64,

    /// Sum of line totals in minor units
    pub total_amount: u64,

    /// Flat delivery fee in minor units
    pub delivery_fee: u64,

    /// Discount applied to the cart
    pub discount: Option<DiscountResponse>,

    /// Amount the discount takes off, in minor units
    pub discount_amount: u64,

    /// Amount payable in minor units
    pub subtotal: u64,

    /// ISO currency code of every amount
    pub currency: String,

    pub is_active: bool,

    /// When the cart lapses unless written to again
    pub expires_at: String,

    /// Write counter, incremented on every change
    pub version: i64,

    pub updated_at: String,
}

impl CartResponse {
    pub(crate) fn new(cart: Cart, currency: CurrencyCode) -> Self {
        Self {
            id: cart.uuid.into_uuid(),
            items: cart.lines.into_iter().map(CartItemResponse::from).collect(),
            total_items: cart.totals.total_items,
            total_amount: cart.totals.total_amount,
            delivery_fee: cart.totals.delivery_fee,
            discount: cart.discount.map(DiscountResponse::from),
            discount_amount: cart.totals.discount_amount,
            subtotal: cart.totals.subtotal,
            currency: currency.to_string(),
            is_active: cart.is_active,
            expires_at: cart.expires_at.to_string(),
            version: cart.version,
            updated_at: cart.updated_at.to_string(),
        }
    }
}

/// Cart Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartItemResponse {
    /// Live catalog details for the product
    pub product: CartProductResponse,

    pub quantity: u32,

    /// Unit price snapshot taken when the item was added
    pub price: u64,

    pub original_price: Option<u64>,

    pub unit: String,

    pub name: String,

    pub image: String,

    pub added_at: String,
}

impl From<CartLine> for CartItemResponse {
    fn from(line: CartLine) -> Self {
        let CartLine { item, product } = line;

        Self {
            product: CartProductResponse {
                id: product.uuid.into_uuid(),
                stock_label: product.stock_label(),
                name: product.name,
                price: product.price,
                original_price: product.original_price,
                unit: product.unit,
                image: product.image,
                stock: product.stock,
                is_active: product.is_active,
            },
            quantity: item.quantity,
            price: item.price,
            original_price: item.original_price,
            unit: item.unit,
            name: item.name,
            image: item.image,
            added_at: item.added_at.to_string(),
        }
    }
}

/// Product details joined onto a cart line.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartProductResponse {
    pub id: Uuid,
    pub name: String,
    pub price: u64,
    pub original_price: Option<u64>,
    pub unit: String,
    pub image: String,
    pub stock: u32,
    pub stock_label: String,
    pub is_active: bool,
}

/// Discount Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DiscountResponse {
    /// `percentage` or `fixed`
    #[serde(rename = "type")]
    pub kind: String,

    /// Percent points, or minor units for fixed discounts
    pub value: String,

    /// Promotion code
    pub code: Option<String>,
}

impl From<Discount> for DiscountResponse {
    fn from(discount: Discount) -> Self {
        let (kind, value) = match discount.kind {
            DiscountKind::Percentage { value } => ("percentage", value.to_string()),
            DiscountKind::Fixed { value } => ("fixed", value.to_string()),
        };

        Self {
            kind: kind.to_string(),
            value,
            code: discount.code,
        }
    }
}
