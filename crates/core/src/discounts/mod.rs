//! Discounts

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when constructing a discount.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscountError {
    /// Percentage outside of `0..=100`.
    #[error("percentage discount must be between 0 and 100, got {0}")]
    PercentOutOfRange(Decimal),
}

/// How a discount reduces the cart subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DiscountKind {
    /// Percent points taken off the item total, e.g. `10` for 10%.
    Percentage {
        /// Percent points.
        value: Decimal,
    },

    /// Fixed amount in minor units.
    Fixed {
        /// Amount in minor units.
        value: u64,
    },
}

/// A discount applied to a cart, optionally tied to a promotion code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discount {
    /// Percentage or fixed reduction.
    #[serde(flatten)]
    pub kind: DiscountKind,

    /// Promotion code the customer entered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Discount {
    /// Percentage discount.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::PercentOutOfRange`] unless `0 <= value <= 100`.
    pub fn percentage(value: Decimal, code: Option<String>) -> Result<Self, DiscountError> {
        if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
            return Err(DiscountError::PercentOutOfRange(value));
        }

        Ok(Self {
            kind: DiscountKind::Percentage { value },
            code,
        })
    }

    /// Fixed amount discount.
    pub fn fixed(value: u64, code: Option<String>) -> Self {
        Self {
            kind: DiscountKind::Fixed { value },
            code,
        }
    }

    /// Amount in minor units this discount takes off a cart whose items total `total_amount`.
    ///
    /// Percentages round half away from zero. Out-of-range stored percentages are clamped.
    pub fn amount_off(&self, total_amount: u64) -> u64 {
        match &self.kind {
            DiscountKind::Fixed { value } => *value,
            DiscountKind::Percentage { value } => {
                let percent = (*value).clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);

                let applied = Decimal::from(total_amount) * percent / Decimal::ONE_HUNDRED;

                applied
                    .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                    .to_u64()
                    .map_or(0, |amount| amount.min(total_amount))
            }
        }
    }
}
