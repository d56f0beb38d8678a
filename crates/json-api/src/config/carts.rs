//! Cart Config

use clap::Args;
use jiff::SignedDuration;
use pantry::receipt::CurrencyCode;
use pantry_app::domain::carts::{CartsConfig, DEFAULT_CART_TTL_DAYS};

/// Settings applied to every account cart.
#[derive(Debug, Args)]
pub struct CartSettings {
    /// Flat delivery fee in minor units
    #[arg(long, env = "DELIVERY_FEE", default_value_t = 0)]
    pub delivery_fee: u64,

    /// Currency prices are held in
    #[arg(long, env = "CURRENCY", default_value = "GBP")]
    pub currency: CurrencyCode,

    /// Days an untouched cart stays active
    #[arg(
        long,
        env = "CART_TTL_DAYS",
        default_value_t = DEFAULT_CART_TTL_DAYS,
        value_parser = clap::value_parser!(i64).range(1..=365)
    )]
    pub cart_ttl_days: i64,
}

impl CartSettings {
    /// Service configuration derived from these settings.
    #[must_use]
    pub fn carts_config(&self) -> CartsConfig {
        CartsConfig {
            delivery_fee: self.delivery_fee,
            ttl: SignedDuration::from_hours(self.cart_ttl_days * 24),
        }
    }
}
