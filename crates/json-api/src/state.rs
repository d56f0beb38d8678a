//! State

use std::sync::Arc;

use pantry::receipt::CurrencyCode;
use pantry_app::context::AppContext;

use crate::rate_limit::{RateLimiter, RateLimits};

pub(crate) struct State {
    pub(crate) app: AppContext,
    pub(crate) rate_limiter: RateLimiter,
    pub(crate) currency: CurrencyCode,
}

impl State {
    #[must_use]
    pub(crate) fn new(app: AppContext, limits: RateLimits, currency: CurrencyCode) -> Self {
        Self {
            app,
            rate_limiter: RateLimiter::new(limits),
            currency,
        }
    }

    #[must_use]
    pub(crate) fn from_app_context(
        app: AppContext,
        limits: RateLimits,
        currency: CurrencyCode,
    ) -> Arc<Self> {
        Arc::new(Self::new(app, limits, currency))
    }
}
