//! Rate Limit Config

use std::time::Duration;

use clap::Args;

use crate::rate_limit::RateLimits;

/// Fixed-window request budgets, counted per client address and operation.
#[derive(Debug, Args)]
pub struct RateLimitConfig {
    /// Length of a rate limit window in seconds
    #[arg(
        long,
        env = "RATE_LIMIT_WINDOW_SECS",
        default_value_t = 60,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub rate_limit_window_secs: u64,

    /// Cart reads allowed per window
    #[arg(long, env = "RATE_LIMIT_READ", default_value_t = 100)]
    pub rate_limit_read: u32,

    /// Cart additions allowed per window
    #[arg(long, env = "RATE_LIMIT_ADD", default_value_t = 30)]
    pub rate_limit_add: u32,

    /// Quantity updates allowed per window
    #[arg(long, env = "RATE_LIMIT_UPDATE", default_value_t = 60)]
    pub rate_limit_update: u32,

    /// Removals and clears allowed per window
    #[arg(long, env = "RATE_LIMIT_REMOVE", default_value_t = 30)]
    pub rate_limit_remove: u32,

    /// Guest cart merges allowed per window
    #[arg(long, env = "RATE_LIMIT_MERGE", default_value_t = 10)]
    pub rate_limit_merge: u32,
}

impl RateLimitConfig {
    #[must_use]
    pub(crate) fn limits(&self) -> RateLimits {
        RateLimits {
            window: Duration::from_secs(self.rate_limit_window_secs),
            read: self.rate_limit_read,
            add: self.rate_limit_add,
            update: self.rate_limit_update,
            remove: self.rate_limit_remove,
            merge: self.rate_limit_merge,
        }
    }
}
