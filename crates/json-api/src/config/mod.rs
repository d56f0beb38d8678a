//! Server configuration module

use clap::Parser;

use crate::config::{
    carts::CartSettings, db::DatabaseConfig, observability::LoggingConfig,
    rate_limit::RateLimitConfig, server::ServerRuntimeConfig,
};

pub(crate) mod carts;
pub(crate) mod db;
pub(crate) mod observability;
pub(crate) mod rate_limit;
pub(crate) mod server;

/// Pantry JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "pantry-json", about = "Pantry JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Cart pricing and lifetime settings.
    #[command(flatten)]
    pub carts: CartSettings,

    /// Per-operation request budgets.
    #[command(flatten)]
    pub rate_limit: RateLimitConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults_only_need_a_database_url() -> TestResult {
        let config =
            ServerConfig::try_parse_from(["pantry-json", "--database-url", "postgres://localhost"])?;

        assert_eq!(config.socket_addr(), "0.0.0.0:8698");
        assert_eq!(config.carts.delivery_fee, 0);
        assert_eq!(config.carts.cart_ttl_days, 30);
        assert_eq!(config.rate_limit.rate_limit_window_secs, 60);
        assert_eq!(config.rate_limit.rate_limit_merge, 10);

        Ok(())
    }

    #[test]
    fn flags_override_defaults() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "pantry-json",
            "--database-url",
            "postgres://localhost",
            "--port",
            "9000",
            "--delivery-fee",
            "399",
            "--rate-limit-add",
            "5",
        ])?;

        assert_eq!(config.socket_addr(), "0.0.0.0:9000");
        assert_eq!(config.carts.delivery_fee, 3_99);
        assert_eq!(config.rate_limit.rate_limit_add, 5);

        Ok(())
    }
}
