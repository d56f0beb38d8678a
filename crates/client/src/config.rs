//! Client Config

use std::{path::PathBuf, time::Duration};

use clap::Args;
use pantry::{guest::FileStorage, receipt::CurrencyCode};

use crate::backend::RemoteConfig;

/// Settings for the terminal client.
#[derive(Debug, Clone, Args)]
pub struct ClientConfig {
    /// Base URL of the Pantry JSON API
    #[arg(long, env = "PANTRY_API_URL", default_value = "http://localhost:8698")]
    pub api_url: String,

    /// Session token; overrides the one saved by `login`
    #[arg(long, env = "PANTRY_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Directory holding the guest cart and saved session
    #[arg(long, env = "PANTRY_STORAGE_DIR", default_value = ".pantry")]
    pub storage_dir: PathBuf,

    /// Seconds to wait for each API request
    #[arg(
        long,
        env = "PANTRY_TIMEOUT_SECS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..=300)
    )]
    pub timeout_secs: u64,

    /// Flat delivery fee charged on the guest cart, in minor units
    #[arg(long, env = "DELIVERY_FEE", default_value_t = 0)]
    pub delivery_fee: u64,

    /// Currency amounts are shown in
    #[arg(long, env = "CURRENCY", default_value = "GBP")]
    pub currency: CurrencyCode,

    /// Log filter directive
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,
}

impl ClientConfig {
    /// API location and timeout.
    #[must_use]
    pub fn remote(&self) -> RemoteConfig {
        RemoteConfig {
            base_url: self.api_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    /// Local storage for the guest cart and session token.
    #[must_use]
    pub fn storage(&self) -> FileStorage {
        FileStorage::new(&self.storage_dir)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Parser)]
    struct Wrapper {
        #[command(flatten)]
        config: ClientConfig,
    }

    #[test]
    fn defaults_point_at_a_local_server() -> TestResult {
        let Wrapper { config } = Wrapper::try_parse_from(["pantry-cart"])?;

        assert_eq!(
            config.remote(),
            RemoteConfig {
                base_url: "http://localhost:8698".to_string(),
                timeout: Duration::from_secs(10),
            }
        );
        assert_eq!(config.storage().dir(), PathBuf::from(".pantry"));
        assert_eq!(config.currency, CurrencyCode::Gbp);

        Ok(())
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let parsed = Wrapper::try_parse_from(["pantry-cart", "--timeout-secs", "0"]);

        assert!(parsed.is_err(), "a zero timeout should not parse");
    }
}
