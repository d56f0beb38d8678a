use clap::{Parser, Subcommand};
use jiff::Timestamp;

mod account;
mod db;
mod product;
mod session;

#[derive(Debug, Parser)]
#[command(name = "pantry-app", about = "Pantry administration CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Account(account::AccountCommand),
    Session(session::SessionCommand),
    Product(product::ProductCommand),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Account(command) => account::run(command).await,
            Commands::Session(command) => session::run(command).await,
            Commands::Product(command) => product::run(command).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}

/// Parse an optional RFC 3339 expiry that must lie in the future.
fn parse_expires_at(value: Option<&str>) -> Result<Option<Timestamp>, String> {
    let Some(value) = value else {
        return Ok(None);
    };

    let expires_at = value
        .parse::<Timestamp>()
        .map_err(|error| format!("invalid expiry timestamp {value:?}: {error}"))?;

    if expires_at <= Timestamp::now() {
        return Err("expiry must be in the future".to_string());
    }

    Ok(Some(expires_at))
}
