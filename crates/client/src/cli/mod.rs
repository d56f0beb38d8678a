use std::{
    io::{self, Write},
    sync::Arc,
};

use clap::{Args, Parser, Subcommand};
use pantry::{guest::CartStorage, receipt::CurrencyCode};
use pantry_client::{
    backend::{GuestBackend, RemoteBackend},
    config::ClientConfig,
    error::{CartError, CartOutcome},
    session::CartSession,
    state::CartState,
    view::CartView,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod account;
mod cart;
mod products;

#[derive(Debug, Parser)]
#[command(name = "pantry-cart", about = "Pantry cart terminal client", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    config: ClientConfig,

    /// Print results as JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show the cart
    Show,
    /// List products on sale
    Products,
    /// Add a product to the cart
    Add(cart::AddArgs),
    /// Set the quantity of a product already in the cart
    Set(cart::SetArgs),
    /// Remove a product from the cart
    Remove(ProductArgs),
    /// Remove everything from the cart
    Clear,
    /// Add one more of a product
    Inc(ProductArgs),
    /// Take one of a product away
    Dec(ProductArgs),
    /// Sign in, moving the guest cart into the account's cart
    Login(account::LoginArgs),
    /// Sign out and go back to the guest cart
    Logout,
}

#[derive(Debug, Clone, Copy, Args)]
struct ProductArgs {
    /// Product id
    product: Uuid,
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        let Self {
            config,
            json,
            command,
        } = self;

        init_logging(&config.log_level);

        let storage: Arc<dyn CartStorage> = Arc::new(config.storage());
        let guest = Arc::new(GuestBackend::new(storage.clone(), config.delivery_fee));
        let state = Arc::new(CartState::new());
        let remote = config.remote();

        let token = match config.token.clone() {
            Some(token) => Some(token),
            None => account::stored_token(storage.as_ref())?,
        };

        let mut session = match token {
            Some(token) => {
                let account =
                    RemoteBackend::new(&remote, token).map_err(|error| error.to_string())?;

                CartSession::resume(guest, Arc::new(account), state)
            }
            None => CartSession::new(guest, state),
        };

        let output = Output {
            json,
            currency: config.currency,
        };

        match command {
            Commands::Show => output.cart(session.refresh().await),
            Commands::Products => products::list(&remote, output).await,
            Commands::Add(args) => cart::add(&session, &remote, args, output).await,
            Commands::Set(args) => cart::set(&session, args, output).await,
            Commands::Remove(args) => {
                let backend = session.backend();

                output.cart(session.state().dispatch(backend.remove(args.product)).await)
            }
            Commands::Clear => {
                let backend = session.backend();

                output.cart(session.state().dispatch(backend.clear()).await)
            }
            Commands::Inc(args) => {
                let backend = session.backend();

                output.cart(session.state().dispatch(backend.increment(args.product)).await)
            }
            Commands::Dec(args) => {
                let backend = session.backend();

                output.cart(session.state().dispatch(backend.decrement(args.product)).await)
            }
            Commands::Login(args) => {
                account::login(&mut session, storage.as_ref(), &remote, args, output).await
            }
            Commands::Logout => account::logout(&mut session, storage.as_ref(), output).await,
        }
    }
}

fn init_logging(directive: &str) {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_invalid| EnvFilter::new("warn"));

    let installed = tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    if let Err(error) = installed {
        #[expect(clippy::print_stderr, reason = "logging could not be installed")]
        {
            eprintln!("failed to initialise logging: {error}");
        }
    }
}

/// How command results reach the terminal.
#[derive(Debug, Clone, Copy)]
struct Output {
    json: bool,
    currency: CurrencyCode,
}

impl Output {
    fn cart(self, result: Result<CartView, CartError>) -> Result<(), String> {
        if self.json {
            return self.outcome(result);
        }

        let cart = result.map_err(|error| error.to_string())?;
        let mut out = io::stdout().lock();

        pantry::receipt::write_cart(&mut out, &cart.items, &cart.totals, self.currency)
            .map_err(|error| format!("failed to print cart: {error}"))?;

        if let Some(code) = &cart.discount_code {
            writeln!(out, " Code:     {code}").map_err(|error| error.to_string())?;
        }

        Ok(())
    }

    fn outcome<T: Serialize>(self, result: Result<T, CartError>) -> Result<(), String> {
        let failed = result.as_ref().err().map(ToString::to_string);
        let outcome = CartOutcome::from(result);

        let rendered = serde_json::to_string_pretty(&outcome)
            .map_err(|error| format!("failed to encode result: {error}"))?;

        writeln!(io::stdout().lock(), "{rendered}").map_err(|error| error.to_string())?;

        failed.map_or(Ok(()), Err)
    }
}
