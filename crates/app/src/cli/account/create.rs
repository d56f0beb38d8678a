use clap::Args;
use pantry_app::{
    auth::PgAuthService,
    database::{self, Db},
    domain::accounts::{AccountsService, PgAccountsService, data::NewAccount, records::AccountUuid},
};
use uuid::Uuid;

use crate::cli::parse_expires_at;

#[derive(Debug, Args)]
pub(crate) struct CreateAccountArgs {
    /// Name shown to the shopper
    #[arg(long)]
    name: String,

    /// Contact email address
    #[arg(long)]
    email: String,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Optional account UUID; generated when omitted
    #[arg(long)]
    account_uuid: Option<Uuid>,

    /// Optional session expiration timestamp (RFC 3339)
    #[arg(long)]
    session_expires_at: Option<String>,
}

pub(crate) async fn run(args: CreateAccountArgs) -> Result<(), String> {
    let expires_at = parse_expires_at(args.session_expires_at.as_deref())?;

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let db = Db::new(pool);
    let account_uuid = args
        .account_uuid
        .map_or_else(AccountUuid::new, AccountUuid::from_uuid);

    let account = PgAccountsService::new(&db)
        .create_account(NewAccount {
            uuid: account_uuid,
            display_name: args.name,
            email: args.email,
        })
        .await
        .map_err(|error| format!("failed to create account: {error}"))?;

    let issued = PgAuthService::new(&db)
        .issue_session_token(account.uuid, expires_at)
        .await
        .map_err(|error| format!("failed to issue session token: {error}"))?;

    println!("account_uuid: {}", account.uuid);
    println!("display_name: {}", account.display_name);
    println!("session_uuid: {}", issued.metadata.uuid);
    println!("session_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}
