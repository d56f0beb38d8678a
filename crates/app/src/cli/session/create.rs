use clap::Args;
use pantry_app::{
    auth::PgAuthService,
    database::{self, Db},
    domain::accounts::records::AccountUuid,
};
use uuid::Uuid;

use crate::cli::parse_expires_at;

#[derive(Debug, Args)]
pub(crate) struct CreateSessionArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Account that should own the session
    #[arg(long)]
    account_uuid: Uuid,

    /// Optional session expiration timestamp (RFC 3339)
    #[arg(long)]
    expires_at: Option<String>,
}

pub(crate) async fn run(args: CreateSessionArgs) -> Result<(), String> {
    let expires_at = parse_expires_at(args.expires_at.as_deref())?;

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let issued = PgAuthService::new(&Db::new(pool))
        .issue_session_token(AccountUuid::from_uuid(args.account_uuid), expires_at)
        .await
        .map_err(|error| format!("failed to issue session token: {error}"))?;

    println!("session_uuid: {}", issued.metadata.uuid);
    println!("session_token: {}", issued.token);

    if let Some(expires_at) = issued.metadata.expires_at {
        println!("expires_at: {expires_at}");
    }

    println!("store this token now; it is only shown once");

    Ok(())
}
