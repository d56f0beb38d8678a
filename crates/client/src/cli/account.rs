use std::sync::Arc;

use clap::Args;
use pantry::guest::CartStorage;
use pantry_client::{
    backend::{RemoteBackend, RemoteConfig},
    error::ErrorCode,
    session::CartSession,
};
use tracing::info;

use crate::cli::Output;

/// Storage key holding the signed-in account's session token.
pub(crate) const SESSION_TOKEN_KEY: &str = "pantry.session_token";

#[derive(Debug, Args)]
pub(crate) struct LoginArgs {
    /// Session token issued by `pantry-app session create`
    token: String,
}

pub(crate) fn stored_token(storage: &dyn CartStorage) -> Result<Option<String>, String> {
    let token = storage
        .get(SESSION_TOKEN_KEY)
        .map_err(|error| format!("failed to read saved session: {error}"))?;

    Ok(token
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty()))
}

/// Sign in, merge the guest cart and show the account's cart. A token the API rejects
/// is not saved.
pub(crate) async fn login(
    session: &mut CartSession,
    storage: &dyn CartStorage,
    remote: &RemoteConfig,
    args: LoginArgs,
    output: Output,
) -> Result<(), String> {
    let LoginArgs { token } = args;

    let account = RemoteBackend::new(remote, token.clone()).map_err(|error| error.to_string())?;

    let result = match session.sign_in(Arc::new(account)).await {
        Ok(Some(merged)) => Ok(merged),
        Ok(None) => session.refresh().await,
        Err(error) => Err(error),
    };

    let rejected = matches!(&result, Err(error) if error.code == ErrorCode::Unauthorized);

    if !rejected {
        storage
            .set(SESSION_TOKEN_KEY, &token)
            .map_err(|error| format!("failed to save session: {error}"))?;

        info!("session saved");
    }

    output.cart(result)
}

pub(crate) async fn logout(
    session: &mut CartSession,
    storage: &dyn CartStorage,
    output: Output,
) -> Result<(), String> {
    storage
        .remove(SESSION_TOKEN_KEY)
        .map_err(|error| format!("failed to forget session: {error}"))?;

    output.cart(session.sign_out().await)
}

#[cfg(test)]
mod tests {
    use pantry::guest::MemoryStorage;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn blank_tokens_are_ignored() -> TestResult {
        let storage = MemoryStorage::new();

        assert_eq!(stored_token(&storage)?, None);

        storage.set(SESSION_TOKEN_KEY, "  \n")?;
        assert_eq!(stored_token(&storage)?, None);

        storage.set(SESSION_TOKEN_KEY, "tok-123\n")?;
        assert_eq!(stored_token(&storage)?, Some("tok-123".to_string()));

        Ok(())
    }
}
