//! Accounts service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::accounts::{
        data::NewAccount, errors::AccountsServiceError, records::AccountRecord,
        repository::PgAccountsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgAccountsService {
    repository: PgAccountsRepository,
}

impl PgAccountsService {
    #[must_use]
    pub fn new(db: &Db) -> Self {
        Self {
            repository: PgAccountsRepository::new(db.pool()),
        }
    }
}

#[async_trait]
impl AccountsService for PgAccountsService {
    async fn create_account(
        &self,
        account: NewAccount,
    ) -> Result<AccountRecord, AccountsServiceError> {
        if !is_plausible_email(&account.email) {
            return Err(AccountsServiceError::InvalidEmail);
        }

        let record = self.repository.create_account(account).await?;

        info!(account = %record.uuid, "created account");

        Ok(record)
    }
}

#[automock]
#[async_trait]
/// Account persistence operations.
pub trait AccountsService: Send + Sync {
    /// Creates a new account.
    async fn create_account(
        &self,
        account: NewAccount,
    ) -> Result<AccountRecord, AccountsServiceError>;
}

fn is_plausible_email(email: &str) -> bool {
    email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'))
}
