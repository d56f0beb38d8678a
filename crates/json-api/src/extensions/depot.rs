//! Depot helper extensions.

use std::any::Any;

use pantry_app::domain::accounts::records::AccountUuid;
use salvo::prelude::Depot;

use crate::errors::ApiError;

const ACCOUNT_UUID_DEPOT_KEY: &str = "account_uuid";

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, ApiError>;

    fn insert_account_uuid(&mut self, account: AccountUuid);

    fn account_uuid_or_401(&self) -> Result<AccountUuid, ApiError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, ApiError> {
        self.obtain::<T>().map_err(|_ignored| ApiError::internal())
    }

    fn insert_account_uuid(&mut self, account: AccountUuid) {
        self.insert(ACCOUNT_UUID_DEPOT_KEY, account);
    }

    fn account_uuid_or_401(&self) -> Result<AccountUuid, ApiError> {
        self.get::<AccountUuid>(ACCOUNT_UUID_DEPOT_KEY)
            .copied()
            .map_err(|_ignored| ApiError::unauthorized("Authentication required"))
    }
}
