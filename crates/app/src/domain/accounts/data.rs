//! Account Data

use crate::domain::accounts::records::AccountUuid;

/// New Account Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    /// UUID to assign to the account row.
    pub uuid: AccountUuid,

    /// Name shown to the shopper.
    pub display_name: String,

    /// Contact address, unique across accounts.
    pub email: String,
}
