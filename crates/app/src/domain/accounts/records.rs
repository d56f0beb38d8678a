//! Account Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Account UUID
pub type AccountUuid = TypedUuid<AccountRecord>;

/// Account Record
#[derive(Debug, Clone)]
pub struct AccountRecord {
    /// Unique account identifier.
    pub uuid: AccountUuid,

    pub display_name: String,

    pub email: String,

    /// Account creation timestamp.
    pub created_at: Timestamp,
}
