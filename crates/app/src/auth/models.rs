//! Auth data models.

use jiff::Timestamp;
use uuid::Uuid;

use crate::{auth::SessionTokenVersion, domain::accounts::records::AccountUuid};

/// Session data used during bearer authentication.
#[derive(Debug, Clone)]
pub(crate) struct ActiveSession {
    /// Account that owns this session.
    pub account_uuid: AccountUuid,

    /// Token format/hash version.
    pub version: SessionTokenVersion,

    /// SHA-256 digest of the token secret material, hex encoded.
    pub token_hash: String,
}

/// Session metadata persisted in storage.
#[derive(Debug, Clone)]
pub struct SessionMetadata {
    pub uuid: Uuid,
    pub account_uuid: AccountUuid,
    pub version: SessionTokenVersion,
    pub created_at: Timestamp,
    pub last_used_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub revoked_at: Option<Timestamp>,
}

/// New session persistence payload.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub uuid: Uuid,
    pub account_uuid: AccountUuid,
    pub version: SessionTokenVersion,
    pub token_hash: String,
    pub expires_at: Option<Timestamp>,
}

/// Session issuance result with the one-time raw token.
#[derive(Debug, Clone)]
pub struct IssuedSessionToken {
    pub token: String,
    pub metadata: SessionMetadata,
}
