//! Auth service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    auth::{
        AuthServiceError, IssuedSessionToken, NewSession, SessionTokenVersion, digests_match,
        format_session_token, generate_session_token_secret, parse_session_token,
        repository::PgAuthRepository, session_token_digest,
    },
    database::Db,
    domain::accounts::records::AccountUuid,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(db: &Db) -> Self {
        Self {
            repository: PgAuthRepository::new(db.pool()),
        }
    }

    /// Issue a new session token for the given account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insertion fails.
    pub async fn issue_session_token(
        &self,
        account_uuid: AccountUuid,
        expires_at: Option<Timestamp>,
    ) -> Result<IssuedSessionToken, AuthServiceError> {
        let session_uuid = Uuid::now_v7();
        let version = SessionTokenVersion::V1;
        let secret = generate_session_token_secret();
        let token = format_session_token(session_uuid, version, &secret);

        let metadata = self
            .repository
            .create_session(&NewSession {
                uuid: session_uuid,
                account_uuid,
                version,
                token_hash: session_token_digest(&session_uuid, version, &secret),
                expires_at,
            })
            .await?;

        info!(account = %account_uuid, session = %session_uuid, "issued session token");

        Ok(IssuedSessionToken { token, metadata })
    }

    /// Revoke a session by UUID. Returns `true` if the session was active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn revoke_session_token(&self, session_uuid: Uuid) -> Result<bool, AuthServiceError> {
        self.repository
            .revoke_session(session_uuid)
            .await
            .map(|record| record.is_some())
            .map_err(AuthServiceError::from)
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
    ) -> Result<AccountUuid, AuthServiceError> {
        let parsed = parse_session_token(bearer_token).map_err(|error| {
            debug!(%error, "rejected malformed bearer token");
            AuthServiceError::NotFound
        })?;

        let session = self
            .repository
            .find_active_session(parsed.session_uuid, parsed.version)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        let digest = session_token_digest(&parsed.session_uuid, parsed.version, &parsed.secret);

        if session.version != parsed.version || !digests_match(&digest, &session.token_hash) {
            return Err(AuthServiceError::NotFound);
        }

        // Best-effort metadata update; auth success should not depend on this write.
        let _touch_result = self
            .repository
            .touch_session_last_used(parsed.session_uuid)
            .await;

        Ok(session.account_uuid)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve the account owning a bearer token.
    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
    ) -> Result<AccountUuid, AuthServiceError>;
}
