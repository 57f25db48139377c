use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::auth::password::verify_password;
use crate::auth::token::TokenCodec;
use crate::db::models::User;
use crate::error::{AppError, AuthError, DatabaseError};

/// Read-only user lookup the session manager depends on. Implemented by
/// the database layer; faked in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn user_by_name(&self, name: &str) -> Result<Option<User>, DatabaseError>;
    async fn user_by_id(&self, id: i32) -> Result<Option<User>, DatabaseError>;
}

/// Persistence for outstanding refresh tokens. The store owns the rows:
/// the session manager never touches them except through this trait.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Persist a new live token. Multiple live tokens per user are
    /// allowed (one per concurrent session).
    async fn add(
        &self,
        user_id: i32,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), DatabaseError>;

    /// True iff a row matches both user and exact token string and its
    /// expiry is strictly in the future. No side effects.
    async fn is_valid(&self, user_id: i32, token: &str) -> Result<bool, DatabaseError>;

    /// Delete the matching row if present; no-op otherwise.
    async fn revoke(&self, user_id: i32, token: &str) -> Result<(), DatabaseError>;

    /// Atomically replace `old_token` with `new_token`: both the delete
    /// and the insert commit, or neither does.
    async fn rotate(
        &self,
        user_id: i32,
        old_token: &str,
        new_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), DatabaseError>;
}

/// Response shape for login and refresh.
#[derive(Debug, Clone, Serialize)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Orchestrates the session-token lifecycle: issue on login, stateless
/// access-token checks, single-use refresh rotation, revocation on
/// logout.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: Arc<dyn RefreshTokenStore>,
    codec: TokenCodec,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        tokens: Arc<dyn RefreshTokenStore>,
        codec: TokenCodec,
    ) -> Self {
        Self {
            users,
            tokens,
            codec,
        }
    }

    /// Verify credentials, issue a token pair and persist the refresh
    /// token. An unknown username and a wrong password are reported
    /// identically to the caller.
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionTokens, AppError> {
        let user = match self.users.user_by_name(username).await? {
            Some(user) => user,
            None => {
                warn!("Login failed: unknown user");
                return Err(AuthError::UnknownUser.into());
            }
        };

        if !verify_password(password, &user.password_hash) {
            warn!(user_id = user.id, "Login failed: bad password");
            return Err(AuthError::InvalidCredentials.into());
        }

        let pair = self.codec.issue(user.id, Utc::now())?;
        self.tokens
            .add(user.id, &pair.refresh_token, pair.refresh_expires_at)
            .await?;

        info!(user_id = user.id, "Login successful");
        Ok(self.session_tokens(pair))
    }

    /// Exchange a live refresh token for a new pair. The presented token
    /// is consumed: replaying it after a successful refresh fails.
    pub async fn refresh(&self, refresh_token: &str) -> Result<SessionTokens, AppError> {
        let user_id = self.codec.decode(refresh_token).map_err(|e| {
            warn!("Refresh failed: {}", e);
            e
        })?;

        // Signature validity alone is not enough: the token must still be
        // on record, which is where revocation and rotation bite
        if !self.tokens.is_valid(user_id, refresh_token).await? {
            warn!(user_id, "Refresh failed: token revoked or expired");
            return Err(AuthError::TokenRevoked.into());
        }

        let pair = self.codec.issue(user_id, Utc::now())?;
        self.tokens
            .rotate(
                user_id,
                refresh_token,
                &pair.refresh_token,
                pair.refresh_expires_at,
            )
            .await?;

        info!(user_id, "Refresh token rotated");
        Ok(self.session_tokens(pair))
    }

    /// Revoke a refresh token. Fails only if the token cannot be decoded
    /// at all; revoking an already-gone token succeeds.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), AppError> {
        let user_id = self.codec.decode(refresh_token).map_err(|e| {
            warn!("Logout failed: {}", e);
            e
        })?;

        self.tokens.revoke(user_id, refresh_token).await?;
        info!(user_id, "Logged out");
        Ok(())
    }

    /// Resolve the calling user from a bearer access token. Used by every
    /// protected route; stateless apart from the existence check.
    pub async fn authenticate(&self, access_token: &str) -> Result<i32, AppError> {
        let user_id = self.codec.decode(access_token)?;

        if self.users.user_by_id(user_id).await?.is_none() {
            warn!(user_id, "Authenticated token for missing user");
            return Err(AuthError::UnknownUser.into());
        }

        Ok(user_id)
    }

    fn session_tokens(&self, pair: crate::auth::token::TokenPair) -> SessionTokens {
        SessionTokens {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: "bearer".to_string(),
            expires_in: self.codec.access_expires_in(),
        }
    }
}
