//! In-memory stand-ins for the database layer, so session-manager
//! behavior can be tested without Postgres.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use plateful_server::auth::password::hash_password;
use plateful_server::auth::{AuthService, RefreshTokenStore, TokenCodec, UserStore};
use plateful_server::config::Settings;
use plateful_server::db::models::User;
use plateful_server::error::DatabaseError;

pub fn test_user(id: i32, name: &str, password: &str) -> User {
    User {
        id,
        name: name.to_string(),
        phone: "555-0100".to_string(),
        address: "1 Main St".to_string(),
        password_hash: hash_password(password).unwrap(),
    }
}

pub struct InMemoryUsers {
    users: Vec<User>,
}

impl InMemoryUsers {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UserStore for InMemoryUsers {
    async fn user_by_name(&self, name: &str) -> Result<Option<User>, DatabaseError> {
        Ok(self.users.iter().find(|u| u.name == name).cloned())
    }

    async fn user_by_id(&self, id: i32) -> Result<Option<User>, DatabaseError> {
        Ok(self.users.iter().find(|u| u.id == id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryTokens {
    rows: Mutex<Vec<(i32, String, DateTime<Utc>)>>,
}

impl InMemoryTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, user_id: i32, token: &str) -> bool {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .any(|(u, t, _)| *u == user_id && t == token)
    }

    pub fn live_count(&self, user_id: i32) -> usize {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|(u, _, _)| *u == user_id)
            .count()
    }

    /// Force a stored row's expiry to the given instant.
    pub fn set_expiry(&self, user_id: i32, token: &str, expires_at: DateTime<Utc>) {
        let mut rows = self.rows.lock().unwrap();
        for row in rows.iter_mut() {
            if row.0 == user_id && row.1 == token {
                row.2 = expires_at;
            }
        }
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryTokens {
    async fn add(
        &self,
        user_id: i32,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), DatabaseError> {
        self.rows
            .lock()
            .unwrap()
            .push((user_id, token.to_string(), expires_at));
        Ok(())
    }

    async fn is_valid(&self, user_id: i32, token: &str) -> Result<bool, DatabaseError> {
        let now = Utc::now();
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .any(|(u, t, exp)| *u == user_id && t == token && *exp > now))
    }

    async fn revoke(&self, user_id: i32, token: &str) -> Result<(), DatabaseError> {
        self.rows
            .lock()
            .unwrap()
            .retain(|(u, t, _)| !(*u == user_id && t == token));
        Ok(())
    }

    async fn rotate(
        &self,
        user_id: i32,
        old_token: &str,
        new_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), DatabaseError> {
        // One lock across both steps, mirroring the real store's
        // single transaction
        let mut rows = self.rows.lock().unwrap();
        rows.retain(|(u, t, _)| !(*u == user_id && t == old_token));
        rows.push((user_id, new_token.to_string(), expires_at));
        Ok(())
    }
}

/// An auth service over the in-memory stores, plus a handle on the token
/// store for inspection.
pub fn test_auth_service(users: Vec<User>) -> (AuthService, Arc<InMemoryTokens>) {
    let settings = Settings::new_for_test().unwrap();
    let codec = TokenCodec::from_config(&settings.auth).unwrap();
    let tokens = Arc::new(InMemoryTokens::new());
    let service = AuthService::new(Arc::new(InMemoryUsers::new(users)), tokens.clone(), codec);
    (service, tokens)
}
