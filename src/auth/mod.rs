//! Admin authentication: a shared secret exchanged for server-side sessions
//!
//! Tokens are opaque random strings held in memory with an expiry. Nothing
//! about the session is trusted from the cookie beyond the token itself, and
//! restarting the server signs everyone out.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Admin login is disabled: no password configured")]
    Disabled,
    #[error("Incorrect password")]
    InvalidPassword,
}

/// Checks the admin password and tracks live sessions
#[derive(Clone)]
pub struct SessionStore {
    password_hash: Option<Vec<u8>>,
    ttl: Duration,
    sessions: Arc<DashMap<String, DateTime<Utc>>>,
}

impl SessionStore {
    pub fn new(password: Option<&str>, ttl_hours: i64) -> Self {
        Self {
            password_hash: password.map(hash_secret),
            ttl: Duration::hours(ttl_hours.clamp(1, 24 * 365)),
            sessions: Arc::new(DashMap::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Verify `password` and open a session, returning its token
    pub fn login(&self, password: &str) -> Result<String, AuthError> {
        self.login_at(password, Utc::now())
    }

    fn login_at(&self, password: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        let expected = self.password_hash.as_ref().ok_or(AuthError::Disabled)?;
        let given = hash_secret(password);
        if expected.ct_eq(&given).unwrap_u8() == 0 {
            tracing::warn!("Rejected admin login attempt");
            return Err(AuthError::InvalidPassword);
        }

        self.purge_expired(now);
        let token = generate_token();
        self.sessions.insert(token.clone(), now + self.ttl);
        tracing::info!("Admin signed in");
        Ok(token)
    }

    /// Whether `token` names a live session. Expired sessions are dropped.
    pub fn validate(&self, token: &str) -> bool {
        self.validate_at(token, Utc::now())
    }

    fn validate_at(&self, token: &str, now: DateTime<Utc>) -> bool {
        let expires_at = match self.sessions.get(token) {
            Some(entry) => *entry.value(),
            None => return false,
        };
        if expires_at <= now {
            self.sessions.remove(token);
            tracing::debug!("Admin session expired");
            return false;
        }
        true
    }

    /// End a session; unknown tokens are ignored
    pub fn logout(&self, token: &str) {
        if self.sessions.remove(token).is_some() {
            tracing::info!("Admin signed out");
        }
    }

    fn purge_expired(&self, now: DateTime<Utc>) {
        self.sessions.retain(|_, expires_at| *expires_at > now);
    }

    #[cfg(test)]
    fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

fn hash_secret(secret: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.finalize().to_vec()
}

fn generate_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}
