use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use serde::Serialize;
use uuid::Uuid;

use crate::config::AdminConfig;

/// Bearer token issued after a successful admin login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminToken {
    pub token: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("admin access is not configured")]
    Disabled,
    #[error("access denied")]
    InvalidCredentials,
    #[error("admin login required")]
    Unauthorized,
    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Tokens stop authorizing this long after login.
pub const TOKEN_LIFETIME: Duration = Duration::from_secs(8 * 60 * 60);
/// Logging in beyond this many live tokens retires the oldest one.
pub const MAX_ACTIVE_TOKENS: usize = 16;

/// Login gate for the analytics dashboard. Passwords are checked against an argon2 hash.
#[derive(Debug)]
pub struct AdminGate {
    username: String,
    password_hash: Option<String>,
    tokens: Mutex<HashMap<String, Instant>>,
}

impl AdminGate {
    pub fn new(username: impl Into<String>, password_hash: Option<String>) -> Self {
        Self {
            username: username.into(),
            password_hash,
            tokens: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &AdminConfig) -> Self {
        Self::new(config.username.clone(), config.password_hash.clone())
    }

    pub fn is_enabled(&self) -> bool {
        self.password_hash.is_some()
    }

    pub fn login(&self, username: &str, password: &str) -> Result<AdminToken, AuthError> {
        let stored = self.password_hash.as_deref().ok_or(AuthError::Disabled)?;
        let parsed = PasswordHash::new(stored).map_err(|err| AuthError::Hash(err.to_string()))?;
        let password_ok = Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok();
        if username != self.username || !password_ok {
            tracing::warn!(username, "admin login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.issue_token(Instant::now())?;
        tracing::info!(username, "admin logged in");
        Ok(token)
    }

    pub fn authorize(&self, token: &str) -> Result<(), AuthError> {
        self.authorize_at(token, Instant::now())
    }

    /// Returns whether the token was active.
    pub fn logout(&self, token: &str) -> bool {
        match self.tokens.lock() {
            Ok(mut tokens) => tokens.remove(token).is_some(),
            Err(_) => false,
        }
    }

    fn registry(&self) -> Result<MutexGuard<'_, HashMap<String, Instant>>, AuthError> {
        self.tokens
            .lock()
            .map_err(|_| AuthError::Hash("token registry poisoned".to_string()))
    }

    fn issue_token(&self, now: Instant) -> Result<AdminToken, AuthError> {
        let mut tokens = self.registry()?;
        tokens.retain(|_, issued_at| now.saturating_duration_since(*issued_at) < TOKEN_LIFETIME);
        while tokens.len() >= MAX_ACTIVE_TOKENS {
            let oldest = tokens
                .iter()
                .min_by_key(|(_, issued_at)| **issued_at)
                .map(|(token, _)| token.clone());
            match oldest {
                Some(token) => {
                    tokens.remove(&token);
                }
                None => break,
            }
        }

        let token = Uuid::new_v4().to_string();
        tokens.insert(token.clone(), now);
        Ok(AdminToken { token })
    }

    fn authorize_at(&self, token: &str, now: Instant) -> Result<(), AuthError> {
        let mut tokens = self.tokens.lock().map_err(|_| AuthError::Unauthorized)?;
        let issued_at = tokens.get(token).copied().ok_or(AuthError::Unauthorized)?;
        if now.saturating_duration_since(issued_at) < TOKEN_LIFETIME {
            return Ok(());
        }
        tokens.remove(token);
        Err(AuthError::Unauthorized)
    }
}

/// Produce a PHC-format argon2 hash suitable for `APP_ADMIN_PASSWORD_HASH`.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
        .map_err(|err| AuthError::Hash(err.to_string()))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AuthError::Hash(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> AdminGate {
        let hash = hash_password("correct horse").expect("hash builds");
        AdminGate::new("admin", Some(hash))
    }

    #[test]
    fn hashes_are_salted_phc_strings() {
        let first = hash_password("secret").expect("hash");
        let second = hash_password("secret").expect("hash");
        assert!(first.starts_with("$argon2"));
        assert_ne!(first, second);
    }

    #[test]
    fn login_issues_a_token_that_authorizes_until_logout() {
        let gate = gate();
        let token = gate.login("admin", "correct horse").expect("login");
        gate.authorize(&token.token).expect("authorized");
        assert!(gate.logout(&token.token));
        assert!(matches!(
            gate.authorize(&token.token),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn wrong_password_or_username_is_denied() {
        let gate = gate();
        assert!(matches!(
            gate.login("admin", "battery staple"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            gate.login("root", "correct horse"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn tokens_expire_after_their_lifetime() {
        let gate = AdminGate::new("admin", None);
        let issued = Instant::now();
        let token = gate.issue_token(issued).expect("token issued");

        gate.authorize_at(&token.token, issued + TOKEN_LIFETIME / 2)
            .expect("still valid");
        assert!(matches!(
            gate.authorize_at(&token.token, issued + TOKEN_LIFETIME),
            Err(AuthError::Unauthorized)
        ));
        assert!(!gate.logout(&token.token), "expired token was dropped");
    }

    #[test]
    fn logging_in_past_the_cap_retires_the_oldest_token() {
        let gate = AdminGate::new("admin", None);
        let start = Instant::now();
        let tokens: Vec<AdminToken> = (0..=MAX_ACTIVE_TOKENS as u64)
            .map(|n| {
                gate.issue_token(start + Duration::from_secs(n))
                    .expect("token issued")
            })
            .collect();
        let now = start + Duration::from_secs(MAX_ACTIVE_TOKENS as u64);

        assert_eq!(gate.tokens.lock().expect("lock").len(), MAX_ACTIVE_TOKENS);
        assert!(matches!(
            gate.authorize_at(&tokens[0].token, now),
            Err(AuthError::Unauthorized)
        ));
        for token in &tokens[1..] {
            gate.authorize_at(&token.token, now).expect("recent token valid");
        }
    }

    #[test]
    fn gate_without_hash_refuses_everyone() {
        let gate = AdminGate::new("admin", None);
        assert!(!gate.is_enabled());
        assert!(matches!(
            gate.login("admin", "anything"),
            Err(AuthError::Disabled)
        ));
    }
}
