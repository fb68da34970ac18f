//! Credential issuer: registration and login against the entitlement store
//!
//! Issues signed session tokens embedding identity, role, and the premium
//! flag current at login time. Login failures are deliberately uniform:
//! unknown email and wrong password produce the same error after the same
//! minimum delay.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::role::Role;
use crate::auth::token::{Claims, TokenManager};
use crate::error::{FinLearnError, Result};
use crate::security::AuthTimer;
use crate::storage::traits::{StoredUser, UserProfile};
use crate::storage::{guarded, StoreProvider};

/// Successful login payload: the signed token plus a sanitized profile the
/// client uses to prime its local mirror
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    pub token: String,
    pub user: UserProfile,
}

/// Registration and login operations
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn StoreProvider>,
    tokens: Arc<TokenManager>,
    token_lifetime: Duration,
    store_timeout: Duration,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn StoreProvider>,
        tokens: Arc<TokenManager>,
        token_lifetime: Duration,
        store_timeout: Duration,
    ) -> Self {
        Self {
            store,
            tokens,
            token_lifetime,
            store_timeout,
        }
    }

    /// Register a new account. All three fields are required; the email
    /// must be unique across all users.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<UserProfile> {
        let name = name.trim();
        let email = email.trim();

        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(FinLearnError::Validation(
                "name, email, and password are required".to_string(),
            ));
        }
        validate_email(email)?;

        if guarded(self.store_timeout, self.store.users().find_by_email(email))
            .await?
            .is_some()
        {
            return Err(FinLearnError::DuplicateEmail);
        }

        let hash = hash_password(password)?;
        let user = StoredUser::new(name.to_string(), email.to_string(), hash, Role::User);
        let profile = user.profile();

        guarded(self.store_timeout, self.store.users().create_user(user)).await?;

        log::info!("Registered user {} ({})", profile.id, profile.email);
        Ok(profile)
    }

    /// Authenticate and issue a session token. Both unknown-email and
    /// wrong-password cases collapse into `InvalidCredentials`.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        let timer = AuthTimer::start();
        let email = email.trim();

        if email.is_empty() || password.is_empty() {
            timer.wait().await;
            return Err(FinLearnError::Validation(
                "email and password are required".to_string(),
            ));
        }

        let user = match guarded(self.store_timeout, self.store.users().find_by_email(email)).await
        {
            Ok(Some(user)) => user,
            Ok(None) => {
                // Burn a hash verification so the miss costs as much as a
                // mismatch would
                let _ = verify_password(DUMMY_HASH, password);
                timer.wait().await;
                return Err(FinLearnError::InvalidCredentials);
            }
            Err(e) => {
                timer.wait().await;
                return Err(e);
            }
        };

        if !verify_password(&user.password_hash, password) {
            log::warn!("Failed login attempt for user {}", user.id);
            timer.wait().await;
            return Err(FinLearnError::InvalidCredentials);
        }

        let claims = Claims::with_lifetime(user.id.clone(), user.role, user.premium, self.token_lifetime);
        let token = self.tokens.issue(&claims)?;

        log::info!("Issued session token for user {}", user.id);
        timer.wait().await;
        Ok(LoginOutcome {
            token,
            user: user.profile(),
        })
    }
}

// A real PHC string (for "placeholder"); verifying against it equalizes the
// cost of unknown-email and wrong-password login paths
const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$gZiV/M1gPc22ElAH/Jh1Hw$CWOrkoo7oJBQ/45WwklqdXZnBVmCcjRR3wuotRaV2x8";

fn validate_email(email: &str) -> Result<()> {
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(FinLearnError::Validation(
            "email address is malformed".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@x.com").is_err());
        assert!(validate_email("a@").is_err());
    }
}
