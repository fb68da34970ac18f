//! Payment verification collaborator and the premium upgrade flow
//!
//! The platform never speaks a payment provider's protocol. It hands a
//! claimed transaction reference plus the paying identity to a verifier
//! and consumes a boolean answer; on verified, the entitlement store's
//! premium flag is written. Outstanding tokens keep their old claims until
//! the client re-authenticates.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{FinLearnError, Result};
use crate::storage::traits::UserProfile;
use crate::storage::{guarded, with_retry, StoreProvider};

/// Verdict on a claimed payment
#[async_trait]
pub trait PaymentVerifier: Send + Sync {
    /// Whether `reference` is a settled transaction by `user_id`
    async fn verify(&self, reference: &str, user_id: &str) -> Result<bool>;

    /// Provider name for logging/debugging
    fn provider_name(&self) -> &'static str;
}

/// Development verifier: accepts any non-empty reference
pub struct DevPaymentVerifier;

#[async_trait]
impl PaymentVerifier for DevPaymentVerifier {
    async fn verify(&self, reference: &str, _user_id: &str) -> Result<bool> {
        Ok(!reference.is_empty())
    }

    fn provider_name(&self) -> &'static str {
        "DEV"
    }
}

/// Fixed-list verifier for tests: only pre-registered references pass
pub struct StaticPaymentVerifier {
    accepted: HashSet<String>,
}

impl StaticPaymentVerifier {
    pub fn new<I: IntoIterator<Item = String>>(accepted: I) -> Self {
        Self {
            accepted: accepted.into_iter().collect(),
        }
    }
}

#[async_trait]
impl PaymentVerifier for StaticPaymentVerifier {
    async fn verify(&self, reference: &str, _user_id: &str) -> Result<bool> {
        Ok(self.accepted.contains(reference))
    }

    fn provider_name(&self) -> &'static str {
        "STATIC"
    }
}

/// Confirm a payment and upgrade the account to premium.
///
/// The premium write is retried once on a transient store failure so a
/// confirmed payment is not silently dropped. The caller's current token
/// still carries `premium: false`; the fresh profile in the response lets
/// the client re-fetch entitlements (or re-login for an updated token).
pub async fn confirm_upgrade(
    store: &Arc<dyn StoreProvider>,
    verifier: &Arc<dyn PaymentVerifier>,
    user_id: &str,
    reference: &str,
    store_timeout: Duration,
) -> Result<UserProfile> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(FinLearnError::Validation(
            "payment reference is required".to_string(),
        ));
    }

    let verified = guarded(store_timeout, verifier.verify(reference, user_id)).await?;
    if !verified {
        log::warn!(
            "Unverified payment reference for user {} via {}",
            user_id,
            verifier.provider_name()
        );
        return Err(FinLearnError::Validation(
            "payment could not be verified".to_string(),
        ));
    }

    with_retry(|| guarded(store_timeout, store.users().set_premium(user_id, true))).await?;

    let user = guarded(store_timeout, store.users().find_by_id(user_id))
        .await?
        .ok_or_else(|| FinLearnError::NotFound(format!("user {}", user_id)))?;

    log::info!("Upgraded user {} to premium", user_id);
    Ok(user.profile())
}
