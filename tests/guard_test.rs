//! End-to-end guard flow: server-issued claims prime the client mirror,
//! the mirror gates navigation, and server decisions override it.

use std::sync::Arc;
use std::time::Duration;

use finlearn::access::{RedirectTarget, Resource};
use finlearn::auth::service::AuthService;
use finlearn::auth::token::TokenManager;
use finlearn::error::FinLearnError;
use finlearn::guard::{GuardState, RouteGuard};
use finlearn::storage::{MemoryStore, StoreProvider};

const TEST_SECRET: &str = "integration-test-jwt-secr3t-with-enough-length";

#[tokio::test]
async fn test_login_primes_mirror_and_gates_navigation() {
    let store: Arc<dyn StoreProvider> = Arc::new(MemoryStore::new());
    let tokens = Arc::new(TokenManager::new(TEST_SECRET));
    let auth = AuthService::new(
        store,
        tokens.clone(),
        Duration::from_secs(3600),
        Duration::from_millis(500),
    );

    auth.register("Alice", "a@x.com", "pw1").await.unwrap();
    let outcome = auth.login("a@x.com", "pw1").await.unwrap();

    // Client decodes the token it just received and mirrors the claims
    let claims = tokens.verify(&outcome.token).unwrap();
    let mut guard = RouteGuard::new();
    guard.on_login(&claims);

    // Optimistic local decisions, no network
    assert_eq!(guard.begin_navigation(Resource::Public), GuardState::Allowed);
    assert_eq!(guard.begin_navigation(Resource::UserArea), GuardState::Allowed);
    assert_eq!(
        guard.begin_navigation(Resource::AdminArea),
        GuardState::Redirected(RedirectTarget::Login)
    );
}

#[tokio::test]
async fn test_server_expiry_overrides_optimistic_allow() {
    let mut guard = RouteGuard::new();
    let claims = finlearn::auth::token::Claims::new(
        "u1".to_string(),
        finlearn::auth::role::Role::User,
        false,
    );
    guard.on_login(&claims);

    assert_eq!(guard.begin_navigation(Resource::UserArea), GuardState::Allowed);

    // First API call of the page comes back 401: the local mirror was stale
    guard.on_server_error(&FinLearnError::Expired);
    assert_eq!(guard.state(), GuardState::Redirected(RedirectTarget::Login));
    assert!(guard.mirrored().is_none());

    // Next navigation starts from scratch, as anonymous
    assert_eq!(
        guard.begin_navigation(Resource::UserArea),
        GuardState::Redirected(RedirectTarget::Login)
    );
}

#[test]
fn test_logout_resets_to_unknown() {
    let mut guard = RouteGuard::new();
    let claims = finlearn::auth::token::Claims::new(
        "u1".to_string(),
        finlearn::auth::role::Role::Admin,
        false,
    );
    guard.on_login(&claims);
    assert_eq!(guard.begin_navigation(Resource::AdminArea), GuardState::Allowed);

    guard.logout();
    assert_eq!(guard.state(), GuardState::Unknown);
    assert_eq!(
        guard.begin_navigation(Resource::AdminArea),
        GuardState::Redirected(RedirectTarget::AdminLogin)
    );
}
