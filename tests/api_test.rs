//! Request-level tests against the warp route tree

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::Value;

use finlearn::auth::role::Role;
use finlearn::config::ServerConfig;
use finlearn::handlers::{self, AppState};
use finlearn::payment::{PaymentVerifier, StaticPaymentVerifier};
use finlearn::storage::traits::*;
use finlearn::storage::{MemoryStore, StoreProvider};

const TEST_SECRET: &str = "integration-test-jwt-secr3t-with-enough-length";

fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        jwt_secret: TEST_SECRET.to_string(),
        token_lifetime: Duration::from_secs(3600),
        store_timeout: Duration::from_millis(500),
        development_mode: true,
    }
}

async fn test_state() -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    store.seed_admin("admin@x.com", "admin-pass").await.unwrap();

    let provider: Arc<dyn StoreProvider> = store.clone();
    let payments: Arc<dyn PaymentVerifier> =
        Arc::new(StaticPaymentVerifier::new(["tx-good".to_string()]));
    (AppState::new(&test_config(), provider, payments), store)
}

async fn login(state: &AppState, email: &str, password: &str) -> String {
    let routes = handlers::routes(state.clone());
    let response = warp::test::request()
        .method("POST")
        .path("/api/auth/login")
        .json(&serde_json::json!({ "email": email, "password": password }))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 200, "login failed: {:?}", response.body());
    let body: Value = serde_json::from_slice(response.body()).unwrap();
    body["token"].as_str().unwrap().to_string()
}

fn premium_item() -> ContentItem {
    let now = Utc::now();
    ContentItem {
        id: "premium-1".to_string(),
        title: "Options strategies".to_string(),
        summary: "Spreads and hedges".to_string(),
        body: "SECRET-PREMIUM-BODY".to_string(),
        kinds: vec![ContentKind::Article, ContentKind::Video],
        difficulty: Difficulty::Advanced,
        premium: true,
        status: PublishStatus::Published,
        views: 0,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_register_login_profile_flow() {
    let (state, _) = test_state().await;
    let routes = handlers::routes(state.clone());

    let response = warp::test::request()
        .method("POST")
        .path("/api/auth/register")
        .json(&serde_json::json!({
            "name": "Alice", "email": "a@x.com", "password": "pw1"
        }))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 201);

    let token = login(&state, "a@x.com", "pw1").await;

    let response = warp::test::request()
        .method("GET")
        .path("/api/profile")
        .header("authorization", format!("Bearer {}", token))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 200);

    let profile: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(profile["email"], "a@x.com");
    assert_eq!(profile["role"], "user");
    assert_eq!(profile["premium"], false);
    assert!(profile.get("password_hash").is_none());
}

#[tokio::test]
async fn test_profile_without_token_is_unauthorized() {
    let (state, _) = test_state().await;
    let routes = handlers::routes(state);

    let response = warp::test::request()
        .method("GET")
        .path("/api/profile")
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 401);

    let body: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body["reauth"], true);
    assert_eq!(body["redirect"], "login");
}

#[tokio::test]
async fn test_admin_routes_forbidden_for_user_role() {
    let (state, _) = test_state().await;
    let routes = handlers::routes(state.clone());

    // Scenario: fresh user token requesting the admin dashboard
    warp::test::request()
        .method("POST")
        .path("/api/auth/register")
        .json(&serde_json::json!({
            "name": "Alice", "email": "a@x.com", "password": "pw1"
        }))
        .reply(&routes)
        .await;
    let user_token = login(&state, "a@x.com", "pw1").await;

    let response = warp::test::request()
        .method("GET")
        .path("/api/admin/content")
        .header("authorization", format!("Bearer {}", user_token))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 403);
    let body: Value = serde_json::from_slice(response.body()).unwrap();
    // Access denied, not a re-authentication prompt
    assert_eq!(body["reauth"], false);

    // Anonymous gets the re-authentication class, pointed at the admin login
    let response = warp::test::request()
        .method("GET")
        .path("/api/admin/content")
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 401);
    let body: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body["reauth"], true);
    assert_eq!(body["redirect"], "admin-login");
}

#[tokio::test]
async fn test_admin_can_author_content_and_roadmaps() {
    let (state, _) = test_state().await;
    let routes = handlers::routes(state.clone());
    let admin_token = login(&state, "admin@x.com", "admin-pass").await;

    let response = warp::test::request()
        .method("POST")
        .path("/api/admin/content")
        .header("authorization", format!("Bearer {}", admin_token))
        .json(&serde_json::json!({
            "title": "Budgeting basics",
            "summary": "Where the money goes",
            "body": "Track everything for a month.",
            "kinds": ["article"],
            "difficulty": "beginner",
            "premium": false,
            "status": "published"
        }))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 201);

    let response = warp::test::request()
        .method("POST")
        .path("/api/admin/roadmaps")
        .header("authorization", format!("Bearer {}", admin_token))
        .json(&serde_json::json!({
            "title": "Investing from zero",
            "description": "A path",
            "category": "investing",
            "beginner": [{ "title": "budgeting", "link": "https://example.com/b" }]
        }))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 201);

    // Both are now publicly listed
    let response = warp::test::request().method("GET").path("/api/content").reply(&routes).await;
    assert_eq!(response.status(), 200);
    let listed: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let response = warp::test::request().method("GET").path("/api/roadmaps").reply(&routes).await;
    let listed: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_premium_body_never_reaches_free_users() {
    let (state, store) = test_state().await;
    store.content().create_item(premium_item()).await.unwrap();
    let routes = handlers::routes(state.clone());

    // Anonymous detail fetch: metadata only, upgrade signalled
    let response = warp::test::request()
        .method("GET")
        .path("/api/content/premium-1")
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 200);
    let body = String::from_utf8_lossy(response.body()).to_string();
    assert!(!body.contains("SECRET-PREMIUM-BODY"));
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["upgrade_required"], true);

    // Authenticated free user: same truncation
    warp::test::request()
        .method("POST")
        .path("/api/auth/register")
        .json(&serde_json::json!({
            "name": "Alice", "email": "a@x.com", "password": "pw1"
        }))
        .reply(&routes)
        .await;
    let user_token = login(&state, "a@x.com", "pw1").await;
    let response = warp::test::request()
        .method("GET")
        .path("/api/content/premium-1")
        .header("authorization", format!("Bearer {}", user_token))
        .reply(&routes)
        .await;
    assert!(!String::from_utf8_lossy(response.body()).contains("SECRET-PREMIUM-BODY"));

    // Admin sees the full body regardless of its own premium flag
    let admin_token = login(&state, "admin@x.com", "admin-pass").await;
    let response = warp::test::request()
        .method("GET")
        .path("/api/content/premium-1")
        .header("authorization", format!("Bearer {}", admin_token))
        .reply(&routes)
        .await;
    assert!(String::from_utf8_lossy(response.body()).contains("SECRET-PREMIUM-BODY"));
}

#[tokio::test]
async fn test_payment_confirmation_upgrades_entitlement() {
    let (state, store) = test_state().await;
    store.content().create_item(premium_item()).await.unwrap();
    let routes = handlers::routes(state.clone());

    warp::test::request()
        .method("POST")
        .path("/api/auth/register")
        .json(&serde_json::json!({
            "name": "Alice", "email": "a@x.com", "password": "pw1"
        }))
        .reply(&routes)
        .await;
    let token = login(&state, "a@x.com", "pw1").await;

    // Unverifiable reference: flag untouched
    let response = warp::test::request()
        .method("POST")
        .path("/api/payment/confirm")
        .header("authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({ "reference": "tx-bogus" }))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 400);

    // Verified reference: premium flips in the store
    let response = warp::test::request()
        .method("POST")
        .path("/api/payment/confirm")
        .header("authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({ "reference": "tx-good" }))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 200);
    let profile: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(profile["premium"], true);

    // The outstanding token still carries premium=false, so the premium
    // body stays locked until the client re-authenticates
    let response = warp::test::request()
        .method("GET")
        .path("/api/content/premium-1")
        .header("authorization", format!("Bearer {}", token))
        .reply(&routes)
        .await;
    assert!(!String::from_utf8_lossy(response.body()).contains("SECRET-PREMIUM-BODY"));

    // A fresh login picks up the new entitlement
    let fresh = login(&state, "a@x.com", "pw1").await;
    let response = warp::test::request()
        .method("GET")
        .path("/api/content/premium-1")
        .header("authorization", format!("Bearer {}", fresh))
        .reply(&routes)
        .await;
    assert!(String::from_utf8_lossy(response.body()).contains("SECRET-PREMIUM-BODY"));
}

#[tokio::test]
async fn test_drafts_hidden_from_public_catalogue() {
    let (state, store) = test_state().await;
    let mut draft = premium_item();
    draft.id = "draft-1".to_string();
    draft.premium = false;
    draft.status = PublishStatus::Draft;
    store.content().create_item(draft).await.unwrap();
    let routes = handlers::routes(state.clone());

    let response = warp::test::request().method("GET").path("/api/content").reply(&routes).await;
    let listed: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 0);

    let response = warp::test::request()
        .method("GET")
        .path("/api/content/draft-1")
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 404);

    // The admin console still lists it
    let admin_token = login(&state, "admin@x.com", "admin-pass").await;
    let response = warp::test::request()
        .method("GET")
        .path("/api/admin/content")
        .header("authorization", format!("Bearer {}", admin_token))
        .reply(&routes)
        .await;
    let listed: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_view_counter_increments_on_detail_fetch() {
    let (state, store) = test_state().await;
    let mut item = premium_item();
    item.id = "free-1".to_string();
    item.premium = false;
    store.content().create_item(item).await.unwrap();
    let routes = handlers::routes(state);

    for _ in 0..3 {
        warp::test::request()
            .method("GET")
            .path("/api/content/free-1")
            .reply(&routes)
            .await;
    }

    let stored = store.content().get_item("free-1").await.unwrap().unwrap();
    assert_eq!(stored.views, 3);
}

#[tokio::test]
async fn test_expired_token_rejected_with_reauth_signal() {
    let (state, _) = test_state().await;
    let routes = handlers::routes(state.clone());

    let mut claims = finlearn::auth::token::Claims::new("ghost".to_string(), Role::User, false);
    claims.exp = claims.iat.saturating_sub(7200);
    let stale = state.tokens.issue(&claims).unwrap();

    let response = warp::test::request()
        .method("GET")
        .path("/api/profile")
        .header("authorization", format!("Bearer {}", stale))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 401);
    let body: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body["reauth"], true);

    let response = warp::test::request().method("GET").path("/health").reply(&routes).await;
    assert_eq!(response.status(), 200);
}
