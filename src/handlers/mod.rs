//! HTTP request handlers and route wiring

pub mod admin;
pub mod auth;
pub mod content;
pub mod payment;
pub mod profile;
pub mod reject;
pub mod roadmap;

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use warp::{Filter, Rejection, Reply};

use crate::access::{authorize, Identity, Resource};
use crate::auth::service::AuthService;
use crate::auth::token::TokenManager;
use crate::config::ServerConfig;
use crate::error::Result;
use crate::payment::PaymentVerifier;
use crate::storage::StoreProvider;

/// Shared per-request state injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenManager>,
    pub store: Arc<dyn StoreProvider>,
    pub auth: AuthService,
    pub payments: Arc<dyn PaymentVerifier>,
    pub store_timeout: Duration,
}

impl AppState {
    pub fn new(
        config: &ServerConfig,
        store: Arc<dyn StoreProvider>,
        payments: Arc<dyn PaymentVerifier>,
    ) -> Self {
        let tokens = Arc::new(TokenManager::new(&config.jwt_secret));
        let auth = AuthService::new(
            store.clone(),
            tokens.clone(),
            config.token_lifetime,
            config.store_timeout,
        );
        Self {
            tokens,
            store,
            auth,
            payments,
            store_timeout: config.store_timeout,
        }
    }

    /// Authoritative claims for a protected request
    pub fn require_claims(&self, auth_header: Option<&str>) -> Result<crate::auth::Claims> {
        self.tokens.verify_request(auth_header)
    }

    /// Claims checked against a resource's route rules. An anonymous
    /// request fails with the policy engine's redirect target so the
    /// client knows which login page applies; a presented credential is
    /// verified first, then role-checked.
    pub fn authorized_claims(
        &self,
        auth_header: Option<&str>,
        resource: Resource,
    ) -> Result<crate::auth::Claims> {
        if auth_header.is_none() {
            authorize(None, resource).require()?;
        }
        let claims = self.require_claims(auth_header)?;
        authorize(Some(Identity::from(&claims)), resource).require()?;
        Ok(claims)
    }

    /// Identity for a public request: a valid credential personalizes the
    /// response, anything else browses anonymously
    pub fn optional_identity(&self, auth_header: Option<&str>) -> Option<Identity> {
        match self.tokens.verify_request_optional(auth_header) {
            Ok(Some(claims)) => Some(Identity::from(&claims)),
            Ok(None) => None,
            Err(e) => {
                log::debug!("Ignoring invalid credential on public route: {}", e);
                None
            }
        }
    }
}

/// Helper filter to include shared state in a request
pub fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

/// Helper filter extracting the raw Authorization header, if any
pub fn auth_header() -> impl Filter<Extract = (Option<String>,), Error = Rejection> + Clone {
    warp::header::optional::<String>("authorization")
}

/// All API routes plus health check, with rejection recovery applied
pub fn routes(
    state: AppState,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    let health = warp::path("health").and(warp::get()).map(|| "OK");

    auth::routes(state.clone())
        .or(profile::routes(state.clone()))
        .or(content::routes(state.clone()))
        .or(roadmap::routes(state.clone()))
        .or(admin::routes(state.clone()))
        .or(payment::routes(state))
        .or(health)
        .recover(reject::handle_rejection)
}
