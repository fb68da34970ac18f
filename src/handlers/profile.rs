//! Profile endpoints (user area)

use warp::{Filter, Rejection, Reply};

use super::{auth_header, reject, with_state, AppState};
use crate::access::Resource;
use crate::error::FinLearnError;
use crate::storage::traits::ProfileUpdate;
use crate::storage::{guarded, with_retry};

pub fn routes(state: AppState) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let fetch = warp::path!("api" / "profile")
        .and(warp::get())
        .and(auth_header())
        .and(with_state(state.clone()))
        .and_then(handle_fetch);

    let update = warp::path!("api" / "profile")
        .and(warp::put())
        .and(auth_header())
        .and(warp::body::json())
        .and(with_state(state))
        .and_then(handle_update);

    fetch.or(update)
}

async fn handle_fetch(
    auth: Option<String>,
    state: AppState,
) -> Result<impl Reply, Rejection> {
    let claims = state
        .authorized_claims(auth.as_deref(), Resource::UserArea)
        .map_err(reject::api)?;

    // Entitlements come from the store, not the token: a premium upgrade
    // made after issuance shows up here immediately
    let user = with_retry(|| {
        guarded(state.store_timeout, state.store.users().find_by_id(&claims.sub))
    })
    .await
    .map_err(reject::api)?
    .ok_or_else(|| reject::api(FinLearnError::NotFound(format!("user {}", claims.sub))))?;

    Ok(warp::reply::json(&user.profile()))
}

async fn handle_update(
    auth: Option<String>,
    update: ProfileUpdate,
    state: AppState,
) -> Result<impl Reply, Rejection> {
    let claims = state
        .authorized_claims(auth.as_deref(), Resource::UserArea)
        .map_err(reject::api)?;

    if let Some(name) = &update.name {
        if name.trim().is_empty() {
            return Err(reject::api(FinLearnError::Validation(
                "name must not be empty".to_string(),
            )));
        }
    }

    let user = guarded(
        state.store_timeout,
        state.store.users().update_profile(&claims.sub, update),
    )
    .await
    .map_err(reject::api)?;

    Ok(warp::reply::json(&user.profile()))
}
