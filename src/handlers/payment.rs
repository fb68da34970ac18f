//! Premium upgrade endpoint
//!
//! Accepts a claimed transaction reference, hands it to the payment
//! verification collaborator, and on a verified answer flips the premium
//! flag in the entitlement store. The caller's current token still carries
//! its old claims; the response returns the fresh profile so the client
//! can re-fetch entitlements.

use serde::Deserialize;
use warp::{Filter, Rejection, Reply};

use super::{auth_header, reject, with_state, AppState};
use crate::access::Resource;
use crate::payment::confirm_upgrade;

#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    pub reference: String,
}

pub fn routes(state: AppState) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("api" / "payment" / "confirm")
        .and(warp::post())
        .and(auth_header())
        .and(warp::body::json())
        .and(with_state(state))
        .and_then(handle_confirm)
}

async fn handle_confirm(
    auth: Option<String>,
    request: ConfirmRequest,
    state: AppState,
) -> Result<impl Reply, Rejection> {
    let claims = state
        .authorized_claims(auth.as_deref(), Resource::UserArea)
        .map_err(reject::api)?;

    let profile = confirm_upgrade(
        &state.store,
        &state.payments,
        &claims.sub,
        &request.reference,
        state.store_timeout,
    )
    .await
    .map_err(reject::api)?;

    Ok(warp::reply::json(&profile))
}
