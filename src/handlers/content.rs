//! Public catalogue endpoints
//!
//! Listing and detail are public resources; the policy engine decides per
//! item how much a requester sees. Premium bodies are withheld from
//! non-premium, non-admin requesters and replaced with a metadata preview
//! carrying an upgrade-required signal.

use warp::{Filter, Rejection, Reply};

use super::{auth_header, reject, with_state, AppState};
use crate::access::{content_visibility, item_listed, Visibility};
use crate::error::FinLearnError;
use crate::storage::guarded;
use crate::storage::traits::PublishStatus;

pub fn routes(state: AppState) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let list = warp::path!("api" / "content")
        .and(warp::get())
        .and(auth_header())
        .and(with_state(state.clone()))
        .and_then(handle_list);

    let detail = warp::path!("api" / "content" / String)
        .and(warp::get())
        .and(auth_header())
        .and(with_state(state))
        .and_then(handle_detail);

    list.or(detail)
}

async fn handle_list(auth: Option<String>, state: AppState) -> Result<impl Reply, Rejection> {
    let who = state.optional_identity(auth.as_deref());

    let items = guarded(state.store_timeout, state.store.content().list_items())
        .await
        .map_err(reject::api)?;

    // The catalogue is metadata-only; bodies are served by the detail
    // endpoint where the premium gate applies
    let previews: Vec<_> = items
        .iter()
        .filter(|item| item_listed(who, item))
        .map(|item| {
            let locked = content_visibility(who, item) == Visibility::MetadataOnly;
            item.preview(locked)
        })
        .collect();

    Ok(warp::reply::json(&previews))
}

async fn handle_detail(
    item_id: String,
    auth: Option<String>,
    state: AppState,
) -> Result<impl Reply, Rejection> {
    let who = state.optional_identity(auth.as_deref());

    let mut item = guarded(state.store_timeout, state.store.content().get_item(&item_id))
        .await
        .map_err(reject::api)?
        .ok_or_else(|| reject::api(FinLearnError::NotFound(format!("content {}", item_id))))?;

    // Drafts do not exist for non-admins
    if !item_listed(who, &item) {
        return Err(reject::api(FinLearnError::NotFound(format!(
            "content {}",
            item_id
        ))));
    }

    if item.status == PublishStatus::Published {
        item.views = guarded(state.store_timeout, state.store.content().record_view(&item_id))
            .await
            .map_err(reject::api)?;
    }

    match content_visibility(who, &item) {
        Visibility::Full => Ok(warp::reply::json(&item)),
        Visibility::MetadataOnly => Ok(warp::reply::json(&item.preview(true))),
    }
}
