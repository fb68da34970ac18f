//! Public roadmap endpoints

use warp::{Filter, Rejection, Reply};

use super::{reject, with_state, AppState};
use crate::error::FinLearnError;
use crate::storage::guarded;

pub fn routes(state: AppState) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let list = warp::path!("api" / "roadmaps")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handle_list);

    let detail = warp::path!("api" / "roadmaps" / String)
        .and(warp::get())
        .and(with_state(state))
        .and_then(handle_detail);

    list.or(detail)
}

async fn handle_list(state: AppState) -> Result<impl Reply, Rejection> {
    let roadmaps = guarded(state.store_timeout, state.store.roadmaps().list_roadmaps())
        .await
        .map_err(reject::api)?;
    Ok(warp::reply::json(&roadmaps))
}

async fn handle_detail(roadmap_id: String, state: AppState) -> Result<impl Reply, Rejection> {
    let roadmap = guarded(
        state.store_timeout,
        state.store.roadmaps().get_roadmap(&roadmap_id),
    )
    .await
    .map_err(reject::api)?
    .ok_or_else(|| reject::api(FinLearnError::NotFound(format!("roadmap {}", roadmap_id))))?;

    Ok(warp::reply::json(&roadmap))
}
