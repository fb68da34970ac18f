//! Admin console endpoints: content and roadmap authoring, user listing
//!
//! Every route here is an admin-area resource: anonymous requests are told
//! to authenticate, authenticated non-admins get a hard deny.

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;
use warp::{Filter, Rejection, Reply};

use super::{auth_header, reject, with_state, AppState};
use crate::access::Resource;
use crate::error::FinLearnError;
use crate::storage::guarded;
use crate::storage::traits::{
    ContentItem, ContentKind, Difficulty, PublishStatus, Roadmap, RoadmapStep,
};

/// Authoring payload for a content item
#[derive(Debug, Deserialize)]
pub struct ContentInput {
    pub title: String,
    pub summary: String,
    pub body: String,
    pub kinds: Vec<ContentKind>,
    pub difficulty: Difficulty,
    pub premium: bool,
    pub status: PublishStatus,
}

impl ContentInput {
    fn validate(&self) -> crate::error::Result<()> {
        if self.title.trim().is_empty() {
            return Err(FinLearnError::Validation("title is required".to_string()));
        }
        if self.kinds.is_empty() {
            return Err(FinLearnError::Validation(
                "at least one content type tag is required".to_string(),
            ));
        }
        Ok(())
    }

    fn into_item(self, id: String) -> ContentItem {
        let now = Utc::now();
        ContentItem {
            id,
            title: self.title,
            summary: self.summary,
            body: self.body,
            kinds: self.kinds,
            difficulty: self.difficulty,
            premium: self.premium,
            status: self.status,
            views: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Authoring payload for a roadmap; step lists arrive in display order and
/// are stored verbatim
#[derive(Debug, Deserialize)]
pub struct RoadmapInput {
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub beginner: Vec<RoadmapStep>,
    #[serde(default)]
    pub intermediate: Vec<RoadmapStep>,
    #[serde(default)]
    pub advanced: Vec<RoadmapStep>,
}

impl RoadmapInput {
    fn validate(&self) -> crate::error::Result<()> {
        if self.title.trim().is_empty() {
            return Err(FinLearnError::Validation("title is required".to_string()));
        }
        Ok(())
    }

    fn into_roadmap(self, id: String) -> Roadmap {
        let now = Utc::now();
        Roadmap {
            id,
            title: self.title,
            description: self.description,
            category: self.category,
            beginner: self.beginner,
            intermediate: self.intermediate,
            advanced: self.advanced,
            created_at: now,
            updated_at: now,
        }
    }
}

fn require_admin(state: &AppState, auth: Option<&str>) -> crate::error::Result<()> {
    // Anonymous -> redirect to the admin login; non-admin -> hard deny
    state.authorized_claims(auth, Resource::AdminArea)?;
    Ok(())
}

pub fn routes(state: AppState) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let content_list = warp::path!("api" / "admin" / "content")
        .and(warp::get())
        .and(auth_header())
        .and(with_state(state.clone()))
        .and_then(handle_content_list);

    let content_create = warp::path!("api" / "admin" / "content")
        .and(warp::post())
        .and(auth_header())
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(handle_content_create);

    let content_update = warp::path!("api" / "admin" / "content" / String)
        .and(warp::put())
        .and(auth_header())
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(handle_content_update);

    let content_delete = warp::path!("api" / "admin" / "content" / String)
        .and(warp::delete())
        .and(auth_header())
        .and(with_state(state.clone()))
        .and_then(handle_content_delete);

    let roadmap_create = warp::path!("api" / "admin" / "roadmaps")
        .and(warp::post())
        .and(auth_header())
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(handle_roadmap_create);

    let roadmap_update = warp::path!("api" / "admin" / "roadmaps" / String)
        .and(warp::put())
        .and(auth_header())
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(handle_roadmap_update);

    let roadmap_delete = warp::path!("api" / "admin" / "roadmaps" / String)
        .and(warp::delete())
        .and(auth_header())
        .and(with_state(state.clone()))
        .and_then(handle_roadmap_delete);

    let user_list = warp::path!("api" / "admin" / "users")
        .and(warp::get())
        .and(auth_header())
        .and(with_state(state))
        .and_then(handle_user_list);

    content_list
        .or(content_create)
        .or(content_update)
        .or(content_delete)
        .or(roadmap_create)
        .or(roadmap_update)
        .or(roadmap_delete)
        .or(user_list)
}

async fn handle_content_list(
    auth: Option<String>,
    state: AppState,
) -> Result<impl Reply, Rejection> {
    require_admin(&state, auth.as_deref()).map_err(reject::api)?;

    // Admin console shows everything, drafts included
    let items = guarded(state.store_timeout, state.store.content().list_items())
        .await
        .map_err(reject::api)?;
    Ok(warp::reply::json(&items))
}

async fn handle_content_create(
    auth: Option<String>,
    input: ContentInput,
    state: AppState,
) -> Result<impl Reply, Rejection> {
    require_admin(&state, auth.as_deref()).map_err(reject::api)?;
    input.validate().map_err(reject::api)?;

    let item = input.into_item(Uuid::new_v4().to_string());
    let id = guarded(state.store_timeout, state.store.content().create_item(item))
        .await
        .map_err(reject::api)?;

    log::info!("Created content item {}", id);
    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({ "id": id })),
        warp::http::StatusCode::CREATED,
    ))
}

async fn handle_content_update(
    item_id: String,
    auth: Option<String>,
    input: ContentInput,
    state: AppState,
) -> Result<impl Reply, Rejection> {
    require_admin(&state, auth.as_deref()).map_err(reject::api)?;
    input.validate().map_err(reject::api)?;

    let item = input.into_item(item_id.clone());
    guarded(state.store_timeout, state.store.content().update_item(item))
        .await
        .map_err(reject::api)?;

    log::info!("Updated content item {}", item_id);
    Ok(warp::reply::json(&serde_json::json!({ "id": item_id })))
}

async fn handle_content_delete(
    item_id: String,
    auth: Option<String>,
    state: AppState,
) -> Result<impl Reply, Rejection> {
    require_admin(&state, auth.as_deref()).map_err(reject::api)?;

    guarded(state.store_timeout, state.store.content().delete_item(&item_id))
        .await
        .map_err(reject::api)?;

    log::info!("Deleted content item {}", item_id);
    Ok(warp::reply::json(&serde_json::json!({ "deleted": item_id })))
}

async fn handle_roadmap_create(
    auth: Option<String>,
    input: RoadmapInput,
    state: AppState,
) -> Result<impl Reply, Rejection> {
    require_admin(&state, auth.as_deref()).map_err(reject::api)?;
    input.validate().map_err(reject::api)?;

    let roadmap = input.into_roadmap(Uuid::new_v4().to_string());
    let id = guarded(
        state.store_timeout,
        state.store.roadmaps().create_roadmap(roadmap),
    )
    .await
    .map_err(reject::api)?;

    log::info!("Created roadmap {}", id);
    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({ "id": id })),
        warp::http::StatusCode::CREATED,
    ))
}

async fn handle_roadmap_update(
    roadmap_id: String,
    auth: Option<String>,
    input: RoadmapInput,
    state: AppState,
) -> Result<impl Reply, Rejection> {
    require_admin(&state, auth.as_deref()).map_err(reject::api)?;
    input.validate().map_err(reject::api)?;

    let roadmap = input.into_roadmap(roadmap_id.clone());
    guarded(
        state.store_timeout,
        state.store.roadmaps().update_roadmap(roadmap),
    )
    .await
    .map_err(reject::api)?;

    log::info!("Updated roadmap {}", roadmap_id);
    Ok(warp::reply::json(&serde_json::json!({ "id": roadmap_id })))
}

async fn handle_roadmap_delete(
    roadmap_id: String,
    auth: Option<String>,
    state: AppState,
) -> Result<impl Reply, Rejection> {
    require_admin(&state, auth.as_deref()).map_err(reject::api)?;

    guarded(
        state.store_timeout,
        state.store.roadmaps().delete_roadmap(&roadmap_id),
    )
    .await
    .map_err(reject::api)?;

    log::info!("Deleted roadmap {}", roadmap_id);
    Ok(warp::reply::json(&serde_json::json!({ "deleted": roadmap_id })))
}

async fn handle_user_list(auth: Option<String>, state: AppState) -> Result<impl Reply, Rejection> {
    require_admin(&state, auth.as_deref()).map_err(reject::api)?;

    let users = guarded(state.store_timeout, state.store.users().list_users())
        .await
        .map_err(reject::api)?;

    // Sanitized profiles only; password hashes never leave the store layer
    let profiles: Vec<_> = users.iter().map(|u| u.profile()).collect();
    Ok(warp::reply::json(&profiles))
}
