//! Registration and login endpoints

use serde::{Deserialize, Serialize};
use warp::{Filter, Rejection, Reply};

use super::{reject, with_state, AppState};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub fn routes(state: AppState) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let register = warp::path!("api" / "auth" / "register")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(handle_register);

    let login = warp::path!("api" / "auth" / "login")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_state(state))
        .and_then(handle_login);

    // Sessions are stateless; logout is a client-side reset (discard the
    // token, clear the guard mirror). The endpoint exists so clients have
    // something to call.
    let logout = warp::path!("api" / "auth" / "logout")
        .and(warp::post())
        .map(|| warp::reply::json(&serde_json::json!({ "msg": "logged out" })));

    register.or(login).or(logout)
}

async fn handle_register(
    request: RegisterRequest,
    state: AppState,
) -> Result<impl Reply, Rejection> {
    let profile = state
        .auth
        .register(&request.name, &request.email, &request.password)
        .await
        .map_err(reject::api)?;

    Ok(warp::reply::with_status(
        warp::reply::json(&RegisterResponse {
            id: profile.id,
            name: profile.name,
        }),
        warp::http::StatusCode::CREATED,
    ))
}

async fn handle_login(request: LoginRequest, state: AppState) -> Result<impl Reply, Rejection> {
    let outcome = state
        .auth
        .login(&request.email, &request.password)
        .await
        .map_err(reject::api)?;

    Ok(warp::reply::json(&outcome))
}
