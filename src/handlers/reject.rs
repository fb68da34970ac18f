//! Rejection recovery: maps the error taxonomy onto HTTP replies
//!
//! Authentication failures carry a `reauth` flag so the client guard knows
//! to clear its mirror and redirect to login; authorization failures do
//! not, and render as an access-denied state instead.

use std::convert::Infallible;

use serde_json::json;
use warp::http::StatusCode;
use warp::{Rejection, Reply};

use crate::error::FinLearnError;

/// Wrapper carrying a crate error through warp's rejection machinery
#[derive(Debug)]
pub struct ApiError(pub FinLearnError);

impl warp::reject::Reject for ApiError {}

/// Convert a crate error into a rejection
pub fn api(error: FinLearnError) -> Rejection {
    warp::reject::custom(ApiError(error))
}

/// Terminal rejection handler producing JSON error bodies
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, body) = if let Some(ApiError(e)) = err.find::<ApiError>() {
        let status =
            StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut body = json!({
            "error": e.to_string(),
            "reauth": e.requires_reauth(),
        });
        // Anonymous-access failures name the login page to send the user to
        if let Some(target) = e.redirect_target() {
            body["redirect"] = json!(target);
        }
        (status, body)
    } else if err.is_not_found() {
        (
            StatusCode::NOT_FOUND,
            json!({ "error": "Not found", "reauth": false }),
        )
    } else if err.find::<warp::filters::body::BodyDeserializeError>().is_some() {
        (
            StatusCode::BAD_REQUEST,
            json!({ "error": "Malformed request body", "reauth": false }),
        )
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            json!({ "error": "Method not allowed", "reauth": false }),
        )
    } else {
        log::error!("Unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": "Internal server error", "reauth": false }),
        )
    };

    Ok(warp::reply::with_status(warp::reply::json(&body), status))
}
