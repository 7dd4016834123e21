use crate::controller::Logged;
use crate::extractors::session_key::SessionKey;
use crate::params::connection::IndexParams;
use crate::{AppState, Error};

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Json};
use domain::directory;
use log::*;

/// GET the user's connections grouped by email domain, with their profile
#[utoipa::path(
    get,
    path = "/connections",
    params(IndexParams),
    responses(
        (status = 200, description = "`{logged: true, userinfo, connections, total_items, total_people}`, or `{logged: false, message}` without a login"),
        (status = 500, description = "Google returned a profile this service cannot use"),
        (status = 502, description = "Google could not be reached or rejected the request"),
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn index(
    State(app_state): State<AppState>,
    SessionKey(session_key): SessionKey,
    Query(params): Query<IndexParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET connections grouped by domain ({:?})", params.filter());

    let view =
        directory::connections_by_domain(&app_state.login_flow, &session_key, params.filter())
            .await?;

    Ok(Json(Logged::new(view)))
}

/// GET the user's connections as a flat list
#[utoipa::path(
    get,
    path = "/contacts",
    params(IndexParams),
    responses(
        (status = 200, description = "`{logged: true, connections, total_items, total_people}`, or `{logged: false, message}` without a login"),
        (status = 502, description = "Google could not be reached or rejected the request"),
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn contacts(
    State(app_state): State<AppState>,
    SessionKey(session_key): SessionKey,
    Query(params): Query<IndexParams>,
) -> Result<impl IntoResponse, Error> {
    let list = directory::contacts(&app_state.login_flow, &session_key, params.filter()).await?;

    Ok(Json(Logged::new(list)))
}
