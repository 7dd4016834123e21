use crate::controller::Logged;
use crate::extractors::session_key::SessionKey;
use crate::{AppState, Error};

use axum::extract::State;
use axum::response::{IntoResponse, Json};
use domain::contacts::NormalizedProfile;
use domain::directory;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Profile {
    userinfo: NormalizedProfile,
}

/// GET the signed-in user's profile
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "`{logged: true, userinfo}`, or `{logged: false, message}` without a login"),
        (status = 500, description = "Google returned a profile without a primary email"),
        (status = 502, description = "Google could not be reached or rejected the request"),
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn read(
    State(app_state): State<AppState>,
    SessionKey(session_key): SessionKey,
) -> Result<impl IntoResponse, Error> {
    let userinfo = directory::profile(&app_state.login_flow, &session_key).await?;

    Ok(Json(Logged::new(Profile { userinfo })))
}
