//! Controller for the Google login flow.
//!
//! These endpoints are reached through browser redirects, so every response is either a
//! redirect or a small `{logged, message}` JSON body.

use crate::controller::LoginStatus;
use crate::error::WebErrorKind;
use crate::extractors::session_key::SessionKey;
use crate::params::oauth::CallbackParams;
use crate::{AppState, Error};

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Json, Redirect};
use log::*;
use service::config::Config;

const CALLBACK_PATH: &str = "/login/callback";

/// GET /login
///
/// Starts a login and redirects to Google's consent screen.
#[utoipa::path(
    get,
    path = "/login",
    responses(
        (status = 307, description = "Redirect to Google OAuth"),
        (status = 500, description = "Server error (OAuth not configured)"),
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    SessionKey(session_key): SessionKey,
    headers: HeaderMap,
) -> Result<impl IntoResponse, Error> {
    let redirect_uri = callback_url(&app_state.config, &headers)?;
    let url = app_state
        .login_flow
        .begin_login(&session_key, &redirect_uri)
        .await?;

    Ok(Redirect::temporary(&url))
}

/// GET /login/callback
///
/// Completes the login Google redirected back from.
#[utoipa::path(
    get,
    path = "/login/callback",
    params(CallbackParams),
    responses(
        (status = 200, description = "Logged in", body = LoginStatus),
        (status = 400, description = "Invalid callback parameters or state mismatch"),
        (status = 502, description = "Token exchange failed"),
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn callback(
    State(app_state): State<AppState>,
    SessionKey(session_key): SessionKey,
    headers: HeaderMap,
    Query(params): Query<CallbackParams>,
) -> Result<impl IntoResponse, Error> {
    if let Some(error) = params.error {
        warn!("Google declined the authorization request: {error}");
        return Err(Error::Web(WebErrorKind::Input));
    }

    let (code, state) = match (params.code, params.state) {
        (Some(code), Some(state)) => (code, state),
        _ => {
            warn!("Login callback is missing its code or state");
            return Err(Error::Web(WebErrorKind::Input));
        }
    };

    let redirect_uri = callback_url(&app_state.config, &headers)?;
    app_state
        .login_flow
        .complete_login(&session_key, &state, &code, &redirect_uri)
        .await?;

    Ok(Json(LoginStatus::logged_in()))
}

/// GET /logout
///
/// Forgets the session's credential. Safe to call when not logged in.
#[utoipa::path(
    get,
    path = "/logout",
    responses(
        (status = 200, description = "Logged out", body = LoginStatus),
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn logout(
    State(app_state): State<AppState>,
    SessionKey(session_key): SessionKey,
) -> Result<impl IntoResponse, Error> {
    app_state.login_flow.logout(&session_key).await?;
    Ok(Json(LoginStatus::logged_out()))
}

/// The callback URL Google should redirect to, from the configured public base URL or
/// else the request's `Host` header.
fn callback_url(config: &Config, headers: &HeaderMap) -> Result<String, Error> {
    if let Some(base_url) = config.public_base_url() {
        return Ok(format!("{}{CALLBACK_PATH}", base_url.trim_end_matches('/')));
    }

    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            warn!("Cannot build the callback URL without a Host header");
            Error::Web(WebErrorKind::Input)
        })?;

    Ok(format!("http://{host}{CALLBACK_PATH}"))
}
