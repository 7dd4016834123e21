use axum::http::{header, HeaderValue, Method};
use axum::Router;
use domain::login::LoginFlow;
use log::*;
use service::config::Config;
use std::sync::Arc;
use time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

pub use error::{Error, Result};

mod controller;
mod error;
mod extractors;
mod params;
pub mod router;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub login_flow: Arc<LoginFlow>,
}

impl AppState {
    pub fn new(config: Config, login_flow: Arc<LoginFlow>) -> Self {
        Self { config, login_flow }
    }
}

/// Build the complete application: routes, cookie sessions and CORS.
pub fn app(app_state: AppState) -> Router {
    let config = &app_state.config;

    // Lax so the session cookie survives the top-level redirect back from Google.
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(config.is_production())
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(
            config.backend_session_expiry_seconds as i64,
        )));

    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    // Credentials cannot be combined with a wildcard origin.
    let cors = if allows_any_origin(config) {
        warn!("CORS allows any origin; session cookies will not be sent cross-origin");
        cors.allow_origin(AllowOrigin::any())
    } else {
        cors.allow_credentials(true).allow_origin(allowed_origins(config))
    };

    router::define_routes(app_state)
        .layer(session_layer)
        .layer(cors)
}

fn allows_any_origin(config: &Config) -> bool {
    config.allowed_origins.iter().any(|origin| origin.trim() == "*")
}

fn allowed_origins(config: &Config) -> Vec<HeaderValue> {
    config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {origin}");
                None
            }
        })
        .collect()
}

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let host = app_state
        .config
        .interface
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let port = app_state.config.port;
    let server_url = format!("{host}:{port}");

    info!(
        "Server starting... listening for connections on http://{} ({})",
        server_url,
        app_state.config.runtime_env()
    );

    let listener = TcpListener::bind(&server_url).await?;
    axum::serve(listener, app(app_state)).await
}
