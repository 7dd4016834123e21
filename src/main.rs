use domain::gateway::google::new_provider;
use domain::login::LoginFlow;
use domain::MemoryStorage;
use log::{error, info};
use service::{config::Config, logging::Logger};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config as &Config);

    info!("Starting up contacts directory [{}]...", config.runtime_env());

    let provider = match new_provider(&config) {
        Ok(provider) => Arc::new(provider),
        Err(e) => {
            error!("Failed to configure the Google provider: {e}");
            std::process::exit(1);
        }
    };

    let pending_ttl = i64::try_from(config.login_state_ttl_secs)
        .ok()
        .and_then(chrono::Duration::try_seconds);
    let Some(pending_ttl) = pending_ttl else {
        error!(
            "Login state TTL of {} seconds is out of range",
            config.login_state_ttl_secs
        );
        std::process::exit(1);
    };

    let login_flow =
        LoginFlow::new(provider, Arc::new(MemoryStorage::new())).with_pending_ttl(pending_ttl);

    let app_state = web::AppState::new(config, Arc::new(login_flow));

    if let Err(e) = web::init_server(app_state).await {
        error!("Server exited with an error: {e}");
        std::process::exit(1);
    }
}
