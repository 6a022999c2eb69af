mod app;
mod auth;
mod company;
mod config;
mod db;
mod error;
mod extract;
mod response;
mod state;
mod storage;
#[cfg(test)]
mod testing;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "companyhub=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    tracing::debug!(?config, "configuration loaded");
    let addr = config.bind_addr()?;

    auth::password::warm_up();

    let db = db::connect(&config.database_url).await?;
    db::migrate(&db).await;

    let app_state = AppState::init(&config, db).await?;
    app::serve(app::build_app(app_state), addr).await
}
