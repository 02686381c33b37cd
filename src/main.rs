mod app;
mod auth;
mod clock;
mod config;
mod db;
mod error;
mod gamification;
mod logs;
mod meals;
mod pagination;
mod profiles;
mod schedules;
mod state;
mod stats;
mod trainers;
mod workouts;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "peakpower=debug,axum=info,tower_http=info".to_string());
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

    let state = state::AppState::init().await?;
    db::migrate(&state.db).await?;

    let server = state.config.server.clone();
    app::serve(app::build_app(state), &server).await
}
