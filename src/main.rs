use bananatrail_api::api::{create_router, AppState};
use bananatrail_api::config::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    // Initialize application state
    let state = AppState::from_config(&config)?;
    state.sessions.spawn_sweeper(config.session_ttl());

    // Create the router with all routes
    let app = create_router(state);

    // Start the server
    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        lobby_service = %config.lobby_service_url,
        suggestion_service = %config.suggestion_service_url,
        session_ttl_secs = config.session_ttl_secs,
        "Server running"
    );
    axum::serve(listener, app).await?;

    Ok(())
}
