use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Routes under /api
fn api_routes() -> Router<AppState> {
    Router::new()
        // Lobbies
        .route("/lobbies", post(handlers::create_lobby))
        .route("/lobbies/:lobby_id", get(handlers::get_lobby))
        // Onboarding sessions
        .route("/sessions", post(handlers::start_session))
        .route("/sessions/:session_id", get(handlers::get_session))
        .route("/sessions/:session_id/toggle", post(handlers::toggle_tag))
        .route("/sessions/:session_id/commit", post(handlers::commit_session))
}
