use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{Lobby, LobbyId, Sentiment, Tag, TagTally};
use crate::services::{
    onboarding, LobbyMembershipView, RecommendationRequestCoordinator, RecommendationState,
    RecommendationView, SessionView,
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct CreateLobbyBody {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyIdResponse {
    pub lobby_id: LobbyId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionBody {
    pub lobby_id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ToggleBody {
    pub tag: Tag,
    pub sentiment: Sentiment,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyResponse {
    #[serde(flatten)]
    pub lobby: Lobby,
    pub tally: Vec<TagTally>,
    pub recommendation_status: RecommendationView,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Create a new lobby
pub async fn create_lobby(
    State(state): State<AppState>,
    Json(body): Json<CreateLobbyBody>,
) -> AppResult<(StatusCode, Json<LobbyIdResponse>)> {
    let lobby_id = onboarding::create_lobby(state.directory.as_ref(), &body.name).await?;
    Ok((StatusCode::CREATED, Json(LobbyIdResponse { lobby_id })))
}

/// Open an onboarding session for a lobby
pub async fn start_session(
    State(state): State<AppState>,
    Json(body): Json<StartSessionBody>,
) -> AppResult<(StatusCode, Json<SessionView>)> {
    let view = onboarding::start_session(&state.sessions, &body.lobby_id, &body.name).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// Current state of an onboarding session
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<SessionView>> {
    let view = onboarding::session_view(&state.sessions, session_id).await?;
    Ok(Json(view))
}

/// Like or dislike a tag from the session's catalog
pub async fn toggle_tag(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(body): Json<ToggleBody>,
) -> AppResult<Json<SessionView>> {
    let view = onboarding::toggle_tag(
        &state.sessions,
        state.suggester.clone(),
        session_id,
        body.tag,
        body.sentiment,
    )
    .await?;
    Ok(Json(view))
}

/// Submit preferences and join the lobby
pub async fn commit_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<LobbyIdResponse>> {
    let lobby_id =
        onboarding::commit_session(&state.sessions, state.directory.as_ref(), session_id).await?;
    Ok(Json(LobbyIdResponse { lobby_id }))
}

/// Lobby roster plus recommendation. Each call is a fresh view activation.
pub async fn get_lobby(
    State(state): State<AppState>,
    Path(lobby_id): Path<String>,
) -> AppResult<Json<LobbyResponse>> {
    let lobby_id = LobbyId::parse(&lobby_id)?;

    let mut lobby = LobbyMembershipView::new(state.directory.clone())
        .load(&lobby_id)
        .await?;

    let coordinator = RecommendationRequestCoordinator::new(lobby_id, state.recommender.clone());
    let outcome = coordinator.activate().await;
    if let RecommendationState::Ready(text) = &outcome {
        lobby.recommendation = Some(text.clone());
    }

    Ok(Json(LobbyResponse {
        tally: lobby.tag_tally(),
        lobby,
        recommendation_status: RecommendationView::from(&outcome),
    }))
}
