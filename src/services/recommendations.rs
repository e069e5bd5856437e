use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use crate::{models::LobbyId, services::providers::Recommender};

/// Lifecycle of one recommendation fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecommendationState {
    Idle,
    Pending,
    Ready(String),
    Failed(String),
}

impl RecommendationState {
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Ready(_) | Self::Failed(_))
    }
}

/// Wire form of [`RecommendationState`]; the text itself travels with the lobby
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecommendationView {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&RecommendationState> for RecommendationView {
    fn from(state: &RecommendationState) -> Self {
        let (status, error) = match state {
            RecommendationState::Idle => ("idle", None),
            RecommendationState::Pending => ("pending", None),
            RecommendationState::Ready(_) => ("ready", None),
            RecommendationState::Failed(message) => ("failed", Some(message.clone())),
        };
        Self { status, error }
    }
}

/// Drives a single lobby view activation: at most one fetch, no retry after
/// failure. A new activation needs a new coordinator.
pub struct RecommendationRequestCoordinator {
    lobby_id: LobbyId,
    recommender: Arc<dyn Recommender>,
    state: watch::Sender<RecommendationState>,
}

impl RecommendationRequestCoordinator {
    pub fn new(lobby_id: LobbyId, recommender: Arc<dyn Recommender>) -> Self {
        let (state, _) = watch::channel(RecommendationState::Idle);
        Self {
            lobby_id,
            recommender,
            state,
        }
    }

    pub fn lobby_id(&self) -> &LobbyId {
        &self.lobby_id
    }

    pub fn state(&self) -> RecommendationState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<RecommendationState> {
        self.state.subscribe()
    }

    /// Moves Idle to Pending and runs the fetch. Later calls start nothing and
    /// wait for the first one to settle.
    pub async fn activate(&self) -> RecommendationState {
        let started = self.state.send_if_modified(|state| {
            if *state == RecommendationState::Idle {
                *state = RecommendationState::Pending;
                true
            } else {
                false
            }
        });

        if !started {
            return self.settled().await;
        }

        tracing::debug!(lobby_id = %self.lobby_id, "Requesting recommendation");

        let next = match self.recommender.fetch_recommendation(&self.lobby_id).await {
            Ok(text) => RecommendationState::Ready(text),
            Err(e) => {
                tracing::warn!(
                    lobby_id = %self.lobby_id,
                    provider = self.recommender.name(),
                    error = %e,
                    "Recommendation fetch failed"
                );
                RecommendationState::Failed(e.user_message())
            }
        };

        self.state.send_replace(next.clone());
        next
    }

    async fn settled(&self) -> RecommendationState {
        let mut rx = self.state.subscribe();
        let settled = rx
            .wait_for(RecommendationState::is_settled)
            .await
            .map(|state| state.clone());
        settled.unwrap_or_else(|_| self.state())
    }
}
