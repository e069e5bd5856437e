use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::services::providers::{
    HttpLobbyDirectory, HttpRecommender, HttpTagSuggester, LobbyDirectory, Recommender,
    TagSuggester,
};
use crate::services::SessionStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn LobbyDirectory>,
    pub suggester: Arc<dyn TagSuggester>,
    pub recommender: Arc<dyn Recommender>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    /// Creates state around the given collaborators with no open sessions
    pub fn new(
        directory: Arc<dyn LobbyDirectory>,
        suggester: Arc<dyn TagSuggester>,
        recommender: Arc<dyn Recommender>,
    ) -> Self {
        Self {
            directory,
            suggester,
            recommender,
            sessions: Arc::new(SessionStore::new()),
        }
    }

    /// Expires onboarding sessions left idle for longer than `ttl`
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.sessions = Arc::new(SessionStore::with_ttl(ttl));
        self
    }

    /// Wires the HTTP clients described by `config`
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http_client = config.http_client()?;
        let retry = config.retry_policy();

        Ok(Self::new(
            Arc::new(HttpLobbyDirectory::new(
                http_client.clone(),
                config.lobby_service_url.clone(),
                retry,
            )),
            Arc::new(HttpTagSuggester::new(
                http_client.clone(),
                config.suggestion_service_url.clone(),
                retry,
            )),
            Arc::new(HttpRecommender::new(
                http_client,
                config.recommendation_service_url.clone(),
                retry,
            )),
        )
        .with_session_ttl(config.session_ttl()))
    }
}
