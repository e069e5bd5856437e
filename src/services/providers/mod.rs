/// External collaborator abstractions
///
/// The engine talks to three services it does not own: the Lobby Directory
/// (create, join, membership), the Tag Suggestion Service and the
/// Recommendation Service. Each sits behind a trait so the HTTP clients can be
/// swapped for fakes in tests.
use crate::{
    error::{AppError, AppResult},
    models::{Interests, LobbyId, Participant, Tag},
};

pub mod lobby_directory;
pub mod recommendation;
pub mod retry;
pub mod tag_suggestions;

pub use lobby_directory::HttpLobbyDirectory;
pub use recommendation::HttpRecommender;
pub use retry::RetryPolicy;
pub use tag_suggestions::HttpTagSuggester;

/// Persists lobbies and their membership
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait LobbyDirectory: Send + Sync {
    /// Creates a lobby and returns its six-digit id
    async fn create_lobby(&self, name: &str) -> AppResult<LobbyId>;

    /// Adds a participant with committed interests. All-or-nothing.
    async fn join_lobby(&self, lobby_id: &LobbyId, name: &str, interests: &Interests)
        -> AppResult<()>;

    /// Current roster in join order
    async fn fetch_members(&self, lobby_id: &LobbyId) -> AppResult<Vec<Participant>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Proposes new tags from what a participant already picked
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TagSuggester: Send + Sync {
    async fn suggest_tags(&self, liked: &[Tag], disliked: &[Tag]) -> AppResult<Vec<Tag>>;

    fn name(&self) -> &'static str;
}

/// Produces the group recommendation for a lobby as raw markdown
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Recommender: Send + Sync {
    async fn fetch_recommendation(&self, lobby_id: &LobbyId) -> AppResult<String>;

    fn name(&self) -> &'static str;
}

/// Maps a non-2xx reply to an error, keeping 404 distinct
pub(crate) async fn ensure_success(
    service: &'static str,
    response: reqwest::Response,
) -> AppResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_default();

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(AppError::NotFound(format!("{} has no resource at {}", service, url)));
    }

    Err(AppError::Upstream {
        service,
        status,
        message: body,
    })
}
