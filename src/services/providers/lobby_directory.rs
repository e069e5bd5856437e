/// Lobby Directory Service client
///
/// Lobby creation and joins change remote state and are sent once; the
/// membership read is idempotent and goes through the retry policy.
use crate::{
    error::{AppError, AppResult},
    models::{
        ApiMembersResponse, CreateLobbyRequest, CreateLobbyResponse, Interests, JoinLobbyRequest,
        LobbyId, Participant,
    },
    retrying,
    services::providers::{ensure_success, LobbyDirectory, RetryPolicy},
};
use reqwest::Client as HttpClient;

const SERVICE: &str = "lobby_directory";

#[derive(Clone)]
pub struct HttpLobbyDirectory {
    http_client: HttpClient,
    api_url: String,
    retry: RetryPolicy,
}

impl HttpLobbyDirectory {
    pub fn new(http_client: HttpClient, api_url: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            http_client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            retry,
        }
    }

    async fn fetch_members_once(&self, lobby_id: &LobbyId) -> AppResult<Vec<Participant>> {
        let url = format!("{}/lobby/{}", self.api_url, lobby_id);
        let response = self.http_client.get(&url).send().await?;
        let response = ensure_success(SERVICE, response).await.map_err(|e| match e {
            AppError::NotFound(_) => AppError::NotFound(format!("Lobby {} not found", lobby_id)),
            other => other,
        })?;

        let body: ApiMembersResponse = response.json().await?;
        Ok(body.members.into_iter().map(Participant::from).collect())
    }
}

#[async_trait::async_trait]
impl LobbyDirectory for HttpLobbyDirectory {
    async fn create_lobby(&self, name: &str) -> AppResult<LobbyId> {
        let url = format!("{}/create-lobby", self.api_url);
        let response = self
            .http_client
            .post(&url)
            .json(&CreateLobbyRequest {
                name: name.to_string(),
            })
            .send()
            .await?;
        let response = ensure_success(SERVICE, response).await?;

        let body: CreateLobbyResponse = response.json().await?;
        let raw_id = body.lobby_id.ok_or_else(|| AppError::Upstream {
            service: SERVICE,
            status: reqwest::StatusCode::OK,
            message: "Failed to create lobby".to_string(),
        })?;

        // The id becomes user-facing, so a malformed one is the upstream's fault
        let lobby_id = LobbyId::parse(&raw_id).map_err(|_| AppError::Upstream {
            service: SERVICE,
            status: reqwest::StatusCode::OK,
            message: format!("malformed lobby id {:?}", raw_id),
        })?;

        tracing::info!(lobby_id = %lobby_id, provider = SERVICE, "Lobby created");

        Ok(lobby_id)
    }

    async fn join_lobby(
        &self,
        lobby_id: &LobbyId,
        name: &str,
        interests: &Interests,
    ) -> AppResult<()> {
        let url = format!("{}/join-lobby", self.api_url);
        let response = self
            .http_client
            .post(&url)
            .json(&JoinLobbyRequest {
                lobby_id: lobby_id.clone(),
                name: name.to_string(),
                interests: interests.clone(),
            })
            .send()
            .await?;
        ensure_success(SERVICE, response).await?;

        tracing::info!(
            lobby_id = %lobby_id,
            likes = interests.likes.len(),
            dislikes = interests.dislikes.len(),
            provider = SERVICE,
            "Participant joined lobby"
        );

        Ok(())
    }

    async fn fetch_members(&self, lobby_id: &LobbyId) -> AppResult<Vec<Participant>> {
        let members = retrying!(self.retry, "fetch_members", async {
            self.fetch_members_once(lobby_id).await
        })?;

        tracing::debug!(
            lobby_id = %lobby_id,
            members = members.len(),
            provider = SERVICE,
            "Membership fetched"
        );

        Ok(members)
    }

    fn name(&self) -> &'static str {
        SERVICE
    }
}
