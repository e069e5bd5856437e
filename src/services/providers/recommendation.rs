use crate::{
    error::AppResult,
    models::LobbyId,
    retrying,
    services::providers::{ensure_success, Recommender, RetryPolicy},
};
use reqwest::Client as HttpClient;

const SERVICE: &str = "recommender";

/// Recommendation Service client. The body is markdown and is passed through
/// byte for byte.
#[derive(Clone)]
pub struct HttpRecommender {
    http_client: HttpClient,
    api_url: String,
    retry: RetryPolicy,
}

impl HttpRecommender {
    pub fn new(http_client: HttpClient, api_url: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            http_client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            retry,
        }
    }

    async fn fetch_once(&self, lobby_id: &LobbyId) -> AppResult<String> {
        let url = format!("{}/lobby/{}/recommendation", self.api_url, lobby_id);
        let response = self.http_client.get(&url).send().await?;
        let response = ensure_success(SERVICE, response).await?;
        Ok(response.text().await?)
    }
}

#[async_trait::async_trait]
impl Recommender for HttpRecommender {
    async fn fetch_recommendation(&self, lobby_id: &LobbyId) -> AppResult<String> {
        let text = retrying!(self.retry, "fetch_recommendation", async {
            self.fetch_once(lobby_id).await
        })?;

        tracing::info!(
            lobby_id = %lobby_id,
            bytes = text.len(),
            provider = SERVICE,
            "Recommendation fetched"
        );

        Ok(text)
    }

    fn name(&self) -> &'static str {
        SERVICE
    }
}
