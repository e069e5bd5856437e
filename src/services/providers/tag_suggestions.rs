use crate::{
    error::AppResult,
    models::{SuggestionRequest, SuggestionResponse, Tag},
    retrying,
    services::providers::{ensure_success, RetryPolicy, TagSuggester},
};
use reqwest::Client as HttpClient;

const SERVICE: &str = "tag_suggester";

/// Tag Suggestion Service client (`POST /generate-interests`)
#[derive(Clone)]
pub struct HttpTagSuggester {
    http_client: HttpClient,
    api_url: String,
    retry: RetryPolicy,
}

impl HttpTagSuggester {
    pub fn new(http_client: HttpClient, api_url: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            http_client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            retry,
        }
    }

    async fn suggest_once(&self, request: &SuggestionRequest) -> AppResult<Vec<Tag>> {
        let url = format!("{}/generate-interests", self.api_url);
        let response = self.http_client.post(&url).json(request).send().await?;
        let response = ensure_success(SERVICE, response).await?;

        let body: SuggestionResponse = response.json().await?;
        Ok(body.new_tags)
    }
}

#[async_trait::async_trait]
impl TagSuggester for HttpTagSuggester {
    async fn suggest_tags(&self, liked: &[Tag], disliked: &[Tag]) -> AppResult<Vec<Tag>> {
        let request = SuggestionRequest {
            liked_tags: liked.to_vec(),
            disliked_tags: disliked.to_vec(),
        };

        let new_tags = retrying!(self.retry, "suggest_tags", async {
            self.suggest_once(&request).await
        })?;

        tracing::info!(
            liked = liked.len(),
            disliked = disliked.len(),
            suggested = new_tags.len(),
            provider = SERVICE,
            "Tag suggestions fetched"
        );

        Ok(new_tags)
    }

    fn name(&self) -> &'static str {
        SERVICE
    }
}
