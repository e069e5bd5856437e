// Shared fakes and stub servers for integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bananatrail_api::error::{AppError, AppResult};
use bananatrail_api::models::{Interests, LobbyId, Participant, Tag};
use bananatrail_api::services::providers::{LobbyDirectory, Recommender, TagSuggester};

// In-memory directory that hands out sequential lobby ids.
#[derive(Default)]
pub struct FakeDirectory {
    lobbies: Mutex<HashMap<String, Vec<Participant>>>,
    pub fail_joins: bool,
}

impl FakeDirectory {
    pub fn with_lobby(lobby_id: &str) -> Self {
        let directory = Self::default();
        directory
            .lobbies
            .lock()
            .unwrap()
            .insert(lobby_id.to_string(), Vec::new());
        directory
    }

    pub fn rejecting_joins(lobby_id: &str) -> Self {
        Self {
            fail_joins: true,
            ..Self::with_lobby(lobby_id)
        }
    }

    pub fn members(&self, lobby_id: &str) -> Vec<Participant> {
        self.lobbies
            .lock()
            .unwrap()
            .get(lobby_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl LobbyDirectory for FakeDirectory {
    async fn create_lobby(&self, _name: &str) -> AppResult<LobbyId> {
        let mut lobbies = self.lobbies.lock().unwrap();
        let id = format!("{:06}", lobbies.len() + 1);
        lobbies.insert(id.clone(), Vec::new());
        Ok(LobbyId::parse(&id)?)
    }

    async fn join_lobby(
        &self,
        lobby_id: &LobbyId,
        name: &str,
        interests: &Interests,
    ) -> AppResult<()> {
        if self.fail_joins {
            return Err(AppError::Upstream {
                service: "fake_directory",
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                message: "down".to_string(),
            });
        }

        let mut lobbies = self.lobbies.lock().unwrap();
        let members = lobbies
            .get_mut(lobby_id.as_str())
            .ok_or_else(|| AppError::NotFound(format!("Lobby {} not found", lobby_id)))?;
        members.push(Participant {
            name: name.to_string(),
            likes: interests.likes.clone(),
            dislikes: interests.dislikes.clone(),
        });
        Ok(())
    }

    async fn fetch_members(&self, lobby_id: &LobbyId) -> AppResult<Vec<Participant>> {
        self.lobbies
            .lock()
            .unwrap()
            .get(lobby_id.as_str())
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Lobby {} not found", lobby_id)))
    }

    fn name(&self) -> &'static str {
        "fake_directory"
    }
}

// Returns a fixed answer and records every request payload.
#[derive(Default)]
pub struct FakeSuggester {
    pub answer: Vec<Tag>,
    pub fail: bool,
    pub calls: Mutex<Vec<(Vec<Tag>, Vec<Tag>)>>,
}

impl FakeSuggester {
    pub fn answering(tags: &[&str]) -> Self {
        Self {
            answer: tags.iter().map(|t| Tag::from(*t)).collect(),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<(Vec<Tag>, Vec<Tag>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TagSuggester for FakeSuggester {
    async fn suggest_tags(&self, liked: &[Tag], disliked: &[Tag]) -> AppResult<Vec<Tag>> {
        self.calls
            .lock()
            .unwrap()
            .push((liked.to_vec(), disliked.to_vec()));
        if self.fail {
            return Err(AppError::Internal("suggestion service down".to_string()));
        }
        Ok(self.answer.clone())
    }

    fn name(&self) -> &'static str {
        "fake_suggester"
    }
}

// Answers with the given text, or fails when there is none.
pub struct FakeRecommender(pub Option<String>);

#[async_trait]
impl Recommender for FakeRecommender {
    async fn fetch_recommendation(&self, _lobby_id: &LobbyId) -> AppResult<String> {
        self.0
            .clone()
            .ok_or_else(|| AppError::Internal("recommendation service down".to_string()))
    }

    fn name(&self) -> &'static str {
        "fake_recommender"
    }
}

pub fn tags(labels: &[&str]) -> Vec<Tag> {
    labels.iter().map(|l| Tag::from(*l)).collect()
}

// Serve `app` on an ephemeral port and return its base URL.
pub async fn spawn_stub(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server failed");
    });
    format!("http://{}", addr)
}
