use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{Lobby, LobbyId},
    services::providers::LobbyDirectory,
};

/// Read-only roster projection backed by the directory service.
///
/// Failures are returned to the caller as-is; nothing here retries beyond the
/// provider's own transient-failure policy.
#[derive(Clone)]
pub struct LobbyMembershipView {
    directory: Arc<dyn LobbyDirectory>,
}

impl LobbyMembershipView {
    pub fn new(directory: Arc<dyn LobbyDirectory>) -> Self {
        Self { directory }
    }

    /// Fetches the current roster of `lobby_id`
    pub async fn load(&self, lobby_id: &LobbyId) -> AppResult<Lobby> {
        let members = self.directory.fetch_members(lobby_id).await.map_err(|e| {
            tracing::warn!(
                lobby_id = %lobby_id,
                provider = self.directory.name(),
                error = %e,
                "Failed to load lobby data"
            );
            e
        })?;

        tracing::debug!(lobby_id = %lobby_id, members = members.len(), "Lobby loaded");

        Ok(Lobby::new(lobby_id.clone(), members))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::Participant;
    use crate::services::providers::MockLobbyDirectory;

    #[tokio::test]
    async fn test_load_keeps_join_order() {
        let mut directory = MockLobbyDirectory::new();
        directory.expect_name().return_const("mock");
        directory.expect_fetch_members().times(1).returning(|_| {
            Ok(vec![
                Participant {
                    name: "Ana".to_string(),
                    likes: vec!["Outdoor".into()],
                    dislikes: vec![],
                },
                Participant {
                    name: "Ben".to_string(),
                    likes: vec![],
                    dislikes: vec!["Outdoor".into()],
                },
            ])
        });

        let view = LobbyMembershipView::new(Arc::new(directory));
        let lobby = view.load(&LobbyId::parse("123456").unwrap()).await.unwrap();

        let names: Vec<&str> = lobby.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Ben"]);
        assert!(lobby.recommendation.is_none());
    }

    #[tokio::test]
    async fn test_load_surfaces_missing_lobby() {
        let mut directory = MockLobbyDirectory::new();
        directory.expect_name().return_const("mock");
        directory
            .expect_fetch_members()
            .times(1)
            .returning(|id| Err(AppError::NotFound(format!("Lobby {} not found", id))));

        let view = LobbyMembershipView::new(Arc::new(directory));
        let result = view.load(&LobbyId::parse("999999").unwrap()).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
