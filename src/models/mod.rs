use serde::{Deserialize, Serialize};

pub mod lobby;
pub mod tag_catalog;
pub mod tag_preferences;

pub use lobby::{Interests, Lobby, LobbyId, Participant, TagTally, LOBBY_ID_LEN};
pub use tag_catalog::{TagCatalog, SEED_TAGS};
pub use tag_preferences::{Sentiment, Tag, TagPreferenceSet};

// ============================================================================
// Lobby Directory Service Types
// ============================================================================

/// Body of `POST /create-lobby`
#[derive(Debug, Clone, Serialize)]
pub struct CreateLobbyRequest {
    pub name: String,
}

/// Raw reply from `POST /create-lobby`. The id is validated by the caller.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLobbyResponse {
    #[serde(default)]
    pub lobby_id: Option<String>,
}

/// Body of `POST /join-lobby`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinLobbyRequest {
    pub lobby_id: LobbyId,
    pub name: String,
    pub interests: Interests,
}

/// Reply from `GET /lobby/{id}`. Older deployments call the roster `users`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMembersResponse {
    #[serde(default, alias = "users")]
    pub members: Vec<ApiMember>,
}

/// A member record, either flat or with nested `interests`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMember {
    pub name: String,
    #[serde(default)]
    pub likes: Vec<Tag>,
    #[serde(default)]
    pub dislikes: Vec<Tag>,
    #[serde(default)]
    pub interests: Option<Interests>,
}

impl From<ApiMember> for Participant {
    fn from(member: ApiMember) -> Self {
        // Nested interests win when both shapes are present
        let (likes, dislikes) = match member.interests {
            Some(interests) => (interests.likes, interests.dislikes),
            None => (member.likes, member.dislikes),
        };

        Participant {
            name: member.name,
            likes,
            dislikes,
        }
    }
}

// ============================================================================
// Tag Suggestion Service Types
// ============================================================================

/// Body of `POST /generate-interests`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SuggestionRequest {
    pub liked_tags: Vec<Tag>,
    pub disliked_tags: Vec<Tag>,
}

/// Reply from `POST /generate-interests`
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestionResponse {
    #[serde(default)]
    pub new_tags: Vec<Tag>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_members_accept_legacy_nested_shape() {
        let raw = json!({
            "users": [
                { "name": "Ana", "interests": { "likes": ["Outdoor"], "dislikes": ["Indoor"] } }
            ]
        });

        let parsed: ApiMembersResponse = serde_json::from_value(raw).unwrap();
        let participant = Participant::from(parsed.members[0].clone());
        assert_eq!(participant.name, "Ana");
        assert_eq!(participant.likes, vec![Tag::from("Outdoor")]);
        assert_eq!(participant.dislikes, vec![Tag::from("Indoor")]);
    }

    #[test]
    fn test_members_accept_flat_shape() {
        let raw = json!({
            "members": [
                { "name": "Ben", "likes": ["Social"], "dislikes": [] },
                { "name": "Cy" }
            ]
        });

        let parsed: ApiMembersResponse = serde_json::from_value(raw).unwrap();
        let roster: Vec<Participant> = parsed.members.into_iter().map(Participant::from).collect();
        assert_eq!(roster[0].likes, vec![Tag::from("Social")]);
        assert!(roster[1].likes.is_empty());
    }

    #[test]
    fn test_join_request_wire_format() {
        let request = JoinLobbyRequest {
            lobby_id: LobbyId::parse("042318").unwrap(),
            name: "Ana".to_string(),
            interests: Interests {
                likes: vec!["Outdoor".into()],
                dislikes: vec![],
            },
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "lobbyId": "042318",
                "name": "Ana",
                "interests": { "likes": ["Outdoor"], "dislikes": [] }
            })
        );
    }
}
