use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use super::Tag;
use crate::error::ValidationError;

/// Number of digits in a lobby code
pub const LOBBY_ID_LEN: usize = 6;

/// A lobby's external identifier: exactly six ASCII digits, leading zeros kept
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LobbyId(String);

impl LobbyId {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        if input.len() == LOBBY_ID_LEN && input.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(input.to_string()))
        } else {
            Err(ValidationError::InvalidLobbyId(input.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for LobbyId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for LobbyId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LobbyId> for String {
    fn from(id: LobbyId) -> Self {
        id.0
    }
}

impl Display for LobbyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Committed likes and dislikes as submitted on join
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interests {
    #[serde(default)]
    pub likes: Vec<Tag>,
    #[serde(default)]
    pub dislikes: Vec<Tag>,
}

impl Interests {
    pub fn size(&self) -> usize {
        self.likes.len() + self.dislikes.len()
    }
}

/// A lobby member as reported by the directory service (read-only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Participant {
    pub name: String,
    pub likes: Vec<Tag>,
    pub dislikes: Vec<Tag>,
}

/// Roster of a lobby plus its recommendation once one is known
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lobby {
    pub id: LobbyId,
    pub members: Vec<Participant>,
    pub recommendation: Option<String>,
}

/// How many members liked and disliked a given tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagTally {
    pub tag: Tag,
    pub likes: usize,
    pub dislikes: usize,
}

impl Lobby {
    pub fn new(id: LobbyId, members: Vec<Participant>) -> Self {
        Self {
            id,
            members,
            recommendation: None,
        }
    }

    /// Per-tag vote counts across the roster, sorted by tag
    pub fn tag_tally(&self) -> Vec<TagTally> {
        let mut counts: BTreeMap<&Tag, (usize, usize)> = BTreeMap::new();
        for member in &self.members {
            for tag in &member.likes {
                counts.entry(tag).or_default().0 += 1;
            }
            for tag in &member.dislikes {
                counts.entry(tag).or_default().1 += 1;
            }
        }

        counts
            .into_iter()
            .map(|(tag, (likes, dislikes))| TagTally {
                tag: tag.clone(),
                likes,
                dislikes,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lobby_id_accepts_six_digits() {
        let id = LobbyId::parse("042318").unwrap();
        assert_eq!(id.as_str(), "042318");
    }

    #[test]
    fn test_lobby_id_rejects_malformed_input() {
        for input in ["12345", "1234a5", "1234567", "", " 12345", "１２３４５６"] {
            assert_eq!(
                LobbyId::parse(input),
                Err(ValidationError::InvalidLobbyId(input.to_string())),
                "{:?} should be rejected",
                input
            );
        }
    }

    #[test]
    fn test_lobby_id_deserialization_validates() {
        let ok: Result<LobbyId, _> = serde_json::from_str("\"000001\"");
        assert!(ok.is_ok());
        let bad: Result<LobbyId, _> = serde_json::from_str("\"12ab56\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_tag_tally_counts_votes() {
        let lobby = Lobby::new(
            LobbyId::parse("123456").unwrap(),
            vec![
                Participant {
                    name: "Ana".to_string(),
                    likes: vec!["Outdoor".into(), "Social".into()],
                    dislikes: vec!["Indoor".into()],
                },
                Participant {
                    name: "Ben".to_string(),
                    likes: vec!["Outdoor".into()],
                    dislikes: vec!["Social".into()],
                },
            ],
        );

        let tally = lobby.tag_tally();
        assert_eq!(tally.len(), 3);
        assert_eq!(
            tally[1],
            TagTally {
                tag: "Outdoor".into(),
                likes: 2,
                dislikes: 0
            }
        );
        assert_eq!(
            tally[2],
            TagTally {
                tag: "Social".into(),
                likes: 1,
                dislikes: 1
            }
        );
    }
}
