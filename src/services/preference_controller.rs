use serde::Serialize;
use tokio::sync::watch;

use crate::{
    error::{AppResult, ValidationError},
    models::{Interests, Sentiment, Tag, TagCatalog, TagPreferenceSet},
    services::providers::TagSuggester,
};

/// Selection counts that trigger a suggestion fetch
pub const SUGGESTION_THRESHOLDS: [usize; 3] = [3, 6, 9];

/// Fewest selections a participant may commit with
pub const MIN_COMMIT_SIZE: usize = 3;

const SUGGESTION_FAILURE_MESSAGE: &str = "Failed to load suggestions. Please try again.";

/// A suggestion fetch the caller owes the controller.
///
/// Carries the preference snapshot that triggered it and a sequence number so
/// the controller can tell whether its answer is still the latest one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionTicket {
    seq: u64,
    liked: Vec<Tag>,
    disliked: Vec<Tag>,
}

impl SuggestionTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn liked(&self) -> &[Tag] {
        &self.liked
    }

    pub fn disliked(&self) -> &[Tag] {
        &self.disliked
    }

    /// Selection count at the time the ticket was issued
    pub fn size(&self) -> usize {
        self.liked.len() + self.disliked.len()
    }

    /// Performs the fetch this ticket describes
    pub async fn fetch(&self, suggester: &dyn TagSuggester) -> AppResult<Vec<Tag>> {
        suggester.suggest_tags(&self.liked, &self.disliked).await
    }
}

/// Progress of the most recent suggestion fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SuggestionStatus {
    Idle,
    Loading,
    Failed { message: String },
}

/// What happened when a fetch result came back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionOutcome {
    /// Result merged; `added` tags were new to the catalog
    Merged { added: usize, stale: bool },
    /// Fetch failed; preferences and catalog untouched
    Failed { stale: bool },
}

/// Applies toggle intents to one participant's preferences and decides when
/// to ask for more tags.
///
/// The controller never performs I/O itself. A toggle that lands on a
/// threshold returns a [`SuggestionTicket`]; the caller runs the fetch and
/// hands the result back through [`apply_suggestions`](Self::apply_suggestions).
/// Overlapping fetches are allowed: every successful result is merged (the
/// merge is a union) but only the latest ticket drives the loading state.
#[derive(Debug)]
pub struct PreferenceController {
    preferences: TagPreferenceSet,
    catalog: TagCatalog,
    status: SuggestionStatus,
    issued: u64,
    publisher: watch::Sender<TagPreferenceSet>,
}

impl Default for PreferenceController {
    fn default() -> Self {
        Self::new(TagCatalog::seed())
    }
}

impl PreferenceController {
    pub fn new(catalog: TagCatalog) -> Self {
        Self::with_preferences(catalog, TagPreferenceSet::new())
    }

    pub fn with_preferences(catalog: TagCatalog, preferences: TagPreferenceSet) -> Self {
        let (publisher, _) = watch::channel(preferences.clone());
        Self {
            preferences,
            catalog,
            status: SuggestionStatus::Idle,
            issued: 0,
            publisher,
        }
    }

    pub fn preferences(&self) -> &TagPreferenceSet {
        &self.preferences
    }

    pub fn catalog(&self) -> &TagCatalog {
        &self.catalog
    }

    pub fn status(&self) -> &SuggestionStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == SuggestionStatus::Loading
    }

    /// Receives every committed-candidate state, starting with the current one
    pub fn subscribe(&self) -> watch::Receiver<TagPreferenceSet> {
        self.publisher.subscribe()
    }

    /// Toggles `tag` and publishes the new state. Returns a ticket when the
    /// new selection count is a suggestion threshold.
    pub fn on_toggle(&mut self, tag: Tag, sentiment: Sentiment) -> Option<SuggestionTicket> {
        self.preferences.toggle(tag, sentiment);
        self.publisher.send_replace(self.preferences.clone());

        let size = self.preferences.size();
        if !SUGGESTION_THRESHOLDS.contains(&size) {
            return None;
        }

        self.issued += 1;
        self.status = SuggestionStatus::Loading;

        tracing::debug!(seq = self.issued, size, "Suggestion threshold reached");

        Some(SuggestionTicket {
            seq: self.issued,
            liked: self.preferences.liked().to_vec(),
            disliked: self.preferences.disliked().to_vec(),
        })
    }

    /// Applies the result of a ticket's fetch.
    ///
    /// Successful results always merge. Only the latest ticket may change the
    /// status, so a late answer from a superseded fetch cannot clear the
    /// loading flag of a newer one or report its error over it.
    pub fn apply_suggestions(
        &mut self,
        ticket: &SuggestionTicket,
        result: AppResult<Vec<Tag>>,
    ) -> SuggestionOutcome {
        let stale = ticket.seq != self.issued;

        match result {
            Ok(new_tags) => {
                let added = self.catalog.merge_in_place(new_tags);
                if !stale {
                    self.status = SuggestionStatus::Idle;
                }
                tracing::debug!(seq = ticket.seq, added, stale, "Suggestions merged");
                SuggestionOutcome::Merged { added, stale }
            }
            Err(err) => {
                tracing::warn!(seq = ticket.seq, stale, error = %err, "Error fetching tags");
                if !stale {
                    self.status = SuggestionStatus::Failed {
                        message: SUGGESTION_FAILURE_MESSAGE.to_string(),
                    };
                }
                SuggestionOutcome::Failed { stale }
            }
        }
    }

    /// Toggles and, if a threshold was hit, fetches and applies suggestions
    /// before returning.
    pub async fn toggle_and_suggest(
        &mut self,
        suggester: &dyn TagSuggester,
        tag: Tag,
        sentiment: Sentiment,
    ) -> Option<SuggestionOutcome> {
        let ticket = self.on_toggle(tag, sentiment)?;
        let result = ticket.fetch(suggester).await;
        Some(self.apply_suggestions(&ticket, result))
    }

    /// Commit gate: the interests to submit on join
    pub fn commit(&self) -> Result<Interests, ValidationError> {
        commit_gate(&self.preferences)
    }
}

/// Rejects preference sets below [`MIN_COMMIT_SIZE`]
pub fn commit_gate(preferences: &TagPreferenceSet) -> Result<Interests, ValidationError> {
    let selected = preferences.size();
    if selected < MIN_COMMIT_SIZE {
        return Err(ValidationError::TooFewPreferences {
            minimum: MIN_COMMIT_SIZE,
            selected,
        });
    }
    Ok(preferences.to_interests())
}
