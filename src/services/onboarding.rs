use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{hash_map::Entry, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult, ValidationError},
    models::{LobbyId, Sentiment, Tag, TagCatalog, TagPreferenceSet},
    services::{
        preference_controller::{commit_gate, PreferenceController, SuggestionStatus},
        providers::{LobbyDirectory, TagSuggester},
    },
};

/// One participant picking tags before joining a lobby.
///
/// Owns its controller and catalog outright; nothing is shared with other
/// sessions. The session keeps its own subscribed copy of the preferences,
/// which is what gets committed.
#[derive(Debug)]
pub struct OnboardingSession {
    pub id: Uuid,
    pub lobby_id: LobbyId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    controller: PreferenceController,
    form: watch::Receiver<TagPreferenceSet>,
}

impl OnboardingSession {
    pub fn new(lobby_id: LobbyId, name: String) -> Self {
        let controller = PreferenceController::new(TagCatalog::seed());
        let form = controller.subscribe();
        Self {
            id: Uuid::new_v4(),
            lobby_id,
            name,
            created_at: Utc::now(),
            controller,
            form,
        }
    }

    pub fn controller(&self) -> &PreferenceController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PreferenceController {
        &mut self.controller
    }

    /// Latest preferences as seen by the form
    pub fn selections(&self) -> TagPreferenceSet {
        self.form.borrow().clone()
    }
}

/// Everything the UI needs to render an onboarding session
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub session_id: Uuid,
    pub lobby_id: LobbyId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub tags: Vec<Tag>,
    pub liked: Vec<Tag>,
    pub disliked: Vec<Tag>,
    pub selected: usize,
    pub can_commit: bool,
    pub suggestions: SuggestionStatus,
}

impl From<&OnboardingSession> for SessionView {
    fn from(session: &OnboardingSession) -> Self {
        let selections = session.selections();
        let controller = session.controller();
        Self {
            session_id: session.id,
            lobby_id: session.lobby_id.clone(),
            name: session.name.clone(),
            created_at: session.created_at,
            tags: controller.catalog().tags().to_vec(),
            liked: selections.liked().to_vec(),
            disliked: selections.disliked().to_vec(),
            selected: selections.size(),
            can_commit: commit_gate(&selections).is_ok(),
            suggestions: controller.status().clone(),
        }
    }
}

/// Idle time after which an uncommitted session is dropped by default
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

#[derive(Debug)]
struct StoredSession {
    handle: Arc<Mutex<OnboardingSession>>,
    last_seen: Instant,
}

impl StoredSession {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.last_seen.elapsed() > ttl
    }
}

/// In-memory registry of live onboarding sessions.
///
/// Every lookup counts as activity. A session left alone for longer than the
/// TTL is treated as abandoned: lookups stop seeing it and the next sweep
/// drops it.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, StoredSession>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub async fn insert(&self, session: OnboardingSession) -> Arc<Mutex<OnboardingSession>> {
        let id = session.id;
        let handle = Arc::new(Mutex::new(session));

        let mut sessions = self.sessions.write().await;
        sweep(&mut sessions, self.ttl);
        sessions.insert(
            id,
            StoredSession {
                handle: handle.clone(),
                last_seen: Instant::now(),
            },
        );
        handle
    }

    /// Looks up a live session and marks it active
    pub async fn get(&self, id: Uuid) -> AppResult<Arc<Mutex<OnboardingSession>>> {
        let mut sessions = self.sessions.write().await;
        match sessions.entry(id) {
            Entry::Occupied(entry) if entry.get().is_expired(self.ttl) => {
                entry.remove();
                tracing::info!(session_id = %id, "Onboarding session expired");
                Err(session_not_found(id))
            }
            Entry::Occupied(mut entry) => {
                let stored = entry.get_mut();
                stored.last_seen = Instant::now();
                Ok(stored.handle.clone())
            }
            Entry::Vacant(_) => Err(session_not_found(id)),
        }
    }

    pub async fn remove(&self, id: Uuid) -> Option<Arc<Mutex<OnboardingSession>>> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|stored| stored.handle)
    }

    /// Drops every session idle past the TTL. Returns how many went.
    pub async fn evict_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        sweep(&mut sessions, self.ttl)
    }

    /// Runs [`evict_expired`](Self::evict_expired) every `period` for as long
    /// as the store is alive.
    pub fn spawn_sweeper(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let store = Arc::downgrade(self);
        let period = period.max(Duration::from_secs(1));

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match store.upgrade() {
                    Some(store) => {
                        store.evict_expired().await;
                    }
                    None => break,
                }
            }
        })
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

fn sweep(sessions: &mut HashMap<Uuid, StoredSession>, ttl: Duration) -> usize {
    let before = sessions.len();
    sessions.retain(|_, stored| !stored.is_expired(ttl));

    let evicted = before - sessions.len();
    if evicted > 0 {
        tracing::info!(evicted, remaining = sessions.len(), "Evicted idle onboarding sessions");
    }
    evicted
}

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {} not found", id))
}

fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::BlankName(field));
    }
    Ok(trimmed.to_string())
}

/// Creates a lobby through the directory service
pub async fn create_lobby(directory: &dyn LobbyDirectory, name: &str) -> AppResult<LobbyId> {
    let name = required(name, "Lobby name")?;
    directory.create_lobby(&name).await
}

/// Validates the entry form and opens a session. No network call is made, so
/// a malformed lobby id never reaches the directory service.
pub async fn start_session(
    store: &SessionStore,
    lobby_id: &str,
    name: &str,
) -> AppResult<SessionView> {
    let lobby_id = LobbyId::parse(lobby_id.trim())?;
    let name = required(name, "Name")?;

    let session = OnboardingSession::new(lobby_id, name);
    let view = SessionView::from(&session);

    tracing::info!(
        session_id = %session.id,
        lobby_id = %session.lobby_id,
        "Onboarding session started"
    );

    store.insert(session).await;
    Ok(view)
}

pub async fn session_view(store: &SessionStore, id: Uuid) -> AppResult<SessionView> {
    let handle = store.get(id).await?;
    let session = handle.lock().await;
    Ok(SessionView::from(&*session))
}

/// Applies a toggle and runs any suggestion fetch it triggers.
///
/// Only tags already in the session's catalog can be toggled. The fetch and
/// the merge of its result run on their own task, so they complete even if the
/// caller goes away; the session lock is never held across the fetch.
pub async fn toggle_tag(
    store: &SessionStore,
    suggester: Arc<dyn TagSuggester>,
    id: Uuid,
    tag: Tag,
    sentiment: Sentiment,
) -> AppResult<SessionView> {
    let handle = store.get(id).await?;

    let ticket = {
        let mut session = handle.lock().await;
        let controller = session.controller_mut();
        if !controller.catalog().contains(tag.as_str()) {
            return Err(ValidationError::UnknownTag(tag.to_string()).into());
        }
        controller.on_toggle(tag, sentiment)
    };

    if let Some(ticket) = ticket {
        let session = handle.clone();
        let fetch = tokio::spawn(async move {
            let result = ticket.fetch(suggester.as_ref()).await;
            let mut session = session.lock().await;
            let outcome = session.controller_mut().apply_suggestions(&ticket, result);
            tracing::debug!(
                session_id = %id,
                seq = ticket.seq(),
                ?outcome,
                "Suggestion fetch settled"
            );
        });
        fetch
            .await
            .map_err(|e| AppError::Internal(format!("Suggestion task failed: {}", e)))?;
    }

    let session = handle.lock().await;
    Ok(SessionView::from(&*session))
}

/// Submits the session's preferences and joins the lobby.
///
/// On success the session is discarded; the directory service now owns the
/// participant. On any failure the session is left exactly as it was.
pub async fn commit_session(
    store: &SessionStore,
    directory: &dyn LobbyDirectory,
    id: Uuid,
) -> AppResult<LobbyId> {
    let handle = store.get(id).await?;
    let session = handle.lock().await;

    let interests = commit_gate(&session.selections())?;

    directory
        .join_lobby(&session.lobby_id, &session.name, &interests)
        .await
        .map_err(|e| {
            tracing::warn!(
                session_id = %id,
                lobby_id = %session.lobby_id,
                error = %e,
                "Failed to join lobby"
            );
            e
        })?;

    let lobby_id = session.lobby_id.clone();
    drop(session);
    store.remove(id).await;

    tracing::info!(session_id = %id, lobby_id = %lobby_id, "Preferences committed");

    Ok(lobby_id)
}
