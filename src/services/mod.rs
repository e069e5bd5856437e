pub mod lobby_view;
pub mod onboarding;
pub mod preference_controller;
pub mod providers;
pub mod recommendations;

pub use lobby_view::LobbyMembershipView;
pub use onboarding::{OnboardingSession, SessionStore, SessionView};
pub use preference_controller::{
    PreferenceController, SuggestionOutcome, SuggestionStatus, SuggestionTicket, MIN_COMMIT_SIZE,
    SUGGESTION_THRESHOLDS,
};
pub use recommendations::{
    RecommendationRequestCoordinator, RecommendationState, RecommendationView,
};
