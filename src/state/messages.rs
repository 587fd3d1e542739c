use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use scores_api::{Tournament, TournamentSummary};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkRequest {
    LoadIndex,
    LoadTournament { slug: String },
    /// Reload of the tournament already on screen; keeps the old data visible.
    RefreshTournament { slug: String },
}

/// Tournament responses carry the slug they were requested for so the UI can
/// drop answers for a selection the user has already moved away from.
#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    IndexLoaded { tournaments: Vec<TournamentSummary> },
    IndexFailed { message: String },
    TournamentLoaded { slug: String, tournament: Tournament },
    TournamentFailed { slug: String, message: String },
    RefreshFailed { slug: String, message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
    RefreshDue,
}
