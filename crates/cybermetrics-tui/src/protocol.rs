// Messages exchanged between the TUI and the app orchestrator.
//
// The TUI sends `UserCommand`s; the orchestrator answers with `UiUpdate`s
// carrying a full `AppSnapshot` of everything the screens render.

use chrono::{DateTime, Local};

use cybermetrics_core::gate::{GateState, Route};
use cybermetrics_core::lineup::Slot;
use cybermetrics_core::models::{PlayerDetail, PlayerSearchResult, PlayerSummary, SavedPlayer};
use cybermetrics_core::roster::Banner;
use cybermetrics_core::session::CurrentUser;

// ---------------------------------------------------------------------------
// TUI -> app
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    Navigate(Route),
    Login {
        email: String,
        password: String,
    },
    Signup {
        email: String,
        password: String,
        display_name: Option<String>,
    },
    Logout,
    CheckHealth,
    /// Current contents of the search box, sent on every keystroke.
    SearchInput(String),
    AddPlayer(PlayerSummary),
    RemovePlayer(u64),
    ShowDetail(u64),
    CloseDetail,
    SelectSlot(Slot),
    AssignPlayer(PlayerSummary),
    ClearSlot(Slot),
    Quit,
}

// ---------------------------------------------------------------------------
// App -> TUI
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum UiUpdate {
    Snapshot(Box<AppSnapshot>),
}

/// Outcome of the last health check.
#[derive(Debug, Clone, PartialEq)]
pub enum HealthView {
    Checking,
    Done {
        result: Result<String, String>,
        checked_at: DateTime<Local>,
    },
}

/// State of the player detail overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailView {
    Loading(u64),
    Loaded(Box<PlayerDetail>),
    Failed { player_id: u64, message: String },
}

/// One search hit plus what the current screen may do with it.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRow {
    pub result: PlayerSearchResult,
    pub saved: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchView {
    pub query: String,
    pub rows: Vec<SearchRow>,
    pub error: Option<String>,
    pub searching: bool,
    pub pending: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub player: PlayerSummary,
    pub assignable: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineupView {
    pub slots: Vec<(Slot, Option<PlayerSummary>)>,
    pub active: Option<Slot>,
    pub candidates: Vec<Candidate>,
    pub filled: usize,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RosterView {
    pub players: Vec<SavedPlayer>,
    pub loading: bool,
    pub error: Option<String>,
    pub banner: Option<Banner>,
}

/// Everything the TUI renders, rebuilt after every state change.
#[derive(Debug, Clone, PartialEq)]
pub struct AppSnapshot {
    pub route: Route,
    /// Changes on every navigation, including a re-mount of the same route.
    pub mount: u64,
    /// `None` on the ungated landing page.
    pub gate: Option<GateState>,
    pub user: CurrentUser,
    pub authenticated: bool,
    /// Result of the landing page's session check; `None` while checking.
    pub landing_auth: Option<bool>,
    /// Form-level message on the login and signup screens.
    pub notice: Option<Banner>,
    pub auth_pending: bool,
    pub health: Option<HealthView>,
    pub search: Option<SearchView>,
    pub roster: RosterView,
    pub lineup: Option<LineupView>,
    pub detail: Option<DetailView>,
    pub api_url: String,
}

impl Default for AppSnapshot {
    fn default() -> Self {
        AppSnapshot {
            route: Route::Landing,
            mount: 0,
            gate: None,
            user: CurrentUser::default(),
            authenticated: false,
            landing_auth: None,
            notice: None,
            auth_pending: false,
            health: None,
            search: None,
            roster: RosterView::default(),
            lineup: None,
            detail: None,
            api_url: String::new(),
        }
    }
}

impl AppSnapshot {
    /// Whether the main panel may show the route's content yet.
    pub fn content_visible(&self) -> bool {
        matches!(self.gate, None | Some(GateState::Authorized))
    }
}
