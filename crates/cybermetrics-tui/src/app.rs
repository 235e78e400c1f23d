// Application state and orchestration logic.
//
// A single task owns every piece of client state. It reacts to user commands
// from the TUI, to completions of the network tasks it spawned, and to three
// timers (search debounce, banner expiry, post-auth redirect), then pushes a
// fresh snapshot to the TUI. Network calls never run on this task.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use cybermetrics_core::actions::{auth, health, players, ActionResult};
use cybermetrics_core::api::CybermetricsApi;
use cybermetrics_core::config::Config;
use cybermetrics_core::gate::{AuthGate, GateState, Route};
use cybermetrics_core::lineup::Lineup;
use cybermetrics_core::models::{
    HealthResponse, LoginResponse, PlayerDetail, PlayerSearchResult, PlayerSummary, SavedPlayer,
    SignupResponse,
};
use cybermetrics_core::roster::{self, Banner, RosterOutcome, SavedRoster};
use cybermetrics_core::search::SearchSession;
use cybermetrics_core::session::SessionContext;

use crate::protocol::{
    AppSnapshot, Candidate, DetailView, HealthView, LineupView, RosterView, SearchRow, SearchView,
    UiUpdate, UserCommand,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// How long "Login successful!" stays up before moving to the dashboard.
pub const LOGIN_REDIRECT_DELAY: Duration = Duration::from_secs(1);

/// How long the signup confirmation stays up before moving to the login page.
pub const SIGNUP_REDIRECT_DELAY: Duration = Duration::from_secs(2);

pub const LOGIN_SUCCESS: &str = "Login successful!";
pub const SIGNUP_SUCCESS: &str = "Account created successfully! Redirecting to login...";

// ---------------------------------------------------------------------------
// Network completions
// ---------------------------------------------------------------------------

/// Result of a spawned network task. Every event carries the mount id of the
/// screen that issued it; events for a screen that has since been left are
/// discarded.
#[derive(Debug)]
pub enum NetEvent {
    Verified {
        mount: u64,
        ok: bool,
    },
    LoggedIn {
        mount: u64,
        result: ActionResult<LoginResponse>,
    },
    SignedUp {
        mount: u64,
        result: ActionResult<SignupResponse>,
    },
    Health {
        mount: u64,
        result: ActionResult<HealthResponse>,
    },
    Searched {
        mount: u64,
        generation: u64,
        result: ActionResult<Vec<PlayerSearchResult>>,
    },
    SavedLoaded {
        mount: u64,
        result: ActionResult<Vec<SavedPlayer>>,
    },
    RosterChanged {
        mount: u64,
        outcome: RosterOutcome,
    },
    Detail {
        mount: u64,
        player_id: u64,
        result: ActionResult<PlayerDetail>,
    },
}

impl NetEvent {
    pub fn mount(&self) -> u64 {
        match self {
            NetEvent::Verified { mount, .. }
            | NetEvent::LoggedIn { mount, .. }
            | NetEvent::SignedUp { mount, .. }
            | NetEvent::Health { mount, .. }
            | NetEvent::Searched { mount, .. }
            | NetEvent::SavedLoaded { mount, .. }
            | NetEvent::RosterChanged { mount, .. }
            | NetEvent::Detail { mount, .. } => *mount,
        }
    }
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub config: Config,
    /// Shared with spawned tasks.
    pub api: Arc<dyn CybermetricsApi>,
    pub session: SessionContext,
    /// Spawned tasks report back through clones of this sender.
    pub net_tx: mpsc::Sender<NetEvent>,
    pub route: Route,
    /// Incremented on every navigation. Identifies the mounted screen.
    pub mount_id: u64,
    pub gate: Option<AuthGate>,
    /// Session check result for the ungated landing page.
    pub landing_auth: Option<bool>,
    pub search: Option<SearchSession>,
    pub lineup: Option<Lineup>,
    pub lineup_message: Option<String>,
    pub roster: SavedRoster,
    pub notice: Option<Banner>,
    pub auth_pending: bool,
    pub health: Option<HealthView>,
    pub detail: Option<DetailView>,
    pub pending_redirect: Option<(Route, Instant)>,
}

impl AppState {
    pub fn new(
        config: Config,
        api: Arc<dyn CybermetricsApi>,
        session: SessionContext,
        net_tx: mpsc::Sender<NetEvent>,
    ) -> Self {
        let roster = SavedRoster::new(config.roster.banner_ttl());
        AppState {
            config,
            api,
            session,
            net_tx,
            route: Route::Landing,
            mount_id: 0,
            gate: None,
            landing_auth: None,
            search: None,
            lineup: None,
            lineup_message: None,
            roster,
            notice: None,
            auth_pending: false,
            health: None,
            detail: None,
            pending_redirect: None,
        }
    }

    /// Run `task` off the app loop and deliver its event back to it.
    fn spawn_net<F>(&self, task: F)
    where
        F: Future<Output = NetEvent> + Send + 'static,
    {
        let tx = self.net_tx.clone();
        tokio::spawn(async move {
            let event = task.await;
            if tx.send(event).await.is_err() {
                debug!("App loop gone, dropping network result");
            }
        });
    }

    /// Whether the mounted screen has passed its gate (or has none).
    pub fn is_authorized(&self) -> bool {
        self.gate
            .as_ref()
            .map_or(true, |g| g.state() == GateState::Authorized)
    }

    /// Mount `route`: fresh per-screen state and one verification call when
    /// the route is gated.
    pub fn navigate(&mut self, route: Route) {
        self.mount_id += 1;
        info!("Navigating to {} (mount {})", route.path(), self.mount_id);

        self.route = route;
        self.pending_redirect = None;
        self.notice = None;
        self.auth_pending = false;
        self.health = None;
        self.detail = None;
        self.lineup_message = None;
        self.search = route
            .has_search()
            .then(|| SearchSession::new(self.config.search.debounce()));
        self.lineup = (route == Route::TeamBuilder).then(Lineup::new);
        self.roster = SavedRoster::new(self.config.roster.banner_ttl());
        self.gate = route.gate();
        self.landing_auth = None;

        // Gated routes and the landing page each verify the session once.
        if self.gate.is_some() || route == Route::Landing {
            let api = Arc::clone(&self.api);
            let session = self.session.clone();
            let mount = self.mount_id;
            self.spawn_net(async move {
                let ok = auth::verify_auth(api.as_ref(), &session).await;
                NetEvent::Verified { mount, ok }
            });
        }
    }

    fn load_saved_roster(&mut self) {
        self.roster.begin_load();
        let api = Arc::clone(&self.api);
        let mount = self.mount_id;
        self.spawn_net(async move {
            let result = players::saved_players(api.as_ref()).await;
            NetEvent::SavedLoaded { mount, result }
        });
    }

    /// Issue the debounced lookup if it is due.
    pub fn fire_due_search(&mut self, now: Instant) {
        let Some(request) = self.search.as_mut().and_then(|s| s.poll_due(now)) else {
            return;
        };
        let api = Arc::clone(&self.api);
        let mount = self.mount_id;
        self.spawn_net(async move {
            let result = players::search_players(api.as_ref(), &request.query).await;
            NetEvent::Searched {
                mount,
                generation: request.generation,
                result,
            }
        });
    }

    pub fn fire_due_redirect(&mut self, now: Instant) {
        if let Some((route, at)) = self.pending_redirect {
            if now >= at {
                self.navigate(route);
            }
        }
    }

    pub fn search_deadline(&self) -> Option<Instant> {
        self.search.as_ref().and_then(|s| s.next_deadline())
    }

    pub fn redirect_deadline(&self) -> Option<Instant> {
        self.pending_redirect.map(|(_, at)| at)
    }

    /// Build the full view model for the TUI.
    pub fn build_snapshot(&self) -> AppSnapshot {
        let search = self.search.as_ref().map(|s| SearchView {
            query: s.query().to_string(),
            rows: s
                .results()
                .iter()
                .map(|r| SearchRow {
                    result: r.clone(),
                    saved: self.roster.contains(r.id),
                })
                .collect(),
            error: s.error().map(str::to_string),
            searching: s.is_searching(),
            pending: s.is_pending(),
        });

        let lineup = self.lineup.as_ref().map(|l| LineupView {
            slots: l.slots().map(|(s, p)| (s, p.cloned())).collect(),
            active: l.active_slot(),
            candidates: self.candidates(l),
            filled: l.filled_count(),
            message: self.lineup_message.clone(),
        });

        AppSnapshot {
            route: self.route,
            mount: self.mount_id,
            gate: self.gate.as_ref().map(|g| g.state()),
            user: self.session.current_user(),
            authenticated: self.session.is_authenticated(),
            landing_auth: self.landing_auth,
            notice: self.notice.clone(),
            auth_pending: self.auth_pending,
            health: self.health.clone(),
            search,
            roster: RosterView {
                players: self.roster.players().to_vec(),
                loading: self.roster.is_loading(),
                error: self.roster.load_error().map(str::to_string),
                banner: self.roster.banner().cloned(),
            },
            lineup,
            detail: self.detail.clone(),
            api_url: self.config.api.base_url.clone(),
        }
    }

    /// Search hits first, then saved players not already listed.
    fn candidates(&self, lineup: &Lineup) -> Vec<Candidate> {
        let mut seen = HashSet::new();
        let from_search = self
            .search
            .iter()
            .flat_map(|s| s.results())
            .map(|r| PlayerSummary::from(r));
        let from_saved = self.roster.players().iter().map(|p| PlayerSummary::from(p));

        from_search
            .chain(from_saved)
            .filter(|p| seen.insert(p.id))
            .map(|player| Candidate {
                assignable: lineup.is_assignable(player.id),
                player,
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the main application event loop.
///
/// Listens with `tokio::select!` on:
/// 1. User commands from the TUI
/// 2. Completions of spawned network tasks
/// 3. The search debounce deadline
/// 4. The roster banner expiry
/// 5. The delayed redirect after login or signup
///
/// Pushes a snapshot through `ui_tx` after each of them.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut net_rx: mpsc::Receiver<NetEvent>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
    start: Route,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    state.navigate(start);
    send_snapshot(&state, &ui_tx).await;

    loop {
        let search_deadline = state.search_deadline();
        let banner_deadline = state.roster.banner_deadline();
        let redirect_deadline = state.redirect_deadline();

        tokio::select! {
            // --- User commands ---
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => handle_user_command(&mut state, cmd),
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            // --- Network completions ---
            event = net_rx.recv() => {
                match event {
                    Some(event) => handle_net_event(&mut state, event),
                    None => {
                        info!("Network channel closed, shutting down");
                        break;
                    }
                }
            }

            // --- Timers ---
            _ = sleep_until(search_deadline.unwrap_or_else(Instant::now)), if search_deadline.is_some() => {
                state.fire_due_search(Instant::now());
            }
            _ = sleep_until(banner_deadline.unwrap_or_else(Instant::now)), if banner_deadline.is_some() => {
                state.roster.expire_banners(Instant::now());
            }
            _ = sleep_until(redirect_deadline.unwrap_or_else(Instant::now)), if redirect_deadline.is_some() => {
                state.fire_due_redirect(Instant::now());
            }
        }

        send_snapshot(&state, &ui_tx).await;
    }

    info!("Application event loop exiting");
    Ok(())
}

async fn send_snapshot(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let snapshot = state.build_snapshot();
    let _ = ui_tx.send(UiUpdate::Snapshot(Box::new(snapshot))).await;
}

/// Handle a user command from the TUI.
pub fn handle_user_command(state: &mut AppState, cmd: UserCommand) {
    match cmd {
        UserCommand::Navigate(route) => state.navigate(route),

        UserCommand::Login { email, password } => {
            if state.auth_pending {
                return;
            }
            state.auth_pending = true;
            state.notice = None;
            let api = Arc::clone(&state.api);
            let session = state.session.clone();
            let mount = state.mount_id;
            state.spawn_net(async move {
                let result = auth::login(api.as_ref(), &session, &email, &password).await;
                NetEvent::LoggedIn { mount, result }
            });
        }

        UserCommand::Signup {
            email,
            password,
            display_name,
        } => {
            if state.auth_pending {
                return;
            }
            state.auth_pending = true;
            state.notice = None;
            let api = Arc::clone(&state.api);
            let mount = state.mount_id;
            state.spawn_net(async move {
                let result =
                    auth::signup(api.as_ref(), &email, &password, display_name.as_deref()).await;
                NetEvent::SignedUp { mount, result }
            });
        }

        UserCommand::Logout => {
            let _ = auth::logout(&state.session);
            state.navigate(Route::Login);
        }

        UserCommand::CheckHealth => {
            if !state.is_authorized() || state.health == Some(HealthView::Checking) {
                return;
            }
            state.health = Some(HealthView::Checking);
            let api = Arc::clone(&state.api);
            let mount = state.mount_id;
            state.spawn_net(async move {
                let result = health::check_health(api.as_ref()).await;
                NetEvent::Health { mount, result }
            });
        }

        UserCommand::SearchInput(query) => {
            if !state.is_authorized() {
                debug!("Ignoring search input before the screen is authorized");
                return;
            }
            if let Some(search) = state.search.as_mut() {
                search.on_input(query, Instant::now());
            }
        }

        UserCommand::AddPlayer(player) => {
            if !state.is_authorized() {
                return;
            }
            let api = Arc::clone(&state.api);
            let mount = state.mount_id;
            state.spawn_net(async move {
                let outcome = roster::add_and_refresh(api.as_ref(), &player).await;
                NetEvent::RosterChanged { mount, outcome }
            });
        }

        UserCommand::RemovePlayer(player_id) => {
            if !state.is_authorized() {
                return;
            }
            let api = Arc::clone(&state.api);
            let mount = state.mount_id;
            state.spawn_net(async move {
                let outcome = roster::remove_and_refresh(api.as_ref(), player_id).await;
                NetEvent::RosterChanged { mount, outcome }
            });
        }

        UserCommand::ShowDetail(player_id) => {
            if !state.is_authorized() {
                return;
            }
            state.detail = Some(DetailView::Loading(player_id));
            let api = Arc::clone(&state.api);
            let mount = state.mount_id;
            state.spawn_net(async move {
                let result = players::player_detail(api.as_ref(), player_id).await;
                NetEvent::Detail {
                    mount,
                    player_id,
                    result,
                }
            });
        }

        UserCommand::CloseDetail => state.detail = None,

        UserCommand::SelectSlot(slot) => {
            if let Some(lineup) = state.lineup.as_mut() {
                lineup.select_slot(slot);
                state.lineup_message = None;
            }
        }

        UserCommand::AssignPlayer(player) => {
            if let Some(lineup) = state.lineup.as_mut() {
                state.lineup_message = match lineup.assign(player) {
                    Ok(_) => None,
                    Err(e) => {
                        debug!("Lineup assignment rejected: {}", e);
                        Some(e.to_string())
                    }
                };
            }
        }

        UserCommand::ClearSlot(slot) => {
            if let Some(lineup) = state.lineup.as_mut() {
                lineup.clear(slot);
                state.lineup_message = None;
            }
        }

        UserCommand::Quit => {
            // Handled in the main loop
        }
    }
}

/// Apply the result of a spawned network task.
pub fn handle_net_event(state: &mut AppState, event: NetEvent) {
    if event.mount() != state.mount_id {
        debug!(
            "Discarding network result for mount {} (current mount {})",
            event.mount(),
            state.mount_id
        );
        return;
    }

    match event {
        NetEvent::Verified { ok, .. } => {
            let Some(gate) = state.gate.as_mut() else {
                state.landing_auth = Some(ok);
                return;
            };
            match gate.resolve(ok) {
                GateState::Redirecting(route) => state.navigate(route),
                GateState::Authorized if state.route.requires_auth() => state.load_saved_roster(),
                _ => {}
            }
        }

        // On success the form stays locked until the redirect remounts.
        NetEvent::LoggedIn { result, .. } => match result {
            Ok(_) => {
                state.notice = Some(Banner::success(LOGIN_SUCCESS));
                state.pending_redirect =
                    Some((Route::Dashboard, Instant::now() + LOGIN_REDIRECT_DELAY));
            }
            Err(e) => {
                state.auth_pending = false;
                state.notice = Some(Banner::error(e.message));
            }
        },

        NetEvent::SignedUp { result, .. } => match result {
            Ok(resp) => {
                info!("Account created for {}", resp.email);
                state.notice = Some(Banner::success(SIGNUP_SUCCESS));
                state.pending_redirect =
                    Some((Route::Login, Instant::now() + SIGNUP_REDIRECT_DELAY));
            }
            Err(e) => {
                state.auth_pending = false;
                state.notice = Some(Banner::error(e.message));
            }
        },

        NetEvent::Health { result, .. } => {
            if let Err(e) = &result {
                warn!("Health check failed: {}", e);
            }
            state.health = Some(HealthView::Done {
                result: result.map(|h| h.summary()).map_err(|e| e.message),
                checked_at: Local::now(),
            });
        }

        NetEvent::Searched {
            generation, result, ..
        } => {
            if let Some(search) = state.search.as_mut() {
                search.apply_result(generation, result);
            }
        }

        NetEvent::SavedLoaded { result, .. } => state.roster.apply_list(result),

        NetEvent::RosterChanged { outcome, .. } => state.roster.apply(outcome, Instant::now()),

        NetEvent::Detail {
            player_id, result, ..
        } => {
            // Only fill the overlay that is still waiting for this player.
            if state.detail != Some(DetailView::Loading(player_id)) {
                return;
            }
            state.detail = Some(match result {
                Ok(detail) => DetailView::Loaded(Box::new(detail)),
                Err(e) => DetailView::Failed {
                    player_id,
                    message: e.message,
                },
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
