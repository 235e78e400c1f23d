// Terminal front end: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` holding the latest `AppSnapshot` from the app
// orchestrator plus purely local state (focus, text being typed, list
// cursors). Snapshots arrive over an mpsc channel; the TUI re-renders at
// ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::Frame;
use tokio::sync::mpsc;

use cybermetrics_core::gate::Route;
use cybermetrics_core::lineup::Slot;

use crate::protocol::{AppSnapshot, UiUpdate, UserCommand};

use layout::build_layout;

// ---------------------------------------------------------------------------
// Focus
// ---------------------------------------------------------------------------

/// Which part of the mounted screen receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// No focused list or input; global shortcuts only.
    Page,
    /// Login or signup form fields.
    Form,
    Search,
    Results,
    Saved,
    Slots,
    Candidates,
}

impl Focus {
    /// Focus targets for `route`, in Tab order.
    pub fn cycle(route: Route) -> &'static [Focus] {
        match route {
            Route::Login | Route::Signup => &[Focus::Form],
            Route::Dashboard => &[Focus::Search, Focus::Results, Focus::Saved],
            Route::TeamBuilder => &[Focus::Search, Focus::Slots, Focus::Candidates],
            _ => &[Focus::Page],
        }
    }

    pub fn initial(route: Route) -> Focus {
        Focus::cycle(route)[0]
    }
}

// ---------------------------------------------------------------------------
// AuthForm
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    DisplayName,
    Email,
    Password,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            FormField::DisplayName => "Display Name (optional)",
            FormField::Email => "Email",
            FormField::Password => "Password",
        }
    }
}

/// Text typed into the login or signup form.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthForm {
    pub display_name: String,
    pub email: String,
    pub password: String,
    pub active: FormField,
}

impl AuthForm {
    pub fn new(route: Route) -> Self {
        AuthForm {
            display_name: String::new(),
            email: String::new(),
            password: String::new(),
            active: AuthForm::fields(route)[0],
        }
    }

    /// Fields shown on `route`, top to bottom.
    pub fn fields(route: Route) -> &'static [FormField] {
        match route {
            Route::Signup => &[FormField::DisplayName, FormField::Email, FormField::Password],
            _ => &[FormField::Email, FormField::Password],
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::DisplayName => &self.display_name,
            FormField::Email => &self.email,
            FormField::Password => &self.password,
        }
    }

    pub fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::DisplayName => &mut self.display_name,
            FormField::Email => &mut self.email,
            FormField::Password => &mut self.password,
        }
    }

    /// Move to the next or previous field, wrapping.
    pub fn move_active(&mut self, route: Route, forward: bool) {
        let fields = AuthForm::fields(route);
        let i = fields.iter().position(|f| *f == self.active).unwrap_or(0);
        let next = if forward {
            (i + 1) % fields.len()
        } else {
            (i + fields.len() - 1) % fields.len()
        };
        self.active = fields[next];
    }
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// Latest snapshot plus TUI-local state. Local state resets whenever the app
/// mounts a screen.
pub struct ViewState {
    pub snapshot: AppSnapshot,
    pub focus: Focus,
    /// Mirror of the search box; the app receives it on every keystroke.
    pub search_input: String,
    pub form: AuthForm,
    pub results_idx: usize,
    pub saved_idx: usize,
    pub candidate_idx: usize,
    /// Diamond cursor; distinct from the lineup's active slot.
    pub slot_cursor: Slot,
}

impl Default for ViewState {
    fn default() -> Self {
        let snapshot = AppSnapshot::default();
        ViewState {
            focus: Focus::initial(snapshot.route),
            form: AuthForm::new(snapshot.route),
            snapshot,
            search_input: String::new(),
            results_idx: 0,
            saved_idx: 0,
            candidate_idx: 0,
            slot_cursor: Slot::LeftField,
        }
    }
}

impl ViewState {
    /// Replace the snapshot. A new mount resets local state; otherwise list
    /// cursors are clamped to the new list lengths.
    pub fn apply_snapshot(&mut self, snapshot: AppSnapshot) {
        if snapshot.mount != self.snapshot.mount {
            self.focus = Focus::initial(snapshot.route);
            self.form = AuthForm::new(snapshot.route);
            self.search_input.clear();
            self.results_idx = 0;
            self.saved_idx = 0;
            self.candidate_idx = 0;
            self.slot_cursor = Slot::LeftField;
        }
        self.snapshot = snapshot;

        self.results_idx = clamp_index(self.results_idx, self.result_count());
        self.saved_idx = clamp_index(self.saved_idx, self.snapshot.roster.players.len());
        self.candidate_idx = clamp_index(self.candidate_idx, self.candidate_count());
    }

    pub fn result_count(&self) -> usize {
        self.snapshot.search.as_ref().map_or(0, |s| s.rows.len())
    }

    pub fn candidate_count(&self) -> usize {
        self.snapshot.lineup.as_ref().map_or(0, |l| l.candidates.len())
    }

    /// Move focus to the next (or previous) target of the mounted route.
    pub fn cycle_focus(&mut self, forward: bool) {
        let targets = Focus::cycle(self.snapshot.route);
        let i = targets.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (i + 1) % targets.len()
        } else {
            (i + targets.len() - 1) % targets.len()
        };
        self.focus = targets[next];
    }
}

fn clamp_index(idx: usize, len: usize) -> usize {
    idx.min(len.saturating_sub(1))
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Snapshot(snapshot) => state.apply_snapshot(*snapshot),
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete frame for the mounted route.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::sidebar::render(frame, layout.sidebar, state);
    widgets::header::render(frame, layout.header, state);

    if !state.snapshot.content_visible() {
        widgets::gate::render(frame, layout.main_panel, state);
    } else {
        match state.snapshot.route {
            Route::Landing => widgets::landing::render(frame, layout.main_panel, state),
            Route::Login | Route::Signup => {
                widgets::auth_form::render(frame, layout.main_panel, state)
            }
            Route::Dashboard => widgets::dashboard::render(frame, layout.main_panel, state),
            Route::TeamBuilder => widgets::team_builder::render(frame, layout.main_panel, state),
            Route::TeamAnalysis | Route::Recommendations | Route::MlbTeams => {
                widgets::info_page::render(frame, layout.main_panel, state)
            }
        }
    }

    widgets::help_bar::render(frame, layout.help_bar, state);

    // Overlay last so it sits above the main panel.
    if state.snapshot.detail.is_some() {
        widgets::detail::render(frame, frame.area(), state);
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// 1. Initializes the terminal (raw mode, alternate screen).
/// 2. Installs a panic hook that restores the terminal.
/// 3. Selects over snapshots, keyboard input, and render ticks.
/// 4. Restores the terminal on exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // App is shutting down
                    None => break,
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break;
                            }
                        }
                    }
                    // Mouse and resize events are picked up by the next draw
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!("Terminal input error: {}", e);
                        break;
                    }
                    None => break,
                }
            }

            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    ratatui::restore();

    Ok(())
}

// ---------------------------------------------------------------------------
// Test fixtures
// ---------------------------------------------------------------------------


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
