// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into `UserCommand`s for the app
// orchestrator, or into local `ViewState` changes (focus, typed text, list
// cursors).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use cybermetrics_core::gate::Route;
use cybermetrics_core::models::PlayerSummary;

use super::{AuthForm, Focus, ViewState};
use crate::protocol::UserCommand;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app orchestrator, `None` when it was handled locally.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits regardless of focus
    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    // The detail overlay swallows everything except its close keys
    if view_state.snapshot.detail.is_some() {
        return match key_event.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Some(UserCommand::CloseDetail),
            _ => None,
        };
    }

    // Gate still checking or redirecting: nothing to interact with yet
    if !view_state.snapshot.content_visible() {
        return match key_event.code {
            KeyCode::Char('q') => Some(UserCommand::Quit),
            _ => None,
        };
    }

    match view_state.focus {
        Focus::Form => handle_form(key_event, view_state),
        Focus::Search => handle_search(key_event, view_state),
        _ => handle_normal(key_event, view_state),
    }
}

// ---------------------------------------------------------------------------
// Text entry
// ---------------------------------------------------------------------------

fn handle_form(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let route = view_state.snapshot.route;
    match key_event.code {
        KeyCode::Esc => Some(UserCommand::Navigate(Route::Landing)),
        KeyCode::Tab | KeyCode::Down => {
            view_state.form.move_active(route, true);
            None
        }
        KeyCode::BackTab | KeyCode::Up => {
            view_state.form.move_active(route, false);
            None
        }
        KeyCode::Backspace => {
            let field = view_state.form.active;
            view_state.form.value_mut(field).pop();
            None
        }
        KeyCode::Enter => submit_form(view_state),
        KeyCode::Char(c) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            let field = view_state.form.active;
            view_state.form.value_mut(field).push(c);
            None
        }
        _ => None,
    }
}

/// Build the login or signup command from the form. Nothing is sent while a
/// request is already in flight; validation happens in the app.
pub fn submit_form(view_state: &ViewState) -> Option<UserCommand> {
    if view_state.snapshot.auth_pending {
        return None;
    }
    let AuthForm {
        display_name,
        email,
        password,
        ..
    } = &view_state.form;
    match view_state.snapshot.route {
        Route::Login => Some(UserCommand::Login {
            email: email.clone(),
            password: password.clone(),
        }),
        Route::Signup => Some(UserCommand::Signup {
            email: email.clone(),
            password: password.clone(),
            display_name: Some(display_name.trim().to_string()).filter(|n| !n.is_empty()),
        }),
        _ => None,
    }
}

fn handle_search(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char(c) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            view_state.search_input.push(c);
            Some(UserCommand::SearchInput(view_state.search_input.clone()))
        }
        KeyCode::Backspace => {
            view_state.search_input.pop()?;
            Some(UserCommand::SearchInput(view_state.search_input.clone()))
        }
        KeyCode::Tab | KeyCode::Esc | KeyCode::Enter | KeyCode::Down => {
            view_state.cycle_focus(true);
            None
        }
        KeyCode::BackTab => {
            view_state.cycle_focus(false);
            None
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

fn handle_normal(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let route = view_state.snapshot.route;

    // Global keys
    match key_event.code {
        KeyCode::Char('q') => return Some(UserCommand::Quit),
        KeyCode::Char(c @ '1'..='5') => {
            let idx = (c as usize) - ('1' as usize);
            return Some(UserCommand::Navigate(Route::NAV[idx]));
        }
        KeyCode::Tab => {
            view_state.cycle_focus(true);
            return None;
        }
        KeyCode::BackTab => {
            view_state.cycle_focus(false);
            return None;
        }
        KeyCode::Char('/') if route.has_search() => {
            view_state.focus = Focus::Search;
            return None;
        }
        KeyCode::Char('o') if route.requires_auth() => return Some(UserCommand::Logout),
        _ => {}
    }

    match route {
        Route::Landing => handle_landing(key_event, view_state),
        Route::Dashboard => handle_dashboard(key_event, view_state),
        Route::TeamBuilder => handle_team_builder(key_event, view_state),
        _ => None,
    }
}

fn handle_landing(key_event: KeyEvent, view_state: &ViewState) -> Option<UserCommand> {
    let signed_in = view_state.snapshot.landing_auth == Some(true);
    match key_event.code {
        KeyCode::Char('d') if signed_in => Some(UserCommand::Navigate(Route::Dashboard)),
        KeyCode::Char('l') if !signed_in => Some(UserCommand::Navigate(Route::Login)),
        KeyCode::Char('s') if !signed_in => Some(UserCommand::Navigate(Route::Signup)),
        _ => None,
    }
}

fn handle_dashboard(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    if key_event.code == KeyCode::Char('h') {
        return Some(UserCommand::CheckHealth);
    }

    match view_state.focus {
        Focus::Results => {
            let count = view_state.result_count();
            match key_event.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    view_state.results_idx = view_state.results_idx.saturating_sub(1);
                    None
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    view_state.results_idx = step_down(view_state.results_idx, count);
                    None
                }
                KeyCode::Enter | KeyCode::Char('a') => {
                    let row = selected_row(view_state)?;
                    (!row.saved).then(|| UserCommand::AddPlayer(PlayerSummary::from(&row.result)))
                }
                KeyCode::Char('i') => {
                    selected_row(view_state).map(|row| UserCommand::ShowDetail(row.result.id))
                }
                _ => None,
            }
        }
        Focus::Saved => {
            let count = view_state.snapshot.roster.players.len();
            let selected = view_state.snapshot.roster.players.get(view_state.saved_idx);
            match key_event.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    view_state.saved_idx = view_state.saved_idx.saturating_sub(1);
                    None
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    view_state.saved_idx = step_down(view_state.saved_idx, count);
                    None
                }
                KeyCode::Char('d') | KeyCode::Delete => {
                    selected.map(|p| UserCommand::RemovePlayer(p.id))
                }
                KeyCode::Enter | KeyCode::Char('i') => {
                    selected.map(|p| UserCommand::ShowDetail(p.id))
                }
                _ => None,
            }
        }
        _ => None,
    }
}

fn handle_team_builder(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match view_state.focus {
        Focus::Slots => match key_event.code {
            KeyCode::Up | KeyCode::Left | KeyCode::Char('k') => {
                view_state.slot_cursor = view_state.slot_cursor.prev();
                None
            }
            KeyCode::Down | KeyCode::Right | KeyCode::Char('j') => {
                view_state.slot_cursor = view_state.slot_cursor.next();
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                Some(UserCommand::SelectSlot(view_state.slot_cursor))
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                Some(UserCommand::ClearSlot(view_state.slot_cursor))
            }
            _ => None,
        },
        Focus::Candidates => {
            let count = view_state.candidate_count();
            match key_event.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    view_state.candidate_idx = view_state.candidate_idx.saturating_sub(1);
                    None
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    view_state.candidate_idx = step_down(view_state.candidate_idx, count);
                    None
                }
                KeyCode::Enter | KeyCode::Char('a') => {
                    let candidate = view_state
                        .snapshot
                        .lineup
                        .as_ref()?
                        .candidates
                        .get(view_state.candidate_idx)?;
                    candidate
                        .assignable
                        .then(|| UserCommand::AssignPlayer(candidate.player.clone()))
                }
                KeyCode::Char('i') => view_state
                    .snapshot
                    .lineup
                    .as_ref()?
                    .candidates
                    .get(view_state.candidate_idx)
                    .map(|c| UserCommand::ShowDetail(c.player.id)),
                _ => None,
            }
        }
        _ => None,
    }
}

fn selected_row(view_state: &ViewState) -> Option<&crate::protocol::SearchRow> {
    view_state
        .snapshot
        .search
        .as_ref()?
        .rows
        .get(view_state.results_idx)
}

fn step_down(idx: usize, count: usize) -> usize {
    if idx + 1 < count {
        idx + 1
    } else {
        idx
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
