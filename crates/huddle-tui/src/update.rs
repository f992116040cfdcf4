//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use huddle_core::auth::{FormKind, UiFlag};
use tracing::debug;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::overlays::{AuthAction, handle_profile_key};
use crate::sidebar::NavLink;
use crate::state::AppState;

/// The main reducer function.
///
/// Takes the current state and an event, mutates state, and returns effects
/// for the runtime to execute.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            if app.is_busy() {
                app.spinner_frame = app.spinner_frame.wrapping_add(1);
            }
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),
        UiEvent::RegisterCompleted { token, result } => {
            if app.auth.complete_register(token, result).is_ok() {
                app.forms.reset(FormKind::Register);
            }
            sync_sidebar(app);
            vec![]
        }
        UiEvent::LoginCompleted { token, result } => {
            if app.auth.complete_login(token, result).is_ok() {
                app.forms.reset(FormKind::Login);
            }
            sync_sidebar(app);
            vec![]
        }
        UiEvent::LogoutCompleted { result } => {
            app.logout_pending = false;
            app.auth.complete_logout(result);
            sync_sidebar(app);
            vec![]
        }
    }
}

fn sync_sidebar(app: &mut AppState) {
    let len = app.nav_links().len();
    app.sidebar.clamp(len);
}

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
        Event::Paste(text) => {
            if app.auth.is_overlay_open() {
                app.forms.paste(app.auth.active_form(), &text);
            }
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return vec![UiEffect::Quit];
    }

    if app.auth.is_overlay_open() {
        return handle_auth_key(app, key);
    }

    if app.auth.ui().is_open(UiFlag::ProfileSettings) {
        if handle_profile_key(key) {
            app.auth.ui_mut().set(UiFlag::ProfileSettings, false);
        }
        return vec![];
    }

    handle_sidebar_key(app, key)
}

fn handle_auth_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let kind = app.auth.active_form();
    match app.forms.handle_key(kind, key) {
        AuthAction::None => vec![],
        AuthAction::Submit => submit(app, kind),
        AuthAction::SwitchForm => {
            app.auth.switch_form();
            vec![]
        }
        AuthAction::Cancel => {
            app.auth.close_overlay();
            vec![]
        }
    }
}

/// Validates the active form and spawns the request when it passes.
fn submit(app: &mut AppState, kind: FormKind) -> Vec<UiEffect> {
    if app.auth.is_submitting(kind) {
        debug!(form = ?kind, "submit ignored while a request is in flight");
        return vec![];
    }
    match kind {
        FormKind::Register => app
            .auth
            .begin_register(app.forms.registration())
            .ok()
            .map(UiEffect::SpawnRegister)
            .into_iter()
            .collect(),
        FormKind::Login => app
            .auth
            .begin_login(app.forms.credentials())
            .ok()
            .map(UiEffect::SpawnLogin)
            .into_iter()
            .collect(),
    }
}

fn handle_sidebar_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    match key.code {
        KeyCode::Char('q') => vec![UiEffect::Quit],
        KeyCode::Up | KeyCode::Char('k') => {
            app.sidebar.select_prev();
            vec![]
        }
        KeyCode::Down | KeyCode::Char('j') => {
            let len = app.nav_links().len();
            app.sidebar.select_next(len);
            vec![]
        }
        KeyCode::Enter => activate_link(app),
        _ => vec![],
    }
}

fn activate_link(app: &mut AppState) -> Vec<UiEffect> {
    let links = app.nav_links();
    let Some(link) = app.sidebar.current(&links) else {
        return vec![];
    };
    match link {
        NavLink::Chatroom(index) => app.sidebar.set_active_room(index),
        NavLink::Profile => {
            app.auth.ui_mut().toggle(UiFlag::ProfileSettings);
        }
        NavLink::Logout => {
            if app.logout_pending {
                return vec![];
            }
            app.logout_pending = true;
            app.auth.begin_logout();
            return vec![UiEffect::SpawnLogout];
        }
        NavLink::Login => app.auth.toggle_overlay(),
    }
    vec![]
}
