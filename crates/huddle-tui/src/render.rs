//! Pure view/render functions for the TUI.
//!
//! Functions here take `&AppState`, draw to a ratatui `Frame` and never
//! mutate state or return effects.

use huddle_core::auth::UiFlag;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::overlays::{render_auth_overlay, render_profile_overlay};
use crate::sidebar::{SIDEBAR_WIDTH, render_sidebar};
use crate::state::AppState;

/// Height of the key hint line at the bottom of the main pane.
const STATUS_HEIGHT: u16 = 1;

/// Renders the entire TUI to the frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    let [sidebar_area, main_area] =
        Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)]).areas(area);

    render_sidebar(
        frame,
        sidebar_area,
        &app.sidebar,
        app.auth.session(),
        &app.chatrooms,
    );
    render_main(app, frame, main_area);

    if app.auth.ui().is_open(UiFlag::ProfileSettings) {
        render_profile_overlay(frame, area, app.auth.session());
    }
    if app.auth.is_overlay_open() {
        render_auth_overlay(frame, area, &app.auth, &app.forms, app.spinner_frame);
    }
}

fn render_main(app: &AppState, frame: &mut Frame, area: Rect) {
    let [body, status] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(STATUS_HEIGHT)]).areas(area);

    let session = app.auth.session();
    let lines = if session.is_authenticated() {
        let room = app
            .chatrooms
            .get(app.sidebar.active_room())
            .map_or("", String::as_str);
        vec![
            Line::from(Span::styled(
                room.to_string(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(format!("Signed in as {} <{}>", session.fullname, session.email)),
        ]
    } else {
        vec![
            Line::from(Span::styled(
                "Welcome to huddle",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(Span::styled(
                "Select Login in the sidebar to sign in or create an account.",
                Style::default().fg(Color::DarkGray),
            )),
        ]
    };
    let top = body.y + body.height.saturating_sub(lines.len() as u16) / 2;
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        Rect::new(body.x, top, body.width, body.height.saturating_sub(top - body.y)),
    );

    let hint = if app.logout_pending {
        "Signing out…"
    } else {
        "↑/↓ select • Enter open • q quit"
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            hint,
            Style::default().fg(Color::DarkGray),
        )))
        .alignment(Alignment::Right),
        status,
    );
}
