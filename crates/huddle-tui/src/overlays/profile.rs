//! Profile settings modal.

use crossterm::event::{KeyCode, KeyEvent};
use huddle_core::auth::Session;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::render_utils::{
    InputHint, calculate_overlay_area, render_hints, render_overlay_container,
};
use crate::common::truncate_with_ellipsis;

const OVERLAY_WIDTH: u16 = 48;
const OVERLAY_HEIGHT: u16 = 8;
const LABEL_WIDTH: usize = 8;

/// Returns true when the key closes the modal.
pub fn handle_profile_key(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q'))
}

pub fn render_profile_overlay(frame: &mut Frame, area: Rect, session: &Session) {
    let popup = calculate_overlay_area(area, area.height, OVERLAY_WIDTH, OVERLAY_HEIGHT);
    render_overlay_container(frame, popup, "Profile", Color::Magenta);

    let inner = Rect::new(
        popup.x + 1,
        popup.y + 1,
        popup.width.saturating_sub(2),
        popup.height.saturating_sub(2),
    );
    let value_width = (inner.width as usize).saturating_sub(LABEL_WIDTH + 1);
    let rows = [
        ("Name", session.fullname.as_str()),
        ("Email", session.email.as_str()),
        ("Avatar", session.avatar_url.as_deref().unwrap_or("none")),
    ];

    let lines: Vec<Line> = rows
        .iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(
                    format!("{label:<width$} ", width = LABEL_WIDTH),
                    Style::default()
                        .fg(Color::Magenta)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(truncate_with_ellipsis(value, value_width)),
            ])
        })
        .collect();
    frame.render_widget(
        Paragraph::new(lines),
        Rect::new(inner.x + 1, inner.y + 1, inner.width.saturating_sub(1), 3),
    );

    render_hints(frame, inner, &[InputHint::new("Esc", "close")], Color::Magenta);
}
