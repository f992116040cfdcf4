//! Navigation sidebar.
//!
//! Signed-in users see the configured chatrooms, then `Profile (<name>)` and
//! `Logout`. Anonymous users only see `Login`.

use huddle_core::auth::Session;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::common::truncate_with_ellipsis;

/// Width of the sidebar column.
pub const SIDEBAR_WIDTH: u16 = 26;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavLink {
    Chatroom(usize),
    Profile,
    Logout,
    Login,
}

impl NavLink {
    /// Bottom-section links are pinned below the chatrooms.
    fn is_pinned(self) -> bool {
        !matches!(self, NavLink::Chatroom(_))
    }
}

/// Links visible for the given session, top to bottom.
pub fn links(session: &Session, chatrooms: &[String]) -> Vec<NavLink> {
    if session.is_authenticated() {
        (0..chatrooms.len())
            .map(NavLink::Chatroom)
            .chain([NavLink::Profile, NavLink::Logout])
            .collect()
    } else {
        vec![NavLink::Login]
    }
}

pub fn label(link: NavLink, session: &Session, chatrooms: &[String]) -> String {
    match link {
        NavLink::Chatroom(index) => chatrooms.get(index).cloned().unwrap_or_default(),
        NavLink::Profile => format!("Profile ({})", session.fullname),
        NavLink::Logout => "Logout".to_string(),
        NavLink::Login => "Login".to_string(),
    }
}

/// Keyboard selection and the active chatroom.
#[derive(Debug, Default)]
pub struct SidebarState {
    selected: usize,
    active_room: usize,
}

impl SidebarState {
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn active_room(&self) -> usize {
        self.active_room
    }

    pub fn select_next(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn set_active_room(&mut self, index: usize) {
        self.active_room = index;
    }

    /// Keeps the selection in range after the link list changed.
    pub fn clamp(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    /// Returns the selected link, if any.
    pub fn current(&self, links: &[NavLink]) -> Option<NavLink> {
        links.get(self.selected).copied()
    }
}

pub fn render_sidebar(
    frame: &mut Frame,
    area: Rect,
    state: &SidebarState,
    session: &Session,
    chatrooms: &[String],
) {
    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let all = links(session, chatrooms);
    let split = all.iter().position(|link| link.is_pinned()).unwrap_or(all.len());
    let (top, bottom) = all.split_at(split);

    let [header, top_area, bottom_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(0),
        Constraint::Length(bottom.len() as u16),
    ])
    .areas(inner);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            " huddle",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))),
        header,
    );

    let max_width = inner.width.saturating_sub(3) as usize;
    let row = |index: usize, link: NavLink| {
        let selected = index == state.selected;
        let active = matches!(link, NavLink::Chatroom(room) if room == state.active_room);
        let marker = if selected { "▸ " } else { "  " };
        let mut style = Style::default().fg(Color::Gray);
        if active {
            style = style.fg(Color::Cyan);
        }
        if selected {
            style = style.add_modifier(Modifier::REVERSED);
        }
        Line::from(vec![
            Span::raw(marker),
            Span::styled(
                truncate_with_ellipsis(&label(link, session, chatrooms), max_width),
                style,
            ),
        ])
    };

    let top_lines: Vec<Line> = top.iter().enumerate().map(|(i, &l)| row(i, l)).collect();
    let bottom_lines: Vec<Line> = bottom
        .iter()
        .enumerate()
        .map(|(i, &l)| row(split + i, l))
        .collect();
    frame.render_widget(Paragraph::new(top_lines), top_area);
    frame.render_widget(Paragraph::new(bottom_lines), bottom_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_in() -> Session {
        Session {
            user_id: Some("u1".into()),
            fullname: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            avatar_url: None,
        }
    }

    fn rooms() -> Vec<String> {
        vec!["Chatrooms".to_string()]
    }

    #[test]
    fn test_anonymous_sees_only_login() {
        assert_eq!(links(&Session::anonymous(), &rooms()), vec![NavLink::Login]);
    }

    #[test]
    fn test_signed_in_sees_rooms_profile_and_logout() {
        assert_eq!(
            links(&signed_in(), &rooms()),
            vec![NavLink::Chatroom(0), NavLink::Profile, NavLink::Logout]
        );
    }

    #[test]
    fn test_profile_label_includes_fullname() {
        assert_eq!(
            label(NavLink::Profile, &signed_in(), &rooms()),
            "Profile (Ada Lovelace)"
        );
        assert_eq!(label(NavLink::Chatroom(0), &signed_in(), &rooms()), "Chatrooms");
    }

    #[test]
    fn test_selection_stays_in_range() {
        let mut state = SidebarState::default();
        state.select_next(3);
        state.select_next(3);
        state.select_next(3);
        assert_eq!(state.selected(), 2);

        state.clamp(1);
        assert_eq!(state.selected(), 0);
        state.select_prev();
        assert_eq!(state.selected(), 0);
    }
}
