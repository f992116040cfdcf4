//! Auth overlay: the Register and Login forms.
//!
//! Field values and focus live here; errors, notices and the submitting flag
//! are owned by the `AuthController` and only read during render.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use enum_map::EnumMap;
use huddle_core::auth::{AuthController, Credentials, Field, FormKind, RegistrationRequest};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::render_utils::{
    InputHint, InputLine, calculate_overlay_area, render_hints, render_input_line,
    render_overlay_container,
};
use crate::common::mask;

const OVERLAY_WIDTH: u16 = 56;

/// Spinner frames shown next to "Submitting".
const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

/// What a key press asks the reducer to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    None,
    Submit,
    SwitchForm,
    Cancel,
}

/// Values and focus for both forms. Switching forms keeps what was typed.
#[derive(Debug, Default)]
pub struct AuthFormsState {
    values: EnumMap<FormKind, EnumMap<Field, String>>,
    focus: EnumMap<FormKind, usize>,
}

impl AuthFormsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, kind: FormKind, field: Field) -> &str {
        &self.values[kind][field]
    }

    pub fn set_value(&mut self, kind: FormKind, field: Field, value: impl Into<String>) {
        self.values[kind][field] = value.into();
    }

    pub fn focused_field(&self, kind: FormKind) -> Field {
        let fields = kind.fields();
        fields[self.focus[kind].min(fields.len() - 1)]
    }

    pub fn focus_next(&mut self, kind: FormKind) {
        let len = kind.fields().len();
        self.focus[kind] = (self.focus[kind] + 1) % len;
    }

    pub fn focus_prev(&mut self, kind: FormKind) {
        let len = kind.fields().len();
        self.focus[kind] = (self.focus[kind] + len - 1) % len;
    }

    /// Inserts pasted text into the focused field. Line breaks are dropped.
    pub fn paste(&mut self, kind: FormKind, text: &str) {
        let field = self.focused_field(kind);
        self.values[kind][field].extend(text.chars().filter(|c| !matches!(c, '\r' | '\n')));
    }

    pub fn registration(&self) -> RegistrationRequest {
        let values = &self.values[FormKind::Register];
        RegistrationRequest {
            fullname: values[Field::Fullname].clone(),
            email: values[Field::Email].clone(),
            password: values[Field::Password].clone(),
            confirm_password: values[Field::ConfirmPassword].clone(),
        }
    }

    pub fn credentials(&self) -> Credentials {
        let values = &self.values[FormKind::Login];
        Credentials::new(values[Field::Email].clone(), values[Field::Password].clone())
    }

    /// Clears a form after it produced a session.
    pub fn reset(&mut self, kind: FormKind) {
        self.values[kind] = EnumMap::default();
        self.focus[kind] = 0;
    }

    /// Applies a key press to the given form.
    pub fn handle_key(&mut self, kind: FormKind, key: KeyEvent) -> AuthAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => AuthAction::Cancel,
            KeyCode::Enter => AuthAction::Submit,
            KeyCode::Char('t') if ctrl => AuthAction::SwitchForm,
            KeyCode::Tab | KeyCode::Down => {
                self.focus_next(kind);
                AuthAction::None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus_prev(kind);
                AuthAction::None
            }
            KeyCode::Backspace => {
                let field = self.focused_field(kind);
                self.values[kind][field].pop();
                AuthAction::None
            }
            KeyCode::Char('u') if ctrl => {
                let field = self.focused_field(kind);
                self.values[kind][field].clear();
                AuthAction::None
            }
            KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                let field = self.focused_field(kind);
                self.values[kind][field].push(c);
                AuthAction::None
            }
            _ => AuthAction::None,
        }
    }
}

fn placeholder(field: Field) -> &'static str {
    match field {
        Field::Fullname => "Enter your full name",
        Field::Email => "Enter your email",
        Field::Password => "Enter your password",
        Field::ConfirmPassword => "Confirm your password",
    }
}

fn switch_label(kind: FormKind) -> &'static str {
    match kind {
        FormKind::Register => "Already registered? Login here",
        FormKind::Login => "Need an account? Register here",
    }
}

/// Renders the overlay for the active form.
pub fn render_auth_overlay(
    frame: &mut Frame,
    area: Rect,
    auth: &AuthController,
    forms: &AuthFormsState,
    spinner_frame: usize,
) {
    let kind = auth.active_form();
    let fields = kind.fields();
    // Three rows per field, then status, switch link, gap, hints and borders.
    let height = fields.len() as u16 * 3 + 6;
    let popup = calculate_overlay_area(area, area.height, OVERLAY_WIDTH, height);
    render_overlay_container(frame, popup, kind.title(), Color::Cyan);

    let inner = Rect::new(
        popup.x + 1,
        popup.y + 1,
        popup.width.saturating_sub(2),
        popup.height.saturating_sub(2),
    );
    let submitting = auth.is_submitting(kind);
    let focused = forms.focused_field(kind);
    let errors = auth.errors(kind);

    let mut y = inner.y;
    let bottom = inner.y + inner.height;
    for &field in fields {
        if y + 2 > bottom {
            break;
        }
        let is_focused = field == focused;
        let label_style = if is_focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(field.label(), label_style))),
            Rect::new(inner.x, y, inner.width, 1),
        );

        let raw = forms.value(kind, field);
        let shown = if field.is_secret() {
            mask(raw)
        } else {
            raw.to_string()
        };
        render_input_line(
            frame,
            Rect::new(inner.x, y + 1, inner.width, 1),
            &InputLine {
                value: &shown,
                placeholder: Some(placeholder(field)),
                prompt: if is_focused { "> " } else { "  " },
                prompt_color: Color::Cyan,
                text_color: Color::White,
                placeholder_color: Color::DarkGray,
                cursor_color: Color::Cyan,
                show_cursor: is_focused,
            },
        );

        if let Some(message) = errors.for_field(field)
            && y + 2 < bottom
        {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    format!("  {message}"),
                    Style::default().fg(Color::Red),
                ))),
                Rect::new(inner.x, y + 2, inner.width, 1),
            );
        }
        y += 3;
    }

    if y < bottom {
        let status = if submitting {
            let spinner = SPINNER_FRAMES[spinner_frame % SPINNER_FRAMES.len()];
            Some(Span::styled(
                format!("{spinner} Submitting…"),
                Style::default().fg(Color::Yellow),
            ))
        } else {
            auth.notice(kind)
                .map(|notice| Span::styled(notice.to_string(), Style::default().fg(Color::Red)))
        };
        if let Some(span) = status {
            frame.render_widget(
                Paragraph::new(Line::from(span)),
                Rect::new(inner.x, y, inner.width, 1),
            );
        }
        y += 1;
    }

    if y < bottom {
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(
                    switch_label(kind),
                    Style::default()
                        .fg(Color::Blue)
                        .add_modifier(Modifier::UNDERLINED),
                ),
                Span::styled(" (Ctrl+T)", Style::default().fg(Color::DarkGray)),
            ])),
            Rect::new(inner.x, y, inner.width, 1),
        );
    }

    let submit_action = if submitting { "wait" } else { kind.title() };
    render_hints(
        frame,
        inner,
        &[
            InputHint::new("Enter", submit_action),
            InputHint::new("Tab", "next"),
            InputHint::new("Esc", "cancel"),
        ],
        Color::Cyan,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(forms: &mut AuthFormsState, kind: FormKind, text: &str) {
        for c in text.chars() {
            assert_eq!(forms.handle_key(kind, key(KeyCode::Char(c))), AuthAction::None);
        }
    }

    #[test]
    fn test_typing_fills_focused_field_and_tab_advances() {
        let mut forms = AuthFormsState::new();
        type_text(&mut forms, FormKind::Login, "a@b.c");
        forms.handle_key(FormKind::Login, key(KeyCode::Tab));
        type_text(&mut forms, FormKind::Login, "secret");

        assert_eq!(forms.credentials(), Credentials::new("a@b.c", "secret"));
    }

    #[test]
    fn test_focus_wraps_in_both_directions() {
        let mut forms = AuthFormsState::new();
        assert_eq!(forms.focused_field(FormKind::Register), Field::Fullname);
        forms.focus_prev(FormKind::Register);
        assert_eq!(forms.focused_field(FormKind::Register), Field::ConfirmPassword);
        forms.focus_next(FormKind::Register);
        assert_eq!(forms.focused_field(FormKind::Register), Field::Fullname);
    }

    #[test]
    fn test_forms_keep_separate_values() {
        let mut forms = AuthFormsState::new();
        forms.set_value(FormKind::Register, Field::Email, "new@x.io");
        forms.set_value(FormKind::Login, Field::Email, "old@x.io");

        assert_eq!(forms.registration().email, "new@x.io");
        assert_eq!(forms.credentials().email, "old@x.io");
    }

    #[test]
    fn test_control_keys_map_to_actions() {
        let mut forms = AuthFormsState::new();
        assert_eq!(forms.handle_key(FormKind::Login, key(KeyCode::Enter)), AuthAction::Submit);
        assert_eq!(forms.handle_key(FormKind::Login, key(KeyCode::Esc)), AuthAction::Cancel);
        assert_eq!(forms.handle_key(FormKind::Login, ctrl('t')), AuthAction::SwitchForm);
        // Ctrl+T must not leak a 't' into the field.
        assert_eq!(forms.value(FormKind::Login, Field::Email), "");
    }

    #[test]
    fn test_backspace_and_clear_line() {
        let mut forms = AuthFormsState::new();
        type_text(&mut forms, FormKind::Login, "abc");
        forms.handle_key(FormKind::Login, key(KeyCode::Backspace));
        assert_eq!(forms.value(FormKind::Login, Field::Email), "ab");
        forms.handle_key(FormKind::Login, ctrl('u'));
        assert_eq!(forms.value(FormKind::Login, Field::Email), "");
    }

    #[test]
    fn test_paste_strips_newlines() {
        let mut forms = AuthFormsState::new();
        forms.paste(FormKind::Login, "me@x.io\r\n");
        assert_eq!(forms.value(FormKind::Login, Field::Email), "me@x.io");
    }

    #[test]
    fn test_reset_clears_values_and_focus() {
        let mut forms = AuthFormsState::new();
        type_text(&mut forms, FormKind::Login, "abc");
        forms.focus_next(FormKind::Login);
        forms.reset(FormKind::Login);

        assert_eq!(forms.credentials(), Credentials::default());
        assert_eq!(forms.focused_field(FormKind::Login), Field::Email);
    }
}
