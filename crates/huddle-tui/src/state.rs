//! Application state composition.
//!
//! ```text
//! AppState
//! ├── auth: AuthController      (session, UI flags, form errors, in-flight tokens)
//! ├── forms: AuthFormsState     (typed values and focus per form)
//! ├── sidebar: SidebarState     (selection, active chatroom)
//! ├── chatrooms: Vec<String>    (sidebar links from config)
//! ├── spinner_frame: usize
//! ├── logout_pending: bool
//! └── should_quit: bool
//! ```
//!
//! Only the reducer mutates this state. The session and the UI flags are
//! reached through the controller so there is a single writer.

use huddle_core::auth::{AuthController, FormKind};
use huddle_core::config::Config;

use crate::overlays::AuthFormsState;
use crate::sidebar::{self, NavLink, SidebarState};

pub struct AppState {
    pub auth: AuthController,
    pub forms: AuthFormsState,
    pub sidebar: SidebarState,
    pub chatrooms: Vec<String>,
    pub spinner_frame: usize,
    pub logout_pending: bool,
    pub should_quit: bool,
}

impl AppState {
    /// Starts anonymous with every overlay closed.
    pub fn new(config: &Config) -> Self {
        Self {
            auth: AuthController::default(),
            forms: AuthFormsState::new(),
            sidebar: SidebarState::default(),
            chatrooms: config.chatrooms.clone(),
            spinner_frame: 0,
            logout_pending: false,
            should_quit: false,
        }
    }

    /// Sidebar links for the current session.
    pub fn nav_links(&self) -> Vec<NavLink> {
        sidebar::links(self.auth.session(), &self.chatrooms)
    }

    pub fn is_busy(&self) -> bool {
        self.logout_pending
            || self.auth.is_submitting(FormKind::Register)
            || self.auth.is_submitting(FormKind::Login)
    }
}
