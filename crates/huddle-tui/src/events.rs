//! UI event types.
//!
//! Everything the reducer reacts to: terminal input, the periodic tick and
//! completions of identity requests spawned by the runtime.

use crossterm::event::Event;
use huddle_core::auth::{RemoteUser, RequestToken, ServiceError};

#[derive(Debug)]
pub enum UiEvent {
    /// Periodic tick for spinner animation.
    Tick,

    /// Raw terminal input.
    Terminal(Event),

    /// A registration request finished.
    RegisterCompleted {
        token: RequestToken,
        result: Result<RemoteUser, ServiceError>,
    },

    /// A login request finished.
    LoginCompleted {
        token: RequestToken,
        result: Result<RemoteUser, ServiceError>,
    },

    /// A logout request finished.
    LogoutCompleted { result: Result<(), ServiceError> },
}
