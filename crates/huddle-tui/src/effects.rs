//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They cover task spawning only, so the reducer never performs I/O.

use huddle_core::auth::{Credentials, RegistrationRequest, Submission};

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Send a validated registration to the identity service.
    SpawnRegister(Submission<RegistrationRequest>),

    /// Send validated credentials to the identity service.
    SpawnLogin(Submission<Credentials>),

    /// Ask the identity service to end the current session.
    SpawnLogout,
}
