//! Full-screen TUI for Huddle.
//!
//! Elm-style: terminal input and request completions become `UiEvent`s, the
//! `update` reducer mutates `AppState` and returns `UiEffect`s, and the
//! runtime executes those effects on the tokio runtime.

pub mod common;
pub mod effects;
pub mod events;
pub mod overlays;
pub mod render;
pub mod runtime;
pub mod sidebar;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stderr};

use anyhow::Result;
use huddle_core::config::Config;
pub use runtime::TuiRuntime;

/// Runs the interactive client until the user quits.
///
/// Must be called from within a multi-threaded tokio runtime context;
/// identity requests are spawned onto it while the event loop blocks this
/// thread.
///
/// # Errors
/// Returns an error if stderr is not a terminal or the runtime fails.
pub fn run_interactive(config: &Config) -> Result<()> {
    if !stderr().is_terminal() {
        anyhow::bail!(
            "The interactive client requires a terminal.\n\
             Use `huddle login` or `huddle register` for non-interactive use."
        );
    }

    let mut runtime = TuiRuntime::new(config)?;
    runtime.run()
}
