//! Interactive client (default command).

use anyhow::Result;
use huddle_core::config::Config;
#[cfg(feature = "tui")]
use huddle_core::logging;

#[cfg(feature = "tui")]
pub fn run(config: &Config) -> Result<()> {
    // The TUI owns the terminal, so logs go to a file.
    let _guard = match logging::init_file(config) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("Warning: file logging disabled: {err:#}");
            None
        }
    };
    huddle_tui::run_interactive(config)
}

#[cfg(not(feature = "tui"))]
pub fn run(_config: &Config) -> Result<()> {
    anyhow::bail!(
        "This build has no interactive client.\n\
         Use `huddle login` or `huddle register` instead."
    )
}
