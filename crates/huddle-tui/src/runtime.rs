//! TUI runtime: owns the terminal, runs the event loop, executes effects.
//!
//! All side effects happen here. The reducer stays pure and produces
//! effects; spawned identity requests report back through the inbox channel
//! as `UiEvent`s carrying their request token.

use std::future::Future;
use std::io::Stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use huddle_core::auth::{GraphQlIdentityService, IdentityService, Submission};
use huddle_core::config::Config;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::{render, terminal, update};

/// Tick interval while a request is in flight (spinner animation).
pub const BUSY_TICK: Duration = Duration::from_millis(80);

/// Tick interval when idle.
pub const IDLE_TICK: Duration = Duration::from_millis(250);

type UiEventSender = mpsc::UnboundedSender<UiEvent>;
type UiEventReceiver = mpsc::UnboundedReceiver<UiEvent>;

/// Full-screen TUI runtime.
///
/// Terminal state is restored on drop.
pub struct TuiRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub state: AppState,
    service: GraphQlIdentityService,
    inbox_tx: UiEventSender,
    inbox_rx: UiEventReceiver,
    last_tick: Instant,
}

impl TuiRuntime {
    /// Creates the runtime and enters the alternate screen.
    ///
    /// # Errors
    /// Returns an error if the identity client or the terminal cannot be set up.
    pub fn new(config: &Config) -> Result<Self> {
        let service = GraphQlIdentityService::from_config(config)?;
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        Ok(Self {
            terminal,
            state: AppState::new(config),
            service,
            inbox_tx,
            inbox_rx,
            last_tick: Instant::now(),
        })
    }

    /// Runs the main event loop until the user quits.
    ///
    /// # Errors
    /// Returns an error if reading terminal events or drawing fails.
    pub fn run(&mut self) -> Result<()> {
        terminal::enable_input_features()?;
        info!(endpoint = %self.service.endpoint(), "tui started");

        let result = self.event_loop();

        let _ = terminal::disable_input_features();
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true;

        while !self.state.should_quit {
            let events = self.collect_events()?;
            for event in events {
                dirty |= !matches!(event, UiEvent::Tick) || self.state.is_busy();
                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            if dirty {
                self.terminal.draw(|frame| render::render(&self.state, frame))?;
                dirty = false;
            }
        }

        Ok(())
    }

    // ========================================================================
    // Event Collection
    // ========================================================================

    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();
        let tick_interval = if self.state.is_busy() {
            BUSY_TICK
        } else {
            IDLE_TICK
        };

        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }

        let poll_duration = if events.is_empty() {
            tick_interval.saturating_sub(self.last_tick.elapsed())
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    // ========================================================================
    // Effect Dispatch
    // ========================================================================

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Spawns an async effect and sends its result event to the inbox.
    fn spawn_effect<F, Fut>(&self, f: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(f().await);
        });
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                debug!("quit requested");
                self.state.should_quit = true;
            }
            UiEffect::SpawnRegister(Submission { token, request }) => {
                let service = self.service.clone();
                self.spawn_effect(move || async move {
                    let result = service.register(&request).await;
                    UiEvent::RegisterCompleted { token, result }
                });
            }
            UiEffect::SpawnLogin(Submission { token, request }) => {
                let service = self.service.clone();
                self.spawn_effect(move || async move {
                    let result = service.login(&request).await;
                    UiEvent::LoginCompleted { token, result }
                });
            }
            UiEffect::SpawnLogout => {
                let service = self.service.clone();
                self.spawn_effect(move || async move {
                    let result = service.logout().await;
                    UiEvent::LogoutCompleted { result }
                });
            }
        }
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
