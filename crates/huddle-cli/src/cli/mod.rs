//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use huddle_core::{config, logging};

mod commands;

#[derive(Parser)]
#[command(name = "huddle")]
#[command(version)]
#[command(about = "Sign in to Huddle from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Create an account and print the resulting session as JSON
    Register {
        /// Display name (at least 3 characters)
        #[arg(long)]
        fullname: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "HUDDLE_PASSWORD", hide_env_values = true)]
        password: String,
        /// Must match --password
        #[arg(long = "confirm-password")]
        confirm_password: String,
    },

    /// Sign in and print the resulting session as JSON
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "HUDDLE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// End the session on the identity service
    Logout,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Generate a fresh config from Rust defaults (for xtask)
    Generate,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = config::Config::load().context("load config")?;

    // default to the interactive client
    let Some(command) = cli.command else {
        return commands::chat::run(&config);
    };

    if let Err(err) = logging::init_stderr() {
        eprintln!("Warning: {err:#}");
    }

    match command {
        Commands::Register {
            fullname,
            email,
            password,
            confirm_password,
        } => {
            commands::auth::register(
                &config,
                commands::auth::RegisterArgs {
                    fullname,
                    email,
                    password,
                    confirm_password,
                },
            )
            .await
        }

        Commands::Login { email, password } => {
            commands::auth::login(&config, email, password).await
        }

        Commands::Logout => commands::auth::logout(&config).await,

        Commands::Config { command } => {
            match command {
                ConfigCommands::Path => commands::config::path(),
                ConfigCommands::Init => commands::config::init()?,
                ConfigCommands::Generate => commands::config::generate()?,
            }
            Ok(())
        }
    }
}
