use std::fs;
use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "xtask", about = "Huddle maintainer tasks")]
struct Cli {
    #[command(subcommand)]
    command: Option<CommandName>,
}

#[derive(Debug, Default, Subcommand)]
enum CommandName {
    /// Update default_config.toml by running `huddle config generate`.
    #[default]
    UpdateDefaultConfig,
    /// Fail if default_config.toml is out of date with `Config::default()`.
    CheckDefaultConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or_default();

    match command {
        CommandName::UpdateDefaultConfig => update_default_config(),
        CommandName::CheckDefaultConfig => check_default_config(),
    }
}

fn update_default_config() -> Result<()> {
    let dest = default_config_path()?;
    let generated = generate_config()?;

    fs::write(&dest, generated).with_context(|| format!("write config to {}", dest.display()))?;

    println!("Updated {}", dest.display());
    Ok(())
}

fn check_default_config() -> Result<()> {
    let dest = default_config_path()?;
    let generated = generate_config()?;
    let current =
        fs::read_to_string(&dest).with_context(|| format!("read {}", dest.display()))?;

    if current != generated {
        bail!(
            "{} is stale; run `cargo run -p xtask -- update-default-config`",
            dest.display()
        );
    }

    println!("{} is up to date", dest.display());
    Ok(())
}

/// Runs `huddle config generate` with an empty HUDDLE_HOME so a local
/// config file cannot influence the output.
fn generate_config() -> Result<String> {
    let root = project_root()?;
    let temp_home = tempfile::tempdir().context("create temp dir for HUDDLE_HOME")?;

    let output = Command::new("cargo")
        .current_dir(&root)
        .env("HUDDLE_HOME", temp_home.path())
        .env_remove("HUDDLE_IDENTITY_URL")
        .arg("run")
        .arg("-p")
        .arg("huddle")
        .arg("--")
        .arg("config")
        .arg("generate")
        .output()
        .context("run `cargo run -p huddle -- config generate`")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("config generate failed: {stderr}");
    }

    String::from_utf8(output.stdout).context("config generate printed invalid UTF-8")
}

fn default_config_path() -> Result<PathBuf> {
    Ok(project_root()?
        .join("crates")
        .join("huddle-core")
        .join("default_config.toml"))
}

fn project_root() -> Result<PathBuf> {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let root = manifest_dir
        .ancestors()
        .nth(2)
        .context("locate workspace root from CARGO_MANIFEST_DIR")?;
    Ok(root.to_path_buf())
}
