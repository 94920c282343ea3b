//! CLI - Command Line Interface for jellyroku
//!
//! Every setting can come from a flag or the environment. Without a
//! subcommand the HTTP server starts.
//!
//! # Examples
//!
//! ```bash
//! # Serve the control surface on :8000
//! JELLYFIN_URL=http://jf:8096 ROKU_URL=http://roku:8060 jellyroku
//!
//! # Play something once and exit
//! jellyroku play 8a1f0c2e
//!
//! # See what an id would resolve to, without touching anything
//! jellyroku resolve 8a1f0c2e --json
//! ```

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::io::IsTerminal;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::config::{self, Config};
use crate::error::{CatalogError, PlayError};

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Catalog unreachable or returned garbage
    CatalogError = 3,
    /// Nothing playable behind the id
    NothingPlayable = 4,
    /// Roku launch failed
    LaunchFailed = 6,
}

impl ExitCode {
    /// Exit code for a failed play or resolve
    pub fn for_play_error(err: &PlayError) -> Self {
        match err {
            PlayError::Catalog(CatalogError::EmptyResult(_)) => ExitCode::NothingPlayable,
            PlayError::Catalog(_) => ExitCode::CatalogError,
            PlayError::NoPlayableDescendants(_) | PlayError::UnsupportedItemKind { .. } => {
                ExitCode::NothingPlayable
            }
            PlayError::Device(_) => ExitCode::LaunchFailed,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// jellyroku - play Jellyfin items on a Roku, from the beginning
#[derive(Parser, Debug)]
#[command(
    name = "jellyroku",
    version,
    about = "Play Jellyfin items on a Roku, always from the start",
    long_about = "Resolves a Jellyfin movie, episode or series to one playable item, \
                  clears its played state and launches it on a Roku.\n\n\
                  Run without a subcommand to serve the HTTP control surface.",
    after_help = "EXAMPLES:\n\
                  jellyroku                          Serve on 0.0.0.0:8000\n\
                  jellyroku play 8a1f0c2e            Play an item once\n\
                  jellyroku resolve 8a1f0c2e --json  Dry run"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Address the server listens on
    #[arg(
        long,
        short = 'b',
        env = "JELLYROKU_BIND",
        default_value = "0.0.0.0:8000",
        global = true
    )]
    pub bind: SocketAddr,

    #[command(flatten)]
    pub settings: Settings,

    /// Subcommand to run (omit to serve)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

/// Connection settings; missing values become empty strings
#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// Jellyfin base URL
    #[arg(long, env = "JELLYFIN_URL", default_value = "", global = true)]
    pub jellyfin_url: String,

    /// Jellyfin API key
    #[arg(
        long,
        env = "JELLYFIN_API_KEY",
        default_value = "",
        hide_env_values = true,
        global = true
    )]
    pub api_key: String,

    /// Jellyfin user whose played state is reset
    #[arg(long, env = "JELLYFIN_USER_ID", default_value = "", global = true)]
    pub user_id: String,

    /// Roku channel id of the Jellyfin app
    #[arg(long, env = "JELLYFIN_CHANNEL_ID", default_value = "", global = true)]
    pub channel_id: String,

    /// Library listed on /series/
    #[arg(long, env = "JELLYFIN_DEFAULT_LIBRARY", default_value = "", global = true)]
    pub default_library: String,

    /// Roku ECP base URL
    #[arg(long, env = "ROKU_URL", default_value = "", global = true)]
    pub roku_url: String,

    /// GoRoku remote URL shown on the index
    #[arg(long, env = "GOROKU_URL", default_value = "", global = true)]
    pub goroku_url: String,

    /// Library list (TOML)
    #[arg(long, env = "JELLYROKU_LIBRARIES", global = true)]
    pub libraries: Option<PathBuf>,
}

impl Settings {
    /// Freeze the settings into a configuration value
    pub fn into_config(self) -> Config {
        let libraries = self
            .libraries
            .or_else(Config::default_libraries_path)
            .map(|path| config::load_libraries(&path))
            .unwrap_or_default();

        Config {
            jellyfin_url: self.jellyfin_url,
            api_key: self.api_key,
            user_id: self.user_id,
            roku_url: self.roku_url,
            channel_id: self.channel_id,
            default_library: self.default_library,
            goroku_url: self.goroku_url,
            libraries,
        }
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the HTTP control surface (default)
    Serve,

    /// Resolve an item, reset its progress and launch it
    #[command(visible_alias = "p")]
    Play(PlayCmd),

    /// Show what an item resolves to without side effects
    #[command(visible_alias = "r")]
    Resolve(ResolveCmd),
}

/// Play a movie, episode or series
#[derive(Args, Debug)]
pub struct PlayCmd {
    /// Jellyfin item id
    #[arg(required = true)]
    pub item_id: String,
}

/// Dry-run resolution
#[derive(Args, Debug)]
pub struct ResolveCmd {
    /// Jellyfin item id
    #[arg(required = true)]
    pub item_id: String,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
