//! CLI Command Handlers
//!
//! Each handler takes its args, the frozen configuration and an Output,
//! and returns an ExitCode.

use anyhow::Context;
use std::net::SocketAddr;

use crate::cli::{ExitCode, Output, PlayCmd, ResolveCmd};
use crate::config::Config;
use crate::server::{self, AppState};

// =============================================================================
// Serve Command
// =============================================================================

pub async fn serve_cmd(bind: SocketAddr, config: Config, output: &Output) -> ExitCode {
    if config.jellyfin_url.is_empty() || config.roku_url.is_empty() {
        tracing::warn!("JELLYFIN_URL or ROKU_URL is empty; requests will fail until set");
    }
    output.info(format!("Serving on http://{}", bind));

    match run_server(bind, config).await {
        Ok(()) => ExitCode::Success,
        Err(e) => output.error(format!("Server failed: {:#}", e), ExitCode::Error),
    }
}

async fn run_server(bind: SocketAddr, config: Config) -> anyhow::Result<()> {
    server::serve(AppState::from_config(config), bind)
        .await
        .with_context(|| format!("could not serve on {}", bind))
}

// =============================================================================
// Play Command
// =============================================================================

pub async fn play_cmd(cmd: PlayCmd, config: Config, output: &Output) -> ExitCode {
    let state = AppState::from_config(config);
    output.info(format!("Playing: {}", cmd.item_id));

    match state.player.play_request(&cmd.item_id).await {
        Ok(outcome) => {
            if !outcome.progress_reset {
                output.info("Played state could not be reset; playback may resume mid-way");
            }
            if let Err(e) = output.print(&outcome) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Play failed: {}", e), ExitCode::for_play_error(&e)),
    }
}

// =============================================================================
// Resolve Command
// =============================================================================

pub async fn resolve_cmd(cmd: ResolveCmd, config: Config, output: &Output) -> ExitCode {
    let state = AppState::from_config(config);
    output.info(format!("Resolving: {}", cmd.item_id));

    match state.player.resolver().resolve(&cmd.item_id).await {
        Ok(selection) => {
            if let Err(e) = output.print(&selection) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(
            format!("Resolve failed: {}", e),
            ExitCode::for_play_error(&e),
        ),
    }
}
