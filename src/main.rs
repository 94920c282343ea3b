//! jellyroku - play Jellyfin items on a Roku, from the beginning
//!
//! # Usage
//!
//! ```bash
//! # Serve the HTTP control surface
//! jellyroku
//!
//! # CLI mode (for automation)
//! jellyroku play 8a1f0c2e
//! jellyroku resolve 8a1f0c2e --json
//! ```

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jellyroku::cli::{Cli, Command, Output};
use jellyroku::commands;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let output = Output::new(&cli);
    let config = cli.settings.into_config();

    let code = match cli.command {
        None | Some(Command::Serve) => commands::serve_cmd(cli.bind, config, &output).await,
        Some(Command::Play(cmd)) => commands::play_cmd(cmd, config, &output).await,
        Some(Command::Resolve(cmd)) => commands::resolve_cmd(cmd, config, &output).await,
    };
    code.into()
}

/// Log to stderr, filtered by RUST_LOG
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jellyroku=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
