//! Howl werewolf agent.
//!
//! Connects one agent per configured name to the game server and answers
//! its requests until the configured games are played.
//!
//! Usage:
//!   howl-agent --config res/config.toml
//!   howl-agent --config res/config.toml --url ws://192.168.1.2:8080/ws --game-num 5

use std::sync::Arc;

// ---

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

// ---

use howl_ws::WsTransport;

// ---

mod agent;
mod agent_log;
mod config;
mod handler;
mod phrases;
mod runner;
mod session;
mod state;
mod supervisor;

// ---

use config::{Cli, Settings};

// Gateway re-exports; siblings import via super::Symbol.
pub use agent::Agent;
pub use agent_log::AgentLog;
pub use handler::{
    // ---
    handler_for,
    ActionView,
    Reply,
    RoleHandler,
    Unassigned,
};
pub use phrases::load_phrases;
pub use session::{run_session, SessionContext, SessionEnd};
pub use state::{AgentState, Consumed};
pub use supervisor::{supervise, Supervised};

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ---
    let cli = Cli::parse();

    let no_color = std::env::var("EMACS").is_ok()
        || std::env::var("NO_COLOR").is_ok()
        || std::env::var("CARGO_TERM_COLOR").as_deref() == Ok("never")
        || !std::io::IsTerminal::is_terminal(&std::io::stdout());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_ansi(!no_color)
        .init();

    let mut settings = Settings::load(&cli.config)?;
    settings.apply(&cli);
    settings
        .validate()
        .with_context(|| format!("invalid settings in {}", cli.config.display()))?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        url = %settings.websocket.url,
        agents = settings.agent.names.len(),
        games = settings.game.num,
        keep_connection = settings.connection.keep_connection,
        "howl-agent starting",
    );

    let transport = Arc::new(WsTransport::new(settings.websocket.url.clone()));

    tokio::select! {
        result = runner::run_all(transport, Arc::new(settings)) => {
            result?;
            info!("all games played");
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("shutting down");
        }
    }

    Ok(())
}
