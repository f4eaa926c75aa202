//! Configuration for `howl-agent`.
//!
//! Settings come from a TOML file; a few CLI flags override it:
//!   howl-agent [--config res/config.toml] [--url ws://host:8080/ws] [--game-num 3]
//!              [--keep-connection] [--output-dir ./log]

use std::path::{Path, PathBuf};
use std::time::Duration;

// ---

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;

// ---

use howl_domain::HowlError;

// ---------------------------------------------------------------------------
// Cli
// ---------------------------------------------------------------------------

#[derive(Debug, Parser)]
#[command(name = "howl-agent", about = "Werewolf game agent client")]
pub struct Cli {
    // ---
    /// TOML settings file.
    #[arg(long, default_value = "res/config.toml")]
    pub config: PathBuf,

    /// Game server endpoint; overrides `websocket.url`.
    #[arg(long)]
    pub url: Option<String>,

    /// Sessions per game id; overrides `game.num`.
    #[arg(long)]
    pub game_num: Option<u32>,

    /// Start a new game id after each round instead of exiting.
    #[arg(long)]
    pub keep_connection: bool,

    /// Directory for per-agent game logs; overrides `path.output_dir`.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    // ---
    pub websocket: WebSocketSection,

    pub agent: AgentSection,

    #[serde(default)]
    pub game: GameSection,

    #[serde(default)]
    pub connection: ConnectionSection,

    pub path: PathSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebSocketSection {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentSection {
    /// One concurrent agent per name.
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameSection {
    #[serde(default = "default_game_num")]
    pub num: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionSection {
    // ---
    #[serde(default)]
    pub keep_connection: bool,

    #[serde(default = "default_reconnect_delay_secs")]
    pub reconnect_delay_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathSection {
    // ---
    /// No file logging when absent.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Phrase file used for talk replies.
    pub random_talk: PathBuf,
}

// ---

fn default_game_num() -> u32 {
    1
}

fn default_reconnect_delay_secs() -> u64 {
    15
}

impl Default for GameSection {
    fn default() -> Self {
        Self {
            num: default_game_num(),
        }
    }
}

impl Default for ConnectionSection {
    fn default() -> Self {
        Self {
            keep_connection: false,
            reconnect_delay_secs: default_reconnect_delay_secs(),
        }
    }
}

// ---

impl Settings {
    // ---
    /// Read and parse a settings file.
    pub fn load(path: &Path) -> anyhow::Result<Settings> {
        // ---
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("failed to parse {}", path.display()))
    }

    // ---

    pub fn parse(text: &str) -> anyhow::Result<Settings> {
        Ok(toml::from_str(text)?)
    }

    // ---

    /// Layer CLI overrides on top of the file values.
    pub fn apply(&mut self, cli: &Cli) {
        // ---
        if let Some(url) = &cli.url {
            self.websocket.url = url.clone();
        }
        if let Some(num) = cli.game_num {
            self.game.num = num;
        }
        if cli.keep_connection {
            self.connection.keep_connection = true;
        }
        if let Some(dir) = &cli.output_dir {
            self.path.output_dir = Some(dir.clone());
        }
    }

    // ---

    pub fn validate(&self) -> Result<(), HowlError> {
        // ---
        if self.websocket.url.trim().is_empty() {
            return Err(HowlError::Config("websocket.url is empty".into()));
        }
        if self.agent.names.is_empty() {
            return Err(HowlError::Config("agent.names lists no agents".into()));
        }
        if let Some(blank) = self.agent.names.iter().position(|n| n.trim().is_empty()) {
            return Err(HowlError::Config(format!("agent.names[{blank}] is blank")));
        }
        if self.game.num == 0 {
            return Err(HowlError::Config("game.num must be at least 1".into()));
        }
        Ok(())
    }

    // ---

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.connection.reconnect_delay_secs)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
