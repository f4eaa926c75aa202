//! [`AgentLog`]: per-agent, per-game log sink.
//!
//! Every entry becomes a `tracing` event tagged with `agent` and `game_id`.
//! When an output directory is configured the entry is also appended to
//! `<output_dir>/<game_id>_<name>.log` as
//! `<timestamp> - <name> - <LEVEL> - <message>`.

use std::fs::{self, File, OpenOptions};
use std::io::{LineWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

// ---

use tracing::Level;

// ---

use howl_domain::Result;

// ---------------------------------------------------------------------------
// AgentLog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AgentLog {
    // ---
    name: Arc<str>,
    game_id: Arc<str>,

    /// Shared by every clone; one line per entry.
    file: Option<Arc<Mutex<LineWriter<File>>>>,
}

// ---

impl AgentLog {
    // ---
    /// Open (or append to) the game log for `name`. Without an
    /// `output_dir` entries go to `tracing` only.
    pub fn new(output_dir: Option<&Path>, game_id: &str, name: &str) -> Result<Self> {
        // ---
        let file = match output_dir {
            Some(dir) => {
                fs::create_dir_all(dir)?;
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(Self::file_path(dir, game_id, name))?;
                Some(Arc::new(Mutex::new(LineWriter::new(file))))
            }
            None => None,
        };

        Ok(Self {
            name: name.into(),
            game_id: game_id.into(),
            file,
        })
    }

    // ---

    pub fn file_path(dir: &Path, game_id: &str, name: &str) -> PathBuf {
        dir.join(format!("{game_id}_{name}.log"))
    }

    // ---

    pub fn info(&self, msg: impl AsRef<str>) {
        self.record(Level::INFO, msg.as_ref());
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        self.record(Level::WARN, msg.as_ref());
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        self.record(Level::ERROR, msg.as_ref());
    }

    // ---

    fn record(&self, level: Level, msg: &str) {
        // ---
        let (agent, game_id) = (&*self.name, &*self.game_id);
        match level {
            Level::ERROR => tracing::error!(agent, game_id, "{msg}"),
            Level::WARN => tracing::warn!(agent, game_id, "{msg}"),
            _ => tracing::info!(agent, game_id, "{msg}"),
        }

        let Some(file) = &self.file else {
            return;
        };
        let ts = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let written = match file.lock() {
            Ok(mut w) => writeln!(w, "{ts} - {agent} - {level} - {msg}"),
            Err(poisoned) => writeln!(poisoned.into_inner(), "{ts} - {agent} - {level} - {msg}"),
        };
        if let Err(e) = written {
            tracing::warn!(agent, game_id, error = %e, "game log write failed");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn writes_one_formatted_line_per_entry() {
        // ---
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("log");
        let log = AgentLog::new(Some(&out), "g-1", "howl1").unwrap();

        log.info("Called talk");
        log.clone().warn("talk exceeded 1s");
        log.error("boom");

        let text = fs::read_to_string(AgentLog::file_path(&out, "g-1", "howl1")).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with(" - howl1 - INFO - Called talk"), "{}", lines[0]);
        assert!(lines[1].ends_with(" - howl1 - WARN - talk exceeded 1s"));
        assert!(lines[2].ends_with(" - howl1 - ERROR - boom"));
    }

    #[test]
    fn reopening_appends() {
        // ---
        let dir = tempfile::tempdir().unwrap();
        AgentLog::new(Some(dir.path()), "g", "a").unwrap().info("first");
        AgentLog::new(Some(dir.path()), "g", "a").unwrap().info("second");

        let text = fs::read_to_string(AgentLog::file_path(dir.path(), "g", "a")).unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn without_output_dir_nothing_is_written() {
        let log = AgentLog::new(None, "g", "a").unwrap();
        log.info("only traced");
        assert!(log.file.is_none());
    }
}
