//! Runs every configured agent concurrently.
//!
//! Per agent name: pick a fresh game id, play `game.num` sessions under it,
//! and start over with a new id while `keep_connection` is set.

use std::sync::Arc;

// ---

use anyhow::Context;
use tokio::task::JoinSet;
use tracing::{info, warn};
use uuid::Uuid;

// ---

use howl_domain::GameTransport;

// ---

use super::{load_phrases, run_session, SessionContext, SessionEnd, Settings};

// ---------------------------------------------------------------------------
// run_all
// ---------------------------------------------------------------------------

/// One task per `agent.names` entry. Returns once every agent is done, or
/// as soon as any agent fails fatally; the remaining agents are aborted.
pub async fn run_all<T>(transport: Arc<T>, settings: Arc<Settings>) -> anyhow::Result<()>
where
    T: GameTransport + 'static,
{
    // ---
    let phrases = load_phrases(&settings.path.random_talk)?;
    info!(count = phrases.len(), "phrases loaded");

    let mut tasks = JoinSet::new();
    for name in &settings.agent.names {
        let transport = Arc::clone(&transport);
        let settings = Arc::clone(&settings);
        let phrases = Arc::clone(&phrases);
        let name = name.clone();
        tasks.spawn(async move { execute(transport.as_ref(), &settings, name, phrases).await });
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined.context("agent task panicked").and_then(|done| done) {
            tasks.abort_all();
            return Err(e);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// execute
// ---------------------------------------------------------------------------

/// All games for one agent name.
pub async fn execute<T: GameTransport>(
    transport: &T,
    settings: &Settings,
    name: String,
    phrases: Arc<[String]>,
) -> anyhow::Result<()> {
    // ---
    loop {
        let game_id = Uuid::new_v4().to_string();
        info!(agent = %name, %game_id, sessions = settings.game.num, "starting game");

        let ctx = SessionContext {
            name: name.clone(),
            game_id,
            phrases: Arc::clone(&phrases),
            output_dir: settings.path.output_dir.clone(),
            reconnect_delay: settings.reconnect_delay(),
        };

        for round in 1..=settings.game.num {
            let end = run_session(transport, &ctx)
                .await
                .with_context(|| format!("agent {name} round {round}"))?;
            if let SessionEnd::TransportLost(reason) = end {
                warn!(agent = %name, round, %reason, "session ended without FINISH");
            }
        }

        if !settings.connection.keep_connection {
            return Ok(());
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    // ---
    use std::path::Path;
    use std::time::Duration;

    use howl_domain::HowlError;
    use howl_link_sim::{LinkSimConfig, LinkSimServer, LinkSimTransport, ServerConn};

    use super::*;
    use crate::AgentLog;

    fn settings(dir: &Path, names: &[&str], num: u32) -> Settings {
        // ---
        let talk = dir.join("talk.txt");
        std::fs::write(&talk, "hello\n").unwrap();

        let toml = format!(
            r#"
            [websocket]
            url = "ws://unused"

            [agent]
            names = {names:?}

            [game]
            num = {num}

            [connection]
            reconnect_delay_secs = 0

            [path]
            output_dir = {out:?}
            random_talk = {talk:?}
            "#,
            out = dir.join("log"),
        );
        Settings::parse(&toml).unwrap()
    }

    /// Play `games` short games: NAME then FINISH. Returns the names seen.
    async fn serve(mut server: LinkSimServer, games: usize) -> Vec<String> {
        // ---
        let mut seen = Vec::new();
        for _ in 0..games {
            let mut peer = server.accept().await.unwrap();
            peer.push(r#"{"request":"NAME"}"#);
            seen.push(peer.reply().await.unwrap());
            peer.push(r#"{"request":"FINISH"}"#);
        }
        seen
    }

    #[tokio::test]
    async fn plays_game_num_sessions_under_one_id() {
        // ---
        let dir = tempfile::tempdir().unwrap();
        let settings = Arc::new(settings(dir.path(), &["howl1"], 3));
        let (transport, server) = LinkSimTransport::new(LinkSimConfig::perfect());
        let transport = Arc::new(transport);

        let game = tokio::spawn(serve(server, 3));
        run_all(Arc::clone(&transport), settings).await.unwrap();

        assert_eq!(game.await.unwrap(), ["howl1", "howl1", "howl1"]);
        assert_eq!(transport.attempts(), 3);

        let logs: Vec<_> = std::fs::read_dir(dir.path().join("log"))
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(logs.len(), 1, "one game id, one log file");

        let text = std::fs::read_to_string(&logs[0]).unwrap();
        assert_eq!(text.matches("Called finish").count(), 3);
        assert!(logs[0].to_string_lossy().ends_with("_howl1.log"));
    }

    #[tokio::test]
    async fn every_agent_name_plays() {
        // ---
        let dir = tempfile::tempdir().unwrap();
        let settings = Arc::new(settings(dir.path(), &["howl1", "howl2"], 1));
        let (transport, server) = LinkSimTransport::new(LinkSimConfig::perfect());

        let game = tokio::spawn(serve(server, 2));
        run_all(Arc::new(transport), settings).await.unwrap();

        let mut names = game.await.unwrap();
        names.sort();
        assert_eq!(names, ["howl1", "howl2"]);
    }

    #[tokio::test]
    async fn keep_connection_starts_fresh_games() {
        // ---
        let dir = tempfile::tempdir().unwrap();
        let mut s = settings(dir.path(), &["howl1"], 1);
        s.connection.keep_connection = true;
        let (transport, mut server) = LinkSimTransport::new(LinkSimConfig::perfect());
        let runner = tokio::spawn(run_all(Arc::new(transport), Arc::new(s)));

        for _ in 0..2 {
            let mut peer = server.accept().await.unwrap();
            peer.push(r#"{"request":"NAME"}"#);
            assert_eq!(peer.reply().await.as_deref(), Some("howl1"));
            peer.push(r#"{"request":"FINISH"}"#);
        }

        // Still connecting after the second game.
        let mut third = server.accept().await.unwrap();
        third.push(r#"{"request":"NAME"}"#);
        assert_eq!(third.reply().await.as_deref(), Some("howl1"));
        runner.abort();

        let logs: Vec<_> = std::fs::read_dir(dir.path().join("log"))
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(logs.len(), 3, "one log file per game id");
        for log in &logs {
            assert!(log.to_string_lossy().ends_with("_howl1.log"));
            assert!(std::fs::read_to_string(log).unwrap().contains("Called name"));
        }
    }

    #[tokio::test]
    async fn fatal_agent_error_is_reported_while_others_play() {
        // ---
        let dir = tempfile::tempdir().unwrap();
        let settings = Arc::new(settings(dir.path(), &["a", "b"], 1));
        let (transport, mut server) = LinkSimTransport::new(LinkSimConfig::perfect());

        // "a" is kept connected and never finishes; "b" is dealt an unknown role.
        let game = tokio::spawn(async move {
            let mut idle: Vec<ServerConn> = Vec::new();
            for _ in 0..2 {
                let mut peer = server.accept().await.unwrap();
                peer.push(r#"{"request":"NAME"}"#);
                if peer.reply().await.as_deref() == Some("b") {
                    peer.push(
                        r#"{"request":"INITIALIZE",
                            "info":{"agent":"Agent[02]","role_map":{"Agent[02]":"JESTER"}},
                            "setting":{"action_timeout":1}}"#,
                    );
                }
                idle.push(peer);
            }
            std::future::pending::<()>().await;
            drop(idle);
        });

        let run = run_all(Arc::new(transport), settings);
        let err = tokio::time::timeout(Duration::from_secs(3), run)
            .await
            .expect("fatal error reported while agent a is still playing")
            .unwrap_err();
        game.abort();

        assert!(matches!(
            err.root_cause().downcast_ref::<HowlError>(),
            Some(HowlError::UnknownRole(_))
        ));
    }

    #[tokio::test]
    async fn missing_phrase_file_fails_fast() {
        // ---
        let dir = tempfile::tempdir().unwrap();
        let mut s = settings(dir.path(), &["howl1"], 1);
        s.path.random_talk = dir.path().join("absent.txt");
        let (transport, _server) = LinkSimTransport::new(LinkSimConfig::perfect());

        assert!(run_all(Arc::new(transport), Arc::new(s)).await.is_err());
    }

    #[test]
    fn log_file_naming() {
        let path = AgentLog::file_path(Path::new("/tmp/log"), "abc", "howl1");
        assert_eq!(path, Path::new("/tmp/log/abc_howl1.log"));
    }
}
