//! One game session: connect, answer requests until `FINISH`, disconnect.
//!
//! # Phases
//!
//! ```text
//! Connecting --connect ok--> Running --FINISH / link lost--> Closed
//!     ^   |
//!     +---+ connect failed: wait `reconnect_delay`, retry (unbounded)
//! ```
//!
//! # Running loop
//!
//! Each iteration: receive only when nothing is buffered, consume one
//! buffered message, classify its request, dispatch, send any reply. A
//! message without a request tag is a continuation part; it is merged and
//! not dispatched. Malformed messages, unknown tags and failed actions are
//! logged and skipped. The role switch happens right after the first
//! `INITIALIZE`; a failure there ends the session with an error.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

// ---

use tracing::{debug, info, warn};

// ---

use howl_domain::{Action, GameConnection, GameTransport, Result, SessionPhase};

// ---

use super::{Agent, AgentLog, AgentState, Consumed};

// ---------------------------------------------------------------------------
// SessionContext / SessionEnd
// ---------------------------------------------------------------------------

/// Everything one session needs besides the transport.
#[derive(Debug, Clone)]
pub struct SessionContext {
    // ---
    pub name: String,
    pub game_id: String,
    pub phrases: Arc<[String]>,
    pub output_dir: Option<PathBuf>,
    pub reconnect_delay: Duration,
}

// ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    // ---
    /// The server sent `FINISH`.
    Finished,

    /// The link failed or was closed before `FINISH`.
    TransportLost(String),
}

// ---------------------------------------------------------------------------
// run_session
// ---------------------------------------------------------------------------

/// Play one session to completion.
///
/// Errors are fatal ones only: the role switch failed, or the game log
/// could not be opened.
pub async fn run_session<T: GameTransport>(
    transport: &T,
    ctx: &SessionContext,
) -> Result<SessionEnd> {
    // ---
    let mut phase = SessionPhase::Connecting;
    debug!(agent = %ctx.name, ?phase, "session phase");

    let mut conn = connect_with_retry(transport, ctx.reconnect_delay, &ctx.name).await;
    info!(agent = %ctx.name, game_id = %ctx.game_id, "connected to game server");

    let log = match AgentLog::new(ctx.output_dir.as_deref(), &ctx.game_id, &ctx.name) {
        Ok(log) => log,
        Err(e) => {
            close_quietly(&mut conn, &ctx.name).await;
            return Err(e);
        }
    };
    let agent = Agent::new(AgentState::new(ctx.name.clone(), Arc::clone(&ctx.phrases)), log);

    phase = SessionPhase::Running;
    debug!(agent = %ctx.name, ?phase, "session phase");

    let result = drive(&mut conn, agent).await.map(|(end, _)| end);

    close_quietly(&mut conn, &ctx.name).await;
    phase = SessionPhase::Closed;
    debug!(agent = %ctx.name, ?phase, "session phase");

    match &result {
        Ok(SessionEnd::Finished) => info!(agent = %ctx.name, "game finished, disconnected"),
        Ok(SessionEnd::TransportLost(reason)) => {
            warn!(agent = %ctx.name, %reason, "connection lost before FINISH")
        }
        Err(e) => warn!(agent = %ctx.name, error = %e, "session aborted"),
    }
    result
}

// ---

/// Attempt `connect` until it succeeds, sleeping `delay` between attempts.
pub async fn connect_with_retry<T: GameTransport>(
    transport: &T,
    delay: Duration,
    name: &str,
) -> T::Connection {
    // ---
    let mut attempt: u64 = 0;
    loop {
        attempt += 1;
        match transport.connect().await {
            Ok(conn) => return conn,
            Err(e) => {
                warn!(
                    agent = name,
                    attempt,
                    error = %e,
                    retry_in_secs = delay.as_secs_f64(),
                    "could not connect to game server"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

// ---

async fn close_quietly<C: GameConnection>(conn: &mut C, name: &str) {
    if let Err(e) = conn.close().await {
        debug!(agent = name, error = %e, "close failed");
    }
}

// ---------------------------------------------------------------------------
// drive
// ---------------------------------------------------------------------------

/// The running loop. Returns how the session ended and the final agent.
pub async fn drive<C: GameConnection>(
    conn: &mut C,
    mut agent: Agent,
) -> Result<(SessionEnd, Agent)> {
    // ---
    while agent.is_running() {
        // ---
        if !agent.state().has_pending() {
            match conn.receive().await {
                Ok(Some(inbound)) => agent.state_mut().append_received(inbound),
                Ok(None) => {
                    let reason = "server closed the connection".to_string();
                    return Ok((SessionEnd::TransportLost(reason), agent));
                }
                Err(e) => return Ok((SessionEnd::TransportLost(e.to_string()), agent)),
            }
        }

        let tag = match agent.state_mut().consume_next_packet() {
            Ok(Consumed::Request(tag)) => tag,
            Ok(Consumed::Merged | Consumed::Nothing) => continue,
            Err(e) => {
                agent.log().warn(format!("dropping message: {e}"));
                continue;
            }
        };

        let action = match Action::classify(&tag) {
            Ok(action) => action,
            Err(e) => {
                agent.log().warn(format!("skipping request: {e}"));
                continue;
            }
        };

        let switching = action == Action::Initialize && agent.awaiting_role();

        let reply = match agent.dispatch(action).await {
            Ok(reply) => reply,
            Err(e) if switching => {
                agent.log().error(format!("initialize failed: {e}"));
                return Err(e);
            }
            Err(e) => {
                agent.log().error(format!("{} failed: {e}", action.label()));
                None
            }
        };

        if switching {
            agent = agent.promote()?;
        }

        if let Some(text) = reply {
            if let Err(e) = conn.send(&text).await {
                return Ok((SessionEnd::TransportLost(e.to_string()), agent));
            }
        }
    }

    Ok((SessionEnd::Finished, agent))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
