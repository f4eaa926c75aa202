//! Deadline supervisor for request-answering actions.
//!
//! Every supervised action goes through the same pipeline:
//!
//! ```text
//! log "Called <label>"
//!   -> run body on a named, detached OS thread
//!      (reply rendered on that thread: Target(n) -> "Agent[nn]")
//!   -> wait up to the budget (budget 0 = wait for completion)
//!   -> log "Return <value>"            Completed
//!      or give up and drop the result  TimedOut
//! ```
//!
//! A timed-out body is abandoned, not cancelled: its thread keeps running
//! until the body returns, and whatever it produces then goes nowhere. The
//! body owns everything it touches, so a straggler cannot race the loop.

use std::time::Duration;

// ---

use tokio::sync::oneshot;

// ---

use howl_domain::{HowlError, Result};

// ---

use super::{AgentLog, Reply};

// ---------------------------------------------------------------------------
// Supervised
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Supervised<T> {
    // ---
    /// The body returned within its budget.
    Completed(T),

    /// The budget ran out; the body's eventual result is discarded.
    TimedOut,
}

// ---------------------------------------------------------------------------
// supervise
// ---------------------------------------------------------------------------

/// Run one action body under the deadline pipeline.
///
/// Errors: [`HowlError::Action`] when the body fails or panics within its
/// budget. A failure after the deadline is never reported.
pub async fn supervise<F>(
    label: &'static str,
    budget: Duration,
    log: &AgentLog,
    body: F,
) -> Result<Supervised<Option<String>>>
where
    F: FnOnce() -> anyhow::Result<Reply> + Send + 'static,
{
    // ---
    log.info(format!("Called {label}"));

    let outcome = run_with_deadline(label, budget, move || body().map(Reply::render)).await?;

    match &outcome {
        Supervised::Completed(reply) => {
            log.info(format!("Return {}", reply.as_deref().unwrap_or("None")));
        }
        Supervised::TimedOut => {
            log.warn(format!("{label} exceeded {budget:?}; result abandoned"));
        }
    }
    Ok(outcome)
}

// ---

/// Run `work` on a detached thread and wait for it at most `budget`.
pub async fn run_with_deadline<T, F>(
    label: &str,
    budget: Duration,
    work: F,
) -> Result<Supervised<T>>
where
    T: Send + 'static,
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
{
    // ---
    let (tx, rx) = oneshot::channel();

    std::thread::Builder::new()
        .name(format!("howl-{label}"))
        .spawn(move || {
            // Err only when the waiter already gave up.
            let _ = tx.send(work());
        })
        .map_err(HowlError::from)?;

    let received = if budget.is_zero() {
        rx.await
    } else {
        match tokio::time::timeout(budget, rx).await {
            Ok(received) => received,
            Err(_elapsed) => return Ok(Supervised::TimedOut),
        }
    };

    match received {
        Ok(Ok(value)) => Ok(Supervised::Completed(value)),
        Ok(Err(e)) => Err(HowlError::Action(format!("{label} failed: {e:#}"))),
        // Sender dropped without a send: the body panicked.
        Err(_) => Err(HowlError::Action(format!("{label} panicked"))),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
