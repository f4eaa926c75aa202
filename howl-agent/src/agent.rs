//! [`Agent`]: the state record paired with the active role handler.
//!
//! Lifecycle actions update the state inline. Request actions snapshot the
//! state into an [`super::ActionView`] and run under [`supervise`]. After the
//! first `INITIALIZE` the session loop calls [`Agent::promote`], which moves
//! the state into a new `Agent` carrying the handler for the assigned role.

use std::sync::Arc;

// ---

use howl_domain::{Action, HowlError, Result, Role};

// ---

use super::{
    // ---
    handler_for,
    supervise,
    ActionView,
    AgentLog,
    AgentState,
    Reply,
    RoleHandler,
    Supervised,
    Unassigned,
};

// ---------------------------------------------------------------------------
// Agent
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Agent {
    // ---
    state: AgentState,
    handler: Arc<dyn RoleHandler>,
    log: AgentLog,
}

// ---

impl Agent {
    // ---
    /// A fresh agent with no role yet.
    pub fn new(state: AgentState, log: AgentLog) -> Self {
        Self {
            state,
            handler: Arc::new(Unassigned),
            log,
        }
    }

    // ---

    pub fn state(&self) -> &AgentState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AgentState {
        &mut self.state
    }

    pub fn log(&self) -> &AgentLog {
        &self.log
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Role of the active handler; `None` until promoted.
    pub fn handler_role(&self) -> Option<Role> {
        self.handler.role()
    }

    /// True until the role switch has happened.
    pub fn awaiting_role(&self) -> bool {
        self.handler_role().is_none()
    }

    // ---

    /// Swap in the handler for the assigned role, moving the state record.
    ///
    /// Errors: [`HowlError::UnknownRole`] when initialize assigned no role.
    pub fn promote(self) -> Result<Agent> {
        // ---
        let role = self
            .state
            .role
            .ok_or_else(|| HowlError::UnknownRole("no role assigned at initialize".into()))?;

        self.log.info(format!("role switch to {role}"));
        Ok(Agent {
            state: self.state,
            handler: handler_for(role),
            log: self.log,
        })
    }

    // ---

    /// Run the handler for `action`. Returns the wire reply, if any.
    ///
    /// Role extras are matched first, so a werewolf's `ATTACK` never reaches
    /// the common table. A request the active role has no handler for is
    /// logged and answered with silence.
    pub async fn dispatch(&mut self, action: Action) -> Result<Option<String>> {
        // ---
        if self.handler.special_actions().contains(&action) {
            return self
                .supervised(action, move |h, v| h.act_special(action, &v))
                .await;
        }

        if action.is_lifecycle() {
            return self.lifecycle(action);
        }

        match action {
            Action::Name => self.supervised(action, |h, v| h.name(&v)).await,
            Action::Role => self.supervised(action, |h, v| h.role_tag(&v)).await,
            Action::Talk => {
                self.state.absorb_talk();
                self.supervised(action, |h, v| h.talk(&v)).await
            }
            Action::Vote => self.supervised(action, |h, v| h.vote(&v)).await,
            Action::Whisper => {
                self.state.absorb_whisper();
                self.supervised(action, |h, v| h.whisper(&v)).await
            }
            _ => {
                self.log.warn(format!(
                    "{} has no {} handler; request ignored",
                    self.handler.describe(),
                    action.label()
                ));
                Ok(None)
            }
        }
    }

    // ---

    /// State-only actions: no handler, no deadline, no reply.
    fn lifecycle(&mut self, action: Action) -> Result<Option<String>> {
        // ---
        self.log.info(format!("Called {}", action.label()));
        match action {
            Action::Initialize => self.state.initialize()?,
            Action::DailyInitialize => self.state.daily_initialize()?,
            Action::DailyFinish => self.state.daily_finish(),
            Action::Finish => self.state.finish(),
            _ => {}
        }
        self.log.info("Return None");
        Ok(None)
    }

    // ---

    async fn supervised<F>(&self, action: Action, body: F) -> Result<Option<String>>
    where
        F: FnOnce(&dyn RoleHandler, ActionView) -> anyhow::Result<Reply> + Send + 'static,
    {
        // ---
        let handler = Arc::clone(&self.handler);
        let view = self.state.view();

        let outcome = supervise(
            action.label(),
            self.state.action_timeout,
            &self.log,
            move || body(handler.as_ref(), view),
        )
        .await?;

        Ok(match outcome {
            Supervised::Completed(reply) => reply,
            Supervised::TimedOut => None,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
