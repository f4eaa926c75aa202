//! Role-polymorphic action handlers.
//!
//! One [`RoleHandler`] per role. Each exposes the common request actions
//! (`name`, `role`, `talk`, `vote`, `whisper`) plus the role's own extras,
//! listed by [`RoleHandler::special_actions`] and run through
//! [`RoleHandler::act_special`]:
//!
//! ```text
//! Role        extras
//! ---------   ------
//! WEREWOLF    ATTACK
//! SEER        DIVINE
//! BODYGUARD   GUARD
//! others      -
//! ```
//!
//! Handlers are stateless. They run on supervisor threads and see the game
//! only through an owned [`ActionView`].

use std::fmt;
use std::sync::Arc;

// ---

use anyhow::{anyhow, bail};
use rand::seq::SliceRandom;

// ---

use howl_domain::{canonical_name, extract_index, Action, Role};

// ---------------------------------------------------------------------------
// Reply
// ---------------------------------------------------------------------------

/// Raw result of an action body, before it is rendered for the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    // ---
    /// Nothing to send.
    Silent,

    Text(String),

    /// A participant chosen by index; rendered as its canonical identifier.
    Target(u32),
}

// ---

impl Reply {
    // ---
    /// Wire text, or `None` when there is nothing to send.
    pub fn render(self) -> Option<String> {
        match self {
            Reply::Silent => None,
            Reply::Text(text) if text.is_empty() => None,
            Reply::Text(text) => Some(text),
            Reply::Target(index) => Some(canonical_name(index)),
        }
    }
}

// ---------------------------------------------------------------------------
// ActionView
// ---------------------------------------------------------------------------

/// Owned snapshot of the agent state handed to a supervised action.
#[derive(Debug, Clone)]
pub struct ActionView {
    // ---
    pub name: String,
    pub agent: Option<String>,
    pub role: Option<Role>,
    pub day: u32,
    pub alive: Vec<String>,
    pub phrases: Arc<[String]>,
}

// ---------------------------------------------------------------------------
// RoleHandler
// ---------------------------------------------------------------------------

pub trait RoleHandler: Send + Sync + fmt::Debug {
    // ---
    /// `None` until the role switch.
    fn role(&self) -> Option<Role>;

    /// Actions this role answers beyond the common set.
    fn special_actions(&self) -> &'static [Action] {
        &[]
    }

    fn act_special(&self, action: Action, _view: &ActionView) -> anyhow::Result<Reply> {
        Err(anyhow!("{} has no {} action", self.describe(), action.label()))
    }

    // --- common actions ----------------------------------------------------

    fn name(&self, view: &ActionView) -> anyhow::Result<Reply> {
        Ok(Reply::Text(view.name.clone()))
    }

    fn role_tag(&self, view: &ActionView) -> anyhow::Result<Reply> {
        Ok(Reply::Text(
            view.role.map(Role::as_str).unwrap_or_default().to_string(),
        ))
    }

    fn talk(&self, view: &ActionView) -> anyhow::Result<Reply> {
        random_phrase(view)
    }

    fn vote(&self, view: &ActionView) -> anyhow::Result<Reply> {
        random_target(view)
    }

    fn whisper(&self, _view: &ActionView) -> anyhow::Result<Reply> {
        Ok(Reply::Silent)
    }

    // ---

    fn describe(&self) -> &'static str {
        self.role().map_or("unassigned agent", Role::as_str)
    }
}

// ---

/// Handler for `role`.
pub fn handler_for(role: Role) -> Arc<dyn RoleHandler> {
    match role {
        Role::Villager => Arc::new(Villager),
        Role::Werewolf => Arc::new(Werewolf),
        Role::Seer => Arc::new(Seer),
        Role::Possessed => Arc::new(Possessed),
        Role::Bodyguard => Arc::new(Bodyguard),
        Role::Medium => Arc::new(Medium),
    }
}

// ---------------------------------------------------------------------------
// Random choices
// ---------------------------------------------------------------------------

/// Uniform-random phrase from the shared phrase set.
pub fn random_phrase(view: &ActionView) -> anyhow::Result<Reply> {
    match view.phrases.choose(&mut rand::thread_rng()) {
        Some(phrase) => Ok(Reply::Text(phrase.clone())),
        None => bail!("no phrases loaded"),
    }
}

/// Uniform-random member of the alive roster, as an index.
pub fn random_target(view: &ActionView) -> anyhow::Result<Reply> {
    // ---
    let Some(agent) = view.alive.choose(&mut rand::thread_rng()) else {
        bail!("alive roster is empty");
    };
    Ok(Reply::Target(extract_index(agent)?))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Before `INITIALIZE` assigns a role.
#[derive(Debug)]
pub struct Unassigned;

impl RoleHandler for Unassigned {
    fn role(&self) -> Option<Role> {
        None
    }
}

// ---

#[derive(Debug)]
pub struct Villager;

impl RoleHandler for Villager {
    fn role(&self) -> Option<Role> {
        Some(Role::Villager)
    }
}

// ---

#[derive(Debug)]
pub struct Werewolf;

impl RoleHandler for Werewolf {
    // ---
    fn role(&self) -> Option<Role> {
        Some(Role::Werewolf)
    }

    fn special_actions(&self) -> &'static [Action] {
        &[Action::Attack]
    }

    fn act_special(&self, action: Action, view: &ActionView) -> anyhow::Result<Reply> {
        match action {
            Action::Attack => random_target(view),
            other => bail!("werewolf cannot {}", other.label()),
        }
    }
}

// ---

#[derive(Debug)]
pub struct Seer;

impl RoleHandler for Seer {
    // ---
    fn role(&self) -> Option<Role> {
        Some(Role::Seer)
    }

    fn special_actions(&self) -> &'static [Action] {
        &[Action::Divine]
    }

    fn act_special(&self, action: Action, view: &ActionView) -> anyhow::Result<Reply> {
        match action {
            Action::Divine => random_target(view),
            other => bail!("seer cannot {}", other.label()),
        }
    }
}

// ---

#[derive(Debug)]
pub struct Possessed;

impl RoleHandler for Possessed {
    fn role(&self) -> Option<Role> {
        Some(Role::Possessed)
    }
}

// ---

#[derive(Debug)]
pub struct Bodyguard;

impl RoleHandler for Bodyguard {
    // ---
    fn role(&self) -> Option<Role> {
        Some(Role::Bodyguard)
    }

    fn special_actions(&self) -> &'static [Action] {
        &[Action::Guard]
    }

    fn act_special(&self, action: Action, view: &ActionView) -> anyhow::Result<Reply> {
        match action {
            Action::Guard => random_target(view),
            other => bail!("bodyguard cannot {}", other.label()),
        }
    }
}

// ---

#[derive(Debug)]
pub struct Medium;

impl RoleHandler for Medium {
    fn role(&self) -> Option<Role> {
        Some(Role::Medium)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
