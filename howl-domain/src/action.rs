use std::fmt;

// ---

use super::error::{HowlError, Result};

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// The kind of response the game server currently expects.
///
/// Every inbound packet carries a request tag; [`Action::classify`] maps it
/// onto one of these. Lifecycle actions update agent state only; the rest
/// answer the server with a text reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // ---
    Initialize,
    Name,
    Role,
    DailyInitialize,
    DailyFinish,
    Talk,
    Vote,
    Whisper,
    Attack,
    Divine,
    Guard,
    Finish,
}

// ---

impl Action {
    // ---
    /// All actions, in protocol order.
    pub const ALL: [Action; 12] = [
        Action::Initialize,
        Action::Name,
        Action::Role,
        Action::DailyInitialize,
        Action::DailyFinish,
        Action::Talk,
        Action::Vote,
        Action::Whisper,
        Action::Attack,
        Action::Divine,
        Action::Guard,
        Action::Finish,
    ];

    // ---

    /// Map a server request tag onto an [`Action`].
    ///
    /// Tags are matched exactly as the server sends them (upper snake case).
    /// An unrecognised tag is reported as [`HowlError::UnknownRequest`]; the
    /// caller skips the packet.
    pub fn classify(tag: &str) -> Result<Action> {
        // ---
        Action::ALL
            .into_iter()
            .find(|a| a.tag() == tag)
            .ok_or_else(|| HowlError::UnknownRequest(tag.to_string()))
    }

    // ---

    /// The wire request tag for this action.
    pub fn tag(self) -> &'static str {
        match self {
            Action::Initialize => "INITIALIZE",
            Action::Name => "NAME",
            Action::Role => "ROLE",
            Action::DailyInitialize => "DAILY_INITIALIZE",
            Action::DailyFinish => "DAILY_FINISH",
            Action::Talk => "TALK",
            Action::Vote => "VOTE",
            Action::Whisper => "WHISPER",
            Action::Attack => "ATTACK",
            Action::Divine => "DIVINE",
            Action::Guard => "GUARD",
            Action::Finish => "FINISH",
        }
    }

    // ---

    /// Short lower-case label used in logs and thread names.
    pub fn label(self) -> &'static str {
        match self {
            Action::Initialize => "initialize",
            Action::Name => "name",
            Action::Role => "role",
            Action::DailyInitialize => "daily_initialize",
            Action::DailyFinish => "daily_finish",
            Action::Talk => "talk",
            Action::Vote => "vote",
            Action::Whisper => "whisper",
            Action::Attack => "attack",
            Action::Divine => "divine",
            Action::Guard => "guard",
            Action::Finish => "finish",
        }
    }

    // ---

    /// `true` for actions that only update agent state and never reply.
    pub fn is_lifecycle(self) -> bool {
        matches!(
            self,
            Action::Initialize | Action::DailyInitialize | Action::DailyFinish | Action::Finish
        )
    }
}

// ---

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
