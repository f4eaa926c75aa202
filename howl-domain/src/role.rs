use std::fmt;
use std::str::FromStr;

// ---

use serde::{Deserialize, Serialize};

// ---

use super::error::HowlError;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Game-assigned role. Fixed for the whole game once assigned.
///
/// Role assignments arrive as plain strings in `info.role_map`; parsing is
/// deferred to [`Role::from_str`] so an unknown role surfaces as
/// [`HowlError::UnknownRole`] instead of a malformed packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    // ---
    Villager,
    Werewolf,
    Seer,
    Possessed,
    Bodyguard,
    Medium,
}

// ---

impl Role {
    // ---
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Villager => "VILLAGER",
            Role::Werewolf => "WEREWOLF",
            Role::Seer => "SEER",
            Role::Possessed => "POSSESSED",
            Role::Bodyguard => "BODYGUARD",
            Role::Medium => "MEDIUM",
        }
    }
}

// ---

impl FromStr for Role {
    type Err = HowlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VILLAGER" => Ok(Role::Villager),
            "WEREWOLF" => Ok(Role::Werewolf),
            "SEER" => Ok(Role::Seer),
            "POSSESSED" => Ok(Role::Possessed),
            "BODYGUARD" => Ok(Role::Bodyguard),
            "MEDIUM" => Ok(Role::Medium),
            other => Err(HowlError::UnknownRole(other.to_string())),
        }
    }
}

// ---

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
