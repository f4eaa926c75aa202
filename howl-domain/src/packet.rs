//! Packet schema and field-wise merge.
//!
//! The server sends one JSON object per message. Every top-level field is
//! optional so that a request can arrive split across several messages
//! (e.g. `info` first, `talk_history` later). The agent keeps one merged
//! [`Packet`] per game:
//!
//! ```text
//! merged  { request: TALK, info: I1, setting: S1, talk_history: T1 }
//! incoming{ request: VOTE,                        talk_history: T2 }
//!        ↓ merge
//! merged  { request: VOTE, info: I1, setting: S1, talk_history: T2 }
//! ```
//!
//! Absent (or `null`) fields never erase what is already held. Unknown JSON
//! fields are ignored so newer servers do not break older agents.

use std::collections::BTreeMap;
use std::time::Duration;

// ---

use serde::{Deserialize, Serialize};

// ---

use super::error::{HowlError, Result};

// ---------------------------------------------------------------------------
// Packet
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Packet {
    // ---
    /// Request tag, classified by [`crate::Action::classify`].
    pub request: Option<String>,

    pub info: Option<Info>,

    pub setting: Option<Setting>,

    /// Talks since the previous request that carried this field.
    pub talk_history: Option<Vec<Talk>>,

    /// Werewolf-only whisper channel, same shape as talks.
    pub whisper_history: Option<Vec<Talk>>,
}

// ---

impl Packet {
    // ---
    /// Parse one raw message.
    pub fn parse(raw: &str) -> Result<Packet> {
        serde_json::from_str(raw).map_err(|e| HowlError::MalformedPacket(e.to_string()))
    }

    // ---

    /// Overwrite every field present in `incoming`; keep the rest.
    pub fn merge(&mut self, incoming: Packet) {
        // ---
        let Packet {
            request,
            info,
            setting,
            talk_history,
            whisper_history,
        } = incoming;

        if request.is_some() {
            self.request = request;
        }
        if info.is_some() {
            self.info = info;
        }
        if setting.is_some() {
            self.setting = setting;
        }
        if talk_history.is_some() {
            self.talk_history = talk_history;
        }
        if whisper_history.is_some() {
            self.whisper_history = whisper_history;
        }
    }
}

// ---------------------------------------------------------------------------
// Info
// ---------------------------------------------------------------------------

/// Per-request game view: who we are, who is alive, what roles we know.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Info {
    // ---
    #[serde(default)]
    pub game_id: String,

    #[serde(default)]
    pub day: u32,

    /// Our server-assigned identity, e.g. `Agent[03]`.
    pub agent: String,

    #[serde(default)]
    pub profile: Option<String>,

    /// Alive/dead status of every participant.
    #[serde(default)]
    pub status_map: BTreeMap<String, Status>,

    /// Roles known to us. At least our own entry on `INITIALIZE`; wolves
    /// also see their partners.
    #[serde(default)]
    pub role_map: BTreeMap<String, String>,

    #[serde(default)]
    pub executed_agent: Option<String>,

    #[serde(default)]
    pub attacked_agent: Option<String>,

    #[serde(default)]
    pub remain_count: Option<u32>,

    #[serde(default)]
    pub remain_length: Option<u32>,

    #[serde(default)]
    pub remain_skip: Option<u32>,
}

// ---

impl Info {
    // ---
    /// Alive participants in identifier order.
    pub fn alive_agents(&self) -> Vec<String> {
        self.status_map
            .iter()
            .filter(|(_, status)| **status == Status::Alive)
            .map(|(agent, _)| agent.clone())
            .collect()
    }

    // ---

    /// Raw role string for `agent`, if known.
    pub fn role_of(&self, agent: &str) -> Option<&str> {
        self.role_map.get(agent).map(String::as_str)
    }
}

// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Alive,
    Dead,
}

// ---------------------------------------------------------------------------
// Setting
// ---------------------------------------------------------------------------

/// Game-wide settings, sent with `INITIALIZE` and repeated on later requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    // ---
    #[serde(default)]
    pub agent_count: u32,

    #[serde(default)]
    pub role_num_map: BTreeMap<String, u32>,

    #[serde(default)]
    pub max_talk: Option<u32>,

    #[serde(default)]
    pub max_talk_turn: Option<u32>,

    #[serde(default)]
    pub max_whisper: Option<u32>,

    /// Seconds the server waits for an action reply. `0` = no deadline.
    #[serde(default)]
    pub action_timeout: f64,

    /// Seconds the server waits for a lifecycle acknowledgement.
    #[serde(default)]
    pub response_timeout: f64,
}

// ---

impl Setting {
    // ---
    /// `action_timeout` as a [`Duration`]. Negative, non-finite or
    /// unrepresentably large values mean "no deadline".
    pub fn action_budget(&self) -> Duration {
        if self.action_timeout > 0.0 {
            Duration::try_from_secs_f64(self.action_timeout).unwrap_or(Duration::ZERO)
        } else {
            Duration::ZERO
        }
    }
}

// ---------------------------------------------------------------------------
// Talk
// ---------------------------------------------------------------------------

/// One utterance in the talk or whisper channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Talk {
    // ---
    /// Position within the day; restarts at 0 every day.
    #[serde(default)]
    pub idx: u32,

    #[serde(default)]
    pub day: u32,

    #[serde(default)]
    pub turn: u32,

    #[serde(default)]
    pub agent: String,

    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub skip: bool,

    #[serde(default)]
    pub over: bool,
}

// ---

impl Talk {
    // ---
    /// Ordering key across the whole game.
    pub fn key(&self) -> (u32, u32) {
        (self.day, self.idx)
    }
}

// ---

/// Append the entries of `incoming` that are newer than the last entry of
/// `history`. Returns the number appended.
///
/// History never shrinks and re-extending from the same batch is a no-op,
/// which matters because the merged packet keeps its last `talk_history`
/// until the server sends a new one.
pub fn extend_history(history: &mut Vec<Talk>, incoming: &[Talk]) -> usize {
    // ---
    let before = history.len();
    for talk in incoming {
        let newer = history.last().map_or(true, |last| talk.key() > last.key());
        if newer {
            history.push(talk.clone());
        }
    }
    history.len() - before
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    fn talk(day: u32, idx: u32, text: &str) -> Talk {
        Talk {
            idx,
            day,
            agent: "Agent[01]".into(),
            text: text.into(),
            ..Default::default()
        }
    }

    const INITIALIZE: &str = r#"{
        "request": "INITIALIZE",
        "info": {
            "game_id": "g1",
            "day": 0,
            "agent": "Agent[02]",
            "status_map": {"Agent[01]": "ALIVE", "Agent[02]": "ALIVE", "Agent[03]": "DEAD"},
            "role_map": {"Agent[02]": "SEER"}
        },
        "setting": {"agent_count": 3, "action_timeout": 2.5, "unknown_knob": true}
    }"#;

    #[test]
    fn parses_server_packet() {
        // ---
        let p = Packet::parse(INITIALIZE).unwrap();
        assert_eq!(p.request.as_deref(), Some("INITIALIZE"));

        let info = p.info.unwrap();
        assert_eq!(info.agent, "Agent[02]");
        assert_eq!(info.role_of("Agent[02]"), Some("SEER"));
        assert_eq!(info.alive_agents(), ["Agent[01]", "Agent[02]"]);

        let setting = p.setting.unwrap();
        assert_eq!(setting.action_budget(), Duration::from_millis(2_500));
        assert!(p.talk_history.is_none());
    }

    #[test]
    fn garbage_is_malformed() {
        for raw in ["", "not json", "[1,2,3]", r#"{"request": 7}"#] {
            let err = Packet::parse(raw).unwrap_err();
            assert!(matches!(err, HowlError::MalformedPacket(_)), "{raw}");
        }
    }

    #[test]
    fn merge_keeps_absent_fields() {
        // ---
        let mut merged = Packet::parse(INITIALIZE).unwrap();
        let info_before = merged.info.clone();
        let setting_before = merged.setting.clone();

        let next = Packet::parse(r#"{"request": "TALK", "talk_history": []}"#).unwrap();
        merged.merge(next);

        assert_eq!(merged.request.as_deref(), Some("TALK"));
        assert_eq!(merged.info, info_before);
        assert_eq!(merged.setting, setting_before);
        assert_eq!(merged.talk_history, Some(vec![]));
    }

    #[test]
    fn merge_treats_null_as_absent() {
        let mut merged = Packet::parse(INITIALIZE).unwrap();
        merged.merge(Packet::parse(r#"{"info": null, "setting": null}"#).unwrap());
        assert!(merged.info.is_some());
        assert!(merged.setting.is_some());
        assert_eq!(merged.request.as_deref(), Some("INITIALIZE"));
    }

    #[test]
    fn merge_sequence_never_erases() {
        // ---
        let parts = [
            r#"{"request": "DAILY_INITIALIZE"}"#,
            r#"{"info": {"agent": "Agent[01]", "day": 1}}"#,
            r#"{"talk_history": [{"idx": 0, "day": 1, "agent": "Agent[02]", "text": "hi"}]}"#,
            r#"{"whisper_history": []}"#,
            r#"{}"#,
        ];

        let mut merged = Packet::default();
        let mut seen = 0;
        for raw in parts {
            merged.merge(Packet::parse(raw).unwrap());
            let present = [
                merged.request.is_some(),
                merged.info.is_some(),
                merged.setting.is_some(),
                merged.talk_history.is_some(),
                merged.whisper_history.is_some(),
            ]
            .iter()
            .filter(|p| **p)
            .count();
            assert!(present >= seen, "field lost after {raw}");
            seen = present;
        }
        assert_eq!(seen, 4);
    }

    #[test]
    fn negative_timeout_means_no_deadline() {
        let s = Setting {
            action_timeout: -1.0,
            ..Default::default()
        };
        assert_eq!(s.action_budget(), Duration::ZERO);
    }

    #[test]
    fn oversized_timeout_means_no_deadline() {
        // ---
        for huge in [1e20, f64::MAX, f64::INFINITY, f64::NAN] {
            let s = Setting {
                action_timeout: huge,
                ..Default::default()
            };
            assert_eq!(s.action_budget(), Duration::ZERO, "{huge}");
        }
    }

    #[test]
    fn extend_history_only_appends_newer() {
        // ---
        let mut history = Vec::new();
        let day1 = [talk(1, 0, "a"), talk(1, 1, "b")];

        assert_eq!(extend_history(&mut history, &day1), 2);
        assert_eq!(extend_history(&mut history, &day1), 0);

        let mixed = [talk(1, 1, "b"), talk(1, 2, "c"), talk(2, 0, "d")];
        assert_eq!(extend_history(&mut history, &mixed), 2);

        let texts: Vec<_> = history.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["a", "b", "c", "d"]);
    }
}
