//! [`AgentState`]: everything an agent accumulates over one game.
//!
//! The record is owned by exactly one session loop and moves wholesale when
//! the role handler is swapped after `INITIALIZE`. Handlers never mutate it
//! directly; supervised actions receive an [`ActionView`] snapshot.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

// ---

use howl_domain::{
    // ---
    extend_history,
    extract_index,
    HowlError,
    Inbound,
    Packet,
    Result,
    Role,
    Talk,
};

// ---

use super::ActionView;

// ---------------------------------------------------------------------------
// Consumed
// ---------------------------------------------------------------------------

/// Outcome of [`AgentState::consume_next_packet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Consumed {
    // ---
    /// Nothing was buffered.
    Nothing,

    /// A continuation part was merged; it carried no request of its own.
    Merged,

    /// The message carried this request tag and should be dispatched.
    Request(String),
}

// ---------------------------------------------------------------------------
// AgentState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct AgentState {
    // ---
    /// Configured display name, returned for `NAME`.
    pub name: String,

    /// Server-assigned identity such as `Agent[03]`. Set at initialize.
    pub agent: Option<String>,

    /// Digits of `agent`.
    pub index: Option<u32>,

    /// Assigned once at the first initialize.
    pub role: Option<Role>,

    /// Per-action deadline. `Duration::ZERO` means none.
    pub action_timeout: Duration,

    /// Raw inbound messages not yet consumed, oldest first.
    pub pending: VecDeque<String>,

    /// Field-wise merge of every packet consumed so far.
    pub packet: Packet,

    pub talk_history: Vec<Talk>,
    pub whisper_history: Vec<Talk>,

    /// Alive participants, sorted. Refreshed at every day start.
    pub alive: Vec<String>,

    pub phrases: Arc<[String]>,

    /// Cleared once, by `FINISH`.
    pub running: bool,
}

// ---

impl AgentState {
    // ---
    pub fn new(name: impl Into<String>, phrases: Arc<[String]>) -> Self {
        Self {
            name: name.into(),
            agent: None,
            index: None,
            role: None,
            action_timeout: Duration::ZERO,
            pending: VecDeque::new(),
            packet: Packet::default(),
            talk_history: Vec::new(),
            whisper_history: Vec::new(),
            alive: Vec::new(),
            phrases,
            running: true,
        }
    }

    // --- inbound buffering -------------------------------------------------

    /// Buffer what the transport delivered, preserving order.
    pub fn append_received(&mut self, inbound: Inbound) {
        self.pending.extend(inbound.into_messages());
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    // ---

    /// Pop the oldest buffered message and merge it into [`Self::packet`].
    ///
    /// A message that fails to parse is dropped; the merged packet is left
    /// untouched.
    pub fn consume_next_packet(&mut self) -> Result<Consumed> {
        // ---
        let Some(raw) = self.pending.pop_front() else {
            return Ok(Consumed::Nothing);
        };

        let incoming = Packet::parse(&raw)?;
        let request = incoming.request.clone();
        self.packet.merge(incoming);

        Ok(match request {
            Some(tag) => Consumed::Request(tag),
            None => Consumed::Merged,
        })
    }

    // --- lifecycle ---------------------------------------------------------

    /// Take identity, deadline and role from the merged packet.
    ///
    /// The role is only assigned the first time; later calls refresh the
    /// identity and deadline but never change it.
    pub fn initialize(&mut self) -> Result<()> {
        // ---
        let (Some(info), Some(setting)) = (&self.packet.info, &self.packet.setting) else {
            return Err(HowlError::Action(
                "initialize needs both info and setting".into(),
            ));
        };

        let index = extract_index(&info.agent)?;
        let role = match self.role {
            Some(role) => role,
            None => info
                .role_of(&info.agent)
                .ok_or_else(|| {
                    HowlError::UnknownRole(format!("no role listed for {}", info.agent))
                })?
                .parse::<Role>()?,
        };

        self.agent = Some(info.agent.clone());
        self.index = Some(index);
        self.action_timeout = setting.action_budget();
        self.role = Some(role);
        Ok(())
    }

    // ---

    /// Replace the alive roster from the merged packet.
    pub fn daily_initialize(&mut self) -> Result<()> {
        // ---
        let info = self
            .packet
            .info
            .as_ref()
            .ok_or_else(|| HowlError::Action("daily_initialize needs info".into()))?;
        self.alive = info.alive_agents();
        Ok(())
    }

    // ---

    pub fn daily_finish(&mut self) {
        self.absorb_talk();
        self.absorb_whisper();
    }

    // ---

    /// Extend the talk history from the merged packet. Returns how many
    /// entries were new.
    pub fn absorb_talk(&mut self) -> usize {
        match &self.packet.talk_history {
            Some(talks) => extend_history(&mut self.talk_history, talks),
            None => 0,
        }
    }

    pub fn absorb_whisper(&mut self) -> usize {
        match &self.packet.whisper_history {
            Some(whispers) => extend_history(&mut self.whisper_history, whispers),
            None => 0,
        }
    }

    // ---

    pub fn finish(&mut self) {
        self.running = false;
    }

    // --- snapshot ----------------------------------------------------------

    pub fn view(&self) -> ActionView {
        ActionView {
            name: self.name.clone(),
            agent: self.agent.clone(),
            role: self.role,
            day: self.packet.info.as_ref().map_or(0, |info| info.day),
            alive: self.alive.clone(),
            phrases: Arc::clone(&self.phrases),
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

    fn state() -> AgentState {
        AgentState::new("howl1", Arc::from(vec!["hi".to_string()]))
    }

    fn initialize_packet(agent: &str, role: &str) -> String {
        format!(
            r#"{{"request":"INITIALIZE",
                "info":{{"game_id":"g","day":0,"agent":"{agent}",
                         "status_map":{{"Agent[01]":"ALIVE","Agent[02]":"ALIVE"}},
                         "role_map":{{"{agent}":"{role}"}}}},
                "setting":{{"agent_count":2,"action_timeout":3}}}}"#
        )
    }

    fn consume(s: &mut AgentState, raw: &str) -> Consumed {
        s.append_received(Inbound::One(raw.to_string()));
        s.consume_next_packet().unwrap()
    }

    #[test]
    fn pending_is_fifo() {
        // ---
        let mut s = state();
        s.append_received(Inbound::One(r#"{"request":"NAME"}"#.into()));
        s.append_received(Inbound::Many(vec![
            r#"{"request":"ROLE"}"#.into(),
            r#"{"info":{"agent":"Agent[01]"}}"#.into(),
        ]));

        assert_eq!(s.consume_next_packet().unwrap(), Consumed::Request("NAME".into()));
        assert_eq!(s.consume_next_packet().unwrap(), Consumed::Request("ROLE".into()));
        assert_eq!(s.consume_next_packet().unwrap(), Consumed::Merged);
        assert_eq!(s.consume_next_packet().unwrap(), Consumed::Nothing);

        // The continuation part did not erase the retained request.
        assert_eq!(s.packet.request.as_deref(), Some("ROLE"));
    }

    #[test]
    fn malformed_message_is_dropped_and_state_kept() {
        // ---
        let mut s = state();
        consume(&mut s, &initialize_packet("Agent[02]", "SEER"));
        let before = s.clone();

        s.append_received(Inbound::Many(vec![
            "{not json".into(),
            r#"{"request":"NAME"}"#.into(),
        ]));
        assert!(matches!(
            s.consume_next_packet(),
            Err(HowlError::MalformedPacket(_))
        ));
        assert_eq!(s.packet, before.packet);
        assert_eq!(s.pending.len(), 1);
        assert_eq!(s.consume_next_packet().unwrap(), Consumed::Request("NAME".into()));
    }

    #[test]
    fn initialize_sets_identity_role_and_deadline() {
        // ---
        let mut s = state();
        consume(&mut s, &initialize_packet("Agent[02]", "WEREWOLF"));
        s.initialize().unwrap();

        assert_eq!(s.agent.as_deref(), Some("Agent[02]"));
        assert_eq!(s.index, Some(2));
        assert_eq!(s.role, Some(Role::Werewolf));
        assert_eq!(s.action_timeout, Duration::from_secs(3));
    }

    #[test]
    fn initialize_with_huge_timeout_has_no_deadline() {
        // ---
        let mut s = state();
        let raw = initialize_packet("Agent[02]", "SEER")
            .replace(r#""action_timeout":3"#, r#""action_timeout":1e20"#);
        consume(&mut s, &raw);
        s.initialize().unwrap();
        assert_eq!(s.action_timeout, Duration::ZERO);
    }

    #[test]
    fn initialize_never_reassigns_role() {
        // ---
        let mut s = state();
        consume(&mut s, &initialize_packet("Agent[02]", "SEER"));
        s.initialize().unwrap();
        consume(&mut s, &initialize_packet("Agent[02]", "WEREWOLF"));
        s.initialize().unwrap();
        assert_eq!(s.role, Some(Role::Seer));
    }

    #[test]
    fn initialize_failures() {
        // ---
        let mut s = state();
        assert!(matches!(s.initialize(), Err(HowlError::Action(_))));

        consume(&mut s, &initialize_packet("Agent[02]", "DRAGON"));
        assert!(matches!(s.initialize(), Err(HowlError::UnknownRole(_))));
        assert_eq!(s.role, None);

        let mut s = state();
        consume(&mut s, &initialize_packet("Anonymous", "SEER"));
        assert!(matches!(s.initialize(), Err(HowlError::Identity(_))));
    }

    #[test]
    fn daily_initialize_replaces_roster() {
        // ---
        let mut s = state();
        s.alive = vec!["Agent[09]".into()];
        consume(
            &mut s,
            r#"{"request":"DAILY_INITIALIZE","info":{"agent":"Agent[01]","day":1,
                "status_map":{"Agent[03]":"ALIVE","Agent[01]":"ALIVE","Agent[02]":"DEAD"}}}"#,
        );
        s.daily_initialize().unwrap();
        assert_eq!(s.alive, ["Agent[01]", "Agent[03]"]);
        assert_eq!(s.view().day, 1);
    }

    #[test]
    fn histories_never_shrink() {
        // ---
        let mut s = state();
        let mut lengths = Vec::new();
        let steps = [
            r#"{"request":"TALK",
                "talk_history":[{"idx":0,"day":1,"agent":"Agent[01]","text":"a"}]}"#,
            r#"{"request":"TALK","talk_history":[]}"#,
            r#"{"request":"WHISPER",
                "whisper_history":[{"idx":0,"day":1,"agent":"Agent[02]","text":"w"}]}"#,
            r#"{"request":"DAILY_FINISH",
                "talk_history":[{"idx":1,"day":1,"agent":"Agent[02]","text":"b"}]}"#,
            r#"{"request":"DAILY_FINISH"}"#,
        ];

        for raw in steps {
            consume(&mut s, raw);
            match s.packet.request.as_deref() {
                Some("TALK") => {
                    s.absorb_talk();
                }
                Some("WHISPER") => {
                    s.absorb_whisper();
                }
                _ => s.daily_finish(),
            }
            lengths.push((s.talk_history.len(), s.whisper_history.len()));
        }

        assert!(lengths.windows(2).all(|w| w[1].0 >= w[0].0 && w[1].1 >= w[0].1));
        assert_eq!(lengths.last(), Some(&(2, 1)));
    }

    #[test]
    fn finish_clears_running() {
        let mut s = state();
        s.finish();
        assert!(!s.running);
    }
}
