// ---------------------------------------------------------------------------
// LinkSimConfig
// ---------------------------------------------------------------------------

/// Configuration for the in-process game server link.
///
/// All fields default to a perfect link.
#[derive(Debug, Clone, Default)]
pub struct LinkSimConfig {
    // ---
    /// Number of `connect` attempts refused before the first success.
    pub refused_connects: u32,

    /// If `Some(n)`, every send after the first `n` on a connection fails
    /// with a connection error.
    pub send_budget: Option<usize>,
}

// ---

impl LinkSimConfig {
    // ---
    /// Perfect link: every connect succeeds, every send is delivered.
    pub fn perfect() -> Self {
        Self::default()
    }

    // ---

    /// Server that is not up yet for the first `refusals` attempts.
    pub fn refuse_first(refusals: u32) -> Self {
        Self {
            refused_connects: refusals,
            ..Default::default()
        }
    }

    // ---

    /// Link that drops after `sends` replies.
    pub fn drop_after_sends(sends: usize) -> Self {
        Self {
            send_budget: Some(sends),
            ..Default::default()
        }
    }
}
