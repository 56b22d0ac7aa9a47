use crate::constants::SKIP_TARGET;
use serde::{Deserialize, Serialize};
use std::fmt;

// Shared data types for players, the word catalog and round outcomes.

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Player {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CategoryId {
    Food,
    Places,
    Animals,
    Objects,
    Professions,
    Transport,
    Movies,
    Sports,
    Music,
    Spicy,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccessTier {
    Free,
    Pro,
}

impl AccessTier {
    /// Whether a holder of `self` may use content gated at `required`.
    pub fn allows(&self, required: AccessTier) -> bool {
        match (self, required) {
            (AccessTier::Pro, _) => true,
            (AccessTier::Free, AccessTier::Free) => true,
            (AccessTier::Free, AccessTier::Pro) => false,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub label: String,
    pub emoji: String,
    pub tier: AccessTier,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct WordEntry {
    pub category: CategoryId,
    pub word: String,
}

/// The word every crew member learns during reveal.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Secret {
    pub category: String,
    pub word: String,
}

/// Raw manual input for the secret, sanitized when a round starts.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct CustomSecret {
    pub category: String,
    pub word: String,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum VoteTarget {
    Player(String),
    Skip,
}

impl VoteTarget {
    pub fn player(id: impl Into<String>) -> Self {
        VoteTarget::Player(id.into())
    }

    pub fn player_id(&self) -> Option<&str> {
        match self {
            VoteTarget::Player(id) => Some(id),
            VoteTarget::Skip => None,
        }
    }
}

impl From<String> for VoteTarget {
    fn from(raw: String) -> Self {
        if raw == SKIP_TARGET {
            VoteTarget::Skip
        } else {
            VoteTarget::Player(raw)
        }
    }
}

impl From<VoteTarget> for String {
    fn from(target: VoteTarget) -> Self {
        match target {
            VoteTarget::Player(id) => id,
            VoteTarget::Skip => SKIP_TARGET.to_string(),
        }
    }
}

impl fmt::Display for VoteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteTarget::Player(id) => f.write_str(id),
            VoteTarget::Skip => f.write_str(SKIP_TARGET),
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Vote {
    pub voter_id: String,
    pub target: VoteTarget,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Caught,
    InnocentEjected,
    NoEjection,
    Tie,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Tally {
    pub target: VoteTarget,
    pub count: u32,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct RoundResult {
    pub outcome: Outcome,
    pub impostor_id: String,
    pub impostor_name: String,
    pub secret_category: String,
    pub secret_word: String,
    /// Ejected target, `None` on a tie or when nobody voted.
    pub top_target: Option<VoteTarget>,
    pub tally: Vec<Tally>,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Home,
    Setup,
    RevealPass,
    RevealSecret,
    Discussion,
    VotePass,
    VotePick,
    Results,
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PhaseKind::Home => "home",
            PhaseKind::Setup => "setup",
            PhaseKind::RevealPass => "reveal_pass",
            PhaseKind::RevealSecret => "reveal_secret",
            PhaseKind::Discussion => "discussion",
            PhaseKind::VotePass => "vote_pass",
            PhaseKind::VotePick => "vote_pick",
            PhaseKind::Results => "results",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiscussionDuration {
    Short,
    Long,
}

/// Haptic cues the host plays in response to controller events.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    Tap,
    SecretShown,
    TimerFinished,
}

impl Feedback {
    /// Vibration pattern in milliseconds, alternating pause and pulse.
    pub fn pattern_ms(&self) -> &'static [u64] {
        match self {
            Feedback::Tap => &[0, 10],
            Feedback::SecretShown => &[0, 50],
            Feedback::TimerFinished => &[0, 500],
        }
    }
}

/// What the current revealer sees while holding the reveal area. The impostor's view carries no
/// word or category.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum SecretView {
    Impostor,
    Crew { category: String, word: String },
}
