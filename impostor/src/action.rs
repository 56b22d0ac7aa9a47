use crate::types::{AccessTier, CategoryId, CustomSecret, DiscussionDuration, VoteTarget};
use serde::{Deserialize, Serialize};

// Player-facing actions the host feeds into the controller. Tagged so a UI bridge can send them
// as JSON.

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum Action {
    OpenSetup,
    AddPlayer {
        name: String,
    },
    RemovePlayer {
        id: String,
    },
    SetTier {
        tier: AccessTier,
    },
    SetCategories {
        ids: Vec<CategoryId>,
    },
    ToggleCategory {
        id: CategoryId,
    },
    SetCustomSecret {
        secret: Option<CustomSecret>,
    },
    StartRound,
    ConfirmIdentity,
    HoldSecret,
    ReleaseSecret,
    NextReveal,
    StartTimer {
        duration: DiscussionDuration,
    },
    RequestVote,
    OpenBallot,
    Vote {
        target: VoteTarget,
    },
    PlayAgain,
    GoHome,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::OpenSetup => "open_setup",
            Action::AddPlayer { .. } => "add_player",
            Action::RemovePlayer { .. } => "remove_player",
            Action::SetTier { .. } => "set_tier",
            Action::SetCategories { .. } => "set_categories",
            Action::ToggleCategory { .. } => "toggle_category",
            Action::SetCustomSecret { .. } => "set_custom_secret",
            Action::StartRound => "start_round",
            Action::ConfirmIdentity => "confirm_identity",
            Action::HoldSecret => "hold_secret",
            Action::ReleaseSecret => "release_secret",
            Action::NextReveal => "next_reveal",
            Action::StartTimer { .. } => "start_timer",
            Action::RequestVote => "request_vote",
            Action::OpenBallot => "open_ballot",
            Action::Vote { .. } => "vote",
            Action::PlayAgain => "play_again",
            Action::GoHome => "go_home",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_use_tagged_json() {
        let vote = Action::Vote {
            target: VoteTarget::Skip,
        };
        let json = serde_json::to_string(&vote).unwrap();
        assert_eq!(json, r#"{"type":"Vote","data":{"target":"skip"}}"#);
        let parsed: Action =
            serde_json::from_str(r#"{"type":"Vote","data":{"target":"player-2"}}"#).unwrap();
        assert_eq!(
            parsed,
            Action::Vote {
                target: VoteTarget::player("player-2")
            }
        );
        let start: Action = serde_json::from_str(r#"{"type":"StartRound"}"#).unwrap();
        assert_eq!(start, Action::StartRound);
    }
}
