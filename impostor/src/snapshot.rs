use crate::game::RoundState;
use crate::types::*;
use serde::{Deserialize, Serialize};

// Read-only view for UI sync. Built by the controller; the impostor identity and the secret only
// appear through `secret` while the reveal area is held, and through `result` once voting ends.

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct GameSnapshot {
    pub phase: PhaseKind,
    pub roster: Vec<Player>,
    pub tier: AccessTier,
    pub categories: Vec<CategoryId>,
    pub custom_secret: Option<CustomSecret>,
    pub round: Option<RoundView>,
    /// Choices for the current voter, only populated while the ballot is open.
    pub ballot: Vec<BallotOption>,
    pub timer: TimerView,
    pub secret: Option<SecretView>,
    pub result: Option<RoundResult>,
}

impl GameSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct RoundView {
    pub players: Vec<Player>,
    pub reveal_index: usize,
    pub vote_index: usize,
    /// Player the device should be handed to next.
    pub current_player: Option<Player>,
    pub votes_cast: usize,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct BallotOption {
    pub target: VoteTarget,
    /// Display name, `None` for skip.
    pub name: Option<String>,
}

impl BallotOption {
    pub fn for_target(round: &RoundState, target: VoteTarget) -> Self {
        let name = target
            .player_id()
            .and_then(|id| round.find_player(id))
            .map(|p| p.name.clone());
        Self { target, name }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct TimerView {
    pub running: bool,
    pub remaining_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::config::GameConfig;
    use crate::controller::PhaseController;
    use crate::rng::PcgSource;
    use crate::timer::ManualClock;

    fn controller() -> PhaseController<PcgSource, ManualClock> {
        PhaseController::with_parts(
            GameConfig::default(),
            PcgSource::from_seed(42),
            ManualClock::new(0),
        )
    }

    #[test]
    fn snapshot_hides_round_secrets_until_results() {
        let mut ctl = controller();
        ctl.apply(Action::StartRound).unwrap();
        let word = ctl.round().unwrap().secret().word.clone();
        let impostor = ctl.round().unwrap().impostor_id().to_string();
        let json = ctl.snapshot().to_json().unwrap();
        assert!(!json.contains(&word));
        assert!(!json.contains("impostor"));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["phase"], "reveal_pass");
        assert!(value["secret"].is_null());
        assert!(value["result"].is_null());
        assert!(!impostor.is_empty());
    }

    #[test]
    fn ballot_lists_names_and_skip() {
        let mut ctl = controller();
        ctl.apply(Action::StartRound).unwrap();
        for _ in 0..3 {
            ctl.apply(Action::ConfirmIdentity).unwrap();
            ctl.apply(Action::NextReveal).unwrap();
        }
        ctl.apply(Action::RequestVote).unwrap();
        assert!(ctl.snapshot().ballot.is_empty());
        ctl.apply(Action::OpenBallot).unwrap();
        let snapshot = ctl.snapshot();
        let voter = snapshot.round.unwrap().current_player.unwrap();
        assert_eq!(snapshot.ballot.len(), 3);
        assert!(snapshot.ballot.iter().all(|o| o.name.as_deref() != Some(voter.name.as_str())));
        let last = snapshot.ballot.last().unwrap();
        assert_eq!(last.target, VoteTarget::Skip);
        assert_eq!(last.name, None);
    }

    #[test]
    fn home_snapshot_shows_setup_state() {
        let ctl = controller();
        let snapshot = ctl.snapshot();
        assert_eq!(snapshot.phase, PhaseKind::Home);
        assert_eq!(snapshot.roster.len(), 3);
        assert_eq!(snapshot.roster[0].name, "Jugador 1");
        assert_eq!(snapshot.tier, AccessTier::Free);
        assert_eq!(snapshot.categories.len(), 5);
        assert!(snapshot.round.is_none());
        assert_eq!(snapshot.timer, TimerView::default());
    }
}
