use crate::action::Action;
use crate::catalog::CategorySelection;
use crate::config::GameConfig;
use crate::error::{GameError, GameResult};
use crate::game::{start_round, FinishedRound, RoundState};
use crate::rng::{PcgSource, RandomSource};
use crate::roster::Roster;
use crate::snapshot::{BallotOption, GameSnapshot, RoundView, TimerView};
use crate::timer::{Clock, DiscussionTimer, SystemClock, TimerTick};
use crate::types::*;

// Phase controller: routes player actions to round engine calls and owns the screen phase. Every
// action is checked against the current phase first; a rejected action leaves all state as it was.

const LOG_TARGET: &str = "impostor::controller";

/// Screen phase, each variant carrying only the data that phase needs.
#[derive(Clone, Debug, PartialEq)]
pub enum Phase {
    Home,
    Setup,
    RevealPass(RoundState),
    RevealSecret { round: RoundState, holding: bool },
    Discussion(RoundState),
    VotePass(RoundState),
    VotePick(RoundState),
    Results(FinishedRound),
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Home => PhaseKind::Home,
            Phase::Setup => PhaseKind::Setup,
            Phase::RevealPass(_) => PhaseKind::RevealPass,
            Phase::RevealSecret { .. } => PhaseKind::RevealSecret,
            Phase::Discussion(_) => PhaseKind::Discussion,
            Phase::VotePass(_) => PhaseKind::VotePass,
            Phase::VotePick(_) => PhaseKind::VotePick,
            Phase::Results(_) => PhaseKind::Results,
        }
    }

    pub fn round(&self) -> Option<&RoundState> {
        match self {
            Phase::RevealPass(round)
            | Phase::RevealSecret { round, .. }
            | Phase::Discussion(round)
            | Phase::VotePass(round)
            | Phase::VotePick(round) => Some(round),
            Phase::Results(finished) => Some(finished.round()),
            Phase::Home | Phase::Setup => None,
        }
    }

    fn into_live_round(self) -> Result<RoundState, Phase> {
        match self {
            Phase::RevealPass(round)
            | Phase::RevealSecret { round, .. }
            | Phase::Discussion(round)
            | Phase::VotePass(round)
            | Phase::VotePick(round) => Ok(round),
            other => Err(other),
        }
    }
}

/// Phase reached after an accepted action, plus the haptic cue to play for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub phase: PhaseKind,
    pub feedback: Option<Feedback>,
}

pub struct PhaseController<R: RandomSource = PcgSource, C: Clock = SystemClock> {
    config: GameConfig,
    roster: Roster,
    tier: AccessTier,
    categories: CategorySelection,
    custom_secret: Option<CustomSecret>,
    phase: Phase,
    timer: DiscussionTimer,
    rng: R,
    clock: C,
}

impl PhaseController {
    /// Production controller: entropy-seeded randomness and the system clock.
    pub fn new(config: GameConfig) -> Self {
        Self::with_parts(config, PcgSource::from_entropy(), SystemClock)
    }
}

impl<R: RandomSource, C: Clock> PhaseController<R, C> {
    pub fn with_parts(config: GameConfig, rng: R, clock: C) -> Self {
        let roster = Roster::with_default_players(config.default_roster_size);
        Self {
            config,
            roster,
            tier: AccessTier::Free,
            categories: CategorySelection::default_free(),
            custom_secret: None,
            phase: Phase::Home,
            timer: DiscussionTimer::new(),
            rng,
            clock,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn phase_kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    pub fn round(&self) -> Option<&RoundState> {
        self.phase.round()
    }

    pub fn result(&self) -> Option<&RoundResult> {
        match &self.phase {
            Phase::Results(finished) => Some(finished.result()),
            _ => None,
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn tier(&self) -> AccessTier {
        self.tier
    }

    pub fn categories(&self) -> &CategorySelection {
        &self.categories
    }

    pub fn custom_secret(&self) -> Option<&CustomSecret> {
        self.custom_secret.as_ref()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn timer(&self) -> &DiscussionTimer {
        &self.timer
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }

    pub fn apply(&mut self, action: Action) -> GameResult<Transition> {
        let name = action.name();
        let from = self.phase.kind();
        let outcome = self.dispatch(action, name);
        match &outcome {
            Ok(_) => tracing::debug!(
                target: LOG_TARGET,
                action = name,
                %from,
                to = %self.phase.kind(),
                "action applied"
            ),
            Err(err) => tracing::debug!(
                target: LOG_TARGET,
                action = name,
                phase = %from,
                error = %err,
                "action rejected"
            ),
        }
        outcome.map(|feedback| Transition {
            phase: self.phase.kind(),
            feedback,
        })
    }

    /// Polls the discussion countdown. Hosts call this on their polling interval.
    pub fn tick(&mut self) -> TimerTick {
        if !matches!(self.phase, Phase::Discussion(_)) {
            return TimerTick::Idle;
        }
        self.timer.tick(self.clock.now_ms())
    }

    /// The secret as shown to the current revealer, only while the reveal area is held.
    pub fn secret_view(&self) -> Option<SecretView> {
        let Phase::RevealSecret {
            round,
            holding: true,
        } = &self.phase
        else {
            return None;
        };
        let player = round.current_revealer()?;
        if round.is_impostor(&player.id) {
            Some(SecretView::Impostor)
        } else {
            Some(SecretView::Crew {
                category: round.secret().category.clone(),
                word: round.secret().word.clone(),
            })
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let round = self.phase.round().map(|round| RoundView {
            players: round.players().to_vec(),
            reveal_index: round.reveal_index(),
            vote_index: round.vote_index(),
            current_player: match &self.phase {
                Phase::RevealPass(_) | Phase::RevealSecret { .. } => {
                    round.current_revealer().cloned()
                }
                Phase::VotePass(_) | Phase::VotePick(_) => round.current_voter().cloned(),
                _ => None,
            },
            votes_cast: round.votes().len(),
        });
        let ballot = match &self.phase {
            Phase::VotePick(round) => round
                .current_voter()
                .map(|voter| {
                    round
                        .ballot_for(&voter.id)
                        .into_iter()
                        .map(|target| BallotOption::for_target(round, target))
                        .collect()
                })
                .unwrap_or_default(),
            _ => Vec::new(),
        };
        GameSnapshot {
            phase: self.phase.kind(),
            roster: self.roster.players().to_vec(),
            tier: self.tier,
            categories: self.categories.ids().collect(),
            custom_secret: self.custom_secret.clone(),
            round,
            ballot,
            timer: TimerView {
                running: self.timer.is_running(),
                remaining_secs: self.timer.remaining_secs(),
            },
            secret: self.secret_view(),
            result: self.result().cloned(),
        }
    }

    fn dispatch(&mut self, action: Action, name: &'static str) -> GameResult<Option<Feedback>> {
        match action {
            Action::OpenSetup => {
                self.ensure(&[PhaseKind::Home], name)?;
                self.phase = Phase::Setup;
                Ok(Some(Feedback::Tap))
            }
            Action::AddPlayer { name: raw } => {
                self.ensure_editable(name)?;
                self.roster.add_player(&raw, &self.config)?;
                Ok(Some(Feedback::Tap))
            }
            Action::RemovePlayer { id } => {
                self.ensure_editable(name)?;
                self.roster
                    .remove_player(&id)
                    .ok_or(GameError::UnknownPlayer(id))?;
                Ok(Some(Feedback::Tap))
            }
            Action::SetTier { tier } => {
                self.ensure_editable(name)?;
                self.tier = tier;
                self.categories.restrict_to(tier);
                Ok(None)
            }
            Action::SetCategories { ids } => {
                self.ensure_editable(name)?;
                self.categories = CategorySelection::new(ids, self.tier);
                Ok(Some(Feedback::Tap))
            }
            Action::ToggleCategory { id } => {
                self.ensure_editable(name)?;
                self.categories.toggle(id, self.tier);
                Ok(Some(Feedback::Tap))
            }
            Action::SetCustomSecret { secret } => {
                self.ensure_editable(name)?;
                self.custom_secret = secret;
                Ok(None)
            }
            Action::StartRound => {
                self.ensure(&[PhaseKind::Home, PhaseKind::Setup], name)?;
                self.begin_round()?;
                Ok(Some(Feedback::Tap))
            }
            Action::PlayAgain => {
                self.ensure(&[PhaseKind::Results], name)?;
                self.begin_round()?;
                Ok(Some(Feedback::Tap))
            }
            Action::ConfirmIdentity => {
                self.ensure(&[PhaseKind::RevealPass], name)?;
                self.move_round(|round| Phase::RevealSecret {
                    round,
                    holding: false,
                });
                Ok(Some(Feedback::Tap))
            }
            Action::HoldSecret => {
                self.set_holding(true, name)?;
                Ok(Some(Feedback::SecretShown))
            }
            Action::ReleaseSecret => {
                self.set_holding(false, name)?;
                Ok(None)
            }
            Action::NextReveal => {
                self.ensure(&[PhaseKind::RevealSecret], name)?;
                self.move_round(|mut round| {
                    round.advance_reveal();
                    if round.reveal_complete() {
                        Phase::Discussion(round)
                    } else {
                        Phase::RevealPass(round)
                    }
                });
                Ok(Some(Feedback::Tap))
            }
            Action::StartTimer { duration } => {
                self.ensure(&[PhaseKind::Discussion], name)?;
                let secs = self.config.discussion_secs(duration);
                self.timer
                    .start(secs, self.config.timer_grace_ms, self.clock.now_ms())?;
                Ok(Some(Feedback::Tap))
            }
            Action::RequestVote => {
                self.ensure(&[PhaseKind::Discussion], name)?;
                self.timer.cancel();
                self.move_round(|mut round| {
                    round.begin_voting();
                    Phase::VotePass(round)
                });
                Ok(Some(Feedback::Tap))
            }
            Action::OpenBallot => {
                self.ensure(&[PhaseKind::VotePass], name)?;
                self.move_round(Phase::VotePick);
                Ok(Some(Feedback::Tap))
            }
            Action::Vote { target } => {
                self.record_vote(target, name)?;
                let policy = self.config.tie_policy.policy();
                self.move_round(|round| {
                    if round.voting_complete() {
                        Phase::Results(round.finish(policy))
                    } else {
                        Phase::VotePass(round)
                    }
                });
                Ok(Some(Feedback::Tap))
            }
            Action::GoHome => {
                self.timer.cancel();
                self.phase = Phase::Home;
                Ok(Some(Feedback::Tap))
            }
        }
    }

    fn begin_round(&mut self) -> GameResult<()> {
        let round = start_round(
            self.roster.players(),
            &self.categories,
            self.custom_secret.as_ref(),
            &self.config,
            &mut self.rng,
        )?;
        self.timer.cancel();
        self.phase = Phase::RevealPass(round);
        Ok(())
    }

    fn set_holding(&mut self, value: bool, name: &'static str) -> GameResult<()> {
        let invalid = self.invalid(name);
        match &mut self.phase {
            Phase::RevealSecret { holding, .. } => {
                *holding = value;
                Ok(())
            }
            _ => Err(invalid),
        }
    }

    fn record_vote(&mut self, target: VoteTarget, name: &'static str) -> GameResult<()> {
        let invalid = self.invalid(name);
        let Phase::VotePick(round) = &mut self.phase else {
            return Err(invalid);
        };
        let voter_id = round
            .current_voter()
            .map(|p| p.id.clone())
            .ok_or(GameError::InvalidVote("no voter pending"))?;
        if target.player_id() == Some(voter_id.as_str()) {
            return Err(GameError::InvalidVote("players cannot vote for themselves"));
        }
        round.cast_vote(&voter_id, target)?;
        round.advance_vote();
        Ok(())
    }

    /// Rebuilds the phase around the live round. Phases without a live round are left untouched.
    fn move_round(&mut self, next: impl FnOnce(RoundState) -> Phase) {
        let phase = std::mem::replace(&mut self.phase, Phase::Home);
        self.phase = match phase.into_live_round() {
            Ok(round) => next(round),
            Err(phase) => phase,
        };
    }

    fn ensure(&self, allowed: &[PhaseKind], name: &'static str) -> GameResult<()> {
        if allowed.contains(&self.phase.kind()) {
            Ok(())
        } else {
            Err(self.invalid(name))
        }
    }

    fn ensure_editable(&self, name: &'static str) -> GameResult<()> {
        self.ensure(&[PhaseKind::Home, PhaseKind::Setup], name)
    }

    fn invalid(&self, action: &'static str) -> GameError {
        GameError::InvalidTransition {
            phase: self.phase.kind(),
            action,
        }
    }
}
